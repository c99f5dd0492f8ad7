use formbind::{FormCodec, FormSchema, RawRecord};

#[derive(Clone, formbind::FormSchema)]
struct DemoForm {
    email: String,
    attempts: u32,
}

fn main() {
    let fields = DemoForm::fields();
    assert_eq!(fields.email().as_str(), "email");
    assert_eq!(fields.attempts().as_str(), "attempts");

    let mut record = RawRecord::new();
    record.insert(fields.email(), "a@example.com");
    record.insert(fields.attempts(), "3");

    let decoded = DemoForm::schema().decode(&record).expect("decode");
    assert_eq!(decoded.email, "a@example.com");
    assert_eq!(decoded.attempts, 3);
    assert_eq!(DemoForm::schema().encode(&decoded), record);
}
