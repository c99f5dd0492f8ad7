use formbind::{FormController, FormSchema};

#[derive(Clone, formbind::FormSchema)]
struct LoginForm {
    username: String,
    password: String,
}

fn main() {
    let fields = LoginForm::fields();
    let controller = FormController::new(LoginForm::schema());

    controller
        .set_value(fields.username(), "ada")
        .expect("set username");
    assert!(!controller.is_valid().expect("validity"));

    controller
        .set_value(fields.password(), "secret")
        .expect("set password");
    assert!(controller.is_valid().expect("validity"));
    assert!(controller.data().expect("data").is_some());
}
