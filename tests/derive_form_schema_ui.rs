#[test]
fn form_schema_derive_ui() {
    let testcases = trybuild::TestCases::new();
    testcases.pass("tests/ui/form_schema/pass.rs");
    testcases.pass("tests/ui/form_schema/pass_controller.rs");
}
