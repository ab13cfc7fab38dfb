#[test]
fn derive_expansions_compile() {
    let t = trybuild::TestCases::new();

    t.pass("tests/ui/pass/*.rs");

    // Each rejected target must report a single error at the offending item
    t.compile_fail("tests/ui/fail/*.rs");
}
