use fluentgen::Builder;

#[derive(Builder)]
pub struct View<'a> {
    pub text: &'a str,
}

fn main() {}
