use fluentgen::Builder;

#[derive(Builder)]
pub struct Holder<T: ?Sized> {
    pub value: Box<T>,
}

fn main() {}
