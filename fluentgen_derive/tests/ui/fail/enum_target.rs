use fluentgen::Builder;

/// Enums have no constructor to collect properties for
#[derive(Builder)]
pub enum Shape {
    Circle,
    Square,
}

fn main() {}
