use fluentgen::{Builder, generate_builder};

#[generate_builder]
#[derive(Builder)]
pub struct Point {
    pub x: i32,
}

fn main() {}
