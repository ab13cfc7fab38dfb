use fluentgen::Builder;

#[derive(Builder)]
#[builder(name = "PointMaker")]
#[builder(name = "PointFactory")]
pub struct Point {
    pub x: i32,
}

fn main() {}
