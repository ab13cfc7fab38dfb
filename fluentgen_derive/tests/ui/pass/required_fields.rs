use fluentgen::Builder;

/// Only required fields
#[derive(Debug, Builder)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

fn main() {
    let point = Point::builder().x(1).y(2).build().unwrap();
    assert_eq!(point.x + point.y, 3);
}
