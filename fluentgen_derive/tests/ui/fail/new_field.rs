use fluentgen::Builder;

/// Every builder already has an associated `new()`
#[derive(Builder)]
pub struct Factory {
    pub new: u8,
}

fn main() {}
