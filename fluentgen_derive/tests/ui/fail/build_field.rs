use fluentgen::Builder;

/// `build` is the terminal operation of every builder
#[derive(Builder)]
pub struct Clash {
    pub build: u8,
}

fn main() {}
