use fluentgen::generate_builder;

/// The builder for this struct is written by `fluentgen generate`; the
/// marker only checks the declaration and removes the builder options.
#[generate_builder]
#[derive(Debug, Clone, PartialEq)]
#[builder(prefix = "with")]
pub struct Endpoint {
    pub host: String,
    #[builder(default = 443)]
    pub port: u16,
}

fn main() {
    let endpoint = Endpoint {
        host: "localhost".to_string(),
        port: 8443,
    };
    assert_eq!(endpoint.clone(), endpoint);
}
