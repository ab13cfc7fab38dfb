use fluentgen::Builder;

#[derive(Debug, Clone, Builder)]
#[builder(prefix = "with")]
struct Connection {
    host: String,
    #[builder(default = 5432)]
    port: u16,
    #[builder(default)]
    tls: bool,
    user: Option<String>,
}

fn main() {
    let connection = ConnectionBuilder::new()
        .with_host("db".to_string())
        .with_user(None)
        .build()
        .unwrap();
    assert_eq!(connection.port, 5432);
    assert!(!connection.tls);
}
