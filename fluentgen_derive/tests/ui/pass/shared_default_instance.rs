use fluentgen::Builder;

#[derive(Debug, Clone, PartialEq, Builder)]
#[builder(name = "SettingsMaker", optimize_copy)]
pub struct Settings {
    #[builder(default = 3)]
    pub retries: u8,
    #[builder(default = String::from("info"))]
    pub level: String,
}

fn main() {
    let settings = SettingsMaker::new().retries(5).build().unwrap();
    assert_eq!(settings.level, "info");
    assert_eq!(Settings::builder().build().unwrap().retries, 3);
}
