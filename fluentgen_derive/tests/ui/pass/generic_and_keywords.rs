use fluentgen::Builder;
use std::fmt::Debug;

#[derive(Debug, Builder)]
pub(crate) struct Tagged<T: Clone, R>
where
    T: Debug,
{
    pub r#type: String,
    pub value: T,
    #[builder(default)]
    pub extra: Option<R>,
}

fn main() {
    let tagged: Tagged<u8, ()> = Tagged::builder()
        .r#type("kind".to_string())
        .value(7)
        .build()
        .unwrap();
    assert_eq!(tagged.value, 7);
    assert!(tagged.extra.is_none());
}
