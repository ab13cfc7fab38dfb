//! Fluent builders for plain value types.
//!
//! ```
//! use fluentgen::Builder;
//!
//! #[derive(Debug, Builder)]
//! struct Point {
//!     x: i32,
//!     #[builder(default)]
//!     y: i32,
//! }
//!
//! let point = Point::builder().x(1).build().unwrap();
//! assert_eq!(point.y, 0);
//! assert!(Point::builder().build().is_err());
//! ```
//!
//! Structs marked with [`generate_builder`] instead get their builder from
//! `fluentgen generate`, which writes it to a separate file. Each struct
//! uses one of the two; the generator never picks up derived structs.

pub use fluentgen_core::{MissingRequiredValue, config, emit, error, provider, tooling};
pub use fluentgen_derive::{Builder, generate_builder};
