//! Chooses the shape of a builder's `build()` body.

use crate::model::PropertyModel;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum BodyKind {
    /// Every property is required; construct directly from the fields.
    RequiredOnly,
    /// No required properties; overlay set fields on a shared default
    /// instance.
    DefaultInstanceOverlay,
    /// Construct from required fields, then overlay set optional fields.
    RequiredThenOverlay,
}

impl BodyKind {
    /// Whether the generated builder owns a shared default instance.
    pub fn shares_default_instance(self) -> bool {
        matches!(self, BodyKind::DefaultInstanceOverlay)
    }
}

/// First matching row wins:
///
/// | optional | required | optimize_copy | kind |
/// |---|---|---|---|
/// | empty | any | any | `RequiredOnly` |
/// | non-empty | empty | true | `DefaultInstanceOverlay` |
/// | non-empty | any | any | `RequiredThenOverlay` |
pub fn select(
    required: &[PropertyModel],
    optional: &[PropertyModel],
    optimize_copy: bool,
) -> BodyKind {
    if optional.is_empty() {
        BodyKind::RequiredOnly
    } else if required.is_empty() && optimize_copy {
        BodyKind::DefaultInstanceOverlay
    } else {
        BodyKind::RequiredThenOverlay
    }
}
