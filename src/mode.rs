//! Playback modes for the indicator animation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How the indicator renders a pass.
///
/// The first three variants blit pre-rendered sprite sheet frames. The
/// `PersistentImage*` variants render procedurally (a rotating color ring)
/// and are left on screen by the always-on-display subsystem without
/// continuous refresh.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackMode {
    /// Color sweeps around the cutout.
    #[default]
    Swirl,
    /// Ring fades in and out.
    Blink,
    /// One ring pulse per pass.
    Single,
    /// Static procedural ring with slow burn-in drift.
    PersistentImage,
    /// Persistent-image placeholder that draws nothing; used while
    /// geometry is unknown or the indicator is actively hidden, keeping
    /// the surface present so screen content under it is preserved.
    PersistentImageHidden,
}

impl PlaybackMode {
    /// Whether this is one of the persistent-image modes.
    #[must_use]
    pub const fn is_persistent(self) -> bool {
        matches!(self, Self::PersistentImage | Self::PersistentImageHidden)
    }

    /// Whether frames come from a sprite sheet.
    #[must_use]
    pub const fn uses_sprite_sheet(self) -> bool {
        !self.is_persistent()
    }
}
