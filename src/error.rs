//! Crate-level error types.

use std::fmt;

use crate::overlay::platform::SurfaceError;

/// Errors produced by the halolight crate.
#[derive(Debug)]
pub enum HaloError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// Platform overlay surface failure. An
    /// [`SurfaceError::InvalidToken`] inside is fatal for the hosting
    /// process; everything else is recoverable.
    Surface(SurfaceError),
    /// Sprite sheet rasterization failure.
    SheetBake(String),
    /// Color/icon list length mismatch in a sequence.
    IconMismatch {
        /// Number of colors supplied.
        colors: usize,
        /// Number of icons supplied.
        icons: usize,
    },
}

impl HaloError {
    /// Whether the hosting process should terminate cleanly and let its
    /// supervisor restart it rather than limp along.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Surface(SurfaceError::InvalidToken))
    }
}

impl fmt::Display for HaloError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::Surface(e) => write!(f, "overlay surface error: {e}"),
            Self::SheetBake(msg) => {
                write!(f, "sprite sheet bake error: {msg}")
            }
            Self::IconMismatch { colors, icons } => {
                write!(f, "sequence has {colors} colors but {icons} icons")
            }
        }
    }
}

impl std::error::Error for HaloError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            Self::Surface(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HaloError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<SurfaceError> for HaloError {
    fn from(e: SurfaceError) -> Self {
        Self::Surface(e)
    }
}
