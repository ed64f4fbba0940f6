//! Seams to the platform: overlay window, always-on-display toggle,
//! power hooks.
//!
//! The engine never talks to a compositor or power manager directly.
//! Host shells implement these traits; the state machine drives them
//! and owns their error policy. Only [`SurfaceError::InvalidToken`] is
//! fatal, everything else is logged and retried on the next natural
//! trigger.

use std::fmt;

use crate::geometry::Rect;

/// Failure adding, updating, or removing the overlay window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The host window token was rejected. No overlay can ever be
    /// placed again from this process; restart is the only recovery.
    InvalidToken,
    /// Any other platform failure. Recoverable; the next evaluation
    /// retries naturally.
    Platform(String),
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidToken => write!(f, "overlay window token invalid"),
            Self::Platform(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for SurfaceError {}

/// Desired overlay window configuration, pushed on create and update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceParams {
    /// Window bounds in screen pixels. `None` while geometry is
    /// unknown; the host places a zero-sized placeholder.
    pub bounds: Option<Rect>,
    /// Fill the window opaque black behind the indicator.
    pub opaque_background: bool,
    /// Preferred bottom edge in pixels, from layout detection.
    pub bottom_hint: Option<i32>,
}

/// The platform overlay window. One writer, the overlay state machine.
pub trait OverlayHost {
    /// Add the overlay window.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::InvalidToken`] when the host token was rejected
    /// outright, [`SurfaceError::Platform`] for transient failures.
    fn create(&mut self, params: &SurfaceParams) -> Result<(), SurfaceError>;

    /// Reconfigure an existing overlay window.
    ///
    /// # Errors
    ///
    /// Same contract as [`OverlayHost::create`].
    fn update(&mut self, params: &SurfaceParams) -> Result<(), SurfaceError>;

    /// Remove the overlay window. Removal never fails meaningfully;
    /// a missing window is already the desired end state.
    fn remove(&mut self);

    /// Whether the window is currently attached.
    fn is_created(&self) -> bool;
}

/// Fire-and-forget always-on-display enablement.
///
/// Failures are the implementor's to log; the state machine assumes
/// the request landed and corrects on the next evaluation if not.
pub trait AodToggle {
    /// Request the always-on-display subsystem on or off.
    fn set_enabled(&mut self, enabled: bool);
}

/// Raw platform wake hook, driven by
/// [`WakeLock`](crate::overlay::WakeLock) which adds reference
/// counting and timeouts on top.
pub trait WakeSource {
    /// Keep the CPU awake (`true`) or allow suspend (`false`).
    fn set_awake(&mut self, awake: bool);
}
