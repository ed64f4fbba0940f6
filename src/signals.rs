//! The engine's complete external vocabulary.
//!
//! Every trigger the overlay reacts to — display transitions, power
//! changes, new notification colors, detected layout geometry, settings
//! edits — is represented as a `Signal`. Collaborators construct signals
//! and pass them to
//! [`OverlayManager::handle_signal`](crate::overlay::OverlayManager::handle_signal);
//! the state machine never cares *how* a signal was produced.

use crate::color::ColorSequence;
use crate::geometry::Rect;

/// A discrete external event that triggers one state-machine evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    // ── Display & power ─────────────────────────────────────────────
    /// Screen became fully lit.
    ScreenOn,
    /// Screen turned off.
    ScreenOff,
    /// Display entered the low-power always-on state.
    DozeEnter,
    /// Display left the low-power always-on state.
    DozeExit,
    /// Charger connected.
    ChargerConnected,
    /// Charger disconnected.
    ChargerDisconnected,
    /// User unlocked the device.
    UserPresent,

    // ── Content ─────────────────────────────────────────────────────
    /// New set of active notification colors.
    ColorsChanged {
        /// Colors (and optional icons) to cycle through.
        sequence: ColorSequence,
        /// Apply even when the sequence compares equal to the last one.
        force_refresh: bool,
    },
    /// Hide the indicator.
    HideRequested {
        /// Skip the graceful finish-current-pass stop.
        immediate: bool,
    },

    // ── Geometry ────────────────────────────────────────────────────
    /// The on-device persistent layout was (re)detected. `rect` of
    /// `None` is the valid "unknown" state.
    GeometryDetected {
        /// Detected indicator rectangle, if any.
        rect: Option<Rect>,
        /// Rectangle that must stay fully transparent (system clock).
        clock_exclusion: Option<Rect>,
        /// Hint for the overlay's bottom edge, in pixels.
        overlay_bottom_hint: Option<i32>,
    },

    // ── Configuration ───────────────────────────────────────────────
    /// Options were edited; re-read and re-evaluate.
    SettingsChanged,
}
