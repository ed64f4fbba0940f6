//! The pure half of the visibility policy.
//!
//! [`desired`] maps one snapshot of external inputs plus options to the
//! [`OverlayState`] the engine should converge on. It performs no side
//! effects, so every branch of the policy is testable without a
//! platform host or render thread. The manager diffs its output
//! against the last-applied state to decide what actually needs to
//! touch the platform.

use crate::color::ColorSequence;
use crate::mode::PlaybackMode;
use crate::options::Options;

/// One snapshot of everything the policy reads.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalInputs {
    /// Screen fully lit.
    pub on: bool,
    /// Display in the low-power always-on state.
    pub doze: bool,
    /// Charger connected.
    pub charging: bool,
    /// Wall-clock minute for the schedule window check.
    pub minute_of_day: u16,
    /// Active notification colors. Empty means nothing to show.
    pub colors: ColorSequence,
}

impl Default for EvalInputs {
    fn default() -> Self {
        Self {
            on: false,
            doze: false,
            charging: false,
            minute_of_day: 720,
            colors: ColorSequence::default(),
        }
    }
}

/// The last-applied (or next-desired) configuration. Comparing desired
/// against applied is what makes re-evaluations idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayState {
    /// An overlay surface should exist.
    pub wanted: bool,
    /// The indicator is in a display state where it can be seen.
    pub visible: bool,
    /// Effective render mode after hide policy.
    pub mode: PlaybackMode,
    /// Colors pushed to the animation controller.
    pub colors: ColorSequence,
    /// Paint the surface opaque black behind the indicator.
    pub black_fill: bool,
    /// Effective doze, including anticipatory activation.
    pub doze: bool,
    /// Persistent image is hidden while nothing is active.
    pub hide_aod: bool,
    /// The hide removes the surface entirely instead of keeping a
    /// blank placeholder.
    pub hide_aod_fully: bool,
    /// The platform always-on-display feature should be enabled.
    pub want_persistent_image: bool,
}

/// Compute the state the overlay should converge on.
#[must_use]
pub fn desired(inputs: &EvalInputs, options: &Options) -> OverlayState {
    let schedule_active =
        options.aod.schedule.contains(inputs.minute_of_day);
    let have_colors = !inputs.colors.is_empty();

    // Hiding while the screen is fully off is a separate opt-in; a
    // surprise blank region under the always-on clock looks broken.
    let hide_aod = options.aod.hide_when_inactive
        && (inputs.on
            || inputs.doze
            || options.aod.allow_hide_during_screen_off);
    let hidden_when_off = options.aod.hide_when_inactive
        && options.aod.allow_hide_during_screen_off;
    let want_persistent_image =
        (have_colors || !hidden_when_off) && schedule_active;

    // Anticipatory activation: the display is about to drop into doze
    // and the always-on subsystem is wanted, so set up now rather than
    // racing the transition.
    let mut doze = inputs.doze;
    let mut visible = inputs.on || inputs.doze;
    if !visible && want_persistent_image {
        visible = true;
        doze = true;
    }

    let quadrant = options.modes.quadrant(inputs.charging, inputs.on);
    let mut mode = quadrant.mode;
    let mut active_hide = false;
    if mode.is_persistent() {
        active_hide = (!have_colors || !schedule_active) && hide_aod;
        if active_hide {
            mode = PlaybackMode::PersistentImageHidden;
        }
    }

    let mut wanted = quadrant.enabled
        && visible
        && (have_colors || mode.is_persistent());
    if active_hide && options.aod.hide_fully {
        wanted = false;
    }

    OverlayState {
        wanted,
        visible,
        mode,
        colors: inputs.colors.clone(),
        black_fill: !inputs.on && mode.is_persistent(),
        doze,
        hide_aod,
        hide_aod_fully: options.aod.hide_fully,
        want_persistent_image,
    }
}
