// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]
// Tests exercise panicking assertions, discard poll hints freely, and
// spell out std::time paths where wall-clock deadlines are meant.
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp,
        unused_results,
        unused_qualifications
    )
)]

//! Always-on-display notification light overlay engine.
//!
//! Halolight drives a small animated indicator inside a display's
//! camera cutout, across three display states: fully on, low-power
//! doze, and off with a persistent always-on image. The hard part is
//! not drawing a ring, it is deciding frame by frame whether to draw
//! at all while conserving power, avoiding burn-in, and never leaving
//! stale pixels behind.
//!
//! # Key entry points
//!
//! - [`context::Context`] - dependency wiring and lifecycle
//! - [`overlay::OverlayManager`] - the visibility state machine
//! - [`player::SpritePlayer`] - the frame scheduler and render thread
//! - [`options::Options`] - runtime configuration (modes, schedule,
//!   calibration, timing)
//!
//! # Architecture
//!
//! External [`signals::Signal`]s land on the main thread, where the
//! overlay state machine re-evaluates visibility policy and owns the
//! platform window. A dedicated render thread converts elapsed time
//! into frame indices and blits from sprite sheets baked by a third
//! loader thread, with baked sheets delivered through a lock-free
//! triple buffer. All mutable scheduler state sits behind one mutex
//! with field-swap critical sections.

pub mod color;
pub mod context;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod mode;
pub mod options;
pub mod overlay;
pub mod player;
pub mod signals;
pub mod sprite;

pub use color::{Color, ColorSequence, IconKey};
pub use context::{Context, PlatformSeams};
pub use error::HaloError;
pub use mode::PlaybackMode;
pub use options::Options;
pub use signals::Signal;
