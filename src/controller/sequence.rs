//! Round-robin sequencing of notification colors.
//!
//! Colors play one at a time, each as a full pass through the sprite
//! sheet. Completion advances to the next color; a set queued mid-cycle
//! swaps in once the current set is exhausted, and unless `once` is set
//! the rotation continues indefinitely.

use crate::color::{Color, ColorSequence};

/// What happened when the sequencer advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the color at this index in the active set.
    Next(usize),
    /// A queued replacement set became active, starting at index 0.
    Swapped,
    /// Sequence exhausted and not looping.
    Finished,
}

/// Tracks which color is active and what plays next.
#[derive(Debug, Default)]
pub struct ColorSequencer {
    current: ColorSequence,
    queued: Option<ColorSequence>,
    index: usize,
    once: bool,
}

impl ColorSequencer {
    /// Start over with a new set, playing from its first color.
    pub fn start(&mut self, colors: ColorSequence, once: bool) {
        self.current = colors;
        self.queued = None;
        self.index = 0;
        self.once = once;
    }

    /// Queue a replacement set to swap in at the next wrap-around.
    pub fn queue(&mut self, colors: ColorSequence) {
        self.queued = Some(colors);
    }

    /// The active set.
    #[must_use]
    pub fn colors(&self) -> &ColorSequence {
        &self.current
    }

    /// Index of the active color.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// The active color, if the set is non-empty.
    #[must_use]
    pub fn current_color(&self) -> Option<Color> {
        self.current.color_at(self.index)
    }

    /// Move past the color whose pass just completed.
    pub fn advance(&mut self) -> Advance {
        if self.current.is_empty() {
            return Advance::Finished;
        }
        self.index += 1;
        if self.index < self.current.len() {
            return Advance::Next(self.index);
        }
        // Set exhausted: swap in the queued set, wrap, or finish.
        self.index = 0;
        if let Some(next) = self.queued.take() {
            self.current = next;
            if self.current.is_empty() {
                return Advance::Finished;
            }
            return Advance::Swapped;
        }
        if self.once {
            Advance::Finished
        } else {
            Advance::Next(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(rgbs: &[u32]) -> ColorSequence {
        ColorSequence::new(
            rgbs.iter().map(|&c| Color::from_rgb(c)).collect(),
        )
    }

    #[test]
    fn round_robin_loops_indefinitely() {
        let mut s = ColorSequencer::default();
        s.start(seq(&[0x111111, 0x222222, 0x333333]), false);

        let mut seen = vec![s.current_color().unwrap().rgb()];
        for _ in 0..5 {
            let _ = s.advance();
            seen.push(s.current_color().unwrap().rgb());
        }
        assert_eq!(
            seen,
            vec![
                0x111111, 0x222222, 0x333333, 0x111111, 0x222222,
                0x333333
            ]
        );
    }

    #[test]
    fn once_finishes_after_last_color() {
        let mut s = ColorSequencer::default();
        s.start(seq(&[0xAA0000, 0x00AA00]), true);
        assert_eq!(s.advance(), Advance::Next(1));
        assert_eq!(s.advance(), Advance::Finished);
    }

    #[test]
    fn queued_set_swaps_at_wrap() {
        let mut s = ColorSequencer::default();
        s.start(seq(&[0x111111, 0x222222]), false);
        s.queue(seq(&[0xABCDEF]));

        // Still mid-set: no swap yet.
        assert_eq!(s.advance(), Advance::Next(1));
        assert_eq!(s.current_color().unwrap().rgb(), 0x222222);

        // Wrap: queued set becomes active.
        assert_eq!(s.advance(), Advance::Swapped);
        assert_eq!(s.current_color().unwrap().rgb(), 0xABCDEF);
    }

    #[test]
    fn empty_set_finishes_immediately() {
        let mut s = ColorSequencer::default();
        s.start(ColorSequence::default(), false);
        assert_eq!(s.advance(), Advance::Finished);
        assert!(s.current_color().is_none());
    }

    #[test]
    fn queued_empty_set_finishes() {
        let mut s = ColorSequencer::default();
        s.start(seq(&[0x111111]), false);
        s.queue(ColorSequence::default());
        assert_eq!(s.advance(), Advance::Finished);
    }
}
