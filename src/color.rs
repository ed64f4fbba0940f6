//! Indicator colors and the ordered sequence fed to the animation.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::HaloError;

/// An opaque 24-bit RGB color.
///
/// Alpha is implied fully opaque; the overlay itself decides which pixels
/// are transparent. Serializes as a `"#RRGGBB"` hex string in options
/// files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(u32);

impl Color {
    /// Build from a packed `0xRRGGBB` value. High byte is ignored.
    #[must_use]
    pub const fn from_rgb(rgb: u32) -> Self {
        Self(rgb & 0x00FF_FFFF)
    }

    /// Red channel.
    #[must_use]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    /// Green channel.
    #[must_use]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    /// Blue channel.
    #[must_use]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Packed `0xRRGGBB` value.
    #[must_use]
    pub const fn rgb(self) -> u32 {
        self.0
    }

    /// Fully opaque RGBA bytes for raster writes.
    #[must_use]
    pub const fn rgba8(self) -> [u8; 4] {
        [self.r(), self.g(), self.b(), 0xFF]
    }

    /// Linear per-channel blend toward `other`. `t` is clamped to
    /// `[0, 1]`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u32 {
            (f32::from(a) + (f32::from(b) - f32::from(a)) * t).round() as u32
        };
        Self(
            (mix(self.r(), other.r()) << 16)
                | (mix(self.g(), other.g()) << 8)
                | mix(self.b(), other.b()),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        let hex = raw.strip_prefix('#').unwrap_or(&raw);
        let value = u32::from_str_radix(hex, 16)
            .map_err(|e| D::Error::custom(format!("bad color {raw:?}: {e}")))?;
        Ok(Self::from_rgb(value))
    }
}

/// Opaque handle to a notification icon image owned by the host shell.
///
/// The core never inspects icon pixels; it only carries handles alongside
/// colors so the host can resolve them when it composes badge content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconKey(pub u64);

/// An ordered list of colors to cycle through, with optional parallel
/// icons.
///
/// Insertion order is display order. An empty sequence is valid and means
/// "nothing to show". When icons are present, the two lists have equal
/// length (enforced at construction).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorSequence {
    colors: Vec<Color>,
    icons: Option<Vec<IconKey>>,
}

impl ColorSequence {
    /// A sequence with colors only.
    #[must_use]
    pub fn new(colors: Vec<Color>) -> Self {
        Self {
            colors,
            icons: None,
        }
    }

    /// A sequence with parallel icons.
    ///
    /// # Errors
    ///
    /// Returns [`HaloError::IconMismatch`] when list lengths differ.
    pub fn with_icons(
        colors: Vec<Color>,
        icons: Vec<IconKey>,
    ) -> Result<Self, HaloError> {
        if colors.len() != icons.len() {
            return Err(HaloError::IconMismatch {
                colors: colors.len(),
                icons: icons.len(),
            });
        }
        Ok(Self {
            colors,
            icons: Some(icons),
        })
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Number of colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Colors in display order.
    #[must_use]
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Color at `index`, wrapping around the sequence.
    #[must_use]
    pub fn color_at(&self, index: usize) -> Option<Color> {
        if self.colors.is_empty() {
            return None;
        }
        Some(self.colors[index % self.colors.len()])
    }

    /// Icon parallel to `index`, if icons were supplied.
    #[must_use]
    pub fn icon_at(&self, index: usize) -> Option<IconKey> {
        let icons = self.icons.as_ref()?;
        if icons.is_empty() {
            return None;
        }
        Some(icons[index % icons.len()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_round_trip() {
        let c = Color::from_rgb(0x12_34_56);
        assert_eq!(c.r(), 0x12);
        assert_eq!(c.g(), 0x34);
        assert_eq!(c.b(), 0x56);
        assert_eq!(c.rgba8(), [0x12, 0x34, 0x56, 0xFF]);
    }

    #[test]
    fn high_byte_masked() {
        assert_eq!(Color::from_rgb(0xFF12_3456).rgb(), 0x12_3456);
    }

    #[test]
    fn lerp_endpoints_and_midpoint() {
        let a = Color::from_rgb(0x000000);
        let b = Color::from_rgb(0xFF00FF);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        let mid = a.lerp(b, 0.5);
        assert_eq!(mid.r(), 128);
        assert_eq!(mid.b(), 128);
    }

    #[test]
    fn serde_hex_string() {
        let c: Color = serde_json::from_str("\"#FF8800\"").unwrap();
        assert_eq!(c.rgb(), 0xFF8800);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#FF8800\"");
    }

    #[test]
    fn icon_length_mismatch_rejected() {
        let err = ColorSequence::with_icons(
            vec![Color::from_rgb(0xFF0000)],
            vec![IconKey(1), IconKey(2)],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            crate::error::HaloError::IconMismatch { colors: 1, icons: 2 }
        ));
    }

    #[test]
    fn wrapping_accessors() {
        let seq = ColorSequence::new(vec![
            Color::from_rgb(0xFF0000),
            Color::from_rgb(0x00FF00),
        ]);
        assert_eq!(seq.color_at(0).unwrap().rgb(), 0xFF0000);
        assert_eq!(seq.color_at(3).unwrap().rgb(), 0x00FF00);
        assert!(seq.icon_at(0).is_none());
        assert!(ColorSequence::default().color_at(0).is_none());
    }
}
