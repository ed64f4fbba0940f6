//! Packed sprite-sheet atlases and the per-size style set.

use image::RgbaImage;

use crate::geometry::Rect;
use crate::mode::PlaybackMode;
use crate::sprite::raster::Canvas;
use crate::sprite::styles::SpriteStyle;

/// Pages are capped at this edge length; frames that do not fit on one
/// page spill onto the next.
const MAX_PAGE_DIM: u32 = 2048;

/// Location of one frame inside a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef {
    /// Index into the sheet's page list.
    pub page: usize,
    /// Frame bounds inside that page.
    pub rect: Rect,
}

/// Immutable pre-rendered bitmap atlas for one style at one resolution.
///
/// Frames are packed row-major into fixed-size pages. A sheet is valid
/// only when every declared frame was actually rasterized; an invalid
/// sheet must never reach the player.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pages: Vec<RgbaImage>,
    frames: Vec<FrameRef>,
    declared_frames: usize,
    frame_rate: f32,
    width: u32,
    height: u32,
}

impl SpriteSheet {
    /// Rasterize `style` at `width`×`height` into a packed sheet.
    #[must_use]
    pub fn bake(style: SpriteStyle, width: u32, height: u32) -> Self {
        let declared = style.frame_count();
        let cols = (MAX_PAGE_DIM / width.max(1)).max(1);
        let rows = (MAX_PAGE_DIM / height.max(1)).max(1);
        let per_page = (cols * rows) as usize;

        let mut pages: Vec<RgbaImage> = Vec::new();
        let mut frames = Vec::with_capacity(declared);

        for i in 0..declared {
            let slot = i % per_page;
            if slot == 0 {
                let page_frames = (declared - i).min(per_page) as u32;
                let page_cols = page_frames.min(cols);
                let page_rows = page_frames.div_ceil(cols);
                pages.push(RgbaImage::new(
                    page_cols * width,
                    page_rows * height,
                ));
            }
            let col = slot as u32 % cols;
            let row = slot as u32 / cols;
            let rect = Rect::new(
                (col * width) as i32,
                (row * height) as i32,
                width,
                height,
            );

            let mut canvas = Canvas::new(width, height);
            style.render_frame(i, &mut canvas);
            let rendered = canvas.into_image();

            let page = pages.len() - 1;
            copy_into(&mut pages[page], &rendered, rect);
            frames.push(FrameRef { page, rect });
        }

        Self {
            pages,
            frames,
            declared_frames: declared,
            frame_rate: style.frame_rate(),
            width,
            height,
        }
    }

    /// Whether every declared frame is present.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.frames.len() == self.declared_frames
    }

    /// Number of frames in one pass.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.declared_frames
    }

    /// Nominal playback rate in frames per second.
    #[must_use]
    pub fn frame_rate(&self) -> f32 {
        self.frame_rate
    }

    /// Frame width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Page image and bounds for frame `index`.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<(&RgbaImage, Rect)> {
        let fr = self.frames.get(index)?;
        Some((self.pages.get(fr.page)?, fr.rect))
    }
}

fn copy_into(page: &mut RgbaImage, frame: &RgbaImage, rect: Rect) {
    for y in 0..frame.height().min(rect.height) {
        for x in 0..frame.width().min(rect.width) {
            page.put_pixel(
                rect.left as u32 + x,
                rect.top as u32 + y,
                *frame.get_pixel(x, y),
            );
        }
    }
}

/// All three sprite styles baked together for one target size.
///
/// The set swaps in atomically: the player never observes one style
/// updated while the others are stale. `generation` identifies which
/// bake request produced the set so stale completions can be discarded.
#[derive(Debug, Clone)]
pub struct SheetSet {
    /// Bake request generation this set answers.
    pub generation: u64,
    /// Frame width the set was baked at.
    pub width: u32,
    /// Frame height the set was baked at.
    pub height: u32,
    swirl: SpriteSheet,
    blink: SpriteSheet,
    single: SpriteSheet,
}

impl SheetSet {
    /// Bake all styles at `width`×`height`.
    #[must_use]
    pub fn bake(width: u32, height: u32, generation: u64) -> Self {
        Self {
            generation,
            width,
            height,
            swirl: SpriteSheet::bake(SpriteStyle::Swirl, width, height),
            blink: SpriteSheet::bake(SpriteStyle::Blink, width, height),
            single: SpriteSheet::bake(SpriteStyle::Single, width, height),
        }
    }

    /// Sheet backing a sprite playback mode; `None` for persistent
    /// modes.
    #[must_use]
    pub fn sheet_for(&self, mode: PlaybackMode) -> Option<&SpriteSheet> {
        match mode {
            PlaybackMode::Swirl => Some(&self.swirl),
            PlaybackMode::Blink => Some(&self.blink),
            PlaybackMode::Single => Some(&self.single),
            PlaybackMode::PersistentImage
            | PlaybackMode::PersistentImageHidden => None,
        }
    }

    /// Whether every contained sheet is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.swirl.is_valid()
            && self.blink.is_valid()
            && self.single.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baked_sheet_is_valid() {
        let sheet = SpriteSheet::bake(SpriteStyle::Blink, 40, 40);
        assert!(sheet.is_valid());
        assert_eq!(sheet.frame_count(), SpriteStyle::Blink.frame_count());
        for i in 0..sheet.frame_count() {
            let (page, rect) = sheet.frame(i).unwrap();
            assert!(rect.right() as u32 <= page.width());
            assert!(rect.bottom() as u32 <= page.height());
            assert_eq!(rect.width, 40);
            assert_eq!(rect.height, 40);
        }
        assert!(sheet.frame(sheet.frame_count()).is_none());
    }

    #[test]
    fn large_frames_spill_onto_multiple_pages() {
        // 700px frames fit 2x2 per page, so 40 blink frames need ten
        // pages and the last frame starts a fresh row-major layout.
        let sheet = SpriteSheet::bake(SpriteStyle::Blink, 700, 700);
        assert!(sheet.is_valid());
        let (page0, first) = sheet.frame(0).unwrap();
        let (page1, fifth) = sheet.frame(4).unwrap();
        assert_eq!(first, Rect::new(0, 0, 700, 700));
        assert_eq!(fifth, Rect::new(0, 0, 700, 700));
        assert!(!std::ptr::eq(page0, page1));
        let (_, second) = sheet.frame(1).unwrap();
        assert_eq!(second, Rect::new(700, 0, 700, 700));
    }

    #[test]
    fn set_serves_sprite_modes_only() {
        let set = SheetSet::bake(32, 32, 7);
        assert!(set.is_valid());
        assert_eq!(set.generation, 7);
        assert!(set.sheet_for(PlaybackMode::Swirl).is_some());
        assert!(set.sheet_for(PlaybackMode::Blink).is_some());
        assert!(set.sheet_for(PlaybackMode::Single).is_some());
        assert!(set.sheet_for(PlaybackMode::PersistentImage).is_none());
    }
}
