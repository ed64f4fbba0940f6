//! Sprite sheets: procedural style compositions, packed atlases, and the
//! background baker thread.

pub mod baker;
pub mod raster;
pub mod sheet;
pub mod styles;

pub use baker::SheetBaker;
pub use sheet::{FrameRef, SheetSet, SpriteSheet};
pub use styles::SpriteStyle;
