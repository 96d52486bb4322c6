pub mod offset;

pub use offset::{bevel, offset, BevelKind, BevelRegion, OutlineBevel2D, OutlineOffset2D};
