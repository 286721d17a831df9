//! Places axis-aligned rectangles into a single fixed-size bin without overlap.
//!
//! Packing is best effort: rectangles that do not fit are left out of the
//! result, and callers match placements back to their inputs through
//! [`Placement::id`].

pub mod guillotine;
pub mod packer;
pub mod rect;
pub mod shelf;

pub use packer::{Kind, PackError, PackerEngine};
pub use rect::{Placement, Size};
