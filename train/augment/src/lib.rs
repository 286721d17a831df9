//! Synthetic object-detection data: scaled object cutouts packed onto
//! background images without overlap, blended in, and written out with one
//! label line per placed object.

pub mod compose;
pub mod config;
pub mod convert;
pub mod driver;
pub mod error;
pub mod geom;
pub mod io;
pub mod label;
pub mod logging;
pub mod preview;
pub mod sampler;
pub mod source;

pub use config::{AugmentCfg, LabelFormat, LabelNames, PackerKind, SourceLayout};
pub use driver::{BatchDriver, BatchSummary};
pub use error::{AugmentError, Result};
pub use geom::PlacementRect;
