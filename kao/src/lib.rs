//! Head variant table for the generic portraits of Sangokushi (Japan).
//!
//! A portrait is a 6x6 grid of 8x8 tiles: a head arrangement with gaps that
//! an eyes, a nose and a mouth variant fill in. This crate holds the
//! validated arrangement table, its file forms and the ROM readers that
//! produce it.

pub mod addr;
mod builtin;
pub mod error;
pub mod format;
pub mod grid;
pub mod portrait;
pub mod rom;
pub mod table;

pub use addr::BaseAddr;
pub use error::KaoError;
pub use grid::{Cell, TileGrid};
pub use table::{Feature, HeadRecord, HeadVariant, VariantCounts, VariantTable};
