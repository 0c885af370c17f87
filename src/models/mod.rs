//! Onshape API model types.

mod bom;
mod document;
mod element;
mod part;

pub use bom::*;
pub use document::*;
pub use element::*;
pub use part::*;
