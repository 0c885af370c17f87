//! Trait definitions for Onshape operations.
//!
//! Each response type implements the trait matching the shape of its
//! endpoint, encapsulating path construction in the implementation.

mod get;
mod list;

pub use get::Get;
pub use list::List;
