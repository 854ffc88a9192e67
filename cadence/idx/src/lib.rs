//! Typed indices and the index-addressed containers built on them.
mod index_trait;
mod macros;
pub mod maps;

pub use index_trait::IndexRef;
pub use maps::{IndexedMap, SecondaryMap};
