//! Core data model types for radix_merkle

mod hash;
mod value;

pub use hash::Hash;
pub use value::Digestible;
