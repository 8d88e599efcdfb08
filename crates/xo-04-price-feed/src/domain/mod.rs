//! Feed entries, metadata and errors.

pub mod entities;
pub mod errors;
