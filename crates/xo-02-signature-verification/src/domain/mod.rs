//! Verification inputs, outcomes and errors.

pub mod entities;
pub mod errors;
