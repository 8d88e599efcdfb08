//! Domain layer: signer set, access policy and their errors.

pub mod access;
pub mod errors;
pub mod signer_set;
