//! Request lifecycle, attestations, fees and errors.

pub mod attestation;
pub mod errors;
pub mod fees;
pub mod request;
pub mod state;

pub use attestation::Attestation;
pub use errors::RequestError;
pub use fees::{FeeLedger, FeeSchedule};
pub use request::{FulfillOutcome, Request, RequestStatus};
pub use state::RegistryState;
