//! In-process implementations of the outbound ports.

pub mod fee_controller;
pub mod fee_receiver;

pub use fee_controller::StaticFeeController;
pub use fee_receiver::InMemoryFeeReceiver;
