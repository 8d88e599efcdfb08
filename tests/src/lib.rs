//! # xOracle Test Suite
//!
//! Cross-crate flows that exercise the services the way a relayer and a
//! consuming contract would.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs      # signers, node config, container builder
//!     ├── price_flow.rs    # request → attest → fulfill → callback
//!     ├── relay_flow.rs    # send on one chain, fulfill on another
//!     └── persistence.rs   # snapshot, restart, replay protection
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p xo-tests
//! cargo test -p xo-tests integration::relay_flow::
//!
//! # Benchmarks
//! cargo bench -p xo-tests
//! ```

pub mod integration;
