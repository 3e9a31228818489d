//! # Launchpad Test Suite
//!
//! Cross-crate flows that unit tests inside each crate cannot cover.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── fixtures.rs         # Wallet and ledger simulators
//!     ├── commit_flows.rs     # lp-01 over shared-bus
//!     └── lifecycle_flows.rs  # lp-02 driven through time
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p lp-tests
//! cargo test -p lp-tests integration::commit_flows::
//! ```

#![allow(dead_code)]

pub mod integration;
