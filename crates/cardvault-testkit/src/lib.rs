//! # Cardvault Testkit
//!
//! Testing utilities for Cardvault.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Helper structs for setting up stores and protocols
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! ```rust
//! use cardvault_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! let protocol = fixture.protocol();
//! let card = fixture.full_card("Ada Lovelace");
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use cardvault_core::filter;
//! use cardvault_testkit::generators::{card, sharing_level};
//!
//! proptest! {
//!     #[test]
//!     fn filter_is_idempotent(card in card(), level in sharing_level()) {
//!         let once = filter(&card, level);
//!         prop_assert_eq!(filter(&once, level), once);
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{FailingFixture, TestFixture};
