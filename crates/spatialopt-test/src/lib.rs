//! Shared test fixtures for SpatialOpt crates.
//!
//! - [`coverage`] - Binary, partial and TRAUMAH coverage fixtures
//! - [`exhaustive`] - A brute-force [`Solver`](spatialopt_models::Solver) for
//!   small pure-integer problems
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! spatialopt-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```ignore
//! use spatialopt_test::coverage::single_facility;
//! use spatialopt_test::ExhaustiveSolver;
//! ```

pub mod coverage;
pub mod exhaustive;

pub use exhaustive::ExhaustiveSolver;
