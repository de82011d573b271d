//! Domain building blocks shared by every sketchform crate.
//!
//! This crate has zero internal dependencies: region and record models,
//! notification types, colour parsing and the upload rules live here so the
//! HTTP layer and the stateful components agree on one vocabulary.

pub mod color;
pub mod error;
pub mod notification;
pub mod record;
pub mod region;
pub mod types;
pub mod upload;
