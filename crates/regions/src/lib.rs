//! Province and city/regency lookup for the sketchform form.
//!
//! Provides the [`RegionSource`] port with a reqwest-backed HTTP
//! implementation, and the [`RegionCache`] that serves the two-level
//! hierarchy with cache-or-fetch semantics, a fetch timeout, and an offline
//! fallback for the top level.

pub mod cache;
pub mod error;
pub mod source;

pub use cache::{RegionCache, RegionStats, SubRegionMatch};
pub use error::RegionFetchError;
pub use source::{HttpRegionSource, RegionSource};
