//! gp-core: stable foundation for gaspath.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + float helpers)
//! - roles (stage roles and referenceable stage fields)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod roles;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use roles::{StageField, StageKind, StageRole};
pub use units::*;
