//! gp-path: gas path assembly and evaluation.
//!
//! A [`GasPath`] is the ordered chain of facility stages for one facility
//! condition. Assembly is decided by [`FacilityFlags`] through a
//! [`Topology`]; evaluation is strictly sequential, each stage receiving its
//! predecessor's exit state, and every evaluated stage is indexed by role in
//! an [`ObjectRegistry`] that later tubes use to resolve guess references.

pub mod config;
pub mod error;
pub mod gas_path;
pub mod registry;
pub mod sweep;
pub mod topology;

pub use config::{FacilityConfig, Mode};
pub use error::{ErrorKind, PathError, PathResult};
pub use gas_path::GasPath;
pub use registry::{ObjectRegistry, RegistryEntry};
pub use sweep::{SweepPoint, run_sweep, vary};
pub use topology::{FacilityFlags, FacilityType, Topology};
