//! gp-components: facility stages of an impulse facility.
//!
//! Provides models for the stages of a shock tube, expansion tube or
//! reflected shock tunnel:
//! - Driver with rupture and optional throat expansion
//! - Diaphragms (ideal, velocity loss, reflected shock)
//! - Tubes with a theoretical or measured shock speed
//! - Steady supersonic nozzle
//! - Test section with normal, oblique and conical shocks
//!
//! All stages implement [`FacilityComponent`]. Each is evaluated once, from
//! its configuration and the exit state of its predecessor.
//!
//! # Example
//!
//! ```no_run
//! use gp_components::{Driver, DriverConfig, FacilityComponent, RuptureCondition};
//! use gp_core::units::{k, pa};
//! use gp_gas::{Gas, PerfectGasModel, Species};
//!
//! let driver = Driver::evaluate(
//!     DriverConfig {
//!         gas: Gas::pure(Species::He),
//!         p_fill: pa(1.0e6),
//!         t_fill: k(300.0),
//!         rupture: RuptureCondition::Direct,
//!         m_throat: 0.0,
//!     },
//!     &PerfectGasModel,
//! )
//! .unwrap();
//! let p4 = driver.exit_state().state.pressure();
//! assert_eq!(p4.value, 1.0e6);
//! ```

pub mod common;
pub mod diaphragm;
pub mod driver;
pub mod error;
pub mod nozzle;
pub mod oblique;
pub mod test_section;
pub mod traits;
pub mod tube;

// Re-exports
pub use common::{ReflectedMach, ReflectedShock};
pub use diaphragm::{Diaphragm, DiaphragmModel};
pub use driver::{Driver, DriverConfig, RuptureCondition};
pub use error::{ComponentError, ComponentResult};
pub use nozzle::{DEFAULT_NOZZLE_TOLERANCE, Nozzle, NozzleConfig};
pub use test_section::{TestSection, TestSectionConfig};
pub use traits::{FacilityComponent, StageOutput};
pub use tube::{ExpandTo, Tube, TubeConfig, TubeExit, TubeMode, TubeStateNames};
