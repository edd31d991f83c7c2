//! gp-gas: gas-state evaluation for gaspath.
//!
//! Provides:
//! - Species definitions for facility gases (air, N2, He, Ar, ...)
//! - Composition handling (pure gases and ideal mixtures)
//! - Gas identity (`Gas`) and the immutable `GasState` snapshot
//! - `GasModel` trait: the capability set the gas path engine consumes
//! - A calorically-perfect backend (`PerfectGasModel`)
//!
//! # Architecture
//!
//! The engine only talks to `GasModel`. Equilibrium-chemistry backends can be
//! added behind the same trait; the perfect-gas model is the reference
//! implementation and the one the closed-form checks are written against.
//!
//! # Example
//!
//! ```
//! use gp_gas::{Gas, GasModel, PerfectGasModel, Species};
//! use gp_core::units::{k, mps, pa};
//!
//! let model = PerfectGasModel::new();
//! let air = Gas::pure(Species::Air);
//! let fill = model.state_from_pt(pa(1000.0), k(300.0), &air).unwrap();
//! let jump = model.shock_jump(&fill, mps(1500.0)).unwrap();
//! assert!(jump.state.pressure().value > fill.pressure().value);
//! ```

pub mod composition;
pub mod error;
pub mod gas;
pub mod model;
pub mod perfect;
pub mod species;
pub mod state;

// Re-exports for ergonomics
pub use composition::Composition;
pub use error::{GasError, GasResult};
pub use gas::{Gas, GasKind};
pub use model::{GasModel, ShockJump};
pub use perfect::PerfectGasModel;
pub use species::Species;
pub use state::{GasState, NamedState, StateParts};
