//! gp-project: facility condition files.
//!
//! A facility condition is a flat parameter mapping built from three layers:
//! the built-in defaults, a user YAML file and explicit `key=value`
//! overrides, later layers winning. The string `None` clears a value. The
//! merged mapping, together with an optional facility geometry file, is
//! converted into a typed [`FacilityConfig`].

pub mod convert;
pub mod geometry;
pub mod params;
pub mod report;

use std::path::{Path, PathBuf};

pub use convert::{facility_config, gas_model, parse_guess};
pub use geometry::{FacilityGeometry, TubeGeometry};
pub use params::{DEFAULTS_YAML, NONE_SENTINEL, ParamMap, Params, defaults, merge, parse_override};
pub use report::{OutputReport, PathReport, StageReport, StateReport};

use gp_gas::{GasError, GasModel};
use gp_path::{FacilityConfig, PathError, Topology};
use tracing::{info, warn};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Missing parameter: {key}")]
    Missing { key: String },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Invalid override '{entry}', expected key=value")]
    Override { entry: String },

    #[error("Facility geometry error: {what}")]
    Geometry { what: String },

    #[error("Gas error: {0}")]
    Gas(#[from] GasError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProjectError {
    pub(crate) fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ProjectError::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing(key: impl Into<String>) -> Self {
        ProjectError::Missing { key: key.into() }
    }
}

impl From<ProjectError> for PathError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::Path(e) => e,
            other => PathError::configuration(None, other.to_string()),
        }
    }
}

/// A fully layered facility condition, ready for conversion.
#[derive(Debug, Clone)]
pub struct Condition {
    layers: ParamMap,
    base_dir: Option<PathBuf>,
    params: Params,
    geometry: Option<FacilityGeometry>,
}

impl Condition {
    /// Layer defaults, the file at `path` (if any) and `overrides`.
    pub fn load(path: Option<&Path>, overrides: &[String]) -> ProjectResult<Self> {
        let user = match path {
            Some(p) => {
                info!(path = %p.display(), "loading condition file");
                let content = std::fs::read_to_string(p)?;
                params::parse_layer(&content)?
            }
            None => ParamMap::new(),
        };
        let mut cli = ParamMap::new();
        for entry in overrides {
            let (key, value) = parse_override(entry)?;
            cli.insert(key, value);
        }
        let base_dir = path.and_then(Path::parent).map(Path::to_path_buf);
        Self::from_layers(merge([defaults()?, user, cli]), base_dir)
    }

    /// Build from a mapping already merged over the defaults.
    ///
    /// A relative `facility_file` is resolved against `base_dir`.
    pub fn from_layers(layers: ParamMap, base_dir: Option<PathBuf>) -> ProjectResult<Self> {
        let params = Params::new(layers.clone());
        let geometry = match params.str("facility_file")? {
            Some(file) => {
                let mut path = PathBuf::from(file);
                if path.is_relative() {
                    if let Some(dir) = &base_dir {
                        path = dir.join(path);
                    }
                }
                Some(FacilityGeometry::load(&path)?)
            }
            None => None,
        };
        Ok(Self {
            layers,
            base_dir,
            params,
            geometry,
        })
    }

    /// Parse a YAML string layered over the defaults.
    pub fn from_yaml_str(content: &str) -> ProjectResult<Self> {
        Self::from_layers(merge([defaults()?, params::parse_layer(content)?]), None)
    }

    /// A copy of this condition with one more override applied.
    pub fn with_override(&self, key: &str, raw: &str) -> ProjectResult<Self> {
        let (key, value) = parse_override(&format!("{key}={raw}"))?;
        let mut layers = self.layers.clone();
        layers.insert(key, value);
        Self::from_layers(layers, self.base_dir.clone())
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn geometry(&self) -> Option<&FacilityGeometry> {
        self.geometry.as_ref()
    }

    pub fn facility_config(&self) -> ProjectResult<FacilityConfig> {
        if self.geometry.is_none() {
            warn!("no facility geometry given, tube lengths and diameters are not reported");
        }
        facility_config(&self.params, self.geometry.as_ref())
    }

    pub fn gas_model(&self) -> ProjectResult<Box<dyn GasModel>> {
        gas_model(&self.params)
    }

    /// Stage sequence this condition would assemble.
    pub fn topology(&self) -> ProjectResult<Topology> {
        let config = self.facility_config()?;
        let topology = Topology::assemble(config.flags);
        topology.validate()?;
        Ok(topology)
    }
}
