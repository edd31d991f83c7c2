//! Flat parameter mapping, layering and typed access.

use std::collections::BTreeMap;

use serde_yaml::Value;

use crate::{ProjectError, ProjectResult};

pub type ParamMap = BTreeMap<String, Value>;

/// Built-in defaults, the lowest configuration layer.
pub const DEFAULTS_YAML: &str = include_str!("defaults.yaml");

/// String value that clears a parameter.
pub const NONE_SENTINEL: &str = "None";

/// Parse one YAML layer into a flat mapping.
///
/// An empty document is an empty layer. `None` strings become null so that a
/// later layer can clear a value set by an earlier one.
pub fn parse_layer(content: &str) -> ProjectResult<ParamMap> {
    let blank = content.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with('#')
    });
    if blank {
        return Ok(ParamMap::new());
    }
    let doc: Value = serde_yaml::from_str(content)?;
    let mapping = match doc {
        Value::Null => return Ok(ParamMap::new()),
        Value::Mapping(m) => m,
        _ => {
            return Err(ProjectError::invalid(
                "<document>",
                "a condition file must be a mapping of parameter names to values",
            ));
        }
    };

    let mut map = ParamMap::new();
    for (key, value) in mapping {
        let key = match key {
            Value::String(s) => s,
            other => {
                return Err(ProjectError::invalid(
                    format!("{other:?}"),
                    "parameter names must be strings",
                ));
            }
        };
        map.insert(key, normalise(value));
    }
    Ok(map)
}

pub fn defaults() -> ProjectResult<ParamMap> {
    parse_layer(DEFAULTS_YAML)
}

fn normalise(value: Value) -> Value {
    match value {
        Value::String(s) if s == NONE_SENTINEL => Value::Null,
        other => other,
    }
}

/// Merge layers in order; later layers win key by key.
pub fn merge<I>(layers: I) -> ParamMap
where
    I: IntoIterator<Item = ParamMap>,
{
    let mut merged = ParamMap::new();
    for layer in layers {
        merged.extend(layer);
    }
    merged
}

/// Parse a `key=value` override. The value is read as YAML, so numbers,
/// booleans, lists and mappings keep their types.
pub fn parse_override(entry: &str) -> ProjectResult<(String, Value)> {
    let (key, raw) = entry.split_once('=').ok_or_else(|| ProjectError::Override {
        entry: entry.to_string(),
    })?;
    let key = key.trim();
    if key.is_empty() {
        return Err(ProjectError::Override {
            entry: entry.to_string(),
        });
    }
    let raw = raw.trim();
    let value = serde_yaml::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
    Ok((key.to_string(), normalise(value)))
}

/// Merged parameters with cleared values removed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    map: ParamMap,
}

impl Params {
    pub fn new(map: ParamMap) -> Self {
        let map = map
            .into_iter()
            .filter(|(_, v)| !v.is_null())
            .collect();
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.map.keys().map(String::as_str)
    }

    pub fn str(&self, key: &str) -> ProjectResult<Option<&str>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ProjectError::invalid(key, "expected a string")),
        }
    }

    pub fn require_str(&self, key: &str) -> ProjectResult<&str> {
        self.str(key)?.ok_or_else(|| ProjectError::missing(key))
    }

    pub fn f64(&self, key: &str) -> ProjectResult<Option<f64>> {
        self.get(key).map(|v| value_to_f64(key, v)).transpose()
    }

    pub fn require_f64(&self, key: &str) -> ProjectResult<f64> {
        self.f64(key)?.ok_or_else(|| ProjectError::missing(key))
    }

    pub fn bool(&self, key: &str) -> ProjectResult<Option<bool>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.to_ascii_lowercase().as_str() {
                "true" | "yes" => Ok(Some(true)),
                "false" | "no" => Ok(Some(false)),
                _ => Err(ProjectError::invalid(key, "expected true or false")),
            },
            Some(_) => Err(ProjectError::invalid(key, "expected true or false")),
        }
    }

    pub fn usize(&self, key: &str) -> ProjectResult<Option<usize>> {
        match self.get(key) {
            None => Ok(None),
            Some(v) => v
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(Some)
                .ok_or_else(|| ProjectError::invalid(key, "expected a non-negative integer")),
        }
    }

    /// A number, or the name of another numeric parameter (`T_0`, `p_0`).
    pub fn f64_or_alias(&self, key: &str, aliases: &[&str]) -> ProjectResult<Option<f64>> {
        match self.get(key) {
            Some(Value::String(s)) if aliases.contains(&s.as_str()) => {
                self.require_f64(s).map(Some)
            }
            _ => self.f64(key),
        }
    }
}

pub(crate) fn value_to_f64(key: &str, value: &Value) -> ProjectResult<f64> {
    let v = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match v {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(ProjectError::invalid(key, "expected a finite number")),
    }
}
