//! Job configuration handed to map and reduce functions.
//!
//! A [`Configuration`] is a flat set of string settings. It travels to the
//! application functions as the auxiliary [`Bytes`] argument, serialized
//! as JSON.

use anyhow::{anyhow, Result};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    settings: BTreeMap<String, String>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.settings.get(key).map(String::as_str)
    }

    /// Reads a setting as a filesystem path. A `file://` prefix is stripped.
    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key)
            .map(|v| PathBuf::from(v.strip_prefix("file://").unwrap_or(v)))
    }

    /// Serializes the configuration into the aux argument of a map or
    /// reduce function.
    pub fn to_aux(&self) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(self)?))
    }

    /// Reads a configuration back from an aux argument.
    /// An empty buffer yields an empty configuration.
    pub fn from_aux(aux: &[u8]) -> Result<Self> {
        if aux.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_slice(aux)?)
    }

    /// Builds a configuration from `key=value` strings, as given on the
    /// command line.
    pub fn from_pairs<S: AsRef<str>>(pairs: &[S]) -> Result<Self> {
        let mut conf = Self::new();
        for pair in pairs {
            let Setting(key, value) = pair.as_ref().parse::<Setting>()?;
            conf.set(key, value);
        }
        Ok(conf)
    }
}

/// A single `key=value` setting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Setting(pub String, pub String);

impl FromStr for Setting {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (key, value) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("Expected key=value, got `{}`", s))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(anyhow!("Empty key in setting `{}`", s));
        }
        Ok(Setting(key.to_string(), value.to_string()))
    }
}
