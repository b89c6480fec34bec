//! Boundary to the outside world: network, files, environment and host
//! configuration. The dispatcher turns every `Err` from here into an
//! `Error` value so one failing call does not abort the whole program.

use indexmap::IndexMap;
use std::path::Path;

use super::error::JustcError;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub text: String,
    pub status: u16,
    pub headers: IndexMap<String, String>,
}

pub trait Capabilities {
    fn fetch(
        &self,
        url: &str,
        method: &str,
        headers: &IndexMap<String, String>,
        body: Option<&str>,
    ) -> Result<FetchResponse, JustcError>;

    fn read_file(&self, path: &str) -> Result<String, JustcError>;

    fn file_size(&self, path: &str) -> Result<u64, JustcError>;

    /// `Ok(None)` when the variable is not set.
    fn env(&self, key: &str) -> Result<Option<String>, JustcError>;

    fn config(&self, key: &str) -> Result<Value, JustcError>;
}

/// Refuses everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledCapabilities;

impl Capabilities for DisabledCapabilities {
    fn fetch(
        &self,
        _url: &str,
        _method: &str,
        _headers: &IndexMap<String, String>,
        _body: Option<&str>,
    ) -> Result<FetchResponse, JustcError> {
        Err(JustcError::capability_disabled("Network access"))
    }

    fn read_file(&self, _path: &str) -> Result<String, JustcError> {
        Err(JustcError::capability_disabled("File access"))
    }

    fn file_size(&self, _path: &str) -> Result<u64, JustcError> {
        Err(JustcError::capability_disabled("File access"))
    }

    fn env(&self, _key: &str) -> Result<Option<String>, JustcError> {
        Err(JustcError::capability_disabled("Environment access"))
    }

    fn config(&self, _key: &str) -> Result<Value, JustcError> {
        Err(JustcError::capability_disabled("Configuration access"))
    }
}

/// Local files and environment through `std`, configuration from an
/// in-memory map. There is no HTTP transport.
#[derive(Debug, Clone, Default)]
pub struct SystemCapabilities {
    config: IndexMap<String, Value>,
}

impl SystemCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IndexMap<String, Value>) -> Self {
        Self { config }
    }

    /// Load configuration from a JSON object file.
    pub fn from_config_file(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let json: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| format!("Invalid config file {}: {}", path.display(), e))?;
        match crate::format::json_to_value(json) {
            Value::JsonObject(map) => Ok(Self::with_config(map)),
            _ => Err(format!("Config file {} must contain a JSON object", path.display())),
        }
    }
}

impl Capabilities for SystemCapabilities {
    fn fetch(
        &self,
        _url: &str,
        _method: &str,
        _headers: &IndexMap<String, String>,
        _body: Option<&str>,
    ) -> Result<FetchResponse, JustcError> {
        Err(JustcError::capability_disabled("Network access"))
    }

    fn read_file(&self, path: &str) -> Result<String, JustcError> {
        std::fs::read_to_string(path)
            .map_err(|e| JustcError::invalid_argument_at(format!("Failed to read {}: {}", path, e), 0))
    }

    fn file_size(&self, path: &str) -> Result<u64, JustcError> {
        std::fs::metadata(path)
            .map(|meta| meta.len())
            .map_err(|e| JustcError::invalid_argument_at(format!("Failed to stat {}: {}", path, e), 0))
    }

    fn env(&self, key: &str) -> Result<Option<String>, JustcError> {
        Ok(std::env::var(key).ok())
    }

    fn config(&self, key: &str) -> Result<Value, JustcError> {
        self.config
            .get(key)
            .cloned()
            .ok_or_else(|| JustcError::invalid_argument_at(format!("No configuration value for {}", key), 0))
    }
}
