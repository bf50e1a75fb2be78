//! Converter options.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{ConversionError, Result};

/// Generate compact tree models (`bool`, default `true`).
pub const OPTION_COMPACT: &str = "compact";

/// String-keyed converter options.
///
/// Options are untyped until read; [`ConverterOptions::get_option`] decodes a
/// value into the type the caller asks for and falls back to a default when
/// the option is absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConverterOptions {
    values: Map<String, Value>,
}

impl ConverterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Parses options from a JSON object.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let values: Map<String, Value> =
            serde_json::from_str(input).map_err(|err| ConversionError::Options {
                name: "<json>".into(),
                message: err.to_string(),
            })?;
        Ok(Self { values })
    }

    /// Parses options from a TOML table.
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let values: Map<String, Value> =
            toml::from_str(input).map_err(|err| ConversionError::Options {
                name: "<toml>".into(),
                message: err.to_string(),
            })?;
        Ok(Self { values })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn get_option<T: DeserializeOwned>(&self, name: &str, default: T) -> Result<T> {
        match self.values.get(name) {
            None => Ok(default),
            Some(value) => {
                serde_json::from_value(value.clone()).map_err(|err| ConversionError::Options {
                    name: name.to_owned(),
                    message: err.to_string(),
                })
            }
        }
    }
}
