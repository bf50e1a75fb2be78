//! Feature maps: the ordered input columns of a tree ensemble.
//!
//! Text form, one entry per line:
//!
//! ```text
//! <id>\t<name>\t<type>
//! ```
//!
//! where `<id>` counts up from 0 and `<type>` is `i` (binary indicator),
//! `q` (quantitative) or `int` (integer). Indicator names take the form
//! `field=category`; consecutive indicators of one field describe its
//! one-hot columns.

use std::io::BufRead;

use indexmap::IndexMap;
use tracing::debug;

use crate::encoder::Encoder;
use crate::schema::{DataField, DataType, Feature, OpType};
use crate::{ConversionError, Result};

/// Category of an indicator entry that declares none.
const DEFAULT_CATEGORY: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    BinaryIndicator,
    Float,
    Integer,
}

impl EntryType {
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "i" => Ok(Self::BinaryIndicator),
            "q" | "float" => Ok(Self::Float),
            "int" => Ok(Self::Integer),
            other => Err(ConversionError::UnsupportedFormat(format!(
                "feature type '{other}'"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BinaryIndicator => "i",
            Self::Float => "q",
            Self::Integer => "int",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    name: String,
    value: Option<String>,
    type_: EntryType,
}

impl Entry {
    pub fn new(name: impl Into<String>, value: Option<String>, type_: EntryType) -> Self {
        Self {
            name: name.into(),
            value,
            type_,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn entry_type(&self) -> EntryType {
        self.type_
    }

    /// The category an indicator entry stands for.
    pub fn category(&self) -> &str {
        self.value.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureMap {
    entries: Vec<Entry>,
    missing_value: Option<String>,
}

impl FeatureMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the text form. Ids must count up from 0 in line order.
    pub fn load<R: BufRead>(reader: R) -> Result<Self> {
        let mut feature_map = Self::new();
        for (line_no, line) in reader.lines().enumerate() {
            let line =
                line.map_err(|err| ConversionError::io("failed to read feature map", err))?;
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let mut columns = line.split('\t');
            let (Some(id), Some(name), Some(type_), None) =
                (columns.next(), columns.next(), columns.next(), columns.next())
            else {
                return Err(ConversionError::UnsupportedFormat(format!(
                    "feature map line {} must have 3 tab-separated columns",
                    line_no + 1
                )));
            };
            let expected = feature_map.entries.len();
            if id.trim().parse::<usize>().ok() != Some(expected) {
                return Err(ConversionError::InconsistentDimension(format!(
                    "feature map line {}: expected id {expected}, got '{id}'",
                    line_no + 1
                )));
            }
            feature_map.add_entry(name, type_)?;
        }
        debug!(entries = feature_map.len(), "parsed feature map");
        Ok(feature_map)
    }

    /// Appends an entry. Indicator names are split at the first `=` into a
    /// field name and a category.
    pub fn add_entry(&mut self, name: &str, type_: &str) -> Result<()> {
        let type_ = EntryType::parse(type_)?;
        let entry = match (type_, name.split_once('=')) {
            (EntryType::BinaryIndicator, Some((field, value))) => {
                Entry::new(field, Some(value.to_owned()), type_)
            }
            _ => Entry::new(name, None, type_),
        };
        self.entries.push(entry);
        Ok(())
    }

    /// Sets the value that encodes a missing input.
    pub fn add_missing_value(&mut self, value: impl Into<String>) {
        self.missing_value = Some(value.into());
    }

    pub fn missing_value(&self) -> Option<&str> {
        self.missing_value.as_deref()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Declares one data field per distinct field name and returns one
    /// feature per entry, in entry order.
    ///
    /// Indicator entries sharing a field name become binary features of a
    /// single categorical field whose categories are listed in entry order.
    pub fn encode_features(&self, encoder: &mut dyn Encoder) -> Result<Vec<Feature>> {
        let mut categories: IndexMap<&str, Vec<String>> = IndexMap::new();
        for entry in &self.entries {
            if entry.type_ == EntryType::BinaryIndicator {
                let values = categories.entry(entry.name()).or_default();
                if !values.iter().any(|value| value == entry.category()) {
                    values.push(entry.category().to_owned());
                }
            }
        }

        let mut fields: IndexMap<&str, DataField> = IndexMap::new();
        let mut features = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let feature = match entry.type_ {
                EntryType::BinaryIndicator => {
                    let field = match fields.get(entry.name()) {
                        Some(field) => field.clone(),
                        None => {
                            let field = self.declare(
                                encoder,
                                entry.name(),
                                OpType::Categorical,
                                DataType::String,
                                categories.get(entry.name()).cloned().unwrap_or_default(),
                            )?;
                            fields.insert(entry.name(), field.clone());
                            field
                        }
                    };
                    Feature::binary(&field, entry.category())
                }
                EntryType::Float | EntryType::Integer => {
                    let data_type = if entry.type_ == EntryType::Float {
                        DataType::Float
                    } else {
                        DataType::Integer
                    };
                    let field =
                        self.declare(encoder, entry.name(), OpType::Continuous, data_type, vec![])?;
                    fields.insert(entry.name(), field.clone());
                    Feature::continuous(&field)
                }
            };
            features.push(feature);
        }
        Ok(features)
    }

    fn declare(
        &self,
        encoder: &mut dyn Encoder,
        name: &str,
        op_type: OpType,
        data_type: DataType,
        categories: Vec<String>,
    ) -> Result<DataField> {
        let field = DataField::new(name, op_type, data_type)
            .with_categories(categories)
            .with_missing_value(self.missing_value.clone());
        encoder.add_data_field(field.clone())?;
        Ok(field)
    }
}
