//! Fields, labels, features and the schema handed to model encoders.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpType {
    Continuous,
    Categorical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Double,
    Float,
    Integer,
    String,
    Boolean,
}

/// A field of the document's data dictionary.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataField {
    pub name: String,
    pub op_type: OpType,
    pub data_type: DataType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_value: Option<String>,
}

impl DataField {
    pub fn new(name: impl Into<String>, op_type: OpType, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            op_type,
            data_type,
            categories: Vec::new(),
            missing_value: None,
        }
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_missing_value(mut self, missing_value: Option<String>) -> Self {
        self.missing_value = missing_value;
        self
    }
}

/// The target of a model.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Label {
    Continuous {
        name: String,
        data_type: DataType,
    },
    Categorical {
        name: String,
        data_type: DataType,
        categories: Vec<String>,
    },
}

impl Label {
    /// Label view of a data field; categorical fields keep their categories.
    pub fn from_field(field: &DataField) -> Self {
        match field.op_type {
            OpType::Continuous => Self::Continuous {
                name: field.name.clone(),
                data_type: field.data_type,
            },
            OpType::Categorical => Self::Categorical {
                name: field.name.clone(),
                data_type: field.data_type,
                categories: field.categories.clone(),
            },
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Continuous { name, .. } | Self::Categorical { name, .. } => name,
        }
    }

    pub fn categories(&self) -> Option<&[String]> {
        match self {
            Self::Continuous { .. } => None,
            Self::Categorical { categories, .. } => Some(categories),
        }
    }
}

/// A model input derived from a data field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Feature {
    Continuous { name: String, data_type: DataType },
    /// Fires when the categorical field `name` equals `value`.
    Binary { name: String, value: String },
}

impl Feature {
    pub fn continuous(field: &DataField) -> Self {
        Self::Continuous {
            name: field.name.clone(),
            data_type: field.data_type,
        }
    }

    pub fn binary(field: &DataField, value: impl Into<String>) -> Self {
        Self::Binary {
            name: field.name.clone(),
            value: value.into(),
        }
    }

    /// Name of the underlying data field.
    pub fn name(&self) -> &str {
        match self {
            Self::Continuous { name, .. } | Self::Binary { name, .. } => name,
        }
    }
}

/// A label and the ordered features a model is encoded against.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    label: Label,
    features: Vec<Feature>,
}

impl Schema {
    pub fn new(label: Label, features: Vec<Feature>) -> Self {
        Self { label, features }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn with_label(&self, label: Label) -> Self {
        Self::new(label, self.features.clone())
    }

    pub fn with_features(&self, features: Vec<Feature>) -> Self {
        Self::new(self.label.clone(), features)
    }
}
