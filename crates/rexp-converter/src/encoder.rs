//! Schema encoders and the final model document.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::model::Model;
use crate::schema::{DataField, DataType, Feature, Label, OpType, Schema};
use crate::verification::VerificationData;
use crate::{ConversionError, Result};

/// Collects the label and features a converter declares, then wraps the
/// encoded model into a document.
pub trait Encoder {
    /// Registers a data field; names must be unique.
    fn add_data_field(&mut self, field: DataField) -> Result<()>;

    fn set_label(&mut self, label: Label) -> Result<()>;

    fn add_feature(&mut self, feature: Feature) -> Result<()>;

    /// Derives the schema from the label and features declared so far.
    fn create_schema(&mut self) -> Result<Schema>;

    fn encode_document(&mut self, model: Model) -> Result<ModelDocument>;

    fn create_data_field(
        &mut self,
        name: &str,
        op_type: OpType,
        data_type: DataType,
        categories: Vec<String>,
    ) -> Result<DataField> {
        let field = DataField::new(name, op_type, data_type).with_categories(categories);
        self.add_data_field(field.clone())?;
        Ok(field)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Header {
    pub application: String,
    pub version: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            application: env!("CARGO_PKG_NAME").to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
        }
    }
}

/// Transport-neutral model document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDocument {
    pub header: Header,
    pub data_dictionary: Vec<DataField>,
    /// Names of the fields the model reads, target first.
    pub mining_schema: Vec<String>,
    pub model: Model,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationData>,
}

impl ModelDocument {
    pub fn with_verification(mut self, verification: VerificationData) -> Self {
        self.verification = Some(verification);
        self
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| ConversionError::Encoding(err.to_string()))
    }
}

/// Default [`Encoder`]: a data dictionary plus the declared label and features.
#[derive(Debug, Default)]
pub struct DocumentEncoder {
    header: Header,
    data_fields: IndexMap<String, DataField>,
    label: Option<Label>,
    features: Vec<Feature>,
}

impl DocumentEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header(header: Header) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    pub fn data_field(&self, name: &str) -> Option<&DataField> {
        self.data_fields.get(name)
    }

    pub fn data_fields(&self) -> impl Iterator<Item = &DataField> {
        self.data_fields.values()
    }

    fn check_declared(&self, name: &str) -> Result<()> {
        if self.data_fields.contains_key(name) {
            Ok(())
        } else {
            Err(ConversionError::Encoding(format!(
                "field '{name}' is not declared in the data dictionary"
            )))
        }
    }
}

impl Encoder for DocumentEncoder {
    fn add_data_field(&mut self, field: DataField) -> Result<()> {
        if self.data_fields.contains_key(&field.name) {
            return Err(ConversionError::Encoding(format!(
                "field '{}' is already declared",
                field.name
            )));
        }
        debug!(field = %field.name, op_type = ?field.op_type, data_type = ?field.data_type, "declared data field");
        self.data_fields.insert(field.name.clone(), field);
        Ok(())
    }

    fn set_label(&mut self, label: Label) -> Result<()> {
        if let Some(existing) = &self.label {
            return Err(ConversionError::Encoding(format!(
                "label is already set to '{}'",
                existing.name()
            )));
        }
        self.check_declared(label.name())?;
        self.label = Some(label);
        Ok(())
    }

    fn add_feature(&mut self, feature: Feature) -> Result<()> {
        self.check_declared(feature.name())?;
        self.features.push(feature);
        Ok(())
    }

    fn create_schema(&mut self) -> Result<Schema> {
        let label = self
            .label
            .clone()
            .ok_or_else(|| ConversionError::Encoding("label has not been set".into()))?;
        Ok(Schema::new(label, self.features.clone()))
    }

    fn encode_document(&mut self, model: Model) -> Result<ModelDocument> {
        let mut mining_schema = vec![model.target().to_owned()];
        for feature in &self.features {
            let name = feature.name();
            if !mining_schema.iter().any(|field| field == name) {
                mining_schema.push(name.to_owned());
            }
        }
        Ok(ModelDocument {
            header: self.header.clone(),
            data_dictionary: self.data_fields.values().cloned().collect(),
            mining_schema,
            model,
            verification: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MiningFunction, Normalization, RegressionModel};

    #[test]
    fn schema_requires_a_label() {
        let mut encoder = DocumentEncoder::new();
        let err = encoder.create_schema().unwrap_err();
        assert!(matches!(err, ConversionError::Encoding(_)));
    }

    #[test]
    fn duplicate_field_and_second_label_are_rejected() {
        let mut encoder = DocumentEncoder::new();
        let target = encoder
            .create_data_field("_target", OpType::Continuous, DataType::Double, vec![])
            .unwrap();
        assert!(encoder
            .create_data_field("_target", OpType::Continuous, DataType::Double, vec![])
            .is_err());
        encoder.set_label(Label::from_field(&target)).unwrap();
        assert!(encoder.set_label(Label::from_field(&target)).is_err());
    }

    #[test]
    fn features_must_reference_declared_fields() {
        let mut encoder = DocumentEncoder::new();
        let err = encoder
            .add_feature(Feature::Continuous {
                name: "x".into(),
                data_type: DataType::Double,
            })
            .unwrap_err();
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn document_lists_target_then_features() {
        let mut encoder = DocumentEncoder::new();
        let target = encoder
            .create_data_field("y", OpType::Continuous, DataType::Double, vec![])
            .unwrap();
        encoder.set_label(Label::from_field(&target)).unwrap();
        for name in ["a", "b"] {
            let field = encoder
                .create_data_field(name, OpType::Continuous, DataType::Double, vec![])
                .unwrap();
            encoder.add_feature(Feature::continuous(&field)).unwrap();
        }
        let schema = encoder.create_schema().unwrap();
        assert_eq!(schema.features().len(), 2);

        let model = Model::Regression(RegressionModel {
            function: MiningFunction::Regression,
            normalization: Normalization::None,
            target: "y".into(),
            tables: vec![],
        });
        let document = encoder.encode_document(model).unwrap();
        assert_eq!(document.mining_schema, vec!["y", "a", "b"]);
        assert_eq!(document.data_dictionary.len(), 3);
        assert!(document.to_json_string().unwrap().contains("\"dataDictionary\""));
    }
}
