//! Tree-ensemble learners and their objective functions.
//!
//! Decoding a learner blob is left to a [`LearnerLoader`] implementation.
//! The objectives below cover label encoding, which depends only on the
//! objective name and class count.

use std::io::Read;

use crate::encoder::Encoder;
use crate::model::{MiningOptions, Model};
use crate::schema::{DataType, Label, OpType, Schema};
use crate::{ConversionError, Result};

/// Decides the label type of an ensemble.
pub trait ObjFunction {
    fn name(&self) -> &str;

    /// Declares the target field and returns the label built on it.
    fn encode_label(
        &self,
        target: &str,
        categories: Option<&[String]>,
        encoder: &mut dyn Encoder,
    ) -> Result<Label>;
}

/// A fitted tree ensemble.
pub trait Learner {
    fn objective(&self) -> &dyn ObjFunction;

    /// Adapts a generic schema to the shape the learner's encoder expects.
    fn to_family_schema(&self, schema: &Schema) -> Result<Schema> {
        Ok(schema.clone())
    }

    fn encode_mining_model(&self, options: &MiningOptions, schema: &Schema) -> Result<Model>;
}

/// Reconstructs a learner from its serialized form.
pub trait LearnerLoader {
    fn load_learner(&self, reader: &mut dyn Read) -> std::io::Result<Box<dyn Learner>>;
}

/// `reg:*` objectives: a continuous target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegressionObjective {
    name: String,
}

impl RegressionObjective {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ObjFunction for RegressionObjective {
    fn name(&self) -> &str {
        &self.name
    }

    fn encode_label(
        &self,
        target: &str,
        categories: Option<&[String]>,
        encoder: &mut dyn Encoder,
    ) -> Result<Label> {
        if categories.is_some() {
            return Err(ConversionError::Encoding(format!(
                "objective '{}' does not take target categories",
                self.name
            )));
        }
        let field = encoder.create_data_field(target, OpType::Continuous, DataType::Float, vec![])?;
        Ok(Label::from_field(&field))
    }
}

/// `binary:*` and `multi:*` objectives: a categorical target with a fixed
/// number of classes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationObjective {
    name: String,
    num_class: usize,
}

impl ClassificationObjective {
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            num_class: 2,
        }
    }

    pub fn multiclass(name: impl Into<String>, num_class: usize) -> Self {
        Self {
            name: name.into(),
            num_class,
        }
    }

    pub fn num_class(&self) -> usize {
        self.num_class
    }
}

impl ObjFunction for ClassificationObjective {
    fn name(&self) -> &str {
        &self.name
    }

    /// Without explicit categories the classes are named `0..num_class`.
    fn encode_label(
        &self,
        target: &str,
        categories: Option<&[String]>,
        encoder: &mut dyn Encoder,
    ) -> Result<Label> {
        let (data_type, categories) = match categories {
            Some(categories) => (DataType::String, categories.to_vec()),
            None => (
                DataType::Integer,
                (0..self.num_class).map(|class| class.to_string()).collect(),
            ),
        };
        if categories.len() != self.num_class {
            return Err(ConversionError::InconsistentDimension(format!(
                "objective '{}' expects {} target categories, got {}",
                self.name,
                self.num_class,
                categories.len()
            )));
        }
        let field = encoder.create_data_field(target, OpType::Categorical, data_type, categories)?;
        Ok(Label::from_field(&field))
    }
}

/// Maps an objective name to its label encoder.
pub fn parse_objective(name: &str, num_class: usize) -> Result<Box<dyn ObjFunction>> {
    match name.split_once(':').map(|(family, _)| family) {
        Some("reg") | Some("count") | Some("survival") | Some("rank") => {
            Ok(Box::new(RegressionObjective::new(name)))
        }
        Some("binary") => Ok(Box::new(ClassificationObjective::binary(name))),
        Some("multi") => Ok(Box::new(ClassificationObjective::multiclass(name, num_class))),
        _ => Err(ConversionError::UnsupportedFormat(format!(
            "objective function '{name}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::DocumentEncoder;

    #[test]
    fn regression_label_is_continuous() {
        let mut encoder = DocumentEncoder::new();
        let objective = parse_objective("reg:squarederror", 0).unwrap();
        let label = objective.encode_label("mpg", None, &mut encoder).unwrap();
        assert_eq!(label.name(), "mpg");
        assert_eq!(label.categories(), None);
    }

    #[test]
    fn classification_label_defaults_to_class_indexes() {
        let mut encoder = DocumentEncoder::new();
        let objective = parse_objective("multi:softprob", 3).unwrap();
        let label = objective.encode_label("_target", None, &mut encoder).unwrap();
        assert_eq!(label.categories().unwrap(), ["0", "1", "2"]);
        assert_eq!(encoder.data_field("_target").unwrap().data_type, DataType::Integer);
    }

    #[test]
    fn classification_label_checks_category_count() {
        let mut encoder = DocumentEncoder::new();
        let objective = parse_objective("binary:logistic", 0).unwrap();
        let categories = vec!["a".to_owned(), "b".to_owned(), "c".to_owned()];
        let err = objective
            .encode_label("_target", Some(&categories), &mut encoder)
            .unwrap_err();
        assert!(matches!(err, ConversionError::InconsistentDimension(_)));
    }

    #[test]
    fn unknown_objective_is_unsupported() {
        assert!(matches!(
            parse_objective("rank-ish", 0).err(),
            Some(ConversionError::UnsupportedFormat(_))
        ));
    }
}
