//! Model representations carried by the final document.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MiningFunction {
    Regression,
    Classification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Normalization {
    None,
    Logit,
    Softmax,
}

/// A fitted model, ready to be wrapped into a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Model {
    Regression(RegressionModel),
    Mining(MiningModel),
}

impl Model {
    pub fn function(&self) -> MiningFunction {
        match self {
            Self::Regression(model) => model.function,
            Self::Mining(model) => model.function,
        }
    }

    pub fn target(&self) -> &str {
        match self {
            Self::Regression(model) => &model.target,
            Self::Mining(model) => &model.target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionModel {
    pub function: MiningFunction,
    pub normalization: Normalization,
    pub target: String,
    pub tables: Vec<RegressionTable>,
}

/// One linear predictor; classification models carry one per category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegressionTable {
    pub intercept: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_category: Option<String>,
    pub terms: Vec<NumericTerm>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericTerm {
    pub field: String,
    pub coefficient: f64,
}

/// Options forwarded to ensemble model encoders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningOptions {
    pub compact: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ntree_limit: Option<usize>,
}

impl Default for MiningOptions {
    fn default() -> Self {
        Self {
            compact: true,
            ntree_limit: None,
        }
    }
}

/// Ensemble model produced by a learner; `segmentation` is learner-defined.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MiningModel {
    pub function: MiningFunction,
    pub target: String,
    pub fields: Vec<String>,
    pub options: MiningOptions,
    pub segmentation: serde_json::Value,
}
