//! Elastic-net (`glmnet`) fits.
//!
//! A fit stores one coefficient column per value of the regularization path
//! `lambda`, packed in a `dgCMatrix` (compressed sparse column) S4 object.
//! Conversion picks the column whose `lambda` equals `lambda.s` exactly.

use rexp::{HasAttributes, RExpError, RGenericVector, RIntegerVector, RStringVector, S4Object};
use tracing::{debug, warn};

use crate::converter::ModelConverter;
use crate::encoder::Encoder;
use crate::model::{
    MiningFunction, Model, Normalization, NumericTerm, RegressionModel, RegressionTable,
};
use crate::schema::{DataType, Feature, Label, OpType, Schema};
use crate::{ConversionError, Result};

/// Name of the target field of every linear-path model.
pub const TARGET_FIELD: &str = "_target";

/// Compressed sparse column matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct CscMatrix {
    rows: usize,
    cols: usize,
    /// Row index of each stored value.
    i: Vec<usize>,
    /// Offsets into `i`/`x` where each column starts; `cols + 1` long.
    p: Vec<usize>,
    x: Vec<f64>,
}

impl CscMatrix {
    pub fn new(rows: usize, cols: usize, i: Vec<usize>, p: Vec<usize>, x: Vec<f64>) -> Result<Self> {
        if p.len() != cols + 1 {
            return Err(ConversionError::InconsistentDimension(format!(
                "expected {} column pointers, got {}",
                cols + 1,
                p.len()
            )));
        }
        if i.len() != x.len() {
            return Err(ConversionError::InconsistentDimension(format!(
                "{} row indexes for {} values",
                i.len(),
                x.len()
            )));
        }
        Ok(Self { rows, cols, i, p, x })
    }

    /// Reads the `Dim`, `i`, `p` and `x` slots of a `dgCMatrix`.
    pub fn from_s4(beta: &S4Object) -> Result<Self> {
        let dim = indexes("Dim", beta.get_integer_attribute("Dim")?)?;
        let &[rows, cols] = dim.as_slice() else {
            return Err(ConversionError::InconsistentDimension(format!(
                "'Dim' must hold 2 values, got {}",
                dim.len()
            )));
        };
        let i = indexes("i", beta.get_integer_attribute("i")?)?;
        let p = indexes("p", beta.get_integer_attribute("p")?)?;
        let x = beta.get_double_attribute("x")?.values().to_vec();
        Self::new(rows, cols, i, p, x)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Expands one column into a dense vector of length `rows`.
    ///
    /// Rows without a stored value are NaN, which is distinct from a stored
    /// zero.
    pub fn column(&self, col: usize) -> Result<Vec<f64>> {
        if col >= self.cols {
            return Err(ConversionError::InconsistentDimension(format!(
                "column {col} out of range for {} columns",
                self.cols
            )));
        }
        let (begin, end) = (self.p[col], self.p[col + 1]);
        if begin > end || end > self.i.len() {
            return Err(ConversionError::InconsistentDimension(format!(
                "column {col} spans [{begin}, {end}) of {} stored values",
                self.i.len()
            )));
        }

        let mut result = vec![f64::NAN; self.rows];
        for k in begin..end {
            let row = self.i[k];
            let slot = result.get_mut(row).ok_or_else(|| {
                ConversionError::InconsistentDimension(format!(
                    "row index {row} out of range for {} rows",
                    self.rows
                ))
            })?;
            *slot = self.x[k];
        }
        Ok(result)
    }
}

fn indexes(name: &str, vector: &RIntegerVector) -> Result<Vec<usize>> {
    vector
        .values()
        .iter()
        .map(|value| {
            value
                .and_then(|value| usize::try_from(value).ok())
                .ok_or_else(|| {
                    ConversionError::UnsupportedFormat(format!(
                        "'{name}' holds {value:?}, expected a non-negative index"
                    ))
                })
        })
        .collect()
}

/// Position of the first path value exactly equal to `lambda_s`.
pub fn select_column(lambda: &[f64], lambda_s: f64) -> Result<usize> {
    lambda
        .iter()
        .position(|value| *value == lambda_s)
        .ok_or_else(|| {
            ConversionError::InconsistentDimension(format!(
                "'lambda.s' value {lambda_s} is not on the regularization path"
            ))
        })
}

/// Builds the family-specific model from a decoded coefficient column.
pub trait CoefficientModelBuilder {
    fn build(
        &self,
        label: &Label,
        features: &[Feature],
        coefficients: &[f64],
        intercept: f64,
    ) -> Result<Model>;
}

/// Gaussian family: a single regression table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ElnetBuilder;

impl CoefficientModelBuilder for ElnetBuilder {
    fn build(
        &self,
        label: &Label,
        features: &[Feature],
        coefficients: &[f64],
        intercept: f64,
    ) -> Result<Model> {
        if !matches!(label, Label::Continuous { .. }) {
            return Err(ConversionError::Encoding(
                "elnet models require a continuous label".into(),
            ));
        }
        Ok(Model::Regression(RegressionModel {
            function: MiningFunction::Regression,
            normalization: Normalization::None,
            target: label.name().to_owned(),
            tables: vec![RegressionTable {
                intercept,
                target_category: None,
                terms: terms(features, coefficients)?,
            }],
        }))
    }
}

/// Binomial family: logit of the second class against the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct LognetBuilder;

impl CoefficientModelBuilder for LognetBuilder {
    fn build(
        &self,
        label: &Label,
        features: &[Feature],
        coefficients: &[f64],
        intercept: f64,
    ) -> Result<Model> {
        let [negative, positive] = label.categories().unwrap_or_default() else {
            return Err(ConversionError::Encoding(
                "lognet models require a categorical label with exactly 2 classes".into(),
            ));
        };
        Ok(Model::Regression(RegressionModel {
            function: MiningFunction::Classification,
            normalization: Normalization::Logit,
            target: label.name().to_owned(),
            tables: vec![
                RegressionTable {
                    intercept,
                    target_category: Some(positive.clone()),
                    terms: terms(features, coefficients)?,
                },
                RegressionTable {
                    intercept: 0.0,
                    target_category: Some(negative.clone()),
                    terms: vec![],
                },
            ],
        }))
    }
}

/// Pairs features with coefficients; NaN (no stored value) terms are dropped.
fn terms(features: &[Feature], coefficients: &[f64]) -> Result<Vec<NumericTerm>> {
    let mut terms = Vec::new();
    for (feature, coefficient) in features.iter().zip(coefficients) {
        if coefficient.is_nan() {
            continue;
        }
        match feature {
            Feature::Continuous { name, .. } => terms.push(NumericTerm {
                field: name.clone(),
                coefficient: *coefficient,
            }),
            Feature::Binary { name, value } => {
                return Err(ConversionError::Encoding(format!(
                    "linear terms must be continuous, got indicator '{name}={value}'"
                )))
            }
        }
    }
    Ok(terms)
}

/// Coefficients and intercept of one regularization-path column.
#[derive(Debug, Clone, PartialEq)]
pub struct PathColumn {
    pub column: usize,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

/// Converter for `glmnet` fits (`elnet`, `lognet`).
pub struct GlmNetConverter<'a, B> {
    glmnet: &'a RGenericVector,
    builder: B,
}

impl<'a> GlmNetConverter<'a, ElnetBuilder> {
    pub fn elnet(glmnet: &'a RGenericVector) -> Self {
        Self::new(glmnet, ElnetBuilder)
    }
}

impl<'a> GlmNetConverter<'a, LognetBuilder> {
    pub fn lognet(glmnet: &'a RGenericVector) -> Self {
        Self::new(glmnet, LognetBuilder)
    }
}

impl<'a, B: CoefficientModelBuilder> GlmNetConverter<'a, B> {
    pub fn new(glmnet: &'a RGenericVector, builder: B) -> Self {
        Self { glmnet, builder }
    }

    /// Selects the `lambda.s` column and decodes its coefficients.
    pub fn decode_path_column(&self) -> Result<PathColumn> {
        let glmnet = self.glmnet;

        let a0 = glmnet.get_double_element("a0")?;
        let beta: &S4Object = glmnet.get_typed_element("beta")?;
        let lambda = glmnet.get_double_element("lambda")?;
        let lambda_s = match glmnet.get_numeric_element("lambda.s") {
            Ok(lambda_s) => lambda_s.as_scalar()?,
            Err(err @ RExpError::MissingElement { .. }) => {
                warn!("no lambda value information");
                return Err(ConversionError::hinted(
                    err,
                    "no lambda value information, initialize the 'lambda.s' element",
                ));
            }
            Err(err) => return Err(err.into()),
        };

        let column = select_column(lambda.values(), lambda_s)?;
        let intercept = *a0.value(column)?;
        let coefficients = CscMatrix::from_s4(beta)?.column(column)?;
        debug!(column, lambda_s, rows = coefficients.len(), "decoded regularization path column");

        Ok(PathColumn {
            column,
            coefficients,
            intercept,
        })
    }
}

impl<B: CoefficientModelBuilder> ModelConverter for GlmNetConverter<'_, B> {
    fn encode_schema(&mut self, encoder: &mut dyn Encoder) -> Result<()> {
        let glmnet = self.glmnet;

        let beta: &S4Object = glmnet.get_typed_element("beta")?;
        let classnames = glmnet.get_string_element_opt("classnames")?;

        let label_field = match classnames {
            Some(classnames) => encoder.create_data_field(
                TARGET_FIELD,
                OpType::Categorical,
                DataType::String,
                classnames.values().to_vec(),
            )?,
            None => encoder.create_data_field(TARGET_FIELD, OpType::Continuous, DataType::Double, vec![])?,
        };
        encoder.set_label(Label::from_field(&label_field))?;

        let dimnames = beta.get_generic_attribute("Dimnames")?;
        let row_names: &RStringVector = dimnames.value(0)?.downcast("Dimnames")?;
        for row_name in row_names.values() {
            let field = encoder.create_data_field(row_name, OpType::Continuous, DataType::Double, vec![])?;
            encoder.add_feature(Feature::continuous(&field))?;
        }
        Ok(())
    }

    fn encode_model(&mut self, schema: &Schema) -> Result<Model> {
        let path = self.decode_path_column()?;
        let features = schema.features();
        if path.coefficients.len() != features.len() {
            return Err(ConversionError::InconsistentDimension(format!(
                "expected {} coefficients, got {}",
                features.len(),
                path.coefficients.len()
            )));
        }
        self.builder
            .build(schema.label(), features, &path.coefficients, path.intercept)
    }
}
