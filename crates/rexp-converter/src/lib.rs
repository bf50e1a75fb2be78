//! Conversion of deserialized R model objects into model documents.
//!
//! A converter wraps one fitted model, given as an [`rexp`] record tree. The
//! [`convert`] driver asks it to declare its label and features on an
//! [`Encoder`], derives a [`Schema`], and then asks it for the [`Model`].
//!
//! Two model families are supported:
//!
//! - [`GlmNetConverter`]: `elnet` and `lognet` fits from glmnet, decoded from
//!   the sparse coefficient path at the selected penalty.
//! - [`XGBoostConverter`]: `xgb.Booster` ensembles, with the feature map
//!   loaded from a file or an inline table and the learner decoded by a
//!   caller supplied [`LearnerLoader`].
//!
//! # Example
//!
//! ```
//! use rexp::{Attributes, RDoubleVector, RExp, RGenericVector, RIntegerVector, RStringVector, S4Object};
//! use rexp_converter::{convert, DocumentEncoder, GlmNetConverter, Model};
//!
//! let dimnames = RGenericVector::from_values(vec![
//!     RStringVector::from_values(vec!["x1".into(), "x2".into()]).into(),
//!     RExp::Null,
//! ]);
//! let beta = S4Object::new(
//!     Attributes::new()
//!         .with("Dim", RIntegerVector::from_values(vec![2, 1]))
//!         .with("Dimnames", dimnames)
//!         .with("i", RIntegerVector::from_values(vec![1]))
//!         .with("p", RIntegerVector::from_values(vec![0, 1]))
//!         .with("x", RDoubleVector::from_values(vec![0.5])),
//! );
//! let fit = RGenericVector::named([
//!     ("a0", RDoubleVector::from_values(vec![3.0]).into()),
//!     ("beta", beta.into()),
//!     ("lambda", RDoubleVector::from_values(vec![0.1]).into()),
//!     ("lambda.s", RDoubleVector::from_values(vec![0.1]).into()),
//! ]);
//!
//! let document = convert(&mut GlmNetConverter::elnet(&fit), &mut DocumentEncoder::new()).unwrap();
//! let Model::Regression(model) = &document.model else { unreachable!() };
//! assert_eq!(model.tables[0].intercept, 3.0);
//! assert_eq!(model.tables[0].terms.len(), 1);
//! assert_eq!(document.mining_schema, vec!["_target", "x1", "x2"]);
//! ```

mod converter;
mod encoder;
mod error;
mod feature_map;
mod glmnet;
mod learner;
mod model;
mod options;
mod schema;
mod verification;
mod xgboost;

pub use converter::{convert, convert_with_verification, ModelConverter, Stage};
pub use encoder::{DocumentEncoder, Encoder, Header, ModelDocument};
pub use error::{ConversionError, ErrorKind, Result};
pub use feature_map::{Entry, EntryType, FeatureMap};
pub use glmnet::{
    select_column, CoefficientModelBuilder, CscMatrix, ElnetBuilder, GlmNetConverter,
    LognetBuilder, PathColumn, TARGET_FIELD,
};
pub use learner::{
    parse_objective, ClassificationObjective, Learner, LearnerLoader, ObjFunction,
    RegressionObjective,
};
pub use model::{
    MiningFunction, MiningModel, MiningOptions, Model, Normalization, NumericTerm,
    RegressionModel, RegressionTable,
};
pub use options::{ConverterOptions, OPTION_COMPACT};
pub use schema::{DataField, DataType, Feature, Label, OpType, Schema};
pub use verification::VerificationData;
pub use xgboost::{XGBoostConverter, DEFAULT_TARGET_FIELD};
