//! Attribute-tagged record model for deserialized R objects.
//!
//! A record tree is built once by a deserializer and is read-only afterwards.
//! Every node is an [`RExp`]: typed vectors, generic lists, S4 objects with
//! named slots, or `NULL`. Vector and S4 nodes carry an [`Attributes`] chain.
//!
//! # Example
//!
//! ```
//! use rexp::{HasAttributes, RDoubleVector, RExp, RGenericVector, RStringVector};
//!
//! let fit = RGenericVector::named([
//!     ("lambda", RDoubleVector::from_values(vec![0.1, 0.05]).into()),
//!     ("classnames", RStringVector::from_values(vec!["no".into(), "yes".into()]).into()),
//! ]);
//!
//! let lambda = fit.get_double_element("lambda").unwrap();
//! assert_eq!(lambda.values(), &[0.1, 0.05]);
//! assert_eq!(fit.names().unwrap().len(), 2);
//! assert!(fit.get_element_opt("a0").unwrap().is_none());
//! ```

mod attributes;
mod error;
mod generic;
mod rexp;
mod vector;

pub use attributes::Attributes;
pub use error::{RExpError, RKind};
pub use rexp::{HasAttributes, RExp, RExpCast, S4Object};
pub use vector::{
    RBooleanVector, RDoubleVector, RGenericVector, RIntegerVector, RNumberVector, RRaw,
    RStringVector, RVector,
};
