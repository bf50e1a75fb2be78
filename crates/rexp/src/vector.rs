//! Typed vectors.

use crate::{Attributes, RExp, RExpError};

/// An ordered, fixed-length sequence of values of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct RVector<T> {
    values: Vec<T>,
    attributes: Attributes,
}

/// Logical vector; `None` is `NA`.
pub type RBooleanVector = RVector<Option<bool>>;
/// Double vector; `NA` is represented as NaN.
pub type RDoubleVector = RVector<f64>;
pub type RStringVector = RVector<String>;
pub type RRaw = RVector<u8>;
/// Heterogeneous list of records.
pub type RGenericVector = RVector<RExp>;

impl<T> RVector<T> {
    pub fn new(values: Vec<T>, attributes: Attributes) -> Self {
        Self { values, attributes }
    }

    pub fn from_values(values: Vec<T>) -> Self {
        Self::new(values, Attributes::new())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Result<&T, RExpError> {
        self.values.get(index).ok_or(RExpError::IndexOutOfBounds {
            index,
            len: self.values.len(),
        })
    }

    /// Returns the only value of a length-one vector.
    pub fn as_scalar(&self) -> Result<&T, RExpError> {
        match self.values.as_slice() {
            [value] => Ok(value),
            _ => Err(RExpError::NotScalar {
                len: self.values.len(),
            }),
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Integer vector with optional factor encoding.
///
/// When `levels` is present every code is a 0-based index into it.
#[derive(Debug, Clone, PartialEq)]
pub struct RIntegerVector {
    values: Vec<Option<i32>>,
    levels: Option<Vec<String>>,
    attributes: Attributes,
}

impl RIntegerVector {
    pub fn new(values: Vec<Option<i32>>, attributes: Attributes) -> Self {
        Self {
            values,
            levels: None,
            attributes,
        }
    }

    pub fn from_values(values: Vec<i32>) -> Self {
        Self::new(values.into_iter().map(Some).collect(), Attributes::new())
    }

    /// Creates a factor-encoded vector.
    pub fn factor(codes: Vec<Option<i32>>, levels: Vec<String>, attributes: Attributes) -> Self {
        Self {
            values: codes,
            levels: Some(levels),
            attributes,
        }
    }

    /// Builds a factor from per-row labels. Levels are assigned in order of
    /// first appearance; `None` rows stay unset.
    pub fn from_factor_labels(labels: Vec<Option<String>>) -> Self {
        let mut levels: Vec<String> = Vec::new();
        let codes = labels
            .into_iter()
            .map(|label| {
                label.map(|label| match levels.iter().position(|level| *level == label) {
                    Some(code) => code as i32,
                    None => {
                        levels.push(label);
                        (levels.len() - 1) as i32
                    }
                })
            })
            .collect();
        Self::factor(codes, levels, Attributes::new())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Option<i32>] {
        &self.values
    }

    pub fn value(&self, index: usize) -> Result<Option<i32>, RExpError> {
        self.values
            .get(index)
            .copied()
            .ok_or(RExpError::IndexOutOfBounds {
                index,
                len: self.values.len(),
            })
    }

    pub fn as_scalar(&self) -> Result<Option<i32>, RExpError> {
        match self.values.as_slice() {
            [value] => Ok(*value),
            _ => Err(RExpError::NotScalar {
                len: self.values.len(),
            }),
        }
    }

    pub fn is_factor(&self) -> bool {
        self.levels.is_some()
    }

    pub fn levels(&self) -> Option<&[String]> {
        self.levels.as_deref()
    }

    /// Dereferences the code at `index` against the factor levels.
    pub fn factor_value(&self, index: usize) -> Result<Option<&str>, RExpError> {
        let levels = self.levels.as_ref().ok_or(RExpError::NotFactor)?;
        match self.value(index)? {
            None => Ok(None),
            Some(code) => usize::try_from(code)
                .ok()
                .and_then(|code| levels.get(code))
                .map(|level| Some(level.as_str()))
                .ok_or(RExpError::InvalidFactorCode {
                    code,
                    levels: levels.len(),
                }),
        }
    }

    pub fn factor_values(&self) -> Result<Vec<Option<&str>>, RExpError> {
        (0..self.values.len())
            .map(|index| self.factor_value(index))
            .collect()
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

/// Borrowed view over an integer or double vector.
#[derive(Debug, Clone, Copy)]
pub enum RNumberVector<'a> {
    Integer(&'a RIntegerVector),
    Double(&'a RDoubleVector),
}

impl RNumberVector<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(vector) => vector.len(),
            Self::Double(vector) => vector.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads a value widened to `f64`; integer `NA` becomes NaN.
    pub fn value(&self, index: usize) -> Result<f64, RExpError> {
        match self {
            Self::Integer(vector) => Ok(vector.value(index)?.map_or(f64::NAN, f64::from)),
            Self::Double(vector) => vector.value(index).copied(),
        }
    }

    pub fn as_scalar(&self) -> Result<f64, RExpError> {
        match self.len() {
            1 => self.value(0),
            len => Err(RExpError::NotScalar { len }),
        }
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            Self::Integer(vector) => vector
                .values()
                .iter()
                .map(|value| value.map_or(f64::NAN, f64::from))
                .collect(),
            Self::Double(vector) => vector.values().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn factor_codes_are_zero_based() {
        let vector = RIntegerVector::factor(
            vec![Some(1), Some(0), None],
            vec!["a".into(), "b".into()],
            Attributes::new(),
        );
        assert!(vector.is_factor());
        assert_eq!(vector.factor_value(0), Ok(Some("b")));
        assert_eq!(vector.factor_value(1), Ok(Some("a")));
        assert_eq!(vector.factor_value(2), Ok(None));
        assert_eq!(
            vector.factor_value(3),
            Err(RExpError::IndexOutOfBounds { index: 3, len: 3 })
        );
    }

    #[test]
    fn factor_code_outside_levels_is_rejected() {
        let vector = RIntegerVector::factor(vec![Some(2)], vec!["a".into()], Attributes::new());
        assert_eq!(
            vector.factor_value(0),
            Err(RExpError::InvalidFactorCode { code: 2, levels: 1 })
        );
        let plain = RIntegerVector::from_values(vec![0]);
        assert_eq!(plain.factor_value(0), Err(RExpError::NotFactor));
    }

    #[test]
    fn factor_from_labels_assigns_levels_in_first_seen_order() {
        let vector = RIntegerVector::from_factor_labels(vec![
            Some("green".into()),
            None,
            Some("red".into()),
            Some("green".into()),
        ]);
        assert_eq!(vector.levels(), Some(&["green".to_owned(), "red".to_owned()][..]));
        assert_eq!(vector.values(), &[Some(0), None, Some(1), Some(0)]);
        assert_eq!(
            vector.factor_values().unwrap(),
            vec![Some("green"), None, Some("red"), Some("green")]
        );
    }

    #[test]
    fn scalar_access_requires_exactly_one_value() {
        let one = RDoubleVector::from_values(vec![0.5]);
        assert_eq!(one.as_scalar(), Ok(&0.5));
        let two = RDoubleVector::from_values(vec![0.5, 1.0]);
        assert_eq!(two.as_scalar(), Err(RExpError::NotScalar { len: 2 }));
    }

    #[test]
    fn number_view_widens_integers() {
        let ints = RIntegerVector::new(vec![Some(3), None], Attributes::new());
        let view = RNumberVector::Integer(&ints);
        assert_eq!(view.value(0), Ok(3.0));
        assert!(view.value(1).unwrap().is_nan());
        assert_eq!(view.as_scalar(), Err(RExpError::NotScalar { len: 2 }));
    }
}
