//! By-name element lookup over generic vectors.

use crate::rexp::{cast, cast_number};
use crate::{
    Attributes, HasAttributes, RDoubleVector, RExp, RExpCast, RExpError, RGenericVector,
    RIntegerVector, RKind, RNumberVector, RRaw, RStringVector, RVector,
};

impl RVector<RExp> {
    /// Builds a list whose `names` attribute labels each element.
    pub fn named<I, S>(elements: I) -> Self
    where
        I: IntoIterator<Item = (S, RExp)>,
        S: Into<String>,
    {
        let (names, values): (Vec<String>, Vec<RExp>) = elements
            .into_iter()
            .map(|(name, value)| (name.into(), value))
            .unzip();
        Self::new(
            values,
            Attributes::new().with("names", RStringVector::from_values(names)),
        )
    }

    /// Resolves an element through the `names` attribute; first match wins.
    ///
    /// A list without names has no named elements.
    pub fn get_element_opt(&self, name: &str) -> Result<Option<&RExp>, RExpError> {
        let Some(names) = self.get_string_attribute_opt("names")? else {
            return Ok(None);
        };
        match names.values().iter().position(|tag| tag == name) {
            Some(index) => self.value(index).map(Some),
            None => Ok(None),
        }
    }

    pub fn get_element(&self, name: &str) -> Result<&RExp, RExpError> {
        self.get_element_opt(name)?
            .ok_or_else(|| RExpError::MissingElement {
                name: name.to_owned(),
            })
    }

    pub fn has_element(&self, name: &str) -> bool {
        matches!(self.get_element_opt(name), Ok(Some(_)))
    }

    pub fn get_typed_element<T: RExpCast>(&self, name: &str) -> Result<&T, RExpError> {
        cast(name, self.get_element(name)?)
    }

    pub fn get_typed_element_opt<T: RExpCast>(&self, name: &str) -> Result<Option<&T>, RExpError> {
        self.get_element_opt(name)?
            .map(|rexp| cast(name, rexp))
            .transpose()
    }

    pub fn get_string_element(&self, name: &str) -> Result<&RStringVector, RExpError> {
        self.get_typed_element(name)
    }

    pub fn get_string_element_opt(&self, name: &str) -> Result<Option<&RStringVector>, RExpError> {
        self.get_typed_element_opt(name)
    }

    pub fn get_generic_element(&self, name: &str) -> Result<&RGenericVector, RExpError> {
        self.get_typed_element(name)
    }

    pub fn get_generic_element_opt(&self, name: &str) -> Result<Option<&RGenericVector>, RExpError> {
        self.get_typed_element_opt(name)
    }

    pub fn get_double_element(&self, name: &str) -> Result<&RDoubleVector, RExpError> {
        self.get_typed_element(name)
    }

    pub fn get_integer_element(&self, name: &str) -> Result<&RIntegerVector, RExpError> {
        self.get_typed_element(name)
    }

    pub fn get_raw_element(&self, name: &str) -> Result<&RRaw, RExpError> {
        self.get_typed_element(name)
    }

    /// Integer or double element.
    pub fn get_numeric_element(&self, name: &str) -> Result<RNumberVector<'_>, RExpError> {
        cast_number(name, self.get_element(name)?)
    }

    pub fn get_numeric_element_opt(&self, name: &str) -> Result<Option<RNumberVector<'_>>, RExpError> {
        self.get_element_opt(name)?
            .map(|rexp| cast_number(name, rexp))
            .transpose()
    }

    /// Any vector element; `NULL` and S4 objects are rejected.
    pub fn get_vector_element(&self, name: &str) -> Result<&RExp, RExpError> {
        let rexp = self.get_element(name)?;
        if rexp.is_vector() {
            Ok(rexp)
        } else {
            Err(RExpError::type_mismatch(name, RKind::Vector, rexp.kind()))
        }
    }

    pub fn get_vector_element_opt(&self, name: &str) -> Result<Option<&RExp>, RExpError> {
        match self.get_element_opt(name)? {
            Some(rexp) if !rexp.is_vector() => {
                Err(RExpError::type_mismatch(name, RKind::Vector, rexp.kind()))
            }
            other => Ok(other),
        }
    }
}
