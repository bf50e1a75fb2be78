//! The record node and its type-checked attribute accessors.

use crate::{
    Attributes, RBooleanVector, RDoubleVector, RExpError, RGenericVector, RIntegerVector, RKind,
    RNumberVector, RRaw, RStringVector,
};

/// A node of a deserialized R object tree.
#[derive(Debug, Clone, PartialEq)]
pub enum RExp {
    Null,
    Boolean(RBooleanVector),
    Integer(RIntegerVector),
    Double(RDoubleVector),
    String(RStringVector),
    Raw(RRaw),
    Generic(RGenericVector),
    S4(S4Object),
}

/// Tagged object whose attributes act as named slots.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct S4Object {
    attributes: Attributes,
}

impl S4Object {
    pub fn new(attributes: Attributes) -> Self {
        Self { attributes }
    }
}

impl RExp {
    pub fn kind(&self) -> RKind {
        match self {
            Self::Null => RKind::Null,
            Self::Boolean(_) => RKind::Boolean,
            Self::Integer(_) => RKind::Integer,
            Self::Double(_) => RKind::Double,
            Self::String(_) => RKind::String,
            Self::Raw(_) => RKind::Raw,
            Self::Generic(_) => RKind::Generic,
            Self::S4(_) => RKind::S4,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_vector(&self) -> bool {
        !matches!(self, Self::Null | Self::S4(_))
    }

    /// Number of values; `NULL` and S4 objects have none.
    pub fn len(&self) -> usize {
        match self {
            Self::Null | Self::S4(_) => 0,
            Self::Boolean(v) => v.len(),
            Self::Integer(v) => v.len(),
            Self::Double(v) => v.len(),
            Self::String(v) => v.len(),
            Self::Raw(v) => v.len(),
            Self::Generic(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_boolean_vector(&self) -> Option<&RBooleanVector> {
        match self {
            Self::Boolean(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_integer_vector(&self) -> Option<&RIntegerVector> {
        match self {
            Self::Integer(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double_vector(&self) -> Option<&RDoubleVector> {
        match self {
            Self::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_string_vector(&self) -> Option<&RStringVector> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_raw(&self) -> Option<&RRaw> {
        match self {
            Self::Raw(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_generic_vector(&self) -> Option<&RGenericVector> {
        match self {
            Self::Generic(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_s4_object(&self) -> Option<&S4Object> {
        match self {
            Self::S4(v) => Some(v),
            _ => None,
        }
    }

    /// Requires this record to be of kind `T`; `name` labels the error.
    pub fn downcast<T: RExpCast>(&self, name: &str) -> Result<&T, RExpError> {
        cast(name, self)
    }

    pub fn as_number_vector(&self) -> Option<RNumberVector<'_>> {
        match self {
            Self::Integer(v) => Some(RNumberVector::Integer(v)),
            Self::Double(v) => Some(RNumberVector::Double(v)),
            _ => None,
        }
    }

    /// Renders the single value of a scalar vector as text.
    ///
    /// Doubles with an integral value print without a fractional part.
    pub fn scalar_to_string(&self) -> Result<String, RExpError> {
        match self {
            Self::Boolean(v) => Ok(match v.as_scalar()? {
                Some(true) => "TRUE".to_owned(),
                Some(false) => "FALSE".to_owned(),
                None => "NA".to_owned(),
            }),
            Self::Integer(v) => Ok(v.as_scalar()?.map_or("NA".to_owned(), |x| x.to_string())),
            Self::Double(v) => Ok(format_double(*v.as_scalar()?)),
            Self::String(v) => Ok(v.as_scalar()?.clone()),
            other => Err(RExpError::type_mismatch("scalar", RKind::Vector, other.kind())),
        }
    }
}

fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Downcast from a record to one concrete kind.
pub trait RExpCast {
    const KIND: RKind;

    fn cast(rexp: &RExp) -> Option<&Self>;
}

impl RExpCast for RBooleanVector {
    const KIND: RKind = RKind::Boolean;

    fn cast(rexp: &RExp) -> Option<&Self> {
        rexp.as_boolean_vector()
    }
}

impl RExpCast for RIntegerVector {
    const KIND: RKind = RKind::Integer;

    fn cast(rexp: &RExp) -> Option<&Self> {
        rexp.as_integer_vector()
    }
}

impl RExpCast for RDoubleVector {
    const KIND: RKind = RKind::Double;

    fn cast(rexp: &RExp) -> Option<&Self> {
        rexp.as_double_vector()
    }
}

impl RExpCast for RStringVector {
    const KIND: RKind = RKind::String;

    fn cast(rexp: &RExp) -> Option<&Self> {
        rexp.as_string_vector()
    }
}

impl RExpCast for RRaw {
    const KIND: RKind = RKind::Raw;

    fn cast(rexp: &RExp) -> Option<&Self> {
        rexp.as_raw()
    }
}

impl RExpCast for RGenericVector {
    const KIND: RKind = RKind::Generic;

    fn cast(rexp: &RExp) -> Option<&Self> {
        rexp.as_generic_vector()
    }
}

impl RExpCast for S4Object {
    const KIND: RKind = RKind::S4;

    fn cast(rexp: &RExp) -> Option<&Self> {
        rexp.as_s4_object()
    }
}

pub(crate) fn cast<'a, T: RExpCast>(name: &str, rexp: &'a RExp) -> Result<&'a T, RExpError> {
    T::cast(rexp).ok_or_else(|| RExpError::type_mismatch(name, T::KIND, rexp.kind()))
}

pub(crate) fn cast_number<'a>(name: &str, rexp: &'a RExp) -> Result<RNumberVector<'a>, RExpError> {
    rexp.as_number_vector()
        .ok_or_else(|| RExpError::type_mismatch(name, RKind::Numeric, rexp.kind()))
}

/// Attribute access shared by every record kind.
///
/// Required lookups fail with [`RExpError::MissingAttribute`]; the `_opt`
/// variants return `None` instead. Typed lookups additionally fail with
/// [`RExpError::TypeMismatch`] when the attribute has another kind.
pub trait HasAttributes {
    fn attributes(&self) -> &Attributes;

    fn has_attribute(&self, name: &str) -> bool {
        self.attributes().contains(name)
    }

    fn get_attribute_opt(&self, name: &str) -> Option<&RExp> {
        self.attributes().get(name)
    }

    fn get_attribute(&self, name: &str) -> Result<&RExp, RExpError> {
        self.get_attribute_opt(name)
            .ok_or_else(|| RExpError::MissingAttribute {
                name: name.to_owned(),
            })
    }

    fn get_typed_attribute<T: RExpCast>(&self, name: &str) -> Result<&T, RExpError> {
        cast(name, self.get_attribute(name)?)
    }

    fn get_typed_attribute_opt<T: RExpCast>(&self, name: &str) -> Result<Option<&T>, RExpError> {
        self.get_attribute_opt(name)
            .map(|rexp| cast(name, rexp))
            .transpose()
    }

    fn get_boolean_attribute(&self, name: &str) -> Result<&RBooleanVector, RExpError> {
        self.get_typed_attribute(name)
    }

    fn get_boolean_attribute_opt(&self, name: &str) -> Result<Option<&RBooleanVector>, RExpError> {
        self.get_typed_attribute_opt(name)
    }

    fn get_integer_attribute(&self, name: &str) -> Result<&RIntegerVector, RExpError> {
        self.get_typed_attribute(name)
    }

    fn get_integer_attribute_opt(&self, name: &str) -> Result<Option<&RIntegerVector>, RExpError> {
        self.get_typed_attribute_opt(name)
    }

    fn get_double_attribute(&self, name: &str) -> Result<&RDoubleVector, RExpError> {
        self.get_typed_attribute(name)
    }

    fn get_double_attribute_opt(&self, name: &str) -> Result<Option<&RDoubleVector>, RExpError> {
        self.get_typed_attribute_opt(name)
    }

    fn get_string_attribute(&self, name: &str) -> Result<&RStringVector, RExpError> {
        self.get_typed_attribute(name)
    }

    fn get_string_attribute_opt(&self, name: &str) -> Result<Option<&RStringVector>, RExpError> {
        self.get_typed_attribute_opt(name)
    }

    fn get_generic_attribute(&self, name: &str) -> Result<&RGenericVector, RExpError> {
        self.get_typed_attribute(name)
    }

    fn get_generic_attribute_opt(&self, name: &str) -> Result<Option<&RGenericVector>, RExpError> {
        self.get_typed_attribute_opt(name)
    }

    fn names(&self) -> Result<&RStringVector, RExpError> {
        self.get_string_attribute("names")
    }

    fn dim(&self) -> Result<&RIntegerVector, RExpError> {
        self.get_integer_attribute("dim")
    }

    /// Returns the `index`-th label vector of the `dimnames` attribute.
    fn dimnames(&self, index: usize) -> Result<&RStringVector, RExpError> {
        let dimnames = self.get_generic_attribute("dimnames")?;
        cast("dimnames", dimnames.value(index)?)
    }
}

impl<T> HasAttributes for crate::RVector<T> {
    fn attributes(&self) -> &Attributes {
        crate::RVector::attributes(self)
    }
}

impl HasAttributes for RIntegerVector {
    fn attributes(&self) -> &Attributes {
        RIntegerVector::attributes(self)
    }
}

impl HasAttributes for S4Object {
    fn attributes(&self) -> &Attributes {
        &self.attributes
    }
}

impl HasAttributes for RExp {
    fn attributes(&self) -> &Attributes {
        static EMPTY: Attributes = Attributes::empty();
        match self {
            Self::Null => &EMPTY,
            Self::Boolean(v) => v.attributes(),
            Self::Integer(v) => RIntegerVector::attributes(v),
            Self::Double(v) => v.attributes(),
            Self::String(v) => v.attributes(),
            Self::Raw(v) => v.attributes(),
            Self::Generic(v) => v.attributes(),
            Self::S4(v) => &v.attributes,
        }
    }
}

impl From<RBooleanVector> for RExp {
    fn from(value: RBooleanVector) -> Self {
        Self::Boolean(value)
    }
}

impl From<RIntegerVector> for RExp {
    fn from(value: RIntegerVector) -> Self {
        Self::Integer(value)
    }
}

impl From<RDoubleVector> for RExp {
    fn from(value: RDoubleVector) -> Self {
        Self::Double(value)
    }
}

impl From<RStringVector> for RExp {
    fn from(value: RStringVector) -> Self {
        Self::String(value)
    }
}

impl From<RRaw> for RExp {
    fn from(value: RRaw) -> Self {
        Self::Raw(value)
    }
}

impl From<RGenericVector> for RExp {
    fn from(value: RGenericVector) -> Self {
        Self::Generic(value)
    }
}

impl From<S4Object> for RExp {
    fn from(value: S4Object) -> Self {
        Self::S4(value)
    }
}
