//! Verification data: sample inputs keyed by active field name.

use indexmap::IndexMap;
use rexp::{RExp, RKind};
use serde::ser::{Error as _, SerializeMap};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::{ConversionError, Result};

/// Ordered `field name -> column` table.
///
/// Columns are record vectors; factor-encoded integer columns serialize as
/// their labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationData {
    columns: IndexMap<String, RExp>,
}

impl VerificationData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a column; a replaced column keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, column: RExp) {
        self.columns.insert(name.into(), column);
    }

    pub fn get(&self, name: &str) -> Option<&RExp> {
        self.columns.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RExp)> {
        self.columns.iter().map(|(name, column)| (name.as_str(), column))
    }
}

impl Serialize for VerificationData {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, column) in &self.columns {
            let values = column_values(name, column).map_err(S::Error::custom)?;
            map.serialize_entry(name, &values)?;
        }
        map.end()
    }
}

fn column_values(name: &str, column: &RExp) -> Result<Vec<Value>> {
    let values = match column {
        RExp::Boolean(v) => v.values().iter().map(|x| x.map_or(Value::Null, Value::Bool)).collect(),
        RExp::Integer(v) if v.is_factor() => v
            .factor_values()?
            .into_iter()
            .map(|x| x.map_or(Value::Null, |label| Value::String(label.to_owned())))
            .collect(),
        RExp::Integer(v) => v.values().iter().map(|x| x.map_or(Value::Null, Value::from)).collect(),
        // NaN has no JSON form; serde_json maps it to null.
        RExp::Double(v) => v.values().iter().map(|x| Value::from(*x)).collect(),
        RExp::String(v) => v.values().iter().map(|x| Value::String(x.clone())).collect(),
        other => {
            return Err(ConversionError::RExp(rexp::RExpError::TypeMismatch {
                name: name.to_owned(),
                expected: RKind::Vector,
                actual: other.kind(),
            }))
        }
    };
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rexp::{RDoubleVector, RIntegerVector};
    use serde_json::json;

    #[test]
    fn serializes_factor_columns_as_labels() {
        let mut data = VerificationData::new();
        data.insert("age", RDoubleVector::from_values(vec![38.0, f64::NAN]).into());
        data.insert(
            "color",
            RIntegerVector::from_factor_labels(vec![Some("red".into()), None]).into(),
        );

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value, json!({"age": [38.0, null], "color": ["red", null]}));
        assert_eq!(data.names().collect::<Vec<_>>(), vec!["age", "color"]);
    }

    #[test]
    fn replacing_a_column_keeps_its_position() {
        let mut data = VerificationData::new();
        data.insert("a", RDoubleVector::from_values(vec![1.0]).into());
        data.insert("b", RDoubleVector::from_values(vec![2.0]).into());
        data.insert("a", RDoubleVector::from_values(vec![3.0]).into());
        assert_eq!(data.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(
            data.get("a").and_then(RExp::as_double_vector).map(|v| v.values()),
            Some(&[3.0][..])
        );
    }
}
