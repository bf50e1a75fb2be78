//! Attribute chains.

use crate::RExp;

/// Ordered `(name, value)` attribute chain.
///
/// Names are not required to be unique. Lookups walk the chain in order and
/// return the first match; later entries with the same name are kept but are
/// unreachable by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, RExp)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends an attribute and returns the chain, for builder-style construction.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RExp>) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<RExp>) {
        self.entries.push((name.into(), value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&RExp> {
        self.entries
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(tag, _)| tag == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RExp)> {
        self.entries.iter().map(|(tag, value)| (tag.as_str(), value))
    }
}

impl<S: Into<String>> FromIterator<(S, RExp)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (S, RExp)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RDoubleVector, RStringVector};

    #[test]
    fn first_match_wins_for_duplicate_names() {
        let attributes = Attributes::new()
            .with("class", RStringVector::from_values(vec!["first".into()]))
            .with("class", RStringVector::from_values(vec!["second".into()]));

        assert_eq!(attributes.len(), 2);
        let class = attributes.get("class").and_then(RExp::as_string_vector);
        assert_eq!(class.map(|v| v.values()), Some(&["first".to_owned()][..]));
    }

    #[test]
    fn lookup_is_exact_match() {
        let attributes = Attributes::new().with("dim", RDoubleVector::from_values(vec![1.0]));
        assert!(attributes.contains("dim"));
        assert!(!attributes.contains("Dim"));
        assert!(!attributes.contains("di"));
        assert!(attributes.get("dimnames").is_none());
    }
}
