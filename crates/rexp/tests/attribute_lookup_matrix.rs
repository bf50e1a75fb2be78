use proptest::prelude::*;
use rexp::{
    Attributes, HasAttributes, RBooleanVector, RDoubleVector, RExp, RExpError, RGenericVector,
    RIntegerVector, RKind, RStringVector, S4Object,
};

fn strings(values: &[&str]) -> RStringVector {
    RStringVector::from_values(values.iter().map(|s| (*s).to_owned()).collect())
}

fn matrix() -> RDoubleVector {
    RDoubleVector::new(
        vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0],
        Attributes::new()
            .with("dim", RIntegerVector::from_values(vec![3, 2]))
            .with(
                "dimnames",
                RGenericVector::from_values(vec![
                    strings(&["r1", "r2", "r3"]).into(),
                    strings(&["c1", "c2"]).into(),
                ]),
            ),
    )
}

#[test]
fn attribute_lookup_matrix_typed_accessors() {
    let m = matrix();

    assert_eq!(m.dim().unwrap().values(), &[Some(3), Some(2)]);
    assert_eq!(m.dimnames(0).unwrap().values(), &["r1", "r2", "r3"]);
    assert_eq!(m.dimnames(1).unwrap().values(), &["c1", "c2"]);
    assert_eq!(
        m.dimnames(2).unwrap_err(),
        RExpError::IndexOutOfBounds { index: 2, len: 2 }
    );

    assert_eq!(
        m.get_double_attribute("dim").unwrap_err(),
        RExpError::TypeMismatch {
            name: "dim".into(),
            expected: RKind::Double,
            actual: RKind::Integer,
        }
    );
    assert_eq!(
        m.names().unwrap_err(),
        RExpError::MissingAttribute {
            name: "names".into()
        }
    );
}

#[test]
fn attribute_lookup_matrix_optional_absence_is_not_an_error() {
    let m = matrix();
    assert_eq!(m.get_attribute_opt("class"), None);
    assert_eq!(m.get_string_attribute_opt("class"), Ok(None));
    assert_eq!(m.get_boolean_attribute_opt("class"), Ok(None));
    assert!(!m.has_attribute("class"));
    assert!(m.has_attribute("dim"));
}

#[test]
fn attribute_lookup_matrix_optional_presence_is_still_type_checked() {
    let m = matrix();
    assert_eq!(
        m.get_string_attribute_opt("dim").unwrap_err(),
        RExpError::TypeMismatch {
            name: "dim".into(),
            expected: RKind::String,
            actual: RKind::Integer,
        }
    );
}

#[test]
fn attribute_lookup_matrix_s4_slots() {
    let beta = S4Object::new(
        Attributes::new()
            .with("i", RIntegerVector::from_values(vec![0, 2]))
            .with("x", RDoubleVector::from_values(vec![1.5, 2.5]))
            .with("class", strings(&["dgCMatrix"])),
    );
    let rexp = RExp::from(beta);

    assert_eq!(rexp.kind(), RKind::S4);
    assert!(!rexp.is_vector());
    assert_eq!(rexp.get_integer_attribute("i").unwrap().len(), 2);
    assert_eq!(rexp.get_double_attribute("x").unwrap().values(), &[1.5, 2.5]);
    assert_eq!(
        rexp.get_attribute("p").unwrap_err(),
        RExpError::MissingAttribute { name: "p".into() }
    );
}

#[test]
fn attribute_lookup_matrix_null_has_no_attributes() {
    let null = RExp::Null;
    assert!(null.attributes().is_empty());
    assert!(null.get_attribute_opt("names").is_none());
}

#[test]
fn attribute_lookup_matrix_scalar_rendering() {
    assert_eq!(
        RExp::from(RDoubleVector::from_values(vec![-999.0])).scalar_to_string(),
        Ok("-999".to_owned())
    );
    assert_eq!(
        RExp::from(RDoubleVector::from_values(vec![0.25])).scalar_to_string(),
        Ok("0.25".to_owned())
    );
    assert_eq!(
        RExp::from(RBooleanVector::from_values(vec![None])).scalar_to_string(),
        Ok("NA".to_owned())
    );
    assert_eq!(
        RExp::from(strings(&["a", "b"])).scalar_to_string(),
        Err(RExpError::NotScalar { len: 2 })
    );
}

proptest! {
    #[test]
    fn attribute_lookup_returns_first_match_in_chain_order(
        tags in proptest::collection::vec("[a-c]", 1..12),
        probe in "[a-c]",
    ) {
        let attributes: Attributes = tags
            .iter()
            .enumerate()
            .map(|(index, tag)| {
                (tag.clone(), RExp::from(RIntegerVector::from_values(vec![index as i32])))
            })
            .collect();
        let holder = S4Object::new(attributes);

        let expected = tags.iter().position(|tag| *tag == probe);
        let found = holder
            .get_integer_attribute_opt(&probe)
            .unwrap()
            .map(|v| v.values()[0]);

        prop_assert_eq!(found, expected.map(|index| Some(index as i32)));
        prop_assert_eq!(holder.has_attribute(&probe), expected.is_some());
    }
}
