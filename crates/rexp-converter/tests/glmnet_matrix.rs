use proptest::prelude::*;
use rexp::{
    Attributes, RDoubleVector, RExp, RGenericVector, RIntegerVector, RStringVector, S4Object,
};
use rexp_converter::{
    convert, ConversionError, CscMatrix, DocumentEncoder, ErrorKind, GlmNetConverter,
    MiningFunction, Model, Normalization, RegressionModel, TARGET_FIELD,
};

fn strings(values: &[&str]) -> RStringVector {
    RStringVector::from_values(values.iter().map(|value| value.to_string()).collect())
}

fn dgc_matrix(
    features: &[&str],
    dim: [i32; 2],
    i: Vec<i32>,
    p: Vec<i32>,
    x: Vec<f64>,
) -> S4Object {
    let dimnames = RGenericVector::from_values(vec![strings(features).into(), RExp::Null]);
    S4Object::new(
        Attributes::new()
            .with("Dim", RIntegerVector::from_values(dim.to_vec()))
            .with("Dimnames", dimnames)
            .with("i", RIntegerVector::from_values(i))
            .with("p", RIntegerVector::from_values(p))
            .with("x", RDoubleVector::from_values(x)),
    )
}

/// Three features, two path columns:
/// column 0 stores rows 0 and 2, column 1 stores row 1.
fn fit(lambda_s: Option<f64>, classnames: Option<&[&str]>) -> RGenericVector {
    let beta = dgc_matrix(
        &["x1", "x2", "x3"],
        [3, 2],
        vec![0, 2, 1],
        vec![0, 2, 3],
        vec![1.5, 2.5, 3.5],
    );
    let mut elements = vec![
        ("a0", RDoubleVector::from_values(vec![10.0, 20.0]).into()),
        ("beta", RExp::from(beta)),
        ("lambda", RDoubleVector::from_values(vec![0.1, 0.05]).into()),
    ];
    if let Some(lambda_s) = lambda_s {
        elements.push(("lambda.s", RDoubleVector::from_values(vec![lambda_s]).into()));
    }
    if let Some(classnames) = classnames {
        elements.push(("classnames", strings(classnames).into()));
    }
    RGenericVector::named(elements)
}

fn regression(model: &Model) -> &RegressionModel {
    match model {
        Model::Regression(model) => model,
        other => panic!("expected a regression model, got {other:?}"),
    }
}

#[test]
fn glmnet_matrix_decodes_selected_column() {
    let fit = fit(Some(0.05), None);
    let path = GlmNetConverter::elnet(&fit).decode_path_column().unwrap();
    assert_eq!(path.column, 1);
    assert_eq!(path.intercept, 20.0);
    assert_eq!(path.coefficients.len(), 3);
    assert!(path.coefficients[0].is_nan());
    assert_eq!(path.coefficients[1], 3.5);
    assert!(path.coefficients[2].is_nan());
}

#[test]
fn glmnet_matrix_elnet_end_to_end() {
    let fit = fit(Some(0.05), None);
    let document = convert(&mut GlmNetConverter::elnet(&fit), &mut DocumentEncoder::new()).unwrap();

    assert_eq!(document.mining_schema, vec![TARGET_FIELD, "x1", "x2", "x3"]);
    let model = regression(&document.model);
    assert_eq!(model.function, MiningFunction::Regression);
    assert_eq!(model.normalization, Normalization::None);
    assert_eq!(model.tables.len(), 1);

    let table = &model.tables[0];
    assert_eq!(table.intercept, 20.0);
    assert_eq!(table.target_category, None);
    assert_eq!(table.terms.len(), 1);
    assert_eq!(table.terms[0].field, "x2");
    assert_eq!(table.terms[0].coefficient, 3.5);
}

#[test]
fn glmnet_matrix_first_column_keeps_two_terms() {
    let fit = fit(Some(0.1), None);
    let document = convert(&mut GlmNetConverter::elnet(&fit), &mut DocumentEncoder::new()).unwrap();
    let table = &regression(&document.model).tables[0];
    assert_eq!(table.intercept, 10.0);
    let fields: Vec<_> = table.terms.iter().map(|term| term.field.as_str()).collect();
    assert_eq!(fields, vec!["x1", "x3"]);
}

#[test]
fn glmnet_matrix_stored_zero_is_kept() {
    let beta = dgc_matrix(&["x1", "x2"], [2, 1], vec![0], vec![0, 1], vec![0.0]);
    let fit = RGenericVector::named([
        ("a0", RDoubleVector::from_values(vec![1.0]).into()),
        ("beta", RExp::from(beta)),
        ("lambda", RDoubleVector::from_values(vec![0.3]).into()),
        ("lambda.s", RDoubleVector::from_values(vec![0.3]).into()),
    ]);
    let document = convert(&mut GlmNetConverter::elnet(&fit), &mut DocumentEncoder::new()).unwrap();
    let terms = &regression(&document.model).tables[0].terms;
    assert_eq!(terms.len(), 1);
    assert_eq!(terms[0].field, "x1");
    assert_eq!(terms[0].coefficient, 0.0);
}

#[test]
fn glmnet_matrix_lambda_not_on_path() {
    let fit = fit(Some(0.07), None);
    let err = convert(&mut GlmNetConverter::elnet(&fit), &mut DocumentEncoder::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InconsistentDimension);
}

#[test]
fn glmnet_matrix_missing_lambda_s() {
    let fit = fit(None, None);
    let err = GlmNetConverter::elnet(&fit).decode_path_column().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingAttribute);
    assert!(err.to_string().contains("missing 'lambda.s' element"));
    assert!(err.to_string().contains("initialize the 'lambda.s' element"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn glmnet_matrix_coefficient_count_mismatch() {
    // Two row names but three coefficient rows.
    let beta = dgc_matrix(&["x1", "x2"], [3, 1], vec![2], vec![0, 1], vec![1.0]);
    let fit = RGenericVector::named([
        ("a0", RDoubleVector::from_values(vec![1.0]).into()),
        ("beta", RExp::from(beta)),
        ("lambda", RDoubleVector::from_values(vec![0.3]).into()),
        ("lambda.s", RDoubleVector::from_values(vec![0.3]).into()),
    ]);
    let err = convert(&mut GlmNetConverter::elnet(&fit), &mut DocumentEncoder::new()).unwrap_err();
    assert!(matches!(err, ConversionError::InconsistentDimension(_)));
}

#[test]
fn glmnet_matrix_lognet_two_tables() {
    let fit = fit(Some(0.05), Some(&["no", "yes"]));
    let mut encoder = DocumentEncoder::new();
    let document = convert(&mut GlmNetConverter::lognet(&fit), &mut encoder).unwrap();

    let target = encoder.data_field(TARGET_FIELD).unwrap();
    assert_eq!(target.categories, vec!["no", "yes"]);

    let model = regression(&document.model);
    assert_eq!(model.function, MiningFunction::Classification);
    assert_eq!(model.normalization, Normalization::Logit);
    assert_eq!(model.tables.len(), 2);
    assert_eq!(model.tables[0].target_category.as_deref(), Some("yes"));
    assert_eq!(model.tables[0].intercept, 20.0);
    assert_eq!(model.tables[0].terms.len(), 1);
    assert_eq!(model.tables[1].target_category.as_deref(), Some("no"));
    assert!(model.tables[1].terms.is_empty());
}

#[test]
fn glmnet_matrix_lognet_rejects_continuous_label() {
    let fit = fit(Some(0.05), None);
    let err = convert(&mut GlmNetConverter::lognet(&fit), &mut DocumentEncoder::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Encoding);
}

#[test]
fn glmnet_matrix_beta_must_be_s4() {
    let fit = RGenericVector::named([
        ("a0", RDoubleVector::from_values(vec![1.0]).into()),
        ("beta", RDoubleVector::from_values(vec![1.0]).into()),
    ]);
    let err = convert(&mut GlmNetConverter::elnet(&fit), &mut DocumentEncoder::new()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
}

proptest! {
    #[test]
    fn glmnet_matrix_csc_column_matches_dense(
        dense in prop::collection::vec(
            prop::collection::vec(prop::option::of(-100.0f64..100.0), 4),
            1..5,
        )
    ) {
        let rows = 4;
        let cols = dense.len();
        let (mut i, mut p, mut x) = (Vec::new(), vec![0], Vec::new());
        for column in &dense {
            for (row, value) in column.iter().enumerate() {
                if let Some(value) = value {
                    i.push(row);
                    x.push(*value);
                }
            }
            p.push(i.len());
        }

        let matrix = CscMatrix::new(rows, cols, i, p, x).unwrap();
        for (col, column) in dense.iter().enumerate() {
            let decoded = matrix.column(col).unwrap();
            prop_assert_eq!(decoded.len(), rows);
            for (row, expected) in column.iter().enumerate() {
                match expected {
                    Some(value) => prop_assert_eq!(decoded[row], *value),
                    None => prop_assert!(decoded[row].is_nan()),
                }
            }
        }
    }
}
