//! XGBoost boosters (`xgb.Booster`).
//!
//! The booster list carries the serialized learner as a raw vector and a
//! feature map, either as the path of an fmap file or as an inline data
//! frame of `(id, name, type)` columns.

use std::fs::File;
use std::io::{BufReader, Cursor};

use indexmap::IndexMap;
use rexp::{Attributes, RExp, RGenericVector, RIntegerVector, RKind, RNumberVector};
use tracing::debug;

use crate::converter::ModelConverter;
use crate::encoder::Encoder;
use crate::feature_map::{EntryType, FeatureMap};
use crate::learner::{Learner, LearnerLoader};
use crate::model::{MiningOptions, Model};
use crate::options::{ConverterOptions, OPTION_COMPACT};
use crate::schema::Schema;
use crate::verification::VerificationData;
use crate::{ConversionError, Result};

/// Target field name unless the booster declares `schema$response_name`.
pub const DEFAULT_TARGET_FIELD: &str = "_target";

pub struct XGBoostConverter<'a> {
    booster: &'a RGenericVector,
    loader: Box<dyn LearnerLoader + 'a>,
    compact: bool,
    feature_map: Option<FeatureMap>,
    learner: Option<Box<dyn Learner>>,
}

impl<'a> XGBoostConverter<'a> {
    pub fn new(
        booster: &'a RGenericVector,
        loader: impl LearnerLoader + 'a,
        options: &ConverterOptions,
    ) -> Result<Self> {
        Ok(Self {
            booster,
            loader: Box::new(loader),
            compact: options.get_option(OPTION_COMPACT, true)?,
            feature_map: None,
            learner: None,
        })
    }

    pub fn compact(&self) -> bool {
        self.compact
    }

    /// Loads the feature map on first use and returns the cached one after.
    pub fn ensure_feature_map(&mut self) -> Result<&mut FeatureMap> {
        let feature_map = match self.feature_map.take() {
            Some(feature_map) => feature_map,
            None => load_feature_map(self.booster)?,
        };
        Ok(self.feature_map.insert(feature_map))
    }

    /// Loads the learner on first use and returns the cached one after.
    pub fn ensure_learner(&mut self) -> Result<&dyn Learner> {
        let learner = match self.learner.take() {
            Some(learner) => learner,
            None => load_learner(self.booster, &*self.loader)?,
        };
        Ok(&**self.learner.insert(learner))
    }
}

fn load_feature_map(booster: &RGenericVector) -> Result<FeatureMap> {
    let feature_map = match booster.get_vector_element("fmap")? {
        RExp::String(path) => {
            let path = path.as_scalar()?;
            debug!(path = %path, "loading feature map file");
            let file = File::open(path).map_err(|err| {
                ConversionError::io(format!("failed to open feature map '{path}'"), err)
            })?;
            FeatureMap::load(BufReader::new(file))?
        }
        RExp::Generic(table) => load_inline_feature_map(table)?,
        other => {
            return Err(ConversionError::UnsupportedFormat(format!(
                "'fmap' must be a file path or a data frame, got {}",
                other.kind()
            )))
        }
    };
    debug!(entries = feature_map.len(), "loaded feature map");
    Ok(feature_map)
}

/// Reads `(id, name, type)` columns; `id` must count up from 0.
fn load_inline_feature_map(table: &RGenericVector) -> Result<FeatureMap> {
    let id_column = table.value(0)?;
    let id = id_column
        .as_number_vector()
        .ok_or_else(|| rexp::RExpError::TypeMismatch {
            name: "fmap$id".into(),
            expected: RKind::Numeric,
            actual: id_column.kind(),
        })?;
    let name: &RIntegerVector = table.value(1)?.downcast("fmap$name")?;
    let type_: &RIntegerVector = table.value(2)?.downcast("fmap$type")?;
    if !name.is_factor() || !type_.is_factor() {
        return Err(ConversionError::UnsupportedFormat(
            "'fmap' name and type columns must be factors".into(),
        ));
    }

    let mut feature_map = FeatureMap::new();
    for row in 0..id.len() {
        let value = id.value(row)?;
        if value != row as f64 {
            return Err(ConversionError::InconsistentDimension(format!(
                "'fmap' id at position {row} is {value}"
            )));
        }
        let (Some(name), Some(type_)) = (name.factor_value(row)?, type_.factor_value(row)?) else {
            return Err(ConversionError::UnsupportedFormat(format!(
                "'fmap' row {row} has a missing name or type"
            )));
        };
        feature_map.add_entry(name, type_)?;
    }
    Ok(feature_map)
}

fn load_learner(booster: &RGenericVector, loader: &dyn LearnerLoader) -> Result<Box<dyn Learner>> {
    let raw = booster.get_raw_element("raw")?;
    debug!(bytes = raw.len(), "loading embedded learner");
    let mut reader = Cursor::new(raw.values());
    let learner = loader
        .load_learner(&mut reader)
        .map_err(|err| ConversionError::io("failed to load the embedded learner", err))?;
    debug!(objective = learner.objective().name(), "loaded learner");
    Ok(learner)
}

fn check_feature_map(feature_map: &FeatureMap, expected: usize) -> Result<()> {
    if feature_map.len() != expected {
        return Err(ConversionError::InconsistentDimension(format!(
            "invalid 'fmap' element: expected {expected} features, got {} features",
            feature_map.len()
        )));
    }
    Ok(())
}

fn tree_limit(value: f64) -> Result<usize> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(i32::MAX) {
        Ok(value as usize)
    } else {
        Err(ConversionError::UnsupportedFormat(format!(
            "'ntreelimit' must be a non-negative integer, got {value}"
        )))
    }
}

/// Column of the verification table under construction.
enum ActiveColumn {
    Values(RExp),
    /// Per-row codes into `levels`, which list the field's categories in
    /// entry order.
    Factor {
        codes: Vec<Option<i32>>,
        levels: Vec<String>,
    },
}

impl ModelConverter for XGBoostConverter<'_> {
    fn encode_schema(&mut self, encoder: &mut dyn Encoder) -> Result<()> {
        let booster = self.booster;

        let feature_names = booster.get_string_element_opt("feature_names")?;
        let schema = booster.get_generic_element_opt("schema")?;

        let feature_map = self.ensure_feature_map()?;
        if let Some(feature_names) = feature_names {
            check_feature_map(feature_map, feature_names.len())?;
        }

        let mut target = DEFAULT_TARGET_FIELD.to_owned();
        let mut categories = None;
        if let Some(schema) = schema {
            if let Some(missing) = schema.get_vector_element_opt("missing")? {
                feature_map.add_missing_value(missing.scalar_to_string()?);
            }
            if let Some(response_name) = schema.get_string_element_opt("response_name")? {
                target = response_name.as_scalar()?.clone();
            }
            if let Some(response_levels) = schema.get_string_element_opt("response_levels")? {
                categories = Some(response_levels.values().to_vec());
            }
        }

        let label = self
            .ensure_learner()?
            .objective()
            .encode_label(&target, categories.as_deref(), encoder)?;
        encoder.set_label(label)?;

        for feature in self.ensure_feature_map()?.encode_features(encoder)? {
            encoder.add_feature(feature)?;
        }
        Ok(())
    }

    fn encode_model(&mut self, schema: &Schema) -> Result<Model> {
        let ntree_limit = self
            .booster
            .get_numeric_element_opt("ntreelimit")?
            .map(|ntree_limit| ntree_limit.as_scalar())
            .transpose()?
            .map(tree_limit)
            .transpose()?;
        let options = MiningOptions {
            compact: self.compact,
            ntree_limit,
        };

        let learner = self.ensure_learner()?;
        let family_schema = learner.to_family_schema(schema)?;
        learner.encode_mining_model(&options, &family_schema)
    }

    /// Folds one-hot indicator columns back into one factor column per field.
    ///
    /// A row is set to an indicator's category when that indicator equals
    /// exactly 1; rows where no indicator fires stay unset, and when several
    /// fire the last one wins.
    fn encode_active_values(&mut self, data_frame: &RGenericVector) -> Result<VerificationData> {
        let feature_map = self.ensure_feature_map()?;
        check_feature_map(feature_map, data_frame.len())?;

        let mut columns: IndexMap<String, ActiveColumn> = IndexMap::new();
        for (entry, column) in feature_map.entries().iter().zip(data_frame.values()) {
            match entry.entry_type() {
                EntryType::BinaryIndicator => {
                    let mask: RNumberVector<'_> = column.as_number_vector().ok_or_else(|| {
                        rexp::RExpError::TypeMismatch {
                            name: entry.name().to_owned(),
                            expected: RKind::Numeric,
                            actual: column.kind(),
                        }
                    })?;
                    let slot = columns
                        .entry(entry.name().to_owned())
                        .or_insert_with(|| ActiveColumn::Factor {
                            codes: vec![None; mask.len()],
                            levels: Vec::new(),
                        });
                    let ActiveColumn::Factor { codes, levels } = slot else {
                        return Err(ConversionError::UnsupportedFormat(format!(
                            "field '{}' mixes indicator and value columns",
                            entry.name()
                        )));
                    };
                    if codes.len() != mask.len() {
                        return Err(ConversionError::InconsistentDimension(format!(
                            "indicator columns of '{}' have {} and {} rows",
                            entry.name(),
                            codes.len(),
                            mask.len()
                        )));
                    }
                    let code = match levels.iter().position(|level| level == entry.category()) {
                        Some(code) => code,
                        None => {
                            levels.push(entry.category().to_owned());
                            levels.len() - 1
                        }
                    } as i32;
                    for (row, slot) in codes.iter_mut().enumerate() {
                        if mask.value(row)? == 1.0 {
                            *slot = Some(code);
                        }
                    }
                }
                EntryType::Float | EntryType::Integer => {
                    if !column.is_vector() {
                        return Err(rexp::RExpError::TypeMismatch {
                            name: entry.name().to_owned(),
                            expected: RKind::Vector,
                            actual: column.kind(),
                        }
                        .into());
                    }
                    columns.insert(entry.name().to_owned(), ActiveColumn::Values(column.clone()));
                }
            }
        }

        let mut data = VerificationData::new();
        for (name, column) in columns {
            let column = match column {
                ActiveColumn::Values(values) => values,
                ActiveColumn::Factor { codes, levels } => {
                    RIntegerVector::factor(codes, levels, Attributes::new()).into()
                }
            };
            data.insert(name, column);
        }
        Ok(data)
    }
}
