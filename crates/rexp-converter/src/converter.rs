//! The two-phase conversion contract and the driver that sequences it.

use std::fmt;

use rexp::{HasAttributes, RGenericVector, RKind};
use tracing::{debug, info, warn};

use crate::encoder::{Encoder, ModelDocument};
use crate::model::Model;
use crate::schema::Schema;
use crate::verification::VerificationData;
use crate::{ConversionError, Result};

/// A model family converter.
///
/// [`convert`] calls [`ModelConverter::encode_schema`] once, derives a
/// [`Schema`] from the encoder, then calls [`ModelConverter::encode_model`]
/// with it. The model must follow the schema's feature order.
pub trait ModelConverter {
    /// Declares exactly one label and the ordered features.
    fn encode_schema(&mut self, encoder: &mut dyn Encoder) -> Result<()>;

    fn encode_model(&mut self, schema: &Schema) -> Result<Model>;

    /// Maps a sample data frame onto the model's active fields.
    ///
    /// By default every column is taken as-is under its data frame name.
    fn encode_active_values(&mut self, data_frame: &RGenericVector) -> Result<VerificationData> {
        let names = data_frame.names()?;
        if names.len() != data_frame.len() {
            return Err(ConversionError::InconsistentDimension(format!(
                "data frame has {} columns but {} names",
                data_frame.len(),
                names.len()
            )));
        }
        let mut data = VerificationData::new();
        for (name, column) in names.values().iter().zip(data_frame.values()) {
            if !column.is_vector() {
                return Err(rexp::RExpError::TypeMismatch {
                    name: name.clone(),
                    expected: RKind::Vector,
                    actual: column.kind(),
                }
                .into());
            }
            data.insert(name.clone(), column.clone());
        }
        Ok(data)
    }
}

/// Pipeline position; transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Created,
    SchemaEncoded,
    ModelEncoded,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::SchemaEncoded => "schema encoded",
            Self::ModelEncoded => "model encoded",
            Self::Done => "done",
        })
    }
}

struct Pipeline {
    stage: Stage,
}

impl Pipeline {
    fn new() -> Self {
        Self {
            stage: Stage::Created,
        }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(next > self.stage);
        debug!(from = %self.stage, to = %next, "conversion stage");
        self.stage = next;
    }

    fn fail(&self, err: ConversionError) -> ConversionError {
        warn!(stage = %self.stage, error = %err, "conversion aborted");
        err
    }
}

/// Runs both phases and wraps the model into a document.
///
/// No document is produced unless every phase succeeds.
pub fn convert<C>(converter: &mut C, encoder: &mut dyn Encoder) -> Result<ModelDocument>
where
    C: ModelConverter + ?Sized,
{
    let mut pipeline = Pipeline::new();

    converter
        .encode_schema(encoder)
        .map_err(|err| pipeline.fail(err))?;
    pipeline.advance(Stage::SchemaEncoded);

    let schema = encoder.create_schema().map_err(|err| pipeline.fail(err))?;
    let model = converter
        .encode_model(&schema)
        .map_err(|err| pipeline.fail(err))?;
    pipeline.advance(Stage::ModelEncoded);

    let document = encoder
        .encode_document(model)
        .map_err(|err| pipeline.fail(err))?;
    pipeline.advance(Stage::Done);

    info!(
        label = document.model.target(),
        features = schema.features().len(),
        "converted model"
    );
    Ok(document)
}

/// [`convert`], then attaches verification data built from `data_frame`.
pub fn convert_with_verification<C>(
    converter: &mut C,
    encoder: &mut dyn Encoder,
    data_frame: &RGenericVector,
) -> Result<ModelDocument>
where
    C: ModelConverter + ?Sized,
{
    let document = convert(converter, encoder)?;
    let verification = converter.encode_active_values(data_frame)?;
    debug!(columns = verification.len(), "encoded verification data");
    Ok(document.with_verification(verification))
}
