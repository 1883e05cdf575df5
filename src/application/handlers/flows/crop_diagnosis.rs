//! CropDiagnosisHandler - disease diagnosis from a photo and/or description.

use std::sync::Arc;

use serde_json::Value;

use super::invoker::{FlowContext, FlowError, FlowInvoker, FlowOutcome, GenerationStep};
use crate::domain::flows::{CropDiagnosis, CropDiagnosisInput, DiagnosisDraft, FlowSchema};
use crate::ports::SchemaValidationError;

pub struct CropDiagnosisHandler {
    invoker: Arc<FlowInvoker>,
}

impl CropDiagnosisHandler {
    pub fn new(invoker: Arc<FlowInvoker>) -> Self {
        Self { invoker }
    }

    pub async fn handle(
        &self,
        payload: &Value,
        ctx: &FlowContext,
    ) -> Result<FlowOutcome<CropDiagnosis>, FlowError> {
        let input: CropDiagnosisInput = self
            .invoker
            .parse_input(FlowSchema::CropDiagnosisInput, payload)?;
        let photo = input.photo().map_err(|e| {
            FlowError::InvalidInput(SchemaValidationError::InvalidFormat {
                field: e.field().to_string(),
                format: "image data URI".to_string(),
            })
        })?;

        tracing::info!(
            trace_id = %ctx.trace_id,
            has_photo = photo.is_some(),
            has_description = input.description().is_some(),
            "Crop diagnosis started"
        );

        let step = GenerationStep::new("crop_diagnosis", input.prompt(), FlowSchema::DiagnosisDraft)
            .with_image(photo.as_ref());

        match self.invoker.generate::<DiagnosisDraft>(ctx, step).await {
            Ok(draft) => {
                let diagnosis = draft.into_diagnosis();
                tracing::info!(trace_id = %ctx.trace_id, is_plant = diagnosis.is_plant, "Crop diagnosis finished");
                Ok(FlowOutcome::generated(diagnosis))
            }
            Err(e) => {
                tracing::error!(trace_id = %ctx.trace_id, error = %e, "Crop diagnosis failed, serving fallback");
                Ok(FlowOutcome::fallback(CropDiagnosis::unavailable(input.language)))
            }
        }
    }
}
