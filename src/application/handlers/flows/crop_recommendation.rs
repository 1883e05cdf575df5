//! CropRecommendationHandler - two or three crops suited to a farm.

use std::sync::Arc;

use serde_json::Value;

use super::invoker::{FlowContext, FlowError, FlowInvoker, FlowOutcome, GenerationStep};
use crate::domain::flows::{CropRecommendationInput, CropRecommendations, FlowSchema};

pub struct CropRecommendationHandler {
    invoker: Arc<FlowInvoker>,
}

impl CropRecommendationHandler {
    pub fn new(invoker: Arc<FlowInvoker>) -> Self {
        Self { invoker }
    }

    pub async fn handle(
        &self,
        payload: &Value,
        ctx: &FlowContext,
    ) -> Result<FlowOutcome<CropRecommendations>, FlowError> {
        let input: CropRecommendationInput = self
            .invoker
            .parse_input(FlowSchema::CropRecommendationInput, payload)?;

        tracing::info!(
            trace_id = %ctx.trace_id,
            farm_type = input.farm_type.as_str(),
            "Crop recommendation started"
        );

        let step = GenerationStep::new(
            "crop_recommendation",
            input.prompt(),
            FlowSchema::CropRecommendations,
        );

        match self.invoker.generate::<CropRecommendations>(ctx, step).await {
            Ok(mut recommendations) => {
                let cut = recommendations.truncate();
                if cut > 0 {
                    tracing::warn!(trace_id = %ctx.trace_id, cut, "Model returned too many recommendations");
                }
                tracing::info!(
                    trace_id = %ctx.trace_id,
                    count = recommendations.recommendations.len(),
                    "Crop recommendation finished"
                );
                Ok(FlowOutcome::generated(recommendations))
            }
            Err(e) => {
                tracing::error!(trace_id = %ctx.trace_id, error = %e, "Crop recommendation failed, serving fallback");
                Ok(FlowOutcome::fallback(CropRecommendations::empty()))
            }
        }
    }
}
