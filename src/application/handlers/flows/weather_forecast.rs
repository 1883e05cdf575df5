//! WeatherForecastHandler - seven-day forecast from the static weather tool.

use std::sync::Arc;

use serde_json::Value;

use super::invoker::{FlowContext, FlowError, FlowInvoker, FlowOutcome};
use crate::domain::flows::{forecast_for_city, FlowSchema, WeatherForecast, WeatherInput};

pub struct WeatherForecastHandler {
    invoker: Arc<FlowInvoker>,
}

impl WeatherForecastHandler {
    pub fn new(invoker: Arc<FlowInvoker>) -> Self {
        Self { invoker }
    }

    /// Never calls the model, so there is no fallback path.
    pub fn handle(
        &self,
        payload: &Value,
        ctx: &FlowContext,
    ) -> Result<FlowOutcome<WeatherForecast>, FlowError> {
        let input: WeatherInput = self.invoker.parse_input(FlowSchema::WeatherInput, payload)?;
        let forecast = forecast_for_city(&input.city);
        tracing::info!(
            trace_id = %ctx.trace_id,
            requested = %input.city.trim(),
            served = %forecast.city,
            "Weather forecast served"
        );
        Ok(FlowOutcome::generated(forecast))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::validation::JsonSchemaValidator;
    use crate::domain::foundation::UserId;
    use serde_json::json;

    fn handler() -> WeatherForecastHandler {
        WeatherForecastHandler::new(Arc::new(FlowInvoker::new(
            Arc::new(MockAIProvider::new()),
            Arc::new(JsonSchemaValidator::new()),
        )))
    }

    #[test]
    fn known_city_has_seven_days() {
        let outcome = handler()
            .handle(&json!({ "city": "Mumbai" }), &FlowContext::new(UserId::new("u").unwrap()))
            .unwrap();

        assert!(!outcome.fallback);
        assert_eq!(outcome.data.forecast.len(), 7);
    }

    #[test]
    fn blank_city_is_rejected() {
        let err = handler()
            .handle(&json!({ "city": "  " }), &FlowContext::new(UserId::new("u").unwrap()))
            .unwrap_err();
        assert!(err.is_invalid_input());
    }
}
