//! SchemeLookupHandler - answers questions about government schemes.

use std::sync::Arc;

use serde_json::Value;

use super::invoker::{FlowContext, FlowError, FlowInvoker, FlowOutcome, GenerationStep};
use crate::domain::flows::{FlowSchema, SchemeDetails, SchemeQueryInput};

pub struct SchemeLookupHandler {
    invoker: Arc<FlowInvoker>,
}

impl SchemeLookupHandler {
    pub fn new(invoker: Arc<FlowInvoker>) -> Self {
        Self { invoker }
    }

    pub async fn handle(
        &self,
        payload: &Value,
        ctx: &FlowContext,
    ) -> Result<FlowOutcome<SchemeDetails>, FlowError> {
        let input: SchemeQueryInput = self
            .invoker
            .parse_input(FlowSchema::SchemeQueryInput, payload)?;

        tracing::info!(trace_id = %ctx.trace_id, "Scheme lookup started");

        let step = GenerationStep::new("scheme_lookup", input.prompt(), FlowSchema::SchemeDetails);
        match self.invoker.generate::<SchemeDetails>(ctx, step).await {
            Ok(details) => {
                tracing::info!(trace_id = %ctx.trace_id, scheme = %details.scheme_name, "Scheme lookup finished");
                Ok(FlowOutcome::generated(details))
            }
            Err(e) => {
                tracing::error!(trace_id = %ctx.trace_id, error = %e, "Scheme lookup failed, serving fallback");
                Ok(FlowOutcome::fallback(SchemeDetails::unavailable(input.language)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::MockAIProvider;
    use crate::adapters::validation::JsonSchemaValidator;
    use crate::domain::flows::NATIONAL_SCHEME_PORTAL;
    use crate::domain::foundation::UserId;
    use serde_json::json;

    fn handler(provider: MockAIProvider) -> SchemeLookupHandler {
        SchemeLookupHandler::new(Arc::new(FlowInvoker::new(
            Arc::new(provider),
            Arc::new(JsonSchemaValidator::new()),
        )))
    }

    #[tokio::test]
    async fn returns_scheme_details() {
        let provider = MockAIProvider::new().with_json_response(json!({
            "scheme_name": "PM-KISAN",
            "answer": "₹6,000 per year in three instalments.",
            "eligibility": "All landholding farmer families.",
            "application_link": "https://pmkisan.gov.in"
        }));

        let outcome = handler(provider)
            .handle(
                &json!({ "query": "PM Kisan kya hai?", "language": "hi" }),
                &FlowContext::new(UserId::new("u").unwrap()),
            )
            .await
            .unwrap();

        assert!(!outcome.fallback);
        assert_eq!(outcome.data.scheme_name, "PM-KISAN");
    }

    #[tokio::test]
    async fn fallback_points_to_national_portal() {
        let outcome = handler(MockAIProvider::new())
            .handle(
                &json!({ "query": "PM Kisan", "language": "kn" }),
                &FlowContext::new(UserId::new("u").unwrap()),
            )
            .await
            .unwrap();

        assert!(outcome.fallback);
        assert_eq!(outcome.data.application_link, NATIONAL_SCHEME_PORTAL);
    }
}
