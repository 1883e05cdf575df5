//! MarketAnalysisHandler - price analysis for a free-text market question.
//!
//! Two model calls: the first extracts `{crop, city}` from the question,
//! the price tool resolves a price, and the second writes the analysis.

use std::sync::Arc;

use serde_json::Value;

use super::invoker::{FlowContext, FlowError, FlowInvoker, FlowOutcome, GenerationStep};
use crate::domain::flows::{
    lookup_market_price, FlowSchema, MarketAnalysis, MarketAnalysisInput, MarketQuery,
};

pub struct MarketAnalysisHandler {
    invoker: Arc<FlowInvoker>,
}

impl MarketAnalysisHandler {
    pub fn new(invoker: Arc<FlowInvoker>) -> Self {
        Self { invoker }
    }

    pub async fn handle(
        &self,
        payload: &Value,
        ctx: &FlowContext,
    ) -> Result<FlowOutcome<MarketAnalysis>, FlowError> {
        let input: MarketAnalysisInput = self
            .invoker
            .parse_input(FlowSchema::MarketAnalysisInput, payload)?;

        tracing::info!(trace_id = %ctx.trace_id, language = input.language.code(), "Market analysis started");

        match self.analyze(&input, ctx).await {
            Ok(analysis) => {
                tracing::info!(trace_id = %ctx.trace_id, "Market analysis finished");
                Ok(FlowOutcome::generated(analysis))
            }
            Err(e) => {
                tracing::error!(trace_id = %ctx.trace_id, error = %e, "Market analysis failed, serving fallback");
                Ok(FlowOutcome::fallback(MarketAnalysis::unavailable(input.language)))
            }
        }
    }

    async fn analyze(
        &self,
        input: &MarketAnalysisInput,
        ctx: &FlowContext,
    ) -> Result<MarketAnalysis, FlowError> {
        let query: MarketQuery = self
            .invoker
            .generate(
                ctx,
                GenerationStep::new(
                    "market_analysis.extract",
                    input.extraction_prompt(),
                    FlowSchema::MarketQuery,
                )
                .with_temperature(0.0),
            )
            .await?;

        let price = lookup_market_price(&query);
        tracing::debug!(
            trace_id = %ctx.trace_id,
            crop = %price.crop,
            city = %price.city,
            price = price.price,
            source = ?price.source,
            "Resolved market price"
        );

        self.invoker
            .generate(
                ctx,
                GenerationStep::new(
                    "market_analysis.analyze",
                    input.analysis_prompt(&price),
                    FlowSchema::MarketAnalysis,
                ),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::adapters::validation::JsonSchemaValidator;
    use crate::domain::foundation::UserId;
    use crate::domain::locale::Locale;
    use serde_json::json;

    fn handler(provider: MockAIProvider) -> MarketAnalysisHandler {
        MarketAnalysisHandler::new(Arc::new(FlowInvoker::new(
            Arc::new(provider),
            Arc::new(JsonSchemaValidator::new()),
        )))
    }

    fn ctx() -> FlowContext {
        FlowContext::new(UserId::new("farmer-1").unwrap())
    }

    #[tokio::test]
    async fn analysis_uses_looked_up_price() {
        let provider = MockAIProvider::new()
            .with_json_response(json!({ "crop": "Onion", "city": "Pune" }))
            .with_json_response(json!({
                "recommendation": "Hold",
                "analysis": "Prices are expected to rise."
            }));
        let handler = MarketAnalysisHandler::new(Arc::new(FlowInvoker::new(
            Arc::new(provider.clone()),
            Arc::new(JsonSchemaValidator::new()),
        )));

        let outcome = handler
            .handle(&json!({ "query": "Should I sell onions in Pune?", "language": "en" }), &ctx())
            .await
            .unwrap();

        assert!(!outcome.fallback);
        assert_eq!(outcome.data.recommendation, "Hold");
        let calls = provider.get_calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[1].messages[0].content.contains("Onion"));
    }

    #[tokio::test]
    async fn every_locale_gets_its_own_fallback() {
        for locale in Locale::all() {
            let provider = MockAIProvider::new().with_error(MockError::Unavailable {
                message: "overloaded".into(),
            });
            let outcome = handler(provider)
                .handle(&json!({ "query": "onion price", "language": locale.code() }), &ctx())
                .await
                .unwrap();

            assert!(outcome.fallback);
            assert_eq!(outcome.data, MarketAnalysis::unavailable(*locale));
        }
    }

    #[tokio::test]
    async fn unknown_language_falls_back_in_english() {
        let outcome = handler(MockAIProvider::new())
            .handle(&json!({ "query": "onion price", "language": "fr" }), &ctx())
            .await
            .unwrap();

        assert_eq!(outcome.data, MarketAnalysis::unavailable(Locale::En));
        assert_eq!(outcome.data.recommendation, "Service Unavailable");
    }

    #[tokio::test]
    async fn missing_query_is_rejected_before_model_call() {
        let provider = MockAIProvider::new();
        let handler = MarketAnalysisHandler::new(Arc::new(FlowInvoker::new(
            Arc::new(provider.clone()),
            Arc::new(JsonSchemaValidator::new()),
        )));

        let err = handler.handle(&json!({ "language": "hi" }), &ctx()).await.unwrap_err();

        assert!(err.is_invalid_input());
        assert_eq!(provider.call_count(), 0);
    }
}
