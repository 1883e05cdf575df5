//! E-learning handlers: curated video search and article summaries.

use std::sync::Arc;

use serde_json::Value;

use super::invoker::{
    FlowContext, FlowError, FlowInvoker, FlowOutcome, GenerationStep, UpstreamError,
};
use crate::domain::flows::{
    ArticleSummary, ArticleSummaryInput, FlowSchema, VideoSearchInput, VideoSearchResults,
};

pub struct VideoSearchHandler {
    invoker: Arc<FlowInvoker>,
}

impl VideoSearchHandler {
    pub fn new(invoker: Arc<FlowInvoker>) -> Self {
        Self { invoker }
    }

    pub async fn handle(
        &self,
        payload: &Value,
        ctx: &FlowContext,
    ) -> Result<FlowOutcome<VideoSearchResults>, FlowError> {
        let input: VideoSearchInput = self
            .invoker
            .parse_input(FlowSchema::VideoSearchInput, payload)?;

        tracing::info!(trace_id = %ctx.trace_id, "Video search started");

        match self.search(&input, ctx).await {
            Ok(results) => {
                tracing::info!(trace_id = %ctx.trace_id, count = results.videos.len(), "Video search finished");
                Ok(FlowOutcome::generated(results))
            }
            Err(e) => {
                tracing::error!(trace_id = %ctx.trace_id, error = %e, "Video search failed, serving fallback");
                Ok(FlowOutcome::fallback(VideoSearchResults::empty()))
            }
        }
    }

    async fn search(
        &self,
        input: &VideoSearchInput,
        ctx: &FlowContext,
    ) -> Result<VideoSearchResults, FlowError> {
        let step = GenerationStep::new("video_search", input.prompt(), FlowSchema::VideoSearchResults);
        let mut results: VideoSearchResults = self.invoker.generate(ctx, step).await?;

        let removed = results.retain_curated();
        if removed > 0 {
            tracing::warn!(trace_id = %ctx.trace_id, removed, "Dropped uncurated or duplicate videos");
        }
        if results.videos.is_empty() {
            return Err(UpstreamError::Unusable("no curated videos in reply".to_string()).into());
        }
        Ok(results)
    }
}

pub struct ArticleSummaryHandler {
    invoker: Arc<FlowInvoker>,
}

impl ArticleSummaryHandler {
    pub fn new(invoker: Arc<FlowInvoker>) -> Self {
        Self { invoker }
    }

    pub async fn handle(
        &self,
        payload: &Value,
        ctx: &FlowContext,
    ) -> Result<FlowOutcome<ArticleSummary>, FlowError> {
        let input: ArticleSummaryInput = self
            .invoker
            .parse_input(FlowSchema::ArticleSummaryInput, payload)?;

        tracing::info!(trace_id = %ctx.trace_id, "Article summary started");

        let step = GenerationStep::new("article_summary", input.prompt(), FlowSchema::ArticleSummary);
        match self.invoker.generate::<ArticleSummary>(ctx, step).await {
            Ok(summary) => {
                tracing::info!(trace_id = %ctx.trace_id, relevance = ?summary.relevance, "Article summary finished");
                Ok(FlowOutcome::generated(summary))
            }
            Err(e) => {
                tracing::error!(trace_id = %ctx.trace_id, error = %e, "Article summary failed, serving fallback");
                Ok(FlowOutcome::fallback(ArticleSummary::unavailable(&input.query)))
            }
        }
    }
}
