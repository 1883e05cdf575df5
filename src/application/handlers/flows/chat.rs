//! ChatHandler - chatbot reply with intent routing.

use std::sync::Arc;

use serde_json::Value;

use super::invoker::{FlowContext, FlowError, FlowInvoker, FlowOutcome, GenerationStep};
use crate::domain::flows::{ChatInput, ChatReply, ChatResponse, FlowSchema};

pub struct ChatHandler {
    invoker: Arc<FlowInvoker>,
}

impl ChatHandler {
    pub fn new(invoker: Arc<FlowInvoker>) -> Self {
        Self { invoker }
    }

    pub async fn handle(
        &self,
        payload: &Value,
        ctx: &FlowContext,
    ) -> Result<FlowOutcome<ChatResponse>, FlowError> {
        let input: ChatInput = self.invoker.parse_input(FlowSchema::ChatInput, payload)?;
        Ok(self.reply(&input, ctx).await)
    }

    /// Runs an already-validated chat input. Always produces a reply.
    pub async fn reply(&self, input: &ChatInput, ctx: &FlowContext) -> FlowOutcome<ChatResponse> {
        tracing::info!(trace_id = %ctx.trace_id, language = input.language.code(), "Chat started");

        let step = GenerationStep::new("chat", input.prompt(), FlowSchema::ChatReply);
        match self.invoker.generate::<ChatReply>(ctx, step).await {
            Ok(reply) => {
                tracing::info!(trace_id = %ctx.trace_id, intent = reply.intent.as_str(), "Chat finished");
                FlowOutcome::generated(reply.into_response())
            }
            Err(e) => {
                tracing::error!(trace_id = %ctx.trace_id, error = %e, "Chat failed, serving fallback");
                FlowOutcome::fallback(ChatReply::unavailable(input.language).into_response())
            }
        }
    }
}
