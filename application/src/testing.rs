//! Gateway test doubles shared by the agent and dispatch tests.

use crate::ports::llm_gateway::{
    FunctionCallOutcome, GatewayError, GenerateRequest, LlmGateway, ToolSchema,
};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Scripted in-memory gateway.
#[derive(Default)]
pub(crate) struct StubGateway {
    reply: Option<String>,
    fail: bool,
    tool_call: Option<(String, Value)>,
    calls: AtomicUsize,
}

impl StubGateway {
    /// Always answers with the given text.
    pub(crate) fn replying(text: impl Into<String>) -> Self {
        Self {
            reply: Some(text.into()),
            ..Self::default()
        }
    }

    /// Every call fails with a provider error.
    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `function_call` returns this tool call instead of a message.
    pub(crate) fn calling(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            tool_call: Some((name.into(), arguments)),
            ..Self::default()
        }
    }

    /// Number of gateway invocations observed so far.
    pub(crate) fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn reply_text(&self) -> String {
        self.reply.clone().unwrap_or_else(|| "stub reply".to_string())
    }
}

#[async_trait]
impl LlmGateway for StubGateway {
    async fn generate(&self, _request: GenerateRequest) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GatewayError::Provider("stub failure".to_string()));
        }
        Ok(self.reply_text())
    }

    async fn function_call(
        &self,
        _request: GenerateRequest,
        _tools: &[ToolSchema],
    ) -> Result<FunctionCallOutcome, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(GatewayError::Provider("stub failure".to_string()));
        }
        match &self.tool_call {
            Some((name, arguments)) => Ok(FunctionCallOutcome::Call {
                name: name.clone(),
                arguments: arguments.clone(),
            }),
            None => Ok(FunctionCallOutcome::Message(self.reply_text())),
        }
    }
}
