//! Dummy LLM provider — echoes input back prefixed with `[echo]`, or replays
//! a scripted reply. Used for keyless runs and for exercising the full
//! chain offline in tests.

use crate::llm::{LlmResponse, ProviderError, TokenStream};

#[derive(Debug, Clone)]
pub struct DummyProvider {
    reply: Option<String>,
}

impl DummyProvider {
    /// Echo mode: replies with `[echo] <input>`.
    pub fn echo() -> Self {
        Self { reply: None }
    }

    /// Scripted mode: replies with `reply` regardless of input.
    pub fn scripted(reply: impl Into<String>) -> Self {
        Self { reply: Some(reply.into()) }
    }

    fn reply_for(&self, content: &str) -> String {
        match &self.reply {
            Some(r) => r.clone(),
            None => format!("[echo] {content}"),
        }
    }

    pub async fn complete(&self, content: &str) -> Result<LlmResponse, ProviderError> {
        Ok(LlmResponse { text: self.reply_for(content), usage: None })
    }

    /// Streams the reply split on whitespace boundaries, so chunk joins
    /// reproduce the reply byte-for-byte.
    pub async fn complete_stream(&self, content: &str) -> Result<TokenStream, ProviderError> {
        let text = self.reply_for(content);
        let chunks = text
            .split_inclusive(char::is_whitespace)
            .map(str::to_string)
            .collect();
        Ok(TokenStream::from_chunks(chunks))
    }
}
