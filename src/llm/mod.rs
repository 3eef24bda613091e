pub mod openai;
pub mod provider;

pub use openai::OpenAiProvider;
pub use provider::{AssistantInput, AssistantOutput, LlmError, LlmProvider, LlmResult};
