use super::persona::Persona;
use super::prompt::system_prompt;
use crate::llm::{AssistantInput, LlmProvider, LlmResult};

/// One stateless round trip: persona as system prompt, `message` as the only user
/// turn. No earlier turns are forwarded.
pub async fn chat<P: LlmProvider>(
    provider: &P,
    persona: &Persona,
    message: &str,
) -> LlmResult<String> {
    let output = provider
        .generate(AssistantInput {
            user_message: message.to_string(),
            system_instruction: Some(system_prompt(persona)),
        })
        .await?;
    Ok(output.text)
}
