//! OpenAI chat-completions model with function tools.

use super::{LanguageModel, TurnRequest};
use crate::agent::{AgentTurn, ToolInvocation};
use crate::config::ModelSettings;
use crate::error::{KlausulError, Result};
use crate::openai::create_client_with_timeout;
use crate::tools::ToolDescriptor;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
    FunctionObject,
};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Agent model backed by the OpenAI API.
pub struct OpenAIModel {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
}

impl OpenAIModel {
    /// Create a model client from settings. The API key is read from `OPENAI_API_KEY`.
    pub fn new(settings: &ModelSettings) -> Result<Self> {
        Ok(Self {
            client: create_client_with_timeout(settings.timeout())?,
            model: settings.name.clone(),
            temperature: settings.temperature,
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAIModel {
    async fn next_turn(&self, request: TurnRequest<'_>) -> Result<AgentTurn> {
        let messages = build_messages(&request)?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(&self.model)
            .messages(messages)
            .temperature(self.temperature);
        // The API rejects an empty tools array.
        if !request.tools.is_empty() {
            args.tools(tool_definitions(request.tools));
        }
        let chat_request = args.build().map_err(|e| KlausulError::Agent(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| KlausulError::OpenAI(format!("Agent API error: {}", e)))?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| KlausulError::Agent("No response from model".to_string()))?;

        let mut tool_calls = choice.message.tool_calls.unwrap_or_default().into_iter();
        match tool_calls.next() {
            Some(call) => {
                let dropped = tool_calls.count();
                if dropped > 0 {
                    warn!("Model requested {} extra tool call(s) in one turn; only the first runs", dropped);
                }
                debug!("Model selected tool {}", call.function.name);
                Ok(AgentTurn::ToolCall(ToolInvocation {
                    id: call.id,
                    name: call.function.name,
                    arguments: call.function.arguments,
                }))
            }
            None => Ok(AgentTurn::FinalAnswer(choice.message.content.unwrap_or_default())),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Build the chat history for one turn: system prompt, query, then each
/// scratchpad entry as an assistant tool call followed by its result.
pub fn build_messages(request: &TurnRequest<'_>) -> Result<Vec<ChatCompletionRequestMessage>> {
    let mut messages: Vec<ChatCompletionRequestMessage> = vec![
        ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_prompt.to_string())
            .build()
            .map_err(|e| KlausulError::Agent(e.to_string()))?
            .into(),
        ChatCompletionRequestUserMessageArgs::default()
            .content(request.query.to_string())
            .build()
            .map_err(|e| KlausulError::Agent(e.to_string()))?
            .into(),
    ];

    for entry in request.scratchpad.entries() {
        let call = ChatCompletionMessageToolCall {
            id: entry.invocation.id.clone(),
            r#type: ChatCompletionToolType::Function,
            function: FunctionCall {
                name: entry.invocation.name.clone(),
                arguments: entry.invocation.arguments.clone(),
            },
        };

        messages.push(
            ChatCompletionRequestAssistantMessageArgs::default()
                .tool_calls(vec![call])
                .build()
                .map_err(|e| KlausulError::Agent(e.to_string()))?
                .into(),
        );
        messages.push(
            ChatCompletionRequestToolMessageArgs::default()
                .tool_call_id(entry.invocation.id.clone())
                .content(entry.observation.clone())
                .build()
                .map_err(|e| KlausulError::Agent(e.to_string()))?
                .into(),
        );
    }

    Ok(messages)
}

/// OpenAI function definitions for the registered tools.
pub fn tool_definitions(tools: &[ToolDescriptor]) -> Vec<ChatCompletionTool> {
    tools
        .iter()
        .map(|tool| ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: FunctionObject {
                name: tool.name.clone(),
                description: Some(tool.description.clone()),
                parameters: Some(tool.parameters.clone()),
                strict: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{Scratchpad, ScratchpadEntry};
    use serde_json::json;

    #[test]
    fn test_messages_replay_scratchpad() {
        let mut scratchpad = Scratchpad::new();
        scratchpad.push(ScratchpadEntry {
            invocation: ToolInvocation {
                id: "call_1".to_string(),
                name: "fetch_sec_contract".to_string(),
                arguments: r#"{"ticker":"TSLA"}"#.to_string(),
            },
            observation: "Source: x\n\ntext".to_string(),
            failed: false,
        });

        let request = TurnRequest {
            system_prompt: "system",
            query: "Summarize the latest 10-K from Tesla",
            scratchpad: &scratchpad,
            tools: &[],
        };
        let messages = build_messages(&request).unwrap();

        assert_eq!(messages.len(), 4);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
        assert!(matches!(messages[2], ChatCompletionRequestMessage::Assistant(_)));
        match &messages[3] {
            ChatCompletionRequestMessage::Tool(tool) => assert_eq!(tool.tool_call_id, "call_1"),
            other => panic!("Expected tool message, got {:?}", other),
        }
    }

    #[test]
    fn test_tool_definitions() {
        let tools = vec![ToolDescriptor {
            name: "save_text_to_file".to_string(),
            description: "Saves text.".to_string(),
            parameters: json!({"type": "object"}),
        }];
        let defs = tool_definitions(&tools);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].function.name, "save_text_to_file");
        assert_eq!(defs[0].function.description.as_deref(), Some("Saves text."));
    }
}
