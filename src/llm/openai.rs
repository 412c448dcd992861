//! OpenAI 兼容 API 客户端
//!
//! 通过 async_openai 调用任意 OpenAI 兼容端点（可配置 base_url），
//! 以 response_format=json_schema 承载结构化输出约定；支持 DeepSeek、OpenAI、自建代理等。

use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
    ResponseFormatJsonSchema,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::llm::{CompletionClient, CompletionRequest, CompletionResponse, LlmError};

/// OpenAI 兼容客户端：持有 Client，generate 时组 system + user 两条消息并取首条 content
pub struct OpenAiCompletionClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompletionClient {
    pub fn new(base_url: Option<&str>, api_key: Option<&str>) -> Self {
        let api_key = api_key
            .map(String::from)
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .unwrap_or_else(|| "sk-placeholder".to_string());

        let config = if let Some(url) = base_url {
            OpenAIConfig::new().with_api_base(url).with_api_key(api_key)
        } else {
            OpenAIConfig::new().with_api_key(api_key)
        };

        Self {
            client: Client::with_config(config),
        }
    }

    fn to_messages(
        &self,
        request: &CompletionRequest,
    ) -> Result<Vec<ChatCompletionRequestMessage>, LlmError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system_instruction.clone())
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt.clone())
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;
        Ok(vec![
            ChatCompletionRequestMessage::System(system),
            ChatCompletionRequestMessage::User(user),
        ])
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompletionClient {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let json_schema = ResponseFormatJsonSchema {
            name: "agent_output".to_string(),
            description: None,
            schema: Some(request.response_schema.clone()),
            strict: Some(false),
        };

        let openai_request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages(self.to_messages(request)?)
            .temperature(request.temperature)
            .response_format(ResponseFormat::JsonSchema { json_schema })
            .build()
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(openai_request)
            .await
            .map_err(|e| LlmError::ApiError(e.to_string()))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(CompletionResponse::from_text(content))
    }
}
