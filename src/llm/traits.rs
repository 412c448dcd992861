//! 补全客户端抽象
//!
//! 所有后端（OpenAI 兼容 / 限流包装 / Mock）实现 CompletionClient：
//! generate 接收带结构化输出 schema 的请求，返回可被解析层容忍多种形状的响应。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// 补全层错误；引擎将其吸收为降级的轮次失败，不自动重试
#[derive(Error, Debug, Clone)]
pub enum LlmError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    #[error("Rate limit exceeded, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// 单次结构化输出补全请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub model: String,
    pub prompt: String,
    pub system_instruction: String,
    /// JSON-Schema 形状约定：properties 总是包含 thought、tool_call 与智能体专属字段
    pub response_schema: Value,
    pub temperature: f32,
    pub thinking_budget: Option<u32>,
}

/// 补全响应；文本可能在顶层 text，也可能嵌套在 candidates[0].content.parts[0].text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: CandidateContent,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidatePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl CompletionResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            candidates: Vec::new(),
        }
    }

    pub fn from_candidate_text(text: impl Into<String>) -> Self {
        Self {
            text: None,
            candidates: vec![Candidate {
                content: CandidateContent {
                    parts: vec![CandidatePart {
                        text: Some(text.into()),
                    }],
                },
            }],
        }
    }
}

/// 补全客户端 trait：结构化输出补全
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
