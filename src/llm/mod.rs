//! 补全层：客户端抽象与实现（OpenAI 兼容 / 限流包装 / Mock）

pub mod limiter;
pub mod mock;
pub mod openai;
pub mod traits;

use std::sync::Arc;

pub use limiter::RateLimitedClient;
pub use mock::MockCompletionClient;
pub use openai::OpenAiCompletionClient;
pub use traits::{
    Candidate, CandidateContent, CandidatePart, CompletionClient, CompletionRequest,
    CompletionResponse, LlmError,
};

use crate::config::AppConfig;

/// 根据配置与环境变量选择补全后端；无任何 API Key 时回退到 Mock（离线演示）
pub fn create_client_from_config(cfg: &AppConfig) -> Arc<dyn CompletionClient> {
    let api_key = std::env::var("QA_NEXUS_API_KEY")
        .or_else(|_| std::env::var("DEEPSEEK_API_KEY"))
        .or_else(|_| std::env::var("OPENAI_API_KEY"))
        .ok();

    match api_key {
        Some(key) => {
            tracing::info!(
                provider = %cfg.llm.provider,
                model = %cfg.llm.quality_model,
                "using OpenAI-compatible completion backend"
            );
            let inner = Arc::new(OpenAiCompletionClient::new(
                cfg.llm.base_url.as_deref(),
                Some(&key),
            ));
            Arc::new(RateLimitedClient::new(inner, cfg.llm.rate_limit_per_minute))
        }
        None => {
            tracing::warn!("no API key set, using mock completion client");
            Arc::new(MockCompletionClient::new())
        }
    }
}
