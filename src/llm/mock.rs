//! Mock 补全客户端（用于测试与无 API Key 的本地运行）
//!
//! 可预先编排一串响应 / 错误；脚本耗尽后根据请求 schema 推断智能体专属字段，
//! 返回 {"thought": ..., "<field>": []} 的空载荷，便于离线跑通整条流水线。

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::llm::{CompletionClient, CompletionRequest, CompletionResponse, LlmError};

/// Mock 客户端：按编排顺序出队响应，并统计 generate 调用次数
#[derive(Default)]
pub struct MockCompletionClient {
    script: Mutex<VecDeque<Result<CompletionResponse, LlmError>>>,
    calls: AtomicU32,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn script_lock(&self) -> MutexGuard<'_, VecDeque<Result<CompletionResponse, LlmError>>> {
        self.script.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 追加一条顶层 text 形状的响应
    pub fn push_text(&self, text: impl Into<String>) {
        self.script_lock()
            .push_back(Ok(CompletionResponse::from_text(text)));
    }

    /// 追加一条 candidates 嵌套形状的响应
    pub fn push_candidate_text(&self, text: impl Into<String>) {
        self.script_lock()
            .push_back(Ok(CompletionResponse::from_candidate_text(text)));
    }

    pub fn push_response(&self, response: CompletionResponse) {
        self.script_lock().push_back(Ok(response));
    }

    pub fn push_error(&self, error: LlmError) {
        self.script_lock().push_back(Err(error));
    }

    /// 累计 generate 调用次数
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// 脚本耗尽时的缺省载荷：从 schema properties 里找出智能体专属字段名
    fn default_payload(request: &CompletionRequest) -> CompletionResponse {
        let field = request
            .response_schema
            .get("properties")
            .and_then(|p| p.as_object())
            .and_then(|props| {
                props
                    .keys()
                    .find(|k| k.as_str() != "thought" && k.as_str() != "tool_call")
                    .cloned()
            })
            .unwrap_or_else(|| "data".to_string());
        CompletionResponse::from_text(format!(
            "{{\"thought\": \"Mock response, no backend configured.\", \"{}\": []}}",
            field
        ))
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn generate(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script_lock().pop_front() {
            Some(outcome) => outcome,
            None => Ok(Self::default_payload(request)),
        }
    }
}
