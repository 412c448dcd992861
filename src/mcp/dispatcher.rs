//! 工具调度器
//!
//! 接收 MCP 信封，查找并执行技能，所有失败都折算成 error 信封而非异常。
//! 每次 tools/call（无论成功与否）都会累加生命周期内的 tool_frequency 计数，
//! 供指标层读取；每次调用输出结构化审计日志（JSON）。

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::time::timeout;

use crate::mcp::protocol::{
    McpRequest, McpResponse, ERROR_INTERNAL, ERROR_METHOD_NOT_FOUND, METHOD_TOOLS_CALL,
    METHOD_TOOLS_LIST,
};
use crate::skills::SkillRegistry;

/// 调度器：持有技能注册表、单次调用超时与生命周期使用计数
pub struct McpDispatcher {
    registry: Arc<SkillRegistry>,
    usage: Mutex<HashMap<String, u64>>,
    timeout: Duration,
}

impl McpDispatcher {
    pub fn new(registry: Arc<SkillRegistry>, timeout_secs: u64) -> Self {
        Self {
            registry,
            usage: Mutex::new(HashMap::new()),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn registry(&self) -> &Arc<SkillRegistry> {
        &self.registry
    }

    /// 生命周期内各工具被请求的次数快照
    pub fn tool_usage(&self) -> HashMap<String, u64> {
        self.usage_lock().clone()
    }

    fn usage_lock(&self) -> MutexGuard<'_, HashMap<String, u64>> {
        self.usage.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 处理一个类型化的请求信封；永不失败，一切问题都落入 error 字段
    pub async fn handle(&self, request: McpRequest) -> McpResponse {
        tracing::debug!(method = %request.method, "mcp request");
        match request.method.as_str() {
            METHOD_TOOLS_LIST => McpResponse::success(
                request.id,
                serde_json::json!({ "tools": self.registry.describe_tools() }),
            ),
            METHOD_TOOLS_CALL => self.dispatch_call(request).await,
            other => McpResponse::failure(
                request.id,
                ERROR_METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }

    /// 处理未经类型化的原始信封：畸形 / null 请求返回通用错误信封，不会 panic
    pub async fn handle_raw(&self, raw: Value) -> McpResponse {
        match serde_json::from_value::<McpRequest>(raw) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "malformed mcp request");
                McpResponse::failure(Value::Null, ERROR_INTERNAL, "Internal error")
            }
        }
    }

    async fn dispatch_call(&self, request: McpRequest) -> McpResponse {
        let name = request
            .params
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let arguments = request
            .params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));

        // 无论后续是否命中技能，调用企图本身就计入频率；无名请求除外
        if !name.is_empty() {
            *self.usage_lock().entry(name.clone()).or_insert(0) += 1;
        }

        let Some(skill) = self.registry.get(&name) else {
            return McpResponse::failure(
                request.id,
                ERROR_METHOD_NOT_FOUND,
                format!("Skill not found: {}", name),
            );
        };

        let start = Instant::now();
        let result = timeout(self.timeout, skill.execute(arguments.clone())).await;

        let outcome = match &result {
            Ok(Ok(_)) => "ok",
            Ok(Err(_)) => "error",
            Err(_) => "timeout",
        };
        let audit = serde_json::json!({
            "event": "tool_audit",
            "tool": name,
            "outcome": outcome,
            "duration_ms": start.elapsed().as_millis() as u64,
            "args_preview": args_preview(&arguments),
        });
        tracing::info!(audit = %audit, "tool");

        match result {
            Ok(Ok(value)) => McpResponse::success(request.id, value),
            Ok(Err(e)) => {
                tracing::warn!(tool = %name, error = %e, "skill execution failed");
                McpResponse::failure(request.id, ERROR_INTERNAL, "Internal error")
            }
            Err(_) => McpResponse::failure(
                request.id,
                ERROR_INTERNAL,
                format!("Tool execution timed out: {}", name),
            ),
        }
    }
}

fn args_preview(args: &Value) -> String {
    let s = args.to_string();
    if s.len() > 200 {
        format!("{}...", s.chars().take(200).collect::<String>())
    } else {
        s
    }
}
