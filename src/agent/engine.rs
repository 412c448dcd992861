//! 多轮推理引擎
//!
//! 状态机：起草 -> (请求工具 -> 观察 -> 起草)* -> 终止（完成 / 预算耗尽 / 降级）。
//! 每轮 await 一次补全调用；出现 tool_call 则经调度器执行并把观察折回下一轮输入，
//! 无 tool_call 即成功终止。轮间检查取消令牌。除「客户端未配置」与取消外不上抛，
//! 失败一律降级为空结果加 thinking 说明。

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::agent::parser::parse_agent_payload;
use crate::agent::prompts::SYSTEM_INSTRUCTION_BASE;
use crate::core::{AgentError, OrchestrationMetrics, RunOutcome, WorkflowSettings};
use crate::llm::{CompletionClient, CompletionRequest};
use crate::mcp::{McpDispatcher, McpRequest};
use crate::memory::{MemoryRole, SessionMemory};

/// 高质量 / 轻量快速模型对；use_flash_model 决定选哪个
#[derive(Debug, Clone)]
pub struct AgentModels {
    pub quality: String,
    pub flash: String,
}

impl Default for AgentModels {
    fn default() -> Self {
        Self {
            quality: "deepseek-reasoner".to_string(),
            flash: "deepseek-chat".to_string(),
        }
    }
}

/// 单个智能体的静态配置：角色指令、输出字段、结构化输出 schema 与空集合回退值
#[derive(Debug, Clone)]
pub struct AgentTask {
    pub instruction: &'static str,
    /// 载荷中的输出键（specs / testCases / results）
    pub field: &'static str,
    pub schema: Value,
    pub empty: Value,
    pub thinking_budget: Option<u32>,
}

/// 单次智能体运行的结果
#[derive(Debug, Clone)]
pub struct AgentRun {
    /// 最终结构化数据；未产出时为 task.empty
    pub data: Value,
    /// 全部轮次 rationale 与观察的拼接
    pub thinking: String,
    pub metrics: OrchestrationMetrics,
    pub outcome: RunOutcome,
}

/// 智能体运行时：显式注入补全客户端、调度器与会话记忆，
/// 生命周期由组合根（main / 测试）持有
pub struct AgentRuntime {
    client: Option<Arc<dyn CompletionClient>>,
    dispatcher: Arc<McpDispatcher>,
    memory: Arc<Mutex<SessionMemory>>,
    models: AgentModels,
    cancel: CancellationToken,
    request_timeout: Duration,
}

impl AgentRuntime {
    pub fn new(
        client: Option<Arc<dyn CompletionClient>>,
        dispatcher: Arc<McpDispatcher>,
        memory: Arc<Mutex<SessionMemory>>,
    ) -> Self {
        Self {
            client,
            dispatcher,
            memory,
            models: AgentModels::default(),
            cancel: CancellationToken::new(),
            request_timeout: Duration::from_secs(60),
        }
    }

    pub fn with_models(mut self, models: AgentModels) -> Self {
        self.models = models;
        self
    }

    pub fn with_request_timeout(mut self, secs: u64) -> Self {
        self.request_timeout = Duration::from_secs(secs);
        self
    }

    /// 取消当前与后续轮次（轮间边界生效）
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn dispatcher(&self) -> &Arc<McpDispatcher> {
        &self.dispatcher
    }

    pub fn memory(&self) -> &Arc<Mutex<SessionMemory>> {
        &self.memory
    }

    fn memory_lock(&self) -> MutexGuard<'_, SessionMemory> {
        self.memory.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// 运行一个智能体：最多 settings.max_iterations 轮补全 + 工具调度
    pub async fn run(
        &self,
        task: &AgentTask,
        seed_input: &str,
        settings: &WorkflowSettings,
    ) -> Result<AgentRun, AgentError> {
        let Some(client) = self.client.as_ref() else {
            return Err(AgentError::ClientNotConfigured);
        };

        let start = Instant::now();
        let mut metrics = OrchestrationMetrics::default();
        let system = format!("{}\n\n{}", SYSTEM_INSTRUCTION_BASE, task.instruction);
        let mut input = format!(
            "[SESSION CONTEXT]\n{}\n\n[TASK]\n{}\n\n[AVAILABLE SKILLS]\n{}",
            self.memory_lock().get_context(),
            seed_input,
            self.dispatcher.registry().describe_all(),
        );

        let mut thinking = String::new();
        let mut final_data: Option<Value> = None;
        let mut outcome = RunOutcome::Exhausted;
        let max_passes = settings.max_iterations.max(1);

        for pass in 1..=max_passes {
            if self.cancel.is_cancelled() {
                return Err(AgentError::Cancelled);
            }

            metrics.total_tokens_estimated += (input.chars().count() / 4) as u64;
            metrics.average_loop_depth = pass;

            let request = CompletionRequest {
                model: if settings.use_flash_model {
                    self.models.flash.clone()
                } else {
                    self.models.quality.clone()
                },
                prompt: input.clone(),
                system_instruction: system.clone(),
                response_schema: task.schema.clone(),
                temperature: settings.temperature,
                thinking_budget: task.thinking_budget,
            };

            tracing::debug!(field = task.field, pass, "agent pass");
            let response = match timeout(self.request_timeout, client.generate(&request)).await {
                Ok(Ok(response)) => response,
                Ok(Err(e)) => {
                    thinking.push_str(&format!("[Thought Step {}]: AI request failed: {}\n", pass, e));
                    outcome = RunOutcome::Degraded;
                    break;
                }
                Err(_) => {
                    thinking.push_str(&format!(
                        "[Thought Step {}]: AI request timed out after {}s\n",
                        pass,
                        self.request_timeout.as_secs()
                    ));
                    outcome = RunOutcome::Degraded;
                    break;
                }
            };

            let parsed = parse_agent_payload(&response, task.field);
            thinking.push_str(&format!("[Thought Step {}]: {}\n", pass, parsed.thinking));
            self.memory_lock()
                .add(MemoryRole::Assistant, parsed.thinking.clone());

            match parsed.tool_call {
                Some(call) => {
                    metrics.total_tool_calls += 1;
                    let envelope = McpRequest::tool_call(&call.name, call.arguments.clone());
                    let response = self.dispatcher.handle(envelope).await;
                    let observation = match (&response.result, &response.error) {
                        (Some(value), _) => value.to_string(),
                        (None, Some(e)) => serde_json::json!({
                            "error": { "code": e.code, "message": e.message }
                        })
                        .to_string(),
                        (None, None) => "null".to_string(),
                    };

                    thinking.push_str(&format!(
                        "[Observation]: Tool {} returned {}\n",
                        call.name, observation
                    ));
                    self.memory_lock().add(
                        MemoryRole::Observation,
                        format!("Tool {} returned {}", call.name, observation),
                    );

                    let call_json = serde_json::to_string(&call)
                        .unwrap_or_else(|_| call.name.clone());
                    input.push_str(&format!(
                        "\n\n[PREVIOUS THOUGHT]\n{}\n\n[TOOL CALL]\n{}\n\n[OBSERVATION]\n{}",
                        parsed.thinking, call_json, observation
                    ));
                }
                None => {
                    final_data = parsed.data;
                    outcome = RunOutcome::Completed;
                    break;
                }
            }
        }

        metrics.latency_ms = start.elapsed().as_millis() as u64;
        metrics.tool_frequency = self.dispatcher.tool_usage();
        metrics.active_loops = 0;

        tracing::info!(
            field = task.field,
            passes = metrics.average_loop_depth,
            tool_calls = metrics.total_tool_calls,
            latency_ms = metrics.latency_ms,
            outcome = ?outcome,
            "agent run finished"
        );

        Ok(AgentRun {
            data: final_data.unwrap_or_else(|| task.empty.clone()),
            thinking,
            metrics,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockCompletionClient};
    use crate::skills::builtin_registry;
    use serde_json::json;

    fn runtime_with(client: Option<Arc<dyn CompletionClient>>) -> AgentRuntime {
        let registry = Arc::new(builtin_registry().unwrap());
        let dispatcher = Arc::new(McpDispatcher::new(registry, 5));
        let memory = Arc::new(Mutex::new(SessionMemory::default()));
        AgentRuntime::new(client, dispatcher, memory)
    }

    fn task() -> AgentTask {
        AgentTask {
            instruction: "test agent",
            field: "specs",
            schema: json!({"type": "object", "properties": {"thought": {}, "tool_call": {}, "specs": {}}}),
            empty: json!([]),
            thinking_budget: None,
        }
    }

    #[tokio::test]
    async fn test_missing_client_is_fatal() {
        let runtime = runtime_with(None);
        let err = runtime
            .run(&task(), "input", &WorkflowSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ClientNotConfigured));
    }

    #[tokio::test]
    async fn test_single_pass_completion() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.push_text(r#"{"thought": "all good", "specs": []}"#);
        let runtime = runtime_with(Some(mock.clone()));

        let run = runtime
            .run(&task(), "input", &WorkflowSettings::default())
            .await
            .unwrap();
        assert_eq!(run.outcome, RunOutcome::Completed);
        assert_eq!(run.data, json!([]));
        assert!(run.thinking.contains("[Thought Step 1]: all good"));
        assert_eq!(run.metrics.total_tool_calls, 0);
        assert_eq!(run.metrics.average_loop_depth, 1);
        assert!(run.metrics.total_tokens_estimated > 0);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_tool_call_then_answer() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.push_text(
            r#"{"thought": "need jira", "tool_call": {"name": "jira_search", "arguments": {"query": "AUTH"}}}"#,
        );
        mock.push_text(r#"{"thought": "done", "specs": []}"#);
        let runtime = runtime_with(Some(mock.clone()));

        let run = runtime
            .run(&task(), "input", &WorkflowSettings::default())
            .await
            .unwrap();
        assert_eq!(run.outcome, RunOutcome::Completed);
        assert_eq!(mock.call_count(), 2);
        assert_eq!(run.metrics.total_tool_calls, 1);
        assert_eq!(run.metrics.average_loop_depth, 2);
        assert!(run.thinking.contains("[Observation]: Tool jira_search returned"));
        assert_eq!(run.metrics.tool_frequency.get("jira_search"), Some(&1));
    }

    #[tokio::test]
    async fn test_budget_exhaustion_with_pending_tool_call() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.push_text(
            r#"{"thought": "tooling", "tool_call": {"name": "jira_search", "arguments": {}}}"#,
        );
        let runtime = runtime_with(Some(mock.clone()));

        let settings = WorkflowSettings {
            max_iterations: 1,
            ..WorkflowSettings::default()
        };
        let run = runtime.run(&task(), "input", &settings).await.unwrap();

        // 恰好一轮，不多调用；数据落回空集合而非 null
        assert_eq!(mock.call_count(), 1);
        assert_eq!(run.outcome, RunOutcome::Exhausted);
        assert_eq!(run.data, json!([]));
        assert_eq!(run.metrics.total_tool_calls, 1);
        assert_eq!(run.metrics.average_loop_depth, 1);
    }

    #[tokio::test]
    async fn test_client_error_degrades() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.push_error(LlmError::ApiError("API Error".to_string()));
        let runtime = runtime_with(Some(mock));

        let run = runtime
            .run(&task(), "input", &WorkflowSettings::default())
            .await
            .unwrap();
        assert_eq!(run.outcome, RunOutcome::Degraded);
        assert_eq!(run.data, json!([]));
        assert!(run.thinking.contains("AI request failed"));
    }

    #[tokio::test]
    async fn test_unknown_tool_error_is_observed_not_thrown() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.push_text(
            r#"{"thought": "bad tool", "tool_call": {"name": "no_such_tool", "arguments": {}}}"#,
        );
        mock.push_text(r#"{"thought": "recovered", "specs": []}"#);
        let runtime = runtime_with(Some(mock));

        let run = runtime
            .run(&task(), "input", &WorkflowSettings::default())
            .await
            .unwrap();
        assert_eq!(run.outcome, RunOutcome::Completed);
        assert!(run.thinking.contains("Skill not found: no_such_tool"));
    }

    #[tokio::test]
    async fn test_cancellation_between_passes() {
        let mock = Arc::new(MockCompletionClient::new());
        let runtime = runtime_with(Some(mock));
        runtime.cancel();

        let err = runtime
            .run(&task(), "input", &WorkflowSettings::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::Cancelled));
    }

    #[tokio::test]
    async fn test_memory_accumulates_across_runs() {
        let mock = Arc::new(MockCompletionClient::new());
        mock.push_text(r#"{"thought": "first run", "specs": []}"#);
        let runtime = runtime_with(Some(mock));

        let _ = runtime
            .run(&task(), "input", &WorkflowSettings::default())
            .await
            .unwrap();
        let ctx = runtime.memory().lock().unwrap().get_context();
        assert!(ctx.contains("ASSISTANT: first run"));
    }
}
