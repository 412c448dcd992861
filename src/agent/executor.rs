//! Agent 3：执行模拟
//!
//! 对测试用例做模拟执行并汇总结构化结果与日志。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::agent::engine::{AgentRuntime, AgentTask};
use crate::agent::parser::ToolCall;
use crate::agent::prompts::EXECUTOR_INSTRUCTION;
use crate::core::{AgentError, ExecutionResult, OrchestrationMetrics, RunOutcome, TestCase, WorkflowSettings};

/// 执行智能体的结构化输出载荷
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecutorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    #[serde(default)]
    pub results: Vec<ExecutionResult>,
}

/// 执行结果切片
#[derive(Debug, Clone)]
pub struct ExecutionReport {
    pub results: Vec<ExecutionResult>,
    pub thinking: String,
    pub metrics: OrchestrationMetrics,
    pub outcome: RunOutcome,
}

fn executor_task() -> Result<AgentTask, AgentError> {
    let schema = serde_json::to_value(schemars::schema_for!(ExecutorPayload))
        .map_err(|e| AgentError::JsonError(e.to_string()))?;
    Ok(AgentTask {
        instruction: EXECUTOR_INSTRUCTION,
        field: "results",
        schema,
        empty: json!([]),
        thinking_budget: None,
    })
}

/// 模拟执行测试用例；失败语义与评审智能体一致
pub async fn execute_tests(
    runtime: &AgentRuntime,
    test_cases: &[TestCase],
    settings: &WorkflowSettings,
) -> Result<ExecutionReport, AgentError> {
    let cases_json =
        serde_json::to_string(test_cases).map_err(|e| AgentError::JsonError(e.to_string()))?;
    let seed = format!(
        "Simulate the execution of these test cases and provide detailed results: {}",
        cases_json
    );

    let run = runtime.run(&executor_task()?, &seed, settings).await?;
    let results: Vec<ExecutionResult> = serde_json::from_value(run.data).unwrap_or_default();
    Ok(ExecutionReport {
        results,
        thinking: run.thinking,
        metrics: run.metrics,
        outcome: run.outcome,
    })
}
