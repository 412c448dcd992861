//! Agent 2：测试用例编写
//!
//! 把评审产出的规格转换为结构化、可追溯的测试用例。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::agent::engine::{AgentRuntime, AgentTask};
use crate::agent::parser::ToolCall;
use crate::agent::prompts::WRITER_INSTRUCTION;
use crate::core::{AgentError, OrchestrationMetrics, RunOutcome, TestCase, ValidatedSpec, WorkflowSettings};

/// 用例智能体的结构化输出载荷
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct WriterPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    #[serde(default, rename = "testCases")]
    pub test_cases: Vec<TestCase>,
}

/// 用例生成结果切片
#[derive(Debug, Clone)]
pub struct TestCaseReport {
    pub test_cases: Vec<TestCase>,
    pub thinking: String,
    pub metrics: OrchestrationMetrics,
    pub outcome: RunOutcome,
}

fn writer_task() -> Result<AgentTask, AgentError> {
    let schema = serde_json::to_value(schemars::schema_for!(WriterPayload))
        .map_err(|e| AgentError::JsonError(e.to_string()))?;
    Ok(AgentTask {
        instruction: WRITER_INSTRUCTION,
        field: "testCases",
        schema,
        empty: json!([]),
        thinking_budget: Some(4000),
    })
}

/// 从规格生成测试用例；失败语义与评审智能体一致
pub async fn generate_test_cases(
    runtime: &AgentRuntime,
    specs: &[ValidatedSpec],
    settings: &WorkflowSettings,
) -> Result<TestCaseReport, AgentError> {
    let specs_json =
        serde_json::to_string(specs).map_err(|e| AgentError::JsonError(e.to_string()))?;
    let seed = format!(
        "Convert these validated specifications into structured test cases: {}",
        specs_json
    );

    let run = runtime.run(&writer_task()?, &seed, settings).await?;
    let test_cases: Vec<TestCase> = serde_json::from_value(run.data).unwrap_or_default();
    Ok(TestCaseReport {
        test_cases,
        thinking: run.thinking,
        metrics: run.metrics,
        outcome: run.outcome,
    })
}
