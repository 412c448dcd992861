//! Agent 1：需求评审
//!
//! 对原始需求文本做输入清洗后跑推理引擎，产出规范化的 ValidatedSpec 列表。
//! 输入带 [JIRA SOURCE] 前缀时，角色指令要求回填 externalSource/externalKey。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::agent::engine::{AgentRuntime, AgentTask};
use crate::agent::parser::ToolCall;
use crate::agent::prompts::REVIEWER_INSTRUCTION;
use crate::agent::sanitize::sanitize_requirements;
use crate::core::{AgentError, OrchestrationMetrics, RunOutcome, ValidatedSpec, WorkflowSettings};

/// 评审智能体的结构化输出载荷
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReviewerPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call: Option<ToolCall>,
    #[serde(default)]
    pub specs: Vec<ValidatedSpec>,
}

/// 评审结果切片
#[derive(Debug, Clone)]
pub struct ReviewReport {
    pub specs: Vec<ValidatedSpec>,
    pub thinking: String,
    pub metrics: OrchestrationMetrics,
    pub outcome: RunOutcome,
}

fn reviewer_task() -> Result<AgentTask, AgentError> {
    let schema = serde_json::to_value(schemars::schema_for!(ReviewerPayload))
        .map_err(|e| AgentError::JsonError(e.to_string()))?;
    Ok(AgentTask {
        instruction: REVIEWER_INSTRUCTION,
        field: "specs",
        schema,
        empty: json!([]),
        thinking_budget: Some(4000),
    })
}

/// 评审原始需求；仅在客户端未配置或取消时返回 Err，其余失败降级为空列表
pub async fn review_requirements(
    runtime: &AgentRuntime,
    raw_input: &str,
    settings: &WorkflowSettings,
) -> Result<ReviewReport, AgentError> {
    let sanitized = sanitize_requirements(raw_input);
    let seed = format!(
        "Analyze the following product requirements and output a list of Validated Requirements \
         Specifications. If the input starts with [JIRA SOURCE], preserve that context in the \
         external metadata fields. Input: {}",
        sanitized
    );

    let run = runtime.run(&reviewer_task()?, &seed, settings).await?;
    let specs: Vec<ValidatedSpec> = serde_json::from_value(run.data).unwrap_or_default();
    Ok(ReviewReport {
        specs,
        thinking: run.thinking,
        metrics: run.metrics,
        outcome: run.outcome,
    })
}
