//! 流水线状态与领域类型
//!
//! 定义三个智能体产出的结构化记录（ValidatedSpec / TestCase / ExecutionResult）、
//! 流水线状态机与每次运行的编排指标。记录类型同时派生 JsonSchema，
//! 供适配器生成结构化输出的 response schema。

use std::collections::HashMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// 流水线状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkflowStatus {
    /// 空闲，等待输入
    Idle,
    /// Agent 1 正在评审需求
    Reviewing,
    /// Agent 2 正在编写测试用例
    Writing,
    /// Agent 3 正在模拟执行
    Executing,
    /// 全部完成
    Completed,
    /// 致命错误中止
    Failed,
}

/// 经过评审的需求规格（Agent 1 产出）
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedSpec {
    pub requirement_id: String,
    pub title: String,
    pub description: String,
    pub acceptance_criteria: Vec<String>,
    pub risk_classification: String,
    pub priority: String,
    pub ambiguities: Vec<String>,
    /// 外部来源（如 "Jira"），输入带 [JIRA SOURCE] 前缀时填充
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_key: Option<String>,
}

/// 可追溯的测试用例（Agent 2 产出）
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub id: String,
    pub linked_requirement_ids: Vec<String>,
    pub category: String,
    pub preconditions: String,
    pub steps: Vec<String>,
    pub expected_outcomes: String,
    pub is_automation_candidate: bool,
}

/// 模拟执行结果（Agent 3 产出），status 为 "PASS" 或 "FAIL"
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub test_case_id: String,
    pub status: String,
    pub logs: String,
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_issue_url: Option<String>,
}

/// 单次工作流调用的可调参数
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSettings {
    /// 单个智能体内最大推理轮数
    pub max_iterations: u32,
    pub temperature: f32,
    /// 选择轻量快速模型而非高质量模型
    pub use_flash_model: bool,
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            temperature: 0.7,
            use_flash_model: false,
        }
    }
}

/// 编排指标：每次智能体调用新建，tool_frequency 例外（来自调度器的生命周期计数）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrchestrationMetrics {
    pub total_tool_calls: u32,
    /// 实际执行的推理轮数
    pub average_loop_depth: u32,
    /// 粗略估算（输入字符数 / 4 逐轮累加），不是精确值
    pub total_tokens_estimated: u64,
    pub latency_ms: u64,
    pub tool_frequency: HashMap<String, u64>,
    pub active_loops: u32,
}

/// 流水线全量状态：由 run_pipeline 产出，各智能体只生产自己的切片
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    pub status: WorkflowStatus,
    pub raw_requirements: String,
    pub validated_specs: Vec<ValidatedSpec>,
    pub test_cases: Vec<TestCase>,
    pub results: Vec<ExecutionResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 所有轮次 rationale 与观察的人类可读拼接
    pub thinking_process: String,
    pub settings: WorkflowSettings,
    pub metrics: OrchestrationMetrics,
}

impl WorkflowState {
    pub fn new(raw_requirements: impl Into<String>, settings: WorkflowSettings) -> Self {
        Self {
            status: WorkflowStatus::Idle,
            raw_requirements: raw_requirements.into(),
            validated_specs: Vec::new(),
            test_cases: Vec::new(),
            results: Vec::new(),
            error: None,
            thinking_process: "System ready.".to_string(),
            settings,
            metrics: OrchestrationMetrics::default(),
        }
    }
}
