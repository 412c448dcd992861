//! 三智能体流水线编排
//!
//! 评审 -> 编写 -> 执行严格串行，每个智能体等待上一个的全部多轮推理完成；
//! 逐阶段折叠指标并拼接 thinking 轨迹。只有致命错误（客户端未配置 / 取消）
//! 会把状态置为 Failed，降级的智能体以空数组继续流转。

use crate::agent::{execute_tests, generate_test_cases, review_requirements, AgentRuntime};
use crate::core::{AgentError, OrchestrationMetrics, WorkflowSettings, WorkflowState, WorkflowStatus};

/// 将单个智能体的指标折入流水线累计值
fn fold_metrics(total: &mut OrchestrationMetrics, stage: &OrchestrationMetrics) {
    total.total_tool_calls += stage.total_tool_calls;
    total.total_tokens_estimated += stage.total_tokens_estimated;
    total.latency_ms = if total.latency_ms == 0 {
        stage.latency_ms
    } else {
        (total.latency_ms + stage.latency_ms) / 2
    };
    for (name, count) in &stage.tool_frequency {
        total.tool_frequency.insert(name.clone(), *count);
    }
}

fn fail(mut state: WorkflowState, err: AgentError) -> WorkflowState {
    tracing::error!(error = %err, "pipeline aborted");
    state.status = WorkflowStatus::Failed;
    state.error = Some(err.to_string());
    state
        .thinking_process
        .push_str("\n[ERROR] Workflow aborted.");
    state.metrics.active_loops = 0;
    state
}

/// 对一段原始需求跑完整条流水线，返回最终状态快照
pub async fn run_pipeline(
    runtime: &AgentRuntime,
    raw_requirements: &str,
    settings: &WorkflowSettings,
) -> WorkflowState {
    let mut state = WorkflowState::new(raw_requirements, settings.clone());
    if raw_requirements.trim().is_empty() {
        return state;
    }

    state.status = WorkflowStatus::Reviewing;
    state.metrics.active_loops = 1;
    state.thinking_process = "[AGENT 1] Reviewing specs...".to_string();
    tracing::info!("pipeline started");

    let review = match review_requirements(runtime, raw_requirements, settings).await {
        Ok(report) => report,
        Err(e) => return fail(state, e),
    };
    fold_metrics(&mut state.metrics, &review.metrics);
    let depth_reviewer = review.metrics.average_loop_depth;
    state.validated_specs = review.specs;
    state.status = WorkflowStatus::Writing;
    state.thinking_process = format!(
        "[AGENT 1] {}\n[AGENT 2] Designing tests...",
        review.thinking.trim_end()
    );

    let writing =
        match generate_test_cases(runtime, &state.validated_specs, settings).await {
            Ok(report) => report,
            Err(e) => return fail(state, e),
        };
    fold_metrics(&mut state.metrics, &writing.metrics);
    let depth_writer = writing.metrics.average_loop_depth;
    state.test_cases = writing.test_cases;
    state.status = WorkflowStatus::Executing;
    state.thinking_process = format!(
        "[AGENT 1] {}\n[AGENT 2] {}\n[AGENT 3] Running execution...",
        review.thinking.trim_end(),
        writing.thinking.trim_end()
    );

    let execution = match execute_tests(runtime, &state.test_cases, settings).await {
        Ok(report) => report,
        Err(e) => return fail(state, e),
    };
    fold_metrics(&mut state.metrics, &execution.metrics);
    let depth_executor = execution.metrics.average_loop_depth;
    state.results = execution.results;
    state.status = WorkflowStatus::Completed;
    state.thinking_process = format!(
        "[AGENT 1] {}\n[AGENT 2] {}\n[AGENT 3] {}\nPipeline complete.",
        review.thinking.trim_end(),
        writing.thinking.trim_end(),
        execution.thinking.trim_end()
    );
    state.metrics.average_loop_depth = (depth_reviewer + depth_writer + depth_executor) / 3;
    state.metrics.active_loops = 0;

    tracing::info!(
        specs = state.validated_specs.len(),
        test_cases = state.test_cases.len(),
        results = state.results.len(),
        "pipeline complete"
    );
    state
}
