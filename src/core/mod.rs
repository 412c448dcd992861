//! 核心层：错误类型、流水线状态与三智能体编排

pub mod error;
pub mod pipeline;
pub mod state;

pub use error::{AgentError, RunOutcome};
pub use pipeline::run_pipeline;
pub use state::{
    ExecutionResult, OrchestrationMetrics, TestCase, ValidatedSpec, WorkflowSettings,
    WorkflowState, WorkflowStatus,
};
