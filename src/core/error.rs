//! 流水线错误类型与单次运行的终止状态
//!
//! 仅「客户端未配置」与「用户取消」会作为 Err 上抛；传输 / 解析 / 工具失败
//! 一律降级为空结果加说明性 thinking 文本，终止原因由 RunOutcome 区分。

use thiserror::Error;

/// 流水线运行过程中可能出现的错误
#[derive(Error, Debug)]
pub enum AgentError {
    /// 致命：补全客户端未初始化，任何工作流都无法继续
    #[error("Completion client not configured. Set an API key or [llm] config.")]
    ClientNotConfigured,

    #[error("Cancelled by user")]
    Cancelled,

    /// 同名技能重复注册（注册期校验）
    #[error("Duplicate skill registration: {0}")]
    DuplicateSkill(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    JsonError(String),
}

/// 单次智能体运行的终止状态
///
/// Completed：模型给出最终结构化输出；Exhausted：轮次预算耗尽时仍在请求工具；
/// Degraded：补全调用失败 / 超时 / 限流，结果降级为空集合。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Exhausted,
    Degraded,
}
