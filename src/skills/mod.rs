//! 技能目录
//!
//! 技能是模型可在推理中途请求的命名工具，全部为模拟实现（短延迟 + 预制结果），
//! 进程启动时注册一次，此后只读。

pub mod code_analysis;
pub mod github;
pub mod jira;
pub mod knowledge;
pub mod performance;
pub mod registry;
pub mod test_runner;

pub use code_analysis::CodeAnalysisSkill;
pub use github::GithubIssueSkill;
pub use jira::JiraSearchSkill;
pub use knowledge::KnowledgeBaseSkill;
pub use performance::PerformanceAuditSkill;
pub use registry::{Skill, SkillRegistry};
pub use test_runner::TestRunnerSkill;

use crate::core::AgentError;

/// 构建内置技能目录（进程启动时调用一次）
pub fn builtin_registry() -> Result<SkillRegistry, AgentError> {
    let mut registry = SkillRegistry::new();
    registry.register(JiraSearchSkill)?;
    registry.register(GithubIssueSkill)?;
    registry.register(TestRunnerSkill)?;
    registry.register(CodeAnalysisSkill)?;
    registry.register(PerformanceAuditSkill)?;
    registry.register(KnowledgeBaseSkill)?;
    Ok(registry)
}
