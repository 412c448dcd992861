//! QA Nexus - Rust 多智能体 QA 自动化流水线
//!
//! 三个串行智能体（需求评审 / 用例编写 / 执行模拟）共享一条流水线状态，
//! 中途可通过 MCP 风格的调度器调用模拟技能，并把观察结果折回下一轮推理。
//!
//! 模块划分：
//! - **agent**: 解析器、多轮推理引擎与三个智能体适配器
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误类型、流水线状态与三智能体编排
//! - **integrations**: 模拟的 Jira / GitHub 集成
//! - **llm**: 补全客户端抽象与实现（OpenAI 兼容 / 限流包装 / Mock）
//! - **mcp**: 工具调度 RPC 层（tools/list、tools/call）
//! - **memory**: 会话记忆缓冲
//! - **skills**: 技能目录（jira_search、test_runner 等模拟工具）

pub mod agent;
pub mod config;
pub mod core;
pub mod integrations;
pub mod llm;
pub mod mcp;
pub mod memory;
pub mod observability;
pub mod skills;
