//! 智能体层：解析器、多轮推理引擎、输入清洗与三个智能体适配器

pub mod engine;
pub mod executor;
pub mod parser;
pub mod prompts;
pub mod reviewer;
pub mod sanitize;
pub mod writer;

pub use engine::{AgentModels, AgentRun, AgentRuntime, AgentTask};
pub use executor::{execute_tests, ExecutionReport, ExecutorPayload};
pub use parser::{extract_text, parse_agent_payload, AgentPassResult, ToolCall};
pub use reviewer::{review_requirements, ReviewReport, ReviewerPayload};
pub use sanitize::{sanitize_requirements, MAX_INPUT_CHARS};
pub use writer::{generate_test_cases, TestCaseReport, WriterPayload};
