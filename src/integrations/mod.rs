//! 外部系统集成（全部为模拟实现：字符串进、字符串出）

pub mod github;
pub mod jira;

pub use github::create_github_issue;
pub use jira::fetch_jira_requirement;
