use async_trait::async_trait;
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::{sleep, Duration};

use crate::skills::Skill;

#[derive(Debug, Default, Deserialize)]
struct GithubIssueArgs {
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

/// 模拟 GitHub issue 创建：返回伪造的 issue URL
pub struct GithubIssueSkill;

#[async_trait]
impl Skill for GithubIssueSkill {
    fn name(&self) -> &str {
        "github_issue_create"
    }

    fn description(&self) -> &str {
        "Create a GitHub issue for a bug or failed test case."
    }

    fn parameters(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("title", "The issue title."),
            ("body", "The issue description/logs."),
        ]
    }

    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: GithubIssueArgs = serde_json::from_value(args).unwrap_or_default();
        tracing::info!(title = %args.title, body_len = args.body.len(), "github_issue_create");
        sleep(Duration::from_millis(80)).await;
        let issue_id: u32 = rand::thread_rng().gen_range(100..1100);
        Ok(Value::String(format!(
            "Issue created successfully: https://github.com/org/repo/issues/{}",
            issue_id
        )))
    }
}
