use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::{sleep, Duration};

use crate::skills::Skill;

#[derive(Debug, Default, Deserialize)]
struct JiraSearchArgs {
    #[serde(default)]
    query: String,
}

/// 模拟 Jira 检索：固定延迟后返回一条命中的需求摘要
pub struct JiraSearchSkill;

#[async_trait]
impl Skill for JiraSearchSkill {
    fn name(&self) -> &str {
        "jira_search"
    }

    fn description(&self) -> &str {
        "Search Jira for requirements or issues matching a query."
    }

    fn parameters(&self) -> Vec<(&'static str, &'static str)> {
        vec![("query", "The search query or issue key.")]
    }

    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: JiraSearchArgs = serde_json::from_value(args).unwrap_or_default();
        tracing::info!(query = %args.query, "jira_search");
        sleep(Duration::from_millis(50)).await;
        Ok(Value::String(format!(
            "Results for \"{}\": Found 1 matching requirement (AUTH-101: Biometric Auth).",
            args.query
        )))
    }
}
