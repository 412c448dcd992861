use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::{sleep, Duration};

use crate::skills::Skill;

#[derive(Debug, Default, Deserialize)]
struct KnowledgeBaseArgs {
    #[serde(default)]
    topic: String,
}

/// 模拟知识库查询：按主题返回一段参考条目
pub struct KnowledgeBaseSkill;

#[async_trait]
impl Skill for KnowledgeBaseSkill {
    fn name(&self) -> &str {
        "knowledge_base"
    }

    fn description(&self) -> &str {
        "Look up a QA engineering reference entry for a topic."
    }

    fn parameters(&self) -> Vec<(&'static str, &'static str)> {
        vec![("topic", "The topic to look up.")]
    }

    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: KnowledgeBaseArgs = serde_json::from_value(args).unwrap_or_default();
        sleep(Duration::from_millis(40)).await;
        Ok(Value::String(format!(
            "Knowledge base entry for \"{}\": boundary-value analysis, equivalence partitioning and \
             risk-based prioritization are the recommended techniques for this area.",
            args.topic
        )))
    }
}
