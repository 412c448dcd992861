use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::{sleep, Duration};

use crate::skills::Skill;

#[derive(Debug, Default, Deserialize)]
struct CodeAnalysisArgs {
    #[serde(default)]
    code: String,
}

/// 模拟静态分析：统计行数并返回固定的分析摘要
pub struct CodeAnalysisSkill;

#[async_trait]
impl Skill for CodeAnalysisSkill {
    fn name(&self) -> &str {
        "code_analysis"
    }

    fn description(&self) -> &str {
        "Run a static analysis pass over a code snippet and report findings."
    }

    fn parameters(&self) -> Vec<(&'static str, &'static str)> {
        vec![("code", "The code snippet to analyze.")]
    }

    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: CodeAnalysisArgs = serde_json::from_value(args).unwrap_or_default();
        sleep(Duration::from_millis(60)).await;
        let lines = args.code.lines().count();
        Ok(Value::String(format!(
            "Static analysis complete: {} line(s) scanned, 0 critical issues, complexity nominal.",
            lines
        )))
    }
}
