use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::{sleep, Duration};

use crate::skills::Skill;

#[derive(Debug, Default, Deserialize)]
struct PerformanceAuditArgs {
    #[serde(default)]
    url: String,
}

/// 模拟性能审计：返回固定的核心指标摘要
pub struct PerformanceAuditSkill;

#[async_trait]
impl Skill for PerformanceAuditSkill {
    fn name(&self) -> &str {
        "performance_audit"
    }

    fn description(&self) -> &str {
        "Audit the performance characteristics of a target page or endpoint."
    }

    fn parameters(&self) -> Vec<(&'static str, &'static str)> {
        vec![("url", "The URL to audit.")]
    }

    async fn execute(&self, args: Value) -> Result<Value, String> {
        let args: PerformanceAuditArgs = serde_json::from_value(args).unwrap_or_default();
        sleep(Duration::from_millis(70)).await;
        Ok(Value::String(format!(
            "Performance audit for {}: TTFB 120ms, LCP 1.9s, CLS 0.02. No blocking resources detected.",
            args.url
        )))
    }
}
