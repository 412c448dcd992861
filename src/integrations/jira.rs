//! 模拟 Jira 集成
//!
//! 真实场景应经由后端代理访问 Jira API，这里返回带 [JIRA SOURCE] 前缀的
//! 预制需求文本，可直接作为评审智能体的输入。

use tokio::time::{sleep, Duration};

/// 按 issue key 拉取一条模拟需求
pub async fn fetch_jira_requirement(issue_key: &str) -> String {
    sleep(Duration::from_millis(80)).await;
    tracing::info!(issue_key, "jira fetch (simulated)");

    let summary = format!("Feature: Biometric Authentication for {}", issue_key);
    let description = "The system must allow users to authenticate using Fingerprint or FaceID \
                       on supported mobile devices. Failure to authenticate should fallback to a \
                       6-digit PIN. The UI must show a clear 'Secure Session' indicator.";

    format!(
        "[JIRA SOURCE: {}]\nTitle: {}\nDescription: {}",
        issue_key, summary, description
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_carries_source_header() {
        let text = fetch_jira_requirement("QA-42").await;
        assert!(text.starts_with("[JIRA SOURCE: QA-42]"));
        assert!(text.contains("Biometric Authentication"));
    }
}
