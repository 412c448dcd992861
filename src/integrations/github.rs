//! 模拟 GitHub 集成
//!
//! 为失败用例「创建」issue：返回伪造的 issue URL，不发起网络请求。

use rand::Rng;
use tokio::time::{sleep, Duration};

/// 为指定测试用例创建模拟 issue，返回 issue URL
pub async fn create_github_issue(test_case_id: &str, logs: &str) -> String {
    sleep(Duration::from_millis(100)).await;
    tracing::info!(test_case_id, logs_len = logs.len(), "github issue (simulated)");

    let issue_number: u32 = rand::thread_rng().gen_range(100..1100);
    format!("https://github.com/org/project/issues/{}", issue_number)
}
