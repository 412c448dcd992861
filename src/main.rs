//! QA Nexus 入口
//!
//! 初始化日志、加载配置、构建组合根（补全客户端 / 技能注册表 / 调度器 / 会话记忆），
//! 对一段需求文本跑完整条三智能体流水线，并以 JSON 打印最终状态。
//!
//! 用法：`qa-nexus <requirements-file>`，无参数时从 stdin 读取。

use std::io::Read;
use std::sync::{Arc, Mutex};

use anyhow::Context;

use qa_nexus::agent::{AgentModels, AgentRuntime};
use qa_nexus::config::{load_config, AppConfig};
use qa_nexus::core::{run_pipeline, WorkflowStatus};
use qa_nexus::llm::create_client_from_config;
use qa_nexus::mcp::McpDispatcher;
use qa_nexus::memory::SessionMemory;
use qa_nexus::observability;
use qa_nexus::skills::builtin_registry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    let raw_requirements = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read requirements file {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read requirements from stdin")?;
            buf
        }
    };

    let client = create_client_from_config(&cfg);
    let registry = Arc::new(builtin_registry().context("Failed to build skill registry")?);
    let dispatcher = Arc::new(McpDispatcher::new(registry, cfg.tools.timeout_secs));
    let memory = Arc::new(Mutex::new(SessionMemory::new(cfg.memory.max_entries)));

    let runtime = AgentRuntime::new(Some(client), dispatcher, memory)
        .with_models(AgentModels {
            quality: cfg.llm.quality_model.clone(),
            flash: cfg.llm.flash_model.clone(),
        })
        .with_request_timeout(cfg.llm.request_timeout_secs);

    let state = run_pipeline(&runtime, &raw_requirements, &cfg.workflow.settings()).await;

    println!("{}", serde_json::to_string_pretty(&state)?);

    if state.status == WorkflowStatus::Failed {
        anyhow::bail!(
            "workflow failed: {}",
            state.error.unwrap_or_else(|| "unknown error".to_string())
        );
    }
    Ok(())
}
