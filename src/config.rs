//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `QA_NEXUS__*` 覆盖
//! （双下划线表示嵌套，如 `QA_NEXUS__WORKFLOW__MAX_ITERATIONS=5`）。

use std::path::PathBuf;

use serde::Deserialize;

use crate::core::WorkflowSettings;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmSection,
    pub workflow: WorkflowSection,
    pub memory: MemorySection,
    pub tools: ToolsSection,
}

/// [llm] 段：后端、模型对与超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 后端标签（deepseek / openai / 任意 OpenAI 兼容端点）
    pub provider: String,
    /// 高质量模型
    pub quality_model: String,
    /// 轻量快速模型（use_flash_model 时选用）
    pub flash_model: String,
    pub base_url: Option<String>,
    /// 单次补全请求超时（秒）
    pub request_timeout_secs: u64,
    /// 每分钟补全请求上限（令牌桶）
    pub rate_limit_per_minute: u32,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "deepseek".to_string(),
            quality_model: "deepseek-reasoner".to_string(),
            flash_model: "deepseek-chat".to_string(),
            base_url: None,
            request_timeout_secs: 60,
            rate_limit_per_minute: 10,
        }
    }
}

/// [workflow] 段：推理轮数与采样参数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkflowSection {
    pub max_iterations: u32,
    pub temperature: f32,
    pub use_flash_model: bool,
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            max_iterations: 3,
            temperature: 0.7,
            use_flash_model: false,
        }
    }
}

impl WorkflowSection {
    pub fn settings(&self) -> WorkflowSettings {
        WorkflowSettings {
            max_iterations: self.max_iterations,
            temperature: self.temperature,
            use_flash_model: self.use_flash_model,
        }
    }
}

/// [memory] 段：会话记忆容量
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemorySection {
    pub max_entries: usize,
}

impl Default for MemorySection {
    fn default() -> Self {
        Self { max_entries: 20 }
    }
}

/// [tools] 段：单次技能调用超时
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    pub timeout_secs: u64,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

/// 从 config 目录加载配置，环境变量 QA_NEXUS__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 QA_NEXUS__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("QA_NEXUS")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.workflow.max_iterations, 3);
        assert!((cfg.workflow.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(cfg.memory.max_entries, 20);
        assert_eq!(cfg.llm.rate_limit_per_minute, 10);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "[workflow]\nmax_iterations = 5\n\n[llm]\nquality_model = \"custom-model\""
        )
        .unwrap();

        let cfg = load_config(Some(path)).unwrap();
        assert_eq!(cfg.workflow.max_iterations, 5);
        assert_eq!(cfg.llm.quality_model, "custom-model");
        // 未覆盖的键保持默认
        assert_eq!(cfg.tools.timeout_secs, 30);
    }
}
