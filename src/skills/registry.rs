//! 技能注册表
//!
//! 所有技能实现 Skill trait（name / description / parameters / execute），
//! 由 SkillRegistry 按名注册与查找；describe_all 渲染为注入 prompt 的技能清单。
//! 同名重复注册是注册期错误（last-write-wins 会静默吞掉技能，这里直接拒绝）。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::core::AgentError;

/// 技能 trait：名称、描述（供 LLM 理解）、参数提示、异步执行（args 为 JSON 对象）
///
/// 每个技能自行反序列化类型化的参数结构体（#[serde(default)] 容忍缺失键），
/// 返回字符串或结构化 JSON 值。
#[async_trait]
pub trait Skill: Send + Sync {
    /// 技能名称（注册表键，也是 tool_call 中的 "name" 字段）
    fn name(&self) -> &str;

    /// 技能描述（供 LLM 理解功能）
    fn description(&self) -> &str;

    /// 声明序的参数名 -> 人类可读提示
    fn parameters(&self) -> Vec<(&'static str, &'static str)>;

    /// 执行技能
    async fn execute(&self, args: Value) -> Result<Value, String>;
}

/// 技能注册表：保留注册顺序，按名查找
#[derive(Default)]
pub struct SkillRegistry {
    skills: Vec<Arc<dyn Skill>>,
    index: HashMap<String, usize>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, skill: impl Skill + 'static) -> Result<(), AgentError> {
        let name = skill.name().to_string();
        if self.index.contains_key(&name) {
            return Err(AgentError::DuplicateSkill(name));
        }
        self.index.insert(name, self.skills.len());
        self.skills.push(Arc::new(skill));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Skill>> {
        self.index.get(name).map(|&i| self.skills[i].clone())
    }

    /// 注册顺序的技能列表
    pub fn list(&self) -> &[Arc<dyn Skill>] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn skill_names(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name().to_string()).collect()
    }

    /// 渲染注入 prompt 的技能清单，每行：
    /// `- {name}: {description} (Params: {参数对象 JSON，保持声明序})`
    pub fn describe_all(&self) -> String {
        self.skills
            .iter()
            .map(|s| {
                let params = s
                    .parameters()
                    .iter()
                    .map(|(k, v)| {
                        format!(
                            "{}:{}",
                            serde_json::to_string(k).unwrap_or_default(),
                            serde_json::to_string(v).unwrap_or_default()
                        )
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                format!("- {}: {} (Params: {{{}}})", s.name(), s.description(), params)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// tools/list 响应体：每个技能序列化为 {name, description, parameters}
    pub fn describe_tools(&self) -> Value {
        Value::Array(
            self.skills
                .iter()
                .map(|s| {
                    let mut params = serde_json::Map::new();
                    for (k, v) in s.parameters() {
                        params.insert(k.to_string(), Value::String(v.to_string()));
                    }
                    serde_json::json!({
                        "name": s.name(),
                        "description": s.description(),
                        "parameters": Value::Object(params),
                    })
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeSkill(&'static str);

    #[async_trait]
    impl Skill for FakeSkill {
        fn name(&self) -> &str {
            self.0
        }
        fn description(&self) -> &str {
            "a fake skill"
        }
        fn parameters(&self) -> Vec<(&'static str, &'static str)> {
            vec![("query", "The query."), ("limit", "Max results.")]
        }
        async fn execute(&self, _args: Value) -> Result<Value, String> {
            Ok(Value::String("ok".to_string()))
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let mut reg = SkillRegistry::new();
        reg.register(FakeSkill("alpha")).unwrap();
        reg.register(FakeSkill("beta")).unwrap();
        assert_eq!(reg.len(), 2);
        assert!(reg.get("alpha").is_some());
        assert!(reg.get("gamma").is_none());
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut reg = SkillRegistry::new();
        reg.register(FakeSkill("alpha")).unwrap();
        let err = reg.register(FakeSkill("alpha")).unwrap_err();
        assert!(matches!(err, AgentError::DuplicateSkill(name) if name == "alpha"));
    }

    #[test]
    fn test_describe_all_preserves_declared_order() {
        let mut reg = SkillRegistry::new();
        reg.register(FakeSkill("alpha")).unwrap();
        let desc = reg.describe_all();
        assert_eq!(
            desc,
            "- alpha: a fake skill (Params: {\"query\":\"The query.\",\"limit\":\"Max results.\"})"
        );
    }

    #[test]
    fn test_describe_tools_matches_size() {
        let mut reg = SkillRegistry::new();
        reg.register(FakeSkill("alpha")).unwrap();
        reg.register(FakeSkill("beta")).unwrap();
        let tools = reg.describe_tools();
        assert_eq!(tools.as_array().unwrap().len(), reg.len());
    }
}
