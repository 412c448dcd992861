//! 补全响应解析
//!
//! extract_text 容忍多种响应形状；parse_agent_payload 把文本解析为带
//! thought / tool_call / 智能体专属字段的类型化载荷。任何失败都落为
//! data: None 加说明性 thinking，绝不上抛。

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::llm::CompletionResponse;

/// 模型请求的工具调用（{"name": "jira_search", "arguments": {"query": "..."}}）
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// 单轮解析结果：data 与 tool_call 不会同时决定终止——
/// 只要 tool_call 存在就进入下一轮，data 仅在无工具调用时生效
#[derive(Debug, Clone)]
pub struct AgentPassResult {
    pub data: Option<Value>,
    pub thinking: String,
    pub tool_call: Option<ToolCall>,
}

/// 从补全响应中提取文本：优先顶层 text，其次 candidates[0].content.parts[0].text，
/// 无法识别的形状返回空串
pub fn extract_text(response: &CompletionResponse) -> String {
    if let Some(text) = &response.text {
        return text.clone();
    }
    response
        .candidates
        .first()
        .and_then(|c| c.content.parts.first())
        .and_then(|p| p.text.clone())
        .unwrap_or_default()
}

/// 解析智能体载荷；field 为该智能体的输出键（specs / testCases / results）
pub fn parse_agent_payload(response: &CompletionResponse, field: &str) -> AgentPassResult {
    let text = extract_text(response);
    if text.trim().is_empty() {
        return AgentPassResult {
            data: None,
            thinking: "No response from AI".to_string(),
            tool_call: None,
        };
    }

    let parsed: Value = match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            return AgentPassResult {
                data: None,
                thinking: format!("Could not parse AI response: {}", e),
                tool_call: None,
            };
        }
    };

    let thinking = parsed
        .get("thought")
        .and_then(Value::as_str)
        .unwrap_or("Analysis complete.")
        .to_string();

    let tool_call = parsed
        .get("tool_call")
        .and_then(|v| serde_json::from_value::<ToolCall>(v.clone()).ok())
        .filter(|tc| !tc.name.is_empty());

    let data = parsed.get(field).cloned().filter(|v| !v.is_null());

    AgentPassResult {
        data,
        thinking,
        tool_call,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_text_top_level() {
        let resp = CompletionResponse::from_text("hello");
        assert_eq!(extract_text(&resp), "hello");
    }

    #[test]
    fn test_extract_text_nested_candidates() {
        let resp = CompletionResponse::from_candidate_text("nested");
        assert_eq!(extract_text(&resp), "nested");
    }

    #[test]
    fn test_extract_text_unrecognized_shape() {
        let resp = CompletionResponse::default();
        assert_eq!(extract_text(&resp), "");
    }

    #[test]
    fn test_empty_text_yields_no_response() {
        let resp = CompletionResponse::from_text("");
        let out = parse_agent_payload(&resp, "specs");
        assert!(out.data.is_none());
        assert!(out.thinking.contains("No response"));
    }

    #[test]
    fn test_unparsable_text() {
        let resp = CompletionResponse::from_text("not json at all");
        let out = parse_agent_payload(&resp, "specs");
        assert!(out.data.is_none());
        assert!(out.thinking.contains("Could not parse"));
    }

    #[test]
    fn test_tool_call_round_trips() {
        let resp = CompletionResponse::from_text(
            r#"{"thought": "using tool", "tool_call": {"name": "jira_search", "arguments": {"query": "test"}}}"#,
        );
        let out = parse_agent_payload(&resp, "specs");
        let tc = out.tool_call.unwrap();
        assert_eq!(tc.name, "jira_search");
        assert_eq!(tc.arguments, json!({"query": "test"}));
        assert_eq!(out.thinking, "using tool");
    }

    #[test]
    fn test_data_extraction_and_default_thought() {
        let resp = CompletionResponse::from_text(r#"{"specs": [{"x": 1}]}"#);
        let out = parse_agent_payload(&resp, "specs");
        assert_eq!(out.data, Some(json!([{"x": 1}])));
        assert_eq!(out.thinking, "Analysis complete.");
        assert!(out.tool_call.is_none());
    }

    #[test]
    fn test_missing_field_is_none() {
        let resp = CompletionResponse::from_text(r#"{"thought": "done"}"#);
        let out = parse_agent_payload(&resp, "specs");
        assert!(out.data.is_none());
    }
}
