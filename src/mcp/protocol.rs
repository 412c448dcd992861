//! MCP 协议子集的信封类型
//!
//! JSON-RPC 2.0 风格：请求携带 method（tools/list / tools/call）与 params，
//! 响应的 result / error 恰好填充其一，id 回显请求 id。

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

pub const METHOD_TOOLS_LIST: &str = "tools/list";
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// JSON-RPC 标准错误码：方法 / 技能未找到
pub const ERROR_METHOD_NOT_FOUND: i32 = -32601;
/// JSON-RPC 标准错误码：内部错误
pub const ERROR_INTERNAL: i32 = -32603;

/// 请求信封
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: Value,
    #[serde(default)]
    pub id: Value,
}

impl McpRequest {
    /// 构造 tools/call 请求，id 为随机 UUID
    pub fn tool_call(name: &str, arguments: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: METHOD_TOOLS_CALL.to_string(),
            params: serde_json::json!({ "name": name, "arguments": arguments }),
            id: Value::String(uuid::Uuid::new_v4().to_string()),
        }
    }

    pub fn tools_list() -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: METHOD_TOOLS_LIST.to_string(),
            params: Value::Object(serde_json::Map::new()),
            id: Value::String(uuid::Uuid::new_v4().to_string()),
        }
    }
}

/// 响应中的错误对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

/// 响应信封：result 与 error 恰好填充其一
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct McpResponse {
    pub jsonrpc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
    pub id: Value,
}

impl McpResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn failure(id: Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
