//! 工具调度 RPC 层：MCP 协议子集（tools/list、tools/call）与调度器

pub mod dispatcher;
pub mod protocol;

pub use dispatcher::McpDispatcher;
pub use protocol::{
    McpRequest, McpResponse, RpcError, ERROR_INTERNAL, ERROR_METHOD_NOT_FOUND, JSONRPC_VERSION,
    METHOD_TOOLS_CALL, METHOD_TOOLS_LIST,
};
