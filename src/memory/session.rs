//! 会话记忆缓冲
//!
//! 追加式、容量有界的 (role, content, timestamp) 日志，同一会话内的所有智能体
//! 共享，每轮推理前读取、每轮结束后写入，直到显式 clear 才清空。
//! 超出容量时按 FIFO 淘汰最旧条目。

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// 默认保留的最近条目数
pub const DEFAULT_CAPACITY: usize = 20;

/// 记忆条目角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryRole {
    User,
    Assistant,
    Observation,
}

impl MemoryRole {
    /// 上下文渲染用的大写标签
    pub fn label(&self) -> &'static str {
        match self {
            MemoryRole::User => "USER",
            MemoryRole::Assistant => "ASSISTANT",
            MemoryRole::Observation => "OBSERVATION",
        }
    }
}

/// 单条记忆，timestamp 为 RFC 3339 字符串
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryEntry {
    pub role: MemoryRole,
    pub content: String,
    pub timestamp: String,
}

/// 会话记忆：插入序即时间序，容量之外的最旧条目被淘汰
#[derive(Debug, Clone)]
pub struct SessionMemory {
    entries: VecDeque<MemoryEntry>,
    capacity: usize,
}

impl Default for SessionMemory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SessionMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// 追加一条带时间戳的记忆，超容量时淘汰最旧条目
    pub fn add(&mut self, role: MemoryRole, content: impl Into<String>) {
        self.entries.push_back(MemoryEntry {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        tracing::debug!(
            role = role.label(),
            size = self.entries.len(),
            "memory entry added"
        );
    }

    /// 渲染为单个上下文字符串：空缓冲返回固定哨兵文本，
    /// 否则每条格式化为 "[{timestamp}] {ROLE}: {content}"，空行分隔，时间序
    pub fn get_context(&self) -> String {
        if self.entries.is_empty() {
            return "No previous session context.".to_string();
        }
        self.entries
            .iter()
            .map(|e| format!("[{}] {}: {}", e.timestamp, e.role.label(), e.content))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        tracing::debug!("memory buffer cleared");
    }

    pub fn entries(&self) -> impl Iterator<Item = &MemoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
