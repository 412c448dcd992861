//! 需求输入清洗
//!
//! 评审智能体的输入卫生过滤：剥离角色越权标记与 script 标签，
//! 截断超长输入，同时约束注入风险与 token 开销。不属于推理循环本身。

use std::sync::OnceLock;

use regex::Regex;

/// 截断上限（字符数）
pub const MAX_INPUT_CHARS: usize = 50_000;

static MARKER_RE: OnceLock<Regex> = OnceLock::new();
static SCRIPT_RE: OnceLock<Regex> = OnceLock::new();

pub fn sanitize_requirements(input: &str) -> String {
    let marker_re = MARKER_RE
        .get_or_init(|| Regex::new(r"(?i)\[(?:SYSTEM|ADMIN|OVERRIDE)\]").unwrap());
    let script_re = SCRIPT_RE
        .get_or_init(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());

    let stripped = marker_re.replace_all(input, "");
    let stripped = script_re.replace_all(&stripped, "");
    let trimmed = stripped.trim();

    if trimmed.chars().count() > MAX_INPUT_CHARS {
        trimmed.chars().take(MAX_INPUT_CHARS).collect()
    } else {
        trimmed.to_string()
    }
}
