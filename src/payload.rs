//! 载荷类型定义 - 两种来源的 JSON 形状
//!
//! Claude Code 与 Codex 的载荷没有共同 schema，在边界处各自解码一次，
//! 下游统一操作强类型结构。解码是宽容的：字段缺失或形状不符退化为
//! 空值/缺省，不报错。

use serde::Deserialize;
use serde_json::Value;

/// 消息来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Claude Code Stop hook（stdin JSON）
    ClaudeCode,
    /// Codex CLI notify（命令行参数 JSON）
    Codex,
    /// 无法识别的来源
    Unknown,
}

impl Source {
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::ClaudeCode => "claude-code",
            Source::Codex => "codex",
            Source::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 内容片段：`{"type":"text","text":...}` 对象或裸字符串
///
/// 兜底的 `Other` 变体吞掉无法识别的形状（tool_use、数字等），
/// 保证整个列表的反序列化不会因单个片段失败。
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ContentFragment {
    Text(String),
    Tagged {
        #[serde(rename = "type", default)]
        kind: Option<String>,
        #[serde(default)]
        text: Option<String>,
    },
    Other(Value),
}

impl ContentFragment {
    /// 取出文本片段的内容（去空白后非空才返回）
    ///
    /// `allow_bare` 控制裸字符串片段是否计入：Claude Code 只认
    /// `type == "text"` 的对象，Codex 同时接受裸字符串。
    pub fn text(&self, allow_bare: bool) -> Option<&str> {
        let text = match self {
            ContentFragment::Text(s) if allow_bare => s.as_str(),
            ContentFragment::Tagged {
                kind: Some(kind),
                text: Some(text),
            } if kind == "text" => text.as_str(),
            _ => return None,
        };
        let text = text.trim();
        (!text.is_empty()).then_some(text)
    }
}

/// Claude Code transcript 条目的 message 字段：结构化对象或纯字符串
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    Structured {
        #[serde(default)]
        content: Vec<ContentFragment>,
    },
    Other(Value),
}

/// Claude Code transcript 条目
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptItem {
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub message: Option<MessageBody>,
}

/// Claude Code Stop hook 载荷
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClaudePayload {
    #[serde(default)]
    pub transcript: Vec<TranscriptItem>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

impl ClaudePayload {
    /// 从原始 JSON 解码，形状不符时退化为空载荷
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// Codex 消息条目：裸字符串或带 content 字段的对象
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CodexMessage {
    Text(String),
    Structured {
        #[serde(default)]
        content: CodexContent,
    },
    Other(Value),
}

/// Codex 消息的 content 字段：字符串或片段列表
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CodexContent {
    Text(String),
    Fragments(Vec<ContentFragment>),
    Other(Value),
}

impl Default for CodexContent {
    fn default() -> Self {
        CodexContent::Text(String::new())
    }
}

impl CodexMessage {
    /// 提取消息文本：片段去空白、丢弃空白片段、以空行连接
    pub fn text(&self) -> Option<String> {
        match self {
            CodexMessage::Text(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            CodexMessage::Structured { content } => match content {
                CodexContent::Text(s) => {
                    let s = s.trim();
                    (!s.is_empty()).then(|| s.to_string())
                }
                CodexContent::Fragments(fragments) => {
                    let texts: Vec<&str> =
                        fragments.iter().filter_map(|f| f.text(true)).collect();
                    (!texts.is_empty()).then(|| texts.join("\n\n"))
                }
                CodexContent::Other(_) => None,
            },
            CodexMessage::Other(_) => None,
        }
    }
}

/// Codex notify 载荷
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodexPayload {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(rename = "input-messages", default)]
    pub input_messages: Vec<CodexMessage>,
    #[serde(rename = "last-assistant-message", default)]
    pub last_assistant_message: Option<CodexMessage>,
    #[serde(rename = "thread-id", default)]
    pub thread_id: Option<String>,
    #[serde(rename = "turn-id", default)]
    pub turn_id: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
}

impl CodexPayload {
    /// 从原始 JSON 解码，形状不符时退化为空载荷
    pub fn from_value(value: &Value) -> Self {
        serde_json::from_value(value.clone()).unwrap_or_default()
    }
}

/// 从载荷中读取字符串字段（非对象或字段缺失返回 None）
pub fn str_field<'a>(payload: &'a Value, key: &str) -> Option<&'a str> {
    payload.get(key).and_then(|v| v.as_str()).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_claude_payload_decode() {
        let value = json!({
            "transcript": [
                {"type": "human", "message": "hi"},
                {"type": "assistant", "message": {"content": [
                    {"type": "text", "text": "hello"},
                    {"type": "tool_use", "name": "Bash", "input": {}}
                ]}}
            ],
            "cwd": "/tmp",
            "session_id": "abc123"
        });

        let payload = ClaudePayload::from_value(&value);
        assert_eq!(payload.transcript.len(), 2);
        assert_eq!(payload.cwd.as_deref(), Some("/tmp"));
        assert_eq!(payload.session_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_claude_payload_wrong_shape_is_empty() {
        // transcript 不是数组时整体退化为空载荷
        let payload = ClaudePayload::from_value(&json!({"transcript": "oops"}));
        assert!(payload.transcript.is_empty());

        let payload = ClaudePayload::from_value(&json!("not an object"));
        assert!(payload.transcript.is_empty());
    }

    #[test]
    fn test_fragment_text_filtering() {
        let fragments: Vec<ContentFragment> = serde_json::from_value(json!([
            {"type": "text", "text": "  keep  "},
            {"type": "text", "text": "   "},
            {"type": "tool_use", "name": "Edit"},
            "bare string",
            42
        ]))
        .unwrap();

        // Claude Code 模式：只认 text 对象
        let claude: Vec<&str> = fragments.iter().filter_map(|f| f.text(false)).collect();
        assert_eq!(claude, vec!["keep"]);

        // Codex 模式：裸字符串也计入
        let codex: Vec<&str> = fragments.iter().filter_map(|f| f.text(true)).collect();
        assert_eq!(codex, vec!["keep", "bare string"]);
    }

    #[test]
    fn test_codex_message_shapes() {
        let bare: CodexMessage = serde_json::from_value(json!("  fix bug  ")).unwrap();
        assert_eq!(bare.text().as_deref(), Some("fix bug"));

        let string_content: CodexMessage =
            serde_json::from_value(json!({"role": "user", "content": "do it"})).unwrap();
        assert_eq!(string_content.text().as_deref(), Some("do it"));

        let fragments: CodexMessage = serde_json::from_value(json!({
            "content": [{"type": "text", "text": "a"}, {"type": "text", "text": "b"}]
        }))
        .unwrap();
        assert_eq!(fragments.text().as_deref(), Some("a\n\nb"));

        let empty: CodexMessage = serde_json::from_value(json!({"content": "   "})).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn test_codex_payload_decode() {
        let value = json!({
            "type": "agent-turn-complete",
            "input-messages": ["fix bug"],
            "last-assistant-message": "done",
            "thread-id": "t-1",
            "turn-id": "u-1"
        });

        let payload = CodexPayload::from_value(&value);
        assert_eq!(payload.event_type.as_deref(), Some("agent-turn-complete"));
        assert_eq!(payload.input_messages.len(), 1);
        assert!(payload.last_assistant_message.is_some());
        assert_eq!(payload.thread_id.as_deref(), Some("t-1"));
    }

    #[test]
    fn test_source_as_str() {
        assert_eq!(Source::ClaudeCode.as_str(), "claude-code");
        assert_eq!(Source::Codex.as_str(), "codex");
        assert_eq!(Source::Unknown.as_str(), "unknown");
    }
}
