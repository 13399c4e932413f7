//! 对话提取模块 - 从原始载荷提取有序的对话记录
//!
//! 两种来源共享同一套遍历逻辑，输出统一的 {role, text} 序列。
//! 纯文本渲染器需要的"每个角色的最后一条"由 `last_text` 对该序列
//! 从尾部扫描得出，不再单独遍历载荷。

use crate::payload::{ClaudePayload, CodexPayload, MessageBody, Source};
use serde_json::Value;

/// 消息角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// 一条对话消息，text 已由多个片段合并完成
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationMessage {
    pub role: Role,
    pub text: String,
}

impl ConversationMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// 从载荷中提取完整对话记录
///
/// 输出顺序与载荷中出现顺序一致，不去重。无论载荷形状如何，
/// Codex 与未知来源的输出保证非空（回退到原始 JSON 展示）。
pub fn extract_conversation(payload: &Value, source: Source) -> Vec<ConversationMessage> {
    match source {
        Source::ClaudeCode => extract_claude(payload),
        Source::Codex => extract_codex(payload),
        Source::Unknown => vec![ConversationMessage::new(Role::Assistant, pretty_json(payload))],
    }
}

/// 扫描对话序列，返回指定角色最后一条消息的文本
pub fn last_text(messages: &[ConversationMessage], role: Role) -> Option<&str> {
    messages
        .iter()
        .rev()
        .find(|m| m.role == role)
        .map(|m| m.text.as_str())
}

/// 载荷的美化 JSON 表示（回退展示用）
pub fn pretty_json(payload: &Value) -> String {
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

fn extract_claude(payload: &Value) -> Vec<ConversationMessage> {
    let decoded = ClaudePayload::from_value(payload);
    let mut messages = Vec::new();

    for item in &decoded.transcript {
        let role = match item.item_type.as_deref() {
            Some("human") => Role::User,
            Some("assistant") => Role::Assistant,
            _ => continue,
        };

        let text = match &item.message {
            Some(MessageBody::Text(s)) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Some(MessageBody::Structured { content }) => {
                let texts: Vec<&str> = content.iter().filter_map(|f| f.text(false)).collect();
                (!texts.is_empty()).then(|| texts.join("\n\n"))
            }
            _ => None,
        };

        // 无有效文本的条目整条跳过，不输出空消息
        if let Some(text) = text {
            messages.push(ConversationMessage::new(role, text));
        }
    }

    messages
}

fn extract_codex(payload: &Value) -> Vec<ConversationMessage> {
    let decoded = CodexPayload::from_value(payload);
    let mut messages = Vec::new();

    // input-messages 依次作为用户消息
    for item in &decoded.input_messages {
        if let Some(text) = item.text() {
            messages.push(ConversationMessage::new(Role::User, text));
        }
    }

    // last-assistant-message 恰好对应一条 AI 回复
    if let Some(last) = &decoded.last_assistant_message {
        if let Some(text) = last.text() {
            messages.push(ConversationMessage::new(Role::Assistant, text));
        }
    }

    // 什么都没解析到时回退到原始载荷展示，保证输出非空
    if messages.is_empty() {
        messages.push(ConversationMessage::new(Role::Assistant, pretty_json(payload)));
    }

    messages
}
