//! 消息格式化模块 - 生成通知标题和纯文本内容
//!
//! 纯文本是邮件的降级正文（无法渲染 HTML 的客户端使用），
//! 只展示每个角色的最后一轮；完整对话由 HTML 渲染器负责。

use crate::conversation::{extract_conversation, last_text, pretty_json, Role};
use crate::payload::{str_field, Source};
use serde_json::Value;

/// 通知文案常量
pub mod msg {
    // 标题
    pub const TITLE_CLAUDE: &str = "Claude Code 任务完成";
    pub const TITLE_CODEX: &str = "Codex 任务完成";
    pub const TITLE_GENERIC: &str = "AI 任务完成";

    // 字段标签
    pub const TIME: &str = "时间";
    pub const CWD: &str = "工作目录";
    pub const SESSION_ID: &str = "会话ID";
    pub const EVENT_TYPE: &str = "事件类型";
    pub const SOURCE: &str = "来源";
    pub const USER_INSTRUCTION: &str = "用户指令";
    pub const AI_REPLY: &str = "AI 回复";

    // 占位
    pub const EMPTY: &str = "(无内容)";
    pub const NA: &str = "N/A";
}

/// 按字符数截断并追加省略号
///
/// 原样返回不满足宽度的字符串；截断按字符边界进行。
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

/// 格式化通知消息，返回 (标题, 纯文本内容)
pub fn format_message(source: Source, event_type: &str, payload: &Value) -> (String, String) {
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let messages = extract_conversation(payload, source);
    let user_msg = last_text(&messages, Role::User).unwrap_or(msg::EMPTY);
    let ai_msg = last_text(&messages, Role::Assistant).unwrap_or(msg::EMPTY);

    match source {
        Source::ClaudeCode => {
            // 会话ID 固定取前 8 个字符展示
            let session_id = str_field(payload, "session_id").unwrap_or(msg::NA);
            let session_head: String = session_id.chars().take(8).collect();
            let content = format!(
                "**{time_label}**: {now}\n\
                 **{cwd_label}**: {cwd}\n\
                 **{sid_label}**: {sid}...\n\n\
                 **{user_label}**:\n{user}\n\n\
                 **{ai_label}**:\n{ai}",
                time_label = msg::TIME,
                now = now,
                cwd_label = msg::CWD,
                cwd = str_field(payload, "cwd").unwrap_or(msg::NA),
                sid_label = msg::SESSION_ID,
                sid = session_head,
                user_label = msg::USER_INSTRUCTION,
                user = user_msg,
                ai_label = msg::AI_REPLY,
                ai = ai_msg,
            );
            (msg::TITLE_CLAUDE.to_string(), content)
        }
        Source::Codex => {
            let content = format!(
                "**{time_label}**: {now}\n\
                 **{cwd_label}**: {cwd}\n\
                 **{event_label}**: {event}\n\n\
                 **{user_label}**:\n{user}\n\n\
                 **{ai_label}**:\n{ai}",
                time_label = msg::TIME,
                now = now,
                cwd_label = msg::CWD,
                cwd = str_field(payload, "cwd").unwrap_or(msg::NA),
                event_label = msg::EVENT_TYPE,
                event = event_type,
                user_label = msg::USER_INSTRUCTION,
                user = user_msg,
                ai_label = msg::AI_REPLY,
                ai = ai_msg,
            );
            (msg::TITLE_CODEX.to_string(), content)
        }
        Source::Unknown => {
            let content = format!(
                "**{time_label}**: {now}\n\
                 **{source_label}**: {source}\n\n\
                 **数据**:\n```json\n{json}\n```",
                time_label = msg::TIME,
                now = now,
                source_label = msg::SOURCE,
                source = source.as_str(),
                json = pretty_json(payload),
            );
            (msg::TITLE_GENERIC.to_string(), content)
        }
    }
}
