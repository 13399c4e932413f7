//! AI Task Notify - Claude Code / Codex 任务完成邮件通知
//!
//! 流水线：解析输入 → 提取对话 → 格式化消息 → 分发送出。
//! 单线程、同步、一次性执行，无重试与持久化。

pub mod config;
pub mod conversation;
pub mod format;
pub mod html;
pub mod input;
pub mod notification;
pub mod payload;

pub use config::Config;
pub use conversation::{extract_conversation, last_text, ConversationMessage, Role};
pub use format::format_message;
pub use html::build_email_html;
pub use input::{parse_from, parse_input, ParsedInput};
pub use notification::{Notification, NotificationChannel, NotificationDispatcher, SendResult};
pub use payload::Source;
