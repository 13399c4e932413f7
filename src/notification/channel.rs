//! 通知渠道 trait 定义

use crate::config::Config;
use crate::payload::Source;
use anyhow::Result;
use serde_json::Value;

/// 一次通知的全部内容
#[derive(Debug, Clone)]
pub struct Notification<'a> {
    /// 标题（邮件主题）
    pub title: &'a str,
    /// 纯文本内容（已格式化）
    pub content: &'a str,
    /// 消息来源
    pub source: Source,
    /// 原始载荷（HTML 渲染等需要完整数据的渠道使用）
    pub payload: &'a Value,
}

/// 发送结果
#[derive(Debug, Clone, PartialEq)]
pub enum SendResult {
    /// 发送成功
    Sent,
    /// 跳过（渠道未配置）
    Skipped(String),
    /// 发送失败
    Failed(String),
}

impl SendResult {
    /// 是否计为成功（只有 Sent 算）
    pub fn is_sent(&self) -> bool {
        matches!(self, SendResult::Sent)
    }
}

/// 通知渠道 trait
///
/// 配置在每次调用时传入而非持有：渠道是否可用由当次配置决定，
/// 未配置的渠道返回 `Skipped` 而不是错误。
pub trait NotificationChannel: Send + Sync {
    /// 渠道名称（用于配置匹配和日志）
    fn name(&self) -> &str;

    /// 发送消息
    fn send(&self, config: &Config, message: &Notification<'_>) -> Result<SendResult>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_result_is_sent() {
        assert!(SendResult::Sent.is_sent());
        assert!(!SendResult::Skipped("not configured".to_string()).is_sent());
        assert!(!SendResult::Failed("boom".to_string()).is_sent());
    }
}
