//! 通知分发器 - 按配置的渠道列表路由消息
//!
//! 逐个渠道同步发送：单个渠道的失败被捕获记录，不影响后续渠道。

use super::channel::{Notification, NotificationChannel, SendResult};
use crate::config::Config;
use tracing::{debug, warn};

/// 通知分发器
pub struct NotificationDispatcher {
    /// 所有注册的渠道
    channels: Vec<Box<dyn NotificationChannel>>,
}

impl NotificationDispatcher {
    /// 创建带内置渠道的分发器
    pub fn new() -> Self {
        Self {
            channels: vec![Box::new(super::channels::EmailChannel)],
        }
    }

    /// 创建空分发器（测试用）
    pub fn empty() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// 注册渠道
    pub fn register_channel(&mut self, channel: Box<dyn NotificationChannel>) {
        debug!(channel = channel.name(), "Registering notification channel");
        self.channels.push(channel);
    }

    /// 已注册的渠道名称
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// 发送通知到配置中启用的所有渠道
    ///
    /// 渠道列表来自 `NOTIFY_CHANNELS`，未注册的名称静默跳过。
    /// 返回渠道名到结果的映射：重复的渠道名会重复触发发送，
    /// 结果以最后一次为准。
    pub fn dispatch(
        &self,
        config: &Config,
        message: &Notification<'_>,
    ) -> Vec<(String, SendResult)> {
        let mut results: Vec<(String, SendResult)> = Vec::new();

        for name in config.enabled_channels() {
            let Some(channel) = self.channels.iter().find(|c| c.name() == name) else {
                debug!(channel = %name, "No handler registered for channel");
                continue;
            };

            let result = match channel.send(config, message) {
                Ok(result) => result,
                Err(e) => {
                    warn!(channel = %name, error = %e, "Channel send failed");
                    eprintln!("Channel {} error: {}", name, e);
                    SendResult::Failed(e.to_string())
                }
            };

            match results.iter_mut().find(|(n, _)| *n == name) {
                Some(entry) => entry.1 = result,
                None => results.push((name, result)),
            }
        }

        results
    }
}

impl Default for NotificationDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::Source;
    use anyhow::anyhow;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// 测试用的 mock 渠道
    struct MockChannel {
        name: String,
        send_count: Arc<AtomicUsize>,
        result: fn() -> anyhow::Result<SendResult>,
    }

    impl MockChannel {
        fn new(name: &str, result: fn() -> anyhow::Result<SendResult>) -> (Self, Arc<AtomicUsize>) {
            let count = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    name: name.to_string(),
                    send_count: count.clone(),
                    result,
                },
                count,
            )
        }
    }

    impl NotificationChannel for MockChannel {
        fn name(&self) -> &str {
            &self.name
        }

        fn send(&self, _config: &Config, _message: &Notification<'_>) -> anyhow::Result<SendResult> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            (self.result)()
        }
    }

    fn config_with_channels(channels: &str) -> Config {
        let mut vars = HashMap::new();
        vars.insert("NOTIFY_CHANNELS".to_string(), channels.to_string());
        // 测试进程环境中不应有该变量
        std::env::remove_var("NOTIFY_CHANNELS");
        Config::from_map(vars)
    }

    fn sample_notification(payload: &serde_json::Value) -> Notification<'_> {
        Notification {
            title: "测试标题",
            content: "测试内容",
            source: Source::Codex,
            payload,
        }
    }

    #[test]
    fn test_dispatch_sends_to_registered_channel() {
        let payload = serde_json::json!({});
        let (channel, count) = MockChannel::new("mock", || Ok(SendResult::Sent));
        let mut dispatcher = NotificationDispatcher::empty();
        dispatcher.register_channel(Box::new(channel));

        let results = dispatcher.dispatch(
            &config_with_channels("mock"),
            &sample_notification(&payload),
        );

        assert_eq!(results, vec![("mock".to_string(), SendResult::Sent)]);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unregistered_channel_silently_skipped() {
        let payload = serde_json::json!({});
        let (channel, count) = MockChannel::new("mock", || Ok(SendResult::Sent));
        let mut dispatcher = NotificationDispatcher::empty();
        dispatcher.register_channel(Box::new(channel));

        let results = dispatcher.dispatch(
            &config_with_channels("slack,mock"),
            &sample_notification(&payload),
        );

        // 未注册的 slack 不产生结果条目
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "mock");
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_channel_error_recorded_as_failed_and_does_not_abort() {
        let payload = serde_json::json!({});
        let (failing, _) = MockChannel::new("failing", || Err(anyhow!("connection refused")));
        let (ok, ok_count) = MockChannel::new("ok", || Ok(SendResult::Sent));
        let mut dispatcher = NotificationDispatcher::empty();
        dispatcher.register_channel(Box::new(failing));
        dispatcher.register_channel(Box::new(ok));

        let results = dispatcher.dispatch(
            &config_with_channels("failing,ok"),
            &sample_notification(&payload),
        );

        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].1, SendResult::Failed(ref e) if e.contains("connection refused")));
        assert_eq!(results[1].1, SendResult::Sent);
        // 前一个渠道失败不阻止后续渠道
        assert_eq!(ok_count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_duplicate_channel_name_sends_twice_keeps_one_entry() {
        let payload = serde_json::json!({});
        let (channel, count) = MockChannel::new("mock", || Ok(SendResult::Sent));
        let mut dispatcher = NotificationDispatcher::empty();
        dispatcher.register_channel(Box::new(channel));

        let results = dispatcher.dispatch(
            &config_with_channels("mock,mock"),
            &sample_notification(&payload),
        );

        assert_eq!(results.len(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_builtin_registry_has_email() {
        let dispatcher = NotificationDispatcher::new();
        assert_eq!(dispatcher.channel_names(), vec!["email"]);
    }
}
