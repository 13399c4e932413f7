//! 通知模块 - 渠道抽象与分发

pub mod channel;
pub mod channels;
pub mod dispatcher;

pub use channel::{Notification, NotificationChannel, SendResult};
pub use dispatcher::NotificationDispatcher;
