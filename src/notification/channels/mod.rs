//! 内置通知渠道

pub mod email;

pub use email::EmailChannel;
