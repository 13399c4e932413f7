//! AI Task Notify CLI
//!
//! Claude Code / Codex 任务完成邮件通知。
//!
//! 使用方式:
//! 1. Claude Code (Stop hook): 通过 stdin 接收 JSON
//! 2. Codex CLI (notify): 通过命令行参数接收 JSON

use ai_task_notify::{
    format_message, parse_input, Config, Notification, NotificationDispatcher, ParsedInput,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "atn")]
#[command(about = "AI Task Notify - Claude Code / Codex 任务完成邮件通知")]
#[command(version)]
struct Cli {
    /// JSON payload from Codex notify (passed as command line argument)
    payload: Option<String>,

    /// 自定义 .env 配置文件路径
    #[arg(long)]
    env_file: Option<PathBuf>,
}

fn main() {
    // 初始化 tracing 日志系统
    // 通过 RUST_LOG 环境变量控制日志级别，默认为 info
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ai_task_notify=info,atn=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();
    std::process::exit(run(cli));
}

fn run(cli: Cli) -> i32 {
    // 加载配置
    let config = match &cli.env_file {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    };

    // 没有启用的渠道时不做任何解析/格式化工作
    let channels = config.enabled_channels();
    if channels.is_empty() {
        eprintln!("No notification channels enabled");
        return 0;
    }
    debug!(?channels, "Enabled notification channels");

    // 解析输入
    let (source, event_type, payload) = match parse_input(cli.payload.as_deref()) {
        ParsedInput::Event {
            source,
            event_type,
            payload,
        } => (source, event_type, payload),
        ParsedInput::Filtered => {
            // 事件类型不需要处理
            return 0;
        }
        ParsedInput::Empty => {
            eprintln!("No valid input data");
            return 1;
        }
    };
    debug!(source = %source, event_type = %event_type, "Parsed notification input");

    // 格式化消息
    let (title, content) = format_message(source, &event_type, &payload);

    // 发送通知
    let dispatcher = NotificationDispatcher::new();
    let results = dispatcher.dispatch(
        &config,
        &Notification {
            title: &title,
            content: &content,
            source,
            payload: &payload,
        },
    );

    // 输出结果
    let success_count = results.iter().filter(|(_, r)| r.is_sent()).count();
    println!("Notifications sent: {}/{}", success_count, results.len());
    for (channel, result) in &results {
        let status = if result.is_sent() { "✓" } else { "✗" };
        println!("  {} {}", status, channel);
    }

    if success_count > 0 {
        0
    } else {
        1
    }
}
