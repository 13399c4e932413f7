//! 输入解析模块 - 识别调用方式并产出规范化事件
//!
//! 两种调用约定：
//! 1. Codex CLI notify：JSON 作为第一个命令行参数传入
//! 2. Claude Code Stop hook：JSON 通过管道 stdin 传入
//!
//! 任一路径的 JSON 解析失败都被吞掉，落到下一个路径或空输入。

use crate::payload::Source;
use serde_json::Value;
use std::io::IsTerminal;
use tracing::debug;

/// Codex 唯一需要处理的事件类型
const CODEX_TURN_COMPLETE: &str = "agent-turn-complete";

/// 解析结果
#[derive(Debug, Clone)]
pub enum ParsedInput {
    /// 有效事件：来源、事件类型、原始载荷
    Event {
        source: Source,
        event_type: String,
        payload: Value,
    },
    /// 无需处理的事件（Codex 的非 turn-complete 生命周期事件），
    /// 调用方应当静默成功退出
    Filtered,
    /// 两个路径都没有产出数据
    Empty,
}

/// 从真实进程输入解析（命令行参数 + stdin）
pub fn parse_input(arg: Option<&str>) -> ParsedInput {
    let stdin_data = if std::io::stdin().is_terminal() {
        None
    } else {
        std::io::read_to_string(std::io::stdin()).ok()
    };
    parse_from(arg, stdin_data.as_deref())
}

/// 纯函数形式的解析逻辑，便于测试
///
/// 参数路径优先：参数 JSON 解析成功即认定来源为 Codex，不再读 stdin。
pub fn parse_from(arg: Option<&str>, stdin: Option<&str>) -> ParsedInput {
    // 命令行参数路径 (Codex)
    if let Some(arg) = arg {
        match serde_json::from_str::<Value>(arg) {
            Ok(payload) => {
                let event_type = payload
                    .get("type")
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string();

                // Codex 只处理 agent-turn-complete 事件
                if event_type != CODEX_TURN_COMPLETE {
                    debug!(event_type = %event_type, "Ignoring non-turn-complete Codex event");
                    return ParsedInput::Filtered;
                }

                return ParsedInput::Event {
                    source: Source::Codex,
                    event_type,
                    payload,
                };
            }
            Err(e) => {
                debug!(error = %e, "Argument is not valid JSON, falling through to stdin");
            }
        }
    }

    // stdin 路径 (Claude Code)
    if let Some(stdin) = stdin {
        if !stdin.trim().is_empty() {
            match serde_json::from_str::<Value>(stdin) {
                Ok(payload) => {
                    return ParsedInput::Event {
                        source: Source::ClaudeCode,
                        event_type: "stop".to_string(),
                        payload,
                    };
                }
                Err(e) => {
                    debug!(error = %e, "Stdin is not valid JSON");
                }
            }
        }
    }

    ParsedInput::Empty
}
