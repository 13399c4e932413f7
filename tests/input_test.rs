//! 输入解析与消息格式化集成测试
//!
//! 对应两种调用约定的端到端行为（不含 SMTP 发送）。

use ai_task_notify::{format_message, parse_from, ParsedInput, Source};

#[test]
fn test_codex_argument_produces_codex_title() {
    // 场景 A: Codex notify 参数
    let arg = r#"{"type":"agent-turn-complete","input-messages":["fix bug"],"last-assistant-message":"done"}"#;

    let ParsedInput::Event {
        source,
        event_type,
        payload,
    } = parse_from(Some(arg), None)
    else {
        panic!("Expected Event");
    };

    assert_eq!(source, Source::Codex);
    let (title, content) = format_message(source, &event_type, &payload);
    assert_eq!(title, "Codex 任务完成");
    assert!(content.contains("fix bug"));
    assert!(content.contains("done"));
}

#[test]
fn test_non_turn_complete_event_is_filtered() {
    // 场景 B: 其他生命周期事件直接过滤，不触发任何通知
    let arg = r#"{"type":"turn-started","thread-id":"t-1","turn-id":"u-1"}"#;
    assert!(matches!(parse_from(Some(arg), None), ParsedInput::Filtered));
}

#[test]
fn test_piped_stdin_produces_claude_sections() {
    // 场景 C: Claude Code Stop hook 通过 stdin
    let stdin = r#"{"transcript":[{"type":"human","message":"hi"},{"type":"assistant","message":"hello"}],"cwd":"/tmp"}"#;

    let ParsedInput::Event {
        source,
        event_type,
        payload,
    } = parse_from(None, Some(stdin))
    else {
        panic!("Expected Event");
    };

    assert_eq!(source, Source::ClaudeCode);
    assert_eq!(event_type, "stop");

    let (title, content) = format_message(source, &event_type, &payload);
    assert_eq!(title, "Claude Code 任务完成");
    assert!(content.contains("**用户指令**:\nhi"));
    assert!(content.contains("**AI 回复**:\nhello"));
    assert!(content.contains("**工作目录**: /tmp"));
}

#[test]
fn test_malformed_everything_is_empty() {
    assert!(matches!(
        parse_from(Some("{broken"), Some("{also broken")),
        ParsedInput::Empty
    ));
}
