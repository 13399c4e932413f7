//! HTML 邮件构建模块 - 渲染完整对话的富文本邮件
//!
//! 邮件客户端兼容性优先：table 布局、全部内联样式、不使用 emoji。

use crate::conversation::{extract_conversation, pretty_json, Role};
use crate::format::truncate_chars;
use crate::payload::{str_field, Source};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// 静态编译的粗体正则，避免每次调用都编译
static BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("Invalid bold regex"));

/// 代码块统一样式
const PRE_STYLE: &str = "margin:8px 0;padding:12px 16px;background:#1F2937;\
                         color:#E5E7EB;font-size:12px;line-height:1.6;\
                         font-family:'SF Mono','Fira Code',Consolas,monospace;\
                         border-radius:6px;white-space:pre-wrap;word-break:break-all;\
                         overflow:hidden;";

/// 来源主题色
struct Palette {
    accent: &'static str,
    accent_light: &'static str,
    accent_dark: &'static str,
}

/// 转义 HTML 特殊字符
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// 将消息文本转换为 HTML
///
/// 三反引号围栏之间的行合并为一个 `<pre>` 代码块（未闭合的围栏在
/// 文本结尾处补齐），`**粗体**` 转为 `<strong>`，其余行追加 `<br>`。
pub fn text_to_html(text: &str) -> String {
    let mut html_parts: Vec<String> = Vec::new();
    let mut in_code = false;
    let mut code_lines: Vec<&str> = Vec::new();

    for line in text.split('\n') {
        if line.trim().starts_with("```") {
            if in_code {
                html_parts.push(render_code_block(&code_lines));
                code_lines.clear();
                in_code = false;
            } else {
                in_code = true;
            }
            continue;
        }

        if in_code {
            code_lines.push(line);
        } else {
            let escaped = escape_html(line);
            let escaped = BOLD_RE.replace_all(&escaped, "<strong>$1</strong>");
            if escaped.trim().is_empty() {
                html_parts.push("<br>".to_string());
            } else {
                html_parts.push(format!("{}<br>", escaped));
            }
        }
    }

    // 未闭合的代码块补一个闭合的 <pre>
    if in_code && !code_lines.is_empty() {
        html_parts.push(render_code_block(&code_lines));
    }

    html_parts.join("\n")
}

fn render_code_block(lines: &[&str]) -> String {
    let code_text = escape_html(&lines.join("\n"));
    format!("<pre style=\"{}\">{}</pre>", PRE_STYLE, code_text)
}

fn palette_for(title: &str, source: Source) -> Palette {
    if title.contains("Claude") || source == Source::ClaudeCode {
        Palette {
            accent: "#D97706",
            accent_light: "#FEF3C7",
            accent_dark: "#92400E",
        }
    } else if title.contains("Codex") || source == Source::Codex {
        Palette {
            accent: "#059669",
            accent_light: "#D1FAE5",
            accent_dark: "#065F46",
        }
    } else {
        Palette {
            accent: "#2563EB",
            accent_light: "#DBEAFE",
            accent_dark: "#1E40AF",
        }
    }
}

/// 元数据表格行：完成时间始终存在，其余字段非空才展示
fn meta_rows(payload: &Value, now: &str) -> Vec<(String, String)> {
    let mut rows = vec![("完成时间".to_string(), now.to_string())];

    if let Some(cwd) = str_field(payload, "cwd") {
        rows.push(("工作目录".to_string(), cwd.to_string()));
    }
    if let Some(session_id) = str_field(payload, "session_id") {
        rows.push(("会话ID".to_string(), truncate_chars(session_id, 12)));
    }
    if let Some(event_type) = str_field(payload, "type") {
        rows.push(("事件类型".to_string(), event_type.to_string()));
    }
    if let Some(thread_id) = str_field(payload, "thread-id") {
        rows.push(("线程ID".to_string(), truncate_chars(thread_id, 16)));
    }
    if let Some(turn_id) = str_field(payload, "turn-id") {
        rows.push(("轮次ID".to_string(), truncate_chars(turn_id, 16)));
    }

    rows
}

fn render_meta_rows(rows: &[(String, String)]) -> String {
    let mut html = String::new();
    for (key, value) in rows {
        html.push_str(&format!(
            "<tr>\
             <td style=\"padding:8px 14px;color:#6B7280;font-size:13px;\
             white-space:nowrap;vertical-align:top;\
             border-bottom:1px solid #F3F4F6;\">{}</td>\
             <td style=\"padding:8px 14px;color:#111827;font-size:13px;\
             word-break:break-all;\
             border-bottom:1px solid #F3F4F6;\">{}</td>\
             </tr>",
            escape_html(key),
            escape_html(value)
        ));
    }
    html
}

fn render_conversation(payload: &Value, source: Source) -> String {
    let conversation = if payload.is_object() {
        extract_conversation(payload, source)
    } else {
        Vec::new()
    };

    let mut html = String::new();
    for message in &conversation {
        let (role_label, role_color, bg_color, border_color) = match message.role {
            Role::User => ("USER", "#4F46E5", "#EEF2FF", "#6366F1"),
            Role::Assistant => ("AI ASSISTANT", "#047857", "#F0FDF4", "#10B981"),
        };

        let content_html = text_to_html(&message.text);
        html.push_str(&format!(
            "<tr><td style=\"padding:0 24px 12px;\">\
             <table width=\"100%\" cellpadding=\"0\" cellspacing=\"0\"\
             style=\"border-collapse:collapse;\">\
             <tr><td style=\"padding:14px 16px;background:{bg};\
             border-left:3px solid {border};border-radius:4px;\">\
             <div style=\"font-size:11px;font-weight:700;color:{color};\
             text-transform:uppercase;letter-spacing:0.5px;\
             margin-bottom:8px;\">{label}</div>\
             <div style=\"font-size:14px;color:#1F2937;line-height:1.7;\">\
             {content}\
             </div>\
             </td></tr></table>\
             </td></tr>",
            bg = bg_color,
            border = border_color,
            color = role_color,
            label = role_label,
            content = content_html,
        ));
    }

    // 无对话时直接展示原始数据
    if html.is_empty() {
        let raw_text = escape_html(&pretty_json(payload));
        html = format!(
            "<tr><td style=\"padding:0 24px 16px;\">\
             <pre style=\"margin:0;padding:16px;background:#1F2937;color:#E5E7EB;\
             font-size:12px;line-height:1.6;\
             font-family:'SF Mono','Fira Code',Consolas,monospace;\
             border-radius:8px;white-space:pre-wrap;word-break:break-all;\">\
             {}</pre></td></tr>",
            raw_text
        );
    }

    html
}

/// 构建完整的 HTML 邮件文档
pub fn build_email_html(title: &str, source: Source, payload: &Value) -> String {
    let palette = palette_for(title, source);
    let now = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let meta_html = render_meta_rows(&meta_rows(payload, &now));
    let conversation_html = render_conversation(payload, source);
    let title_html = escape_html(title);

    format!(
        r#"<!DOCTYPE html>
<html lang="zh-CN">
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width,initial-scale=1.0"></head>
<body style="margin:0;padding:0;background-color:#F3F4F6;
             font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,
             'Helvetica Neue',Arial,sans-serif;">
  <table width="100%" cellpadding="0" cellspacing="0"
         style="border-collapse:collapse;background:#F3F4F6;">
    <tr><td align="center" style="padding:32px 16px;">

      <!-- 主卡片 -->
      <table width="640" cellpadding="0" cellspacing="0"
             style="border-collapse:collapse;background:#FFFFFF;
                    border-radius:12px;overflow:hidden;
                    box-shadow:0 4px 24px rgba(0,0,0,0.08);">

        <!-- 顶部色条 -->
        <tr><td style="height:4px;background:{accent};
                       font-size:0;line-height:0;">&nbsp;</td></tr>

        <!-- 标题区 -->
        <tr><td style="padding:24px 24px 16px;">
          <table width="100%" cellpadding="0" cellspacing="0"
                 style="border-collapse:collapse;">
            <tr>
              <td style="vertical-align:middle;">
                <span style="font-size:20px;font-weight:700;color:#111827;">
                  {title}</span>
              </td>
              <td align="right" style="vertical-align:middle;">
                <span style="display:inline-block;padding:4px 12px;
                             background:{accent_light};color:{accent_dark};
                             font-size:11px;font-weight:600;border-radius:20px;
                             letter-spacing:0.3px;">COMPLETED</span>
              </td>
            </tr>
          </table>
        </td></tr>

        <!-- 分割线 -->
        <tr><td style="padding:0 24px;">
          <hr style="border:none;border-top:1px solid #E5E7EB;margin:0;">
        </td></tr>

        <!-- 元数据 -->
        <tr><td style="padding:16px 24px;">
          <table width="100%" cellpadding="0" cellspacing="0"
                 style="border-collapse:collapse;background:#F9FAFB;
                        border-radius:8px;border:1px solid #E5E7EB;">
            {meta}
          </table>
        </td></tr>

        <!-- 对话区域标题 -->
        <tr><td style="padding:8px 24px 12px;">
          <span style="font-size:12px;font-weight:600;color:#6B7280;
                       text-transform:uppercase;letter-spacing:0.5px;">
            Conversation</span>
        </td></tr>

        <!-- 对话内容 -->
        {conversation}

        <!-- 底部 -->
        <tr><td style="padding:16px 24px;background:#F9FAFB;
                       border-top:1px solid #E5E7EB;">
          <table width="100%" cellpadding="0" cellspacing="0"
                 style="border-collapse:collapse;">
            <tr>
              <td style="font-size:11px;color:#9CA3AF;">
                AI Task Notify
              </td>
              <td align="right" style="font-size:11px;color:#9CA3AF;">
                {now}
              </td>
            </tr>
          </table>
        </td></tr>

      </table>

      <!-- 页脚 -->
      <table width="640" cellpadding="0" cellspacing="0"
             style="border-collapse:collapse;">
        <tr><td align="center"
                style="padding:16px 0;font-size:11px;color:#9CA3AF;">
          此邮件由系统自动生成，请勿直接回复
        </td></tr>
      </table>

    </td></tr>
  </table>
</body>
</html>"#,
        accent = palette.accent,
        accent_light = palette.accent_light,
        accent_dark = palette.accent_dark,
        title = title_html,
        meta = meta_html,
        conversation = conversation_html,
        now = now,
    )
}
