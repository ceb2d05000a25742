//! Rendering of page blocks to Markdown-like text
//!
//! Only top-level blocks are rendered; nested children are not fetched.
//! Unknown block types are skipped.

use super::models::{plain_text, Block};
use serde_json::Value;

fn is_list_item(kind: &str) -> bool {
    matches!(kind, "bulleted_list_item" | "numbered_list_item" | "to_do")
}

fn text_of(block: &Block) -> String {
    plain_text(block.payload().and_then(|p| p.get("rich_text")))
}

fn file_url(payload: &Value) -> Option<&str> {
    ["file", "external"]
        .iter()
        .find_map(|kind| payload.get(*kind).and_then(|f| f.get("url")).and_then(Value::as_str))
}

/// Render one block; `None` means the block produces no output
pub fn render_block(block: &Block) -> Option<String> {
    let rendered = match block.kind.as_str() {
        "paragraph" => text_of(block),
        "heading_1" => format!("# {}", text_of(block)),
        "heading_2" => format!("## {}", text_of(block)),
        "heading_3" => format!("### {}", text_of(block)),
        "bulleted_list_item" => format!("- {}", text_of(block)),
        "numbered_list_item" => format!("1. {}", text_of(block)),
        "to_do" => {
            let checked = block
                .payload()
                .and_then(|p| p.get("checked"))
                .and_then(Value::as_bool)
                .unwrap_or(false);
            format!("- [{}] {}", if checked { "x" } else { " " }, text_of(block))
        }
        "quote" | "callout" => format!("> {}", text_of(block)),
        "code" => {
            let language = block
                .payload()
                .and_then(|p| p.get("language"))
                .and_then(Value::as_str)
                .filter(|l| *l != "plain text")
                .unwrap_or("");
            format!("```{}\n{}\n```", language, text_of(block))
        }
        "divider" => "---".to_string(),
        "image" => {
            let payload = block.payload()?;
            let url = file_url(payload)?;
            let caption = plain_text(payload.get("caption"));
            format!("![{caption}]({url})")
        }
        _ => return None,
    };

    if rendered.trim().is_empty() {
        None
    } else {
        Some(rendered)
    }
}

/// Render blocks in order
///
/// Consecutive list items are separated by a single newline, everything else
/// by a blank line.
pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut previous_kind: Option<&str> = None;

    for block in blocks {
        let Some(rendered) = render_block(block) else {
            continue;
        };

        if let Some(prev) = previous_kind {
            if is_list_item(prev) && is_list_item(&block.kind) {
                out.push('\n');
            } else {
                out.push_str("\n\n");
            }
        }
        out.push_str(&rendered);
        previous_kind = Some(block.kind.as_str());
    }

    if !out.is_empty() {
        out.push('\n');
    }
    out
}
