//! Mermaid stage: ```` ```mermaid ```` fences become `<div class="mermaid">`.
//!
//! The finished container is stashed behind a placeholder so neither the
//! inline stage nor the base renderer rewrites diagram source.

use crate::pipeline::RenderContext;
use notepress_core::utils::escape_html;
use notepress_parser::{FenceTracker, fence_marker};

fn is_mermaid_info(info: &str) -> bool {
    info.split_whitespace()
        .next()
        .is_some_and(|lang| lang.eq_ignore_ascii_case("mermaid"))
}

/// Drop control characters other than newline and tab.
fn strip_control(source: &str) -> String {
    source
        .chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect()
}

/// Replace mermaid fences with stashed diagram containers.
pub(crate) fn extract_diagrams(text: &str, ctx: &mut RenderContext) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut fences = FenceTracker::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        let opening = if fences.in_code() {
            None
        } else {
            fence_marker(line).filter(|m| is_mermaid_info(m.rest))
        };

        let Some(open) = opening else {
            fences.observe(line);
            out.push(line.to_string());
            i += 1;
            continue;
        };

        let close = lines[i + 1..].iter().position(|l| {
            fence_marker(l)
                .is_some_and(|m| m.ch == open.ch && m.len >= open.len && m.rest.trim().is_empty())
        });

        match close {
            Some(offset) => {
                let source = lines[i + 1..i + 1 + offset].join("\n");
                let html = format!(
                    "<div class=\"mermaid\">\n{}\n</div>",
                    escape_html(&strip_control(&source))
                );
                out.push(String::new());
                out.push(ctx.stash(html));
                out.push(String::new());
                ctx.diagrams += 1;
                i += offset + 2;
            }
            None => {
                // Unclosed: let the base renderer treat it as an ordinary fence
                log::debug!("Unclosed mermaid fence at line {}", i + 1);
                fences.observe(line);
                out.push(line.to_string());
                i += 1;
            }
        }
    }

    let mut result = out.join("\n");
    if text.ends_with('\n') {
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mermaid_fence_is_stashed() {
        let mut ctx = RenderContext::new();
        let out = extract_diagrams("Intro\n```Mermaid\ngraph TD\n  A-->B\n```\nAfter", &mut ctx);
        assert_eq!(ctx.diagrams, 1);
        assert!(!out.contains("graph TD"));
        assert!(out.contains("After"));

        let restored = ctx.restore(&out);
        assert!(restored.contains("<div class=\"mermaid\">\ngraph TD\n  A--&gt;B\n</div>"));
    }

    #[test]
    fn test_other_fences_untouched() {
        let mut ctx = RenderContext::new();
        let text = "```rust\nfn main() {}\n```\n";
        assert_eq!(extract_diagrams(text, &mut ctx), text);
        assert_eq!(ctx.diagrams, 0);
    }

    #[test]
    fn test_mermaid_inside_other_fence_untouched() {
        let mut ctx = RenderContext::new();
        let text = "````md\n```mermaid\ngraph\n```\n````";
        assert_eq!(extract_diagrams(text, &mut ctx), text);
        assert_eq!(ctx.diagrams, 0);
    }

    #[test]
    fn test_unclosed_mermaid_passes_through() {
        let mut ctx = RenderContext::new();
        let text = "```mermaid\ngraph TD";
        assert_eq!(extract_diagrams(text, &mut ctx), text);
        assert_eq!(ctx.diagrams, 0);
    }

    #[test]
    fn test_control_characters_stripped() {
        assert_eq!(strip_control("a\u{7}b\tc\nd"), "ab\tc\nd");
    }
}
