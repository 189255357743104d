//! Callout stage: `> [!type]` blockquotes become container markup.
//!
//! The container is emitted as raw HTML lines separated from the content by
//! blank lines, so the base renderer still parses the content as markdown.
//! Content is run through this stage again, which makes `> > [!tip]` nest.

use notepress_core::utils::{capitalize, escape_html};
use notepress_core::{CalloutHeader, Foldable};
use notepress_parser::{CodeTracker, callout_continuation, parse_callout_header};

fn open_markup(header: &CalloutHeader) -> String {
    let kind = header.kind.as_str();
    let fold = match header.fold {
        Foldable::Static => "",
        Foldable::Expanded => " collapsible expanded",
        Foldable::Collapsed => " collapsible",
    };
    let title = match &header.title {
        Some(title) => escape_html(title),
        None => capitalize(kind),
    };

    format!(
        "<div class=\"callout callout-{kind}{fold}\" data-callout=\"{kind}\">\n\
         <div class=\"callout-title\">{title}</div>\n\
         <div class=\"callout-content\">"
    )
}

/// Convert every callout block in `text`.
pub(crate) fn render_callouts(text: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut code = CodeTracker::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];
        i += 1;

        if code.observe(line) {
            out.push(line.to_string());
            continue;
        }

        let Some(header) = parse_callout_header(line) else {
            out.push(line.to_string());
            continue;
        };

        // Quoted lines up to the first unquoted line or the next header
        let mut inner = Vec::new();
        while i < lines.len() && parse_callout_header(lines[i]).is_none() {
            match callout_continuation(lines[i]) {
                Some(content) => inner.push(content),
                None => break,
            }
            i += 1;
        }

        out.push(String::new());
        out.push(open_markup(&header));
        out.push(String::new());
        out.push(render_callouts(&inner.join("\n")));
        out.push(String::new());
        out.push("</div>\n</div>".to_string());
        out.push(String::new());
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
    fn test_basic_callout() {
        let out = render_callouts("> [!note] Heads up\n> Body text\nAfter");
        assert!(out.contains(concat!(
            "<div class=\"callout callout-note\" data-callout=\"note\">\n",
            "<div class=\"callout-title\">Heads up</div>"
        )));
        assert!(out.contains("\n\nBody text\n\n</div>\n</div>\n\nAfter"));
    }

    #[test]
    fn test_alias_and_default_title() {
        let out = render_callouts("> [!summary]\n> text");
        assert!(out.contains("callout-abstract"));
        assert!(out.contains("<div class=\"callout-title\">Abstract</div>"));
    }

    #[test]
    fn test_fold_classes() {
        assert!(render_callouts("> [!tip]+").contains("callout callout-tip collapsible expanded"));
        let collapsed = render_callouts("> [!tip]-");
        assert!(collapsed.contains("callout callout-tip collapsible\""));
    }

    #[test]
    fn test_unclosed_callout_is_closed_at_end() {
        let out = render_callouts("> [!warning]\n> last line");
        assert_eq!(out.matches("<div").count(), 3);
        assert_eq!(out.matches("</div>").count(), 3);
    }

    #[test]
    fn test_consecutive_headers_make_separate_callouts() {
        let out = render_callouts("> [!note] A\n> one\n> [!tip] B\n> two");
        assert!(out.contains("callout-note"));
        assert!(out.contains("callout-tip"));
        let note_close = out.find("</div>\n</div>").unwrap();
        assert!(note_close < out.find("callout-tip").unwrap());
    }

    #[test]
    fn test_nested_callout() {
        let out =
            render_callouts("> [!note] Outer\n> > [!tip] Inner\n> > inner text\n> outer text");
        let outer = out.find("callout-note").unwrap();
        let inner = out.find("callout-tip").unwrap();
        assert!(outer < inner);
        assert!(out.contains("inner text"));
        assert_eq!(out.matches("</div>\n</div>").count(), 2);
    }

    #[test]
    fn test_title_is_escaped() {
        let out = render_callouts("> [!note] <script>");
        assert!(out.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_plain_quotes_and_code_untouched() {
        let text = "> just a quote\n```\n> [!note] in code\n```\n";
        assert_eq!(render_callouts(text), text);
    }
}
