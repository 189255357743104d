//! Code block HTML with class-based syntect highlighting.

use notepress_core::utils::{escape_attr, escape_html};
use std::sync::LazyLock;
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Highlight `code` as `lang`, or `None` when the language is unknown.
pub fn highlight_code(code: &str, lang: &str) -> Option<String> {
    let syntax = SYNTAXES.find_syntax_by_token(lang)?;
    let mut generator =
        ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAXES, ClassStyle::Spaced);

    for line in LinesWithEndings::from(code) {
        if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
            log::warn!("Highlighting {} failed: {}", lang, e);
            return None;
        }
    }

    Some(generator.finalize())
}

/// Markup for a code block. Falls back to escaped text when highlighting
/// is off or the language is unknown.
pub fn code_block_html(code: &str, lang: Option<&str>, highlight: bool) -> String {
    match lang {
        Some(lang) => {
            let body = highlight
                .then(|| highlight_code(code, lang))
                .flatten()
                .unwrap_or_else(|| escape_html(code));
            format!(
                concat!(
                    "<div class=\"codehilite\">",
                    "<pre><code class=\"language-{}\">{}</code></pre></div>\n"
                ),
                escape_attr(lang),
                body
            )
        }
        None => format!("<pre><code>{}</code></pre>\n", escape_html(code)),
    }
}
