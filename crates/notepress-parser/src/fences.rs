//! Code block tracking for line-oriented passes.
//!
//! Every text stage that scans markdown line by line must leave code blocks
//! untouched. [`FenceTracker`] follows CommonMark's fence rules closely
//! enough for that: up to three spaces of indent, three or more backticks or
//! tildes, and a closing fence of the same character at least as long.
//! [`CodeTracker`] adds indented code blocks on top.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Bullet or ordered list item marker
    static ref LIST_ITEM_PATTERN: Regex =
        Regex::new(r"^ {0,3}(?:[-*+]|\d{1,9}[.)])(?:[ \t]|$)").unwrap();
    /// ATX heading line
    static ref ATX_HEADING_PATTERN: Regex = Regex::new(r"^ {0,3}#{1,6}(?:[ \t]|$)").unwrap();
}

/// Opening or closing fence found on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceMarker<'a> {
    pub ch: char,
    pub len: usize,
    /// Text after the fence run (info string on an opening fence)
    pub rest: &'a str,
}

/// Detect a fence run at the start of `line`.
pub fn fence_marker(line: &str) -> Option<FenceMarker<'_>> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }

    let ch = trimmed.chars().next()?;
    if ch != '`' && ch != '~' {
        return None;
    }

    let len = trimmed.chars().take_while(|&c| c == ch).count();
    if len < 3 {
        return None;
    }

    Some(FenceMarker {
        ch,
        len,
        rest: &trimmed[len..],
    })
}

/// Tracks whether a line-by-line scan is inside a fenced code block.
#[derive(Debug, Default, Clone)]
pub struct FenceTracker {
    open: Option<(char, usize)>,
}

impl FenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a fence is open
    pub fn in_code(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns true when the line belongs to a fenced
    /// code block, fence lines included.
    pub fn observe(&mut self, line: &str) -> bool {
        let marker = fence_marker(line);
        match (self.open, marker) {
            (Some((ch, len)), Some(m))
                if m.ch == ch && m.len >= len && m.rest.trim().is_empty() =>
            {
                self.open = None;
                true
            }
            (Some(_), _) => true,
            (None, Some(m)) => {
                // Backtick info strings may not contain backticks
                if m.ch == '`' && m.rest.contains('`') {
                    return false;
                }
                self.open = Some((m.ch, m.len));
                true
            }
            (None, None) => false,
        }
    }
}

/// Leading indent width with tabs advancing to the next multiple of four.
fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for c in line.chars() {
        match c {
            ' ' => width += 1,
            '\t' => width += 4 - width % 4,
            _ => break,
        }
    }
    width
}

/// Tracks fenced and indented code blocks across a line-by-line scan.
///
/// An indented block starts with a line indented four or more columns that
/// cannot continue a paragraph: it follows a blank line, a heading, a closed
/// fence or the start of the text. Inside a list, indented lines belong to
/// the list item instead.
#[derive(Debug, Clone)]
pub struct CodeTracker {
    fences: FenceTracker,
    indented: bool,
    /// Whether the next line may open an indented block
    block_start: bool,
    in_list: bool,
}

impl Default for CodeTracker {
    fn default() -> Self {
        Self {
            fences: FenceTracker::new(),
            indented: false,
            block_start: true,
            in_list: false,
        }
    }
}

impl CodeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a fenced or indented block is open
    pub fn in_code(&self) -> bool {
        self.indented || self.fences.in_code()
    }

    /// Feed the next line. Returns true when the line belongs to a code
    /// block, fence lines included.
    pub fn observe(&mut self, line: &str) -> bool {
        if line.trim().is_empty() {
            // Blank lines never change what they sit in
            let in_fence = self.fences.observe(line);
            if !in_fence {
                self.block_start = true;
            }
            return in_fence || self.indented;
        }

        if !self.fences.in_code() && indent_width(line) >= 4 {
            if self.indented || (self.block_start && !self.in_list) {
                self.indented = true;
                self.block_start = false;
                return true;
            }
            self.block_start = false;
            return false;
        }
        self.indented = false;

        let was_open = self.fences.in_code();
        if self.fences.observe(line) {
            // A closing fence ends the block like a blank line would
            self.block_start = was_open && !self.fences.in_code();
            return true;
        }

        if LIST_ITEM_PATTERN.is_match(line) {
            self.in_list = true;
        } else if indent_width(line) == 0 {
            self.in_list = false;
        }
        self.block_start = ATX_HEADING_PATTERN.is_match(line);
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code_flags(content: &str) -> Vec<bool> {
        let mut tracker = FenceTracker::new();
        content.lines().map(|l| tracker.observe(l)).collect()
    }

    fn block_flags(content: &str) -> Vec<bool> {
        let mut tracker = CodeTracker::new();
        content.lines().map(|l| tracker.observe(l)).collect()
    }

    #[test]
    fn test_backtick_fence() {
        let flags = code_flags("text\n```rust\nlet x = 1;\n```\nafter");
        assert_eq!(flags, vec![false, true, true, true, false]);
    }

    #[test]
    fn test_tilde_fence_needs_matching_close() {
        let flags = code_flags("~~~~\n```\nstill code\n~~~\n~~~~\nout");
        assert_eq!(flags, vec![true, true, true, true, true, false]);
    }

    #[test]
    fn test_inline_backticks_are_not_fences() {
        let flags = code_flags("``not a fence``\n```a`b\nplain");
        assert_eq!(flags, vec![false, false, false]);
    }

    #[test]
    fn test_deep_indent_is_not_fence() {
        assert!(fence_marker("    ```").is_none());
        assert!(fence_marker("   ```").is_some());
    }

    #[test]
    fn test_marker_info_string() {
        let marker = fence_marker("```Mermaid").unwrap();
        assert_eq!(marker.ch, '`');
        assert_eq!(marker.len, 3);
        assert_eq!(marker.rest, "Mermaid");
    }

    #[test]
    fn test_indented_block_after_blank_line() {
        let flags = block_flags("para\n\n    code\n\n    more code\nafter");
        assert_eq!(flags, vec![false, false, true, true, true, false]);
    }

    #[test]
    fn test_indented_line_continues_paragraph() {
        let flags = block_flags("para\n    lazy continuation");
        assert_eq!(flags, vec![false, false]);
    }

    #[test]
    fn test_indented_block_at_start_and_after_heading() {
        assert_eq!(block_flags("\tcode\ntext"), vec![true, false]);
        assert_eq!(block_flags("# Title\n    code"), vec![false, true]);
    }

    #[test]
    fn test_list_item_content_is_not_code() {
        let flags = block_flags("- item\n\n    more item text\n\nplain\n\n    code");
        assert_eq!(flags, vec![false, false, false, false, false, false, true]);
    }

    #[test]
    fn test_fences_still_tracked() {
        let flags = block_flags("```\n    inside\n```\n    after fence");
        assert_eq!(flags, vec![true, true, true, true]);
    }
}
