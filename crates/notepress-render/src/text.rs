//! Line and code-span aware text mapping shared by the text stages.

use notepress_parser::CodeTracker;

fn split_line_ending(line: &str) -> (&str, &str) {
    if let Some(content) = line.strip_suffix("\r\n") {
        (content, "\r\n")
    } else if let Some(content) = line.strip_suffix('\n') {
        (content, "\n")
    } else {
        (line, "")
    }
}

/// Apply `f` to every line outside code blocks, keeping line endings.
pub(crate) fn map_prose_lines(text: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut code = CodeTracker::new();
    let mut out = String::with_capacity(text.len());

    for line in text.split_inclusive('\n') {
        let (content, ending) = split_line_ending(line);
        if code.observe(content) {
            out.push_str(line);
        } else {
            out.push_str(&f(content));
            out.push_str(ending);
        }
    }

    out
}

/// Byte offset of the next backtick run of exactly `run` characters.
fn find_closing_run(s: &str, run: usize) -> Option<usize> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let mut j = i;
            while j < bytes.len() && bytes[j] == b'`' {
                j += 1;
            }
            if j - i == run {
                return Some(i);
            }
            i = j;
        } else {
            i += 1;
        }
    }
    None
}

/// Apply `f` to the parts of a line outside inline code spans.
///
/// A backtick run without a matching closing run is literal text.
pub(crate) fn map_outside_code_spans(line: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(start) = rest.find('`') {
        let run = rest[start..].bytes().take_while(|&b| b == b'`').count();
        let after = &rest[start + run..];
        match find_closing_run(after, run) {
            Some(close) => {
                let end = start + run + close + run;
                out.push_str(&f(&rest[..start]));
                out.push_str(&rest[start..end]);
                rest = &rest[end..];
            }
            None => {
                out.push_str(&f(&rest[..start + run]));
                rest = after;
            }
        }
    }
    out.push_str(&f(rest));

    out
}
