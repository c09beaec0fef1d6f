//! Expression span matching.
//!
//! A span is the text between a `{` and the first `}` that follows it, where
//! the `{` is the nearest one before that `}` not directly preceded by the
//! escape character. Because the first closing brace always pairs with the
//! nearest opening brace, nested input such as `{a{b}}` yields `{b}` first.
//!
//! ```text
//! "x{repeat:{pi}|2}y"
//!           ^^^^      <- first match, inner = "pi"
//! ```

use tracing::trace;

pub const OPEN: u8 = b'{';
pub const CLOSE: u8 = b'}';
pub const ESCAPE: u8 = b'\\';

/// One matched expression occurrence.
///
/// `start` is the byte offset of the opening brace and `end` the offset one
/// past the closing brace, so `&source[start..end]` is the full span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub start: usize,
    pub end: usize,
    pub inner: &'a str,
}

impl Span<'_> {
    /// Full span text length in bytes, braces included.
    pub fn width(&self) -> usize {
        self.end - self.start
    }

    /// `{}`: nothing between the braces.
    pub fn is_blank(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Finds the first complete, unescaped span in `source`.
///
/// Closing braces with no eligible opening brace before them are skipped.
pub fn find_span(source: &str) -> Option<Span<'_>> {
    find_span_from(source, 0)
}

/// Like [`find_span`], but starts scanning at byte offset `from`.
///
/// Offsets in the returned span are relative to the whole of `source`.
/// Opening braces before `from` are never considered.
pub fn find_span_from(source: &str, from: usize) -> Option<Span<'_>> {
    let bytes = source.as_bytes();
    let mut open: Option<usize> = None;

    for i in from..bytes.len() {
        match bytes[i] {
            OPEN if !is_escaped(bytes, i) => open = Some(i),
            CLOSE => {
                if let Some(start) = open {
                    let span = Span {
                        start,
                        end: i + 1,
                        inner: &source[start + 1..i],
                    };
                    trace!(start = span.start, end = span.end, inner = span.inner, "span matched");
                    return Some(span);
                }
                // 対応する `{` がない `}` は無視する
            }
            _ => {}
        }
    }
    None
}

fn is_escaped(bytes: &[u8], index: usize) -> bool {
    index > 0 && bytes[index - 1] == ESCAPE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_span() {
        let span = find_span("a{pi}b").unwrap();
        assert_eq!(span.start, 1);
        assert_eq!(span.end, 5);
        assert_eq!(span.inner, "pi");
        assert_eq!(span.width(), 4);
        assert!(!span.is_blank());
    }

    #[test]
    fn test_no_span() {
        assert_eq!(find_span(""), None);
        assert_eq!(find_span("plain text"), None);
        assert_eq!(find_span("open { only"), None);
        assert_eq!(find_span("close } only"), None);
    }

    #[test]
    fn test_innermost_first() {
        let source = "{repeat:{pi}|2}";
        let span = find_span(source).unwrap();
        assert_eq!(span.inner, "pi");
        assert_eq!(&source[span.start..span.end], "{pi}");
    }

    #[test]
    fn test_escaped_open_brace() {
        assert_eq!(find_span(r"\{notAnExpr}"), None);

        // 直前の `{` がエスケープされている場合はさらに手前を探す
        let source = r"{a\{b}";
        let span = find_span(source).unwrap();
        assert_eq!(span.start, 0);
        assert_eq!(span.inner, r"a\{b");
    }

    #[test]
    fn test_unmatched_close_is_skipped() {
        let source = "} stray {e}";
        let span = find_span(source).unwrap();
        assert_eq!(span.inner, "e");
        assert_eq!(span.start, 8);
    }

    #[test]
    fn test_empty_span() {
        let span = find_span("{}").unwrap();
        assert!(span.is_blank());
        assert_eq!(span.width(), 2);
    }

    #[test]
    fn test_find_from_offset() {
        let source = "{a}{b}";
        let first = find_span(source).unwrap();
        let second = find_span_from(source, first.end).unwrap();
        assert_eq!(second.inner, "b");
        assert_eq!(second.start, 3);
        assert_eq!(find_span_from(source, second.end), None);
    }

    #[test]
    fn test_open_before_offset_is_ignored() {
        // `{x` lies before the offset, so the `}` has no partner
        assert_eq!(find_span_from("{x}", 1), None);
    }

    #[test]
    fn test_multibyte_text() {
        let source = "こんにちは{pi}世界";
        let span = find_span(source).unwrap();
        assert_eq!(span.inner, "pi");
        assert_eq!(&source[span.start..span.end], "{pi}");
    }
}
