#![forbid(unsafe_code)]

//! Byte-offset edits on serialized XML.
//!
//! The signing pipeline works on envelope text: it inserts templates,
//! fills placeholders and strips newlines between re-parses, so the edits
//! here operate on `roxmltree` node ranges rather than on a mutable tree.

use std::ops::Range;

/// Position just before the closing `>` of the start tag beginning at
/// `start`. Quote-aware, so attribute values containing `>` are skipped.
///
/// Returns `None` when the tag never closes (malformed input).
pub fn start_tag_close(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = start;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'>' => return Some(i),
                b'>' => return Some(i),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Whether the element starting at `start` is written as a self-closing tag.
pub fn is_self_closing(text: &str, start: usize) -> bool {
    match start_tag_close(text, start) {
        Some(pos) => text.as_bytes().get(pos) == Some(&b'/'),
        None => false,
    }
}

/// The byte offset where the end tag of the element spanning `range`
/// begins. The element must not be self-closing.
pub fn end_tag_start(text: &str, range: &Range<usize>) -> Option<usize> {
    text[range.clone()].rfind('<').map(|pos| range.start + pos)
}

/// Insert `content` as the last child of the element spanning `range`.
///
/// A self-closing element is expanded into an explicit start/end tag pair.
pub fn insert_last_child(text: &str, range: &Range<usize>, content: &str) -> Option<String> {
    if is_self_closing(text, range.start) {
        let slash = start_tag_close(text, range.start)?;
        let qname = tag_qname(text, range.start)?;
        let mut out = String::with_capacity(text.len() + content.len() + qname.len() + 3);
        out.push_str(&text[..slash]);
        out.push('>');
        out.push_str(content);
        out.push_str("</");
        out.push_str(&qname);
        out.push('>');
        out.push_str(&text[range.end..]);
        Some(out)
    } else {
        let at = end_tag_start(text, range)?;
        let mut out = String::with_capacity(text.len() + content.len());
        out.push_str(&text[..at]);
        out.push_str(content);
        out.push_str(&text[at..]);
        Some(out)
    }
}

/// Insert raw attribute text (starting with a space) into the start tag of
/// the element beginning at `start`.
pub fn insert_attributes(text: &str, start: usize, attrs: &str) -> Option<String> {
    let at = start_tag_close(text, start)?;
    let mut out = String::with_capacity(text.len() + attrs.len());
    out.push_str(&text[..at]);
    out.push_str(attrs);
    out.push_str(&text[at..]);
    Some(out)
}

/// Remove the element spanning `range` from the text.
pub fn remove_range(text: &str, range: &Range<usize>) -> String {
    let mut out = String::with_capacity(text.len() - range.len());
    out.push_str(&text[..range.start]);
    out.push_str(&text[range.end..]);
    out
}

/// Strip raw newline characters from text content inside `range`.
///
/// Only character data between tags is touched; newlines inside tags
/// (between attributes) are left alone so the markup stays well-formed.
pub fn strip_text_newlines(text: &str, range: &Range<usize>) -> String {
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..range.start]);
    let mut in_tag = false;
    let mut quote: Option<char> = None;
    for ch in text[range.clone()].chars() {
        match (in_tag, quote) {
            (true, Some(q)) => {
                if ch == q {
                    quote = None;
                }
            }
            (true, None) => match ch {
                '"' | '\'' => quote = Some(ch),
                '>' => in_tag = false,
                _ => {}
            },
            (false, _) => {
                if ch == '<' {
                    in_tag = true;
                } else if ch == '\n' || ch == '\r' {
                    continue;
                }
            }
        }
        out.push(ch);
    }
    out.push_str(&text[range.end..]);
    out
}

/// The qualified name of the tag starting at `start` (without `<`).
fn tag_qname(text: &str, start: usize) -> Option<String> {
    let rest = &text[start + 1..];
    let end = rest.find(|c: char| c.is_whitespace() || c == '>' || c == '/')?;
    Some(rest[..end].to_owned())
}
