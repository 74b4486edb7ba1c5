//! Buffered leaf-block text with a mapping back to source offsets.
//!
//! The block pass strips container prefixes (`> `, list indentation, tab
//! padding) before appending a line, so the text the inline pass sees is not
//! a slice of the source. Each append records a segment; offsets into the
//! buffer are translated back through the segment that covers them.

use crate::syntax::Span;
use crate::utils::is_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    /// Offset of the segment in the buffer.
    buffer: usize,
    /// Offset of the segment in the source.
    source: usize,
    len: usize,
    /// Length of the source text the segment stands for; shorter than `len`
    /// for tab padding, longer for `\r\n` line endings.
    source_len: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ContentWriter {
    text: String,
    segments: Vec<Segment>,
}

impl ContentWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_blank(&self) -> bool {
        is_blank(&self.text)
    }

    /// Append text copied verbatim from `source`.
    pub fn append(&mut self, text: &str, source: usize) {
        self.push(text, source, text.len());
    }

    /// Append spaces standing in for the unconsumed part of a tab at `source`.
    pub fn pad(&mut self, count: usize, source: usize) {
        self.push(&" ".repeat(count), source, 0);
    }

    /// End the current line. `source_len` is the length of the line ending in
    /// the source, zero at the end of the input.
    pub fn newline(&mut self, source: usize, source_len: usize) {
        self.push("\n", source, source_len);
    }

    fn push(&mut self, text: &str, source: usize, source_len: usize) {
        if text.is_empty() {
            return;
        }
        self.segments.push(Segment {
            buffer: self.text.len(),
            source,
            len: text.len(),
            source_len,
        });
        self.text.push_str(text);
    }

    /// Append all of `other`, keeping its source mapping.
    pub fn extend(&mut self, other: &ContentWriter) {
        let base = self.text.len();
        self.segments.extend(other.segments.iter().map(|segment| Segment {
            buffer: segment.buffer + base,
            ..*segment
        }));
        self.text.push_str(&other.text);
    }

    /// Source offset of the character at buffer offset `offset`.
    pub fn to_source(&self, offset: usize) -> usize {
        let index = self
            .segments
            .partition_point(|segment| segment.buffer <= offset);
        match index.checked_sub(1).map(|i| &self.segments[i]) {
            Some(segment) => segment.source + (offset - segment.buffer).min(segment.source_len),
            None => self.segments.first().map_or(0, |segment| segment.source),
        }
    }

    /// Source offset just past the character ending at buffer offset `offset`.
    pub fn to_source_end(&self, offset: usize) -> usize {
        if offset == 0 {
            return self.to_source(0);
        }
        let index = self
            .segments
            .partition_point(|segment| segment.buffer < offset);
        match index.checked_sub(1).map(|i| &self.segments[i]) {
            Some(segment) => {
                let within = offset - segment.buffer;
                if within >= segment.len {
                    segment.source + segment.source_len
                } else {
                    segment.source + within.min(segment.source_len)
                }
            }
            None => self.to_source(offset),
        }
    }

    /// Source span of the buffer range `start..end`.
    pub fn span(&self, start: usize, end: usize) -> Span {
        let source_start = self.to_source(start);
        let source_end = self.to_source_end(end).max(source_start);
        Span::new(source_start, source_end)
    }

    /// Source span of the whole buffer, `None` when nothing was written.
    pub fn source_span(&self) -> Option<Span> {
        if self.segments.is_empty() {
            None
        } else {
            Some(self.span(0, self.text.len()))
        }
    }

    /// A copy of the buffer range `start..end` with its mapping.
    pub fn slice(&self, start: usize, end: usize) -> ContentWriter {
        let mut out = ContentWriter::new();
        for segment in &self.segments {
            let seg_end = segment.buffer + segment.len;
            if seg_end <= start || segment.buffer >= end {
                continue;
            }
            let from = start.max(segment.buffer);
            let to = end.min(seg_end);
            let skipped = from - segment.buffer;
            let source = segment.source + skipped.min(segment.source_len);
            let source_len = segment
                .source_len
                .saturating_sub(skipped)
                .min(to - from);
            out.segments.push(Segment {
                buffer: out.text.len(),
                source,
                len: to - from,
                source_len: if to == seg_end && skipped == 0 {
                    segment.source_len
                } else {
                    source_len
                },
            });
            out.text.push_str(&self.text[from..to]);
        }
        out
    }

    /// Split the buffer at `at`, keeping the head and returning the tail.
    pub fn split_off(&mut self, at: usize) -> ContentWriter {
        let tail = self.slice(at, self.text.len());
        self.truncate(at);
        tail
    }

    pub fn truncate(&mut self, len: usize) {
        if len >= self.text.len() {
            return;
        }
        *self = self.slice(0, len);
    }

    /// Drop the first `len` bytes.
    pub fn drain_prefix(&mut self, len: usize) {
        *self = self.slice(len, self.text.len());
    }

    pub fn trim_end(&mut self) {
        let trimmed = self.text.trim_end().len();
        self.truncate(trimmed);
    }

    /// Buffer offset where the last line starts, ignoring a final newline.
    pub fn last_line_start(&self) -> usize {
        let body = self.text.strip_suffix('\n').unwrap_or(&self.text);
        body.rfind('\n').map_or(0, |i| i + 1)
    }

    /// The last line without its newline.
    pub fn last_line(&self) -> &str {
        let body = self.text.strip_suffix('\n').unwrap_or(&self.text);
        &body[self.last_line_start()..]
    }

    pub fn line_count(&self) -> usize {
        self.text.lines().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_lines() -> ContentWriter {
        // Source: "> foo\r\n> bar" with the "> " prefixes stripped.
        let mut writer = ContentWriter::new();
        writer.append("foo", 2);
        writer.newline(5, 2);
        writer.append("bar", 9);
        writer.newline(12, 0);
        writer
    }

    #[test]
    fn maps_offsets_through_stripped_prefixes() {
        let writer = two_lines();
        assert_eq!(writer.text(), "foo\nbar\n");
        assert_eq!(writer.to_source(0), 2);
        assert_eq!(writer.to_source(4), 9);
        assert_eq!(writer.to_source_end(3), 5);
        assert_eq!(writer.to_source_end(4), 7);
        assert_eq!(writer.span(4, 7), Span::new(9, 12));
    }

    #[test]
    fn padding_maps_to_the_tab() {
        let mut writer = ContentWriter::new();
        writer.pad(2, 10);
        writer.append("x", 11);
        assert_eq!(writer.text(), "  x");
        assert_eq!(writer.to_source(1), 10);
        assert_eq!(writer.to_source(2), 11);
    }

    #[test]
    fn split_off_rebases_the_tail() {
        let mut writer = two_lines();
        let start = writer.last_line_start();
        assert_eq!(writer.last_line(), "bar");
        let tail = writer.split_off(start);
        assert_eq!(writer.text(), "foo\n");
        assert_eq!(tail.text(), "bar\n");
        assert_eq!(tail.to_source(0), 9);
        assert_eq!(tail.source_span(), Some(Span::new(9, 12)));
    }

    #[test]
    fn drain_prefix_keeps_mapping() {
        let mut writer = two_lines();
        writer.drain_prefix(1);
        assert_eq!(writer.text(), "oo\nbar\n");
        assert_eq!(writer.to_source(0), 3);
        writer.trim_end();
        assert_eq!(writer.text(), "oo\nbar");
        assert_eq!(writer.to_source_end(writer.len()), 12);
    }
}
