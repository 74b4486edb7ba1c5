//! Shared utilities for block parsing.

/// First and last source line (1-based, inclusive) of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LineRange {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Count leading occurrences of `ch`.
pub(crate) fn count_leading(s: &str, ch: char) -> usize {
    s.chars().take_while(|&c| c == ch).count()
}

/// Strip trailing lines that hold nothing but spaces, including the line
/// ending before them.
pub(crate) fn strip_trailing_blank_lines(text: &str) -> &str {
    let mut end = text.len();
    loop {
        let trimmed = text[..end].trim_end_matches(' ');
        match trimmed.strip_suffix('\n') {
            Some(rest) => end = rest.len(),
            None => return &text[..end],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_leading_markers() {
        assert_eq!(count_leading("### x", '#'), 3);
        assert_eq!(count_leading("x#", '#'), 0);
    }

    #[test]
    fn trailing_blank_lines() {
        assert_eq!(strip_trailing_blank_lines("<div>  \n  \n\n"), "<div>  ");
        assert_eq!(strip_trailing_blank_lines("a\nb"), "a\nb");
        assert_eq!(strip_trailing_blank_lines("\n"), "");
    }
}
