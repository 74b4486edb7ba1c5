use crate::utils::decode_entity;

/// Prefix the first line with `first` and later lines with `rest`. Blank
/// lines get the prefix without its trailing spaces.
pub(super) fn indent_lines(text: &str, first: &str, rest: &str) -> String {
    let mut out = String::with_capacity(text.len() + first.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let prefix = if i == 0 { first } else { rest };
        if line.is_empty() {
            out.push_str(prefix.trim_end());
        } else {
            out.push_str(prefix);
            out.push_str(line);
        }
    }
    out
}

/// Longest run of `ch` in `text`.
pub(super) fn longest_run(text: &str, ch: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for c in text.chars() {
        if c == ch {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Whether an `&` at the start of `rest` would be read as a character reference.
pub(super) fn starts_entity(rest: &str) -> bool {
    decode_entity(rest).is_some()
}

/// A link destination in the form that reads back unchanged.
pub(super) fn format_destination(destination: &str) -> String {
    let needs_angles = destination.is_empty()
        || destination
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | '(' | ')'));
    let mut out = String::with_capacity(destination.len() + 2);
    if needs_angles {
        out.push('<');
    }
    for (i, c) in destination.char_indices() {
        match c {
            '\\' => out.push_str("\\\\"),
            '<' | '>' if needs_angles => {
                out.push('\\');
                out.push(c);
            }
            '&' if starts_entity(&destination[i..]) => out.push_str("\\&"),
            _ => out.push(c),
        }
    }
    if needs_angles {
        out.push('>');
    }
    out
}

/// A link title in double quotes.
pub(super) fn format_title(title: &str) -> String {
    let mut out = String::with_capacity(title.len() + 2);
    out.push('"');
    for (i, c) in title.char_indices() {
        match c {
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '&' if starts_entity(&title[i..]) => out.push_str("\\&"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_stay_blank() {
        assert_eq!(indent_lines("a\n\nb", "- ", "  "), "- a\n\n  b");
        assert_eq!(indent_lines("a\n\nb", "> ", "> "), "> a\n>\n> b");
    }

    #[test]
    fn destinations_use_angles_when_needed() {
        assert_eq!(format_destination("/url"), "/url");
        assert_eq!(format_destination(""), "<>");
        assert_eq!(format_destination("a b"), "<a b>");
        assert_eq!(format_destination("a(b)"), "<a(b)>");
        assert_eq!(format_destination("a&amp;b"), "a\\&amp;b");
    }

    #[test]
    fn titles_escape_quotes() {
        assert_eq!(format_title("say \"hi\""), "\"say \\\"hi\\\"\"");
    }

    #[test]
    fn runs() {
        assert_eq!(longest_run("a``b```c", '`'), 3);
        assert_eq!(longest_run("abc", '`'), 0);
    }
}
