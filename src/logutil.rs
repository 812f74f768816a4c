//! Keeps user-supplied strings single-line when they end up in logs.
//! Search fragments arrive straight from chat and may contain anything.

/// Escape a string for single-line logging, truncating long input.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 120;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_log;

    #[test]
    fn escapes_newlines_and_tabs() {
        assert_eq!(escape_log("a\nb\tc"), "a\\nb\\tc");
    }

    #[test]
    fn truncates_long_fragments() {
        let long = "x".repeat(500);
        let escaped = escape_log(&long);
        assert!(escaped.chars().count() <= 121);
        assert!(escaped.ends_with('…'));
    }
}
