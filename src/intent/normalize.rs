//! Text normalization applied before keyword matching

/// Canonicalize raw text for matching.
///
/// Lowercases the input, drops every character outside `[a-z0-9 ]`,
/// collapses runs of spaces and trims the ends. Never fails; empty input
/// yields an empty string.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect();

    kept.split(' ')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        assert_eq!(normalize("Hello, World!"), "hello world");
        assert_eq!(normalize("Who is Ada Lovelace?"), "who is ada lovelace");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("?!..."), "");
    }

    #[test]
    fn test_keeps_digits() {
        assert_eq!(normalize("Remind me at 10:30"), "remind me at 1030");
    }

    #[test]
    fn test_collapses_spaces() {
        assert_eq!(normalize("  open   youtube  "), "open youtube");
        assert_eq!(normalize("who - is   bob"), "who is bob");
    }

    #[test]
    fn test_control_characters_are_removed() {
        // Tabs and newlines are outside the kept set, so words join up
        assert_eq!(normalize("read\nnotes"), "readnotes");
        assert_eq!(normalize("a\tb"), "ab");
    }

    #[test]
    fn test_non_ascii_is_dropped() {
        assert_eq!(normalize("Café Über"), "caf ber");
        assert_eq!(normalize("🎙️ hey"), "hey");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "",
            "Hello what TIME is it??",
            "  Wikipedia:  Rust (programming language) ",
            "Ünïcödé\t\ttext\r\n",
            "stop   listening!!!",
            "12:00 — note this",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not idempotent for {sample:?}");
        }
    }

    #[test]
    fn test_output_alphabet() {
        let out = normalize("Mixed: CASE, digits 42 & symbols #$%^ ÅÉÎ");
        assert!(out
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
        assert!(!out.starts_with(' ') && !out.ends_with(' '));
        assert!(!out.contains("  "));
    }
}
