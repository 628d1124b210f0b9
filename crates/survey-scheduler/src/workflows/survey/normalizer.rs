/// Lowercases, strips invisible marks, and reduces punctuation to single spaces.
pub(crate) fn normalize_name(value: &str) -> String {
    let cleaned: String = value
        .replace(['\u{feff}', '\u{200b}'], "")
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch == '&' {
                ch
            } else {
                ' '
            }
        })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// Whole-word containment over normalized text.
pub(crate) fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    format!(" {haystack} ").contains(&format!(" {phrase} "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_name_removes_punctuation_whitespace_and_case() {
        let source = "\u{feff}International  Tonnage-Certificate (1969)";
        assert_eq!(normalize_name(source), "international tonnage certificate 1969");
    }

    #[test]
    fn contains_phrase_respects_word_boundaries() {
        assert!(contains_phrase("issc interim", "issc"));
        assert!(!contains_phrase("issc interim", "ssc"));
        assert!(contains_phrase("cargo ship safety equipment", "safety equipment"));
        assert!(!contains_phrase("anything", ""));
    }
}
