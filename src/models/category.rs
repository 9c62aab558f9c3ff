//! Category normalization
//!
//! Categories are free text typed by the user. Before a category reaches
//! the ledger it is reduced to a canonical label so that "food", "FOOD" and
//! "Food " all group together.

/// Maximum length of a normalized category, in characters
pub const MAX_CATEGORY_LEN: usize = 50;

/// Categories offered before the user types their own
pub const PRESET_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Bills",
    "Shopping",
    "Entertainment",
    "Other",
];

/// Whether a character may appear in a normalized category
pub fn is_allowed_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, ' ' | '&' | '/' | '-')
}

/// Reduce free text to a canonical category label
///
/// Disallowed characters are removed before casing so that casing only
/// ever sees the final word boundaries; this keeps the function idempotent.
/// An empty result means no usable category was supplied.
///
/// ```
/// use expense_ledger::models::category::normalize;
/// assert_eq!(normalize("  food & drink!! "), "Food & Drink");
/// ```
pub fn normalize(raw: &str) -> String {
    let kept: String = raw.trim().chars().filter(|&c| is_allowed_char(c)).collect();
    let titled = title_case(&kept);
    let truncated: String = titled.chars().take(MAX_CATEGORY_LEN).collect();
    truncated.trim().to_string()
}

/// Check whether a label is already in canonical form
pub fn is_normalized(label: &str) -> bool {
    !label.is_empty() && normalize(label) == label
}

/// Uppercase the first letter of every word and lowercase the rest
///
/// Any non-letter starts a new word, so "rock&roll" becomes "Rock&Roll" and
/// "3d prints" becomes "3D Prints".
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            let mapped = if at_word_start {
                single_char(c.to_uppercase())
            } else {
                single_char(c.to_lowercase())
            };
            // Multi-char case mappings (e.g. 'ß' -> "SS") are left alone
            out.push(mapped.unwrap_or(c));
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }

    out
}

fn single_char(mut chars: impl Iterator<Item = char>) -> Option<char> {
    let first = chars.next()?;
    match chars.next() {
        Some(_) => None,
        None => Some(first),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_variants_collapse() {
        assert_eq!(normalize("food"), "Food");
        assert_eq!(normalize("FOOD"), "Food");
        assert_eq!(normalize("Food "), "Food");
        assert_eq!(normalize("  fOOd"), "Food");
    }

    #[test]
    fn test_punctuation_is_stripped() {
        assert_eq!(normalize("  food & drink!! "), "Food & Drink");
        assert_eq!(normalize("rent/mortgage"), "Rent/Mortgage");
        assert_eq!(normalize("self-care"), "Self-Care");
        assert_eq!(normalize("coffee (work)"), "Coffee Work");
        assert_eq!(normalize("a.b"), "Ab");
    }

    #[test]
    fn test_only_disallowed_is_empty() {
        assert_eq!(normalize("!!!"), "");
        assert_eq!(normalize("  ?? .. ;; "), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_digits_and_word_boundaries() {
        assert_eq!(normalize("3d prints"), "3D Prints");
        assert_eq!(normalize("rock&roll"), "Rock&Roll");
        assert_eq!(normalize("2024 taxes"), "2024 Taxes");
    }

    #[test]
    fn test_truncates_to_fifty_chars() {
        let long = "x".repeat(80);
        let normalized = normalize(&long);
        assert_eq!(normalized.chars().count(), MAX_CATEGORY_LEN);
        assert!(normalized.starts_with('X'));

        // A cut landing on a space must not leave trailing whitespace
        let spaced = format!("{} tail", "a".repeat(49));
        assert_eq!(normalize(&spaced), format!("A{}", "a".repeat(48)));
    }

    #[test]
    fn test_truncation_counts_chars_not_bytes() {
        let accented = "é".repeat(60);
        let normalized = normalize(&accented);
        assert_eq!(normalized.chars().count(), MAX_CATEGORY_LEN);
        assert!(normalized.starts_with('É'));
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "  food & drink!! ",
            "a.b",
            "!! leading punctuation",
            "MiXeD cAsE / with-dashes",
            "ßtraße",
            "İstanbul trip",
            "tabs\tand\nnewlines",
            "emoji 🍕 pizza",
            &"word ".repeat(20),
            "x.y.z.w",
            "ǆungla",
        ];
        for s in samples {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {:?}", s);
        }
    }

    #[test]
    fn test_output_only_contains_allowed_chars() {
        for s in ["$%^&*()", "a_b_c", "tab\there", "emoji 🍕"] {
            assert!(normalize(s).chars().all(is_allowed_char));
        }
    }

    #[test]
    fn test_presets_are_normalized() {
        for preset in PRESET_CATEGORIES {
            assert!(is_normalized(preset));
        }
        assert!(!is_normalized("food"));
        assert!(!is_normalized(""));
    }
}
