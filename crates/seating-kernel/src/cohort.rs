//! Cohort derivation from group labels.

/// Coarse cohort key of a group label: its leading run of ASCII digits.
///
/// `"7A"` and `"7B"` share cohort `"7"`; `"12C"` is cohort `"12"`. A label
/// without a numeric prefix is its own cohort.
pub fn cohort(label: &str) -> &str {
    let end = label
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(label.len(), |(i, _)| i);

    if end == 0 { label } else { &label[..end] }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_prefix() {
        assert_eq!(cohort("7A"), "7");
        assert_eq!(cohort("12C"), "12");
        assert_eq!(cohort("10"), "10");
    }

    #[test]
    fn test_fallback_to_label() {
        assert_eq!(cohort("Alpha"), "Alpha");
        assert_eq!(cohort("A7"), "A7");
        assert_eq!(cohort(""), "");
    }

    #[test]
    fn test_stops_at_first_non_digit() {
        assert_eq!(cohort("9-2"), "9");
        assert_eq!(cohort("11 B"), "11");
    }
}
