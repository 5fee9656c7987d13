//! Small string predicates used when validating configuration values.

/// True when the value has content other than whitespace.
pub fn is_non_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Keep only ASCII letters and digits.
pub fn filter_non_alphanumeric(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values() {
        assert!(!is_non_blank(""));
        assert!(!is_non_blank("      "));
        assert!(!is_non_blank("\t\n"));
        assert!(is_non_blank(" test string "));
    }

    #[test]
    fn filters_everything_but_alphanumerics() {
        assert_eq!(filter_non_alphanumeric("Hello World!"), "HelloWorld");
        assert_eq!(filter_non_alphanumeric("my-skill_2"), "myskill2");
        assert_eq!(filter_non_alphanumeric("日本語"), "");
        assert_eq!(filter_non_alphanumeric(""), "");
    }
}
