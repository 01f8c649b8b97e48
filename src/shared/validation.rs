use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for Gmail addresses, applied to the normalized (lowercased) email
    /// - Valid: "john.doe@gmail.com", "user.name+tag@gmail.com", "a_b%c-d@gmail.com"
    /// - Invalid: "john@yahoo.com", "@gmail.com", "john@gmail.com.evil", "jo hn@gmail.com"
    pub static ref GMAIL_REGEX: Regex = Regex::new(r"^[a-z0-9._%+-]+@gmail\.com$").unwrap();
}

/// Trim surrounding whitespace and lowercase
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// True iff `email`, once normalized, is a Gmail address
pub fn is_valid_gmail(email: &str) -> bool {
    GMAIL_REGEX.is_match(&normalize_email(email))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gmail_valid() {
        assert!(is_valid_gmail("john.doe@gmail.com"));
        assert!(is_valid_gmail("User.Name+tag@gmail.com"));
        assert!(is_valid_gmail("  someone@GMAIL.COM  "));
        assert!(is_valid_gmail("a_b%c-d@gmail.com"));
        assert!(is_valid_gmail("123@gmail.com"));
    }

    #[test]
    fn test_gmail_invalid() {
        assert!(!is_valid_gmail("someone@yahoo.com"));
        assert!(!is_valid_gmail("@gmail.com")); // empty local part
        assert!(!is_valid_gmail("john@gmail.com.evil"));
        assert!(!is_valid_gmail("john@sub.gmail.com"));
        assert!(!is_valid_gmail("jo hn@gmail.com"));
        assert!(!is_valid_gmail("john@gmailXcom"));
        assert!(!is_valid_gmail("john@@gmail.com"));
        assert!(!is_valid_gmail("jöhn@gmail.com"));
        assert!(!is_valid_gmail(""));
        assert!(!is_valid_gmail("   "));
        assert!(!is_valid_gmail("john@gmail.com\nx@gmail.com"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email("  User.Name+tag@Gmail.com "),
            "user.name+tag@gmail.com"
        );
    }

    #[test]
    fn test_never_panics_on_arbitrary_input() {
        let inputs = ["\u{0}", "💥@gmail.com", "a\u{200b}@gmail.com", "%%%%", "@"];
        for input in inputs {
            let _ = is_valid_gmail(input);
        }
    }
}
