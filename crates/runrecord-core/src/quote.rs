//! POSIX shell quoting for cast script actions
//!
//! Each `announce` and `run` action carries exactly one shell token, which
//! the replay player splits back out with ordinary shell-word rules.

/// Characters that never need quoting
fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c)
}

/// Quote `s` as a single shell word
///
/// Safe strings are returned unchanged; everything else is wrapped in single
/// quotes, with embedded single quotes written as `'"'"'`. Newlines and all
/// other characters stay literal inside the quotes.
pub fn quote(s: &str) -> String {
    if s.is_empty() {
        return "''".to_string();
    }
    if s.chars().all(is_safe) {
        return s.to_string();
    }
    format!("'{}'", s.replace('\'', "'\"'\"'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string() {
        assert_eq!(quote(""), "''");
    }

    #[test]
    fn test_safe_string_unchanged() {
        assert_eq!(quote("ls"), "ls");
        assert_eq!(quote("./run-me_now.sh"), "./run-me_now.sh");
    }

    #[test]
    fn test_spaces_quoted() {
        assert_eq!(quote("echo hi"), "'echo hi'");
    }

    #[test]
    fn test_single_quote_escaped() {
        assert_eq!(quote("it's"), "'it'\"'\"'s'");
    }

    #[test]
    fn test_newlines_stay_inside_token() {
        assert_eq!(quote("a\nb"), "'a\nb'");
    }
}
