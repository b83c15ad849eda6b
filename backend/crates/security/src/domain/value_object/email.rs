//! Email Value Object
//!
//! A syntactically valid email address as typed by the caller. The value is
//! kept verbatim; matching rules (case folding) belong to the credential store.

use kernel::error::app_error::{AppError, AppResult};

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

/// Maximum local part length (per RFC 5321)
const LOCAL_PART_MAX_LENGTH: usize = 64;

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    /// Validate an email address without normalizing it
    pub fn parse(email: impl Into<String>) -> AppResult<Self> {
        let email = email.into();

        if email.is_empty() || email.len() > EMAIL_MAX_LENGTH || !Self::is_valid_format(&email) {
            return Err(AppError::bad_request("Invalid email address"));
        }

        Ok(Self(email))
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        if local.is_empty() || local.len() > LOCAL_PART_MAX_LENGTH {
            return false;
        }
        if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
            return false;
        }
        if !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+/=?^_`{|}~.-".contains(c))
        {
            return false;
        }

        // Domain: dot-separated labels, TLD of two or more letters
        let labels: Vec<&str> = domain.split('.').collect();
        if labels.len() < 2 {
            return false;
        }
        let labels_ok = labels.iter().all(|label| {
            !label.is_empty()
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        });
        let tld_ok = labels
            .last()
            .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

        labels_ok && tld_ok
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_valid() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user.name@example.co.jp").is_ok());
        assert!(Email::parse("user+tag@example.com").is_ok());
        assert!(Email::parse("o'brien@mail-server.example.org").is_ok());
    }

    #[test]
    fn test_email_invalid() {
        assert!(Email::parse("").is_err());
        assert!(Email::parse("not-an-email").is_err());
        assert!(Email::parse("user@").is_err());
        assert!(Email::parse("@example.com").is_err());
        assert!(Email::parse("user@@example.com").is_err());
        assert!(Email::parse("user@example").is_err());
        assert!(Email::parse("user..name@example.com").is_err());
        assert!(Email::parse(" user@example.com").is_err());
        assert!(Email::parse("user@-example.com").is_err());
    }

    #[test]
    fn test_email_kept_verbatim() {
        let email = Email::parse("User@Example.COM").unwrap();
        assert_eq!(email.into_inner(), "User@Example.COM");
    }

    #[test]
    fn test_too_long() {
        let local = "a".repeat(65);
        assert!(Email::parse(format!("{local}@example.com")).is_err());
    }
}
