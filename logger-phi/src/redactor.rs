use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();
    // Ten-digit subscriber numbers as the portal stores them (no separators).
    static ref PHONE_REGEX: Regex = Regex::new(r"\b\d{10}\b").unwrap();
    // Session tokens: `token=<opaque>` or `Bearer <opaque>` with 16+ chars.
    static ref TOKEN_REGEX: Regex =
        Regex::new(r"(?i)\b(token=|bearer\s+)[A-Za-z0-9._~+/=-]{16,}").unwrap();
}

/// Which identifying values get masked before a string is logged.
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_tokens: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_tokens: true,
        }
    }
}

/// PHI redactor for log messages.
///
/// Masking keeps a short, non-reversible prefix/suffix so operators can
/// still correlate lines about the same subject without seeing the value.
pub struct PhiRedactor {
    config: RedactionConfig,
}

impl PhiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self { config }
    }

    pub fn redact(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.redact_tokens {
            result = TOKEN_REGEX
                .replace_all(&result, "${1}[REDACTED]")
                .to_string();
        }

        if self.config.redact_emails {
            result = EMAIL_REGEX
                .replace_all(&result, |caps: &regex::Captures| {
                    let email = &caps[0];
                    let local = email.split('@').next().unwrap_or("");
                    let keep = local.len().min(3);
                    format!("{}***@***", &local[..keep])
                })
                .to_string();
        }

        if self.config.redact_phones {
            result = PHONE_REGEX
                .replace_all(&result, |caps: &regex::Captures| {
                    let digits = &caps[0];
                    format!("{}******{}", &digits[..2], &digits[8..])
                })
                .to_string();
        }

        result
    }
}

impl Default for PhiRedactor {
    fn default() -> Self {
        Self::new(RedactionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_email_local_part() {
        let r = PhiRedactor::default();
        let out = r.redact("login attempt for priya.sharma@example.com failed");
        assert!(!out.contains("priya.sharma@example.com"));
        assert!(out.contains("pri***@***"));
    }

    #[test]
    fn masks_ten_digit_phone() {
        let r = PhiRedactor::default();
        let out = r.redact("patient phone 9876543210 stored");
        assert!(!out.contains("9876543210"));
        assert!(out.contains("98******10"));
    }

    #[test]
    fn leaves_short_numbers_alone() {
        // OTPs are six digits and safe to log in validation errors.
        let r = PhiRedactor::default();
        assert_eq!(r.redact("otp 123456 rejected"), "otp 123456 rejected");
    }

    #[test]
    fn masks_session_tokens() {
        let r = PhiRedactor::default();
        let out = r.redact("upstream call with token=abcdef0123456789abcdef");
        assert!(!out.contains("abcdef0123456789abcdef"));
        assert!(out.contains("token=[REDACTED]"));
    }

    #[test]
    fn config_can_disable_categories() {
        let r = PhiRedactor::new(RedactionConfig {
            redact_emails: false,
            redact_phones: true,
            redact_tokens: true,
        });
        let out = r.redact("doc@example.com called 9876543210");
        assert!(out.contains("doc@example.com"));
        assert!(!out.contains("9876543210"));
    }
}
