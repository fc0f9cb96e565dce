//! Email normalization and syntax checking.

use validator::ValidateEmail;

/// Minimum length of a top-level domain label.
const MIN_TLD_LENGTH: usize = 2;

/// Boolean syntax check over an already-normalized address.
pub trait EmailSyntaxChecker: Send + Sync {
    fn is_valid_email_syntax(&self, email: &str) -> bool;
}

/// Checker backed by the `validator` crate (HTML5 / RFC 5322 subset).
///
/// Additionally requires the domain to end in an alphabetic top-level domain,
/// so `user@localhost` and IP-literal domains are rejected, and rejects local
/// parts with empty dot-separated segments (`a..b`, `.a`, `a.`).
#[derive(Debug, Clone, Copy, Default)]
pub struct LibEmailChecker;

impl EmailSyntaxChecker for LibEmailChecker {
    fn is_valid_email_syntax(&self, email: &str) -> bool {
        email.validate_email() && has_dot_atom_local_part(email) && has_top_level_domain(email)
    }
}

fn has_dot_atom_local_part(email: &str) -> bool {
    let Some((local, _)) = email.rsplit_once('@') else {
        return false;
    };
    local.split('.').all(|segment| !segment.is_empty())
}

fn has_top_level_domain(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let Some((_, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    tld.starts_with("xn--")
        || (tld.chars().count() >= MIN_TLD_LENGTH && tld.chars().all(char::is_alphabetic))
}

/// Trim and lowercase an address.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
