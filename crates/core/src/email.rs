//! Email normalization and shape checks.
//!
//! Email addresses are used as lookup keys (applicant index, user index), so
//! every address is normalized before it reaches a key builder.

/// Trims and lowercases an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks the `local@domain.tld` shape.
///
/// Exactly one `@`, a non-empty local part, and a domain with at least one dot
/// whose labels are non-empty. No whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}
