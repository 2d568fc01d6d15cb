//! Display-side masking of contact fields. Never used for identity
//! matching; the duplicate and churn lookups always read the raw values.

const MASK: &str = "****";

/// Mask the middle of a phone number, keeping the first five and last
/// four characters. Numbers shorter than nine characters pass through
/// unchanged since there is nothing left to hide.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 9 {
        return phone.to_string();
    }

    let prefix: String = chars[..5].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}{MASK}{suffix}")
}

/// Mask an email's local part past the first two characters. Addresses
/// with no `@` or a local part shorter than three characters pass through
/// unchanged.
pub fn mask_email(email: &str) -> String {
    let at = match email.chars().position(|c| c == '@') {
        Some(position) => position,
        None => return email.to_string(),
    };
    if at < 3 {
        return email.to_string();
    }

    let prefix: String = email.chars().take(2).collect();
    let domain: String = email.chars().skip(at).collect();
    format!("{prefix}{MASK}{domain}")
}
