//! Input normalization for phone numbers and MAC addresses

/// Number of hex digits in a MAC address
const MAC_HEX_DIGITS: usize = 12;

/// Canonical `AA:BB:CC:DD:EE:FF` length
pub const MAC_ADDRESS_LEN: usize = 17;

/// Normalize a phone number to `<prefix><digits>`.
///
/// Only digits and `+` survive. A value already carrying the prefix keeps it;
/// otherwise a single leading `0` is dropped and the prefix is prepended.
/// The result is cut to `max_len`, never shorter than the prefix itself.
pub fn normalize_phone(raw: &str, prefix: &str, max_len: usize) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect();

    let body: String = match cleaned.strip_prefix(prefix) {
        Some(rest) => rest.chars().filter(char::is_ascii_digit).collect(),
        None => {
            let digits: String = cleaned.chars().filter(char::is_ascii_digit).collect();
            match digits.strip_prefix('0') {
                Some(rest) => rest.to_string(),
                None => digits,
            }
        }
    };

    let mut phone = format!("{prefix}{body}");
    phone.truncate(max_len.max(prefix.len()));
    phone
}

/// Normalize a MAC address to uppercase hex pairs separated by colons.
///
/// Partial input stays partial (`"a1b"` becomes `"A1:B"`), so the field can be
/// normalized on every keystroke.
pub fn normalize_mac(raw: &str) -> String {
    let hex: Vec<char> = raw
        .chars()
        .filter(char::is_ascii_hexdigit)
        .map(|c| c.to_ascii_uppercase())
        .take(MAC_HEX_DIGITS)
        .collect();

    let mut mac = String::with_capacity(MAC_ADDRESS_LEN);
    for (i, pair) in hex.chunks(2).enumerate() {
        if i > 0 {
            mac.push(':');
        }
        mac.extend(pair);
    }
    mac
}
