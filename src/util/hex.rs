//! # Hex Formatting Utilities
//!
//! Thin helpers over the `hex` crate used for frame dumps in logs and
//! tests.

/// Encode bytes to a lowercase hex string.
pub fn encode_hex(data: &[u8]) -> String {
    hex::encode(data)
}

/// Format bytes as uppercase, space-separated pairs for readable frame
/// dumps, e.g. `"F7 05 0F 50"`.
pub fn pretty_hex(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_lowercase() {
        assert_eq!(encode_hex(&[0xF7, 0x05]), "f705");
    }

    #[test]
    fn pretty_prints_spaced_pairs() {
        assert_eq!(pretty_hex(&[0xF7, 0x05, 0x0F]), "F7 05 0F");
        assert_eq!(pretty_hex(&[]), "");
    }
}
