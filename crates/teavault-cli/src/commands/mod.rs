//! CLI subcommand implementations.

pub mod check;
pub mod predict;
pub mod selectors;

/// Decode a hex string, with or without a `0x` prefix.
pub(crate) fn decode_hex(input: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| format!("invalid hex '{input}': {e}").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_hex_prefixes() {
        assert_eq!(decode_hex("0x095ea7b3").unwrap(), vec![0x09, 0x5e, 0xa7, 0xb3]);
        assert_eq!(decode_hex("095ea7b3").unwrap(), vec![0x09, 0x5e, 0xa7, 0xb3]);
        assert!(decode_hex("").unwrap().is_empty());
        assert!(decode_hex("0xzz").is_err());
        assert!(decode_hex("0x123").is_err());
    }
}
