//! Reversible base-62 codec between record ids and short codes.
//!
//! Digits are emitted least-significant first and never padded, so `1` encodes
//! to `"1"`, `62` to `"01"` and `3844` to `"001"`. This digit order is part of
//! the contract with every code already handed out and must not change.

use thiserror::Error;

/// Ordered 62-character alphabet: digits, lowercase, uppercase.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Numeric base of the encoding.
pub const BASE: u64 = ALPHABET.len() as u64;

/// Longest code that can describe a `u64`.
const MAX_CODE_LEN: usize = 11;

/// Errors produced while decoding a short code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter { character: char, position: usize },

    #[error("short code is empty")]
    Empty,

    #[error("short code '{0}' exceeds the identifier range")]
    Overflow(String),
}

/// Encodes a non-negative identifier as a short code.
///
/// # Examples
///
/// ```
/// use shorturl::domain::codec::encode;
///
/// assert_eq!(encode(0), "0");
/// assert_eq!(encode(61), "Z");
/// assert_eq!(encode(62), "01");
/// ```
pub fn encode(id: u64) -> String {
    if id == 0 {
        return (ALPHABET[0] as char).to_string();
    }

    let mut code = String::with_capacity(MAX_CODE_LEN);
    let mut rest = id;
    while rest > 0 {
        code.push(ALPHABET[(rest % BASE) as usize] as char);
        rest /= BASE;
    }

    code
}

/// Decodes a short code back into its identifier.
///
/// Position `i` (counted from the start of the string) carries weight `62^i`.
///
/// # Errors
///
/// - [`CodecError::InvalidCharacter`] for the first character outside [`ALPHABET`]
/// - [`CodecError::Empty`] for an empty string
/// - [`CodecError::Overflow`] when the value does not fit in `u64`
pub fn decode(code: &str) -> Result<u64, CodecError> {
    if code.is_empty() {
        return Err(CodecError::Empty);
    }

    let mut id: u64 = 0;
    let mut weight: Option<u64> = Some(1);

    for (position, character) in code.chars().enumerate() {
        let index = digit_value(character)
            .ok_or(CodecError::InvalidCharacter {
                character,
                position,
            })?;

        if index != 0 {
            let term = weight
                .and_then(|w| w.checked_mul(index))
                .ok_or_else(|| CodecError::Overflow(code.to_string()))?;
            id = id
                .checked_add(term)
                .ok_or_else(|| CodecError::Overflow(code.to_string()))?;
        }

        weight = weight.and_then(|w| w.checked_mul(BASE));
    }

    Ok(id)
}

/// Returns true if `code` is exactly what [`encode`] produces for its value.
///
/// Trailing `'0'` characters are most-significant zero digits: `"10"` decodes
/// to the same id as `"1"` but is not canonical.
pub fn is_canonical(code: &str) -> bool {
    match decode(code) {
        Ok(id) => encode(id) == code,
        Err(_) => false,
    }
}

fn digit_value(character: char) -> Option<u64> {
    match character {
        '0'..='9' => Some(character as u64 - '0' as u64),
        'a'..='z' => Some(character as u64 - 'a' as u64 + 10),
        'A'..='Z' => Some(character as u64 - 'A' as u64 + 36),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_zero() {
        assert_eq!(encode(0), "0");
    }

    #[test]
    fn test_encode_single_digits() {
        assert_eq!(encode(1), "1");
        assert_eq!(encode(10), "a");
        assert_eq!(encode(36), "A");
        assert_eq!(encode(61), "Z");
    }

    #[test]
    fn test_encode_is_least_significant_first() {
        assert_eq!(encode(62), "01");
        assert_eq!(encode(63), "11");
        assert_eq!(encode(3844), "001");
        // 125 = 2 * 62 + 1
        assert_eq!(encode(125), "12");
    }

    #[test]
    fn test_decode_known_values() {
        assert_eq!(decode("0").unwrap(), 0);
        assert_eq!(decode("Z").unwrap(), 61);
        assert_eq!(decode("01").unwrap(), 62);
        assert_eq!(decode("12").unwrap(), 125);
    }

    #[test]
    fn test_round_trip() {
        let ids = [
            0,
            1,
            61,
            62,
            12_345,
            987_654_321,
            i64::MAX as u64,
            u64::MAX - 1,
            u64::MAX,
        ];

        for id in ids {
            assert_eq!(decode(&encode(id)).unwrap(), id, "round trip for {id}");
        }
    }

    #[test]
    fn test_round_trip_dense_range() {
        for id in 0..10_000u64 {
            assert_eq!(decode(&encode(id)).unwrap(), id);
        }
    }

    #[test]
    fn test_encode_is_injective_on_range() {
        let mut seen = std::collections::HashSet::new();
        for id in 0..5_000u64 {
            assert!(seen.insert(encode(id)), "duplicate code for {id}");
        }
    }

    #[test]
    fn test_encoded_characters_are_in_alphabet() {
        for id in [1u64, 999, 1 << 40, u64::MAX] {
            assert!(encode(id).bytes().all(|b| ALPHABET.contains(&b)));
        }
    }

    #[test]
    fn test_max_code_length() {
        assert_eq!(encode(u64::MAX).len(), MAX_CODE_LEN);
    }

    #[test]
    fn test_decode_invalid_character_identifies_offender() {
        let err = decode("a#b!").unwrap_err();
        assert_eq!(
            err,
            CodecError::InvalidCharacter {
                character: '#',
                position: 1
            }
        );
    }

    #[test]
    fn test_decode_dollar_signs() {
        assert!(matches!(
            decode("$$$"),
            Err(CodecError::InvalidCharacter { character: '$', position: 0 })
        ));
    }

    #[test]
    fn test_decode_rejects_non_ascii() {
        assert!(matches!(
            decode("abç"),
            Err(CodecError::InvalidCharacter { character: 'ç', .. })
        ));
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decode(""), Err(CodecError::Empty));
    }

    #[test]
    fn test_decode_overflow() {
        // One digit past the longest u64 code.
        assert!(matches!(decode("ZZZZZZZZZZZZ"), Err(CodecError::Overflow(_))));
        assert!(matches!(decode("ZZZZZZZZZZZ"), Err(CodecError::Overflow(_))));
    }

    #[test]
    fn test_decode_trailing_zeros_are_tolerated() {
        // Most-significant zero digits do not change the value.
        assert_eq!(decode("10").unwrap(), 1);
        assert_eq!(decode("1000000000000000").unwrap(), 1);
    }

    #[test]
    fn test_is_canonical() {
        assert!(is_canonical("0"));
        assert!(is_canonical("1"));
        assert!(is_canonical("01"));
        assert!(!is_canonical("10"));
        assert!(!is_canonical("00"));
        assert!(!is_canonical("$$$"));
        assert!(!is_canonical(""));
    }

    #[test]
    fn test_canonical_round_trip() {
        for id in [0u64, 5, 62, 3843, 3844, 1_000_000] {
            let code = encode(id);
            assert!(is_canonical(&code));
            assert_eq!(encode(decode(&code).unwrap()), code);
        }
    }
}
