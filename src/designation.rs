//! Survey designation encoding and decoding.
//!
//! A designation is `<prefix><year><letters>`: an optional survey prefix, a
//! decimal year code, and a lower-case alphabetic suffix encoding the per-year
//! ordinal. The suffix is positional base-26 of `ordinal - 1` with digit
//! `a = 0`, left-padded with `a` to a configured minimum width. Once the
//! padded space is exhausted the suffix grows in width instead of wrapping, so
//! with a minimum width of 2: ordinal 1 is `aa`, 676 is `zz`, 677 is `baa`.
//!
//! [`DesignationScheme::decode`] is the exact inverse of
//! [`DesignationScheme::encode`] over everything encode can emit. Strings a
//! canonical encoder would never produce (wrong prefix, bad charset, padding
//! beyond the minimum width) are rejected rather than reinterpreted, which
//! keeps ordinal-to-string a bijection.

use std::num::NonZeroUsize;

/// Errors from designation encoding and decoding.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DesignationError {
    /// Ordinals are 1-based; 0 has no encoding.
    #[error("ordinal must be >= 1")]
    ZeroOrdinal,
    /// The string does not match the prefix/charset/width grammar.
    #[error("malformed designation {input:?}: {reason}")]
    Malformed {
        /// The offending input string.
        input: String,
        /// What the grammar check tripped on.
        reason: &'static str,
    },
}

/// Pure, stateless designation codec for one survey naming scheme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesignationScheme {
    prefix: String,
    min_width: NonZeroUsize,
}

/// Encode scratch size: a `u64` ordinal needs at most 14 base-26 digits.
/// Padding can make emitted suffixes longer; decode bounds values, not widths.
const MAX_SUFFIX_LEN: usize = 14;

impl DesignationScheme {
    /// Create a scheme with the given survey prefix (may be empty) and
    /// minimum suffix width.
    pub fn new(prefix: impl Into<String>, min_width: NonZeroUsize) -> Self {
        Self {
            prefix: prefix.into(),
            min_width,
        }
    }

    /// The survey prefix this scheme emits and expects.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Minimum alphabetic suffix width.
    pub fn min_width(&self) -> NonZeroUsize {
        self.min_width
    }

    /// Encode a `(year_code, ordinal)` pair into a designation string.
    ///
    /// Fails only for `ordinal == 0`; every ordinal in `1..=u64::MAX` has a
    /// unique encoding.
    pub fn encode(&self, year_code: u32, ordinal: u64) -> Result<String, DesignationError> {
        if ordinal == 0 {
            return Err(DesignationError::ZeroOrdinal);
        }

        // Least-significant digit first; rendered in reverse below.
        let mut n = ordinal - 1;
        let mut digits = [0u8; MAX_SUFFIX_LEN];
        let mut len = 0;
        loop {
            digits[len] = (n % 26) as u8;
            len += 1;
            n /= 26;
            if n == 0 {
                break;
            }
        }
        let width = len.max(self.min_width.get());

        let mut out = String::with_capacity(self.prefix.len() + 4 + width);
        out.push_str(&self.prefix);
        out.push_str(&year_code.to_string());
        for _ in len..width {
            out.push('a');
        }
        for i in (0..len).rev() {
            out.push((b'a' + digits[i]) as char);
        }
        Ok(out)
    }

    /// Decode a designation back into its `(year_code, ordinal)` pair.
    ///
    /// Exact inverse of [`encode`](Self::encode): for every valid pair,
    /// `decode(encode(y, n)) == (y, n)`. Non-canonical strings fail with
    /// [`DesignationError::Malformed`].
    pub fn decode(&self, s: &str) -> Result<(u32, u64), DesignationError> {
        let malformed = |reason: &'static str| DesignationError::Malformed {
            input: s.to_string(),
            reason,
        };

        let rest = s
            .strip_prefix(&self.prefix)
            .ok_or_else(|| malformed("missing survey prefix"))?;

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, letters) = rest.split_at(digits_end);

        if digits.is_empty() {
            return Err(malformed("missing year code"));
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(malformed("leading zero in year code"));
        }
        let year_code: u32 = digits
            .parse()
            .map_err(|_| malformed("year code out of range"))?;

        if letters.is_empty() {
            return Err(malformed("missing alphabetic suffix"));
        }
        if !letters.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(malformed("invalid character in suffix"));
        }
        if letters.len() < self.min_width.get() {
            return Err(malformed("suffix shorter than minimum width"));
        }
        if letters.len() > self.min_width.get() && letters.starts_with('a') {
            return Err(malformed("non-canonical padding"));
        }

        // Padded suffixes can be arbitrarily wide, so bound the value rather
        // than the width.
        let mut value: u128 = 0;
        for b in letters.bytes() {
            value = value
                .checked_mul(26)
                .and_then(|v| v.checked_add(u128::from(b - b'a')))
                .ok_or_else(|| malformed("ordinal overflow"))?;
        }
        let ordinal = value
            .checked_add(1)
            .filter(|&n| n <= u128::from(u64::MAX))
            .ok_or_else(|| malformed("ordinal overflow"))?;

        Ok((year_code, ordinal as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn bare(width: usize) -> DesignationScheme {
        DesignationScheme::new("", NonZeroUsize::new(width).unwrap())
    }

    #[test]
    fn encodes_first_ordinals_with_padding() {
        let s = bare(2);
        assert_eq!(s.encode(22, 1).unwrap(), "22aa");
        assert_eq!(s.encode(22, 2).unwrap(), "22ab");
        assert_eq!(s.encode(22, 26).unwrap(), "22az");
        assert_eq!(s.encode(22, 27).unwrap(), "22ba");
        assert_eq!(s.encode(22, 676).unwrap(), "22zz");
    }

    #[test]
    fn grows_width_instead_of_wrapping() {
        let s = bare(2);
        assert_eq!(s.encode(22, 677).unwrap(), "22baa");
        assert_eq!(s.encode(22, 677 + 26u64.pow(2)).unwrap(), "22caa");
    }

    #[test]
    fn survey_prefix_roundtrips() {
        let s = DesignationScheme::new("WNTR", NonZeroUsize::new(2).unwrap());
        let name = s.encode(22, 1).unwrap();
        assert_eq!(name, "WNTR22aa");
        assert_eq!(s.decode(&name).unwrap(), (22, 1));
    }

    #[test]
    fn zero_ordinal_is_rejected() {
        assert_eq!(bare(2).encode(22, 0), Err(DesignationError::ZeroOrdinal));
    }

    #[test]
    fn decode_rejects_bad_grammar() {
        let s = bare(2);
        for bad in [
            "aa",     // missing year code
            "22",     // missing suffix
            "22a",    // shorter than minimum width
            "22aaa",  // non-canonical padding
            "22aB",   // bad charset
            "022aa",  // leading zero in year
            "22a b",  // whitespace
            "X22aa",  // stray prefix
        ] {
            assert!(
                matches!(s.decode(bad), Err(DesignationError::Malformed { .. })),
                "expected {bad:?} to be rejected"
            );
        }

        let p = DesignationScheme::new("WNTR", NonZeroUsize::new(2).unwrap());
        assert!(matches!(
            p.decode("22aa"),
            Err(DesignationError::Malformed { .. })
        ));
    }

    #[test]
    fn decode_rejects_ordinal_overflow() {
        let s = bare(2);
        // 15 significant digits: value >= 26^14, past any u64 ordinal.
        let too_big = format!("22b{}", "a".repeat(super::MAX_SUFFIX_LEN));
        assert!(matches!(
            s.decode(&too_big),
            Err(DesignationError::Malformed { .. })
        ));
        // Absurdly wide input must error, not wrap or panic.
        let huge = format!("22z{}", "z".repeat(40));
        assert!(matches!(
            s.decode(&huge),
            Err(DesignationError::Malformed { .. })
        ));
    }

    #[test]
    fn wide_minimum_width_roundtrips() {
        // Padded suffixes wider than any u64 ordinal's digits are still
        // canonical output and must decode.
        let s = bare(15);
        let name = s.encode(22, 1).unwrap();
        assert_eq!(name, format!("22{}", "a".repeat(15)));
        assert_eq!(s.decode(&name).unwrap(), (22, 1));

        let s = bare(20);
        let name = s.encode(7, 12_345).unwrap();
        assert_eq!(s.decode(&name).unwrap(), (7, 12_345));
    }

    #[test]
    fn largest_ordinal_roundtrips() {
        let s = bare(2);
        let name = s.encode(99, u64::MAX).unwrap();
        assert_eq!(s.decode(&name).unwrap(), (99, u64::MAX));
    }

    proptest! {
        #[test]
        fn roundtrip_law(
            year in 0u32..10_000,
            ordinal in 1u64..=u64::MAX,
            width in 1usize..20,
        ) {
            let s = bare(width);
            let name = s.encode(year, ordinal).unwrap();
            prop_assert_eq!(s.decode(&name).unwrap(), (year, ordinal));
        }

        #[test]
        fn encoding_is_injective(
            year in 0u32..100,
            a in 1u64..100_000,
            b in 1u64..100_000,
        ) {
            let s = bare(2);
            let ea = s.encode(year, a).unwrap();
            let eb = s.encode(year, b).unwrap();
            prop_assert_eq!(a == b, ea == eb);
        }
    }
}
