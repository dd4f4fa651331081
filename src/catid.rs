//! Outline keys ("catid").
//!
//! A [`CatId`] is a 32-bit key written as 8 hex digits. Digit position `d`
//! (1 = most significant, 8 = least significant) holds the sibling rank chosen at
//! outline depth `d`; rank 0 means the depth is unused. Because deeper digits are
//! always zero for a node, sorting keys numerically reproduces document order.
//!
//! ```
//! use bibtoc::CatId;
//!
//! let key: CatId = "11000000".parse()?;
//! assert_eq!(key.rank_at(1), 1);
//! assert_eq!(key.rank_at(2), 1);
//! assert_eq!(key.depth(), 2);
//! assert_eq!(key.to_string(), "11000000");
//! # Ok::<(), bibtoc::BibError>(())
//! ```

use crate::error::{BibError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deepest outline level a key can encode.
pub const MAX_DEPTH: usize = 8;

/// Highest sibling rank a single depth can hold.
pub const MAX_RANK: u32 = 15;

/// A hierarchical outline key.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CatId(u32);

impl CatId {
    /// The empty key, before any section has been added.
    pub const ROOT: CatId = CatId(0);

    /// Wrap a raw key value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        CatId(value)
    }

    /// Raw key value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Bit offset of the digit for `depth` (1-based).
    const fn shift(depth: usize) -> u32 {
        4 * (MAX_DEPTH - depth) as u32
    }

    /// Sibling rank stored at `depth` (1-based).
    ///
    /// Returns 0 for depths outside 1..=8.
    #[must_use]
    pub const fn rank_at(self, depth: usize) -> u32 {
        if depth == 0 || depth > MAX_DEPTH {
            return 0;
        }
        (self.0 >> Self::shift(depth)) & 0xF
    }

    /// The key of the next sibling at `depth`: that digit is incremented and every
    /// deeper digit is cleared.
    ///
    /// # Errors
    ///
    /// Returns [`BibError::DepthOverflow`] if `depth` is outside 1..=8 and
    /// [`BibError::SiblingOverflow`] if the rank at `depth` is already 15.
    pub fn next_sibling(self, depth: usize) -> Result<CatId> {
        if depth == 0 || depth > MAX_DEPTH {
            return Err(BibError::DepthOverflow { depth });
        }
        let rank = self.rank_at(depth);
        if rank + 1 > MAX_RANK {
            return Err(BibError::SiblingOverflow { depth });
        }
        let unit = 1u32 << Self::shift(depth);
        let bumped = self.0 + unit;
        Ok(CatId(bumped - bumped % unit))
    }

    /// Number of `'0'` characters in the 8-digit hex form.
    ///
    /// This counts every zero digit, not only the trailing unused ones. The two agree
    /// as long as used ranks stay within 1..=15.
    #[must_use]
    pub fn zero_digit_count(self) -> usize {
        format!("{:08x}", self.0).matches('0').count()
    }

    /// Outline depth derived from [`zero_digit_count`](Self::zero_digit_count).
    #[must_use]
    pub fn depth(self) -> usize {
        MAX_DEPTH.saturating_sub(self.zero_digit_count())
    }
}

impl fmt::Display for CatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

impl fmt::LowerHex for CatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

impl From<u32> for CatId {
    fn from(value: u32) -> Self {
        CatId(value)
    }
}

impl From<CatId> for u32 {
    fn from(key: CatId) -> Self {
        key.0
    }
}

impl FromStr for CatId {
    type Err = BibError;

    /// Parse a hex key, with or without a leading `0x`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if digits.is_empty() || digits.len() > MAX_DEPTH {
            return Err(BibError::InvalidCatId(s.to_string()));
        }
        u32::from_str_radix(digits, 16)
            .map(CatId)
            .map_err(|_| BibError::InvalidCatId(s.to_string()))
    }
}
