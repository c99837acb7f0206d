//! Coarse 256-way location buckets.
//!
//! A bucket only batches records together so that two nodes can compare
//! a handful of short digests instead of their full content. It is not a
//! storage partition, every node still stores every bucket.

/// A location bucket.
///
/// Renders as two lowercase hex digits, `00` through `ff`.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Loc(pub u8);

impl Loc {
    /// Parse a bucket from its two hex digit rendering.
    pub fn from_hex(s: &str) -> crate::FsResult<Self> {
        if s.len() != 2 {
            return Err(crate::FsError::other(format!(
                "invalid loc length: {s:?}"
            )));
        }
        u8::from_str_radix(s, 16).map(Loc).map_err(|e| {
            crate::FsError::other_src(format!("invalid loc: {s:?}"), e)
        })
    }
}

impl std::fmt::Display for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02x}", self.0)
    }
}

impl std::fmt::Debug for Loc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Loc({:02x})", self.0)
    }
}

impl From<u8> for Loc {
    fn from(b: u8) -> Self {
        Self(b)
    }
}

/// Get the bucket for an address.
///
/// Every utf8 byte of the address is xor-ed into a single byte.
pub fn loc_for(address: &str) -> Loc {
    Loc(address.bytes().fold(0_u8, |acc, b| acc ^ b))
}
