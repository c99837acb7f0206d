//! Types dealing with addressing and content identity.

macro_rules! imp_deref {
    ($i:ty, $t:ty) => {
        impl std::ops::Deref for $i {
            type Target = $t;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

macro_rules! imp_from {
    ($a:ty, $b:ty, $i:ident => $e:expr) => {
        impl From<$b> for $a {
            fn from($i: $b) -> Self {
                $e
            }
        }
    };
}

macro_rules! imp_str_id {
    ($(#[$m:meta])* $i:ident) => {
        $(#[$m])*
        #[derive(
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            serde::Serialize,
            serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $i(pub std::sync::Arc<str>);

        imp_deref!($i, str);
        imp_from!($i, &str, s => $i(s.into()));
        imp_from!($i, String, s => $i(s.into_boxed_str().into()));

        impl std::fmt::Display for $i {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::fmt::Debug for $i {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($i), &self.0)
            }
        }

        impl $i {
            /// The bucket this address is grouped into.
            pub fn loc(&self) -> crate::Loc {
                crate::loc_for(&self.0)
            }
        }
    };
}

imp_str_id!(
    /// Identifies a peer tracked by the full-sync dht.
    PeerAddress
);

imp_str_id!(
    /// Identifies a data address. One address may hold several content
    /// blobs, e.g. an entry plus metadata aspects.
    DataAddress
);

/// Correlates the messages of one gossip exchange, or one data fetch
/// request with its response.
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct MsgId(pub std::sync::Arc<str>);

imp_deref!(MsgId, str);
imp_from!(MsgId, &str, s => MsgId(s.into()));
imp_from!(MsgId, String, s => MsgId(s.into_boxed_str().into()));

impl std::fmt::Display for MsgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Debug for MsgId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MsgId({})", &self.0)
    }
}

impl MsgId {
    /// Generate a new random message id.
    pub fn random() -> Self {
        use base64::prelude::*;
        use rand::RngCore;

        let mut id = [0_u8; 12];
        rand::thread_rng().fill_bytes(&mut id);
        Self::from(BASE64_URL_SAFE_NO_PAD.encode(id))
    }
}

/// The sha256 hash of one raw content blob.
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct DataHash(
    #[serde(with = "crate::serde_bytes_base64")] pub bytes::Bytes,
);

imp_deref!(DataHash, bytes::Bytes);
imp_from!(DataHash, bytes::Bytes, b => DataHash(b));

impl DataHash {
    /// Hash a content blob.
    pub fn of(content: &[u8]) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(content);
        Self(bytes::Bytes::from(hasher.finalize().to_vec()))
    }
}

impl std::fmt::Display for DataHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use base64::prelude::*;
        f.write_str(&BASE64_URL_SAFE_NO_PAD.encode(&self.0))
    }
}

impl std::fmt::Debug for DataHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DataHash({self})")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn data_hash_is_sha256() {
        let h = DataHash::of(b"hello");
        assert_eq!(32, h.len());
        assert_eq!(
            "LPJNul-wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ",
            h.to_string()
        );
    }

    #[test]
    fn data_hash_serde() {
        let h = DataHash::of(b"hello");
        let enc = serde_json::to_string(&h).unwrap();
        assert_eq!("\"LPJNul-wow4m6DsqxbninhsWHlwfp0JecwQzYpOLmCQ\"", enc);
        let dec: DataHash = serde_json::from_str(&enc).unwrap();
        assert_eq!(h, dec);
    }

    #[test]
    fn msg_ids_are_unique() {
        assert_ne!(MsgId::random(), MsgId::random());
    }

    #[test]
    fn address_display() {
        let a = PeerAddress::from("hkYYY");
        assert_eq!("hkYYY", a.to_string());
        assert_eq!("PeerAddress(hkYYY)", format!("{a:?}"));
    }
}
