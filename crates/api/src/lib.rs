#![deny(missing_docs)]
//! Fullsync API contains the basic types shared between the full-sync
//! gossip engine and the collaborators that drive it: the transport
//! layer that moves gossip bundles between nodes and the application
//! layer that owns the actual content.
//!
//! If you want to run the engine itself, please see the fullsync_gossip crate.

pub(crate) mod serde_bytes_base64 {
    pub fn serialize<S>(
        b: &bytes::Bytes,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use base64::prelude::*;
        serializer.serialize_str(&BASE64_URL_SAFE_NO_PAD.encode(b))
    }

    pub fn deserialize<'de, D, T: From<bytes::Bytes>>(
        deserializer: D,
    ) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use base64::prelude::*;
        let s: std::borrow::Cow<'de, str> =
            serde::Deserialize::deserialize(deserializer)?;
        BASE64_URL_SAFE_NO_PAD
            .decode(s.as_bytes())
            .map(|v| bytes::Bytes::copy_from_slice(&v).into())
            .map_err(serde::de::Error::custom)
    }
}

pub mod config;

pub mod doc;

mod error;
pub use error::*;

pub mod event;
pub use event::*;

pub mod id;
pub use id::{DataAddress, DataHash, MsgId, PeerAddress};

pub mod loc;
pub use loc::*;

pub mod peer;
pub use peer::*;
