//! Peer record types.

/// Everything the full-sync dht tracks about one peer.
#[derive(
    Debug,
    Clone,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct PeerInfo {
    /// Where the peer can be reached.
    pub transport: String,

    /// Opaque application data associated with the peer.
    #[serde(with = "crate::serde_bytes_base64")]
    pub data: bytes::Bytes,

    /// Logical timestamp, greater values win when gossiped.
    pub ts: u64,
}

impl PeerInfo {
    /// Construct a new peer info.
    pub fn new(
        transport: impl Into<String>,
        data: impl Into<bytes::Bytes>,
        ts: u64,
    ) -> Self {
        Self {
            transport: transport.into(),
            data: data.into(),
            ts,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn peer_info_json() {
        let info = PeerInfo::new("wss://a.b:1", &b"hi"[..], 42);
        let enc = serde_json::to_string(&info).unwrap();
        assert_eq!(r#"{"transport":"wss://a.b:1","data":"aGk","ts":42}"#, enc);
        let dec: PeerInfo = serde_json::from_str(&enc).unwrap();
        assert_eq!(info, dec);
    }

    #[test]
    fn default_is_empty() {
        let info = PeerInfo::default();
        assert_eq!("", info.transport);
        assert!(info.data.is_empty());
        assert_eq!(0, info.ts);
    }
}
