//! Protocol definitions for the gossip module.
//!
//! Every gossip bundle is an [FsGossipMessage] envelope naming the message
//! type, wrapping one of the five inner messages. Associations (peer to
//! timestamp, data address to hash list, ...) are encoded as parallel
//! key/value arrays, which keeps the encoding compact and deterministic.

use crate::LocHash;
use bytes::{Bytes, BytesMut};
use fullsync_api::*;
use prost::Message;
use std::collections::BTreeMap;

pub(crate) mod proto {
    #![allow(missing_docs)]
    include!("../proto/gen/fullsync.gossip.rs");
}

pub use proto::{
    fs_gossip_message::GossipMessageType, DataList, FsFetchAddressListMessage,
    FsFetchAddressListRespMessage, FsGossipMessage, FsHashDiffMessage,
    FsHashDiffRespMessage, FsLocHashesMessage, HashList, PeerInfoMessage,
};

/// The size of one record in an encoded loc hash buffer.
const LOC_HASH_RECORD_LEN: usize = 1 + 32;

/// The size of a sha256 content hash.
const DATA_HASH_LEN: usize = 32;

/// Bucket digests keyed by bucket.
pub type LocHashMap = BTreeMap<Loc, LocHash>;

/// Peer addresses with their logical timestamps.
pub type PeerTsList = Vec<(PeerAddress, u64)>;

/// Data addresses with the content hashes known there.
pub type DataHashList = Vec<(DataAddress, Vec<DataHash>)>;

/// Peer addresses with full peer records.
pub type PeerInfoList = Vec<(PeerAddress, PeerInfo)>;

/// Data addresses with raw content blobs.
pub type DataContentList = Vec<(DataAddress, Vec<Bytes>)>;

/// A decoded gossip message.
#[derive(Debug, Clone, PartialEq)]
pub enum GossipMessage {
    /// Bucket digest announcement.
    LocHashes(FsLocHashesMessage),

    /// Reply to [GossipMessage::LocHashes].
    HashDiff(FsHashDiffMessage),

    /// Reply to the request list of a [GossipMessage::HashDiff].
    HashDiffResp(FsHashDiffRespMessage),

    /// Request full records.
    FetchAddressList(FsFetchAddressListMessage),

    /// Reply to [GossipMessage::FetchAddressList].
    FetchAddressListResp(FsFetchAddressListRespMessage),
}

impl GossipMessage {
    /// The exchange this message belongs to.
    pub fn msg_id(&self) -> MsgId {
        match self {
            GossipMessage::LocHashes(m) => m.msg_id.as_str().into(),
            GossipMessage::HashDiff(m) => m.msg_id.as_str().into(),
            GossipMessage::HashDiffResp(m) => m.msg_id.as_str().into(),
            GossipMessage::FetchAddressList(m) => m.msg_id.as_str().into(),
            GossipMessage::FetchAddressListResp(m) => m.msg_id.as_str().into(),
        }
    }

    /// The wire type tag of this message.
    pub fn msg_type(&self) -> GossipMessageType {
        match self {
            GossipMessage::LocHashes(_) => GossipMessageType::LocHashes,
            GossipMessage::HashDiff(_) => GossipMessageType::HashDiff,
            GossipMessage::HashDiffResp(_) => GossipMessageType::HashDiffResp,
            GossipMessage::FetchAddressList(_) => {
                GossipMessageType::FetchAddressList
            }
            GossipMessage::FetchAddressListResp(_) => {
                GossipMessageType::FetchAddressListResp
            }
        }
    }
}

/// Serialize a gossip message into a bundle.
pub fn serialize_gossip_message(value: GossipMessage) -> FsResult<Bytes> {
    let msg_type = value.msg_type();
    let data = match value {
        GossipMessage::LocHashes(m) => m.encode_to_vec(),
        GossipMessage::HashDiff(m) => m.encode_to_vec(),
        GossipMessage::HashDiffResp(m) => m.encode_to_vec(),
        GossipMessage::FetchAddressList(m) => m.encode_to_vec(),
        GossipMessage::FetchAddressListResp(m) => m.encode_to_vec(),
    };

    let mut out = BytesMut::new();
    FsGossipMessage {
        msg_type: msg_type.into(),
        data: data.into(),
    }
    .encode(&mut out)
    .map_err(|e| {
        FsError::other_src("Failed to serialize gossip message", e)
    })?;

    Ok(out.freeze())
}

/// Deserialize a gossip bundle.
pub fn deserialize_gossip_message(value: Bytes) -> FsResult<GossipMessage> {
    let outer = FsGossipMessage::decode(value).map_err(|e| {
        FsError::other_src("Failed to decode gossip envelope", e)
    })?;

    let msg_type = GossipMessageType::try_from(outer.msg_type).map_err(
        |_| {
            FsError::other(format!(
                "Unknown gossip message type: {}",
                outer.msg_type
            ))
        },
    )?;

    fn dec<M: Message + Default>(data: Bytes) -> FsResult<M> {
        M::decode(data).map_err(|e| {
            FsError::other_src("Failed to decode gossip message", e)
        })
    }

    Ok(match msg_type {
        GossipMessageType::Unspecified => {
            return Err(FsError::other("Unspecified gossip message type"));
        }
        GossipMessageType::LocHashes => {
            GossipMessage::LocHashes(dec(outer.data)?)
        }
        GossipMessageType::HashDiff => {
            GossipMessage::HashDiff(dec(outer.data)?)
        }
        GossipMessageType::HashDiffResp => {
            GossipMessage::HashDiffResp(dec(outer.data)?)
        }
        GossipMessageType::FetchAddressList => {
            GossipMessage::FetchAddressList(dec(outer.data)?)
        }
        GossipMessageType::FetchAddressListResp => {
            GossipMessage::FetchAddressListResp(dec(outer.data)?)
        }
    })
}

/// Encode bucket digests as repeating `(bucket byte, 32 digest bytes)`
/// records.
pub fn encode_loc_hashes(loc_hashes: &LocHashMap) -> Bytes {
    let mut out = BytesMut::with_capacity(
        loc_hashes.len() * LOC_HASH_RECORD_LEN,
    );
    for (loc, hash) in loc_hashes {
        out.extend_from_slice(&[loc.0]);
        out.extend_from_slice(&hash.0);
    }
    out.freeze()
}

/// Decode a buffer produced by [encode_loc_hashes].
pub fn decode_loc_hashes(data: &[u8]) -> FsResult<LocHashMap> {
    if data.len() % LOC_HASH_RECORD_LEN != 0 {
        return Err(FsError::other(format!(
            "loc hash buffer length {} is not a multiple of {}",
            data.len(),
            LOC_HASH_RECORD_LEN,
        )));
    }

    let mut out = LocHashMap::new();
    for record in data.chunks_exact(LOC_HASH_RECORD_LEN) {
        let mut hash = [0_u8; 32];
        hash.copy_from_slice(&record[1..]);
        out.insert(Loc(record[0]), LocHash(hash));
    }
    Ok(out)
}

fn check_parallel(what: &str, keys: usize, values: usize) -> FsResult<()> {
    if keys != values {
        return Err(FsError::other(format!(
            "{what}: {keys} keys but {values} values"
        )));
    }
    Ok(())
}

fn encode_peer_ts(list: PeerTsList) -> (Vec<String>, Vec<u64>) {
    list.into_iter().map(|(a, ts)| (a.to_string(), ts)).unzip()
}

fn decode_peer_ts(
    addresses: &[String],
    timestamps: &[u64],
) -> FsResult<PeerTsList> {
    check_parallel("peer timestamps", addresses.len(), timestamps.len())?;
    Ok(addresses
        .iter()
        .zip(timestamps.iter())
        .map(|(a, ts)| (PeerAddress::from(a.as_str()), *ts))
        .collect())
}

fn encode_data_hashes(list: DataHashList) -> (Vec<String>, Vec<HashList>) {
    list.into_iter()
        .map(|(a, hashes)| {
            (
                a.to_string(),
                HashList {
                    hashes: hashes.into_iter().map(|h| h.0).collect(),
                },
            )
        })
        .unzip()
}

fn decode_data_hashes(
    addresses: &[String],
    hash_lists: &[HashList],
) -> FsResult<DataHashList> {
    check_parallel("data hashes", addresses.len(), hash_lists.len())?;
    addresses
        .iter()
        .zip(hash_lists.iter())
        .map(|(a, l)| {
            let hashes = l
                .hashes
                .iter()
                .map(|h| {
                    if h.len() != DATA_HASH_LEN {
                        return Err(FsError::other(format!(
                            "bad data hash length {} for {a}",
                            h.len(),
                        )));
                    }
                    Ok(DataHash::from(h.clone()))
                })
                .collect::<FsResult<Vec<_>>>()?;
            Ok((DataAddress::from(a.as_str()), hashes))
        })
        .collect()
}

fn encode_locs(locs: &[Loc]) -> Bytes {
    locs.iter().map(|l| l.0).collect::<Vec<_>>().into()
}

fn decode_locs(data: &[u8]) -> Vec<Loc> {
    data.iter().copied().map(Loc).collect()
}

impl FsLocHashesMessage {
    /// Construct a new loc hashes message.
    pub fn new(msg_id: &MsgId, loc_hashes: &LocHashMap) -> Self {
        Self {
            msg_id: msg_id.to_string(),
            loc_hashes: encode_loc_hashes(loc_hashes),
        }
    }

    /// Decode the bucket digests.
    pub fn decode_loc_hashes(&self) -> FsResult<LocHashMap> {
        decode_loc_hashes(&self.loc_hashes)
    }
}

impl FsHashDiffMessage {
    /// Construct a new hash diff message.
    pub fn new(
        msg_id: &MsgId,
        peer_ts: PeerTsList,
        data_hashes: DataHashList,
        request_locs: &[Loc],
    ) -> Self {
        let (peer_addresses, peer_timestamps) = encode_peer_ts(peer_ts);
        let (data_addresses, data_hash_lists) =
            encode_data_hashes(data_hashes);
        Self {
            msg_id: msg_id.to_string(),
            peer_addresses,
            peer_timestamps,
            data_addresses,
            data_hash_lists,
            request_locs: encode_locs(request_locs),
        }
    }

    /// Decode the peer timestamp association.
    pub fn peer_ts(&self) -> FsResult<PeerTsList> {
        decode_peer_ts(&self.peer_addresses, &self.peer_timestamps)
    }

    /// Decode the data hash association.
    pub fn data_hashes(&self) -> FsResult<DataHashList> {
        decode_data_hashes(&self.data_addresses, &self.data_hash_lists)
    }

    /// Decode the buckets the sender wants us to describe.
    pub fn request_locs(&self) -> Vec<Loc> {
        decode_locs(&self.request_locs)
    }
}

impl FsHashDiffRespMessage {
    /// Construct a new hash diff response message.
    pub fn new(
        msg_id: &MsgId,
        peer_ts: PeerTsList,
        data_hashes: DataHashList,
    ) -> Self {
        let (peer_addresses, peer_timestamps) = encode_peer_ts(peer_ts);
        let (data_addresses, data_hash_lists) =
            encode_data_hashes(data_hashes);
        Self {
            msg_id: msg_id.to_string(),
            peer_addresses,
            peer_timestamps,
            data_addresses,
            data_hash_lists,
        }
    }

    /// Decode the peer timestamp association.
    pub fn peer_ts(&self) -> FsResult<PeerTsList> {
        decode_peer_ts(&self.peer_addresses, &self.peer_timestamps)
    }

    /// Decode the data hash association.
    pub fn data_hashes(&self) -> FsResult<DataHashList> {
        decode_data_hashes(&self.data_addresses, &self.data_hash_lists)
    }
}

impl FsFetchAddressListMessage {
    /// Construct a new fetch address list message.
    pub fn new(
        msg_id: &MsgId,
        peer_addresses: Vec<PeerAddress>,
        data_addresses: Vec<DataAddress>,
    ) -> Self {
        Self {
            msg_id: msg_id.to_string(),
            peer_addresses: peer_addresses
                .into_iter()
                .map(|a| a.to_string())
                .collect(),
            data_addresses: data_addresses
                .into_iter()
                .map(|a| a.to_string())
                .collect(),
        }
    }

    /// The requested peer addresses.
    pub fn peer_addresses(&self) -> Vec<PeerAddress> {
        self.peer_addresses
            .iter()
            .map(|a| PeerAddress::from(a.as_str()))
            .collect()
    }

    /// The requested data addresses.
    pub fn data_addresses(&self) -> Vec<DataAddress> {
        self.data_addresses
            .iter()
            .map(|a| DataAddress::from(a.as_str()))
            .collect()
    }
}

impl From<PeerInfo> for PeerInfoMessage {
    fn from(value: PeerInfo) -> Self {
        Self {
            transport: value.transport,
            data: value.data,
            ts: value.ts,
        }
    }
}

impl From<PeerInfoMessage> for PeerInfo {
    fn from(value: PeerInfoMessage) -> Self {
        Self {
            transport: value.transport,
            data: value.data,
            ts: value.ts,
        }
    }
}

impl FsFetchAddressListRespMessage {
    /// Construct a new fetch address list response message.
    pub fn new(
        msg_id: &MsgId,
        peers: PeerInfoList,
        data: DataContentList,
    ) -> Self {
        let (peer_addresses, peer_infos) = peers
            .into_iter()
            .map(|(a, info)| (a.to_string(), PeerInfoMessage::from(info)))
            .unzip();
        let (data_addresses, data_lists) = data
            .into_iter()
            .map(|(a, data)| (a.to_string(), DataList { data }))
            .unzip();
        Self {
            msg_id: msg_id.to_string(),
            peer_addresses,
            peer_infos,
            data_addresses,
            data_lists,
        }
    }

    /// Decode the peer record association.
    pub fn peers(&self) -> FsResult<PeerInfoList> {
        check_parallel(
            "peer infos",
            self.peer_addresses.len(),
            self.peer_infos.len(),
        )?;
        Ok(self
            .peer_addresses
            .iter()
            .zip(self.peer_infos.iter())
            .map(|(a, info)| {
                (PeerAddress::from(a.as_str()), PeerInfo::from(info.clone()))
            })
            .collect())
    }

    /// Decode the data content association.
    pub fn data(&self) -> FsResult<DataContentList> {
        check_parallel(
            "data lists",
            self.data_addresses.len(),
            self.data_lists.len(),
        )?;
        Ok(self
            .data_addresses
            .iter()
            .zip(self.data_lists.iter())
            .map(|(a, l)| (DataAddress::from(a.as_str()), l.data.clone()))
            .collect())
    }
}
