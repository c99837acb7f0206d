//! Bucketed peer and data stores.
//!
//! Both stores are owned by a single engine instance. Every mutation that
//! changes content recomputes the derived [StateHasher] values for the
//! touched bucket before returning.

use crate::hasher::{DataBucket, PeerBucket, StateHasher};
use crate::protocol::{DataHashList, LocHashMap, PeerTsList};
use bytes::Bytes;
use fullsync_api::*;
use std::collections::{BTreeMap, BTreeSet};

/// Decide whether an incoming peer record replaces what we hold.
///
/// Local assertions are trusted and win whenever anything differs.
/// Gossiped records only win when we hold nothing, or when they carry a
/// strictly greater timestamp.
pub(crate) fn should_replace(
    existing: Option<&PeerInfo>,
    incoming: &PeerInfo,
    trust_local: bool,
) -> bool {
    match existing {
        None => true,
        Some(existing) if trust_local => existing != incoming,
        Some(existing) => existing.ts < incoming.ts,
    }
}

/// The peer and data stores of one engine.
#[derive(Debug, Default)]
pub(crate) struct GossipStore {
    peers: BTreeMap<Loc, PeerBucket>,
    data: BTreeMap<Loc, DataBucket>,
    hasher: StateHasher,
}

impl GossipStore {
    fn peer_ref(&mut self, address: &PeerAddress) -> &mut PeerInfo {
        self.peers
            .entry(address.loc())
            .or_default()
            .entry(address.clone())
            .or_default()
    }

    fn data_ref(&mut self, address: &DataAddress) -> &mut BTreeSet<DataHash> {
        self.data
            .entry(address.loc())
            .or_default()
            .entry(address.clone())
            .or_default()
    }

    fn recompute(&mut self, loc: Loc) {
        self.hasher.recompute(loc, &self.peers, &self.data);
    }

    fn write_peer(
        &mut self,
        address: &PeerAddress,
        info: PeerInfo,
        trust_local: bool,
    ) -> bool {
        if !should_replace(self.get_peer(address), &info, trust_local) {
            return false;
        }

        *self.peer_ref(address) = info;
        self.recompute(address.loc());
        true
    }

    /// Apply a locally asserted peer record.
    ///
    /// Returns true if the store changed.
    pub(crate) fn upsert_peer_local(
        &mut self,
        address: &PeerAddress,
        info: PeerInfo,
    ) -> bool {
        self.write_peer(address, info, true)
    }

    /// Apply a peer record learned through gossip.
    ///
    /// Returns true if the store changed. Stale records are ignored.
    pub(crate) fn apply_gossiped_peer(
        &mut self,
        address: &PeerAddress,
        info: PeerInfo,
    ) -> bool {
        self.write_peer(address, info, false)
    }

    /// Get a peer record.
    pub(crate) fn get_peer(&self, address: &PeerAddress) -> Option<&PeerInfo> {
        self.peers.get(&address.loc())?.get(address)
    }

    /// Index one content blob at an address.
    ///
    /// Returns the new hash, or None if it was already known.
    pub(crate) fn add_data_hash(
        &mut self,
        address: &DataAddress,
        content: &[u8],
    ) -> Option<DataHash> {
        let hash = DataHash::of(content);
        if !self.data_ref(address).insert(hash.clone()) {
            return None;
        }
        self.recompute(address.loc());
        Some(hash)
    }

    /// Index content blobs at an address.
    ///
    /// Returns only the blobs that were not already known.
    pub(crate) fn add_data(
        &mut self,
        address: &DataAddress,
        content: Vec<Bytes>,
    ) -> Vec<Bytes> {
        content
            .into_iter()
            .filter(|c| self.add_data_hash(address, c).is_some())
            .collect()
    }

    /// True if any content is indexed at this address.
    pub(crate) fn has_data(&self, address: &DataAddress) -> bool {
        self.get_data(address).is_some_and(|s| !s.is_empty())
    }

    /// The content hashes indexed at an address.
    pub(crate) fn get_data(
        &self,
        address: &DataAddress,
    ) -> Option<&BTreeSet<DataHash>> {
        self.data.get(&address.loc())?.get(address)
    }

    /// All known peers, sorted.
    pub(crate) fn peer_list(&self) -> &[PeerAddress] {
        self.hasher.peer_list()
    }

    /// The digest of every non-empty bucket.
    pub(crate) fn loc_hashes(&self) -> &LocHashMap {
        self.hasher.loc_hashes()
    }

    /// Peer timestamps of every peer in the listed buckets.
    pub(crate) fn peer_ts_for(&self, locs: &[Loc]) -> PeerTsList {
        locs.iter()
            .filter_map(|loc| self.peers.get(loc))
            .flat_map(|b| b.iter().map(|(a, info)| (a.clone(), info.ts)))
            .collect()
    }

    /// Data hashes of every data address in the listed buckets.
    pub(crate) fn data_hashes_for(&self, locs: &[Loc]) -> DataHashList {
        locs.iter()
            .filter_map(|loc| self.data.get(loc))
            .flat_map(|b| {
                b.iter().map(|(a, hashes)| {
                    (a.clone(), hashes.iter().cloned().collect())
                })
            })
            .collect()
    }

    /// Peers from a remote listing that we don't hold, or hold an older
    /// record of.
    pub(crate) fn missing_peers(
        &self,
        remote: &PeerTsList,
    ) -> Vec<PeerAddress> {
        remote
            .iter()
            .filter(|(address, ts)| match self.get_peer(address) {
                None => true,
                Some(info) => info.ts < *ts,
            })
            .map(|(address, _)| address.clone())
            .collect()
    }

    /// Data addresses from a remote listing where at least one content
    /// hash is unknown to us.
    pub(crate) fn missing_data(
        &self,
        remote: &DataHashList,
    ) -> Vec<DataAddress> {
        remote
            .iter()
            .filter(|(address, hashes)| match self.get_data(address) {
                None => !hashes.is_empty(),
                Some(local) => hashes.iter().any(|h| !local.contains(h)),
            })
            .map(|(address, _)| address.clone())
            .collect()
    }
}
