//! Derived state used for cheap divergence detection.

use crate::protocol::LocHashMap;
use fullsync_api::*;
use std::collections::{BTreeMap, BTreeSet};

/// The digest of everything stored in one bucket.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocHash(pub [u8; 32]);

impl std::fmt::Debug for LocHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LocHash(")?;
        for b in &self.0[..4] {
            write!(f, "{b:02x}")?;
        }
        f.write_str("..)")
    }
}

/// Peer records of one bucket.
pub(crate) type PeerBucket = BTreeMap<PeerAddress, PeerInfo>;

/// Data hash sets of one bucket.
pub(crate) type DataBucket = BTreeMap<DataAddress, BTreeSet<DataHash>>;

/// Holds the values derived from the stores.
///
/// These are recomputed synchronously inside every mutating store call,
/// so a tick can never observe a store that has moved on without them.
#[derive(Debug, Default)]
pub(crate) struct StateHasher {
    /// All known peers, sorted. This is the round-robin gossip order.
    peer_list: Vec<PeerAddress>,

    /// One digest per non-empty bucket.
    loc_hashes: LocHashMap,
}

impl StateHasher {
    pub(crate) fn peer_list(&self) -> &[PeerAddress] {
        &self.peer_list
    }

    pub(crate) fn loc_hashes(&self) -> &LocHashMap {
        &self.loc_hashes
    }

    /// Recompute after a mutation of the records in `loc`.
    pub(crate) fn recompute(
        &mut self,
        loc: Loc,
        peers: &BTreeMap<Loc, PeerBucket>,
        data: &BTreeMap<Loc, DataBucket>,
    ) {
        let mut peer_list = peers
            .values()
            .flat_map(|b| b.keys().cloned())
            .collect::<Vec<_>>();
        peer_list.sort();
        self.peer_list = peer_list;

        let peer_bucket = peers.get(&loc).filter(|b| !b.is_empty());
        let data_bucket = data.get(&loc).filter(|b| !b.is_empty());

        if peer_bucket.is_none() && data_bucket.is_none() {
            self.loc_hashes.remove(&loc);
        } else {
            self.loc_hashes
                .insert(loc, canonical_hash(peer_bucket, data_bucket));
        }
    }
}

/// Hash a bucket in canonical form.
///
/// Maps and sets are walked in key order and every variable length
/// field is length-prefixed, so logically identical buckets always
/// produce the same digest.
fn canonical_hash(
    peers: Option<&PeerBucket>,
    data: Option<&DataBucket>,
) -> LocHash {
    use sha2::{Digest, Sha256};

    fn field(hasher: &mut Sha256, b: &[u8]) {
        hasher.update((b.len() as u64).to_le_bytes());
        hasher.update(b);
    }

    let mut hasher = Sha256::new();

    let peers = peers.map(|p| p.iter()).into_iter().flatten();
    hasher.update(b"peers");
    for (address, info) in peers {
        field(&mut hasher, address.as_bytes());
        field(&mut hasher, info.transport.as_bytes());
        field(&mut hasher, &info.data);
        hasher.update(info.ts.to_le_bytes());
    }

    let data = data.map(|d| d.iter()).into_iter().flatten();
    hasher.update(b"data");
    for (address, hashes) in data {
        field(&mut hasher, address.as_bytes());
        hasher.update((hashes.len() as u64).to_le_bytes());
        for hash in hashes {
            field(&mut hasher, hash);
        }
    }

    let mut out = [0_u8; 32];
    out.copy_from_slice(&hasher.finalize());
    LocHash(out)
}

#[cfg(test)]
mod test {
    use super::*;

    fn peer_bucket(list: &[(&str, u64)]) -> PeerBucket {
        list.iter()
            .map(|(a, ts)| {
                (PeerAddress::from(*a), PeerInfo::new("t", &b""[..], *ts))
            })
            .collect()
    }

    #[test]
    fn empty_bucket_has_no_hash() {
        let mut hasher = StateHasher::default();
        hasher.recompute(Loc(1), &BTreeMap::new(), &BTreeMap::new());
        assert!(hasher.loc_hashes().is_empty());
        assert!(hasher.peer_list().is_empty());
    }

    #[test]
    fn timestamp_changes_hash() {
        let a = canonical_hash(Some(&peer_bucket(&[("a", 1)])), None);
        let b = canonical_hash(Some(&peer_bucket(&[("a", 2)])), None);
        assert_ne!(a, b);
    }

    #[test]
    fn peer_vs_data_address_are_distinct() {
        let peers = peer_bucket(&[("a", 0)]);
        let mut data = DataBucket::new();
        data.insert(DataAddress::from("a"), BTreeSet::new());
        assert_ne!(
            canonical_hash(Some(&peers), None),
            canonical_hash(None, Some(&data))
        );
    }

    #[test]
    fn peer_list_is_sorted_across_buckets() {
        let mut peers = BTreeMap::new();
        for a in ["zz", "b", "a", "m"] {
            let a = PeerAddress::from(a);
            peers
                .entry(a.loc())
                .or_insert_with(PeerBucket::new)
                .insert(a, PeerInfo::default());
        }

        let mut hasher = StateHasher::default();
        hasher.recompute(Loc(0), &peers, &BTreeMap::new());
        assert_eq!(
            vec!["a", "b", "m", "zz"],
            hasher
                .peer_list()
                .iter()
                .map(|p| p.to_string())
                .collect::<Vec<_>>()
        );
    }
}
