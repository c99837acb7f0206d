//! A glossary of terms used in the full-sync dht.
//!
//! ## Full-sync DHT
//! A DHT variant where every node eventually replicates all records, as opposed
//! to sharding the location space by key ownership. There are no arcs here,
//! every node covers everything.
//!
//! ## Loc
//! A one byte location derived from an address by XOR-folding its UTF-8 bytes.
//! See [loc_for](crate::loc_for).
//!
//! ## Bucket
//! All the peer records and data hashes whose addresses share a
//! [Loc](crate::Loc). Buckets are only used to batch records for cheap
//! divergence detection, they are not a storage partition.
//!
//! ## Loc hash
//! The digest of one bucket. Two nodes compare at most 256 short loc hashes to
//! find which buckets they disagree on, then only exchange the records in those
//! buckets.
//!
//! ## Aspect
//! One of potentially several content blobs held at a single
//! [DataAddress](crate::DataAddress), for example an entry and its metadata.
//! The engine only tracks the sha256 [DataHash](crate::DataHash) of each
//! aspect, the content itself is owned by the application.
//!
//! ## Last-writer-wins
//! Peer records learned through gossip replace the local record only if their
//! logical timestamp is strictly greater. Records asserted locally always
//! replace.
//!
//! ## Gossip exchange
//! One bounded pairwise conversation that converges two nodes' views. See [the
//! exchange docs](crate::doc::exchange).
