//! How a gossip exchange proceeds.
//!
//! A node initiates at most one exchange at a time, picking peers round-robin
//! from its sorted peer list. Exchanges other nodes initiate are answered
//! without occupying that slot.
//!
//! ```text
//! initiator                               responder
//!     |  LocHashes(all bucket digests)        |
//!     |-------------------------------------->|
//!     |  HashDiff(records for buckets we lack |
//!     |    or differ on, buckets it wants)    |
//!     |<--------------------------------------|
//!     |  HashDiffResp(records for the         |
//!     |    buckets it asked about)            |
//!     |-------------------------------------->|
//!     |  FetchAddressList(missing addresses)  |
//!     |-------------------------------------->|
//!     |  FetchAddressListResp(full records)   |
//!     |<--------------------------------------|
//! ```
//!
//! Both sides may send a `FetchAddressList` for whatever they found missing, so
//! the responder also learns from the initiator during the same exchange.
//!
//! The exchange ends for the initiator when a `HashDiff` or `HashDiffResp`
//! shows nothing is missing, when the `FetchAddressListResp` arrives, or when
//! the exchange timeout elapses with no progress. Every response carries the
//! message id of the opening `LocHashes`, responses carrying any other id are
//! ignored.
