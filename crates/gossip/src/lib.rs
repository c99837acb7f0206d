#![deny(missing_docs)]

//! A full-replication gossip dht.
//!
//! Every node holds every peer record and every data hash. Nodes converge
//! by periodically comparing per-bucket digests with one peer at a time,
//! then exchanging only the records in buckets that differ.

mod config;
pub use config::*;

mod error;

mod fetch;

mod gossip;
pub use gossip::FullSync;

mod hasher;
pub use hasher::LocHash;

mod initiate;

pub mod protocol;

mod respond;

mod state;
pub use state::GossipExchangeState;

mod store;
