//! The event surface exchanged between the engine and its collaborators.
//!
//! Inbound events are delivered to the engine by the transport layer
//! (gossip bundles) or by the owning application (holds and fetch
//! responses). Outbound events are emitted by the engine and must be
//! handled by whichever of those layers they are addressed to.

use crate::*;
use bytes::Bytes;

/// Events delivered into the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FullSyncEvent {
    /// An encoded gossip message received from a remote peer.
    RemoteGossipBundle {
        /// The peer that sent the bundle.
        from: PeerAddress,

        /// The encoded gossip message.
        bundle: Bytes,
    },

    /// Assert a peer record. Local assertions are always trusted.
    PeerHoldRequest {
        /// The peer being asserted.
        peer_address: PeerAddress,

        /// The peer record.
        info: PeerInfo,
    },

    /// Hold content blobs at an address.
    DataHoldRequest {
        /// The address to hold content at.
        data_address: DataAddress,

        /// The raw content blobs.
        data: Vec<Bytes>,
    },

    /// The application's answer to a [FullSyncOutEvent::DataFetch].
    DataFetchResponse {
        /// The id of the fetch being answered.
        msg_id: MsgId,

        /// The raw content blobs stored at the fetched address.
        data: Vec<Bytes>,
    },
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum FullSyncOutEvent {
    /// Send an encoded gossip message to peers.
    GossipTo {
        /// The peers to deliver to.
        peer_list: Vec<PeerAddress>,

        /// The encoded gossip message.
        bundle: Bytes,
    },

    /// A peer record changed.
    PeerHoldRequest {
        /// The peer that changed.
        peer_address: PeerAddress,

        /// The new peer record.
        info: PeerInfo,
    },

    /// New content was indexed at an address, the application should
    /// store it. Only newly indexed blobs are included.
    DataHoldRequest {
        /// The address the content was indexed at.
        data_address: DataAddress,

        /// The newly indexed raw content blobs.
        data: Vec<Bytes>,
    },

    /// Ask the application for all content blobs stored at an address.
    /// Must be answered with a [FullSyncEvent::DataFetchResponse]
    /// carrying the same `msg_id`.
    DataFetch {
        /// Correlation id for the response.
        msg_id: MsgId,

        /// The address to fetch.
        data_address: DataAddress,
    },

    /// Reserved. The engine never prunes data.
    DataPrune {
        /// The address that would be pruned.
        data_address: DataAddress,
    },
}
