//! An in-memory network of full-sync engines.
//!
//! The [Switchboard] plays both collaborators for every engine it creates:
//! it moves gossip bundles between engines the way a transport would, and
//! stores held content and answers data fetches the way an application
//! would.

use bytes::Bytes;
use fullsync_api::*;
use fullsync_gossip::{FullSync, FullSyncGossipConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc::Receiver;
use tokio::task::AbortHandle;

type Registry = Arc<Mutex<HashMap<PeerAddress, FullSync>>>;
type ContentStore = Arc<Mutex<HashMap<DataAddress, Vec<Bytes>>>>;

/// Connects full-sync engines with each other in memory.
#[derive(Debug, Clone)]
pub struct Switchboard {
    config: FullSyncGossipConfig,
    registry: Registry,
}

impl Switchboard {
    /// Create a switchboard whose engines all use `config`.
    pub fn new(config: FullSyncGossipConfig) -> Self {
        Self {
            config,
            registry: Default::default(),
        }
    }

    /// Start an engine for `address` and connect it to the switchboard.
    pub fn add_node(&self, address: impl Into<PeerAddress>) -> TestNode {
        let address = address.into();
        let (fs, out_rx) =
            FullSync::create(self.config.clone(), address.clone());
        let content = ContentStore::default();

        self.registry
            .lock()
            .unwrap()
            .insert(address.clone(), fs.clone());

        let route_abort_handle = tokio::task::spawn(route(
            address,
            out_rx,
            self.registry.clone(),
            content.clone(),
        ))
        .abort_handle();

        TestNode {
            fs,
            content,
            route_abort_handle,
        }
    }

    /// Stop delivering anything to or from `address`.
    ///
    /// The engine keeps running but behaves like an unreachable peer.
    pub fn disconnect(&self, address: &PeerAddress) {
        self.registry.lock().unwrap().remove(address);
    }
}

async fn route(
    this_peer: PeerAddress,
    mut out_rx: Receiver<FullSyncOutEvent>,
    registry: Registry,
    content: ContentStore,
) {
    let lookup =
        |peer: &PeerAddress| registry.lock().unwrap().get(peer).cloned();

    while let Some(event) = out_rx.recv().await {
        match event {
            FullSyncOutEvent::GossipTo { peer_list, bundle } => {
                if lookup(&this_peer).is_none() {
                    continue;
                }
                for target in peer_list {
                    let Some(fs) = lookup(&target) else {
                        tracing::debug!(
                            "Dropping gossip to unreachable {target}"
                        );
                        continue;
                    };
                    let _ = fs
                        .publish(FullSyncEvent::RemoteGossipBundle {
                            from: this_peer.clone(),
                            bundle: bundle.clone(),
                        })
                        .await;
                }
            }
            FullSyncOutEvent::DataFetch {
                msg_id,
                data_address,
            } => {
                let data = content
                    .lock()
                    .unwrap()
                    .get(&data_address)
                    .cloned()
                    .unwrap_or_default();
                if let Some(fs) = lookup(&this_peer) {
                    let _ = fs
                        .publish(FullSyncEvent::DataFetchResponse {
                            msg_id,
                            data,
                        })
                        .await;
                }
            }
            FullSyncOutEvent::DataHoldRequest { data_address, data } => {
                content
                    .lock()
                    .unwrap()
                    .entry(data_address)
                    .or_default()
                    .extend(data);
            }
            FullSyncOutEvent::PeerHoldRequest { peer_address, info } => {
                tracing::trace!(?info, "{this_peer} holds peer {peer_address}");
            }
            FullSyncOutEvent::DataPrune { data_address } => {
                content.lock().unwrap().remove(&data_address);
            }
        }
    }
}

/// One engine connected to a [Switchboard].
#[derive(Debug)]
pub struct TestNode {
    /// The engine handle.
    pub fs: FullSync,

    content: ContentStore,
    route_abort_handle: AbortHandle,
}

impl Drop for TestNode {
    fn drop(&mut self) {
        self.route_abort_handle.abort();
    }
}

impl TestNode {
    /// The address this node runs as.
    pub fn address(&self) -> &PeerAddress {
        self.fs.this_peer()
    }

    /// Assert a peer record for `peer` on this node.
    pub async fn hold_peer(&self, peer: &PeerAddress, ts: u64) {
        self.fs
            .publish(FullSyncEvent::PeerHoldRequest {
                peer_address: peer.clone(),
                info: PeerInfo::new(format!("mem://{peer}"), Bytes::new(), ts),
            })
            .await
            .unwrap();
    }

    /// Publish content on this node.
    pub async fn hold_data(
        &self,
        data_address: &DataAddress,
        data: Vec<Bytes>,
    ) {
        self.fs
            .publish(FullSyncEvent::DataHoldRequest {
                data_address: data_address.clone(),
                data,
            })
            .await
            .unwrap();
    }

    /// The content the engine has told this node to store.
    pub fn stored(&self, data_address: &DataAddress) -> Option<Vec<Bytes>> {
        self.content.lock().unwrap().get(data_address).cloned()
    }

    /// Wait until content at `data_address` can be fetched from this node.
    pub async fn wait_for_data(
        &self,
        data_address: &DataAddress,
        timeout: Duration,
    ) -> Vec<Bytes> {
        tokio::time::timeout(timeout, async {
            loop {
                if let Some(data) = self
                    .fs
                    .fetch_data_local(data_address.clone())
                    .await
                    .unwrap()
                {
                    return data;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Timed out waiting for data")
    }

    /// Wait until this node and `other` agree on every bucket.
    pub async fn wait_for_sync_with(&self, other: &Self, timeout: Duration) {
        tokio::time::timeout(timeout, async {
            loop {
                let ours = self.fs.loc_hashes().await.unwrap();
                let theirs = other.fs.loc_hashes().await.unwrap();
                if ours == theirs {
                    return;
                }
                tracing::info!(
                    "{} has {} buckets, {} has {}",
                    self.address(),
                    ours.len(),
                    other.address(),
                    theirs.len(),
                );
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("Timed out waiting for sync")
    }
}
