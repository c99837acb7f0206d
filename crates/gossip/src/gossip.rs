use crate::error::FsGossipError;
use crate::protocol::{
    deserialize_gossip_message, serialize_gossip_message, GossipMessage,
    LocHashMap,
};
use crate::state::GossipExchangeState;
use crate::store::GossipStore;
use crate::{FullSyncGossipConfig, FullSyncGossipModConfig};
use bytes::Bytes;
use fullsync_api::config::Config;
use fullsync_api::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::sync::oneshot;

#[derive(Debug)]
pub(crate) struct DropAbortHandle {
    pub(crate) name: String,
    pub(crate) handle: tokio::task::AbortHandle,
}

impl Drop for DropAbortHandle {
    fn drop(&mut self) {
        tracing::info!("Aborting: {}", self.name);
        self.handle.abort();
    }
}

/// Requests the [FullSync] handle makes of the engine task.
pub(crate) enum Cmd {
    Event(FullSyncEvent),
    FetchDataLocal(
        DataAddress,
        oneshot::Sender<Option<oneshot::Receiver<Vec<Bytes>>>>,
    ),
    GetPeer(PeerAddress, oneshot::Sender<Option<PeerInfo>>),
    PeerList(oneshot::Sender<Vec<PeerAddress>>),
    LocHashes(oneshot::Sender<LocHashMap>),
    ExchangeState(oneshot::Sender<GossipExchangeState>),
}

/// A running full-sync gossip engine.
///
/// The engine itself lives in a single task which owns the peer and data
/// stores. This handle talks to it through a mailbox, so every mutation
/// is applied in the order it was published.
///
/// The engine stops when [FullSync::close] is called, when the last clone
/// of the handle is dropped, or when the outbound event receiver is
/// dropped. Any outstanding data fetches fail when it stops.
#[derive(Debug, Clone)]
pub struct FullSync {
    config: Arc<FullSyncGossipConfig>,
    this_peer: PeerAddress,
    cmd_tx: Sender<Cmd>,
    engine_task: Arc<DropAbortHandle>,
}

impl FullSync {
    /// Start an engine for `this_peer` using the module config found in
    /// `config`.
    pub fn from_config(
        config: &Config,
        this_peer: PeerAddress,
    ) -> FsResult<(Self, Receiver<FullSyncOutEvent>)> {
        let config: FullSyncGossipModConfig = config.get_module_config()?;
        Ok(Self::create(config.fullsync_gossip, this_peer))
    }

    /// Start an engine for `this_peer`.
    ///
    /// Returns the handle and the receiver of outbound events, which the
    /// caller must drain and deliver to the transport and application.
    pub fn create(
        config: FullSyncGossipConfig,
        this_peer: PeerAddress,
    ) -> (Self, Receiver<FullSyncOutEvent>) {
        let config = Arc::new(config);
        let (out_tx, out_rx) =
            tokio::sync::mpsc::channel(config.channel_capacity());
        let (cmd_tx, cmd_rx) =
            tokio::sync::mpsc::channel(config.channel_capacity());

        let engine =
            FullSyncEngine::new(config.clone(), this_peer.clone(), out_tx);
        let engine_task =
            tokio::task::spawn(run_engine(engine, cmd_rx)).abort_handle();

        (
            Self {
                config,
                this_peer,
                cmd_tx,
                engine_task: Arc::new(DropAbortHandle {
                    name: "FullSync engine task".to_string(),
                    handle: engine_task,
                }),
            },
            out_rx,
        )
    }

    /// The peer this engine runs as.
    pub fn this_peer(&self) -> &PeerAddress {
        &self.this_peer
    }

    /// Stop the engine.
    ///
    /// This affects every clone of the handle. Outstanding data fetches
    /// resolve with [FsError::Closed] and all later calls fail the same way.
    pub fn close(&self) {
        tracing::info!(this_peer = %self.this_peer, "Closing engine");
        self.engine_task.handle.abort();
    }

    pub(crate) fn config(&self) -> &FullSyncGossipConfig {
        &self.config
    }

    pub(crate) async fn cmd(&self, cmd: Cmd) -> FsResult<()> {
        self.cmd_tx
            .send(cmd)
            .await
            .map_err(|_| FsError::closed("engine mailbox"))
    }

    async fn query<T>(
        &self,
        ctx: &str,
        f: impl FnOnce(oneshot::Sender<T>) -> Cmd,
    ) -> FsResult<T> {
        let (tx, rx) = oneshot::channel();
        self.cmd(f(tx)).await?;
        rx.await.map_err(|_| FsError::closed(ctx))
    }

    /// Deliver an inbound event to the engine.
    pub async fn publish(&self, event: FullSyncEvent) -> FsResult<()> {
        self.cmd(Cmd::Event(event)).await
    }

    /// Get a peer record held locally.
    pub async fn get_peer_local(
        &self,
        peer_address: PeerAddress,
    ) -> FsResult<Option<PeerInfo>> {
        self.query("get_peer_local", |tx| Cmd::GetPeer(peer_address, tx))
            .await
    }

    /// All known peers, in gossip order.
    pub async fn peer_list(&self) -> FsResult<Vec<PeerAddress>> {
        self.query("peer_list", Cmd::PeerList).await
    }

    /// The current digest of every non-empty bucket.
    pub async fn loc_hashes(&self) -> FsResult<LocHashMap> {
        self.query("loc_hashes", Cmd::LocHashes).await
    }

    /// The current state of the exchange slot.
    pub async fn exchange_state(&self) -> FsResult<GossipExchangeState> {
        self.query("exchange_state", Cmd::ExchangeState).await
    }
}

async fn run_engine(mut engine: FullSyncEngine, mut cmd_rx: Receiver<Cmd>) {
    tracing::info!(this_peer = %engine.this_peer, "Starting engine task");

    let mut ticker = tokio::time::interval(engine.config.tick_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if engine.out_tx.is_closed() {
                    tracing::info!(
                        this_peer = %engine.this_peer,
                        "Outbound event receiver dropped"
                    );
                    break;
                }
                engine.tick(tokio::time::Instant::now());
            }
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => engine.handle_cmd(cmd),
                None => break,
            },
        }
    }

    tracing::info!(this_peer = %engine.this_peer, "Engine task stopped");
}

/// The engine state. Only ever touched from the engine task.
#[derive(Debug)]
pub(crate) struct FullSyncEngine {
    pub(crate) config: Arc<FullSyncGossipConfig>,
    pub(crate) this_peer: PeerAddress,
    pub(crate) store: GossipStore,
    pub(crate) state: GossipExchangeState,
    /// Next position in the sorted peer list to gossip with.
    pub(crate) rr_index: usize,
    /// Data fetches waiting on the application.
    pub(crate) pending_fetch: HashMap<MsgId, oneshot::Sender<Vec<Bytes>>>,
    pub(crate) out_tx: Sender<FullSyncOutEvent>,
}

impl FullSyncEngine {
    pub(crate) fn new(
        config: Arc<FullSyncGossipConfig>,
        this_peer: PeerAddress,
        out_tx: Sender<FullSyncOutEvent>,
    ) -> Self {
        Self {
            config,
            this_peer,
            store: GossipStore::default(),
            state: GossipExchangeState::Idle,
            rr_index: 0,
            pending_fetch: HashMap::new(),
            out_tx,
        }
    }

    fn handle_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::Event(event) => self.handle_event(event),
            Cmd::FetchDataLocal(data_address, resp) => {
                let _ = resp.send(self.fetch_data_local(&data_address));
            }
            Cmd::GetPeer(peer_address, resp) => {
                let _ = resp.send(self.store.get_peer(&peer_address).cloned());
            }
            Cmd::PeerList(resp) => {
                let _ = resp.send(self.store.peer_list().to_vec());
            }
            Cmd::LocHashes(resp) => {
                let _ = resp.send(self.store.loc_hashes().clone());
            }
            Cmd::ExchangeState(resp) => {
                let _ = resp.send(self.state.clone());
            }
        }
    }

    pub(crate) fn handle_event(&mut self, event: FullSyncEvent) {
        match event {
            FullSyncEvent::RemoteGossipBundle { from, bundle } => {
                self.handle_gossip_bundle(from, bundle);
            }
            FullSyncEvent::PeerHoldRequest { peer_address, info } => {
                if self.store.upsert_peer_local(&peer_address, info.clone()) {
                    self.emit(FullSyncOutEvent::PeerHoldRequest {
                        peer_address,
                        info,
                    });
                }
            }
            FullSyncEvent::DataHoldRequest { data_address, data } => {
                self.hold_data(data_address, data);
            }
            FullSyncEvent::DataFetchResponse { msg_id, data } => {
                self.resolve_data_fetch(msg_id, data);
            }
        }
    }

    fn handle_gossip_bundle(&mut self, from: PeerAddress, bundle: Bytes) {
        tracing::trace!("Incoming gossip bundle from {from}: {bundle:?}");

        let msg = match deserialize_gossip_message(bundle) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(
                    "Dropping undecodable gossip bundle from {from}: {e}"
                );
                return;
            }
        };

        match self.respond_to_msg(from.clone(), msg) {
            Ok(()) => (),
            Err(e @ FsGossipError::PeerBehaviorError { .. }) => {
                tracing::warn!("Peer behavior error from {from}: {e}");
            }
            Err(e) => {
                tracing::error!(
                    "could not respond to gossip message from {from}: {e}"
                );
            }
        }
    }

    /// Index content and notify the application of anything new.
    ///
    /// Local publishes and gossip-learned data both go through here.
    pub(crate) fn hold_data(
        &mut self,
        data_address: DataAddress,
        data: Vec<Bytes>,
    ) {
        let new_data = self.store.add_data(&data_address, data);
        if new_data.is_empty() {
            return;
        }

        tracing::debug!(
            "Holding {} new blobs at {data_address}",
            new_data.len()
        );
        self.emit(FullSyncOutEvent::DataHoldRequest {
            data_address,
            data: new_data,
        });
    }

    pub(crate) fn emit(&self, event: FullSyncOutEvent) -> bool {
        match self.out_tx.try_send(event) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("could not emit outbound event: {e}");
                false
            }
        }
    }

    pub(crate) fn send_gossip_message(
        &self,
        target: PeerAddress,
        msg: GossipMessage,
    ) -> FsResult<()> {
        tracing::debug!("Sending gossip message to {target}: {msg:?}");
        let bundle = serialize_gossip_message(msg)?;
        if !self.emit(FullSyncOutEvent::GossipTo {
            peer_list: vec![target],
            bundle,
        }) {
            return Err(FsError::other("outbound event channel unavailable"));
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use tokio::sync::mpsc::error::TryRecvError;

    pub(crate) fn test_engine(
        this_peer: &str,
    ) -> (FullSyncEngine, Receiver<FullSyncOutEvent>) {
        let (out_tx, out_rx) = tokio::sync::mpsc::channel(1024);
        (
            FullSyncEngine::new(
                Arc::new(FullSyncGossipConfig::default()),
                this_peer.into(),
                out_tx,
            ),
            out_rx,
        )
    }

    pub(crate) fn drain(
        rx: &mut Receiver<FullSyncOutEvent>,
    ) -> Vec<FullSyncOutEvent> {
        let mut out = Vec::new();
        loop {
            match rx.try_recv() {
                Ok(evt) => out.push(evt),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => {
                    return out
                }
            }
        }
    }

    #[test]
    fn peer_hold_is_echoed_once() {
        let (mut engine, mut rx) = test_engine("me");
        let info = PeerInfo::new("wss://p1", &b""[..], 1);

        for _ in 0..2 {
            engine.handle_event(FullSyncEvent::PeerHoldRequest {
                peer_address: "p1".into(),
                info: info.clone(),
            });
        }

        assert_eq!(
            vec![FullSyncOutEvent::PeerHoldRequest {
                peer_address: "p1".into(),
                info,
            }],
            drain(&mut rx)
        );
    }

    #[test]
    fn duplicate_data_notifies_once() {
        let (mut engine, mut rx) = test_engine("me");
        let hold = FullSyncEvent::DataHoldRequest {
            data_address: "d1".into(),
            data: vec![Bytes::from_static(b"hello")],
        };

        engine.handle_event(hold.clone());
        let loc_hashes = engine.store.loc_hashes().clone();
        engine.handle_event(hold);

        assert_eq!(&loc_hashes, engine.store.loc_hashes());
        assert_eq!(
            vec![FullSyncOutEvent::DataHoldRequest {
                data_address: "d1".into(),
                data: vec![Bytes::from_static(b"hello")],
            }],
            drain(&mut rx)
        );
    }

    #[test]
    fn garbage_bundle_is_dropped() {
        let (mut engine, mut rx) = test_engine("me");
        engine.handle_event(FullSyncEvent::RemoteGossipBundle {
            from: "p1".into(),
            bundle: Bytes::from_static(b"\x08\x2a"),
        });
        assert!(drain(&mut rx).is_empty());
        assert_eq!(GossipExchangeState::Idle, engine.state);
    }

    #[tokio::test]
    async fn handle_queries() {
        let (fs, _rx) = FullSync::create(Default::default(), "me".into());

        fs.publish(FullSyncEvent::PeerHoldRequest {
            peer_address: "p1".into(),
            info: PeerInfo::new("wss://p1", &b""[..], 3),
        })
        .await
        .unwrap();

        assert_eq!(
            Some(3),
            fs.get_peer_local("p1".into()).await.unwrap().map(|i| i.ts)
        );
        assert_eq!(None, fs.get_peer_local("p2".into()).await.unwrap());
        assert_eq!(
            vec![PeerAddress::from("p1")],
            fs.peer_list().await.unwrap()
        );
        assert_eq!(1, fs.loc_hashes().await.unwrap().len());
    }
}
