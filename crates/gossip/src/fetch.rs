//! The data fetch round trip.
//!
//! The engine only indexes content hashes. When content is needed, the
//! engine asks the application for it with a [FullSyncOutEvent::DataFetch]
//! and parks a oneshot sender keyed by the fetch's [MsgId] until the
//! matching [FullSyncEvent::DataFetchResponse] arrives.

use crate::gossip::{Cmd, FullSync, FullSyncEngine};
use bytes::Bytes;
use fullsync_api::*;
use tokio::sync::oneshot;

/// How often [FullSync::fetch_peer] re-checks the local store.
const FETCH_PEER_POLL_INTERVAL: std::time::Duration =
    std::time::Duration::from_millis(10);

impl FullSync {
    /// Fetch the content held locally at `data_address`.
    ///
    /// Resolves to `None` immediately if no content is indexed at the
    /// address. Otherwise the application is asked for the content and
    /// this resolves once it answers. Fails if the engine is closed before
    /// the application answers.
    pub async fn fetch_data_local(
        &self,
        data_address: DataAddress,
    ) -> FsResult<Option<Vec<Bytes>>> {
        let (tx, rx) = oneshot::channel();
        self.cmd(Cmd::FetchDataLocal(data_address.clone(), tx))
            .await?;

        let Some(data_rx) = rx
            .await
            .map_err(|_| FsError::closed("fetch_data_local"))?
        else {
            return Ok(None);
        };

        data_rx.await.map(Some).map_err(|_| {
            FsError::closed(format!("fetch_data_local {data_address}"))
        })
    }

    /// Wait for a peer record to become known locally.
    ///
    /// Resolves to `None` if the record has not arrived by the time the
    /// configured `fetchPeerTimeoutMs` elapses.
    pub async fn fetch_peer(
        &self,
        peer_address: PeerAddress,
    ) -> FsResult<Option<PeerInfo>> {
        let poll = async {
            loop {
                if let Some(info) =
                    self.get_peer_local(peer_address.clone()).await?
                {
                    return FsResult::Ok(info);
                }
                tokio::time::sleep(FETCH_PEER_POLL_INTERVAL).await;
            }
        };

        match tokio::time::timeout(self.config().fetch_peer_timeout(), poll)
            .await
        {
            Ok(r) => r.map(Some),
            Err(_) => {
                tracing::debug!("Timed out waiting for peer {peer_address}");
                Ok(None)
            }
        }
    }
}

impl FullSyncEngine {
    pub(crate) fn fetch_data_local(
        &mut self,
        data_address: &DataAddress,
    ) -> Option<oneshot::Receiver<Vec<Bytes>>> {
        if !self.store.has_data(data_address) {
            return None;
        }

        Some(self.register_data_fetch(data_address))
    }

    /// Ask the application for the content at `data_address`.
    ///
    /// If the request cannot be emitted the pending entry is dropped
    /// straight away, so the receiver fails rather than waiting forever.
    pub(crate) fn register_data_fetch(
        &mut self,
        data_address: &DataAddress,
    ) -> oneshot::Receiver<Vec<Bytes>> {
        let msg_id = MsgId::random();
        let (tx, rx) = oneshot::channel();
        self.pending_fetch.insert(msg_id.clone(), tx);

        if !self.emit(FullSyncOutEvent::DataFetch {
            msg_id: msg_id.clone(),
            data_address: data_address.clone(),
        }) {
            self.pending_fetch.remove(&msg_id);
        }

        rx
    }

    pub(crate) fn resolve_data_fetch(
        &mut self,
        msg_id: MsgId,
        data: Vec<Bytes>,
    ) {
        match self.pending_fetch.remove(&msg_id) {
            Some(tx) => {
                if tx.send(data).is_err() {
                    tracing::debug!("Data fetch {msg_id} no longer awaited");
                }
            }
            None => {
                tracing::debug!(
                    "Ignoring response to unknown data fetch {msg_id}"
                );
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gossip::test::{drain, test_engine};
    use crate::FullSyncGossipConfig;
    use std::time::Duration;

    #[test]
    fn fetch_unknown_address_is_none() {
        let (mut engine, mut rx) = test_engine("me");
        assert!(engine.fetch_data_local(&"d1".into()).is_none());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn fetch_resolves_with_response() {
        let (mut engine, mut rx) = test_engine("me");
        engine.hold_data("d1".into(), vec![Bytes::from_static(b"hello")]);
        drain(&mut rx);

        let data_rx = engine.fetch_data_local(&"d1".into()).unwrap();

        let msg_id = match drain(&mut rx).as_slice() {
            [FullSyncOutEvent::DataFetch {
                msg_id,
                data_address,
            }] => {
                assert_eq!("d1", &**data_address);
                msg_id.clone()
            }
            other => panic!("unexpected events: {other:?}"),
        };

        // unknown ids are ignored
        engine.resolve_data_fetch("nope".into(), vec![]);
        engine.resolve_data_fetch(msg_id, vec![Bytes::from_static(b"hello")]);

        assert_eq!(vec![Bytes::from_static(b"hello")], data_rx.await.unwrap());
        assert!(engine.pending_fetch.is_empty());
    }

    #[tokio::test]
    async fn fetch_fails_when_out_channel_closed() {
        let (mut engine, rx) = test_engine("me");
        engine.store.add_data(
            &"d1".into(),
            vec![Bytes::from_static(b"hello")],
        );
        drop(rx);

        let data_rx = engine.fetch_data_local(&"d1".into()).unwrap();
        assert!(engine.pending_fetch.is_empty());
        assert!(data_rx.await.is_err());
    }

    #[tokio::test]
    async fn handle_fetch_round_trip() {
        let (fs, mut out_rx) =
            FullSync::create(FullSyncGossipConfig::default(), "me".into());

        assert_eq!(None, fs.fetch_data_local("d1".into()).await.unwrap());

        fs.publish(FullSyncEvent::DataHoldRequest {
            data_address: "d1".into(),
            data: vec![Bytes::from_static(b"hello")],
        })
        .await
        .unwrap();

        let fetch = tokio::task::spawn({
            let fs = fs.clone();
            async move { fs.fetch_data_local("d1".into()).await }
        });

        loop {
            match out_rx.recv().await.unwrap() {
                FullSyncOutEvent::DataFetch { msg_id, .. } => {
                    fs.publish(FullSyncEvent::DataFetchResponse {
                        msg_id,
                        data: vec![Bytes::from_static(b"hello")],
                    })
                    .await
                    .unwrap();
                    break;
                }
                _ => continue,
            }
        }

        assert_eq!(
            Some(vec![Bytes::from_static(b"hello")]),
            fetch.await.unwrap().unwrap()
        );
    }

    /// Start a fetch of "d1" from a cloned handle and wait until the
    /// application has been asked for the content.
    async fn pending_fetch(
        fs: &FullSync,
        out_rx: &mut tokio::sync::mpsc::Receiver<FullSyncOutEvent>,
    ) -> tokio::task::JoinHandle<FsResult<Option<Vec<Bytes>>>> {
        fs.publish(FullSyncEvent::DataHoldRequest {
            data_address: "d1".into(),
            data: vec![Bytes::from_static(b"hello")],
        })
        .await
        .unwrap();

        let fetch = tokio::task::spawn({
            let fs = fs.clone();
            async move { fs.fetch_data_local("d1".into()).await }
        });

        loop {
            if let FullSyncOutEvent::DataFetch { .. } =
                out_rx.recv().await.unwrap()
            {
                return fetch;
            }
        }
    }

    #[tokio::test]
    async fn close_rejects_outstanding_fetch() {
        let (fs, mut out_rx) =
            FullSync::create(FullSyncGossipConfig::default(), "me".into());
        let fetch = pending_fetch(&fs, &mut out_rx).await;

        fs.close();

        let res = tokio::time::timeout(Duration::from_secs(1), fetch)
            .await
            .expect("fetch still pending after close")
            .unwrap();
        assert!(matches!(res, Err(FsError::Closed { .. })));
        assert!(fs.peer_list().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn dropped_owner_and_receiver_reject_outstanding_fetch() {
        let (fs, mut out_rx) =
            FullSync::create(FullSyncGossipConfig::default(), "me".into());
        let fetch = pending_fetch(&fs, &mut out_rx).await;

        // the waiting task still holds a clone of the handle
        drop(fs);
        drop(out_rx);

        let res = tokio::time::timeout(Duration::from_secs(3), fetch)
            .await
            .expect("fetch still pending after teardown")
            .unwrap();
        assert!(matches!(res, Err(FsError::Closed { .. })));
    }

    #[test]
    fn dropped_engine_rejects_outstanding_fetch() {
        let (mut engine, mut rx) = test_engine("me");
        engine.hold_data("d1".into(), vec![Bytes::from_static(b"hello")]);

        let mut data_rx = engine.fetch_data_local(&"d1".into()).unwrap();
        assert_eq!(2, drain(&mut rx).len());

        drop(engine);

        assert!(data_rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn fetch_peer_waits_then_expires() {
        let (fs, _out_rx) =
            FullSync::create(FullSyncGossipConfig::default(), "me".into());

        let fetch = tokio::task::spawn({
            let fs = fs.clone();
            async move { fs.fetch_peer("p1".into()).await }
        });

        tokio::time::sleep(std::time::Duration::from_millis(500)).await;
        fs.publish(FullSyncEvent::PeerHoldRequest {
            peer_address: "p1".into(),
            info: PeerInfo::new("wss://p1", &b""[..], 1),
        })
        .await
        .unwrap();

        assert_eq!(Some(1), fetch.await.unwrap().unwrap().map(|i| i.ts));

        assert_eq!(None, fs.fetch_peer("p2".into()).await.unwrap());
    }
}
