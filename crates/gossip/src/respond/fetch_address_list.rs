use crate::error::FsGossipResult;
use crate::gossip::FullSyncEngine;
use crate::protocol::{
    serialize_gossip_message, FsFetchAddressListMessage,
    FsFetchAddressListRespMessage, GossipMessage, PeerInfoList,
};
use fullsync_api::*;

impl FullSyncEngine {
    /// Answer a request for full records.
    ///
    /// Best effort: anything we don't hold is left out of the response.
    /// Data content lives with the application, so each requested data
    /// address is fetched from it and the reply is sent once all fetches
    /// have resolved, without blocking the engine.
    pub(super) fn respond_to_fetch_address_list(
        &mut self,
        from_peer: PeerAddress,
        fetch_address_list: FsFetchAddressListMessage,
    ) -> FsGossipResult<()> {
        let msg_id = MsgId::from(fetch_address_list.msg_id.as_str());

        let peers: PeerInfoList = fetch_address_list
            .peer_addresses()
            .into_iter()
            .filter_map(|address| {
                let info = self.store.get_peer(&address)?.clone();
                Some((address, info))
            })
            .collect();

        let mut fetches = Vec::new();
        for address in fetch_address_list.data_addresses() {
            if self.store.has_data(&address) {
                let rx = self.register_data_fetch(&address);
                fetches.push((address, rx));
            }
        }

        if fetches.is_empty() {
            self.send_gossip_message(
                from_peer,
                GossipMessage::FetchAddressListResp(
                    FsFetchAddressListRespMessage::new(&msg_id, peers, vec![]),
                ),
            )?;
            return Ok(());
        }

        let out_tx = self.out_tx.clone();
        tokio::task::spawn(async move {
            let data = futures::future::join_all(fetches.into_iter().map(
                |(address, rx)| async move {
                    match rx.await {
                        Ok(data) => Some((address, data)),
                        Err(_) => {
                            tracing::debug!(
                                "Data fetch for {address} was dropped"
                            );
                            None
                        }
                    }
                },
            ))
            .await
            .into_iter()
            .flatten()
            .collect::<Vec<_>>();

            let msg = GossipMessage::FetchAddressListResp(
                FsFetchAddressListRespMessage::new(&msg_id, peers, data),
            );
            let bundle = match serialize_gossip_message(msg) {
                Ok(bundle) => bundle,
                Err(e) => {
                    tracing::error!(
                        "could not serialize fetch response: {e}"
                    );
                    return;
                }
            };

            if out_tx
                .send(FullSyncOutEvent::GossipTo {
                    peer_list: vec![from_peer],
                    bundle,
                })
                .await
                .is_err()
            {
                tracing::debug!(
                    "Engine closed before fetch response {msg_id} was sent"
                );
            }
        });

        Ok(())
    }
}
