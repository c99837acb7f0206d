use crate::error::{FsGossipError, FsGossipResult};
use crate::gossip::FullSyncEngine;
use crate::protocol::FsFetchAddressListRespMessage;
use crate::state::GossipExchangeState;
use fullsync_api::*;

impl FullSyncEngine {
    pub(super) fn respond_to_fetch_address_list_resp(
        &mut self,
        from_peer: PeerAddress,
        fetch_address_list_resp: FsFetchAddressListRespMessage,
    ) -> FsGossipResult<()> {
        let msg_id = MsgId::from(fetch_address_list_resp.msg_id.as_str());

        let peers = fetch_address_list_resp.peers().map_err(|e| {
            FsGossipError::peer_behavior(format!("bad fetch response: {e}"))
        })?;
        let data = fetch_address_list_resp.data().map_err(|e| {
            FsGossipError::peer_behavior(format!("bad fetch response: {e}"))
        })?;

        for (peer_address, info) in peers {
            if self.store.apply_gossiped_peer(&peer_address, info.clone()) {
                self.emit(FullSyncOutEvent::PeerHoldRequest {
                    peer_address,
                    info,
                });
            }
        }

        // learned data takes the same path as a local publish
        for (data_address, content) in data {
            self.hold_data(data_address, content);
        }

        if self.state.is_active_exchange(&from_peer, &msg_id) {
            tracing::debug!(
                "Gossip exchange {msg_id} with {from_peer} complete"
            );
            self.state = GossipExchangeState::Idle;
        }

        Ok(())
    }
}
