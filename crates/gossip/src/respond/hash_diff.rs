use crate::error::{FsGossipError, FsGossipResult};
use crate::gossip::FullSyncEngine;
use crate::protocol::{FsHashDiffMessage, FsHashDiffRespMessage, GossipMessage};
use crate::state::GossipExchangeState;
use fullsync_api::*;

impl FullSyncEngine {
    pub(super) fn respond_to_hash_diff(
        &mut self,
        from_peer: PeerAddress,
        hash_diff: FsHashDiffMessage,
    ) -> FsGossipResult<()> {
        let msg_id = MsgId::from(hash_diff.msg_id.as_str());

        if !self.state.is_active_exchange(&from_peer, &msg_id) {
            tracing::debug!(
                "Ignoring hash diff {msg_id} from {from_peer}, \
                not our active exchange"
            );
            return Ok(());
        }

        let peer_ts = hash_diff.peer_ts().map_err(|e| {
            FsGossipError::peer_behavior(format!("bad hash diff: {e}"))
        })?;
        let data_hashes = hash_diff.data_hashes().map_err(|e| {
            FsGossipError::peer_behavior(format!("bad hash diff: {e}"))
        })?;

        // first describe the buckets they asked about
        let request_locs = hash_diff.request_locs();
        if !request_locs.is_empty() {
            self.send_gossip_message(
                from_peer.clone(),
                GossipMessage::HashDiffResp(FsHashDiffRespMessage::new(
                    &msg_id,
                    self.store.peer_ts_for(&request_locs),
                    self.store.data_hashes_for(&request_locs),
                )),
            )?;
        }

        if !self.fetch_missing(
            from_peer.clone(),
            &msg_id,
            &peer_ts,
            &data_hashes,
        )? {
            tracing::debug!(
                "Gossip exchange {msg_id} with {from_peer} complete, \
                nothing to fetch"
            );
            self.state = GossipExchangeState::Idle;
        }

        Ok(())
    }
}
