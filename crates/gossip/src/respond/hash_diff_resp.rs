use crate::error::{FsGossipError, FsGossipResult};
use crate::gossip::FullSyncEngine;
use crate::protocol::FsHashDiffRespMessage;
use crate::state::GossipExchangeState;
use fullsync_api::*;

impl FullSyncEngine {
    /// Handle the description of buckets we asked about.
    ///
    /// This normally arrives on the responding side of an exchange, so
    /// it is processed whatever our own exchange state is.
    pub(super) fn respond_to_hash_diff_resp(
        &mut self,
        from_peer: PeerAddress,
        hash_diff_resp: FsHashDiffRespMessage,
    ) -> FsGossipResult<()> {
        let msg_id = MsgId::from(hash_diff_resp.msg_id.as_str());

        let peer_ts = hash_diff_resp.peer_ts().map_err(|e| {
            FsGossipError::peer_behavior(format!("bad hash diff resp: {e}"))
        })?;
        let data_hashes = hash_diff_resp.data_hashes().map_err(|e| {
            FsGossipError::peer_behavior(format!("bad hash diff resp: {e}"))
        })?;

        let fetching = self.fetch_missing(
            from_peer.clone(),
            &msg_id,
            &peer_ts,
            &data_hashes,
        )?;

        if !fetching && self.state.is_active_exchange(&from_peer, &msg_id) {
            tracing::debug!(
                "Gossip exchange {msg_id} with {from_peer} complete, \
                nothing to fetch"
            );
            self.state = GossipExchangeState::Idle;
        }

        Ok(())
    }
}
