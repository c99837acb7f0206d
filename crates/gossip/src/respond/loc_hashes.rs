use crate::error::{FsGossipError, FsGossipResult};
use crate::gossip::FullSyncEngine;
use crate::protocol::{FsHashDiffMessage, FsLocHashesMessage, GossipMessage};
use fullsync_api::*;

impl FullSyncEngine {
    /// Answer a digest announcement.
    ///
    /// This is answered regardless of our own exchange state.
    pub(super) fn respond_to_loc_hashes(
        &mut self,
        from_peer: PeerAddress,
        loc_hashes: FsLocHashesMessage,
    ) -> FsGossipResult<()> {
        let msg_id = MsgId::from(loc_hashes.msg_id.as_str());
        let remote = loc_hashes.decode_loc_hashes().map_err(|e| {
            FsGossipError::peer_behavior(format!("bad loc hashes: {e}"))
        })?;
        let local = self.store.loc_hashes();

        // buckets they have that we lack or disagree on
        let request_locs = remote
            .iter()
            .filter(|&(loc, hash)| local.get(loc) != Some(hash))
            .map(|(loc, _)| *loc)
            .collect::<Vec<_>>();

        // buckets we have that they lack or disagree on
        let send_locs = local
            .iter()
            .filter(|&(loc, hash)| remote.get(loc) != Some(hash))
            .map(|(loc, _)| *loc)
            .collect::<Vec<_>>();

        tracing::debug!(
            "Loc hash diff with {from_peer}: \
            requesting {} buckets, describing {}",
            request_locs.len(),
            send_locs.len(),
        );

        self.send_gossip_message(
            from_peer,
            GossipMessage::HashDiff(FsHashDiffMessage::new(
                &msg_id,
                self.store.peer_ts_for(&send_locs),
                self.store.data_hashes_for(&send_locs),
                &request_locs,
            )),
        )?;

        Ok(())
    }
}
