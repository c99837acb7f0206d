use crate::error::FsGossipResult;
use crate::gossip::FullSyncEngine;
use crate::protocol::{FsFetchAddressListMessage, GossipMessage};
use fullsync_api::*;

mod fetch_address_list;
mod fetch_address_list_resp;
mod hash_diff;
mod hash_diff_resp;
mod loc_hashes;


impl FullSyncEngine {
    pub(crate) fn respond_to_msg(
        &mut self,
        from_peer: PeerAddress,
        msg: GossipMessage,
    ) -> FsGossipResult<()> {
        tracing::debug!(?msg, "respond_to_msg from: {from_peer}");

        match msg {
            GossipMessage::LocHashes(loc_hashes) => {
                self.respond_to_loc_hashes(from_peer, loc_hashes)
            }
            GossipMessage::HashDiff(hash_diff) => {
                self.respond_to_hash_diff(from_peer, hash_diff)
            }
            GossipMessage::HashDiffResp(hash_diff_resp) => {
                self.respond_to_hash_diff_resp(from_peer, hash_diff_resp)
            }
            GossipMessage::FetchAddressList(fetch_address_list) => {
                self.respond_to_fetch_address_list(
                    from_peer,
                    fetch_address_list,
                )
            }
            GossipMessage::FetchAddressListResp(fetch_address_list_resp) => {
                self.respond_to_fetch_address_list_resp(
                    from_peer,
                    fetch_address_list_resp,
                )
            }
        }
    }

    /// Request everything a remote listing has that we don't.
    ///
    /// Returns false if nothing is missing and no request was sent.
    pub(crate) fn fetch_missing(
        &self,
        from_peer: PeerAddress,
        msg_id: &MsgId,
        peer_ts: &crate::protocol::PeerTsList,
        data_hashes: &crate::protocol::DataHashList,
    ) -> FsGossipResult<bool> {
        let missing_peers = self.store.missing_peers(peer_ts);
        let missing_data = self.store.missing_data(data_hashes);

        if missing_peers.is_empty() && missing_data.is_empty() {
            return Ok(false);
        }

        tracing::debug!(
            "Fetching {} peers and {} data addresses from {from_peer}",
            missing_peers.len(),
            missing_data.len(),
        );

        self.send_gossip_message(
            from_peer,
            GossipMessage::FetchAddressList(FsFetchAddressListMessage::new(
                msg_id,
                missing_peers,
                missing_data,
            )),
        )?;

        Ok(true)
    }
}
