use crate::gossip::FullSyncEngine;
use crate::protocol::{FsLocHashesMessage, GossipMessage};
use crate::state::GossipExchangeState;
use fullsync_api::MsgId;
use tokio::time::Instant;

impl FullSyncEngine {
    /// Drive the exchange state machine.
    ///
    /// Called on a fixed interval. Starts at most one exchange, and never
    /// while another exchange we started is still in flight.
    pub(crate) fn tick(&mut self, now: Instant) {
        match &self.state {
            GossipExchangeState::WaitingOnPeer {
                peer,
                msg_id,
                deadline,
            } => {
                if now < *deadline {
                    return;
                }
                tracing::warn!(
                    "Gossip exchange {msg_id} with {peer} timed out"
                );
                self.state = GossipExchangeState::Idle;
            }
            GossipExchangeState::Waiting { until } => {
                if now < *until {
                    return;
                }
                self.state = GossipExchangeState::Idle;
            }
            GossipExchangeState::Idle => (),
        }

        self.initiate_next(now);
    }

    fn initiate_next(&mut self, now: Instant) {
        let peer = loop {
            let Some(peer) = self.store.peer_list().get(self.rr_index).cloned()
            else {
                tracing::trace!("Gossip cycle complete, cooling down");
                self.rr_index = 0;
                self.state = GossipExchangeState::Waiting {
                    until: now + self.config.cycle_cooldown(),
                };
                return;
            };

            self.rr_index += 1;

            if peer != self.this_peer {
                break peer;
            }
        };

        let msg_id = MsgId::random();
        let msg = GossipMessage::LocHashes(FsLocHashesMessage::new(
            &msg_id,
            self.store.loc_hashes(),
        ));

        if let Err(e) = self.send_gossip_message(peer.clone(), msg) {
            tracing::warn!("Failed to initiate gossip with {peer}: {e}");
            return;
        }

        tracing::debug!("Initiated gossip exchange {msg_id} with {peer}");
        self.state = GossipExchangeState::WaitingOnPeer {
            peer,
            msg_id,
            deadline: now + self.config.exchange_timeout(),
        };
    }
}
