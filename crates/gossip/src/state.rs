use fullsync_api::{MsgId, PeerAddress};
use tokio::time::Instant;

/// The state of the single gossip exchange this engine may drive.
///
/// We only initiate one exchange at a time. Remote-initiated exchanges are
/// answered statelessly and never occupy this slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GossipExchangeState {
    /// Free to start a new exchange on the next tick.
    Idle,

    /// Cooling down after a full pass through the peer list.
    Waiting {
        /// When the cooldown ends.
        until: Instant,
    },

    /// Waiting for a peer to progress the exchange we started.
    WaitingOnPeer {
        /// The peer we are exchanging with.
        peer: PeerAddress,

        /// The id binding response messages to this exchange.
        msg_id: MsgId,

        /// When we give up on this exchange.
        deadline: Instant,
    },
}

impl GossipExchangeState {
    /// True if `msg_id` from `from` belongs to the exchange in flight.
    pub fn is_active_exchange(
        &self,
        from: &PeerAddress,
        msg_id: &MsgId,
    ) -> bool {
        matches!(
            self,
            GossipExchangeState::WaitingOnPeer {
                peer,
                msg_id: active,
                ..
            } if peer == from && active == msg_id
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn only_matching_exchange_is_active() {
        let peer = PeerAddress::from("p1");
        let msg_id = MsgId::from("m1");
        let state = GossipExchangeState::WaitingOnPeer {
            peer: peer.clone(),
            msg_id: msg_id.clone(),
            deadline: Instant::now(),
        };

        assert!(state.is_active_exchange(&peer, &msg_id));
        assert!(!state.is_active_exchange(&peer, &MsgId::from("m2")));
        assert!(!state.is_active_exchange(&PeerAddress::from("p2"), &msg_id));
        assert!(!GossipExchangeState::Idle.is_active_exchange(&peer, &msg_id));
    }
}
