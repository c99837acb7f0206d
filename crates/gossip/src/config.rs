//! Configuration parameters for the gossip module.

use std::time::Duration;

/// Configuration parameters for [FullSync](crate::FullSync).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSyncGossipConfig {
    /// How often the engine checks its exchange state and possibly
    /// starts a new exchange.
    ///
    /// Default: 100ms.
    pub tick_interval_ms: u32,

    /// How long to wait for a peer to progress an exchange we started
    /// before giving up on it.
    ///
    /// Default: 3000ms.
    pub exchange_timeout_ms: u32,

    /// The pause after every full pass through the peer list.
    ///
    /// Default: 500ms.
    pub cycle_cooldown_ms: u32,

    /// How long [FullSync::fetch_peer](crate::FullSync::fetch_peer) waits
    /// for a peer record to show up.
    ///
    /// Default: 2000ms.
    pub fetch_peer_timeout_ms: u32,

    /// Capacity of the engine mailbox and of the outbound event channel.
    ///
    /// Default: 1024.
    pub channel_capacity: u32,
}

impl Default for FullSyncGossipConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            exchange_timeout_ms: 3000,
            cycle_cooldown_ms: 500,
            fetch_peer_timeout_ms: 2000,
            channel_capacity: 1024,
        }
    }
}

impl FullSyncGossipConfig {
    pub(crate) fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms as u64)
    }

    pub(crate) fn exchange_timeout(&self) -> Duration {
        Duration::from_millis(self.exchange_timeout_ms as u64)
    }

    pub(crate) fn cycle_cooldown(&self) -> Duration {
        Duration::from_millis(self.cycle_cooldown_ms as u64)
    }

    pub(crate) fn fetch_peer_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_peer_timeout_ms as u64)
    }

    pub(crate) fn channel_capacity(&self) -> usize {
        (self.channel_capacity as usize).max(1)
    }
}

/// Module-level configuration for the full-sync gossip engine.
#[derive(
    Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub struct FullSyncGossipModConfig {
    /// Gossip engine configuration.
    pub fullsync_gossip: FullSyncGossipConfig,
}

impl fullsync_api::config::ModConfig for FullSyncGossipModConfig {}

#[cfg(test)]
mod test {
    use super::*;
    use fullsync_api::config::Config;

    #[test]
    fn defaults() {
        let config = FullSyncGossipConfig::default();
        assert_eq!(Duration::from_millis(100), config.tick_interval());
        assert_eq!(Duration::from_secs(3), config.exchange_timeout());
        assert_eq!(Duration::from_millis(500), config.cycle_cooldown());
        assert_eq!(Duration::from_secs(2), config.fetch_peer_timeout());
    }

    #[test]
    fn from_partial_json() {
        let config = Config::from_json(
            r#"{"fullsyncGossip":{"tickIntervalMs":10,"cycleCooldownMs":50}}"#,
        )
        .unwrap();
        let m: FullSyncGossipModConfig = config.get_module_config().unwrap();
        assert_eq!(10, m.fullsync_gossip.tick_interval_ms);
        assert_eq!(50, m.fullsync_gossip.cycle_cooldown_ms);
        assert_eq!(3000, m.fullsync_gossip.exchange_timeout_ms);
    }

    #[test]
    fn camel_case_keys() {
        let json =
            serde_json::to_value(FullSyncGossipConfig::default()).unwrap();
        assert_eq!(
            serde_json::json!({
                "tickIntervalMs": 100,
                "exchangeTimeoutMs": 3000,
                "cycleCooldownMs": 500,
                "fetchPeerTimeoutMs": 2000,
                "channelCapacity": 1024,
            }),
            json
        );
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let config = FullSyncGossipConfig {
            channel_capacity: 0,
            ..Default::default()
        };
        assert_eq!(1, config.channel_capacity());
    }
}
