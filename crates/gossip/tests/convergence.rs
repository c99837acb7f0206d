//! Tests that engines connected in memory converge on the same state.

use bytes::Bytes;
use fullsync_api::*;
use fullsync_gossip::FullSyncGossipConfig;
use fullsync_test_utils::id::{random_data_address, random_peer_address};
use fullsync_test_utils::switchboard::{Switchboard, TestNode};
use fullsync_test_utils::{enable_tracing_with_default_level, random_bytes};
use std::time::Duration;

fn fast_config() -> FullSyncGossipConfig {
    FullSyncGossipConfig {
        tick_interval_ms: 10,
        exchange_timeout_ms: 200,
        cycle_cooldown_ms: 50,
        ..Default::default()
    }
}

async fn introduce(nodes: &[&TestNode]) {
    for node in nodes {
        for peer in nodes {
            node.hold_peer(peer.address(), 1).await;
        }
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn published_data_reaches_peer() {
    enable_tracing_with_default_level(tracing::Level::INFO);

    let switchboard = Switchboard::new(Default::default());
    let a = switchboard.add_node("a");
    let b = switchboard.add_node("b");
    introduce(&[&a, &b]).await;

    let d1 = DataAddress::from("d1");
    a.hold_data(&d1, vec![Bytes::from_static(b"hello")]).await;

    assert_eq!(
        vec![Bytes::from_static(b"hello")],
        b.wait_for_data(&d1, Duration::from_secs(2)).await
    );
    assert_eq!(Some(vec![Bytes::from_static(b"hello")]), b.stored(&d1));
}

#[tokio::test(flavor = "multi_thread")]
async fn many_nodes_converge() {
    enable_tracing_with_default_level(tracing::Level::INFO);

    let switchboard = Switchboard::new(fast_config());
    let nodes = (0..4)
        .map(|_| switchboard.add_node(random_peer_address()))
        .collect::<Vec<_>>();
    introduce(&nodes.iter().collect::<Vec<_>>()).await;

    let mut published = Vec::new();
    for (i, node) in nodes.iter().enumerate() {
        for _ in 0..=i {
            let data_address = random_data_address();
            let data = vec![Bytes::from(random_bytes(64))];
            node.hold_data(&data_address, data.clone()).await;
            published.push((data_address, data));
        }
    }

    for node in &nodes[1..] {
        nodes[0]
            .wait_for_sync_with(node, Duration::from_secs(10))
            .await;
    }

    for node in &nodes {
        for (data_address, data) in &published {
            assert_eq!(
                data,
                &node
                    .wait_for_data(data_address, Duration::from_secs(1))
                    .await
            );
            assert_eq!(Some(data.clone()), node.stored(data_address));
        }
        assert_eq!(
            nodes.len(),
            node.fs.peer_list().await.unwrap().len()
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn peer_records_spread_transitively() {
    enable_tracing_with_default_level(tracing::Level::INFO);

    let switchboard = Switchboard::new(fast_config());
    let a = switchboard.add_node("a");
    let b = switchboard.add_node("b");
    let c = switchboard.add_node("c");

    // a only knows b, c only knows b
    introduce(&[&a, &b]).await;
    introduce(&[&b, &c]).await;

    let info = a.fs.fetch_peer(c.address().clone()).await.unwrap();
    assert_eq!("mem://c", info.unwrap().transport);

    a.wait_for_sync_with(&c, Duration::from_secs(10)).await;
}

#[tokio::test(flavor = "multi_thread")]
async fn newer_peer_record_wins() {
    enable_tracing_with_default_level(tracing::Level::INFO);

    let switchboard = Switchboard::new(fast_config());
    let a = switchboard.add_node("a");
    let b = switchboard.add_node("b");
    introduce(&[&a, &b]).await;
    a.wait_for_sync_with(&b, Duration::from_secs(10)).await;

    a.hold_peer(a.address(), 7).await;
    a.wait_for_sync_with(&b, Duration::from_secs(10)).await;

    assert_eq!(
        Some(7),
        b.fs
            .get_peer_local(a.address().clone())
            .await
            .unwrap()
            .map(|info| info.ts)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn unreachable_peer_does_not_stall_gossip() {
    enable_tracing_with_default_level(tracing::Level::INFO);

    let switchboard = Switchboard::new(fast_config());
    let a = switchboard.add_node("a");
    let b = switchboard.add_node("b");
    let c = switchboard.add_node("c");
    introduce(&[&a, &b, &c]).await;

    // "b" sorts between the others, so a must time out on it every cycle
    switchboard.disconnect(b.address());

    let d1 = DataAddress::from("d1");
    a.hold_data(&d1, vec![Bytes::from_static(b"hello")]).await;

    assert_eq!(
        vec![Bytes::from_static(b"hello")],
        c.wait_for_data(&d1, Duration::from_secs(10)).await
    );
    assert_eq!(None, b.stored(&d1));
}
