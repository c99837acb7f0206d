//! Test utilities associated with addresses.

use base64::prelude::*;
use fullsync_api::{DataAddress, PeerAddress};

use crate::random_bytes;

fn random_name() -> String {
    BASE64_URL_SAFE_NO_PAD.encode(random_bytes(16))
}

/// Create a random peer address.
pub fn random_peer_address() -> PeerAddress {
    PeerAddress::from(format!("peer-{}", random_name()))
}

/// Create a random data address.
pub fn random_data_address() -> DataAddress {
    DataAddress::from(format!("data-{}", random_name()))
}
