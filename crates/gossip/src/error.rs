use fullsync_api::FsError;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub(crate) enum FsGossipError {
    /// An error caused by peer behavior.
    #[error("Rejected peer behavior - {ctx}")]
    PeerBehaviorError { ctx: Arc<str> },

    /// A fullsync error.
    #[error("FsError - {0}")]
    FsError(#[from] FsError),
}

impl FsGossipError {
    pub(crate) fn peer_behavior(ctx: impl std::fmt::Display) -> Self {
        Self::PeerBehaviorError {
            ctx: ctx.to_string().into_boxed_str().into(),
        }
    }
}

pub(crate) type FsGossipResult<T> = Result<T, FsGossipError>;
