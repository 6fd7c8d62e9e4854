use thiserror::Error;

use lm_core::MatchId;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum HostError {
    #[error("match not found: {0}")]
    MatchNotFound(MatchId),

    #[error("match {0} is no longer accepting commands")]
    ChannelClosed(MatchId),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("engine error: {0}")]
    Engine(#[from] lm_core::MatchError),
}
