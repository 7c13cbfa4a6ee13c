use nd_core::{CoreError, LinkId, ReceiverId, TimeInterval, VehicleCategory};
use thiserror::Error;

/// Fatal conditions that abort a damage run.
///
/// Every variant names the offending key so a bad input row can be found.
#[derive(Debug, Error)]
pub enum DamageError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("non-finite noise level {value} at {receiver}, interval ending {interval}")]
    NonFiniteLevel {
        receiver: ReceiverId,
        interval: TimeInterval,
        value:    f64,
    },

    #[error("{receiver} cites {link}, which is not in the network")]
    UnknownLink {
        receiver: ReceiverId,
        link:     LinkId,
    },

    #[error("traffic recorded on {link} (interval ending {interval}), which is not in the network")]
    UnknownTrafficLink {
        link:     LinkId,
        interval: TimeInterval,
    },

    #[error("non-finite {category} emission level {value} on {link}, interval ending {interval}")]
    NonFiniteEmission {
        link:     LinkId,
        interval: TimeInterval,
        category: VehicleCategory,
        value:    f64,
    },
}

pub type DamageResult<T> = Result<T, DamageError>;
