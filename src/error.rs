use crate::{grid::Quantity, Float};

/// Fatal conditions raised by the hybrid core. None of these are retried;
/// the driver aborts the run with the message.
#[derive(thiserror::Error, Debug)]
pub enum HybridError {
    #[error("Unsupported dimension {0} (expected 1, 2 or 3)")]
    UnsupportedDimension(usize),

    #[error("Quantity {0:?} has no centering")]
    UnknownQuantity(Quantity),

    #[error("{what} not implemented for dimension {dim}")]
    NotImplemented { what: &'static str, dim: usize },

    #[error("Unknown boundary condition type: {0}")]
    UnknownBoundary(String),

    #[error("Unknown pusher type: {0}")]
    UnknownPusher(String),

    #[error(
        "Particle position out of bounds after periodic BC: {position} \
        (position before wrap: {position_before}, dom_size: {dom_size})"
    )]
    ParticleOutOfDomain {
        position: Float,
        position_before: Float,
        dom_size: Float,
    },

    #[error("Particle at {position} needs field values outside the buffer; is dt too large?")]
    OutsideStencil { position: Float },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HybridError>;
