//! Where "current location" comes from.
//!
//! Real device positioning lives outside this crate; callers hand in a
//! [`LocationProvider`] and the session turns its answer into a query.

use async_trait::async_trait;
use thiserror::Error;

use crate::model::Coordinates;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Turn on location")]
    LocationDisabled,

    #[error("Current location is unavailable")]
    Unavailable,
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_coordinates(&self) -> Result<Coordinates, LocationError>;
}

/// A location pinned in configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(Option<Coordinates>);

impl FixedLocation {
    pub fn new(coordinates: Option<Coordinates>) -> Self {
        Self(coordinates)
    }
}

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_coordinates(&self) -> Result<Coordinates, LocationError> {
        self.0.ok_or(LocationError::Unavailable)
    }
}
