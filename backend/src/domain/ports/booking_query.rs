//! Driving port for booking reads.

use async_trait::async_trait;

use crate::domain::{Booking, Error};

/// Read-only projection over slot bookings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingQuery: Send + Sync {
    /// Every booking, unfiltered; empty before the first booking is made.
    async fn list(&self) -> Result<Vec<Booking>, Error>;
}
