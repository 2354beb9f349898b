//! Driving port for booking mutations.
//!
//! Inbound adapters call [`BookingCommand`] to join, move and cancel slot
//! bookings and to repair a user's booking mirror. The acting user's email
//! is passed in every request; the port never authenticates it.

use async_trait::async_trait;

use crate::domain::{BookedMock, Booking, Error, SlotKey};

/// Request to take a seat in one slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    /// Acting user's email.
    pub user: String,
    /// Slot to join.
    pub slot: SlotKey,
    /// Display name stored on a newly created booking.
    pub mock_name: String,
}

/// Request to move the user's booking for a mock to another datetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    /// Acting user's email.
    pub user: String,
    /// Mock whose booking moves.
    pub mock_id: String,
    /// Target session start.
    pub new_datetime: String,
    /// Display name for the target booking; the old booking's name when absent.
    pub mock_name: Option<String>,
}

/// Outcome of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingReceipt {
    /// Booking after the user was seated.
    pub booking: Booking,
    /// Mirror entry written to the user record.
    pub mirror: BookedMock,
}

/// Outcome of a successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveReceipt {
    /// Slot the user left.
    pub from: SlotKey,
    /// Booking after the user was seated.
    pub to: Booking,
    /// Replacement mirror entry.
    pub mirror: BookedMock,
}

/// Changes made by a reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Entries that were missing from the mirror.
    pub added: Vec<BookedMock>,
    /// Entries with no matching booking.
    pub removed: Vec<BookedMock>,
}

impl ReconcileReport {
    /// Whether the mirror already agreed with the bookings.
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Booking use-cases that change state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingCommand: Send + Sync {
    /// Join each slot in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// `Conflict` for a full slot or an existing booking on the mock,
    /// `NotFound` for an unknown user, `PartialFailure` when the mirror
    /// could not be written, `ServiceUnavailable` on store contention.
    async fn join(&self, requests: &[JoinRequest]) -> Result<Vec<BookingReceipt>, Error>;

    /// Move a booking to another datetime of the same mock.
    ///
    /// # Errors
    ///
    /// `NotFound` without a booking to move, `InvalidRequest` for the same
    /// datetime, otherwise as [`BookingCommand::join`].
    async fn move_booking(&self, request: &MoveRequest) -> Result<MoveReceipt, Error>;

    /// Give up the user's booking for a mock, returning it as it was.
    ///
    /// # Errors
    ///
    /// `NotFound` without a booking, `PartialFailure` when the mirror could
    /// not be written.
    async fn cancel(&self, user: &str, mock_id: &str) -> Result<Booking, Error>;

    /// Rebuild the user's mirror from the booking records.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown user or store failures.
    async fn reconcile(&self, email: &str) -> Result<ReconcileReport, Error>;
}
