//! Slot bookings and the per-user booking mirror.
//!
//! A slot is a `(mock_id, datetime)` pair. Its [`Booking`] record exists
//! while at least one user holds a seat and moves through
//! `empty -> open -> full -> ... -> empty` as users join and leave.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Seats per slot when a booking is first created.
pub const DEFAULT_MAX_USERS: u32 = 4;

/// Bookable session instance of a mock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlotKey {
    mock_id: String,
    datetime: String,
}

impl SlotKey {
    /// Identify the slot of `mock_id` starting at `datetime`.
    pub fn new(mock_id: impl Into<String>, datetime: impl Into<String>) -> Self {
        Self {
            mock_id: mock_id.into(),
            datetime: datetime.into(),
        }
    }

    /// Mock the slot belongs to.
    pub fn mock_id(&self) -> &str {
        &self.mock_id
    }

    /// Session start as supplied by the caller.
    pub fn datetime(&self) -> &str {
        &self.datetime
    }

    /// Deterministic booking id: `{mock_id}_{datetime}`.
    ///
    /// # Examples
    /// ```
    /// use osce_backend::domain::SlotKey;
    ///
    /// let slot = SlotKey::new("mock-1", "2025-03-01T09:00");
    /// assert_eq!(slot.booking_id(), "mock-1_2025-03-01T09:00");
    /// ```
    pub fn booking_id(&self) -> String {
        format!("{}_{}", self.mock_id, self.datetime)
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.mock_id, self.datetime)
    }
}

/// Occupancy of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Nobody holds a seat; the booking record should not exist.
    Empty,
    /// Some seats are taken and some are free.
    Open {
        /// Seats taken.
        taken: usize,
        /// Seat ceiling.
        capacity: u32,
    },
    /// Every seat is taken.
    Full,
}

/// Authoritative record of who holds a seat in one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    /// `{mock_id}_{booking_datetime}`.
    pub booking_id: String,
    /// Mock the slot belongs to.
    pub mock_id: String,
    /// Display name of the mock at booking time.
    #[serde(default)]
    pub mock_name: String,
    /// Session start.
    pub booking_datetime: String,
    /// Seat holders' emails in joining order.
    #[serde(default)]
    pub booked_users: Vec<String>,
    /// Seat ceiling.
    #[serde(default = "default_max_users")]
    pub max_users: u32,
}

const fn default_max_users() -> u32 {
    DEFAULT_MAX_USERS
}

impl Booking {
    /// Create the booking for `slot` with `first_user` seated.
    pub fn open(slot: &SlotKey, mock_name: impl Into<String>, first_user: &str, max_users: u32) -> Self {
        Self {
            booking_id: slot.booking_id(),
            mock_id: slot.mock_id().to_owned(),
            mock_name: mock_name.into(),
            booking_datetime: slot.datetime().to_owned(),
            booked_users: vec![first_user.to_owned()],
            max_users,
        }
    }

    /// Slot this booking covers.
    pub fn slot(&self) -> SlotKey {
        SlotKey::new(self.mock_id.clone(), self.booking_datetime.clone())
    }

    /// Whether `email` holds a seat.
    pub fn contains(&self, email: &str) -> bool {
        self.booked_users.iter().any(|user| user == email)
    }

    /// Whether no further user can join.
    pub fn is_full(&self) -> bool {
        self.booked_users.len() >= self.max_users as usize
    }

    /// Current occupancy.
    pub fn state(&self) -> SlotState {
        match self.booked_users.len() {
            0 => SlotState::Empty,
            _ if self.is_full() => SlotState::Full,
            taken => SlotState::Open {
                taken,
                capacity: self.max_users,
            },
        }
    }

    /// Seat `email`; returns false if already seated.
    pub fn seat(&mut self, email: &str) -> bool {
        if self.contains(email) {
            return false;
        }
        self.booked_users.push(email.to_owned());
        true
    }

    /// Release `email`'s seat; returns false if not seated.
    pub fn unseat(&mut self, email: &str) -> bool {
        let before = self.booked_users.len();
        self.booked_users.retain(|user| user != email);
        self.booked_users.len() != before
    }
}

/// Booking summary stored on the user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookedMock {
    /// Display name of the mock.
    #[serde(default)]
    pub mock_name: String,
    /// Mock the slot belongs to.
    pub mock_id: String,
    /// Session start.
    pub mock_datetime: String,
    /// When the booking was made (RFC 3339).
    #[serde(default)]
    pub booking_datetime: String,
}

impl BookedMock {
    /// Whether this entry mirrors `booking`'s slot.
    pub fn mirrors(&self, booking: &Booking) -> bool {
        self.mock_id == booking.mock_id && self.mock_datetime == booking.booking_datetime
    }
}
