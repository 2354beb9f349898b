//! Booking coordinator.
//!
//! Layers slot capacity and membership rules over the record store and keeps
//! each user's booking mirror in step with the authoritative booking records.
//!
//! Every logical operation touches two containers (bookings, then users) and
//! there is no cross-container transaction, so operations run as a two-step
//! saga: the slot write commits first, then the mirror write. If the mirror
//! write fails the slot write is reverted with a compensating conditional
//! write and the caller receives [`BookingError::PartialFailure`]. A failed
//! compensation is logged for [`BookingCoordinator::reconcile`] to repair.
//!
//! Each container write is a single version-checked read-modify-write, so
//! concurrent joins cannot overbook a slot: a writer that lost the race
//! re-reads and re-checks capacity before retrying.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Value, json};
use tracing::{debug, error, info, warn};

use crate::domain::booking::{BookedMock, Booking, DEFAULT_MAX_USERS, SlotKey};
use crate::domain::collection::{BOOKINGS, USERS};
use crate::domain::ports::{
    BookingCommand, BookingQuery, BookingReceipt, DocumentStore, JoinRequest, MoveReceipt,
    MoveRequest, ReconcileReport,
};
use crate::domain::record::{Filters, Record, from_record, read_list, to_record, write_list};
use crate::domain::record_store::{Mutation, MutationError, RecordStore, RecordStoreError};
use crate::domain::Error;

/// Field on user records holding the booking mirror.
pub const MIRROR_FIELD: &str = "booked_mocks";

/// Saga stage reported when the mirror write fails.
pub const MIRROR_STAGE: &str = "user_mirror";

/// Failures raised by the booking coordinator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    /// The user already holds a seat for this mock.
    #[error("{user} already holds booking {booking_id} for mock {mock_id}")]
    AlreadyBooked {
        /// Acting user's email.
        user: String,
        /// Mock in question.
        mock_id: String,
        /// Booking the user already holds.
        booking_id: String,
    },
    /// The slot has no free seat.
    #[error("slot {booking_id} is full ({capacity} seats)")]
    CapacityExceeded {
        /// Slot that is full.
        booking_id: String,
        /// Its seat ceiling.
        capacity: u32,
    },
    /// The user holds no seat for this mock.
    #[error("{user} has no booking for mock {mock_id}")]
    NotBooked {
        /// Acting user's email.
        user: String,
        /// Mock in question.
        mock_id: String,
    },
    /// The requested slot is the one already held.
    #[error("booking for mock {mock_id} is already at {datetime}")]
    NoOpMove {
        /// Mock in question.
        mock_id: String,
        /// Slot already held.
        datetime: String,
    },
    /// No user record carries this email.
    #[error("no user with email {email}")]
    UserNotFound {
        /// Email looked up.
        email: String,
    },
    /// The slot write committed but the user mirror write did not.
    ///
    /// `compensated` tells whether the slot write was reverted afterwards.
    #[error("booking {booking_id} committed but the user mirror update failed: {cause}")]
    PartialFailure {
        /// Saga step that failed.
        stage: &'static str,
        /// Slot whose write committed.
        booking_id: String,
        /// Whether the slot write was reverted.
        compensated: bool,
        /// Why the mirror write failed.
        cause: String,
    },
    /// The record store failed.
    #[error(transparent)]
    Store(#[from] RecordStoreError),
}

impl From<BookingError> for Error {
    fn from(error: BookingError) -> Self {
        let message = error.to_string();
        match error {
            BookingError::AlreadyBooked { booking_id, .. } => Self::conflict(message)
                .with_details(json!({ "code": "already_booked", "bookingId": booking_id })),
            BookingError::CapacityExceeded {
                booking_id,
                capacity,
            } => Self::conflict(message).with_details(json!({
                "code": "slot_full",
                "bookingId": booking_id,
                "capacity": capacity,
            })),
            BookingError::NotBooked { mock_id, .. } => Self::not_found(message)
                .with_details(json!({ "code": "not_booked", "mockId": mock_id })),
            BookingError::NoOpMove { .. } => {
                Self::invalid_request(message).with_details(json!({ "code": "same_slot" }))
            }
            BookingError::UserNotFound { .. } => {
                Self::not_found(message).with_details(json!({ "code": "user_not_found" }))
            }
            BookingError::PartialFailure {
                stage,
                booking_id,
                compensated,
                ..
            } => Self::partial_failure("booking saved but your booking list could not be updated")
                .with_details(json!({
                    "code": "partial_failure",
                    "stage": stage,
                    "bookingId": booking_id,
                    "bookingCommitted": !compensated,
                    "mirrorCommitted": false,
                    "compensated": compensated,
                })),
            BookingError::Store(err) => Self::from(err),
        }
    }
}

/// Edit to a booking container.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SlotChange {
    Put(Booking),
    Remove(String),
}

fn decode_bookings(records: &[Record]) -> Result<Vec<Booking>, RecordStoreError> {
    records.iter().cloned().map(from_record).collect()
}

/// Apply slot changes, merging onto stored records so unknown keys survive.
fn apply_changes(records: &mut Vec<Record>, changes: &[SlotChange]) -> Result<(), RecordStoreError> {
    for change in changes {
        match change {
            SlotChange::Put(booking) => {
                let encoded = to_record(booking)?;
                let id = Value::from(booking.booking_id.as_str());
                match records.iter_mut().find(|record| record.get("booking_id") == Some(&id)) {
                    Some(existing) => existing.extend(encoded),
                    None => records.push(encoded),
                }
            }
            SlotChange::Remove(booking_id) => {
                let id = Value::from(booking_id.as_str());
                records.retain(|record| record.get("booking_id") != Some(&id));
            }
        }
    }
    Ok(())
}

fn vacate(booking: &Booking, user: &str) -> SlotChange {
    let mut vacated = booking.clone();
    vacated.unseat(user);
    if vacated.booked_users.is_empty() {
        SlotChange::Remove(vacated.booking_id)
    } else {
        SlotChange::Put(vacated)
    }
}

fn seats_taken(bookings: &[Booking], slot: &SlotKey) -> usize {
    bookings
        .iter()
        .filter(|booking| {
            booking.mock_id == slot.mock_id() && booking.booking_datetime == slot.datetime()
        })
        .map(|booking| booking.booked_users.len())
        .sum()
}

fn held_booking<'b>(bookings: &'b [Booking], user: &str, mock_id: &str) -> Option<&'b Booking> {
    bookings
        .iter()
        .find(|booking| booking.mock_id == mock_id && booking.contains(user))
}

/// Seat `user` in `slot`, returning the booking to store.
///
/// An existing booking is checked against its own `max_users`. A new slot is
/// checked against the seats already taken by every booking sharing the
/// same mock and datetime, so records written under a drifted key still
/// count towards capacity.
fn plan_join(
    bookings: &[Booking],
    user: &str,
    slot: &SlotKey,
    mock_name: &str,
    default_max_users: u32,
) -> Result<Booking, BookingError> {
    if let Some(held) = held_booking(bookings, user, slot.mock_id()) {
        return Err(BookingError::AlreadyBooked {
            user: user.to_owned(),
            mock_id: slot.mock_id().to_owned(),
            booking_id: held.booking_id.clone(),
        });
    }

    let booking_id = slot.booking_id();
    if let Some(existing) = bookings.iter().find(|b| b.booking_id == booking_id) {
        if existing.is_full() {
            return Err(BookingError::CapacityExceeded {
                booking_id,
                capacity: existing.max_users,
            });
        }
        let mut joined = existing.clone();
        joined.seat(user);
        return Ok(joined);
    }

    if seats_taken(bookings, slot) >= default_max_users as usize {
        return Err(BookingError::CapacityExceeded {
            booking_id,
            capacity: default_max_users,
        });
    }
    Ok(Booking::open(slot, mock_name, user, default_max_users))
}

struct MovePlan {
    previous: Booking,
    changes: Vec<SlotChange>,
    target: Booking,
}

fn plan_move(
    bookings: &[Booking],
    request: &MoveRequest,
    default_max_users: u32,
) -> Result<MovePlan, BookingError> {
    let Some(previous) = held_booking(bookings, &request.user, &request.mock_id) else {
        return Err(BookingError::NotBooked {
            user: request.user.clone(),
            mock_id: request.mock_id.clone(),
        });
    };
    if previous.booking_datetime == request.new_datetime {
        return Err(BookingError::NoOpMove {
            mock_id: request.mock_id.clone(),
            datetime: request.new_datetime.clone(),
        });
    }

    let leave = vacate(previous, &request.user);
    let remaining: Vec<Booking> = bookings
        .iter()
        .filter(|booking| booking.booking_id != previous.booking_id)
        .cloned()
        .chain(match &leave {
            SlotChange::Put(vacated) => Some(vacated.clone()),
            SlotChange::Remove(_) => None,
        })
        .collect();

    let target_slot = SlotKey::new(request.mock_id.clone(), request.new_datetime.clone());
    let mock_name = request.mock_name.as_deref().unwrap_or(&previous.mock_name);
    let target = plan_join(
        &remaining,
        &request.user,
        &target_slot,
        mock_name,
        default_max_users,
    )?;

    Ok(MovePlan {
        previous: previous.clone(),
        changes: vec![leave, SlotChange::Put(target.clone())],
        target,
    })
}

/// Put `user` back into `previous`'s slot, recreating it if it was deleted.
fn restore_seat(bookings: &[Booking], user: &str, previous: &Booking) -> Result<Option<SlotChange>, BookingError> {
    match bookings.iter().find(|b| b.booking_id == previous.booking_id) {
        Some(existing) if existing.contains(user) => Ok(None),
        Some(existing) if existing.is_full() => Err(BookingError::CapacityExceeded {
            booking_id: existing.booking_id.clone(),
            capacity: existing.max_users,
        }),
        Some(existing) => {
            let mut restored = existing.clone();
            restored.seat(user);
            Ok(Some(SlotChange::Put(restored)))
        }
        None => Ok(Some(SlotChange::Put(Booking {
            booked_users: vec![user.to_owned()],
            ..previous.clone()
        }))),
    }
}

fn remove_seat(bookings: &[Booking], user: &str, booking_id: &str) -> Option<SlotChange> {
    bookings
        .iter()
        .find(|b| b.booking_id == booking_id && b.contains(user))
        .map(|booking| vacate(booking, user))
}

/// Read a user's mirror entries.
pub(crate) fn read_mirror(user: &Record) -> Result<Vec<BookedMock>, RecordStoreError> {
    read_list(user, MIRROR_FIELD)
}

fn write_mirror(user: &mut Record, entries: &[BookedMock]) -> Result<(), RecordStoreError> {
    write_list(user, MIRROR_FIELD, entries)
}

/// Mirror edit for one mock.
enum MirrorEdit<'a> {
    /// Drop any entry for the mock and add this one.
    Replace(&'a BookedMock),
    /// Drop any entry for the mock.
    Remove(&'a str),
}

/// Booking coordinator over a record store.
pub struct BookingCoordinator<S> {
    records: RecordStore<S>,
    clock: Arc<dyn Clock>,
    default_max_users: u32,
}

impl<S> BookingCoordinator<S> {
    /// Create a coordinator using [`DEFAULT_MAX_USERS`] for new slots.
    pub fn new(records: RecordStore<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            records,
            clock,
            default_max_users: DEFAULT_MAX_USERS,
        }
    }

    /// Override the capacity given to newly created slots.
    #[must_use]
    pub fn with_default_max_users(mut self, max_users: u32) -> Self {
        self.default_max_users = max_users;
        self
    }

    fn now(&self) -> String {
        self.clock.utc().to_rfc3339()
    }
}

impl<S: DocumentStore> BookingCoordinator<S> {
    async fn require_user(&self, email: &str) -> Result<(), BookingError> {
        let found = match self
            .records
            .get(&USERS, &Filters::new().eq("email", email))
            .await
        {
            Ok(users) => !users.is_empty(),
            Err(RecordStoreError::NotFound { .. }) => false,
            Err(err) => return Err(err.into()),
        };
        if found {
            Ok(())
        } else {
            Err(BookingError::UserNotFound {
                email: email.to_owned(),
            })
        }
    }

    async fn edit_bookings<T, F>(&self, mut plan: F) -> Result<T, BookingError>
    where
        F: FnMut(&[Booking]) -> Result<(Vec<SlotChange>, T), BookingError> + Send,
        T: Send,
    {
        self.records
            .mutate(&BOOKINGS, |records, _| {
                let bookings = decode_bookings(records)?;
                let (changes, output) = plan(&bookings)?;
                if changes.is_empty() {
                    return Ok(Mutation::Skip(output));
                }
                apply_changes(records, &changes)?;
                Ok(Mutation::Write(output))
            })
            .await
            .map_err(MutationError::into_inner)
    }

    async fn edit_mirror(&self, email: &str, edit: MirrorEdit<'_>) -> Result<(), BookingError> {
        self.records
            .modify_record(&USERS, "email", &Value::from(email), |user| {
                let mut entries = read_mirror(user)?;
                let before = entries.len();
                match &edit {
                    MirrorEdit::Replace(entry) => {
                        entries.retain(|existing| existing.mock_id != entry.mock_id);
                        entries.push((*entry).clone());
                    }
                    MirrorEdit::Remove(mock_id) => {
                        entries.retain(|existing| existing.mock_id != *mock_id);
                        if entries.len() == before {
                            return Ok(Mutation::Skip(()));
                        }
                    }
                }
                write_mirror(user, &entries)?;
                Ok(Mutation::Write(()))
            })
            .await
            .map_err(MutationError::into_inner)
    }

    /// Revert a committed slot write after the mirror write failed.
    async fn compensate<F>(&self, booking_id: &str, cause: BookingError, mut undo: F) -> BookingError
    where
        F: FnMut(&[Booking]) -> Result<Vec<SlotChange>, BookingError> + Send,
    {
        let reverted = self
            .edit_bookings(|bookings| Ok((undo(bookings)?, ())))
            .await;
        let compensated = match reverted {
            Ok(()) => {
                warn!(booking_id, %cause, "user mirror update failed; booking write reverted");
                true
            }
            Err(undo_error) => {
                error!(
                    booking_id,
                    %cause,
                    error = %undo_error,
                    "user mirror update failed and the booking write could not be reverted; reconcile required"
                );
                false
            }
        };
        BookingError::PartialFailure {
            stage: MIRROR_STAGE,
            booking_id: booking_id.to_owned(),
            compensated,
            cause: cause.to_string(),
        }
    }

    /// Seat the user in a slot and record it on their mirror.
    ///
    /// # Errors
    ///
    /// [`BookingError::UserNotFound`], [`BookingError::AlreadyBooked`],
    /// [`BookingError::CapacityExceeded`], [`BookingError::PartialFailure`]
    /// or a propagated store error.
    pub async fn join(&self, request: &JoinRequest) -> Result<BookingReceipt, BookingError> {
        self.require_user(&request.user).await?;

        let booking = self
            .edit_bookings(|bookings| {
                let booking = plan_join(
                    bookings,
                    &request.user,
                    &request.slot,
                    &request.mock_name,
                    self.default_max_users,
                )?;
                Ok((vec![SlotChange::Put(booking.clone())], booking))
            })
            .await?;

        let mirror = BookedMock {
            mock_name: booking.mock_name.clone(),
            mock_id: booking.mock_id.clone(),
            mock_datetime: booking.booking_datetime.clone(),
            booking_datetime: self.now(),
        };
        if let Err(cause) = self
            .edit_mirror(&request.user, MirrorEdit::Replace(&mirror))
            .await
        {
            return Err(self
                .compensate(&booking.booking_id, cause, |bookings| {
                    Ok(remove_seat(bookings, &request.user, &booking.booking_id)
                        .into_iter()
                        .collect())
                })
                .await);
        }

        info!(booking_id = %booking.booking_id, user = %request.user, "slot joined");
        Ok(BookingReceipt { booking, mirror })
    }

    /// Join several slots in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// The first error returned by [`BookingCoordinator::join`]; earlier
    /// joins stay committed.
    pub async fn join_many(&self, requests: &[JoinRequest]) -> Result<Vec<BookingReceipt>, BookingError> {
        let mut receipts = Vec::with_capacity(requests.len());
        for request in requests {
            receipts.push(self.join(request).await?);
        }
        Ok(receipts)
    }

    /// Move the user's booking for a mock to another datetime.
    ///
    /// Leaving the old slot and joining the new one is a single container
    /// write, so a full target leaves the old booking untouched.
    ///
    /// # Errors
    ///
    /// [`BookingError::NotBooked`], [`BookingError::NoOpMove`],
    /// [`BookingError::CapacityExceeded`], [`BookingError::PartialFailure`]
    /// or a propagated store error.
    pub async fn move_booking(&self, request: &MoveRequest) -> Result<MoveReceipt, BookingError> {
        let (previous, target) = self
            .edit_bookings(|bookings| {
                let plan = plan_move(bookings, request, self.default_max_users)?;
                Ok((plan.changes, (plan.previous, plan.target)))
            })
            .await?;

        let mirror = BookedMock {
            mock_name: target.mock_name.clone(),
            mock_id: target.mock_id.clone(),
            mock_datetime: target.booking_datetime.clone(),
            booking_datetime: self.now(),
        };
        if let Err(cause) = self
            .edit_mirror(&request.user, MirrorEdit::Replace(&mirror))
            .await
        {
            return Err(self
                .compensate(&target.booking_id, cause, |bookings| {
                    undo_move(bookings, &request.user, &target.booking_id, &previous)
                })
                .await);
        }

        info!(
            from = %previous.booking_id,
            to = %target.booking_id,
            user = %request.user,
            "booking moved"
        );
        Ok(MoveReceipt {
            from: previous.slot(),
            to: target,
            mirror,
        })
    }

    /// Give up the user's seat for a mock and drop the mirror entry.
    ///
    /// # Errors
    ///
    /// [`BookingError::NotBooked`], [`BookingError::PartialFailure`] or a
    /// propagated store error.
    pub async fn cancel(&self, user: &str, mock_id: &str) -> Result<Booking, BookingError> {
        let previous = self
            .edit_bookings(|bookings| {
                let Some(held) = held_booking(bookings, user, mock_id) else {
                    return Err(BookingError::NotBooked {
                        user: user.to_owned(),
                        mock_id: mock_id.to_owned(),
                    });
                };
                Ok((vec![vacate(held, user)], held.clone()))
            })
            .await?;

        if let Err(cause) = self.edit_mirror(user, MirrorEdit::Remove(mock_id)).await {
            return Err(self
                .compensate(&previous.booking_id, cause, |bookings| {
                    Ok(restore_seat(bookings, user, &previous)?.into_iter().collect())
                })
                .await);
        }

        info!(booking_id = %previous.booking_id, user, "booking cancelled");
        Ok(previous)
    }

    /// Every booking, unfiltered. Empty before the first booking is made.
    ///
    /// # Errors
    ///
    /// Propagated store errors other than a missing container.
    pub async fn list(&self) -> Result<Vec<Booking>, BookingError> {
        match self.records.get(&BOOKINGS, &Filters::new()).await {
            Ok(records) => Ok(decode_bookings(&records)?),
            Err(RecordStoreError::NotFound { .. }) => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    /// Rebuild a user's mirror from the booking records.
    ///
    /// Entries matching a booking that seats the user are kept as they are,
    /// entries with no such booking are dropped, and bookings missing from
    /// the mirror are added with the current time as booking time.
    ///
    /// The mirror is only trusted once the bookings container still has the
    /// version it was read at after the mirror write. A booking committed in
    /// between triggers another pass, so a concurrent join is never undone.
    ///
    /// # Errors
    ///
    /// [`BookingError::UserNotFound`], a propagated store error, or
    /// `BackendUnavailable` when bookings keep changing for every attempt.
    pub async fn reconcile(&self, email: &str) -> Result<ReconcileReport, BookingError> {
        let mut report = ReconcileReport::default();
        for attempt in 1..=self.records.max_attempts() {
            let (records, version) = self
                .records
                .get_versioned(&BOOKINGS, &Filters::new())
                .await?;
            let held: Vec<Booking> = decode_bookings(&records)?
                .into_iter()
                .filter(|booking| booking.contains(email))
                .collect();

            let pass = self.rebuild_mirror(email, &held).await?;
            merge_passes(&mut report, pass);

            let (_, current) = self
                .records
                .get_versioned(&BOOKINGS, &Filters::new())
                .await?;
            if current == version {
                if !report.is_clean() {
                    info!(
                        user = email,
                        added = report.added.len(),
                        removed = report.removed.len(),
                        "booking mirror reconciled"
                    );
                }
                return Ok(report);
            }
            debug!(
                user = email,
                attempt,
                read = version,
                current,
                "bookings changed during reconcile; retrying"
            );
        }

        Err(BookingError::Store(RecordStoreError::backend_unavailable(
            format!(
                "bookings kept changing while reconciling {email} for {} attempts",
                self.records.max_attempts()
            ),
        )))
    }

    /// One mirror pass against the bookings in `held`.
    async fn rebuild_mirror(
        &self,
        email: &str,
        held: &[Booking],
    ) -> Result<ReconcileReport, BookingError> {
        let now = self.now();
        self.records
            .modify_record(&USERS, "email", &Value::from(email), |user| {
                let (kept, removed): (Vec<BookedMock>, Vec<BookedMock>) = read_mirror(user)?
                    .into_iter()
                    .partition(|entry| held.iter().any(|booking| entry.mirrors(booking)));
                let mut kept = dedupe_by_mock(kept);
                let added: Vec<BookedMock> = held
                    .iter()
                    .filter(|booking| !kept.iter().any(|entry| entry.mirrors(booking)))
                    .map(|booking| BookedMock {
                        mock_name: booking.mock_name.clone(),
                        mock_id: booking.mock_id.clone(),
                        mock_datetime: booking.booking_datetime.clone(),
                        booking_datetime: now.clone(),
                    })
                    .collect();
                let pass = ReconcileReport { added, removed };
                if pass.is_clean() {
                    return Ok(Mutation::Skip(pass));
                }
                kept.extend(pass.added.iter().cloned());
                write_mirror(user, &kept)?;
                Ok(Mutation::Write(pass))
            })
            .await
            .map_err(|err| match err {
                MutationError::Store(RecordStoreError::NotFound { .. }) => BookingError::UserNotFound {
                    email: email.to_owned(),
                },
                other => other.into_inner(),
            })
    }
}

/// Fold a later pass into the running report. An entry dropped by one pass
/// and restored by another for the same slot is no change at all.
fn merge_passes(total: &mut ReconcileReport, pass: ReconcileReport) {
    let same_slot =
        |a: &BookedMock, b: &BookedMock| a.mock_id == b.mock_id && a.mock_datetime == b.mock_datetime;
    for entry in pass.added {
        match total.removed.iter().position(|gone| same_slot(gone, &entry)) {
            Some(index) => {
                total.removed.remove(index);
            }
            None => total.added.push(entry),
        }
    }
    for entry in pass.removed {
        match total.added.iter().position(|new| same_slot(new, &entry)) {
            Some(index) => {
                total.added.remove(index);
            }
            None => total.removed.push(entry),
        }
    }
}

/// Keep the first mirror entry per mock.
fn dedupe_by_mock(entries: Vec<BookedMock>) -> Vec<BookedMock> {
    let mut unique: Vec<BookedMock> = Vec::with_capacity(entries.len());
    for entry in entries {
        if !unique.iter().any(|kept| kept.mock_id == entry.mock_id) {
            unique.push(entry);
        }
    }
    unique
}

/// Take the user out of the target slot and seat them back in the old one.
fn undo_move(
    bookings: &[Booking],
    user: &str,
    target_id: &str,
    previous: &Booking,
) -> Result<Vec<SlotChange>, BookingError> {
    let mut view = bookings.to_vec();
    let mut changes = Vec::with_capacity(2);
    if let Some(change) = remove_seat(bookings, user, target_id) {
        match &change {
            SlotChange::Put(vacated) => {
                if let Some(slot) = view.iter_mut().find(|b| b.booking_id == vacated.booking_id) {
                    *slot = vacated.clone();
                }
            }
            SlotChange::Remove(booking_id) => view.retain(|b| &b.booking_id != booking_id),
        }
        changes.push(change);
    }
    changes.extend(restore_seat(&view, user, previous)?);
    Ok(changes)
}

#[async_trait]
impl<S: DocumentStore> BookingCommand for BookingCoordinator<S> {
    async fn join(&self, requests: &[JoinRequest]) -> Result<Vec<BookingReceipt>, Error> {
        Ok(self.join_many(requests).await?)
    }

    async fn move_booking(&self, request: &MoveRequest) -> Result<MoveReceipt, Error> {
        Ok(Self::move_booking(self, request).await?)
    }

    async fn cancel(&self, user: &str, mock_id: &str) -> Result<Booking, Error> {
        Ok(Self::cancel(self, user, mock_id).await?)
    }

    async fn reconcile(&self, email: &str) -> Result<ReconcileReport, Error> {
        Ok(Self::reconcile(self, email).await?)
    }
}

#[async_trait]
impl<S: DocumentStore> BookingQuery for BookingCoordinator<S> {
    async fn list(&self) -> Result<Vec<Booking>, Error> {
        Ok(Self::list(self).await?)
    }
}

#[cfg(test)]
#[path = "booking_service_tests.rs"]
mod tests;
