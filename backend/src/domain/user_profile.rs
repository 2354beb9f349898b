//! User profiles and their progress lists.
//!
//! User records are stored loosely: handlers read them through
//! [`UserProfile`], which drops unknown keys (credentials included) on the
//! way out, while writes edit the raw record so those keys survive.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::acting_user::Role;
use super::booking::BookedMock;

/// Field holding completed mocks.
pub const MOCK_PROGRESS_FIELD: &str = "mock_progress";
/// Field holding completed stations.
pub const STATION_PROGRESS_FIELD: &str = "station_progress";
/// Field holding flagged stations.
pub const FLAGGED_STATIONS_FIELD: &str = "flagged_stations";

/// Completion marker for a mock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MockProgress {
    /// Mock completed.
    pub mock_id: String,
    /// Always true once written.
    pub completed: bool,
}

/// Completion marker for a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StationProgress {
    /// Station completed.
    pub station_id: String,
    /// Whether the station counts as done.
    pub completed: bool,
}

/// Station a user flagged for review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FlaggedStation {
    /// Station flagged.
    pub station_id: String,
    /// Mock the station was met in.
    pub mock_id: String,
    /// Always true once written.
    pub flagged: bool,
}

/// Public view of a user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    /// Stable user id issued by the auth layer.
    pub user_id: String,
    /// Login email; unique.
    pub email: String,
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Privilege level.
    #[serde(default)]
    pub role: Role,
    /// Creation time (RFC 3339).
    #[serde(default)]
    pub created_at: String,
    /// Whether the user has paid for access.
    #[serde(default)]
    pub has_paid: bool,
    /// Completed mocks.
    #[serde(default)]
    pub mock_progress: Vec<MockProgress>,
    /// Completed stations.
    #[serde(default)]
    pub station_progress: Vec<StationProgress>,
    /// Flagged stations.
    #[serde(default)]
    pub flagged_stations: Vec<FlaggedStation>,
    /// Booking mirror.
    #[serde(default)]
    pub booked_mocks: Vec<BookedMock>,
}

/// Fields supplied when registering a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Stable user id issued by the auth layer.
    pub user_id: String,
    /// Login email.
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// Requested role; only admins may grant [`Role::Admin`].
    pub role: Option<Role>,
}

/// Admin edit of a profile; absent fields stay as stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement mock progress.
    pub mock_progress: Option<Vec<MockProgress>>,
    /// Replacement station progress.
    pub station_progress: Option<Vec<StationProgress>>,
    /// Payment flag.
    pub has_paid: Option<bool>,
}

impl UserPatch {
    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.mock_progress.is_none() && self.station_progress.is_none() && self.has_paid.is_none()
    }
}

/// Mark `station_id` completed, updating an existing entry in place.
///
/// Returns false when the station was already marked completed.
pub fn upsert_station_progress(progress: &mut Vec<StationProgress>, station_id: &str) -> bool {
    match progress.iter_mut().find(|entry| entry.station_id == station_id) {
        Some(entry) if entry.completed => false,
        Some(entry) => {
            entry.completed = true;
            true
        }
        None => {
            progress.push(StationProgress {
                station_id: station_id.to_owned(),
                completed: true,
            });
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn profiles_drop_unknown_keys() {
        let stored = json!({
            "user_id": "u1",
            "email": "a@example.com",
            "hashed_password": "secret",
            "station_progress": [{ "station_id": "s1", "completed": true }],
        });
        let profile: UserProfile = serde_json::from_value(stored).expect("decode");
        let rendered = serde_json::to_value(&profile).expect("encode");

        assert!(rendered.get("hashed_password").is_none());
        assert_eq!(profile.role, Role::User);
        assert_eq!(profile.station_progress.len(), 1);
    }

    #[rstest]
    fn station_progress_upserts_without_duplicates() {
        let mut progress = vec![StationProgress {
            station_id: "s1".to_owned(),
            completed: false,
        }];

        assert!(upsert_station_progress(&mut progress, "s1"));
        assert!(!upsert_station_progress(&mut progress, "s1"));
        assert!(upsert_station_progress(&mut progress, "s2"));

        assert_eq!(progress.len(), 2);
        assert!(progress.iter().all(|entry| entry.completed));
    }

    #[rstest]
    fn empty_patches_are_detected() {
        assert!(UserPatch::default().is_empty());
        let patch = UserPatch {
            has_paid: Some(true),
            ..UserPatch::default()
        };
        assert!(!patch.is_empty());
    }
}
