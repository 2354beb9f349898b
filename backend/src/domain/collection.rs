//! Named collections and the container that backs each one.
//!
//! Every collection lives in exactly one persisted document (the container)
//! under one array-valued field. There is no per-row document identity.

/// Address of a collection's array: container document and field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Collection {
    name: &'static str,
    container_id: &'static str,
    field: &'static str,
}

impl Collection {
    /// Describe a collection stored in `name/container_id` under `field`.
    #[must_use]
    pub const fn new(name: &'static str, container_id: &'static str, field: &'static str) -> Self {
        Self {
            name,
            container_id,
            field,
        }
    }

    /// Backend collection holding the container document.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Fixed id of the container document.
    #[must_use]
    pub const fn container_id(&self) -> &'static str {
        self.container_id
    }

    /// Array field inside the container.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.name, self.container_id, self.field)
    }
}

/// Clinical scenarios.
pub const STATIONS: Collection = Collection::new("stations", "catalogue", "stations");
/// Timed bundles of stations.
pub const MOCKS: Collection = Collection::new("mocks", "catalogue", "mocks");
/// User profiles, progress and booking mirrors.
pub const USERS: Collection = Collection::new("users", "directory", "users");
/// Slot bookings.
pub const BOOKINGS: Collection = Collection::new("bookings", "schedule", "bookings");
/// Station conversation transcripts.
pub const TRANSCRIPTS: Collection = Collection::new("transcripts", "archive", "transcripts");
/// Evaluated feedback documents.
pub const FEEDBACKS: Collection = Collection::new("feedbacks", "archive", "feedbacks");
/// Support inbox messages.
pub const MESSAGES: Collection = Collection::new("messages", "inbox", "messages");
