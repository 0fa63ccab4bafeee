//! The generic remote-entity pattern.
//!
//! Every CUPI resource type implements [`Resource`]: a compile-time
//! field-descriptor table plus the constants needed to address its
//! collection. [`Entity<T>`] wraps any such type with a server snapshot,
//! a dirty-field tracker, and the fetch / edit / push lifecycle, so the
//! CRUD mechanics exist exactly once instead of per resource type.

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::dispatch;
use crate::error::Error;
use crate::list::{self, ListResult};
use crate::query::{FilterOp, Query};
use crate::session::Session;
use crate::track::{ChangeTracker, FieldKind, FieldValue};

// ── Field descriptors ────────────────────────────────────────────────

/// One entry in a resource's field registry: the wire name, the semantic
/// kind, and fn-pointer accessors. This table replaces the runtime
/// property reflection the server's other client libraries use.
pub struct FieldDescriptor<T> {
    pub name: &'static str,
    pub kind: FieldKind,
    pub get: fn(&T) -> Option<FieldValue>,
    pub set: fn(&mut T, FieldValue) -> Result<(), Error>,
}

// ── Resource trait ───────────────────────────────────────────────────

/// A CUPI resource type addressable under `/vmrest/`.
pub trait Resource: Clone + DeserializeOwned + Send + Sync + 'static {
    /// Diagnostic name used in error messages, e.g. `"user"`.
    const NAME: &'static str;

    /// Collection path segment under `/vmrest/`, e.g. `"users"`.
    const COLLECTION: &'static str;

    /// Envelope key the server wraps list items in, e.g. `"User"`.
    const LIST_KEY: &'static str;

    /// Whether a new instance can be created by POSTing to the
    /// collection. False for fixed sub-resource slots like greetings,
    /// which exist per owner and are only ever updated.
    const CREATABLE: bool = true;

    /// The editable-field registry for this type.
    fn descriptors() -> &'static [FieldDescriptor<Self>];

    /// Server-assigned object id; empty for an unsaved local shell.
    fn object_id(&self) -> &str;

    /// Adopt the object id returned by a create call.
    fn set_object_id(&mut self, id: String);

    /// Server-supplied resource URI, when the response carried one.
    /// Sub-resources (e.g. greetings) are only addressable through it.
    fn uri(&self) -> Option<&str> {
        None
    }

    /// A fully-unset local instance for later population.
    fn empty() -> Self;

    /// Look up a descriptor by wire name. Matching is case-insensitive,
    /// mirroring the server's tolerance for property-name casing.
    fn descriptor(name: &str) -> Option<&'static FieldDescriptor<Self>> {
        Self::descriptors()
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name))
    }
}

/// Relative path of one resource within its collection.
pub(crate) fn resource_path<T: Resource>(object_id: &str) -> String {
    format!("{}/{}", T::COLLECTION, object_id)
}

// ── Entity lifecycle ─────────────────────────────────────────────────

/// Lifecycle state of an [`Entity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityState {
    /// Local shell, not yet created on the server.
    Detached,
    /// Mirrors a server-side resource.
    Synced,
    /// The server-side resource was deleted through this handle.
    /// Terminal: every further operation fails.
    Deleted,
}

/// Local mirror of one server-side resource with dirty-field tracking.
///
/// Holds the last-known server snapshot alongside the working copy; only
/// [`Entity::set_field`] mutates the working copy, and [`Entity::update`]
/// pushes exactly the dirty fields. Not safe for concurrent mutation --
/// all edits take `&mut self`, one logical owner per handle.
#[derive(Debug, Clone)]
pub struct Entity<T: Resource> {
    current: T,
    snapshot: T,
    tracker: ChangeTracker,
    state: EntityState,
}

impl<T: Resource> Entity<T> {
    // ── Constructors ─────────────────────────────────────────────────

    /// Unpopulated local shell for a later create. Never contacts the
    /// server and never fails.
    pub fn shell() -> Self {
        let empty = T::empty();
        Self {
            current: empty.clone(),
            snapshot: empty,
            tracker: ChangeTracker::new(),
            state: EntityState::Detached,
        }
    }

    /// Wrap a row already fetched from the server (e.g. out of a
    /// [`ListResult`]) as a synced handle.
    pub fn adopt(row: T) -> Self {
        Self {
            snapshot: row.clone(),
            current: row,
            tracker: ChangeTracker::new(),
            state: EntityState::Synced,
        }
    }

    /// Fetch one resource by object id.
    pub async fn fetch(session: &Session, object_id: &str) -> Result<Self, Error> {
        if object_id.is_empty() {
            return Err(Error::invalid_argument(format!(
                "object id required to fetch a {}",
                T::NAME
            )));
        }

        let row: T = session
            .get_json(&resource_path::<T>(object_id))
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    Error::NotFound {
                        resource: T::NAME,
                        key: object_id.to_owned(),
                    }
                } else {
                    e
                }
            })?;

        Ok(Self::adopt(row))
    }

    /// Fetch one resource by its alias (the human-readable alternate
    /// key). Fails with `AmbiguousOrMissing` unless exactly one resource
    /// matches.
    pub async fn fetch_by_alias(session: &Session, alias: &str) -> Result<Self, Error> {
        if alias.is_empty() {
            return Err(Error::invalid_argument(format!(
                "alias required to look up a {}",
                T::NAME
            )));
        }

        let query = Query::new().filter("Alias", FilterOp::Is, alias);
        let result: ListResult<T> = list::fetch_list(session, &query).await?;

        let matches = result.items.len();
        let mut items = result.items;
        match items.pop() {
            Some(row) if matches == 1 => Ok(Self::adopt(row)),
            _ => Err(Error::AmbiguousOrMissing {
                resource: T::NAME,
                key: alias.to_owned(),
                matches,
            }),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// Read-only view of the working copy.
    pub fn get(&self) -> &T {
        &self.current
    }

    /// Last-known server values.
    pub fn snapshot(&self) -> &T {
        &self.snapshot
    }

    pub fn object_id(&self) -> &str {
        self.current.object_id()
    }

    pub fn state(&self) -> EntityState {
        self.state
    }

    pub fn is_dirty(&self, field: &str) -> bool {
        match T::descriptor(field) {
            Some(desc) => self.tracker.is_dirty(desc.name),
            None => false,
        }
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.tracker.is_empty()
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Stage a field edit. The only mutation path: writes the working
    /// copy through the descriptor table and marks the field dirty.
    pub fn set_field(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), Error> {
        if self.state == EntityState::Deleted {
            return Err(self.deleted_error());
        }

        let desc = T::descriptor(name).ok_or_else(|| {
            Error::invalid_argument(format!("{} has no field named '{name}'", T::NAME))
        })?;

        (desc.set)(&mut self.current, value.into())?;
        self.tracker.mark_dirty(desc.name);
        Ok(())
    }

    /// Discard all staged edits, reverting the working copy to the last
    /// server snapshot.
    pub fn clear_pending_changes(&mut self) {
        self.current = self.snapshot.clone();
        self.tracker.clear();
    }

    // ── Synchronization ──────────────────────────────────────────────

    /// Push staged edits to the server.
    ///
    /// A clean entity fails with `NoPendingChanges` before any network
    /// call -- the guard against accidental no-op round trips. A dirty
    /// `Detached` shell is created with POST and adopts the returned
    /// object id; a dirty `Synced` entity PUTs only its dirty fields.
    /// On success the snapshot is committed and the tracker cleared; on
    /// failure the dirty set is preserved so the caller can retry.
    pub async fn update(&mut self, session: &Session) -> Result<(), Error> {
        if self.state == EntityState::Deleted {
            return Err(self.deleted_error());
        }
        if self.tracker.is_empty() {
            return Err(Error::NoPendingChanges);
        }

        match self.state {
            EntityState::Detached => {
                if !T::CREATABLE {
                    return Err(Error::invalid_argument(format!(
                        "a {} cannot be created; fetch it from its owner first",
                        T::NAME
                    )));
                }
                let id = dispatch::push_create::<T>(session, &self.current, &self.tracker).await?;
                debug!(resource = T::NAME, %id, "created");
                self.current.set_object_id(id);
            }
            EntityState::Synced => {
                if self.object_id().is_empty() {
                    return Err(Error::invalid_argument(format!(
                        "object id required to update a {}",
                        T::NAME
                    )));
                }
                let path = self.update_path();
                dispatch::push_update::<T>(session, &path, &self.current, &self.tracker).await?;
                debug!(resource = T::NAME, id = self.object_id(), "updated");
            }
            EntityState::Deleted => unreachable!("guarded above"),
        }

        self.snapshot = self.current.clone();
        self.tracker.clear();
        self.state = EntityState::Synced;
        Ok(())
    }

    /// Delete the server-side resource. The handle becomes a dangling
    /// `Deleted` terminal -- reusing it fails without a network call.
    pub async fn delete(&mut self, session: &Session) -> Result<(), Error> {
        match self.state {
            EntityState::Deleted => return Err(self.deleted_error()),
            EntityState::Detached => {
                return Err(Error::invalid_argument(format!(
                    "cannot delete a {} that was never created",
                    T::NAME
                )));
            }
            EntityState::Synced => {}
        }
        if self.object_id().is_empty() {
            return Err(Error::invalid_argument(format!(
                "object id required to delete a {}",
                T::NAME
            )));
        }

        session.delete(&self.update_path()).await?;
        debug!(resource = T::NAME, id = self.object_id(), "deleted");
        self.state = EntityState::Deleted;
        Ok(())
    }

    /// Path used for PUT/DELETE: the server-supplied URI when present
    /// (required for sub-resources), else `{collection}/{id}`.
    pub(crate) fn update_path(&self) -> String {
        match self.current.uri() {
            Some(uri) => uri.trim_start_matches("/vmrest/").to_owned(),
            None => resource_path::<T>(self.current.object_id()),
        }
    }

    fn deleted_error(&self) -> Error {
        Error::NotFound {
            resource: T::NAME,
            key: self.current.object_id().to_owned(),
        }
    }
}
