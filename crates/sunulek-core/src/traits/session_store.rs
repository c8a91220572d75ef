//! Session persistence trait.

use crate::Result;
use crate::session::StoredSession;

/// Durable storage for the current session.
///
/// Implementations keep at most one record, keyed by a fixed namespace.
///
/// [`crate::SessionManager`] calls `save` and `clear` while holding its
/// state lock, so the stored record always follows the in-memory order of
/// changes. Readers of the session wait for the call to return: `save` and
/// `clear` must finish quickly and must not call back into the manager.
pub trait SessionStore: Send + Sync {
    /// Load the persisted record.
    ///
    /// Returns `None` when no record exists or the record cannot be read;
    /// a damaged record is never an error.
    fn load(&self) -> Option<StoredSession>;

    /// Persist `session`, replacing any previous record.
    fn save(&self, session: &StoredSession) -> Result<()>;

    /// Remove the persisted record. Removing a missing record succeeds.
    fn clear(&self) -> Result<()>;
}
