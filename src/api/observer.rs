//! Call Observers
//!
//! Components report every completed native call to their registered
//! observers. Observers are keyed by ID; registering an ID twice is
//! rejected. Notifications are delivered synchronously on the calling
//! thread, after the native call has returned.

use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::status::StatusCode;

/// One completed native call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Component that made the call ("engine", "config", ...)
    pub component: &'static str,
    /// Native symbol that was called
    pub symbol: String,
    /// Status (or returned value, for calls without a status)
    pub status: i64,
    /// Origin set through [`ObserverRegistry::set_origin`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl Notification {
    /// JSON form, as handed to observers that forward messages elsewhere.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Receiver of call notifications.
pub trait Observer: Send + Sync {
    /// Identity used for unregistering.
    fn id(&self) -> &str;

    fn notify(&self, notification: &Notification);
}

/// Observers registered on one component.
#[derive(Default)]
pub struct ObserverRegistry {
    observers: RwLock<Vec<Arc<dyn Observer>>>,
    origin: RwLock<Option<String>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `observer`. Returns false if its ID is already registered.
    pub fn register(&self, observer: Arc<dyn Observer>) -> bool {
        let mut observers = self.observers.write();
        if observers.iter().any(|o| o.id() == observer.id()) {
            return false;
        }
        tracing::debug!(observer = observer.id(), "observer registered");
        observers.push(observer);
        true
    }

    /// Remove the observer with `id`. Returns false if none was registered.
    pub fn unregister(&self, id: &str) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|o| o.id() != id);
        let removed = observers.len() != before;
        if removed {
            tracing::debug!(observer = id, "observer unregistered");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.observers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.read().is_empty()
    }

    /// Tag every later notification with `origin`.
    pub fn set_origin(&self, origin: impl Into<String>) {
        *self.origin.write() = Some(origin.into());
    }

    pub fn origin(&self) -> Option<String> {
        self.origin.read().clone()
    }

    /// Deliver one notification to every registered observer.
    pub fn notify(&self, component: &'static str, symbol: &str, status: StatusCode) {
        // Snapshot, so an observer may register or unregister while notified
        let observers: Vec<Arc<dyn Observer>> = self.observers.read().clone();
        if observers.is_empty() {
            return;
        }
        let notification = Notification {
            component,
            symbol: symbol.to_string(),
            status: status.code(),
            origin: self.origin(),
        };
        for observer in &observers {
            observer.notify(&notification);
        }
    }
}

impl std::fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<String> = self.observers.read().iter().map(|o| o.id().to_string()).collect();
        f.debug_struct("ObserverRegistry")
            .field("observers", &ids)
            .field("origin", &*self.origin.read())
            .finish()
    }
}
