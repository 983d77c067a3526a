use serde::Serialize;

use crate::domain::identity::models::SessionMarker;
use crate::domain::identity::models::UserId;
use crate::identity::errors::EventNotifierError;

/// Opaque payload addressed to a named destination (topic).
///
/// Constructed, dispatched once and discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEvent {
    pub destination: String,
    pub payload: Vec<u8>,
}

impl DomainEvent {
    pub fn new(destination: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            destination: destination.into(),
            payload,
        }
    }
}

/// "User completed an authentication action within guest session".
///
/// Consumers migrate guest-session results to the identified user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionMigrationEvent {
    pub session: String,
    #[serde(rename = "userID")]
    pub user_id: String,
}

impl SessionMigrationEvent {
    pub fn new(session: &SessionMarker, user_id: &UserId) -> Self {
        Self {
            session: session.as_str().to_string(),
            user_id: user_id.to_string(),
        }
    }

    /// Serialize into a JSON domain event for `destination`.
    ///
    /// # Errors
    /// * `SerializationFailed` - JSON encoding failed
    pub fn into_domain_event(self, destination: &str) -> Result<DomainEvent, EventNotifierError> {
        serde_json::to_vec(&self)
            .map(|payload| DomainEvent::new(destination, payload))
            .map_err(|e| EventNotifierError::SerializationFailed(e.to_string()))
    }
}
