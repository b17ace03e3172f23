use crate::form::{Field, FormValues, Validated};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::{Debug, Display, Formatter};

/// The backend service a resource lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Sensors, devices, aviaries, batches, people, actuators, aviary status and login.
    Management,
    /// Sensor readings.
    Telemetry,
}

impl Display for Backend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Backend::Management => write!(f, "management"),
            Backend::Telemetry => write!(f, "telemetry"),
        }
    }
}

/// Static description of a resource type, shared by the list, the form and the remote client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schema {
    /// Capitalized singular used in titles and messages, e.g. "Aviary".
    pub label: &'static str,
    /// Lowercase plural used in messages, e.g. "aviaries".
    pub plural: &'static str,
    /// Collection path on the backend, without slashes.
    pub path: &'static str,
    pub backend: Backend,
    /// Prefix of locally generated placeholder identifiers.
    pub id_prefix: &'static str,
}

impl Schema {
    pub fn noun(&self) -> String {
        self.label.to_lowercase()
    }
}

/// A record that can be listed and filtered.
pub trait Resource: Clone + Debug + PartialEq + DeserializeOwned + Send + Sync + 'static {
    const SCHEMA: Schema;

    fn id(&self) -> &str;

    /// Fields matched by the free-text search, in display order.
    fn search_fields(&self) -> Vec<&str>;

    /// `None` for resources without a status, which the status selector then ignores.
    fn is_active(&self) -> Option<bool> {
        None
    }
}

/// A record that can be created, edited and deleted through a form.
pub trait Editable: Resource {
    type Payload: Clone + Debug + PartialEq + Serialize + Send + Sync + 'static;

    const FIELDS: &'static [Field];

    /// Raw form values for editing this record.
    fn form_values(&self) -> FormValues;

    fn payload(values: &Validated) -> Self::Payload;

    fn from_payload(id: String, payload: Self::Payload) -> Self;

    /// Shallow merge: fields outside the payload are left untouched.
    fn apply(&mut self, payload: &Self::Payload);

    /// Human-readable name used in confirmation prompts, e.g. `"Aviário Central" (A1)`.
    fn describe(&self) -> String;
}
