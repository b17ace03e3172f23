use crate::domain::resource::{Backend, Editable, Resource, Schema};
use crate::domain::status::ActiveStatus;
use crate::form::{Field, FormValues, Validated};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: String,
    pub serial: String,
    pub status: ActiveStatus,
    pub aviario_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevicePayload {
    pub serial: String,
    pub status: ActiveStatus,
    pub aviario_id: String,
}

impl Resource for Device {
    const SCHEMA: Schema = Schema {
        label: "Device",
        plural: "devices",
        path: "dispositivos",
        backend: Backend::Management,
        id_prefix: "D",
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.serial.as_str(), self.aviario_id.as_str(), self.id.as_str()]
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.status.is_active())
    }
}

impl Editable for Device {
    type Payload = DevicePayload;

    const FIELDS: &'static [Field] = &[
        Field::text("serial", "Serial", "Serial is required."),
        Field::text("aviarioId", "Aviary", "Aviary is required."),
        Field::choice("status", "Status", ActiveStatus::OPTIONS, "ATIVO", "Status must be ATIVO or INATIVO."),
    ];

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("serial", &self.serial)
            .with("aviarioId", &self.aviario_id)
            .with("status", self.status.as_str())
    }

    fn payload(values: &Validated) -> DevicePayload {
        DevicePayload {
            serial: values.text("serial"),
            status: values.text("status").parse().unwrap_or(ActiveStatus::Ativo),
            aviario_id: values.text("aviarioId"),
        }
    }

    fn from_payload(id: String, payload: DevicePayload) -> Self {
        Device {
            id,
            serial: payload.serial,
            status: payload.status,
            aviario_id: payload.aviario_id,
        }
    }

    fn apply(&mut self, payload: &DevicePayload) {
        self.serial = payload.serial.clone();
        self.status = payload.status;
        self.aviario_id = payload.aviario_id.clone();
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.serial, self.id)
    }
}
