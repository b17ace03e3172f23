use crate::domain::resource::{Backend, Editable, Resource, Schema};
use crate::domain::status::ActiveStatus;
use crate::form::{Field, FormValues, Validated};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensor {
    pub id: String,
    pub tipo: String,
    pub status: ActiveStatus,
    pub dispositivo_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorPayload {
    pub tipo: String,
    pub status: ActiveStatus,
    pub dispositivo_id: String,
}

impl Resource for Sensor {
    const SCHEMA: Schema = Schema {
        label: "Sensor",
        plural: "sensors",
        path: "sensores",
        backend: Backend::Management,
        id_prefix: "S",
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.tipo.as_str(), self.dispositivo_id.as_str(), self.id.as_str()]
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.status.is_active())
    }
}

impl Editable for Sensor {
    type Payload = SensorPayload;

    const FIELDS: &'static [Field] = &[
        Field::text("tipo", "Type", "Type is required."),
        Field::text("dispositivoId", "Device", "Device is required."),
        Field::choice("status", "Status", ActiveStatus::OPTIONS, "ATIVO", "Status must be ATIVO or INATIVO."),
    ];

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("tipo", &self.tipo)
            .with("dispositivoId", &self.dispositivo_id)
            .with("status", self.status.as_str())
    }

    fn payload(values: &Validated) -> SensorPayload {
        SensorPayload {
            tipo: values.text("tipo"),
            status: values.text("status").parse().unwrap_or(ActiveStatus::Ativo),
            dispositivo_id: values.text("dispositivoId"),
        }
    }

    fn from_payload(id: String, payload: SensorPayload) -> Self {
        Sensor {
            id,
            tipo: payload.tipo,
            status: payload.status,
            dispositivo_id: payload.dispositivo_id,
        }
    }

    fn apply(&mut self, payload: &SensorPayload) {
        self.tipo = payload.tipo.clone();
        self.status = payload.status;
        self.dispositivo_id = payload.dispositivo_id.clone();
    }

    fn describe(&self) -> String {
        format!("\"{}\" ({})", self.tipo, self.id)
    }
}
