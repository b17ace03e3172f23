use crate::domain::resource::{Backend, Editable, Resource, Schema};
use crate::domain::status::PowerStatus;
use crate::form::{Field, FormValues, Validated};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actuator {
    pub id: String,
    pub tipo: String,
    pub status: PowerStatus,
    pub dispositivo_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActuatorPayload {
    pub tipo: String,
    pub status: PowerStatus,
    pub dispositivo_id: String,
}

impl Resource for Actuator {
    const SCHEMA: Schema = Schema {
        label: "Actuator",
        plural: "actuators",
        path: "atuadores",
        backend: Backend::Management,
        id_prefix: "AT",
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.tipo.as_str(), self.dispositivo_id.as_str(), self.id.as_str()]
    }

    // A running actuator counts as active
    fn is_active(&self) -> Option<bool> {
        Some(self.status.is_on())
    }
}

impl Editable for Actuator {
    type Payload = ActuatorPayload;

    const FIELDS: &'static [Field] = &[
        Field::text("tipo", "Type", "Type and device are required."),
        Field::text("dispositivoId", "Device", "Type and device are required."),
        Field::choice("status", "Status", PowerStatus::OPTIONS, "DESLIGADO", "Status must be LIGADO or DESLIGADO."),
    ];

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("tipo", &self.tipo)
            .with("dispositivoId", &self.dispositivo_id)
            .with("status", self.status.as_str())
    }

    fn payload(values: &Validated) -> ActuatorPayload {
        ActuatorPayload {
            tipo: values.text("tipo"),
            status: values.text("status").parse().unwrap_or(PowerStatus::Desligado),
            dispositivo_id: values.text("dispositivoId"),
        }
    }

    fn from_payload(id: String, payload: ActuatorPayload) -> Self {
        Actuator {
            id,
            tipo: payload.tipo,
            status: payload.status,
            dispositivo_id: payload.dispositivo_id,
        }
    }

    fn apply(&mut self, payload: &ActuatorPayload) {
        self.tipo = payload.tipo.clone();
        self.status = payload.status;
        self.dispositivo_id = payload.dispositivo_id.clone();
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.tipo, self.id)
    }
}
