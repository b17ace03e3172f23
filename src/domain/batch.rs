use crate::domain::resource::{Backend, Editable, Resource, Schema};
use crate::form::{Field, FormValues, Validated};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub id: String,
    pub descricao: String,
    pub aviario_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPayload {
    pub descricao: String,
    pub aviario_id: String,
}

impl Resource for Batch {
    const SCHEMA: Schema = Schema {
        label: "Batch",
        plural: "batches",
        path: "lotes",
        backend: Backend::Management,
        id_prefix: "L",
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.descricao.as_str(), self.aviario_id.as_str(), self.id.as_str()]
    }
}

impl Editable for Batch {
    type Payload = BatchPayload;

    const FIELDS: &'static [Field] = &[
        Field::text("descricao", "Description", "Description is required."),
        Field::text("aviarioId", "Aviary", "Aviary is required."),
    ];

    fn form_values(&self) -> FormValues {
        FormValues::new().with("descricao", &self.descricao).with("aviarioId", &self.aviario_id)
    }

    fn payload(values: &Validated) -> BatchPayload {
        BatchPayload {
            descricao: values.text("descricao"),
            aviario_id: values.text("aviarioId"),
        }
    }

    fn from_payload(id: String, payload: BatchPayload) -> Self {
        Batch {
            id,
            descricao: payload.descricao,
            aviario_id: payload.aviario_id,
        }
    }

    fn apply(&mut self, payload: &BatchPayload) {
        self.descricao = payload.descricao.clone();
        self.aviario_id = payload.aviario_id.clone();
    }

    fn describe(&self) -> String {
        format!("\"{}\" ({})", self.descricao, self.id)
    }
}
