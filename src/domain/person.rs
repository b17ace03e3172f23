use crate::domain::resource::{Backend, Editable, Resource, Schema};
use crate::form::{Field, FormValues, Validated};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub nome: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonPayload {
    pub nome: String,
    pub email: String,
}

impl Resource for Person {
    const SCHEMA: Schema = Schema {
        label: "Person",
        plural: "people",
        path: "pessoas",
        backend: Backend::Management,
        id_prefix: "P",
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.nome.as_str(), self.email.as_str(), self.id.as_str()]
    }
}

impl Editable for Person {
    type Payload = PersonPayload;

    const FIELDS: &'static [Field] = &[
        Field::text("nome", "Name", "Name is required."),
        Field::text("email", "Email", "Email is required."),
    ];

    fn form_values(&self) -> FormValues {
        FormValues::new().with("nome", &self.nome).with("email", &self.email)
    }

    fn payload(values: &Validated) -> PersonPayload {
        PersonPayload {
            nome: values.text("nome"),
            email: values.text("email"),
        }
    }

    fn from_payload(id: String, payload: PersonPayload) -> Self {
        Person {
            id,
            nome: payload.nome,
            email: payload.email,
        }
    }

    fn apply(&mut self, payload: &PersonPayload) {
        self.nome = payload.nome.clone();
        self.email = payload.email.clone();
    }

    fn describe(&self) -> String {
        format!("\"{}\" ({})", self.nome, self.id)
    }
}
