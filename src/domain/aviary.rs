use crate::domain::resource::{Backend, Editable, Resource, Schema};
use crate::domain::status::int_flag;
use crate::form::{Field, FormValues, Validated};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aviary {
    pub id: String,
    pub nome: String,
    pub capacidade_maxima: f64,
    pub localizacao: String,
    #[serde(with = "int_flag")]
    pub ativo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AviaryPayload {
    pub nome: String,
    pub capacidade_maxima: f64,
    pub localizacao: String,
    #[serde(with = "int_flag")]
    pub ativo: bool,
}

impl Resource for Aviary {
    const SCHEMA: Schema = Schema {
        label: "Aviary",
        plural: "aviaries",
        path: "aviarios",
        backend: Backend::Management,
        id_prefix: "A",
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.nome.as_str(), self.localizacao.as_str(), self.id.as_str()]
    }

    fn is_active(&self) -> Option<bool> {
        Some(self.ativo)
    }
}

impl Editable for Aviary {
    type Payload = AviaryPayload;

    const FIELDS: &'static [Field] = &[
        Field::text("nome", "Name", "Name is required."),
        Field::positive_number("capacidadeMaxima", "Maximum capacity", "Capacity must be a positive number."),
        Field::text("localizacao", "Location", "Location is required."),
        Field::choice("ativo", "Active", &["1", "0"], "1", "Active must be yes or no."),
    ];

    fn form_values(&self) -> FormValues {
        FormValues::new()
            .with("nome", &self.nome)
            .with("capacidadeMaxima", self.capacidade_maxima.to_string())
            .with("localizacao", &self.localizacao)
            .with("ativo", if self.ativo { "1" } else { "0" })
    }

    fn payload(values: &Validated) -> AviaryPayload {
        AviaryPayload {
            nome: values.text("nome"),
            capacidade_maxima: values.number("capacidadeMaxima"),
            localizacao: values.text("localizacao"),
            ativo: values.text("ativo") == "1",
        }
    }

    fn from_payload(id: String, payload: AviaryPayload) -> Self {
        Aviary {
            id,
            nome: payload.nome,
            capacidade_maxima: payload.capacidade_maxima,
            localizacao: payload.localizacao,
            ativo: payload.ativo,
        }
    }

    fn apply(&mut self, payload: &AviaryPayload) {
        self.nome = payload.nome.clone();
        self.capacidade_maxima = payload.capacidade_maxima;
        self.localizacao = payload.localizacao.clone();
        self.ativo = payload.ativo;
    }

    fn describe(&self) -> String {
        format!("\"{}\" ({})", self.nome, self.id)
    }
}
