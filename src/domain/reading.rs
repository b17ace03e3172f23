use crate::domain::resource::{Backend, Resource, Schema};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A sensor reading from the telemetry API. Readings are read-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub id_sensor: Option<String>,
    #[serde(default)]
    pub tipo_sensor: Option<String>,
    pub leitura: ReadingValue,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
}

impl ReadingValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ReadingValue::Number(n) => Some(*n),
            ReadingValue::Text(text) => text.trim().parse().ok(),
        }
    }
}

impl Display for ReadingValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadingValue::Number(n) => write!(f, "{}", n),
            ReadingValue::Text(text) => write!(f, "{}", text),
        }
    }
}

impl Resource for Reading {
    const SCHEMA: Schema = Schema {
        label: "Reading",
        plural: "readings",
        path: "leituras",
        backend: Backend::Telemetry,
        id_prefix: "R",
    };

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.id_sensor.as_deref().unwrap_or_default(),
            self.tipo_sensor.as_deref().unwrap_or_default(),
            self.id.as_str(),
        ]
    }
}

/// Aggregate welfare status reported by the management API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AviaryStatus {
    pub total_galinhas: u64,
    pub nivel_amonia: f64,
    pub condicao: String,
}
