use crate::domain::{
    ActiveStatus, Actuator, Aviary, AviaryStatus, Batch, Device, Editable, Person, PowerStatus, Reading, ReadingValue,
    Resource, Sensor,
};
use crate::remote::RemoteError;
use crate::remote::source::{Fetch, PageRequest, Persist, StatusSource};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::StatusCode;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, instrument};

type Collections = HashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// In-memory stand-in for both backends, answering every call after a fixed delay.
#[derive(Debug)]
pub struct FixtureSource {
    delay: Duration,
    collections: Mutex<Collections>,
    next_id: AtomicU64,
}

impl FixtureSource {
    pub fn new(delay: Duration) -> Self {
        FixtureSource {
            delay,
            collections: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(100),
        }
    }

    /// All resource types, seeded with the demo data set.
    pub fn seeded(delay: Duration) -> Self {
        FixtureSource::new(delay)
            .with(sensors())
            .with(devices())
            .with(aviaries())
            .with(batches())
            .with(people())
            .with(actuators())
            .with(readings())
    }

    pub fn with<R: Resource>(mut self, records: Vec<R>) -> Self {
        self.collections.get_mut().insert(TypeId::of::<R>(), Box::new(records));
        self
    }

    async fn respond<R: Resource, T>(&self, f: impl FnOnce(&mut Vec<R>) -> T) -> T {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let mut collections = self.collections.lock().await;
        let entry = collections.entry(TypeId::of::<R>()).or_insert_with(|| Box::new(Vec::<R>::new()));
        match entry.as_mut().downcast_mut::<Vec<R>>() {
            Some(records) => f(records),
            None => f(&mut Vec::new()),
        }
    }

    fn not_found<R: Resource>(id: &str) -> RemoteError {
        RemoteError::Status {
            status: StatusCode::NOT_FOUND,
            message: format!("{} {} not found", R::SCHEMA.label, id),
        }
    }
}

#[async_trait]
impl<R: Resource> Fetch<R> for FixtureSource {
    #[instrument(skip(self, _token), fields(resource = R::SCHEMA.path))]
    async fn list(&self, _token: Option<&str>, page: PageRequest) -> Result<Vec<R>, RemoteError> {
        let records = self
            .respond::<R, _>(|records| {
                let start = (page.page as usize).saturating_mul(page.size as usize);
                records.iter().skip(start).take(page.size as usize).cloned().collect::<Vec<_>>()
            })
            .await;
        debug!("🧪 Served {} fixture {}", records.len(), R::SCHEMA.plural);
        Ok(records)
    }
}

#[async_trait]
impl<R: Editable> Persist<R> for FixtureSource {
    async fn create(&self, _token: &str, payload: &R::Payload) -> Result<Option<R>, RemoteError> {
        let id = format!("{}{}", R::SCHEMA.id_prefix, self.next_id.fetch_add(1, Ordering::Relaxed));
        let record = R::from_payload(id, payload.clone());
        let stored = record.clone();
        self.respond::<R, _>(move |records| records.insert(0, stored)).await;
        Ok(Some(record))
    }

    async fn update(&self, _token: &str, id: &str, payload: &R::Payload) -> Result<Option<R>, RemoteError> {
        self.respond::<R, _>(|records| match records.iter_mut().find(|record| record.id() == id) {
            Some(record) => {
                record.apply(payload);
                Ok(Some(record.clone()))
            }
            None => Err(Self::not_found::<R>(id)),
        })
        .await
    }

    async fn delete(&self, _token: &str, id: &str) -> Result<(), RemoteError> {
        self.respond::<R, _>(|records| match records.iter().position(|record| record.id() == id) {
            Some(index) => {
                records.remove(index);
                Ok(())
            }
            None => Err(Self::not_found::<R>(id)),
        })
        .await
    }
}

#[async_trait]
impl StatusSource for FixtureSource {
    async fn aviary_status(&self, _token: Option<&str>) -> Result<AviaryStatus, RemoteError> {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        Ok(aviary_status())
    }
}

pub fn aviary_status() -> AviaryStatus {
    AviaryStatus {
        total_galinhas: 4800,
        nivel_amonia: 12.5,
        condicao: "BOA".to_string(),
    }
}

pub fn sensors() -> Vec<Sensor> {
    [
        ("S1", "Temperatura", ActiveStatus::Ativo, "D1"),
        ("S2", "Umidade", ActiveStatus::Ativo, "D3"),
        ("S3", "Amônia", ActiveStatus::Inativo, "D2"),
        ("S4", "CO2", ActiveStatus::Ativo, "D4"),
        ("S5", "Luminosidade", ActiveStatus::Ativo, "D5"),
    ]
    .into_iter()
    .map(|(id, tipo, status, dispositivo_id)| Sensor {
        id: id.to_string(),
        tipo: tipo.to_string(),
        status,
        dispositivo_id: dispositivo_id.to_string(),
    })
    .collect()
}

pub fn devices() -> Vec<Device> {
    [
        ("D1", "SN-001-ABC", ActiveStatus::Ativo, "A1"),
        ("D2", "SN-002-XYZ", ActiveStatus::Inativo, "A2"),
        ("D3", "SN-003-123", ActiveStatus::Ativo, "A1"),
    ]
    .into_iter()
    .map(|(id, serial, status, aviario_id)| Device {
        id: id.to_string(),
        serial: serial.to_string(),
        status,
        aviario_id: aviario_id.to_string(),
    })
    .collect()
}

pub fn aviaries() -> Vec<Aviary> {
    [
        ("A1", "Aviário Central", 5000.0, "Setor Norte", true),
        ("A2", "Aviário Experimental", 2000.0, "Setor Leste", true),
        ("A3", "Aviário Antigo", 1500.0, "Setor Sul", false),
    ]
    .into_iter()
    .map(|(id, nome, capacidade_maxima, localizacao, ativo)| Aviary {
        id: id.to_string(),
        nome: nome.to_string(),
        capacidade_maxima,
        localizacao: localizacao.to_string(),
        ativo,
    })
    .collect()
}

pub fn batches() -> Vec<Batch> {
    [("L1", "Lote Inicial", "A1"), ("L2", "Lote de Teste", "A2"), ("L3", "Lote Premium", "A3")]
        .into_iter()
        .map(|(id, descricao, aviario_id)| Batch {
            id: id.to_string(),
            descricao: descricao.to_string(),
            aviario_id: aviario_id.to_string(),
        })
        .collect()
}

pub fn people() -> Vec<Person> {
    [
        ("P1", "João da Silva", "joao.silva@example.com"),
        ("P2", "Maria Oliveira", "maria.oliveira@example.com"),
        ("P3", "Carlos Mendes", "carlos.mendes@example.com"),
    ]
    .into_iter()
    .map(|(id, nome, email)| Person {
        id: id.to_string(),
        nome: nome.to_string(),
        email: email.to_string(),
    })
    .collect()
}

pub fn actuators() -> Vec<Actuator> {
    [
        ("AT1", "Ventilador", PowerStatus::Ligado, "D1"),
        ("AT2", "Nebulizador", PowerStatus::Desligado, "D2"),
        ("AT3", "Aquecedor", PowerStatus::Desligado, "D3"),
    ]
    .into_iter()
    .map(|(id, tipo, status, dispositivo_id)| Actuator {
        id: id.to_string(),
        tipo: tipo.to_string(),
        status,
        dispositivo_id: dispositivo_id.to_string(),
    })
    .collect()
}

pub fn readings() -> Vec<Reading> {
    [("R1", "S1", "Temperatura", 23.5, 10), ("R2", "S2", "Umidade", 61.0, 20), ("R3", "S1", "Temperatura", 24.1, 25)]
        .into_iter()
        .map(|(id, id_sensor, tipo_sensor, value, minute)| Reading {
            id: id.to_string(),
            id_sensor: Some(id_sensor.to_string()),
            tipo_sensor: Some(tipo_sensor.to_string()),
            leitura: ReadingValue::Number(value),
            timestamp: Utc.with_ymd_and_hms(2025, 9, 23, 10, minute, 0).single(),
        })
        .collect()
}
