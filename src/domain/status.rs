use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActiveStatus {
    Ativo,
    Inativo,
}

impl ActiveStatus {
    pub const OPTIONS: &'static [&'static str] = &["ATIVO", "INATIVO"];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveStatus::Ativo => "ATIVO",
            ActiveStatus::Inativo => "INATIVO",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ActiveStatus::Ativo)
    }
}

impl FromStr for ActiveStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ATIVO" => Ok(ActiveStatus::Ativo),
            "INATIVO" => Ok(ActiveStatus::Inativo),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl Display for ActiveStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PowerStatus {
    Ligado,
    Desligado,
}

impl PowerStatus {
    pub const OPTIONS: &'static [&'static str] = &["LIGADO", "DESLIGADO"];

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerStatus::Ligado => "LIGADO",
            PowerStatus::Desligado => "DESLIGADO",
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, PowerStatus::Ligado)
    }
}

impl FromStr for PowerStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "LIGADO" => Ok(PowerStatus::Ligado),
            "DESLIGADO" => Ok(PowerStatus::Desligado),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl Display for PowerStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

/// The aviary's `ativo` flag travels as `1`/`0` on the wire.
pub mod int_flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Flag {
            Int(i64),
            Bool(bool),
        }

        match Flag::deserialize(deserializer)? {
            Flag::Int(0) => Ok(false),
            Flag::Int(1) => Ok(true),
            Flag::Int(other) => Err(serde::de::Error::custom(format!("invalid flag: {}", other))),
            Flag::Bool(value) => Ok(value),
        }
    }
}
