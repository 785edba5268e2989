//! Record types held by the ledger

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque caller identity supplied by the host's identity layer
///
/// The ledger never interprets the value; equality is byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Sequential part identifier, assigned from 1 and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(pub u64);

impl PartId {
    pub const FIRST: PartId = PartId(1);

    pub fn next(self) -> PartId {
        PartId(self.0 + 1)
    }
}

impl fmt::Display for PartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stakeholder role
///
/// Numeric codes follow the registration ABI: 0 = None through 4 = Regulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Role {
    #[default]
    None,
    Manufacturer,
    Airline,
    #[serde(rename = "MRO")]
    Mro,
    Regulator,
}

impl Role {
    pub fn code(self) -> u8 {
        match self {
            Role::None => 0,
            Role::Manufacturer => 1,
            Role::Airline => 2,
            Role::Mro => 3,
            Role::Regulator => 4,
        }
    }

    /// Plural noun used in guard rejection reasons
    pub(crate) fn plural(self) -> &'static str {
        match self {
            Role::None => "unassigned stakeholders",
            Role::Manufacturer => "manufacturers",
            Role::Airline => "airlines",
            Role::Mro => "MROs",
            Role::Regulator => "regulators",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::None => "None",
            Role::Manufacturer => "Manufacturer",
            Role::Airline => "Airline",
            Role::Mro => "MRO",
            Role::Regulator => "Regulator",
        };
        f.write_str(name)
    }
}

impl TryFrom<u8> for Role {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Role::None),
            1 => Ok(Role::Manufacturer),
            2 => Ok(Role::Airline),
            3 => Ok(Role::Mro),
            4 => Ok(Role::Regulator),
            other => Err(format!("unknown role code: {}", other)),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u8>() {
            return Role::try_from(code);
        }
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(Role::None),
            "manufacturer" => Ok(Role::Manufacturer),
            "airline" => Ok(Role::Airline),
            "mro" => Ok(Role::Mro),
            "regulator" => Ok(Role::Regulator),
            _ => Err(format!("unknown role: {}", s)),
        }
    }
}

/// Lifecycle status of a part
///
/// No transition graph is enforced; the current owner may set any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PartStatus {
    #[default]
    Manufactured,
    InTransit,
    Installed,
    InMaintenance,
    Retired,
}

impl PartStatus {
    pub const ALL: [PartStatus; 5] = [
        PartStatus::Manufactured,
        PartStatus::InTransit,
        PartStatus::Installed,
        PartStatus::InMaintenance,
        PartStatus::Retired,
    ];

    pub fn code(self) -> u8 {
        match self {
            PartStatus::Manufactured => 0,
            PartStatus::InTransit => 1,
            PartStatus::Installed => 2,
            PartStatus::InMaintenance => 3,
            PartStatus::Retired => 4,
        }
    }
}

impl fmt::Display for PartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl TryFrom<u8> for PartStatus {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        PartStatus::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| format!("unknown part status code: {}", code))
    }
}

impl FromStr for PartStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u8>() {
            return PartStatus::try_from(code);
        }
        PartStatus::ALL
            .iter()
            .copied()
            .find(|status| status.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown part status: {}", s))
    }
}

/// A registered participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub identity: Address,
    pub name: String,
    pub role: Role,
    pub active: bool,
    pub registered_at: DateTime<Utc>,
}

/// A tracked physical part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub id: PartId,
    pub part_number: String,
    pub serial_number: String,
    pub part_name: String,
    /// Stakeholder that registered the part; never changes
    pub manufacturer: Address,
    pub current_owner: Address,
    pub status: PartStatus,
    /// Opaque reference into an external document store
    pub certificate_ref: String,
    pub manufactured_at: DateTime<Utc>,
}

/// One entry in a part's custody log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyRecord {
    pub from: Address,
    pub to: Address,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
}

/// One entry in a part's maintenance log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub performed_by: Address,
    pub maintenance_type: String,
    /// Opaque reference to the maintenance report
    pub report_ref: String,
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}
