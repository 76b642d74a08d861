use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{require, Patch, Record, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub time_to_take: NaiveTime,
    pub expiry_date: NaiveDate,
    /// Unsigned, so a stock count can never go negative.
    pub stock: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicinePatch {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub time_to_take: Option<NaiveTime>,
    pub expiry_date: Option<NaiveDate>,
    pub stock: Option<u32>,
}

impl Medicine {
    pub fn is_expired_on(&self, day: NaiveDate) -> bool {
        self.expiry_date < day
    }
}

impl Patch for MedicinePatch {
    type Target = Medicine;
}

impl Record for Medicine {
    type Patch = MedicinePatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("Medicine name", &self.name)?;
        require("Dosage", &self.dosage)?;
        require("Frequency", &self.frequency)
    }

    fn apply(&mut self, patch: MedicinePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(dosage) = patch.dosage {
            self.dosage = dosage;
        }
        if let Some(frequency) = patch.frequency {
            self.frequency = frequency;
        }
        if let Some(time_to_take) = patch.time_to_take {
            self.time_to_take = time_to_take;
        }
        if let Some(expiry_date) = patch.expiry_date {
            self.expiry_date = expiry_date;
        }
        if let Some(stock) = patch.stock {
            self.stock = stock;
        }
    }
}

impl From<Medicine> for MedicinePatch {
    fn from(medicine: Medicine) -> Self {
        Self {
            name: Some(medicine.name),
            dosage: Some(medicine.dosage),
            frequency: Some(medicine.frequency),
            time_to_take: Some(medicine.time_to_take),
            expiry_date: Some(medicine.expiry_date),
            stock: Some(medicine.stock),
        }
    }
}
