use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{require, Patch, Record, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: String,
    pub doctor_name: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppointmentPatch {
    pub doctor_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    /// `Some(None)` clears the notes.
    pub notes: Option<Option<String>>,
}

impl Patch for AppointmentPatch {
    type Target = Appointment;
}

impl Record for Appointment {
    type Patch = AppointmentPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("Doctor name", &self.doctor_name)
    }

    fn apply(&mut self, patch: AppointmentPatch) {
        if let Some(doctor_name) = patch.doctor_name {
            self.doctor_name = doctor_name;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

impl From<Appointment> for AppointmentPatch {
    /// A full-form edit: every field of the submitted form overwrites the stored one.
    fn from(appointment: Appointment) -> Self {
        Self {
            doctor_name: Some(appointment.doctor_name),
            date: Some(appointment.date),
            time: Some(appointment.time),
            notes: Some(appointment.notes),
        }
    }
}
