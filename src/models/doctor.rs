use serde::{Deserialize, Serialize};

use super::{require, Patch, Record, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoctorPatch {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<Option<String>>,
    pub email: Option<Option<String>>,
}

impl Patch for DoctorPatch {
    type Target = Doctor;
}

impl Record for Doctor {
    type Patch = DoctorPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("Doctor name", &self.name)?;
        require("Specialty", &self.specialty)?;
        require("Phone number", &self.phone_number)
    }

    fn apply(&mut self, patch: DoctorPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(specialty) = patch.specialty {
            self.specialty = specialty;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = phone_number;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(email) = patch.email {
            self.email = email;
        }
    }
}

impl From<Doctor> for DoctorPatch {
    fn from(doctor: Doctor) -> Self {
        Self {
            name: Some(doctor.name),
            specialty: Some(doctor.specialty),
            phone_number: Some(doctor.phone_number),
            address: Some(doctor.address),
            email: Some(doctor.email),
        }
    }
}
