use serde::{Deserialize, Serialize};

use super::{require, Patch, Record, ValidationError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmergencyContact {
    pub id: String,
    pub name: String,
    pub relationship: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmergencyContactPatch {
    pub name: Option<String>,
    pub relationship: Option<String>,
    pub phone_number: Option<String>,
}

impl Patch for EmergencyContactPatch {
    type Target = EmergencyContact;
}

impl Record for EmergencyContact {
    type Patch = EmergencyContactPatch;

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require("Name", &self.name)?;
        require("Relationship", &self.relationship)?;
        require("Phone number", &self.phone_number)
    }

    fn apply(&mut self, patch: EmergencyContactPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(relationship) = patch.relationship {
            self.relationship = relationship;
        }
        if let Some(phone_number) = patch.phone_number {
            self.phone_number = phone_number;
        }
    }
}

impl From<EmergencyContact> for EmergencyContactPatch {
    fn from(contact: EmergencyContact) -> Self {
        Self {
            name: Some(contact.name),
            relationship: Some(contact.relationship),
            phone_number: Some(contact.phone_number),
        }
    }
}
