use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OnboardingField {
    FullName,
    DateOfBirth,
    Height,
    Weight,
    BloodType,
    Allergies,
    ChronicConditions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    Text,
    Date,
    Number,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    pub field: OnboardingField,
    pub label: &'static str,
    pub kind: FieldKind,
    pub placeholder: &'static str,
    pub required: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSpec {
    pub id: u8,
    pub title: &'static str,
    pub description: &'static str,
    pub fields: &'static [FieldSpec],
}

pub static STEPS: [StepSpec; 3] = [
    StepSpec {
        id: 1,
        title: "Personal Information",
        description: "Let us know a bit about you",
        fields: &[
            FieldSpec {
                field: OnboardingField::FullName,
                label: "Full Name",
                kind: FieldKind::Text,
                placeholder: "Enter your full name",
                required: true,
            },
            FieldSpec {
                field: OnboardingField::DateOfBirth,
                label: "Date of Birth",
                kind: FieldKind::Date,
                placeholder: "Select your date of birth",
                required: true,
            },
        ],
    },
    StepSpec {
        id: 2,
        title: "Health Metrics",
        description: "Basic health information to personalize your experience",
        fields: &[
            FieldSpec {
                field: OnboardingField::Height,
                label: "Height (cm)",
                kind: FieldKind::Number,
                placeholder: "Enter your height in cm",
                required: true,
            },
            FieldSpec {
                field: OnboardingField::Weight,
                label: "Weight (kg)",
                kind: FieldKind::Number,
                placeholder: "Enter your weight in kg",
                required: true,
            },
            FieldSpec {
                field: OnboardingField::BloodType,
                label: "Blood Type",
                kind: FieldKind::Text,
                placeholder: "e.g., A+, B-, O+",
                required: false,
            },
        ],
    },
    StepSpec {
        id: 3,
        title: "Medical Information",
        description: "Optional but helpful for better health recommendations",
        fields: &[
            FieldSpec {
                field: OnboardingField::Allergies,
                label: "Allergies",
                kind: FieldKind::Text,
                placeholder: "List any allergies (or type \"None\")",
                required: false,
            },
            FieldSpec {
                field: OnboardingField::ChronicConditions,
                label: "Chronic Conditions",
                kind: FieldKind::Text,
                placeholder: "List any chronic conditions (or type \"None\")",
                required: false,
            },
        ],
    },
];
