use chrono::{Local, NaiveDateTime};
use rand::seq::SliceRandom;
use serde::Serialize;

use super::require_session;
use crate::{
    models::{Appointment, HealthMetrics, Medicine},
    AppState,
};

pub const HEALTH_QUOTES: [&str; 5] = [
    "The greatest wealth is health.",
    "Take care of your body. It's the only place you have to live.",
    "Health is not valued until sickness comes.",
    "Your health is an investment, not an expense.",
    "The first wealth is health.",
];

// Used until onboarding has supplied usable numbers.
const DEFAULT_HEIGHT_CM: f64 = 175.0;
const DEFAULT_WEIGHT_KG: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn for_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            BmiCategory::Underweight
        } else if bmi < 25.0 {
            BmiCategory::Normal
        } else if bmi < 30.0 {
            BmiCategory::Overweight
        } else {
            BmiCategory::Obese
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bmi {
    /// Rounded to one decimal.
    pub value: f64,
    pub category: BmiCategory,
}

impl Bmi {
    pub fn from_measurements(height_cm: f64, weight_kg: f64) -> Option<Self> {
        if height_cm <= 0.0 || weight_kg <= 0.0 {
            return None;
        }
        let height_m = height_cm / 100.0;
        let value = (weight_kg / (height_m * height_m) * 10.0).round() / 10.0;
        Some(Self {
            value,
            category: BmiCategory::for_bmi(value),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub display_name: Option<String>,
    pub health_metrics: HealthMetrics,
    pub bmi: Option<Bmi>,
    pub next_appointment: Option<Appointment>,
    pub next_medicine: Option<Medicine>,
    pub unread_notifications: usize,
    pub quote: &'static str,
}

/// Earliest appointment at or after `now`.
pub fn next_appointment(appointments: &[Appointment], now: NaiveDateTime) -> Option<Appointment> {
    appointments
        .iter()
        .filter(|appointment| appointment.date.and_time(appointment.time) >= now)
        .min_by_key(|appointment| (appointment.date, appointment.time))
        .cloned()
}

/// The unexpired medicine due soonest: later today if any dose remains,
/// otherwise the first dose tomorrow.
pub fn next_medicine(medicines: &[Medicine], now: NaiveDateTime) -> Option<Medicine> {
    let today = now.date();
    let time = now.time();
    let active = medicines
        .iter()
        .filter(|medicine| !medicine.is_expired_on(today));

    active
        .clone()
        .filter(|medicine| medicine.time_to_take >= time)
        .min_by_key(|medicine| medicine.time_to_take)
        .or_else(|| active.min_by_key(|medicine| medicine.time_to_take))
        .cloned()
}

pub fn random_quote() -> &'static str {
    HEALTH_QUOTES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(HEALTH_QUOTES[0])
}

pub async fn get_dashboard(state: &AppState) -> Result<DashboardSummary, String> {
    let user = require_session(state)?;
    let snapshot = state.store.snapshot();
    let now = Local::now().naive_local();

    let (height, weight) = {
        let wizard = state.onboarding.lock().await;
        let profile = wizard.profile();
        (
            profile.height.trim().parse().unwrap_or(DEFAULT_HEIGHT_CM),
            profile.weight.trim().parse().unwrap_or(DEFAULT_WEIGHT_KG),
        )
    };

    Ok(DashboardSummary {
        display_name: user.display_name,
        health_metrics: snapshot.health_metrics,
        bmi: Bmi::from_measurements(height, weight),
        next_appointment: next_appointment(&snapshot.appointments, now),
        next_medicine: next_medicine(&snapshot.medicines, now),
        unread_notifications: snapshot
            .notifications
            .iter()
            .filter(|notification| !notification.read)
            .count(),
        quote: random_quote(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .unwrap()
            .and_time(NaiveTime::parse_from_str(time, "%H:%M").unwrap())
    }

    fn medicine(id: &str, time: &str, expiry: &str) -> Medicine {
        Medicine {
            id: id.into(),
            name: id.into(),
            dosage: "100mg".into(),
            frequency: "daily".into(),
            time_to_take: NaiveTime::parse_from_str(time, "%H:%M").unwrap(),
            expiry_date: NaiveDate::parse_from_str(expiry, "%Y-%m-%d").unwrap(),
            stock: 10,
        }
    }

    #[test]
    fn default_measurements_are_normal() {
        let bmi = Bmi::from_measurements(DEFAULT_HEIGHT_CM, DEFAULT_WEIGHT_KG).unwrap();
        assert_eq!(bmi.value, 22.9);
        assert_eq!(bmi.category, BmiCategory::Normal);
    }

    #[test]
    fn bmi_category_boundaries() {
        assert_eq!(BmiCategory::for_bmi(18.4), BmiCategory::Underweight);
        assert_eq!(BmiCategory::for_bmi(18.5), BmiCategory::Normal);
        assert_eq!(BmiCategory::for_bmi(25.0), BmiCategory::Overweight);
        assert_eq!(BmiCategory::for_bmi(30.0), BmiCategory::Obese);
        assert!(Bmi::from_measurements(0.0, 70.0).is_none());
    }

    #[test]
    fn past_appointments_are_skipped() {
        let appointments = vec![
            Appointment {
                id: "past".into(),
                doctor_name: "Dr. A".into(),
                date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                notes: None,
            },
            Appointment {
                id: "later".into(),
                doctor_name: "Dr. B".into(),
                date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                notes: None,
            },
            Appointment {
                id: "soon".into(),
                doctor_name: "Dr. C".into(),
                date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                time: NaiveTime::from_hms_opt(15, 30, 0).unwrap(),
                notes: None,
            },
        ];
        let next = next_appointment(&appointments, at("2026-01-15", "08:00")).unwrap();
        assert_eq!(next.id, "soon");
    }

    #[test]
    fn next_dose_wraps_to_tomorrow() {
        let medicines = vec![
            medicine("morning", "08:00", "2027-01-01"),
            medicine("evening", "20:00", "2027-01-01"),
            medicine("expired", "21:00", "2026-01-01"),
        ];
        let now = at("2026-06-01", "12:00");
        assert_eq!(next_medicine(&medicines, now).unwrap().id, "evening");

        let late = at("2026-06-01", "22:00");
        assert_eq!(next_medicine(&medicines, late).unwrap().id, "morning");
    }

    #[test]
    fn quote_comes_from_the_list() {
        assert!(HEALTH_QUOTES.contains(&random_quote()));
    }
}
