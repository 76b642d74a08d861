//! Scripted health assistant.
//!
//! Replies come from an ordered keyword table evaluated against the
//! lower-cased input. The first matching rule wins; nothing is learned or
//! remembered between calls.

pub mod chat;
pub mod commands;

pub use chat::{ChatMessage, ChatSession, Persona, Sender};

use crate::models::HealthMetrics;

pub const FALLBACK_REPLY: &str = "Thank you for your message. As your health assistant, I can help with tracking health metrics, medication reminders, appointment scheduling, and general health information. Could you please provide more details about what you'd like to know?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    HeartRate,
    Steps,
    Sleep,
    HealthScore,
    Medicine,
    Appointment,
    Emergency,
    Greeting,
}

impl Topic {
    fn reply(self, metrics: &HealthMetrics) -> String {
        match self {
            Topic::HeartRate => format!(
                "Your current heart rate is {} bpm, which is within the normal range for most adults (60-100 bpm). Regular cardiovascular exercise can help maintain a healthy heart rate.",
                metrics.heart_rate
            ),
            Topic::Steps => format!(
                "You've taken {} steps today. The recommended daily goal is 10,000 steps. Regular walking has numerous health benefits including improved cardiovascular fitness and weight management.",
                metrics.steps
            ),
            Topic::Sleep => format!(
                "You slept for {} hours and {} minutes last night. Adults typically need 7-9 hours of quality sleep per night. Consistent sleep patterns can improve overall health and cognitive function.",
                metrics.sleep_hours, metrics.sleep_minutes
            ),
            Topic::HealthScore => format!(
                "Your current health score is {}/100. This score is calculated based on your activity levels, sleep patterns, heart rate, and other health metrics. Continue with your healthy habits to maintain or improve this score.",
                metrics.health_score
            ),
            Topic::Medicine => "I can help you track your medications and send reminders when it's time to take them. Would you like to add a new medication to your schedule or check your existing medications?".into(),
            Topic::Appointment => "You can manage your doctor appointments in the Appointments section. Would you like me to help you schedule a new appointment or remind you about upcoming ones?".into(),
            Topic::Emergency => "In case of a medical emergency, please call emergency services immediately at 911. You can also access your emergency contacts in the Emergency section of the app.".into(),
            Topic::Greeting => "Hello! I'm your CUREXO health assistant. I can help you track your health metrics, manage medications, schedule appointments, and provide health information. How can I assist you today?".into(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Keywords {
    /// At least one keyword occurs.
    Any(&'static [&'static str]),
    /// Every keyword occurs.
    All(&'static [&'static str]),
}

impl Keywords {
    fn matches(self, input: &str) -> bool {
        match self {
            Keywords::Any(words) => words.iter().any(|word| input.contains(word)),
            Keywords::All(words) => words.iter().all(|word| input.contains(word)),
        }
    }
}

struct Rule {
    keywords: Keywords,
    topic: Topic,
}

static RULES: [Rule; 8] = [
    Rule {
        keywords: Keywords::Any(&["heart", "pulse", "bpm"]),
        topic: Topic::HeartRate,
    },
    Rule {
        keywords: Keywords::Any(&["steps", "walking", "activity"]),
        topic: Topic::Steps,
    },
    Rule {
        keywords: Keywords::Any(&["sleep", "rest", "tired"]),
        topic: Topic::Sleep,
    },
    Rule {
        keywords: Keywords::All(&["health", "score"]),
        topic: Topic::HealthScore,
    },
    Rule {
        keywords: Keywords::Any(&["medicine", "medication", "pill"]),
        topic: Topic::Medicine,
    },
    Rule {
        keywords: Keywords::Any(&["appointment", "doctor", "visit"]),
        topic: Topic::Appointment,
    },
    Rule {
        keywords: Keywords::Any(&["emergency"]),
        topic: Topic::Emergency,
    },
    Rule {
        keywords: Keywords::Any(&["hello", "hi", "hey"]),
        topic: Topic::Greeting,
    },
];

/// First rule matching `input`, by plain substring search.
pub fn classify(input: &str) -> Option<Topic> {
    let input = input.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.keywords.matches(&input))
        .map(|rule| rule.topic)
}

pub fn respond(input: &str, metrics: &HealthMetrics) -> String {
    match classify(input) {
        Some(topic) => topic.reply(metrics),
        None => FALLBACK_REPLY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_reply_uses_live_metrics() {
        let reply = respond("How many STEPS did I take?", &HealthMetrics::default());
        assert!(reply.contains("6532"));
        assert!(reply.starts_with("You've taken 6532 steps today."));
    }

    #[test]
    fn earlier_rules_win() {
        assert_eq!(classify("my heart and my sleep"), Some(Topic::HeartRate));
        assert_eq!(classify("tired after my doctor visit"), Some(Topic::Sleep));
    }

    #[test]
    fn health_score_needs_both_words() {
        assert_eq!(classify("what is my health score"), Some(Topic::HealthScore));
        assert_eq!(classify("score"), None);
        assert_eq!(classify("health"), None);
    }

    #[test]
    fn greeting_matches_inside_words() {
        assert_eq!(classify("Hey"), Some(Topic::Greeting));
        assert_eq!(classify("this"), Some(Topic::Greeting));
    }

    #[test]
    fn sleep_reply_interpolates_hours_and_minutes() {
        let metrics = HealthMetrics {
            sleep_hours: 6,
            sleep_minutes: 5,
            ..HealthMetrics::default()
        };
        assert!(respond("I feel tired", &metrics).starts_with("You slept for 6 hours and 5 minutes"));
    }

    #[test]
    fn unmatched_input_gets_fallback() {
        assert_eq!(respond("qwerty", &HealthMetrics::default()), FALLBACK_REPLY);
        assert_eq!(respond("", &HealthMetrics::default()), FALLBACK_REPLY);
    }
}
