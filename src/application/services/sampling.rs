//! Alert Sampling
//!
//! Decides whether an accepted event also produces an `alert` message.
//! Injected into the event processor so tests can force or suppress alerts.

use rand::Rng;
use serde_json::json;

use crate::config::SamplingSettings;
use crate::domain::{Alert, VisitorEvent};

/// Rule deciding whether an event triggers a supplementary alert.
#[cfg_attr(test, mockall::automock)]
pub trait SamplingPolicy: Send + Sync {
    /// Return the alert to publish for `event`, if any.
    ///
    /// `recent_visitors` is the number of sessions active within the
    /// configured recent window, including the event's own session.
    fn sample(&self, event: &VisitorEvent, recent_visitors: usize) -> Option<Alert>;
}

/// Level and text shared by every alert a policy emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertTemplate {
    pub level: String,
    pub message: String,
}

impl AlertTemplate {
    pub fn new(level: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            message: message.into(),
        }
    }

    pub fn render(&self, recent_visitors: usize) -> Alert {
        Alert {
            level: self.level.clone(),
            message: self.message.clone(),
            details: json!({ "visitorsLastMinute": recent_visitors }),
        }
    }
}

impl Default for AlertTemplate {
    fn default() -> Self {
        Self::new("info", "New visitor spike detected!")
    }
}

/// Independent fixed-probability trigger per event.
#[derive(Debug, Clone)]
pub struct RandomSampling {
    probability: f64,
    template: AlertTemplate,
}

impl RandomSampling {
    /// `probability` is clamped to [0, 1].
    pub fn new(probability: f64, template: AlertTemplate) -> Self {
        let probability = if probability.is_nan() {
            0.0
        } else {
            probability.clamp(0.0, 1.0)
        };
        Self {
            probability,
            template,
        }
    }

    pub fn from_settings(settings: &SamplingSettings) -> Self {
        Self::new(
            settings.alert_probability,
            AlertTemplate::new(&settings.alert_level, &settings.alert_message),
        )
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl SamplingPolicy for RandomSampling {
    fn sample(&self, _event: &VisitorEvent, recent_visitors: usize) -> Option<Alert> {
        rand::rng()
            .random_bool(self.probability)
            .then(|| self.template.render(recent_visitors))
    }
}

/// Never emits alerts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSample;

impl SamplingPolicy for NeverSample {
    fn sample(&self, _event: &VisitorEvent, _recent_visitors: usize) -> Option<Alert> {
        None
    }
}

/// Emits an alert for every event.
#[derive(Debug, Clone, Default)]
pub struct AlwaysSample {
    pub template: AlertTemplate,
}

impl SamplingPolicy for AlwaysSample {
    fn sample(&self, _event: &VisitorEvent, recent_visitors: usize) -> Option<Alert> {
        Some(self.template.render(recent_visitors))
    }
}
