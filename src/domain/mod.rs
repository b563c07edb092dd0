//! Core data model: clock snapshots, remote widget values, and the
//! wire shapes of the weather and dolarapi endpoints.

use chrono::{DateTime, Local};
use serde::Deserialize;

/// Fixed video-call origination URL offered for every appointment.
pub const VIDEO_CALL_URL: &str = "https://meet.google.com/new";

/// Formatted local date and time, recomputed once per clock tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockSnapshot {
    /// Date as dd/mm/yyyy.
    pub date: String,
    /// Time as HH:MM (24h).
    pub time: String,
}

impl ClockSnapshot {
    /// Capture the current local date and time.
    pub fn now() -> Self {
        Self::at(Local::now())
    }

    fn at(moment: DateTime<Local>) -> Self {
        Self {
            date: moment.format("%d/%m/%Y").to_string(),
            time: moment.format("%H:%M").to_string(),
        }
    }
}

/// State of one remote-data widget. Always exactly one of the three:
/// nothing mixed, no stale error alongside a value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Remote<T> {
    /// No fetch has resolved yet.
    #[default]
    Loading,
    /// Last successful fetch result, shown as-is.
    Ready(T),
    /// Retry budget exhausted; holds the widget's error message.
    Failed(String),
}

impl<T> Remote<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Remote::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Remote::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Remote::Loading)
    }
}

impl<T> From<Result<T, String>> for Remote<T> {
    fn from(outcome: Result<T, String>) -> Self {
        match outcome {
            Ok(value) => Remote::Ready(value),
            Err(message) => Remote::Failed(message),
        }
    }
}

/// Weather endpoint response, kept in its wire shape so the published
/// value is exactly the parsed body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherReading {
    pub location: WeatherLocation,
    pub current: WeatherCurrent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherLocation {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherCurrent {
    pub temp_c: f64,
}

/// One quote from dolarapi (`/v1/dolares/oficial`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateQuote {
    pub compra: f64,
    pub venta: f64,
    pub casa: String,
    pub nombre: String,
    pub moneda: String,
    #[serde(rename = "fechaActualizacion")]
    pub fecha_actualizacion: String,
}

/// One upcoming appointment. The list is static for the day; rows are
/// never mutated at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Appointment {
    pub name: String,
    pub time: String,
    pub phone: String,
}

impl Appointment {
    /// WhatsApp deep link for this appointment's phone number.
    pub fn whatsapp_link(&self) -> String {
        format!("https://wa.me/{}", self.phone)
    }
}
