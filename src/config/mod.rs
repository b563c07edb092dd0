use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::Appointment;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Professional shown on the dashboard card.
    pub name: String,
    pub specialty: String,
    /// Professional shown at the sidebar footer.
    pub on_call: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            name: "Dr. Juan Pérez".to_string(),
            specialty: "Especialista en Terapia Cognitiva".to_string(),
            on_call: "Dr. Tomás".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClinicConfig {
    /// Front-desk WhatsApp number used by the sidebar shortcut.
    pub whatsapp: String,
}

impl Default for ClinicConfig {
    fn default() -> Self {
        Self {
            whatsapp: "1234567890".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL of the clinic server exposing `/api/weather`.
    pub url: String,
    pub city: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:3000".to_string(),
            city: "Buenos Aires".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DolarConfig {
    pub url: String,
}

impl Default for DolarConfig {
    fn default() -> Self {
        Self {
            url: "https://dolarapi.com/v1/dolares/oficial".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub profile: ProfileConfig,
    pub clinic: ClinicConfig,
    pub weather: WeatherConfig,
    pub dolar: DolarConfig,
    pub appointments: Vec<Appointment>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: ProfileConfig::default(),
            clinic: ClinicConfig::default(),
            weather: WeatherConfig::default(),
            dolar: DolarConfig::default(),
            appointments: default_appointments(),
        }
    }
}

fn default_appointments() -> Vec<Appointment> {
    vec![
        Appointment {
            name: "María López".to_string(),
            time: "10:30 AM".to_string(),
            phone: "123456789".to_string(),
        },
        Appointment {
            name: "Carlos Gómez".to_string(),
            time: "11:15 AM".to_string(),
            phone: "987654321".to_string(),
        },
        Appointment {
            name: "Ana Torres".to_string(),
            time: "2:00 PM".to_string(),
            phone: "1122334455".to_string(),
        },
    ]
}

pub fn load(override_path: Option<&Path>) -> Config {
    let path = match override_path {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Some(path) => path,
            None => return Config::default(),
        },
    };
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(_) => return Config::default(),
    };
    toml::from_str::<Config>(&content).unwrap_or_default()
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("MEDAPP_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("medapp").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("medapp").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "medapp", "medapp")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

pub fn data_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from) {
        return Some(xdg.join("medapp"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".local").join("share").join("medapp"));
    }
    directories::ProjectDirs::from("io", "medapp", "medapp")
        .map(|dirs| dirs.data_dir().to_path_buf())
}

pub fn settings_db_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("settings.sqlite3"))
}

pub fn log_file_path() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("medapp.log"))
}
