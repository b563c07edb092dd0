use std::time::{Duration, Instant};

use crate::config::Config;
use crate::domain::{Appointment, ClockSnapshot, RateQuote, Remote, WeatherReading};
use crate::infrastructure::runtime::RuntimeEvent;
use crate::store::SettingsStore;

/// Sections reachable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Inicio,
    Pacientes,
    Turnos,
    Reportes,
    Historial,
    Configuracion,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Inicio,
        Section::Pacientes,
        Section::Turnos,
        Section::Reportes,
        Section::Historial,
        Section::Configuracion,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Inicio => "Inicio",
            Section::Pacientes => "Pacientes",
            Section::Turnos => "Turnos",
            Section::Reportes => "Reportes",
            Section::Historial => "Historial Clínico",
            Section::Configuracion => "Configuración",
        }
    }

    pub fn shortcut(&self) -> char {
        match self {
            Section::Inicio => '1',
            Section::Pacientes => '2',
            Section::Turnos => '3',
            Section::Reportes => '4',
            Section::Historial => '5',
            Section::Configuracion => '6',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
    pub since: Instant,
}

#[derive(Debug)]
pub struct App {
    pub config: Config,
    /// Current sidebar selection
    pub active_section: Section,
    /// In-memory only; every fresh start expands the sidebar again
    pub sidebar_collapsed: bool,
    /// Mirrored to the settings store on every toggle
    pub dark_mode: bool,
    pub clock: Option<ClockSnapshot>,
    pub weather: Remote<WeatherReading>,
    pub dolar: Remote<RateQuote>,
    pub appointments: Vec<Appointment>,
    pub selected_appointment: usize,
    pub settings_store: Option<SettingsStore>,
    pub status: Option<StatusMessage>,
    pub help_open: bool,
    pub pending_refresh_request: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let appointments = config.appointments.clone();
        Self {
            config,
            active_section: Section::Inicio,
            sidebar_collapsed: false,
            dark_mode: false,
            clock: None,
            weather: Remote::Loading,
            dolar: Remote::Loading,
            appointments,
            selected_appointment: 0,
            settings_store: None,
            status: None,
            help_open: false,
            pending_refresh_request: false,
            should_quit: false,
        }
    }

    /// Adopt the settings store and read the persisted theme flag.
    pub fn attach_settings_store(&mut self, store: SettingsStore) {
        match store.dark_mode() {
            Ok(dark) => self.dark_mode = dark,
            Err(err) => self.set_status(
                format!("No se pudo leer el tema guardado: {err:#}"),
                StatusLevel::Warn,
            ),
        }
        self.settings_store = Some(store);
    }

    pub fn set_status(&mut self, text: impl Into<String>, level: StatusLevel) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level,
            since: Instant::now(),
        });
    }

    pub fn status_text(&self) -> Option<(&str, StatusLevel)> {
        self.status
            .as_ref()
            .map(|status| (status.text.as_str(), status.level))
    }

    pub fn on_tick(&mut self) {
        if let Some(status) = self.status.as_ref() {
            if status.since.elapsed() > Duration::from_secs(3) {
                self.status = None;
            }
        }
        self.clamp_selection();
    }

    /// Fold one background event into the widget state.
    pub fn apply_event(&mut self, event: RuntimeEvent) {
        match event {
            RuntimeEvent::Clock(snapshot) => self.clock = Some(snapshot),
            RuntimeEvent::Weather(outcome) => self.weather = outcome.into(),
            RuntimeEvent::Dolar(outcome) => self.dolar = outcome.into(),
        }
    }

    /// Flip the theme, persist it, and announce the new mode.
    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        if let Some(store) = self.settings_store.as_ref() {
            if let Err(err) = store.set_dark_mode(self.dark_mode) {
                self.set_status(
                    format!("No se pudo guardar el tema: {err:#}"),
                    StatusLevel::Error,
                );
                return;
            }
        }
        let name = if self.dark_mode { "Oscuro" } else { "Claro" };
        self.set_status(format!("Tema {name} activado"), StatusLevel::Info);
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_collapsed = !self.sidebar_collapsed;
    }

    pub fn toggle_help(&mut self) {
        self.help_open = !self.help_open;
    }

    pub fn cycle_section(&mut self, forward: bool) {
        let index = Section::ALL
            .iter()
            .position(|section| *section == self.active_section)
            .unwrap_or(0);
        let next = if forward {
            (index + 1) % Section::ALL.len()
        } else {
            (index + Section::ALL.len() - 1) % Section::ALL.len()
        };
        self.active_section = Section::ALL[next];
    }

    pub fn set_section(&mut self, section: Section) {
        self.active_section = section;
    }

    pub fn move_selection_up(&mut self) {
        if self.selected_appointment > 0 {
            self.selected_appointment -= 1;
        }
    }

    pub fn move_selection_down(&mut self) {
        if self.selected_appointment + 1 < self.appointments.len() {
            self.selected_appointment += 1;
        }
    }

    pub fn current_appointment(&self) -> Option<&Appointment> {
        self.appointments.get(self.selected_appointment)
    }

    /// Queue a manual refresh; the main loop forwards it to the worker.
    pub fn request_refresh(&mut self) {
        self.pending_refresh_request = true;
        self.set_status("Actualizando clima y dólar…", StatusLevel::Info);
    }

    pub fn take_refresh_request(&mut self) -> bool {
        if self.pending_refresh_request {
            self.pending_refresh_request = false;
            true
        } else {
            false
        }
    }

    pub fn clinic_whatsapp_link(&self) -> String {
        format!("https://wa.me/{}", self.config.clinic.whatsapp)
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    fn clamp_selection(&mut self) {
        if self.appointments.is_empty() {
            self.selected_appointment = 0;
        } else if self.selected_appointment >= self.appointments.len() {
            self.selected_appointment = self.appointments.len() - 1;
        }
    }
}
