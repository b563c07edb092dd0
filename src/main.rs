mod app;
mod config;
mod domain;
mod infrastructure;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::info;

use crate::app::{App, Section, StatusLevel};
use crate::domain::VIDEO_CALL_URL;
use crate::infrastructure::runtime::{RefreshPolicy, RuntimeBridge, RuntimeCommand};
use crate::infrastructure::sources::{DolarSource, WeatherSource};
use crate::store::SettingsStore;

#[derive(Debug, Parser)]
#[command(
    name = "medapp",
    version,
    about = "MedApp: clinic front-desk dashboard in the terminal"
)]
struct Args {
    /// Config file path (default: $XDG_CONFIG_HOME/medapp/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// City for the weather widget
    #[arg(long)]
    city: Option<String>,

    /// Base URL of the server exposing /api/weather
    #[arg(long)]
    weather_url: Option<String>,

    /// Full URL of the dollar quote endpoint
    #[arg(long)]
    dolar_url: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = config::load(args.config.as_deref());
    if let Some(city) = args.city {
        config.weather.city = city;
    }
    if let Some(url) = args.weather_url {
        config.weather.url = url;
    }
    if let Some(url) = args.dolar_url {
        config.dolar.url = url;
    }

    init_logging();
    info!(city = %config.weather.city, "starting medapp");

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let runtime = RuntimeBridge::new(
        WeatherSource::new(&config.weather.url, &config.weather.city),
        DolarSource::new(&config.dolar.url),
        RefreshPolicy::default(),
    )?;

    let mut app = App::new(config);

    if let Some(db_path) = config::settings_db_path() {
        if let Some(parent) = db_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match SettingsStore::open(&db_path) {
            Ok(store) => app.attach_settings_store(store),
            Err(err) => {
                app.set_status(
                    format!("Ajustes deshabilitados: {err:#}"),
                    StatusLevel::Warn,
                );
            }
        }
    }

    let res = run_app(&mut terminal, app, runtime);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("{err:?}");
    }

    Ok(())
}

/// Logs go to a file under the data dir; the terminal belongs to the TUI.
fn init_logging() {
    let Some(path) = config::log_file_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("medapp=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .try_init();
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, &runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => handle_key(&mut app, key),
                Event::Mouse(mouse) => handle_mouse(&mut app, mouse),
                Event::Resize(_, _) => {}
                _ => {}
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        app.apply_event(event);
    }

    if app.take_refresh_request() {
        let _ = runtime.send(RuntimeCommand::Refresh);
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if app.help_open {
        if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc) {
            app.toggle_help();
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('?') => app.toggle_help(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Char('m') => app.toggle_sidebar(),
        KeyCode::Char('r') => app.request_refresh(),
        KeyCode::Char('[') => app.cycle_section(false),
        KeyCode::Char(']') => app.cycle_section(true),
        KeyCode::Char('w') => copy_appointment_whatsapp(app),
        KeyCode::Char('v') => copy_video_call(app),
        KeyCode::Char('c') => {
            let link = app.clinic_whatsapp_link();
            copy_link(app, &link, "WhatsApp de la clínica");
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),
        KeyCode::Esc => app.set_section(Section::Inicio),
        KeyCode::Char(ch) => {
            if let Some(section) = Section::ALL.iter().find(|s| s.shortcut() == ch) {
                app.set_section(*section);
            }
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.help_open {
        return;
    }
    let Some(size) = terminal_rect() else {
        return;
    };
    let areas = ui::layout::areas(size, app.sidebar_collapsed);
    let (col, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if rect_contains(areas.sidebar_nav, col, row) {
                let inner = rect_inner(areas.sidebar_nav);
                if !rect_contains(inner, col, row) {
                    return;
                }
                let idx = (row - inner.y) as usize;
                if let Some(section) = Section::ALL.get(idx).copied() {
                    app.set_section(section);
                }
            }
        }
        MouseEventKind::ScrollUp => {
            if rect_contains(areas.sidebar, col, row) {
                app.cycle_section(false);
            } else if rect_contains(areas.content, col, row) {
                app.move_selection_up();
            }
        }
        MouseEventKind::ScrollDown => {
            if rect_contains(areas.sidebar, col, row) {
                app.cycle_section(true);
            } else if rect_contains(areas.content, col, row) {
                app.move_selection_down();
            }
        }
        _ => {}
    }
}

fn copy_appointment_whatsapp(app: &mut App) {
    let Some(appointment) = app.current_appointment() else {
        app.set_status("No hay turno seleccionado", StatusLevel::Warn);
        return;
    };
    let link = appointment.whatsapp_link();
    let name = appointment.name.clone();
    copy_link(app, &link, &format!("WhatsApp de {name}"));
}

fn copy_video_call(app: &mut App) {
    if app.active_section != Section::Inicio {
        app.set_status("Videollamada disponible en Inicio", StatusLevel::Warn);
        return;
    }
    copy_link(app, VIDEO_CALL_URL, "link de videollamada");
}

fn copy_link(app: &mut App, link: &str, what: &str) {
    use arboard::Clipboard;

    match Clipboard::new() {
        Ok(mut clipboard) => {
            if clipboard.set_text(link).is_ok() {
                app.set_status(format!("Copiado {what}: {link}"), StatusLevel::Info);
            } else {
                app.set_status("No se pudo copiar al portapapeles", StatusLevel::Error);
            }
        }
        Err(_) => {
            app.set_status("Portapapeles no disponible", StatusLevel::Error);
        }
    }
}

fn terminal_rect() -> Option<Rect> {
    let (width, height) = crossterm::terminal::size().ok()?;
    Some(Rect {
        x: 0,
        y: 0,
        width,
        height,
    })
}

fn rect_contains(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

fn rect_inner(rect: Rect) -> Rect {
    Rect {
        x: rect.x.saturating_add(1),
        y: rect.y.saturating_add(1),
        width: rect.width.saturating_sub(2),
        height: rect.height.saturating_sub(2),
    }
}
