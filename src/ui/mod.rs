use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod theme;

use crate::app::{App, Section, StatusLevel};
use crate::config;
use crate::domain::{RateQuote, Remote, WeatherReading};
use crate::ui::theme::Palette;

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();
    let palette = Palette::for_mode(app.dark_mode);

    f.render_widget(
        Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
        size,
    );

    let areas = layout::areas(size, app.sidebar_collapsed);

    draw_header(f, areas.header, app, &palette);
    draw_sidebar(f, areas.sidebar_nav, areas.sidebar_actions, app, &palette);

    match app.active_section {
        Section::Inicio => draw_dashboard(f, areas.content, app, &palette),
        Section::Configuracion => draw_settings(f, areas.content, app, &palette),
        other => draw_placeholder(f, areas.content, other, &palette),
    }

    draw_status_line(f, areas.status_line, app, &palette);
    draw_command_line(f, areas.command_line, app, &palette);

    if app.help_open {
        draw_help_popup(f, size, &palette);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let (date, time) = match app.clock.as_ref() {
        Some(snapshot) => (snapshot.date.as_str(), snapshot.time.as_str()),
        None => ("--/--/----", "--:--"),
    };

    let title = Line::from(vec![
        Span::styled(
            "MedApp",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Fecha", Style::default().fg(palette.muted)),
        Span::raw(format!(" {date}  ")),
        Span::styled("Horario", Style::default().fg(palette.muted)),
        Span::raw(format!(" {time}")),
    ]);

    let mode = if app.dark_mode { "Oscuro" } else { "Claro" };
    let right = Line::from(vec![
        Span::styled("Tema ", Style::default().fg(palette.muted)),
        Span::raw(mode),
    ]);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(area);

    f.render_widget(
        Paragraph::new(title)
            .block(panel_block(palette))
            .alignment(Alignment::Left),
        chunks[0],
    );
    f.render_widget(
        Paragraph::new(right)
            .block(panel_block(palette))
            .alignment(Alignment::Right),
        chunks[1],
    );
}

fn draw_sidebar(f: &mut Frame, nav_area: Rect, actions_area: Rect, app: &App, palette: &Palette) {
    let items: Vec<ListItem> = Section::ALL
        .iter()
        .map(|section| {
            let is_active = *section == app.active_section;
            let label = if app.sidebar_collapsed {
                section.shortcut().to_string()
            } else {
                format!("{} {}", section.shortcut(), section.title())
            };
            let style = if is_active {
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.text)
            };
            ListItem::new(Line::from(label)).style(style)
        })
        .collect();

    let title = if app.sidebar_collapsed { "≡" } else { "MedApp" };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(palette.accent)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(
        Section::ALL
            .iter()
            .position(|section| *section == app.active_section),
    );
    f.render_stateful_widget(list, nav_area, &mut state);

    let footer = if app.sidebar_collapsed {
        vec![Line::from("c"), Line::from("t")]
    } else {
        vec![
            Line::from(Span::styled(
                app.config.profile.on_call.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ver perfil",
                Style::default().fg(palette.muted),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("c", Style::default().fg(palette.accent)),
                Span::raw(" WhatsApp"),
            ]),
            Line::from(vec![
                Span::styled("t", Style::default().fg(palette.accent)),
                Span::raw(" Tema"),
            ]),
        ]
    };
    f.render_widget(
        Paragraph::new(Text::from(footer))
            .block(panel_block(palette))
            .wrap(Wrap { trim: true }),
        actions_area,
    );
}

fn draw_dashboard(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let dash = layout::dashboard_areas(area);

    draw_profile_card(f, dash.profile, app, palette);
    draw_appointments(f, dash.appointments, app, palette);
    draw_dolar_card(f, dash.dolar, &app.dolar, palette);
    draw_clima_card(f, dash.clima, &app.weather, palette);
}

fn draw_profile_card(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let (date, time) = match app.clock.as_ref() {
        Some(snapshot) => (snapshot.date.clone(), snapshot.time.clone()),
        None => ("--/--/----".to_string(), "--:--".to_string()),
    };

    let lines = vec![
        Line::from(Span::styled(
            app.config.profile.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            app.config.profile.specialty.clone(),
            Style::default().fg(palette.muted),
        )),
        Line::from(vec![
            Span::styled("Fecha: ", Style::default().fg(palette.muted)),
            Span::raw(date),
            Span::raw("   "),
            Span::styled("Horario: ", Style::default().fg(palette.muted)),
            Span::raw(time),
        ]),
    ];

    f.render_widget(
        Paragraph::new(Text::from(lines)).block(titled_block("Perfil", palette)),
        area,
    );
}

fn draw_appointments(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let items: Vec<ListItem> = if app.appointments.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "Sin turnos para hoy",
            Style::default().fg(palette.muted),
        )))]
    } else {
        app.appointments
            .iter()
            .map(|appointment| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<10}", appointment.time),
                        Style::default().fg(palette.muted),
                    ),
                    Span::raw(appointment.name.clone()),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(titled_block("Próximos Turnos", palette))
        .highlight_style(
            Style::default()
                .fg(palette.background)
                .bg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    if !app.appointments.is_empty() {
        state.select(Some(app.selected_appointment));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_dolar_card(f: &mut Frame, area: Rect, dolar: &Remote<RateQuote>, palette: &Palette) {
    let lines = match dolar {
        Remote::Loading => loading_lines(palette),
        Remote::Failed(message) => error_lines(message, palette),
        Remote::Ready(quote) => vec![
            Line::from(Span::styled(
                quote.nombre.clone(),
                Style::default().fg(palette.muted),
            )),
            Line::from(vec![
                Span::styled("Compra: ", Style::default().fg(palette.muted)),
                Span::styled(
                    format!("${:.2}", quote.compra),
                    Style::default()
                        .fg(palette.success)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Venta: ", Style::default().fg(palette.muted)),
                Span::styled(
                    format!("${:.2}", quote.venta),
                    Style::default()
                        .fg(palette.warning)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ],
    };

    f.render_widget(
        Paragraph::new(Text::from(lines)).block(titled_block("Dólar Hoy", palette)),
        area,
    );
}

fn draw_clima_card(f: &mut Frame, area: Rect, weather: &Remote<WeatherReading>, palette: &Palette) {
    let lines = match weather {
        Remote::Loading => loading_lines(palette),
        Remote::Failed(message) => error_lines(message, palette),
        Remote::Ready(reading) => vec![
            Line::from(vec![
                Span::styled("Ciudad: ", Style::default().fg(palette.muted)),
                Span::raw(reading.location.name.clone()),
            ]),
            Line::from(vec![
                Span::styled("Temperatura: ", Style::default().fg(palette.muted)),
                Span::styled(
                    format!("{:.1} °C", reading.current.temp_c),
                    Style::default()
                        .fg(palette.accent)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ],
    };

    f.render_widget(
        Paragraph::new(Text::from(lines)).block(titled_block("Clima", palette)),
        area,
    );
}

fn draw_settings(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let config_path = config::config_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(desconocida)".to_string());
    let db_path = config::settings_db_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(desconocida)".to_string());
    let store_state = if app.settings_store.is_some() {
        "activa"
    } else {
        "deshabilitada (tema solo en memoria)"
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("Tema: ", Style::default().fg(palette.muted)),
            Span::raw(if app.dark_mode { "Oscuro" } else { "Claro" }),
            Span::styled("  (t para cambiar)", Style::default().fg(palette.muted)),
        ]),
        Line::from(vec![
            Span::styled("Ciudad del clima: ", Style::default().fg(palette.muted)),
            Span::raw(app.config.weather.city.clone()),
        ]),
        Line::from(vec![
            Span::styled("Configuración: ", Style::default().fg(palette.muted)),
            Span::raw(config_path),
        ]),
        Line::from(vec![
            Span::styled("Base de ajustes: ", Style::default().fg(palette.muted)),
            Span::raw(db_path),
            Span::styled(format!("  [{store_state}]"), Style::default().fg(palette.muted)),
        ]),
    ];

    f.render_widget(
        Paragraph::new(Text::from(lines))
            .block(titled_block("Configuración", palette))
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn draw_placeholder(f: &mut Frame, area: Rect, section: Section, palette: &Palette) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        "Sección en desarrollo",
        Style::default().fg(palette.muted),
    )))
    .block(titled_block(section.title(), palette))
    .alignment(Alignment::Center);
    f.render_widget(paragraph, area);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let line = match app.status_text() {
        Some((text, level)) => {
            let color = match level {
                StatusLevel::Info => palette.success,
                StatusLevel::Warn => palette.warning,
                StatusLevel::Error => palette.error,
            };
            Line::from(Span::styled(text.to_string(), Style::default().fg(color)))
        }
        None => Line::from(vec![
            Span::styled("Sección ", Style::default().fg(palette.muted)),
            Span::raw(app.active_section.title()),
        ]),
    };

    f.render_widget(
        Paragraph::new(line).style(Style::default().fg(palette.text)),
        area,
    );
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let mut spans = vec![
        Span::styled("[ ]", Style::default().fg(palette.accent)),
        Span::raw(" Sección  "),
        Span::styled("m", Style::default().fg(palette.accent)),
        Span::raw(" Menú  "),
        Span::styled("t", Style::default().fg(palette.accent)),
        Span::raw(" Tema  "),
        Span::styled("r", Style::default().fg(palette.accent)),
        Span::raw(" Actualizar  "),
    ];
    if app.active_section == Section::Inicio {
        spans.extend([
            Span::styled("w", Style::default().fg(palette.accent)),
            Span::raw(" WhatsApp  "),
            Span::styled("v", Style::default().fg(palette.accent)),
            Span::raw(" Videollamada  "),
        ]);
    }
    spans.extend([
        Span::styled("?", Style::default().fg(palette.accent)),
        Span::raw(" Ayuda  "),
        Span::styled("q", Style::default().fg(palette.accent)),
        Span::raw(" Salir"),
    ]);

    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(palette.text)),
        area,
    );
}

fn draw_help_popup(f: &mut Frame, area: Rect, palette: &Palette) {
    let popup_area = centered_rect(64, 64, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from("Navegación"),
        Line::from("  j / k      Mover selección de turno"),
        Line::from("  [ / ]      Sección anterior / siguiente"),
        Line::from("  1-6        Ir a sección"),
        Line::from("  m          Plegar / desplegar menú"),
        Line::from(""),
        Line::from("Acciones"),
        Line::from("  w          Copiar WhatsApp del turno"),
        Line::from("  v          Copiar link de videollamada"),
        Line::from("  c          Copiar WhatsApp de la clínica"),
        Line::from("  t          Cambiar tema"),
        Line::from("  r          Actualizar clima y dólar"),
        Line::from("  ?          Mostrar / ocultar ayuda"),
        Line::from("  q          Salir"),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .title("Ayuda")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent))
                .style(Style::default().bg(palette.panel).fg(palette.text)),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn loading_lines(palette: &Palette) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        "Cargando...",
        Style::default().fg(palette.muted),
    ))]
}

fn error_lines(message: &str, palette: &Palette) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        format!("Error: {message}"),
        Style::default().fg(palette.error),
    ))]
}

fn panel_block(palette: &Palette) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(palette.panel).fg(palette.text))
}

fn titled_block(title: &str, palette: &Palette) -> Block<'static> {
    panel_block(palette).title(title.to_string())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
