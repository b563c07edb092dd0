use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy)]
pub struct UiAreas {
    pub header: Rect,
    pub sidebar: Rect,
    pub sidebar_nav: Rect,
    pub sidebar_actions: Rect,
    pub content: Rect,
    pub status_line: Rect,
    pub command_line: Rect,
}

pub fn areas(size: Rect, sidebar_collapsed: bool) -> UiAreas {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(size);

    let sidebar_width = if sidebar_collapsed { 5 } else { 24 };
    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(sidebar_width), Constraint::Min(0)])
        .split(vertical[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(7)])
        .split(main_chunks[0]);

    let footer_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(vertical[2]);

    UiAreas {
        header: vertical[0],
        sidebar: main_chunks[0],
        sidebar_nav: sidebar_chunks[0],
        sidebar_actions: sidebar_chunks[1],
        content: main_chunks[1],
        status_line: footer_chunks[0],
        command_line: footer_chunks[1],
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DashboardAreas {
    pub profile: Rect,
    pub appointments: Rect,
    pub dolar: Rect,
    pub clima: Rect,
}

pub fn dashboard_areas(content: Rect) -> DashboardAreas {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6),
            Constraint::Min(6),
            Constraint::Length(8),
        ])
        .split(content);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    DashboardAreas {
        profile: rows[0],
        appointments: rows[1],
        dolar: cards[0],
        clima: cards[1],
    }
}
