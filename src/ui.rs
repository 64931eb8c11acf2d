use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, TableState,
    Tabs, Wrap,
};

use crate::app::{App, ViewStatus};
use crate::config::ThemePreference;
use crate::editor::{EditSession, EditorField};
use crate::models::Team;
use crate::routes::{ActionKind, HOME_CARDS, ROUTES, Route, actions};
use crate::views::{TableBody, TableModel, Tone};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let theme = theme_from(app.theme);
    draw_background(frame, size, &theme);

    let content = size.inner(Margin {
        vertical: 1,
        horizontal: 2,
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(content);

    draw_nav(frame, app, chunks[0], &theme);
    if app.route == Route::Home {
        draw_home(frame, app, chunks[1], &theme);
    } else {
        draw_view(frame, app, chunks[1], &theme);
    }
    draw_footer(frame, app, chunks[2], &theme);

    if let Some(session) = app.editor.session() {
        draw_editor(frame, session, app.editor_teams(), size, &theme);
    }

    if !app.editor.is_open() && !app.show_help {
        if let Some(toast) = app.active_toast() {
            draw_toast(frame, size, &toast.message, toast.is_error, &theme);
        }
    }

    if app.show_help {
        draw_help(frame, size, &theme);
    }
}

fn draw_nav(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let titles = ROUTES
        .iter()
        .enumerate()
        .map(|(index, route)| format!("{} {}", index + 1, route.title()));
    let tabs = Tabs::new(titles)
        .select(app.route.index())
        .style(theme.muted_style())
        .highlight_style(
            Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled(" · ", theme.muted_style()))
        .block(panel_block("OctoFit Tracker", theme));
    frame.render_widget(tabs, area);
}

fn draw_home(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let welcome = Paragraph::new(vec![
        Line::from(Span::styled(Route::Home.heading(), theme.title_style())),
        Line::from(Span::raw(
            "Track your fitness journey, compete with your team, and achieve your goals!",
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style())
            .style(theme.panel_style()),
    )
    .wrap(Wrap { trim: true });
    frame.render_widget(welcome, sections[0]);

    let cards: Vec<ListItem> = HOME_CARDS
        .iter()
        .map(|card| {
            ListItem::new(vec![
                Line::from(Span::styled(
                    card.title,
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(card.description, theme.muted_style())),
                Line::from(""),
            ])
            .style(theme.panel_style())
        })
        .collect();

    let list = List::new(cards)
        .block(panel_block("Explore", theme))
        .highlight_style(theme.active_highlight())
        .highlight_symbol("▍ ");
    frame.render_stateful_widget(list, sections[1], &mut app.home_state);
}

fn draw_view(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    frame.render_widget(
        Paragraph::new(view_header_line(app.route, theme)),
        sections[0],
    );

    let route = app.route;
    match app.screen.status() {
        ViewStatus::Home => {}
        ViewStatus::Loading => {
            draw_message(frame, sections[1], route.loading_message(), theme.text_style(), theme)
        }
        ViewStatus::Failed(message) => draw_message(
            frame,
            sections[1],
            &format!("Error: {message}"),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
            theme,
        ),
        ViewStatus::Ready(data) => {
            let model = data.table();
            draw_table(frame, sections[1], route, &model, &mut app.table_state, theme);
        }
    }
}

fn view_header_line(route: Route, theme: &Theme) -> Line<'static> {
    let mut spans = vec![Span::styled(route.heading(), theme.title_style())];
    for action in actions(route) {
        let style = match action.kind {
            ActionKind::Unavailable => theme.muted_style(),
            ActionKind::EditUser | ActionKind::Refresh => Style::default().fg(theme.highlight),
        };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(format!("[{}] {}", action.key, action.label), style));
    }
    Line::from(spans)
}

fn draw_message(frame: &mut Frame, area: Rect, message: &str, style: Style, theme: &Theme) {
    let block = panel_block("Status", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let line_area = Rect {
        y: inner.y + inner.height / 2,
        height: inner.height.min(1),
        ..inner
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(message.to_string(), style)))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, line_area);
}

fn draw_table(
    frame: &mut Frame,
    area: Rect,
    route: Route,
    model: &TableModel,
    state: &mut TableState,
    theme: &Theme,
) {
    let header = Row::new(
        model
            .columns
            .iter()
            .map(|column| Cell::from(Span::styled(*column, theme.title_style()))),
    )
    .bottom_margin(1);

    let rows: Vec<Row> = match &model.body {
        TableBody::Rows(rows) => rows
            .iter()
            .map(|cells| {
                Row::new(
                    cells
                        .iter()
                        .map(|cell| {
                            Cell::from(Span::styled(cell.text.clone(), tone_style(cell.tone, theme)))
                        }),
                )
                .style(theme.panel_style())
            })
            .collect(),
        TableBody::Placeholder(_) => Vec::new(),
    };

    let widths = model.weights.iter().map(|weight| Constraint::Fill(*weight));
    let block = panel_block(route.title(), theme);
    let inner = block.inner(area);
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(2)
        .row_highlight_style(theme.active_highlight())
        .highlight_symbol("▍ ");
    frame.render_stateful_widget(table, area, state);

    if let TableBody::Placeholder(text) = model.body {
        let placeholder_area = Rect {
            y: inner.y.saturating_add(2),
            height: inner.height.saturating_sub(2).min(1),
            ..inner
        };
        let paragraph = Paragraph::new(Line::from(Span::styled(text, theme.muted_style())))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, placeholder_area);
    }
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let hints = match app.route {
        Route::Home => "Up/Down select · Enter open",
        Route::Users => "Up/Down select · Enter/e edit · r reload",
        _ => "Up/Down select · r reload",
    };
    let line = Line::from(vec![
        Span::styled(hints, theme.muted_style()),
        Span::raw(" · "),
        Span::styled("1-6 / ←→ navigate", theme.muted_style()),
        Span::raw(" · "),
        Span::styled("h help", theme.muted_style()),
        Span::raw(" · "),
        Span::styled(
            format!("m theme ({})", theme_label(app.theme)),
            theme.muted_style(),
        ),
        Span::raw(" · "),
        Span::styled("q quit", theme.muted_style()),
        Span::raw("   |   "),
        Span::styled(app.api_url.clone(), theme.muted_style()),
    ]);
    let footer = Paragraph::new(line).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border_style())
            .style(theme.panel_style()),
    );
    frame.render_widget(footer, area);
}

fn draw_editor(
    frame: &mut Frame,
    session: &EditSession,
    teams: &[Team],
    area: Rect,
    theme: &Theme,
) {
    let block = centered_rect(60, 50, area);
    frame.render_widget(Clear, block);

    let field_line = |label: &'static str, value: String, field: EditorField| {
        let value_style = if session.focus == field {
            Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)
        } else {
            theme.text_style()
        };
        let marker = if session.focus == field { "▍ " } else { "  " };
        Line::from(vec![
            Span::styled(marker, Style::default().fg(theme.accent)),
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(value, value_style),
        ])
    };

    let mut lines = Vec::new();
    if let Some(error) = &session.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }
    lines.push(field_line("Name:  ", session.draft.name.clone(), EditorField::Name));
    lines.push(field_line("Email: ", session.draft.email.clone(), EditorField::Email));
    lines.push(field_line(
        "Team:  ",
        format!("◂ {} ▸", session.team_label(teams)),
        EditorField::Team,
    ));
    lines.push(Line::from(""));
    if session.is_saving() {
        lines.push(Line::from(Span::styled("Saving...", theme.title_style())));
    } else {
        lines.push(Line::from(Span::styled(
            "Tab next field · ←/→ change team · Enter save changes · Esc cancel",
            theme.muted_style(),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block("Edit User", theme))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, block);
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
    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    vertical[1]
}

fn draw_toast(frame: &mut Frame, area: Rect, message: &str, is_error: bool, theme: &Theme) {
    let max_width = area.width.saturating_sub(2);
    let width = (message.chars().count() as u16 + 6)
        .min(max_width)
        .max(20.min(max_width));
    let height = 3;
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 4);
    let rect = Rect::new(x, y, width, height).intersection(area);

    frame.render_widget(Clear, rect);
    let style = if is_error {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.success).add_modifier(Modifier::BOLD)
    };
    let title = if is_error { "Notice" } else { "Saved" };
    let paragraph = Paragraph::new(Line::from(Span::styled(message.to_string(), style)))
        .alignment(Alignment::Center)
        .block(panel_block(title, theme));
    frame.render_widget(paragraph, rect);
}

fn draw_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = centered_rect(70, 70, area);
    frame.render_widget(Clear, block);

    let header_style = Style::default().add_modifier(Modifier::BOLD).fg(theme.accent);
    let key_style = Style::default().fg(theme.highlight);
    let section = |title: &'static str| {
        Row::new(vec![
            Cell::from(Span::styled(title, header_style)),
            Cell::from(""),
        ])
    };
    let binding = |key: &'static str, description: &'static str| {
        Row::new(vec![
            Cell::from(Span::styled(key, key_style)),
            Cell::from(description),
        ])
    };
    let spacer = || Row::new(vec![Cell::from(""), Cell::from("")]);

    let rows = vec![
        section("Navigation"),
        binding("1-6", "Home, Users, Teams, Activities, Workouts, Leaderboard"),
        binding("Left/Right", "Previous / next view"),
        binding("Esc", "Back to home"),
        binding("Up/Down", "Select row or card"),
        binding("Enter", "Open card / edit user"),
        spacer(),
        section("Views"),
        binding("r", "Reload current view"),
        binding("e", "Edit selected user"),
        binding("[key]", "Row actions shown next to the title"),
        spacer(),
        section("Edit User"),
        binding("Tab / Shift+Tab", "Next / previous field"),
        binding("Left/Right", "Change team"),
        binding("Enter", "Save changes"),
        binding("Esc", "Cancel"),
        spacer(),
        section("General"),
        binding("m", "Toggle theme"),
        binding("h / Esc", "Close help"),
        binding("q", "Quit"),
    ];

    let table = Table::new(rows, [Constraint::Length(20), Constraint::Min(10)])
        .block(panel_block("Help", theme))
        .column_spacing(2);

    frame.render_widget(table, block);
}

fn draw_background(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default().style(Style::default().bg(theme.bg).fg(theme.text));
    frame.render_widget(block, area);
}

fn panel_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style())
        .style(theme.panel_style())
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            theme.title_style(),
        )))
}

fn tone_style(tone: Tone, theme: &Theme) -> Style {
    match tone {
        Tone::Plain => theme.text_style(),
        Tone::Strong => Style::default().add_modifier(Modifier::BOLD),
        Tone::Muted => theme.muted_style(),
        Tone::Badge => Style::default().fg(theme.accent),
        Tone::Success => Style::default().fg(theme.success),
        Tone::Warning => Style::default().fg(theme.highlight),
        Tone::Danger => Style::default().fg(theme.error),
        Tone::Gold => Style::default()
            .fg(Color::Rgb(255, 200, 40))
            .add_modifier(Modifier::BOLD),
        Tone::Silver => Style::default()
            .fg(Color::Rgb(190, 195, 205))
            .add_modifier(Modifier::BOLD),
        Tone::Bronze => Style::default()
            .fg(Color::Rgb(205, 127, 50))
            .add_modifier(Modifier::BOLD),
    }
}

#[derive(Clone, Copy)]
struct Theme {
    bg: Color,
    panel: Color,
    border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    highlight: Color,
    success: Color,
    error: Color,
    accent_dark: Color,
}

impl Theme {
    fn panel_style(&self) -> Style {
        Style::default().bg(self.panel).fg(self.text)
    }

    fn text_style(&self) -> Style {
        Style::default().fg(self.text)
    }

    fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    fn active_highlight(&self) -> Style {
        Style::default()
            .bg(self.accent)
            .fg(self.accent_contrast())
            .add_modifier(Modifier::BOLD)
    }

    fn accent_contrast(&self) -> Color {
        if matches!(self.bg, Color::Rgb(242, 244, 248)) {
            self.accent_dark
        } else {
            Color::Black
        }
    }
}

fn theme_from(pref: ThemePreference) -> Theme {
    match pref {
        ThemePreference::Terminal => Theme {
            bg: Color::Reset,
            panel: Color::Reset,
            border: Color::DarkGray,
            text: Color::Reset,
            muted: Color::DarkGray,
            accent: Color::Cyan,
            highlight: Color::Yellow,
            success: Color::Green,
            error: Color::Red,
            accent_dark: Color::Black,
        },
        ThemePreference::Dark => Theme {
            bg: Color::Rgb(14, 20, 30),
            panel: Color::Rgb(22, 30, 44),
            border: Color::Rgb(52, 70, 96),
            text: Color::Rgb(225, 232, 245),
            muted: Color::Rgb(140, 156, 180),
            accent: Color::Rgb(80, 200, 190),
            highlight: Color::Rgb(255, 200, 90),
            success: Color::Rgb(110, 210, 130),
            error: Color::Rgb(255, 110, 110),
            accent_dark: Color::Rgb(20, 70, 66),
        },
        ThemePreference::Light => Theme {
            bg: Color::Rgb(242, 244, 248),
            panel: Color::Rgb(255, 255, 255),
            border: Color::Rgb(210, 220, 235),
            text: Color::Rgb(26, 32, 44),
            muted: Color::Rgb(96, 110, 132),
            accent: Color::Rgb(13, 110, 253),
            highlight: Color::Rgb(230, 140, 20),
            success: Color::Rgb(25, 135, 84),
            error: Color::Rgb(220, 53, 69),
            accent_dark: Color::Rgb(12, 30, 70),
        },
    }
}

fn theme_label(theme: ThemePreference) -> &'static str {
    match theme {
        ThemePreference::Terminal => "Terminal",
        ThemePreference::Dark => "Midnight",
        ThemePreference::Light => "Snow",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiClient, ApiError};
    use crate::loader::{Message, Payload};
    use crate::models::User;
    use crate::views::{UsersData, WorkoutsData};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn offline_app(route: Route) -> App {
        let client = ApiClient::new("http://127.0.0.1:1/api/").unwrap();
        App::new(client, route, ThemePreference::Terminal)
    }

    fn deliver(app: &mut App, payload: Payload) {
        let scope = app.scope_id();
        app.handle_message(Message { scope, payload });
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn failed_view_shows_error_banner() {
        let mut app = offline_app(Route::Workouts);
        deliver(
            &mut app,
            Payload::Workouts(Err(ApiError::Status {
                resource: "workouts",
                status: 500,
            })),
        );
        let screen = render(&mut app, 100, 30);
        assert!(
            screen.contains("Error: HTTP error fetching workouts! status: 500"),
            "{screen}"
        );
    }

    #[test]
    fn loading_view_shows_loading_message() {
        let mut app = offline_app(Route::Workouts);
        let screen = render(&mut app, 100, 30);
        assert!(screen.contains(Route::Workouts.loading_message()), "{screen}");
    }

    #[test]
    fn empty_collection_draws_placeholder_under_header() {
        let mut app = offline_app(Route::Workouts);
        deliver(
            &mut app,
            Payload::Workouts(Ok(WorkoutsData {
                workouts: Vec::new(),
            })),
        );
        let screen = render(&mut app, 120, 30);
        assert!(screen.contains("Workout Name"), "{screen}");
        assert!(screen.contains("No workouts found."), "{screen}");
    }

    #[test]
    fn editor_overlay_shows_save_error() {
        let mut app = offline_app(Route::Users);
        deliver(
            &mut app,
            Payload::Users(Ok(UsersData::new(
                vec![User {
                    id: 1,
                    name: "Ana".to_string(),
                    email: "ana@x.com".to_string(),
                    team_id: None,
                    created_at: None,
                }],
                Vec::new(),
            ))),
        );
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        deliver(
            &mut app,
            Payload::UserSaved(Err(ApiError::Rejected {
                status: 400,
                message: "Email taken".to_string(),
            })),
        );

        let screen = render(&mut app, 100, 30);
        assert!(screen.contains("Edit User"), "{screen}");
        assert!(screen.contains("Email taken"), "{screen}");
        assert!(screen.contains("ana@x.com"), "{screen}");
    }

    #[test]
    fn toast_fits_a_narrow_terminal() {
        let mut app = offline_app(Route::Workouts);
        deliver(
            &mut app,
            Payload::Workouts(Ok(WorkoutsData {
                workouts: Vec::new(),
            })),
        );
        press(&mut app, KeyCode::Char('s'));
        assert!(app.active_toast().is_some());

        let screen = render(&mut app, 18, 12);
        assert!(screen.contains("Notice"), "{screen}");
    }
}
