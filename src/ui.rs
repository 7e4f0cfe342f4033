use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::{
    app::App,
    dashboard::{DataView, Status, LOADING, NO_COMPLETED_DATA},
    sort::Column,
    view::{chart_bars, header_label, table_rows, ChartBar, TableRow},
};

const LIVE_COLOR: Color = Color::Rgb(255, 77, 77);
const COMPLETED_COLOR: Color = Color::Rgb(54, 162, 235);

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title + description
            Constraint::Length(1), // Status
            Constraint::Min(5),    // Table / chart
            Constraint::Length(1), // Key help
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_status(f, app, chunks[1]);

    // The table and chart stay hidden while a load is in flight.
    let players = match app.dashboard.status() {
        Status::Loading => None,
        _ => app.dashboard.visible_players(),
    };

    match players {
        Some(players) => {
            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
                .split(chunks[2]);
            let side = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(8), Constraint::Min(4)])
                .split(body[1]);

            let rows = table_rows(&players);
            draw_table(f, app, &rows, body[0]);
            draw_leader(f, rows.first(), side[0]);
            draw_chart(f, &chart_bars(&players), side[1]);
        }
        None => {
            let msg = if *app.dashboard.status() == Status::Loading {
                LOADING
            } else {
                NO_COMPLETED_DATA
            };
            let p = Paragraph::new(msg)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(p, chunks[2]);
        }
    }

    draw_footer(f, app, chunks[3]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let mut title = vec![Span::styled(
        " NBA EPA Dashboard ",
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if app.dashboard.live_available() {
        title.push(Span::styled(
            " ● LIVE ",
            Style::default().fg(Color::White).bg(LIVE_COLOR).add_modifier(Modifier::BOLD),
        ));
    }

    let updated = app
        .dashboard
        .last_update()
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "Never".to_string());

    let lines = vec![
        Line::from(title),
        Line::from(vec![
            Span::raw(format!(" {}", app.dashboard.description())),
            Span::styled(format!("   Last updated: {}", updated), Style::default().fg(Color::Gray)),
        ]),
    ];
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(p, area);
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let line = match app.dashboard.status() {
        Status::Idle => Line::from(""),
        Status::Loading => Line::from(Span::styled(format!(" {}", LOADING), Style::default().fg(Color::Yellow))),
        Status::Error(msg) => Line::from(Span::styled(
            format!(" {}", msg),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
    };
    f.render_widget(Paragraph::new(line).wrap(Wrap { trim: true }), area);
}

fn column_width(column: Column) -> Constraint {
    match column {
        Column::PlayerName => Constraint::Min(18),
        Column::Team => Constraint::Length(5),
        Column::Minutes => Constraint::Length(6),
        Column::CustomScore => Constraint::Length(7),
        _ => Constraint::Length(5),
    }
}

fn draw_table(f: &mut Frame, app: &mut App, rows: &[TableRow], area: Rect) {
    let sort = app.dashboard.sort();
    let cursor = app.cursor_column();

    let header = Row::new(
        std::iter::once(Cell::from("#")).chain(Column::ALL.iter().map(|&c| {
            let mut style = Style::default().add_modifier(Modifier::BOLD);
            if c == sort.column {
                style = style.fg(Color::Yellow);
            }
            if c == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Cell::from(header_label(c, &sort)).style(style)
        })),
    )
    .bottom_margin(1);

    let body = rows.iter().map(|row| {
        let mut cells = vec![Cell::from(row.rank.to_string())];
        for (&column, text) in Column::ALL.iter().zip(&row.cells) {
            let cell = match column {
                Column::PlayerName if row.is_live => Cell::from(Line::from(vec![
                    Span::styled(text.clone(), Style::default().add_modifier(Modifier::BOLD)),
                    Span::raw(" "),
                    Span::styled("LIVE", Style::default().fg(Color::White).bg(LIVE_COLOR).add_modifier(Modifier::BOLD)),
                ])),
                Column::PlayerName | Column::CustomScore => {
                    Cell::from(Span::styled(text.clone(), Style::default().add_modifier(Modifier::BOLD)))
                }
                _ => Cell::from(text.clone()),
            };
            cells.push(cell);
        }
        let style = if row.is_live {
            Style::default().fg(Color::LightRed)
        } else {
            Style::default()
        };
        Row::new(cells).style(style)
    });

    let widths: Vec<Constraint> = std::iter::once(Constraint::Length(3))
        .chain(Column::ALL.iter().map(|&c| column_width(c)))
        .collect();

    let title = match app.dashboard.active_view() {
        DataView::Live => " LIVE GAMES ",
        DataView::Completed => " COMPLETED GAMES ",
    };

    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray).fg(Color::White));

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn draw_leader(f: &mut Frame, leader: Option<&TableRow>, area: Rect) {
    let block = Block::default().title(" LEADER ").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(leader) = leader else { return };
    let name = leader.cells.first().cloned().unwrap_or_default();
    let score = leader.cells.last().cloned().unwrap_or_default();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let name_p = Paragraph::new(name)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(name_p, chunks[0]);

    // Quadrant glyphs are four cells wide and four tall.
    let color = if leader.is_live { LIVE_COLOR } else { COMPLETED_COLOR };
    if chunks[1].width < score.chars().count() as u16 * 4 || chunks[1].height < 4 {
        let score_p = Paragraph::new(format!("EPA {}", score))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(score_p, chunks[1]);
    } else {
        let score_text = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .style(Style::default().fg(color))
            .lines(vec![score.into()])
            .alignment(Alignment::Center)
            .build();
        f.render_widget(score_text, chunks[1]);
    }
}

/// Bars arrive bottom-up; ratatui stacks horizontal bars top-down, so they
/// are walked in reverse to keep the leader on top.
fn draw_chart(f: &mut Frame, bars: &[ChartBar], area: Rect) {
    let scaled = |score: f64| (score.max(0.0) * 100.0).round() as u64;
    let max = bars.iter().map(|b| scaled(b.score)).max().unwrap_or(0).max(1);

    let data: Vec<Bar> = bars
        .iter()
        .rev()
        .map(|b| {
            let color = if b.is_live { LIVE_COLOR } else { COMPLETED_COLOR };
            Bar::default()
                .label(Line::from(b.label.clone()))
                .value(scaled(b.score))
                .text_value(format!("{:.2}", b.score))
                .style(Style::default().fg(color))
                .value_style(Style::default().fg(Color::Black).bg(color))
        })
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title(" EPA - TOP 10 ").borders(Borders::ALL))
        .data(BarGroup::default().bars(&data))
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .max(max);
    f.render_widget(chart, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let key = Style::default().add_modifier(Modifier::BOLD);
    let mut keys = vec![
        Span::styled(" q", key),
        Span::raw(" quit  "),
        Span::styled("r", key),
        Span::raw(" refresh  "),
        Span::styled("←/→", key),
        Span::raw(" column  "),
        Span::styled("enter", key),
        Span::raw(" sort  "),
        Span::styled("j/k", key),
        Span::raw(" row"),
    ];
    if app.dashboard.live_available() {
        keys.push(Span::raw("  "));
        keys.push(Span::styled("v", key));
        keys.push(Span::raw(" live/completed"));
    }
    f.render_widget(Paragraph::new(Line::from(keys)).style(Style::default().fg(Color::Gray)), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{dashboard::Update, model::Player};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(220, 40)).expect("terminal should build");
        terminal.draw(|f| ui(f, app)).expect("draw should succeed");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn player(name: &str, score: f64, live: bool) -> Player {
        Player {
            player_name: name.into(),
            team: "SAS".into(),
            minutes: "31:00".into(),
            custom_score: score,
            is_live: live,
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_frame_shows_loading() {
        let mut app = App::default();
        let screen = render(&mut app);
        assert!(screen.contains(LOADING));
    }

    #[test]
    fn test_empty_data_shows_message() {
        let mut app = App::default();
        app.on_update(Update::Players { completed: Ok(vec![]), live: Ok(vec![]) });
        let screen = render(&mut app);
        assert!(screen.contains(NO_COMPLETED_DATA));
        assert!(!screen.contains("TOP 10"));
    }

    #[test]
    fn test_table_and_chart_render() {
        let mut app = App::default();
        app.on_update(Update::Players {
            completed: Ok(vec![player("Wembanyama", 30.5, false), player("Castle", 12.0, false)]),
            live: Ok(vec![]),
        });
        let screen = render(&mut app);
        assert!(screen.contains("COMPLETED GAMES"));
        assert!(screen.contains("EPA ↓"));
        assert!(screen.contains("Wembanyama (SAS)"));
        assert!(screen.contains("30.50"));
        assert!(!screen.contains("● LIVE"));
    }

    #[test]
    fn test_manual_refresh_hides_table_until_reload() {
        let mut app = App::default();
        let completed = || Ok(vec![player("Wembanyama", 30.5, false)]);
        app.on_update(Update::Players { completed: completed(), live: Ok(vec![]) });
        app.dashboard.begin_refresh();

        let screen = render(&mut app);
        assert!(screen.contains(LOADING));
        assert!(!screen.contains("COMPLETED GAMES"));
        assert!(!screen.contains("TOP 10"));

        app.on_update(Update::Players { completed: completed(), live: Ok(vec![]) });
        let screen = render(&mut app);
        assert!(screen.contains("COMPLETED GAMES"));
        assert!(!screen.contains(LOADING));
    }

    #[test]
    fn test_live_rows_carry_badge() {
        let mut app = App::default();
        app.on_update(Update::Players {
            completed: Ok(vec![player("Fox", 5.0, false)]),
            live: Ok(vec![player("Harper", 9.0, true)]),
        });
        let screen = render(&mut app);
        assert!(screen.contains("LIVE GAMES"));
        assert!(screen.contains("● LIVE"));
        assert!(screen.contains("Harper LIVE"));
    }
}
