use std::{
    io,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use chrono::Local;
use crossterm::{
    cursor::Show,
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        block::{Position, Title},
        Axis, Bar, BarChart, BarGroup, Block, BorderType, Borders, Chart, Dataset, GraphType, Paragraph,
    },
    Frame, Terminal,
};

use crate::app::{App, Control};
use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result};
use crate::feed::RandomFeed;
use crate::traffic::CongestionSample;
use crate::util::axis_ceiling;

const BAR_BLUE: Color = Color::Rgb(59, 130, 246);
const LINE_PURPLE: Color = Color::Rgb(139, 92, 246);
const PANEL_BORDER: Color = Color::Rgb(75, 85, 99);
const AXIS_GRAY: Color = Color::Rgb(156, 163, 175);

const DAILY_BARS: u16 = 14;
// Columns per bar slot (bar plus gap) needed to read each label style
const FULL_LABEL_SLOT: u16 = 6;
const COMPACT_LABEL_SLOT: u16 = 4;

pub fn run(config: DashboardConfig, shutdown: Arc<AtomicBool>) -> Result<()> {
    enable_raw_mode()?;
    let res = run_in_alternate_screen(config, &shutdown);

    // Every restore step runs; the first error wins
    let restored = restore_terminal(&mut io::stdout());
    res.and(restored.map_err(DashboardError::from))
}

fn run_in_alternate_screen(config: DashboardConfig, shutdown: &AtomicBool) -> Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let feed = RandomFeed::new(config.seed);
    let app = App::new(config, Box::new(feed));
    run_app_loop(&mut terminal, app, shutdown)
}

fn restore_terminal<W: io::Write>(out: &mut W) -> io::Result<()> {
    let raw = disable_raw_mode();
    let screen = execute!(out, LeaveAlternateScreen, Show);
    raw.and(screen)
}

fn run_app_loop<B: Backend>(terminal: &mut Terminal<B>, mut app: App, shutdown: &AtomicBool) -> Result<()> {
    let tick_rate = app.tick_rate();

    while app.is_running() && !shutdown.load(Ordering::SeqCst) {
        terminal.draw(|f| draw(f, &app))?;

        // Handle input
        let timeout = tick_rate
            .checked_sub(app.last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }
        if app.last_tick.elapsed() >= tick_rate {
            app.on_tick(Instant::now(), Local::now().time());
        }
    }

    log::info!("dashboard loop stopped");
    Ok(())
}

pub fn draw(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // header
            Constraint::Min(12),   // charts
            Constraint::Length(5), // control panel
            Constraint::Length(1), // key help
        ])
        .split(f.size());

    draw_header(f, rows[0], app);

    // Stack the charts when half the width cannot hold 14 labelled bars
    let half_inner = (rows[1].width / 2).saturating_sub(2);
    let direction = if half_inner / DAILY_BARS >= COMPACT_LABEL_SLOT {
        Direction::Horizontal
    } else {
        Direction::Vertical
    };
    let charts = Layout::default()
        .direction(direction)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);
    draw_daily_chart(f, charts[0], app);
    draw_live_chart(f, charts[1], app);

    draw_controls(f, rows[2], app);
    draw_keys(f, rows[3]);
}

fn panel<'a>(title: &'a str, subtitle: &'a str, accent: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(PANEL_BORDER))
        .title(Line::from(vec![
            Span::styled(format!(" {title} "), Style::default().fg(accent).add_modifier(Modifier::BOLD)),
            Span::styled(format!("{subtitle} "), Style::default().fg(Color::DarkGray)),
        ]))
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::Magenta));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(20),
            Constraint::Length(16),
            Constraint::Length(22),
            Constraint::Length(17),
        ])
        .split(inner);

    let title = vec![
        Line::from(Span::styled(
            "Smart Route Admin",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled("Traffic Management Dashboard", Style::default().fg(Color::LightBlue))),
    ];
    f.render_widget(Paragraph::new(title), cols[0]);

    let card = |label: &'static str| {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(PANEL_BORDER))
            .title(Span::styled(label, Style::default().fg(Color::Gray)))
    };

    let clock = Paragraph::new(Line::from(Span::styled(
        app.clock_text().to_string(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(card("Current Time"));
    f.render_widget(clock, cols[1]);

    let status = app.status();
    let status_line = Paragraph::new(Line::from(Span::styled(
        app.status_text(),
        Style::default().fg(status.color()).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(card("Traffic Status"));
    f.render_widget(status_line, cols[2]);

    let (color, text) = if app.is_emergency() {
        (Color::Red, "● EMERGENCY")
    } else {
        (Color::Green, "● NORMAL")
    };
    let mut border = Style::default().fg(color);
    if app.focus() == Control::Emergency {
        border = border.add_modifier(Modifier::BOLD);
    }
    let indicator = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(if app.focus() == Control::Emergency { BorderType::Double } else { BorderType::Rounded })
            .border_style(border),
    );
    f.render_widget(indicator, cols[3]);
}

fn bar_label(sample: &CongestionSample, slot: u16) -> String {
    if slot >= FULL_LABEL_SLOT {
        sample.label.to_string()
    } else {
        sample.short_label()
    }
}

fn draw_daily_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = panel("Daily Congestion (8AM - 9PM)", "Traffic percentage throughout the day", BAR_BLUE).title(
        Title::from(Span::styled(" ■ Congestion % ", Style::default().fg(BAR_BLUE)))
            .position(Position::Bottom)
            .alignment(Alignment::Right),
    );
    let inner_width = block.inner(area).width;
    let count = app.daily().len() as u16;
    let slot = inner_width / count.max(1);
    let bar_width = slot.saturating_sub(1).max(1);

    let bars: Vec<Bar> = app
        .daily()
        .iter()
        .map(|s| {
            Bar::default()
                .value(u64::from(s.percentage))
                .text_value(format!("{}%", s.percentage))
                .label(Line::from(bar_label(s, slot)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(1)
        .max(100)
        .bar_style(Style::default().fg(BAR_BLUE))
        .value_style(Style::default().fg(Color::White).bg(BAR_BLUE))
        .label_style(Style::default().fg(AXIS_GRAY));
    f.render_widget(chart, area);
}

fn draw_live_chart(f: &mut Frame, area: Rect, app: &App) {
    let live = app.live();
    let points: Vec<(f64, f64)> = live
        .samples()
        .enumerate()
        .map(|(i, s)| (i as f64, f64::from(s.vehicles)))
        .collect();
    let x_max = live.len().saturating_sub(1) as f64;
    let current = match live.latest() {
        Some(s) => format!(" Current: {} vehicles ", s.vehicles),
        None => String::new(),
    };
    let y_max = axis_ceiling(live.peak(), 30);

    let x_labels: Vec<Span> = live
        .samples()
        .map(|s| Span::styled(s.label.clone(), Style::default().fg(AXIS_GRAY)))
        .collect();
    let y_labels = vec![
        Span::raw("0"),
        Span::raw(format!("{}", y_max / 2)),
        Span::raw(format!("{y_max}")),
    ];

    let dataset = Dataset::default()
        .name("Vehicles")
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(LINE_PURPLE))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            panel("Live Traffic Monitor", "Vehicles passing through in real-time", LINE_PURPLE).title(
                Title::from(Span::styled(current, Style::default().fg(LINE_PURPLE)))
                    .position(Position::Bottom)
                    .alignment(Alignment::Right),
            ),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(AXIS_GRAY))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(AXIS_GRAY))
                .bounds([0.0, f64::from(y_max)])
                .labels(y_labels),
        );
    f.render_widget(chart, area);
}

fn button_color(control: Control) -> Color {
    match control {
        Control::RerouteTraffic => Color::Green,
        Control::SystemSettings => Color::Blue,
        Control::AlertAuthorities => Color::Red,
        Control::Emergency => Color::Gray,
    }
}

fn draw_controls(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(PANEL_BORDER))
        .title(Span::styled(
            " Traffic Control Options ",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(inner);

    for (control, slot) in Control::ACTIONS.iter().zip(cols.iter()) {
        let color = button_color(*control);
        let focused = app.focus() == *control;
        let text_style = if focused {
            Style::default().fg(Color::Black).bg(color).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        };
        let button = Paragraph::new(Line::from(Span::styled(control.label(), text_style)))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(if focused { BorderType::Double } else { BorderType::Rounded })
                    .border_style(Style::default().fg(color)),
            );
        f.render_widget(button, *slot);
    }
}

fn draw_keys(f: &mut Frame, area: Rect) {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Black).bg(Color::Gray));
    let help = Line::from(vec![
        Span::raw(" "),
        key(" e "),
        Span::raw(" emergency  "),
        key(" tab "),
        Span::raw(" focus  "),
        key(" ←↑↓→ "),
        Span::raw(" move  "),
        key(" enter "),
        Span::raw(" press  "),
        key(" q "),
        Span::raw(" quit"),
    ]);
    f.render_widget(Paragraph::new(help).style(Style::default().bg(Color::Rgb(20, 20, 20))), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::VehicleSource;
    use chrono::NaiveTime;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    struct Constant(u32);

    impl VehicleSource for Constant {
        fn next_count(&mut self) -> u32 {
            self.0
        }
    }

    fn app_at(h: u32, m: u32) -> App {
        App::starting_at(
            DashboardConfig::default(),
            Box::new(Constant(17)),
            Instant::now(),
            NaiveTime::from_hms_opt(h, m, 0).unwrap(),
        )
    }

    fn render(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("failed to create terminal");
        terminal.draw(|f| draw(f, app)).expect("failed to draw");
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_header_and_panels() {
        let screen = render(&app_at(17, 30), 160, 40);
        assert!(screen.contains("Smart Route Admin"));
        assert!(screen.contains("Traffic Management Dashboard"));
        assert!(screen.contains("Current Time"));
        assert!(screen.contains("05:30 PM"));
        assert!(screen.contains("Traffic Status"));
        assert!(screen.contains("High (80%)"));
        assert!(screen.contains("Daily Congestion (8AM - 9PM)"));
        assert!(screen.contains("Live Traffic Monitor"));
        assert!(screen.contains("Traffic Control Options"));
        assert!(screen.contains("Reroute Traffic"));
        assert!(screen.contains("System Settings"));
        assert!(screen.contains("Alert Authorities"));
        assert!(screen.contains("NORMAL"));
    }

    #[test]
    fn renders_emergency_indicator() {
        let mut app = app_at(10, 0);
        app.handle_key(KeyEvent::new(KeyCode::Char('e'), KeyModifiers::NONE));
        let screen = render(&app, 160, 40);
        assert!(screen.contains("EMERGENCY"));
        assert!(!screen.contains("NORMAL"));
        assert!(screen.contains("Moderate (35%)"));
    }

    #[test]
    fn live_chart_axis_uses_window_labels() {
        let mut app = app_at(8, 0);
        app.rotate_live();
        let screen = render(&app, 160, 40);
        let axis_row = screen
            .lines()
            .find(|line| line.contains("5 min ago"))
            .expect("x axis labels missing");
        for label in ["4 min ago", "3 min ago", "2 min ago", "1 min ago", "Current"] {
            assert!(axis_row.contains(label), "{label} not on axis row: {axis_row}");
        }
        assert!(!axis_row.contains("Current Time"));
        assert!(screen.contains("│Vehicles│"));
        assert!(screen.contains("Current: 17 vehicles"));
    }

    #[test]
    fn daily_chart_labels_readable_at_80_columns() {
        let screen = render(&app_at(12, 0), 80, 24);
        let label_row = screen
            .lines()
            .find(|line| line.contains("12p"))
            .expect("daily chart labels missing");
        let tokens: Vec<&str> = label_row
            .split(|c: char| c.is_whitespace() || c == '│')
            .filter(|t| !t.is_empty())
            .collect();
        let expected: Vec<String> = app_at(12, 0).daily().iter().map(|s| s.short_label()).collect();
        assert_eq!(tokens, expected);
        assert!(screen.contains("■ Congestion %"));
    }

    #[test]
    fn daily_chart_uses_full_labels_when_wide() {
        let screen = render(&app_at(12, 0), 240, 40);
        let label_row = screen
            .lines()
            .find(|line| line.contains("10 AM"))
            .expect("full hour labels missing");
        for label in ["8 AM", "11 AM", "12 PM", "9 PM"] {
            assert!(label_row.contains(label), "{label} missing: {label_row}");
        }
    }

    #[test]
    fn restore_leaves_alternate_screen_and_shows_cursor() {
        let mut out: Vec<u8> = Vec::new();
        restore_terminal(&mut out).expect("restore failed");
        let written = String::from_utf8(out).expect("escape codes are ascii");
        assert!(written.contains("\x1b[?1049l"));
        assert!(written.contains("\x1b[?25h"));
    }

    #[test]
    fn renders_in_small_terminal() {
        let screen = render(&app_at(23, 0), 60, 20);
        assert_eq!(screen.lines().count(), 20);
    }
}
