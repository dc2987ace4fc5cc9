use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph, Row, Table};
use std::io::{self, stdout};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use simfov::games::GameTable;
use simfov::geometry::{solve, AspectRatio, FovResult};
use simfov::units::{ScreenInput, ViewerInput};

use crate::config::Config;

const RATIO_PRESETS: [(f64, f64); 6] = [
    (16.0, 9.0),
    (16.0, 10.0),
    (21.0, 9.0),
    (32.0, 9.0),
    (4.0, 3.0),
    (5.0, 4.0),
];

const CURVE_STEP_MM: f64 = 100.0;
const INPUT_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Ratio,
    Size,
    Distance,
    Unit,
    Curve,
    Screens,
    Bezel,
}

const FIELDS: [Field; 7] = [
    Field::Ratio,
    Field::Size,
    Field::Distance,
    Field::Unit,
    Field::Curve,
    Field::Screens,
    Field::Bezel,
];

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Ratio => "Aspect ratio",
            Field::Size => "Diagonal",
            Field::Distance => "Distance",
            Field::Unit => "Distance unit",
            Field::Curve => "Curve radius",
            Field::Screens => "Screens",
            Field::Bezel => "Bezel",
        }
    }
}

/// Editable calculator input
#[derive(Debug, Clone)]
struct Form {
    screen: ScreenInput,
    viewer: ViewerInput,
    min_curve_radius_mm: f64,
    selected: usize,
}

impl Form {
    fn new(config: &Config) -> Self {
        Self {
            screen: config.screen,
            viewer: config.viewer,
            min_curve_radius_mm: config.output.min_curve_radius_mm,
            selected: 0,
        }
    }

    fn field(&self) -> Field {
        FIELDS[self.selected]
    }

    fn select_next(&mut self) {
        self.selected = (self.selected + 1) % FIELDS.len();
    }

    fn select_prev(&mut self) {
        self.selected = (self.selected + FIELDS.len() - 1) % FIELDS.len();
    }

    /// Step the selected field up (`1.0`) or down (`-1.0`)
    fn adjust(&mut self, direction: f64) {
        match self.field() {
            Field::Ratio => {
                let current = RATIO_PRESETS
                    .iter()
                    .position(|&(h, v)| AspectRatio::new(h, v) == self.screen.ratio);
                let len = RATIO_PRESETS.len();
                let next = match current {
                    Some(i) if direction > 0.0 => (i + 1) % len,
                    Some(i) => (i + len - 1) % len,
                    None => 0,
                };
                let (h, v) = RATIO_PRESETS[next];
                self.screen.ratio = AspectRatio::new(h, v);
            }
            Field::Size => {
                self.screen.diagonal_in = (self.screen.diagonal_in + direction * 0.5).max(1.0);
            }
            Field::Distance => {
                self.viewer.distance = (self.viewer.distance + direction).max(1.0);
            }
            Field::Unit => self.viewer.toggle_unit(),
            Field::Curve => {
                let next = self.screen.curve_radius_mm + direction * CURVE_STEP_MM;
                self.screen.curve_radius_mm = if next >= self.min_curve_radius_mm {
                    next
                } else if direction > 0.0 {
                    self.min_curve_radius_mm
                } else {
                    0.0
                };
            }
            Field::Screens => {
                self.screen.screens = if self.screen.screens == 3 { 1 } else { 3 };
            }
            Field::Bezel => {
                self.screen.bezel_mm = (self.screen.bezel_mm + direction).max(0.0);
            }
        }
    }

    fn value_text(&self, field: Field) -> String {
        match field {
            Field::Ratio => self.screen.ratio.to_string(),
            Field::Size => format!("{:.1}\"", self.screen.diagonal_in),
            Field::Distance => format!("{} {}", self.viewer.distance, self.viewer.unit),
            Field::Unit => self.viewer.unit.to_string(),
            Field::Curve => {
                if self.screen.curve_radius_mm < self.min_curve_radius_mm {
                    "flat".to_string()
                } else {
                    format!("{}R", self.screen.curve_radius_mm)
                }
            }
            Field::Screens => self.screen.screens.to_string(),
            Field::Bezel => format!("{} mm", self.screen.bezel_mm),
        }
    }

    fn solve(&self) -> Result<FovResult, String> {
        let spec = self
            .screen
            .to_spec(self.min_curve_radius_mm)
            .map_err(|e| e.to_string())?;
        let viewer = self.viewer.to_position().map_err(|e| e.to_string())?;
        solve(&spec, &viewer).map_err(|e| e.to_string())
    }
}

pub async fn run(config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Forward terminal events from a dedicated thread until the receiver is dropped
fn spawn_input_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel(32);
    std::thread::spawn(move || {
        while !tx.is_closed() {
            match event::poll(INPUT_POLL) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.blocking_send(ev).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read terminal event: {}", e);
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
        }
        debug!("Input reader stopped");
    });
    rx
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, config: Config) -> Result<()> {
    let table = config.game_table();
    let mut form = Form::new(&config);
    let mut events = spawn_input_reader();

    loop {
        let outcome = form.solve();
        terminal.draw(|frame| render(frame, &form, &outcome, &table))?;

        let Some(event) = events.recv().await else {
            break;
        };

        let Event::Key(key) = event else {
            // Resize and friends only need a redraw
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key {
            KeyEvent {
                code: KeyCode::Char('q') | KeyCode::Esc,
                ..
            }
            | KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => {
                break;
            }
            KeyEvent {
                code: KeyCode::Up | KeyCode::Char('k'),
                ..
            } => form.select_prev(),
            KeyEvent {
                code: KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab,
                ..
            } => form.select_next(),
            KeyEvent {
                code: KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('-'),
                ..
            } => form.adjust(-1.0),
            KeyEvent {
                code: KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('+'),
                ..
            } => form.adjust(1.0),
            KeyEvent {
                code: KeyCode::Char('u'),
                ..
            } => form.viewer.toggle_unit(),
            _ => {}
        }
    }

    Ok(())
}

fn render(frame: &mut Frame, form: &Form, outcome: &Result<FovResult, String>, table: &GameTable) {
    let area = frame.area();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    render_form(frame, columns[0], form);

    match outcome {
        Ok(result) => render_result(frame, columns[1], result, table),
        Err(_) => frame.render_widget(Block::bordered().title(" Field of view "), columns[1]),
    }

    render_status(frame, rows[1], outcome);
}

fn render_form(frame: &mut Frame, area: Rect, form: &Form) {
    let rows = FIELDS.iter().enumerate().map(|(i, &field)| {
        let style = if i == form.selected {
            Style::default().fg(Color::Black).bg(Color::Yellow)
        } else {
            Style::default()
        };
        Row::new(vec![field.label().to_string(), form.value_text(field)]).style(style)
    });

    let widget = Table::new(rows, [Constraint::Percentage(55), Constraint::Percentage(45)])
        .block(Block::bordered().title(" Setup "));
    frame.render_widget(widget, area);
}

fn render_result(frame: &mut Frame, area: Rect, result: &FovResult, table: &GameTable) {
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Min(3)])
        .split(area);

    let highlight = Style::default().fg(Color::Green).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(format!(
            "Panel: {:.2} x {:.2} cm",
            result.width_cm(),
            result.height_cm()
        )),
        Line::from(vec![
            "Horizontal: ".into(),
            Span::styled(format!("{:.2}°", result.horizontal_deg()), highlight),
        ]),
        Line::from(vec![
            "Vertical:   ".into(),
            Span::styled(format!("{:.2}°", result.vertical_deg()), highlight),
        ]),
    ];
    if let Some(total) = result.triple_screen_deg() {
        lines.push(Line::from(vec![
            "Triple:     ".into(),
            Span::styled(format!("{:.2}°", total), highlight),
        ]));
        lines.push(Line::from(format!("Side angle: {:.2}°", result.side_angle_deg())));
    }
    let summary = Paragraph::new(lines).block(Block::bordered().title(" Field of view "));
    frame.render_widget(summary, parts[0]);

    let rows = table
        .map_all(result)
        .into_iter()
        .map(|game| Row::new(vec![game.name, game.axis.to_string(), game.value]));
    let games = Table::new(
        rows,
        [
            Constraint::Percentage(55),
            Constraint::Percentage(20),
            Constraint::Percentage(25),
        ],
    )
    .header(Row::new(vec!["Title", "Axis", "Setting"]).style(Style::default().add_modifier(Modifier::BOLD)))
    .block(Block::bordered().title(" Games "));
    frame.render_widget(games, parts[1]);
}

const KEY_HELP: &str = " [↑↓] select | [←→] adjust | [u]nit | [q]uit ";

/// Key help, or the reason the current setup has no result
fn status_text(outcome: &Result<FovResult, String>) -> (String, Style) {
    match outcome {
        Ok(_) => (KEY_HELP.to_string(), Style::default().fg(Color::DarkGray)),
        Err(message) => (format!(" {} ", message), Style::default().fg(Color::Red)),
    }
}

fn render_status(frame: &mut Frame, area: Rect, outcome: &Result<FovResult, String>) {
    let (text, style) = status_text(outcome);
    frame.render_widget(Paragraph::new(text).style(style), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use simfov::units::DistanceUnit;

    fn form() -> Form {
        Form::new(&Config::default())
    }

    fn select(form: &mut Form, field: Field) {
        while form.field() != field {
            form.select_next();
        }
    }

    #[test]
    fn test_selection_wraps() {
        let mut form = form();
        form.select_prev();
        assert_eq!(form.field(), Field::Bezel);
        form.select_next();
        assert_eq!(form.field(), Field::Ratio);
    }

    #[test]
    fn test_ratio_cycles_presets() {
        let mut form = form();
        form.adjust(1.0);
        assert_eq!(form.screen.ratio, AspectRatio::new(16.0, 10.0));
        form.adjust(-1.0);
        form.adjust(-1.0);
        assert_eq!(form.screen.ratio, AspectRatio::new(5.0, 4.0));
    }

    #[test]
    fn test_curve_snaps_between_flat_and_minimum() {
        let mut form = form();
        select(&mut form, Field::Curve);

        form.adjust(1.0);
        assert_eq!(form.screen.curve_radius_mm, 500.0);
        form.adjust(1.0);
        assert_eq!(form.screen.curve_radius_mm, 600.0);
        form.adjust(-1.0);
        form.adjust(-1.0);
        assert_eq!(form.screen.curve_radius_mm, 0.0);
        assert_eq!(form.value_text(Field::Curve), "flat");
    }

    #[test]
    fn test_unit_toggle_converts_distance() {
        let mut form = form();
        select(&mut form, Field::Unit);
        form.adjust(1.0);
        assert_eq!(form.viewer.unit, DistanceUnit::Inch);
        assert_eq!(form.viewer.distance, 24.0);
    }

    #[test]
    fn test_triple_toggle_resolves() {
        let mut form = form();
        select(&mut form, Field::Screens);
        form.adjust(1.0);

        let result = form.solve().unwrap();
        assert!(result.triple_screen_deg().is_some());
    }

    #[test]
    fn test_invalid_geometry_reported_as_text() {
        let mut form = form();
        form.screen.curve_radius_mm = 500.0;
        form.screen.diagonal_in = 57.0;
        assert!(form.solve().unwrap_err().contains("curve radius"));
    }

    #[test]
    fn test_status_line_carries_error() {
        let mut form = form();
        form.screen.curve_radius_mm = 500.0;
        form.screen.diagonal_in = 57.0;

        let (text, style) = status_text(&form.solve());
        assert!(text.contains("curve radius"));
        assert_eq!(style.fg, Some(Color::Red));

        form.screen.curve_radius_mm = 0.0;
        let (text, _) = status_text(&form.solve());
        assert_eq!(text, KEY_HELP);
    }

    #[test]
    fn test_size_never_reaches_zero() {
        let mut form = form();
        select(&mut form, Field::Size);
        form.screen.diagonal_in = 1.0;
        form.adjust(-1.0);
        assert_eq!(form.screen.diagonal_in, 1.0);
        assert!(form.solve().is_ok());
    }
}
