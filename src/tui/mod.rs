//! Ratatui-based data-entry form.
//!
//! Observations are typed in (time + concentration) or bulk-loaded from a
//! file. Whenever at least two points are present the series is refitted and
//! the chart shows the log2-transformed points with the fitted line.

use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Terminal,
};

use crate::cli::TuiArgs;
use crate::domain::{LogLinearFit, Observation, ObservationSeries, TimeUnit};
use crate::error::{AppError, EXIT_RUNTIME};

mod plotters_chart;

use plotters_chart::GrowthChart;

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let mut app = App::new(args.unit);
    if let Some(path) = &args.file {
        app.load(path);
    }

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Restores the terminal (raw mode, alternate screen) and the log level on exit.
///
/// Logging goes to stderr, which would scribble over the alternate screen, so
/// it is switched off while the guard is alive.
struct TerminalGuard {
    log_level: log::LevelFilter,
}

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        let log_level = log::max_level();
        enable_raw_mode().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
        }
        log::set_max_level(log::LevelFilter::Off);
        Ok(Self { log_level })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        log::set_max_level(self.log_level);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Time,
    Concentration,
    Points,
    LoadPath,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Time, Focus::Concentration, Focus::Points, Focus::LoadPath];

    fn next(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let idx = Self::ORDER.iter().position(|&f| f == self).unwrap_or(0);
        Self::ORDER[(idx + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

struct App {
    series: ObservationSeries,
    fit: Option<LogLinearFit>,
    unit: TimeUnit,
    time_input: String,
    conc_input: String,
    path_input: String,
    focus: Focus,
    selected: usize,
    status: String,
    status_kind: StatusKind,
}

impl App {
    fn new(unit: TimeUnit) -> Self {
        Self {
            series: ObservationSeries::new(),
            fit: None,
            unit,
            time_input: String::new(),
            conc_input: String::new(),
            path_input: String::new(),
            focus: Focus::Time,
            selected: 0,
            status: "Enter data points and they will be fitted automatically.".to_string(),
            status_kind: StatusKind::Info,
        }
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        match key.code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return false;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.prev();
                return false;
            }
            _ => {}
        }

        match self.focus {
            Focus::Time | Focus::Concentration => self.handle_number_edit(key.code),
            Focus::LoadPath => self.handle_path_edit(key.code),
            Focus::Points => return self.handle_points_key(key.code),
        }
        false
    }

    fn handle_number_edit(&mut self, code: KeyCode) {
        let field = match self.focus {
            Focus::Time => &mut self.time_input,
            _ => &mut self.conc_input,
        };
        match code {
            KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E') => field.push(c),
            KeyCode::Backspace => {
                field.pop();
            }
            KeyCode::Esc => field.clear(),
            KeyCode::Enter => {
                if self.focus == Focus::Time && self.conc_input.is_empty() {
                    self.focus = Focus::Concentration;
                } else {
                    self.add_point();
                }
            }
            _ => {}
        }
    }

    fn handle_path_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.path_input.push(c),
            KeyCode::Backspace => {
                self.path_input.pop();
            }
            KeyCode::Esc => self.path_input.clear(),
            KeyCode::Enter => {
                let path = self.path_input.trim().to_string();
                if path.is_empty() {
                    self.set_error("Type a file path, then press Enter.");
                } else {
                    self.load(Path::new(&path));
                }
            }
            _ => {}
        }
    }

    fn handle_points_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.series.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Delete | KeyCode::Backspace | KeyCode::Char('d') => self.remove_selected(),
            KeyCode::Char('u') => {
                self.unit = self.unit.next();
                self.refit();
            }
            _ => {}
        }
        false
    }

    fn add_point(&mut self) {
        let (Ok(t), Ok(c)) = (self.time_input.trim().parse::<f64>(), self.conc_input.trim().parse::<f64>()) else {
            self.set_error("Input Error: Time and Concentration must be valid numbers.");
            return;
        };

        match Observation::new(t, c) {
            Ok(obs) => {
                self.selected = self.series.add(obs);
                self.time_input.clear();
                self.conc_input.clear();
                self.focus = Focus::Time;
                self.refit();
            }
            // `GrowthError` already renders as "Error: ...".
            Err(err) => self.set_error(format!("Input {err}")),
        }
    }

    fn remove_selected(&mut self) {
        let Some(target) = self.series.get(self.selected).copied() else {
            self.set_error("Please select a data point to remove.");
            return;
        };
        if self.series.remove_matching(&target).is_none() {
            self.set_error("Could not find selected point in data list.");
            return;
        }
        self.selected = self.selected.min(self.series.len().saturating_sub(1));
        self.refit();
    }

    fn load(&mut self, path: &Path) {
        match crate::io::ingest::load_observations(path) {
            Ok(data) => {
                let n = data.series.len();
                let skipped = data.issues.len();
                self.series.replace(data.series);
                self.selected = 0;
                self.path_input.clear();
                self.refit();
                if self.status_kind == StatusKind::Info {
                    self.set_info(format!("{n} data points found and loaded ({skipped} line(s) skipped)."));
                }
            }
            Err(err) => {
                // Loader errors carry the format help on later lines.
                let first = err.message().lines().next().unwrap_or("").to_string();
                self.set_error(format!("Load failed: {first}"));
            }
        }
    }

    fn refit(&mut self) {
        if self.series.len() < 2 {
            self.fit = None;
            self.set_info("Enter at least two data points for the fit.");
            return;
        }
        match crate::app::pipeline::fit_observations(&self.series) {
            Ok(fit) => {
                self.fit = Some(fit);
                self.set_info(crate::report::format_fit_headline(fit.rate, fit.r_squared, self.unit));
            }
            Err(err) => {
                self.fit = None;
                self.set_error(format!("Calculation failed. {err}"));
            }
        }
    }

    fn set_info(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        self.status_kind = StatusKind::Info;
    }

    fn set_error(&mut self, msg: impl Into<String>) {
        self.status = msg.into();
        self.status_kind = StatusKind::Error;
    }

    fn draw(&self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("growth", Style::default().fg(Color::Cyan)),
            Span::raw(" - microbial growth rate (log2-linear fit)"),
        ]));

        let summary = match &self.fit {
            Some(fit) => {
                let doubling = fit
                    .doubling_time()
                    .map(|td| format!("{td:.4} {}", self.unit))
                    .unwrap_or_else(|| "-".to_string());
                format!(
                    "{} | n={} | doubling time: {doubling}",
                    crate::report::format_fit_headline(fit.rate, fit.r_squared, self.unit),
                    self.series.len(),
                )
            }
            None => format!("n={} | unit: {}", self.series.len(), self.unit),
        };
        lines.push(Line::from(Span::styled(summary, Style::default().fg(Color::Magenta))));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(38), Constraint::Min(0)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(cols[0]);

        self.draw_inputs(frame, left[0]);
        self.draw_points(frame, left[1]);
        self.draw_chart(frame, cols[1]);
    }

    fn draw_inputs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let field = |label: &str, value: &str, focus: Focus| {
            let style = if self.focus == focus {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default()
            };
            Line::from(vec![Span::raw(format!("{label:<14}")), Span::styled(format!("{value:<20}"), style)])
        };

        let lines = vec![
            field("Time (t):", &self.time_input, Focus::Time),
            field("Conc. (N):", &self.conc_input, Focus::Concentration),
            field("Load file:", &self.path_input, Focus::LoadPath),
        ];
        let p = Paragraph::new(Text::from(lines))
            .block(Block::default().title("1. Enter Data").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_points(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let items: Vec<ListItem> = self
            .series
            .iter()
            .enumerate()
            .map(|(i, o)| ListItem::new(format!("{:>3} {:>12.2} {:>14.2}", i + 1, o.time(), o.concentration())))
            .collect();

        let title = if self.focus == Focus::Points {
            "2. Data Points (focused)"
        } else {
            "2. Data Points"
        };
        let list = List::new(items)
            .block(Block::default().title(title).borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ListState::default();
        if !self.series.is_empty() {
            state.select(Some(self.selected));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("3. Growth Curve Fit").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(data) = chart_series(&self.series, self.fit.as_ref()) else {
            let msg = Paragraph::new("Add points to see the log2 growth curve.")
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::ITALIC));
            frame.render_widget(msg, inner);
            return;
        };

        let selected = self
            .series
            .get(self.selected)
            .map(|o| (o.time(), o.log2_concentration()));

        let widget = GrowthChart {
            line: &data.line,
            points: &data.points,
            selected,
            x_bounds: data.x_bounds,
            y_bounds: data.y_bounds,
            x_label: format!("Time ({})", self.unit),
            y_label: "log2(N)",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab focus  Enter add/load  ↑/↓ select  d remove  u unit  q quit";
        let status_color = match self.status_kind {
            StatusKind::Info => Color::Yellow,
            StatusKind::Error => Color::Red,
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(status_color)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Series and bounds for the chart.
#[derive(Debug, Clone)]
struct ChartData {
    line: Vec<(f64, f64)>,
    points: Vec<(f64, f64)>,
    x_bounds: [f64; 2],
    y_bounds: [f64; 2],
}

/// Build chart series for Plotters. `None` when there is nothing to draw.
fn chart_series(series: &ObservationSeries, fit: Option<&LogLinearFit>) -> Option<ChartData> {
    let (mut t0, mut t1) = series.time_range()?;
    if t1 <= t0 {
        t0 -= 0.5;
        t1 += 0.5;
    }

    let points: Vec<(f64, f64)> = series.iter().map(|o| (o.time(), o.log2_concentration())).collect();

    let n = 100usize;
    let line: Vec<(f64, f64)> = match fit {
        Some(fit) => (0..n)
            .map(|i| {
                let u = i as f64 / (n as f64 - 1.0);
                let t = t0 + u * (t1 - t0);
                (t, fit.predict_log2(t))
            })
            .collect(),
        None => Vec::new(),
    };

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in points.iter().chain(&line) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if y_max <= y_min {
        y_min -= 0.5;
        y_max += 0.5;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    Some(ChartData {
        line,
        points,
        x_bounds: [t0, t1],
        y_bounds: [y_min - pad, y_max + pad],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn enter_point(app: &mut App, t: &str, c: &str) {
        app.focus = Focus::Time;
        type_str(app, t);
        press(app, KeyCode::Enter);
        type_str(app, c);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn entering_points_refits_after_two() {
        let mut app = App::new(TimeUnit::Hours);
        enter_point(&mut app, "0", "10");
        assert_eq!(app.series.len(), 1);
        assert!(app.fit.is_none());

        enter_point(&mut app, "1", "20");
        let fit = app.fit.expect("fit after two points");
        assert!((fit.rate - 1.0).abs() < 1e-10);
        assert_eq!(app.status_kind, StatusKind::Info);
        assert!(app.status.starts_with("Fitted k: 1.0000 gen/hours"));
    }

    #[test]
    fn points_are_kept_sorted_and_new_point_selected() {
        let mut app = App::new(TimeUnit::Hours);
        enter_point(&mut app, "2", "40");
        enter_point(&mut app, "0", "10");
        assert_eq!(app.series.times(), vec![0.0, 2.0]);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn invalid_entry_sets_error_and_keeps_inputs() {
        let mut app = App::new(TimeUnit::Hours);
        enter_point(&mut app, "-1", "10");
        assert!(app.series.is_empty());
        assert_eq!(app.status_kind, StatusKind::Error);
        assert!(app.status.contains("non-negative"));
        assert_eq!(app.time_input, "-1");
    }

    #[test]
    fn letters_are_ignored_in_number_fields() {
        let mut app = App::new(TimeUnit::Hours);
        type_str(&mut app, "1x2e3");
        assert_eq!(app.time_input, "12e3");
    }

    #[test]
    fn remove_selected_point_and_refit() {
        let mut app = App::new(TimeUnit::Hours);
        enter_point(&mut app, "0", "1");
        enter_point(&mut app, "1", "2");
        enter_point(&mut app, "2", "4");

        app.focus = Focus::Points;
        press(&mut app, KeyCode::Up);
        assert_eq!(app.selected, 1);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.series.times(), vec![0.0, 2.0]);
        assert!(app.fit.is_some());

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('d'));
        assert!(app.series.is_empty());
        assert!(app.fit.is_none());

        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.status_kind, StatusKind::Error);
    }

    #[test]
    fn unit_cycles_and_quit_from_points() {
        let mut app = App::new(TimeUnit::Hours);
        app.focus = Focus::Points;
        assert!(!press(&mut app, KeyCode::Char('u')));
        assert_eq!(app.unit, TimeUnit::Minutes);
        assert!(press(&mut app, KeyCode::Char('q')));
    }

    #[test]
    fn q_in_a_text_field_does_not_quit() {
        let mut app = App::new(TimeUnit::Hours);
        app.focus = Focus::LoadPath;
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.path_input, "q");
        assert!(app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn tab_cycles_focus_both_ways() {
        let mut app = App::new(TimeUnit::Hours);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Concentration);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::LoadPath);
    }

    #[test]
    fn load_replaces_series() {
        let path = std::env::temp_dir().join(format!("growth_tui_{}.txt", std::process::id()));
        std::fs::write(&path, "# t c\n0 1\n1 2\noops\n2 4\n").unwrap();

        let mut app = App::new(TimeUnit::Hours);
        enter_point(&mut app, "5", "5");
        app.focus = Focus::LoadPath;
        type_str(&mut app, path.to_str().unwrap());
        press(&mut app, KeyCode::Enter);
        std::fs::remove_file(&path).ok();

        assert_eq!(app.series.len(), 3);
        assert!(app.fit.is_some());
        assert!(app.status.contains("3 data points found and loaded (1 line(s) skipped)"));
        assert!(app.path_input.is_empty());
    }

    #[test]
    fn failed_load_keeps_existing_points() {
        let mut app = App::new(TimeUnit::Hours);
        enter_point(&mut app, "0", "1");
        app.load(Path::new("/no/such/file.csv"));
        assert_eq!(app.series.len(), 1);
        assert_eq!(app.status_kind, StatusKind::Error);
        assert!(app.status.starts_with("Load failed:"));
    }

    #[test]
    fn chart_series_bounds_cover_points_and_line() {
        let series = ObservationSeries::from_observations(vec![
            Observation::new(0.0, 1.0).unwrap(),
            Observation::new(4.0, 16.0).unwrap(),
        ]);
        let fit = crate::fit::fit_series(&series).unwrap();
        let data = chart_series(&series, Some(&fit)).unwrap();

        assert_eq!(data.x_bounds, [0.0, 4.0]);
        assert!(data.y_bounds[0] < 0.0 && data.y_bounds[1] > 4.0);
        assert_eq!(data.points, vec![(0.0, 0.0), (4.0, 4.0)]);
        assert_eq!(data.line.len(), 100);
    }

    #[test]
    fn chart_series_handles_single_point_and_empty() {
        assert!(chart_series(&ObservationSeries::new(), None).is_none());

        let one = ObservationSeries::from_observations(vec![Observation::new(3.0, 8.0).unwrap()]);
        let data = chart_series(&one, None).unwrap();
        assert_eq!(data.x_bounds, [2.5, 3.5]);
        assert!(data.line.is_empty());
        assert!(data.y_bounds[0] < 3.0 && data.y_bounds[1] > 3.0);
    }
}
