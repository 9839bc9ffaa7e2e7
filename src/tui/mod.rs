//! Ratatui-based terminal UI.
//!
//! One view per derived panel plus a simulation view. Panels are charted with
//! Plotters (the heatmap as a shaded table); the simulation view edits the
//! scenario form, runs it through the session and charts the step log.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, List, ListItem, Paragraph, Row, Table, Wrap},
};

use crate::app::pipeline::{Backend, PanelRun, load_panels};
use crate::data::ChatRoute;
use crate::derive::{DerivedPanels, HeatmapGrid, MONTH_LABELS};
use crate::domain::{DashConfig, PanelKind};
use crate::error::{AppError, EXIT_RUNTIME};
use crate::report::fmt_money;
use crate::sim::{
    InterpretRequest, ReportRequest, Session, SimulationCache, SimulationForm, SimulationLog, SimulationOutcome,
};

mod plotters_chart;

use plotters_chart::{ChartLine, LinesChart};

const PALETTE: [(u8, u8, u8); 8] = [
    (0, 255, 255),
    (255, 215, 0),
    (0, 255, 0),
    (255, 0, 255),
    (255, 80, 80),
    (100, 149, 237),
    (255, 255, 255),
    (255, 165, 0),
];

const FORM_FIELDS: [&str; 6] = [
    "Base search cost",
    "Base live cost",
    "Base competitor event",
    "New search cost",
    "New live cost",
    "New competitor event",
];

/// Start the TUI.
pub fn run(config: DashConfig, backend: Backend) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, backend);
    app.reload();
    app.event_loop(&mut terminal)
}

/// Restores the terminal (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(EXIT_RUNTIME, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(EXIT_RUNTIME, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Panel(PanelKind),
    Simulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Editing {
    None,
    Field,
    Chat,
}

struct App {
    config: DashConfig,
    views: Vec<View>,
    view: usize,
    run: Option<PanelRun>,
    session: Session<Backend>,
    analyses: SimulationCache<String>,
    last: Option<SimulationOutcome>,
    form: SimulationForm,
    selected_field: usize,
    editing: Editing,
    input: String,
    /// Analysis, chat reply or report link shown under the simulation form.
    note: String,
    status: String,
}

impl App {
    fn new(config: DashConfig, backend: Backend) -> Self {
        let mut views: Vec<View> = config.panels.iter().map(|&p| View::Panel(p)).collect();
        views.push(View::Simulation);

        Self {
            config,
            views,
            view: 0,
            run: None,
            session: Session::new(backend),
            analyses: SimulationCache::new(),
            last: None,
            form: default_form(),
            selected_field: 0,
            editing: Editing::None,
            input: String::new(),
            note: String::new(),
            status: String::new(),
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
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => needs_redraw = true,
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing != Editing::None {
            self.handle_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Right | KeyCode::Tab => self.view = (self.view + 1) % self.views.len(),
            KeyCode::Left | KeyCode::BackTab => self.view = (self.view + self.views.len() - 1) % self.views.len(),
            KeyCode::Char('r') => self.reload(),
            _ if self.current_view() == View::Simulation => self.handle_sim_key(code),
            _ => {}
        }
        false
    }

    fn handle_sim_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up => self.selected_field = self.selected_field.saturating_sub(1),
            KeyCode::Down => self.selected_field = (self.selected_field + 1).min(FORM_FIELDS.len() - 1),
            KeyCode::Enter => {
                if is_flag_field(self.selected_field) {
                    let flag = self.form_field_mut(self.selected_field);
                    *flag = if flag.as_str() == "Y" { "N" } else { "Y" }.to_string();
                } else {
                    self.input = self.form_field(self.selected_field).to_string();
                    self.editing = Editing::Field;
                    self.status = "Editing. Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('s') => self.simulate(),
            KeyCode::Char('i') => self.interpret(),
            KeyCode::Char('g') => self.generate_report(),
            KeyCode::Char('c') => {
                self.input.clear();
                self.editing = Editing::Chat;
                self.status = "Chat: type a message, Enter to send, Esc to cancel.".to_string();
            }
            _ => {}
        }
    }

    fn handle_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = Editing::None;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                let mode = self.editing;
                match mode {
                    Editing::Field => *self.form_field_mut(self.selected_field) = text,
                    Editing::Chat => self.chat(&text),
                    Editing::None => {}
                }
                self.editing = Editing::None;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => {
                let accept = match self.editing {
                    Editing::Field => c.is_ascii_digit() || c == ',' || c == '.',
                    _ => true,
                };
                if accept {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn current_view(&self) -> View {
        self.views[self.view]
    }

    fn reload(&mut self) {
        self.status = format!("Loading {}...", self.config.source);
        match load_panels(&self.config) {
            Ok(run) => {
                self.status = format!(
                    "Loaded {} rows ({} rejected).",
                    run.feed.rows_used(),
                    run.feed.rejected.len()
                );
                self.run = Some(run);
            }
            Err(err) => {
                tracing::warn!(error = %err, "feed load failed");
                self.status = format!("Load failed: {err}");
                self.run = None;
            }
        }
    }

    fn simulate(&mut self) {
        match self.session.submit(&self.form) {
            Ok(outcome) => {
                self.status = format!(
                    "Step {}{}: revenue {} | ROI {:.2}",
                    outcome.step.step,
                    if outcome.cached { " (cached)" } else { "" },
                    fmt_money(outcome.result.new_revenue),
                    outcome.result.new_roi
                );
                self.note.clear();
                self.last = Some(outcome);
            }
            Err(err) => self.status = format!("Simulation failed: {err}"),
        }
    }

    fn interpret(&mut self) {
        let Some(outcome) = &self.last else {
            self.status = "Run a simulation first (s).".to_string();
            return;
        };
        let Some(api) = self.session.backend().api() else {
            self.status = "Interpretation needs the backend (offline mode).".to_string();
            return;
        };

        let request = InterpretRequest::new(&outcome.request, &outcome.result);
        match self
            .analyses
            .get_or_try_insert(&outcome.request, || api.interpret(&request))
        {
            Ok((analysis, cached)) => {
                self.status = if cached { "Analysis (cached)." } else { "Analysis received." }.to_string();
                self.note = analysis;
            }
            Err(err) => self.status = format!("Interpretation failed: {err}"),
        }
    }

    fn generate_report(&mut self) {
        let request = match self.form.validate() {
            Ok(request) => request,
            Err(err) => {
                self.status = err.to_string();
                return;
            }
        };
        let Some(api) = self.session.backend().api() else {
            self.status = "Reports need the backend (offline mode).".to_string();
            return;
        };
        match api.generate_report(&ReportRequest::from(&request)) {
            Ok(url) if url.starts_with('/') => {
                self.note = format!("Report ready: {}{url}", api.base_url());
                self.status = "Report generated.".to_string();
            }
            Ok(url) => {
                self.note = format!("Report ready: {url}");
                self.status = "Report generated.".to_string();
            }
            Err(err) => self.status = format!("Report failed: {err}"),
        }
    }

    fn chat(&mut self, message: &str) {
        if message.trim().is_empty() {
            return;
        }
        let Some(api) = self.session.backend().api() else {
            self.status = "Chat needs the backend (offline mode).".to_string();
            return;
        };
        match api.chat(message, ChatRoute::Chatbot) {
            Ok(reply) => {
                self.note = match &reply.result {
                    Some(r) => format!(
                        "{}\nrevenue {} -> {} | ROI {:.2} -> {:.2}",
                        reply.text,
                        fmt_money(r.base_revenue),
                        fmt_money(r.new_revenue),
                        r.base_roi,
                        r.new_roi
                    ),
                    None => reply.text,
                };
                self.status = "Chat reply received.".to_string();
            }
            Err(err) => self.status = format!("Chat failed: {err}"),
        }
    }

    fn form_field(&self, i: usize) -> &str {
        match i {
            0 => &self.form.base_search_ad_cost,
            1 => &self.form.base_live_ad_cost,
            2 => &self.form.base_competitor_event,
            3 => &self.form.new_search_ad_cost,
            4 => &self.form.new_live_ad_cost,
            _ => &self.form.new_competitor_event,
        }
    }

    fn form_field_mut(&mut self, i: usize) -> &mut String {
        match i {
            0 => &mut self.form.base_search_ad_cost,
            1 => &mut self.form.base_live_ad_cost,
            2 => &mut self.form.base_competitor_event,
            3 => &mut self.form.new_search_ad_cost,
            4 => &mut self.form.new_live_ad_cost,
            _ => &mut self.form.new_competitor_event,
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        self.draw_header(frame, chunks[0]);
        match self.current_view() {
            View::Panel(kind) => self.draw_panel(frame, chunks[1], kind),
            View::Simulation => self.draw_simulation(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let tabs: Vec<Span> = self
            .views
            .iter()
            .enumerate()
            .flat_map(|(i, v)| {
                let name = match v {
                    View::Panel(kind) => short_name(*kind),
                    View::Simulation => "simulate",
                };
                let style = if i == self.view {
                    Style::default().fg(Color::Black).bg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Gray)
                };
                [Span::styled(format!(" {name} "), style), Span::raw(" ")]
            })
            .collect();

        let summary = match &self.run {
            Some(run) => format!(
                "{} | rows {}/{} | {} brands | {} dates | delimiter {}",
                self.config.source,
                run.feed.rows_used(),
                run.feed.rows_read,
                run.panels.universe.brands.len(),
                run.panels.universe.dates.len(),
                run.feed.delimiter.display_name(),
            ),
            None => format!("{} | no data", self.config.source),
        };

        let lines = vec![
            Line::from(tabs),
            Line::from(Span::styled(summary, Style::default().fg(Color::Gray))),
        ];
        let p = Paragraph::new(Text::from(lines)).block(
            Block::default()
                .title(Span::styled("sdash", Style::default().fg(Color::Cyan)))
                .borders(Borders::ALL),
        );
        frame.render_widget(p, area);
    }

    fn draw_panel(&self, frame: &mut ratatui::Frame<'_>, area: Rect, kind: PanelKind) {
        let block = Block::default().title(kind.title()).borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(run) = &self.run else {
            let msg = Paragraph::new("No data (r to reload).").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        if kind == PanelKind::Heatmap {
            if let Some(grid) = &run.panels.heatmap {
                draw_heatmap(frame, inner, grid);
            }
            return;
        }

        let lines = panel_lines(&run.panels, kind);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);
        frame.render_widget(Paragraph::new(legend(&lines)), chunks[0]);

        let dates = &run.panels.universe.dates;
        let fmt_x = |v: f64| {
            let i = v.round();
            if i >= 0.0 && (i - v).abs() < 0.25 {
                dates.get(i as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };
        let fmt_y = |v: f64| format!("{v:.1}");
        let (x_bounds, y_bounds) = bounds(&lines, dates.len());
        let y_label = match kind.metric() {
            Some(metric) => metric.display_name(),
            None => "share %",
        };

        frame.render_widget(
            LinesChart {
                lines: &lines,
                x_bounds,
                y_bounds,
                x_label: "date",
                y_label,
                fmt_x: &fmt_x,
                fmt_y: &fmt_y,
            },
            chunks[1],
        );
    }

    fn draw_simulation(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(48), Constraint::Min(0)])
            .split(area);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(8), Constraint::Length(7), Constraint::Min(0)])
            .split(columns[0]);

        let items: Vec<ListItem> = FORM_FIELDS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let value = if self.editing == Editing::Field && i == self.selected_field {
                    format!("{}_", self.input)
                } else {
                    self.form_field(i).to_string()
                };
                ListItem::new(format!("{label:<22} {value}"))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!("Scenario ({})", self.session.backend().describe()))
                    .borders(Borders::ALL),
            )
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");
        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, left[0], &mut state);

        frame.render_widget(
            Paragraph::new(result_text(self.last.as_ref())).block(Block::default().title("Result").borders(Borders::ALL)),
            left[1],
        );

        let note = if self.editing == Editing::Chat {
            format!("> {}_", self.input)
        } else {
            self.note.clone()
        };
        frame.render_widget(
            Paragraph::new(note)
                .wrap(Wrap { trim: true })
                .block(Block::default().title("Analysis / chat").borders(Borders::ALL)),
            left[2],
        );

        let charts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);
        draw_log_chart(frame, charts[0], self.session.log(), LogSeries::Revenue);
        draw_log_chart(frame, charts[1], self.session.log(), LogSeries::Roi);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = match self.current_view() {
            View::Simulation => "←/→ view  ↑/↓ field  Enter edit/toggle  s run  i interpret  g report  c chat  q quit",
            View::Panel(_) => "←/→ view  r reload  q quit",
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        frame.render_widget(Paragraph::new(line).block(Block::default().borders(Borders::ALL)), area);
    }
}

fn default_form() -> SimulationForm {
    SimulationForm {
        base_competitor_event: "N".to_string(),
        new_competitor_event: "N".to_string(),
        ..SimulationForm::default()
    }
}

fn is_flag_field(i: usize) -> bool {
    i == 2 || i == 5
}

fn short_name(kind: PanelKind) -> &'static str {
    match kind {
        PanelKind::Trend => "trend",
        PanelKind::Share => "share",
        PanelKind::Cpc => "cpc",
        PanelKind::AdSpend => "ad spend",
        PanelKind::Heatmap => "heatmap",
    }
}

/// Chart lines of a series panel, x = position in the date universe.
fn panel_lines(panels: &DerivedPanels, kind: PanelKind) -> Vec<ChartLine<'_>> {
    let color = |i: usize| PALETTE[i % PALETTE.len()];

    if kind == PanelKind::Share {
        let Some(share) = &panels.share else {
            return Vec::new();
        };
        return share
            .brands
            .iter()
            .enumerate()
            .map(|(i, b)| ChartLine {
                label: &b.brand,
                points: b.shares.iter().enumerate().map(|(x, &y)| (x as f64, y)).collect(),
                color: color(i),
            })
            .collect();
    }

    let Some(series) = panels.brand_series(kind) else {
        return Vec::new();
    };
    let slot: std::collections::HashMap<&str, usize> = panels
        .universe
        .dates
        .iter()
        .enumerate()
        .map(|(i, d)| (d.as_str(), i))
        .collect();
    series
        .iter()
        .enumerate()
        .map(|(i, s)| ChartLine {
            label: &s.brand,
            points: s
                .points
                .iter()
                .filter_map(|p| slot.get(p.date.as_str()).map(|&x| (x as f64, p.value)))
                .collect(),
            color: color(i),
        })
        .collect()
}

/// Axis bounds with 5% y padding; degenerate ranges widen to something drawable.
fn bounds(lines: &[ChartLine<'_>], n_dates: usize) -> ([f64; 2], [f64; 2]) {
    let x_bounds = [0.0, n_dates.saturating_sub(1).max(1) as f64];

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in lines.iter().flat_map(|l| l.points.iter()) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if !y_min.is_finite() || !y_max.is_finite() {
        (y_min, y_max) = (0.0, 1.0);
    } else if y_max <= y_min {
        (y_min, y_max) = (y_min - 1.0, y_max + 1.0);
    }
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (x_bounds, [y_min - pad, y_max + pad])
}

fn legend<'a>(lines: &'a [ChartLine<'a>]) -> Line<'a> {
    let spans: Vec<Span> = lines
        .iter()
        .flat_map(|l| {
            let (r, g, b) = l.color;
            [
                Span::styled("━━ ", Style::default().fg(Color::Rgb(r, g, b))),
                Span::raw(format!("{}  ", l.label)),
            ]
        })
        .collect();
    Line::from(spans)
}

fn draw_heatmap(frame: &mut ratatui::Frame<'_>, area: Rect, grid: &HeatmapGrid) {
    let range = grid.value_range();

    let header = Row::new(
        std::iter::once(Cell::from("year")).chain(MONTH_LABELS.iter().map(|m| Cell::from(*m))),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = grid
        .years
        .iter()
        .zip(&grid.cells)
        .map(|(year, cells)| {
            let mut row = vec![Cell::from(year.to_string())];
            row.extend(cells.iter().map(|cell| match (cell, range) {
                (Some(v), Some((lo, hi))) => {
                    Cell::from(format!("{v:.1}")).style(Style::default().fg(Color::Black).bg(heat_color(*v, lo, hi)))
                }
                (Some(v), None) => Cell::from(format!("{v:.1}")),
                (None, _) => Cell::from("-").style(Style::default().fg(Color::DarkGray)),
            }));
            Row::new(row)
        })
        .collect();

    let widths = std::iter::once(Constraint::Length(6)).chain(std::iter::repeat_n(Constraint::Length(7), 12));
    let mut table = Table::new(rows, widths).header(header);
    if grid.skipped > 0 {
        table = table.footer(Row::new([Cell::from(format!(
            "{} records without year/month skipped",
            grid.skipped
        ))]));
    }
    frame.render_widget(table, area);
}

/// Blue (low) to red (high).
fn heat_color(v: f64, lo: f64, hi: f64) -> Color {
    let u = if hi > lo { ((v - lo) / (hi - lo)).clamp(0.0, 1.0) } else { 1.0 };
    Color::Rgb((60.0 + 195.0 * u) as u8, 80, (255.0 - 195.0 * u) as u8)
}

fn result_text(last: Option<&SimulationOutcome>) -> Text<'static> {
    let Some(o) = last else {
        return Text::from("No simulation yet (s to run).");
    };
    let r = &o.result;
    Text::from(vec![
        Line::from(format!("base revenue {:>20}", fmt_money(r.base_revenue))),
        Line::from(format!("new revenue  {:>20}", fmt_money(r.new_revenue))),
        Line::from(format!("change       {:>20}", fmt_money(r.revenue_change))),
        Line::from(format!("ROI {:.2} -> {:.2} ({:+.2})", r.base_roi, r.new_roi, r.roi_change)),
        Line::from(format!("step {}{}", o.step.step, if o.cached { " (cached)" } else { "" })),
    ])
}

#[derive(Debug, Clone, Copy)]
enum LogSeries {
    Revenue,
    Roi,
}

fn draw_log_chart(frame: &mut ratatui::Frame<'_>, area: Rect, log: &SimulationLog, which: LogSeries) {
    let (title, points) = match which {
        LogSeries::Revenue => ("Revenue by step", log.revenue_points()),
        LogSeries::Roi => ("ROI by step", log.roi_points()),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if points.is_empty() {
        frame.render_widget(Paragraph::new("No steps yet.").style(Style::default().fg(Color::Gray)), inner);
        return;
    }

    let lines = [ChartLine {
        label: title,
        points,
        color: PALETTE[0],
    }];
    let (x_bounds, y_bounds) = bounds(&lines, log.len());
    let fmt_x = |v: f64| format!("{v:.0}");
    let fmt_y = |v: f64| match which {
        LogSeries::Revenue => format!("{:.1}B", v / 1e9),
        LogSeries::Roi => format!("{v:.2}"),
    };

    frame.render_widget(
        LinesChart {
            lines: &lines,
            x_bounds,
            y_bounds,
            x_label: "step",
            y_label: "",
            fmt_x: &fmt_x,
            fmt_y: &fmt_y,
        },
        inner,
    );
}
