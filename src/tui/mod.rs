//! Ratatui-based terminal form.
//!
//! The form collects the seven diamond attributes (grade selectors plus
//! numeric measurement inputs), prices them through the shared pipeline, and
//! renders the recommendation next to the encoded feature vector.

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
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color as TuiColor, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::pipeline::PricingPipeline;
use crate::cli::TuiArgs;
use crate::domain::{
    Clarity, Color, DiamondFeatures, EncodedFeatureVector, FEATURE_NAMES, PricePrediction, Quality,
};
use crate::error::PricingError;
use crate::io::artifacts::ArtifactPaths;

/// Form fields in display order.
const FIELD_COUNT: usize = 7;

const FIELD_QUALITY: usize = 0;
const FIELD_COLOR: usize = 1;
const FIELD_CLARITY: usize = 2;
const FIELD_WEIGHT: usize = 3;
const FIELD_LENGTH: usize = 4;
const FIELD_WIDTH: usize = 5;
const FIELD_DEPTH: usize = 6;

/// Step sizes for ←/→ on the numeric fields.
const WEIGHT_STEP: f64 = 0.05;
const MEASUREMENT_STEP: f64 = 0.1;

/// Practical input bounds (the pipeline only requires weight > 0).
const WEIGHT_RANGE: (f64, f64) = (0.01, 5.0);
const LENGTH_RANGE: (f64, f64) = (0.0, 12.0);
const WIDTH_RANGE: (f64, f64) = (0.0, 60.0);
const DEPTH_RANGE: (f64, f64) = (0.0, 32.0);

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), PricingError> {
    let paths = ArtifactPaths::resolve(args.artifact.artifacts);
    let mut app = App::new(&paths)?;

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| PricingError::App(format!("Failed to initialize terminal: {e}")))?;

    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, PricingError> {
        enable_raw_mode()
            .map_err(|e| PricingError::App(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(PricingError::App(format!(
                "Failed to enter alternate screen: {e}"
            )));
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

struct App {
    pipeline: PricingPipeline,
    features: DiamondFeatures,
    selected_field: usize,
    editing: bool,
    edit_input: String,
    result: Option<(EncodedFeatureVector, PricePrediction)>,
    status: String,
}

impl App {
    fn new(paths: &ArtifactPaths) -> Result<Self, PricingError> {
        let pipeline = PricingPipeline::load(paths)?;
        let mut app = Self {
            pipeline,
            // Defaults mirror the classic example diamond.
            features: DiamondFeatures {
                weight: 0.7,
                length: 5.76,
                width: 5.7,
                depth: 3.43,
                quality: Quality::VeryGood,
                color: Color::E,
                clarity: Clarity::SI1,
            },
            selected_field: 0,
            editing: false,
            edit_input: String::new(),
            result: None,
            status: String::new(),
        };
        app.reprice();
        Ok(app)
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), PricingError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| PricingError::App(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| PricingError::App(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| PricingError::App(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
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

    /// Returns `true` when the app should quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_edit_key(code);
            return false;
        }

        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_COUNT - 1 {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.is_numeric_field() {
                    self.editing = true;
                    self.edit_input = format!("{:.2}", self.numeric_value());
                    self.status =
                        "Editing value. Enter to apply, Esc to cancel.".to_string();
                } else {
                    self.reprice();
                }
            }
            KeyCode::Char('p') => self.reprice(),
            _ => {}
        }
        false
    }

    fn handle_edit_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.edit_input.clear();
                self.status.clear();
            }
            KeyCode::Enter => self.apply_edit(),
            KeyCode::Backspace => {
                self.edit_input.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                self.edit_input.push(c);
            }
            _ => {}
        }
    }

    fn apply_edit(&mut self) {
        let parsed: Result<f64, _> = self.edit_input.trim().parse();
        let (min, max) = self.numeric_range();
        match parsed {
            Ok(v) if v.is_finite() && v >= min && v <= max => {
                self.set_numeric_value(v);
                self.editing = false;
                self.edit_input.clear();
                self.reprice();
            }
            Ok(_) => {
                self.status = format!("Value must be in [{min}, {max}].");
            }
            Err(_) => {
                self.status = format!("Not a number: '{}'", self.edit_input);
            }
        }
    }

    fn adjust_field(&mut self, direction: i64) {
        match self.selected_field {
            FIELD_QUALITY => {
                self.features.quality = cycle(&Quality::ALL, self.features.quality, direction);
            }
            FIELD_COLOR => {
                self.features.color = cycle(&Color::ALL, self.features.color, direction);
            }
            FIELD_CLARITY => {
                self.features.clarity = cycle(&Clarity::ALL, self.features.clarity, direction);
            }
            _ => {
                let step = if self.selected_field == FIELD_WEIGHT {
                    WEIGHT_STEP
                } else {
                    MEASUREMENT_STEP
                };
                let (min, max) = self.numeric_range();
                let next = (self.numeric_value() + direction as f64 * step).clamp(min, max);
                self.set_numeric_value(next);
            }
        }
        self.reprice();
    }

    fn is_numeric_field(&self) -> bool {
        self.selected_field >= FIELD_WEIGHT
    }

    fn numeric_value(&self) -> f64 {
        match self.selected_field {
            FIELD_WEIGHT => self.features.weight,
            FIELD_LENGTH => self.features.length,
            FIELD_WIDTH => self.features.width,
            _ => self.features.depth,
        }
    }

    fn set_numeric_value(&mut self, value: f64) {
        match self.selected_field {
            FIELD_WEIGHT => self.features.weight = value,
            FIELD_LENGTH => self.features.length = value,
            FIELD_WIDTH => self.features.width = value,
            _ => self.features.depth = value,
        }
    }

    fn numeric_range(&self) -> (f64, f64) {
        match self.selected_field {
            FIELD_WEIGHT => WEIGHT_RANGE,
            FIELD_LENGTH => LENGTH_RANGE,
            FIELD_WIDTH => WIDTH_RANGE,
            _ => DEPTH_RANGE,
        }
    }

    fn reprice(&mut self) {
        match self
            .pipeline
            .transform(&self.features)
            .and_then(|encoded| Ok((encoded, self.pipeline.predict(&encoded)?)))
        {
            Ok((encoded, prediction)) => {
                self.result = Some((encoded, prediction));
                self.status = "↑/↓ select | ←/→ adjust | Enter edit/price | p price | q quit"
                    .to_string();
            }
            Err(err) => {
                self.result = None;
                self.status = err.to_string();
            }
        }
    }

    fn draw(&self, frame: &mut ratatui::Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(12),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let title = Paragraph::new("dprice - Diamond Price Recommender")
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, rows[0]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
            .split(rows[1]);

        self.draw_form(frame, columns[0]);
        self.draw_result(frame, columns[1]);

        let status = Paragraph::new(self.status.as_str())
            .block(Block::default().borders(Borders::ALL).title("Status"));
        frame.render_widget(status, rows[2]);
    }

    fn draw_form(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let items: Vec<ListItem> = (0..FIELD_COUNT)
            .map(|field| ListItem::new(self.field_line(field)))
            .collect();

        let mut state = ListState::default();
        state.select(Some(self.selected_field));

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Characteristics"),
            )
            .highlight_style(
                Style::default()
                    .fg(TuiColor::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, area, &mut state);
    }

    fn field_line(&self, field: usize) -> Line<'static> {
        let (name, value) = match field {
            FIELD_QUALITY => ("Quality", self.features.quality.to_string()),
            FIELD_COLOR => ("Color", self.features.color.to_string()),
            FIELD_CLARITY => ("Clarity", self.features.clarity.to_string()),
            FIELD_WEIGHT => ("Weight (ct)", format!("{:.2}", self.features.weight)),
            FIELD_LENGTH => ("Length (mm)", format!("{:.2}", self.features.length)),
            FIELD_WIDTH => ("Width (mm)", format!("{:.2}", self.features.width)),
            _ => ("Depth (mm)", format!("{:.2}", self.features.depth)),
        };

        let value = if self.editing && field == self.selected_field {
            format!("{}_", self.edit_input)
        } else {
            format!("◀ {value} ▶")
        };

        Line::from(vec![
            Span::raw(format!("{name:<12} ")),
            Span::styled(value, Style::default().fg(TuiColor::Yellow)),
        ])
    }

    fn draw_result(&self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect) {
        let mut lines: Vec<Line> = Vec::new();

        match &self.result {
            Some((encoded, prediction)) => {
                lines.push(Line::from(Span::styled(
                    crate::report::format_currency(prediction.amount),
                    Style::default()
                        .fg(TuiColor::Green)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::raw(""));
                lines.push(Line::raw(format!(
                    "{:.2} ct = {:.2} mg",
                    self.features.weight,
                    self.features.weight * 200.0
                )));
                lines.push(Line::raw(""));
                lines.push(Line::raw("Encoded features (model order):"));
                for (name, value) in FEATURE_NAMES.iter().zip(encoded.as_array()) {
                    lines.push(Line::raw(format!("  {name:<8} {value:.6}")));
                }
                lines.push(Line::raw(""));
                lines.push(Line::raw(format!(
                    "Model: {} (trained {})",
                    self.pipeline.model.model.describe(),
                    self.pipeline.model.trained_date
                )));
                lines.push(Line::raw(format!(
                    "Encoder: trained {}",
                    self.pipeline.encoder.trained_date
                )));
            }
            None => {
                lines.push(Line::from(Span::styled(
                    "No price available",
                    Style::default().fg(TuiColor::Red),
                )));
                lines.push(Line::raw(""));
                lines.push(Line::raw("Fix the inputs and press p to re-price."));
            }
        }

        let result = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Recommended price"),
        );
        frame.render_widget(result, area);
    }
}

/// Step through an ordered grade list without wrapping.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, direction: i64) -> T {
    let idx = all.iter().position(|v| *v == current).unwrap_or(0) as i64;
    let next = (idx + direction).clamp(0, all.len() as i64 - 1);
    all[next as usize]
}
