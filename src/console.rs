//! # Console Interface Module
//!
//! Interactive terminal view of a circuit of file memories. Each placement
//! is shown with its file name, the latched address in hex, the five-byte
//! window around it and an indicator when the backing file is unavailable.
//!
//! ## Keys
//! - `space`: advance one tick
//! - `r`: run / pause continuous ticking
//! - `l`: reload every backing file
//! - `h`: toggle help
//! - `q` / `Esc`: quit

use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::debug;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use serde::{Deserialize, Serialize};
use std::io;
use std::time::{Duration, Instant};

use crate::circuit::{Circuit, PlacementId};
use crate::components::memory::windowed_device::{WINDOW_RADIUS, WINDOW_SIZE};
use crate::view::{format_window_entry, DeviceView};

/// Console configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub refresh_rate_ms: u64,
    /// Delay between ticks while running
    pub tick_interval_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 50,
            tick_interval_ms: 250,
        }
    }
}

const PLACEMENT_HEIGHT: u16 = 7;

/// Console UI application state
pub struct ConsoleApp<'a> {
    circuit: &'a mut Circuit,
    config: ConsoleConfig,
    running: bool,
    auto_tick: bool,
    show_help: bool,
    last_error: Option<String>,
}

impl<'a> ConsoleApp<'a> {
    pub fn new(circuit: &'a mut Circuit, config: ConsoleConfig) -> Self {
        Self {
            circuit,
            config,
            running: false,
            auto_tick: false,
            show_help: false,
            last_error: None,
        }
    }

    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {}", e))?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)
            .map_err(|e| format!("Failed to enter alternate screen: {}", e))?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        // Restore the terminal whatever the loop returned
        disable_raw_mode().map_err(|e| format!("Failed to disable raw mode: {}", e))?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .map_err(|e| format!("Failed to leave alternate screen: {}", e))?;
        terminal
            .show_cursor()
            .map_err(|e| format!("Failed to show cursor: {}", e))?;

        result
    }

    fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.running = true;
        let tick_interval = Duration::from_millis(self.config.tick_interval_ms);
        let mut last_tick = Instant::now();

        while self.running {
            terminal.draw(|f| self.draw_ui(f))?;

            if event::poll(Duration::from_millis(self.config.refresh_rate_ms))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key_event(key.code);
                }
            }

            if self.auto_tick && last_tick.elapsed() >= tick_interval {
                self.step();
                last_tick = Instant::now();
            }
        }

        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_auto_ticking(&self) -> bool {
        self.auto_tick
    }

    pub fn handle_key_event(&mut self, key: KeyCode) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                debug!("Quit key pressed");
                self.running = false;
                self.auto_tick = false;
            }
            KeyCode::Char(' ') => self.step(),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.auto_tick = !self.auto_tick;
            }
            KeyCode::Char('l') | KeyCode::Char('L') => {
                debug!("Reloading all placements");
                self.circuit.reload_all();
            }
            KeyCode::Char('h') | KeyCode::Char('H') => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn step(&mut self) {
        match self.circuit.tick() {
            Ok(_) => self.last_error = None,
            Err(e) => {
                self.last_error = Some(e.to_string());
                self.auto_tick = false;
            }
        }
    }

    pub fn draw_ui(&self, f: &mut Frame) {
        let size = f.size();

        if self.show_help {
            self.draw_help_screen(f, size);
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4), // Title bar
                Constraint::Min(PLACEMENT_HEIGHT),
                Constraint::Length(3), // Status bar
            ])
            .split(size);

        self.draw_title(f, chunks[0]);
        self.draw_placements(f, chunks[1]);
        self.draw_status(f, chunks[2]);
    }

    fn draw_title(&self, f: &mut Frame, area: Rect) {
        let key = |text: &'static str| Span::styled(text, Style::default().fg(Color::Yellow));
        let title_text = vec![
            Line::from(vec![Span::styled(
                format!("{} - {}", self.circuit.name(), self.circuit.description()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(vec![
                key("space"),
                Span::raw("=tick, "),
                key("r"),
                Span::raw("=run/pause, "),
                key("l"),
                Span::raw("=reload, "),
                key("h"),
                Span::raw("=help, "),
                key("q"),
                Span::raw("=quit"),
            ]),
        ];

        let title = Paragraph::new(title_text)
            .block(Block::default().borders(Borders::ALL).title("File Memory"))
            .wrap(Wrap { trim: true });
        f.render_widget(title, area);
    }

    fn draw_placements(&self, f: &mut Frame, area: Rect) {
        let views = self.circuit.views();
        if views.is_empty() {
            let empty = Paragraph::new("No placements")
                .block(Block::default().borders(Borders::ALL));
            f.render_widget(empty, area);
            return;
        }

        let constraints: Vec<Constraint> = views
            .iter()
            .map(|_| Constraint::Length(PLACEMENT_HEIGHT))
            .chain(std::iter::once(Constraint::Min(0)))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for ((id, view), row) in views.iter().zip(rows.iter()) {
            f.render_widget(placement_widget(id, view), *row);
        }
    }

    fn draw_status(&self, f: &mut Frame, area: Rect) {
        let clock = self.circuit.clock();
        let mut spans = vec![Span::raw(format!(
            "Tick {} | CLK {} | {}",
            self.circuit.tick_count(),
            clock.level().to_char(),
            if self.auto_tick { "running" } else { "paused" }
        ))];
        if let Some(error) = &self.last_error {
            spans.push(Span::styled(
                format!(" | {}", error),
                Style::default().fg(Color::Red),
            ));
        }

        let status = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Status"));
        f.render_widget(status, area);
    }

    fn draw_help_screen(&self, f: &mut Frame, area: Rect) {
        let entry = |keys: &'static str, text: &'static str| {
            Line::from(vec![
                Span::styled(keys, Style::default().fg(Color::Yellow)),
                Span::raw(text),
            ])
        };
        let help_text = vec![
            Line::from(vec![Span::styled(
                "File Memory Console Help",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            entry("  space", " - Advance one simulation tick"),
            entry("  r", " - Run or pause continuous ticking"),
            entry("  l", " - Re-open every backing file"),
            entry("  h", " - Show/hide this help"),
            entry("  q, Esc", " - Exit"),
            Line::from(""),
            Line::from("The centre byte is the one driven on the output."),
            Line::from("Press any key to return to main view..."),
        ];

        let help = Paragraph::new(help_text)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).title("Help"));
        f.render_widget(help, area);
    }
}

fn placement_widget<'v>(id: &PlacementId, view: &'v DeviceView) -> Paragraph<'v> {
    let title = if view.label.is_empty() {
        id.to_string()
    } else {
        format!("{} ({})", id, view.label)
    };

    let border_style = if view.has_error() {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };

    Paragraph::new(placement_lines(view)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    )
}

pub fn placement_lines(view: &DeviceView) -> Vec<Line<'_>> {
    let mut window_spans = Vec::with_capacity(WINDOW_SIZE * 2);
    for (i, entry) in view.window.iter().enumerate() {
        if i > 0 {
            window_spans.push(Span::raw(" "));
        }
        let offset = i as i64 - WINDOW_RADIUS;
        let style = if offset == 0 {
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::Gray)
        };
        window_spans.push(Span::styled(format_window_entry(*entry), style));
    }

    let status = if view.has_error() {
        Span::styled("unavailable", Style::default().fg(Color::Red))
    } else if view.available {
        Span::styled(
            format!("out 0x{:02X}", view.output()),
            Style::default().fg(Color::Green),
        )
    } else {
        Span::raw("not started")
    };

    vec![
        Line::from(format!("\u{00BB} {}", view.filename)),
        Line::from(format!("@ {}  ({} edge)", view.address_text(), view.trigger)),
        Line::from(window_spans),
        Line::from(vec![status]),
    ]
}
