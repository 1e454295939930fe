use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use fleetquery_core::{
    console::{execute_line, ConsoleLine, ConsoleOutput, LineLevel, LineOutcome},
    query::TargetKind,
    world::{Position, ViewRequest},
    Session, WorldSnapshot,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

const TICK_RATE: Duration = Duration::from_millis(250);
const MAX_SCROLLBACK: usize = 2000;
const MAX_HISTORY: usize = 100;
const PROMPT: &str = "] ";

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    help: Color,
    danger: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            help: Color::Yellow,
            danger: Color::Red,
        }
    }
}

impl Theme {
    fn line_style(&self, level: LineLevel) -> Style {
        match level {
            LineLevel::Default => Style::default().fg(self.primary_fg),
            LineLevel::Help => Style::default().fg(self.help),
            LineLevel::Error => Style::default().fg(self.danger),
            LineLevel::Echo => Style::default().fg(self.muted),
        }
    }
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Interactive console over one world snapshot.
pub struct ConsoleApp {
    world: WorldSnapshot,
    session: Session,
    scrollback: Vec<ConsoleLine>,
    input: String,
    history: Vec<String>,
    history_cursor: Option<usize>,
    /// Lines scrolled up from the bottom of the scrollback.
    scroll: usize,
    page_height: usize,
    status: String,
    /// Commands issued through the gateway this session.
    commands_issued: usize,
    clock: String,
    should_quit: bool,
    theme: Theme,
}

impl ConsoleApp {
    pub fn new(world: WorldSnapshot, session: Session) -> Self {
        let mut app = Self {
            world,
            session,
            scrollback: Vec::new(),
            input: String::new(),
            history: Vec::new(),
            history_cursor: None,
            scroll: 0,
            page_height: 10,
            status: "Ready".to_string(),
            commands_issued: 0,
            clock: Local::now().format("%H:%M:%S").to_string(),
            should_quit: false,
            theme: Theme::default(),
        };
        let mut out = ConsoleOutput::new();
        out.help("Type 'help' for a list of commands, or a query keyword alone for its usage.");
        app.append(out);
        app
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(Event::Key(key))) => self.handle_key(key),
                Some(AppEvent::Input(_)) => {}
                Some(AppEvent::Tick) => self.handle_tick(),
                None => break,
            }
        }

        restore_terminal(&mut terminal)?;
        info!(commands = self.commands_issued, "Console closed");
        Ok(())
    }

    fn handle_tick(&mut self) {
        self.clock = Local::now().format("%H:%M:%S").to_string();
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('l') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.clear_scrollback();
            }
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.input);
                self.submit(&line);
            }
            KeyCode::Esc => {
                self.input.clear();
                self.history_cursor = None;
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Up => self.history_step(-1),
            KeyCode::Down => self.history_step(1),
            KeyCode::PageUp => self.scroll_by(self.page_height as isize),
            KeyCode::PageDown => self.scroll_by(-(self.page_height as isize)),
            KeyCode::Char(c) => {
                if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                    self.input.push(c);
                }
            }
            _ => {}
        }
    }

    /// Run one line of input: builtins first, then queries.
    fn submit(&mut self, line: &str) {
        let trimmed = line.trim();
        self.history_cursor = None;
        self.scroll = 0;
        if trimmed.is_empty() {
            return;
        }
        if self.history.last().map(String::as_str) != Some(trimmed) {
            self.history.push(trimmed.to_string());
            if self.history.len() > MAX_HISTORY {
                self.history.remove(0);
            }
        }

        let mut out = ConsoleOutput::new();
        out.echo(format!("{PROMPT}{trimmed}"));
        match trimmed.to_ascii_lowercase().as_str() {
            "quit" | "exit" => {
                self.should_quit = true;
                return;
            }
            "clear" | "cls" => {
                self.clear_scrollback();
                return;
            }
            "help" => print_help(&mut out),
            _ => {
                let outcome = execute_line(trimmed, &mut self.world, &mut self.session, &mut out);
                if let LineOutcome::NotAQuery(word) = outcome {
                    debug!(%word, "unknown console command");
                    out.error(format!(
                        "ERROR: command '{word}' not found. Type 'help' for a list of commands."
                    ));
                }
            }
        }

        self.commands_issued += self.world.take_journal().len();
        let views = self.world.take_views();
        if let Some(last) = views.last() {
            self.status = describe_view(last);
            if views.len() > 1 {
                self.status
                    .push_str(&format!(" (+{} more)", views.len() - 1));
            }
        }
        self.append(out);
    }

    fn append(&mut self, mut out: ConsoleOutput) {
        self.scrollback.extend(out.take());
        if self.scrollback.len() > MAX_SCROLLBACK {
            let excess = self.scrollback.len() - MAX_SCROLLBACK;
            self.scrollback.drain(..excess);
        }
    }

    fn clear_scrollback(&mut self) {
        self.scrollback.clear();
        self.scroll = 0;
        self.status = "Console cleared".to_string();
    }

    fn scroll_by(&mut self, delta: isize) {
        let max = self.scrollback.len().saturating_sub(self.page_height);
        self.scroll = self.scroll.saturating_add_signed(delta).min(max);
    }

    fn history_step(&mut self, delta: isize) {
        if self.history.is_empty() {
            return;
        }
        let last = self.history.len() - 1;
        let next = match (self.history_cursor, delta < 0) {
            (None, true) => Some(last),
            (None, false) => None,
            (Some(index), true) => Some(index.saturating_sub(1)),
            (Some(index), false) if index >= last => None,
            (Some(index), false) => Some(index + 1),
        };
        self.history_cursor = next;
        self.input = next
            .map(|index| self.history[index].clone())
            .unwrap_or_default();
    }

    fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(frame.size());

        self.page_height = chunks[0].height.saturating_sub(2).max(1) as usize;
        let end = self.scrollback.len().saturating_sub(self.scroll);
        let start = end.saturating_sub(self.page_height);
        let lines: Vec<Line> = self.scrollback[start..end]
            .iter()
            .map(|line| {
                Line::from(Span::styled(
                    line.text.clone(),
                    self.theme.line_style(line.level),
                ))
            })
            .collect();
        let title = if self.scroll > 0 {
            format!("Console (scrolled {} lines)", self.scroll)
        } else {
            "Console".to_string()
        };
        let scrollback = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(self.theme.muted)),
        );
        frame.render_widget(scrollback, chunks[0]);

        let input = Paragraph::new(Line::from(vec![
            Span::styled(
                PROMPT,
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(self.input.clone(), Style::default().fg(self.theme.primary_fg)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.theme.accent)),
        );
        frame.render_widget(input, chunks[1]);
        let cursor_x = chunks[1].x + 1 + (PROMPT.len() + self.input.chars().count()) as u16;
        frame.set_cursor(
            cursor_x.min(chunks[1].right().saturating_sub(2)),
            chunks[1].y + 1,
        );

        let mode = if self.session.in_editor() {
            "editor"
        } else {
            "game"
        };
        let status = Paragraph::new(Line::from(vec![
            Span::styled(
                format!(" {} ", self.clock),
                Style::default().fg(self.theme.accent),
            ),
            Span::styled(
                format!("[{mode}{}] ", if self.session.networked { ", networked" } else { "" }),
                Style::default().fg(self.theme.muted),
            ),
            Span::styled(self.status.clone(), Style::default().fg(self.theme.primary_fg)),
        ]));
        frame.render_widget(status, chunks[2]);
    }
}

fn print_help(out: &mut ConsoleOutput) {
    out.help("Query commands (run one alone to see its usage):");
    for keyword in TargetKind::KEYWORDS {
        out.help(format!("  {keyword}"));
    }
    out.help("Console commands: help, clear, quit");
    out.help("Keys: Up/Down history, PageUp/PageDown scroll, Esc clears input, Ctrl-C quits");
}

fn describe_position(position: &Position) -> String {
    format!("({}, {})", position.x, position.y)
}

fn describe_view(request: &ViewRequest) -> String {
    match request {
        ViewRequest::ScrollTo(position) => format!("View centred on {}", describe_position(position)),
        ViewRequest::VehicleWindow(id) => format!("Opened window of vehicle {id}"),
        ViewRequest::TownWindow(id) => format!("Opened window of town {id}"),
        ViewRequest::TownAuthority(id) => format!("Opened authority window of town {id}"),
        ViewRequest::IndustryWindow(id) => format!("Opened window of industry {id}"),
    }
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}
