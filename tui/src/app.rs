//! Main Application
//!
//! The App owns the TUI lifecycle:
//! - Event loop (keyboard, mouse, resize) over an async event stream
//! - One [`GatewayClient`] ask in flight at a time, spawned off the loop
//! - [`ChatState`] as the single source of truth for the transcript
//!
//! Asks run in a spawned task and report back over a channel, so the
//! UI keeps animating and scrolling while the gateway works.

use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, EventStream, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;

use crate::chat::{ChatState, TurnOutcome};
use crate::gateway_client::GatewayClient;
use crate::theme;
use crate::ui;

/// Input box height (lines), borders included
const INPUT_HEIGHT: u16 = 3;

/// Frame interval for the thinking animation
const FRAME_DURATION: Duration = Duration::from_millis(100);

/// Lines moved per mouse wheel notch
const WHEEL_LINES: usize = 3;

/// One iteration of the event loop, reduced to the thing that happened.
enum LoopEvent {
    /// A terminal event arrived.
    Terminal(Event),
    /// A spawned ask finished.
    Turn(TurnOutcome),
    /// Nothing happened for a frame; advance animations.
    Tick,
    /// The terminal event stream ended.
    Quit,
}

/// Main application state
pub struct App {
    // === Core State ===
    /// Is the app still running?
    running: bool,
    /// Transcript, input line, and turn state
    chat: ChatState,

    // === Gateway Integration ===
    /// HTTP client for the gateway
    client: GatewayClient,
    /// Where spawned asks report their outcome
    outcome_tx: mpsc::Sender<TurnOutcome>,
    /// Receiving half polled by the event loop
    outcome_rx: mpsc::Receiver<TurnOutcome>,

    // === UI State ===
    /// Scroll offset (lines from bottom, 0 = latest)
    scroll_offset: usize,
    /// Total rendered transcript lines (for scroll bounds)
    total_lines: usize,
    /// Frame counter driving the thinking animation
    tick: usize,
}

impl App {
    /// Creates an App talking to the given gateway.
    #[must_use]
    pub fn new(client: GatewayClient) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(8);

        Self {
            running: true,
            chat: ChatState::new(),
            client,
            outcome_tx,
            outcome_rx,
            scroll_offset: 0,
            total_lines: 0,
            tick: 0,
        }
    }

    /// Main event loop
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();

        // Render the initial frame immediately so the user sees the UI
        // before anything happens.
        self.render(terminal)?;

        while self.running {
            // The select produces a value instead of running handlers
            // inline so the outcome receiver is no longer borrowed
            // when state is updated.
            let step = tokio::select! {
                biased;

                maybe_event = event_stream.next() => match maybe_event {
                    Some(Ok(event)) => LoopEvent::Terminal(event),
                    Some(Err(_)) => LoopEvent::Tick,
                    None => LoopEvent::Quit,
                },

                maybe_outcome = self.outcome_rx.recv() => match maybe_outcome {
                    Some(outcome) => LoopEvent::Turn(outcome),
                    // Unreachable: the App holds a sender for the
                    // lifetime of the loop.
                    None => LoopEvent::Quit,
                },

                _ = tokio::time::sleep(FRAME_DURATION) => LoopEvent::Tick,
            };

            match step {
                LoopEvent::Terminal(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    self.handle_key(key);
                }
                LoopEvent::Terminal(Event::Mouse(mouse)) => self.handle_mouse(mouse),
                LoopEvent::Terminal(_) => {}
                LoopEvent::Turn(outcome) => {
                    self.chat.apply_outcome(outcome);
                    // Snap to the newest message when the answer lands.
                    self.scroll_offset = 0;
                }
                LoopEvent::Tick => self.tick = self.tick.wrapping_add(1),
                LoopEvent::Quit => self.running = false,
            }

            self.render(terminal)?;
        }

        Ok(())
    }

    /// Handle keyboard input
    fn handle_key(&mut self, key: event::KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
            }

            // Submit question
            KeyCode::Enter => self.submit(),

            // Source disclosure
            KeyCode::Tab => {
                if self.chat.toggle_latest_sources() {
                    self.scroll_offset = 0;
                }
            }

            // Typing
            KeyCode::Char(c) => self.chat.push_input(c),
            KeyCode::Backspace => self.chat.backspace_input(),

            // Transcript scrolling
            KeyCode::PageUp => {
                let max_scroll = self.total_lines.saturating_sub(1);
                self.scroll_offset = (self.scroll_offset + self.page_size()).min(max_scroll);
            }
            KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(self.page_size());
            }

            _ => {}
        }
    }

    /// Handle mouse input
    fn handle_mouse(&mut self, mouse: event::MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                let max_scroll = self.total_lines.saturating_sub(1);
                self.scroll_offset = (self.scroll_offset + WHEEL_LINES).min(max_scroll);
            }
            MouseEventKind::ScrollDown => {
                self.scroll_offset = self.scroll_offset.saturating_sub(WHEEL_LINES);
            }
            _ => {}
        }
    }

    fn page_size(&self) -> usize {
        // Half a screen per page keeps context visible across jumps.
        usize::from(crossterm::terminal::size().map_or(10, |(_, h)| h / 2).max(1))
    }

    /// Submits the current input and spawns the ask.
    fn submit(&mut self) {
        if let Some(question) = self.chat.submit() {
            self.scroll_offset = 0;
            self.spawn_ask(question);
        }
    }

    /// Asks the gateway on a background task.
    ///
    /// Every spawned ask sends exactly one outcome, so the chat always
    /// leaves the waiting state.
    fn spawn_ask(&self, question: String) {
        let client = self.client.clone();
        let outcome_tx = self.outcome_tx.clone();

        tokio::spawn(async move {
            let outcome = match client.ask(&question).await {
                Ok(response) => TurnOutcome::Answered {
                    answer: response.answer,
                    sources: response.sources,
                },
                Err(error) => {
                    tracing::warn!(error = %error, "Ask failed");
                    TurnOutcome::Failed
                }
            };

            let _ = outcome_tx.send(outcome).await;
        });
    }

    // ===== Rendering =====

    /// Render the UI
    fn render(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        terminal.draw(|frame| {
            let [transcript_area, input_area, status_area] = Layout::vertical([
                Constraint::Min(1),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(1),
            ])
            .areas(frame.area());

            self.render_transcript(frame, transcript_area);
            self.render_input(frame, input_area);

            frame.render_widget(
                Paragraph::new(ui::status_line(self.chat.is_waiting(), self.tick)),
                status_area,
            );
        })?;

        Ok(())
    }

    /// Render the transcript, or the welcome banner before the first
    /// question.
    fn render_transcript(&mut self, frame: &mut Frame, area: Rect) {
        if self.chat.messages().is_empty() {
            self.total_lines = 0;

            let banner = ui::empty_state_lines();
            let banner_height = u16::try_from(banner.len()).unwrap_or(u16::MAX);
            let y = area.y + area.height.saturating_sub(banner_height) / 2;
            let banner_area = Rect {
                x: area.x,
                y,
                width: area.width,
                height: banner_height.min(area.height),
            };
            frame.render_widget(
                Paragraph::new(banner).alignment(Alignment::Center),
                banner_area,
            );
            return;
        }

        let lines = ui::transcript_lines(self.chat.messages(), area.width);
        self.total_lines = lines.len();

        let height = usize::from(area.height);
        let max_scroll = self.total_lines.saturating_sub(height);
        self.scroll_offset = self.scroll_offset.min(max_scroll);

        let top = self
            .total_lines
            .saturating_sub(height)
            .saturating_sub(self.scroll_offset);
        let top = u16::try_from(top).unwrap_or(u16::MAX);

        frame.render_widget(Paragraph::new(lines).scroll((top, 0)), area);
    }

    /// Render the input box
    fn render_input(&mut self, frame: &mut Frame, area: Rect) {
        let block = if self.chat.is_waiting() {
            Block::bordered()
                .title(" Waiting for Counsel ")
                .border_style(Style::default().fg(theme::DIM_GRAY))
        } else {
            Block::bordered().title(" Ask a legal question ")
        };

        let inner = block.inner(area);
        let budget = usize::from(inner.width).saturating_sub(1);
        let text = if self.chat.is_waiting() {
            String::new()
        } else {
            format!("{}_", ui::input_tail(self.chat.input(), budget))
        };

        frame.render_widget(Paragraph::new(text).block(block), area);
    }
}
