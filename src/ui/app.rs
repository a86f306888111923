//! Application runtime: terminal setup, the event loop, and drawing.
//!
//! Single-threaded cooperative model: one event is fully processed
//! (dispatch, state update, command fan-out) before the next is accepted.
//! Async command results re-enter through the same channel as ordinary
//! events.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{enable_raw_mode, EnterAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use crate::api::{HttpCommerceApi, HttpTokenizer};
use crate::config::Config;
use crate::ui::chrome;
use crate::ui::command::{Command, CommandRunner};
use crate::ui::layout::SizeClass;
use crate::ui::model::Model;
use crate::ui::msg::Msg;
use crate::ui::page::Page;
use crate::ui::terminal_guard::{install_panic_hook, TerminalGuard};
use crate::util::device_fingerprint;

/// Main application: owns the model, the event channel, and the command
/// runner.
pub struct App {
    config: Config,
    model: Model,
    runner: CommandRunner,
    rx: mpsc::UnboundedReceiver<Msg>,
    /// Boot commands dispatched once the loop starts.
    pending: Vec<Command>,
}

impl App {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let fingerprint = device_fingerprint(&config.identity_path)?;
        let (tx, rx) = mpsc::unbounded_channel();
        let runner = CommandRunner::new(tx, config.api_url.clone(), fingerprint);
        let (model, pending) = Model::new();
        Ok(Self {
            config,
            model,
            runner,
            rx,
            pending,
        })
    }

    /// Run the application main loop.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        install_panic_hook();
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut guard = TerminalGuard::new();

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // seed the layout with the real terminal size
        let size = terminal.size()?;
        self.apply(Msg::Resize {
            width: size.width,
            height: size.height,
        });
        let boot = std::mem::take(&mut self.pending);
        self.runner.dispatch_all(boot);

        let result = self.event_loop(&mut terminal).await;

        guard.cleanup()?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        loop {
            terminal.draw(|f| draw(f, &self.model))?;

            tokio::select! {
                // terminal input plus the frame tick
                _ = tokio::time::sleep(Duration::from_millis(16)) => {
                    while event::poll(Duration::from_millis(0))? {
                        match event::read()? {
                            Event::Key(key) if key.kind != KeyEventKind::Release => {
                                self.apply(Msg::Key(key));
                            }
                            Event::Resize(width, height) => {
                                self.apply(Msg::Resize { width, height });
                            }
                            _ => {}
                        }
                    }
                    self.apply(Msg::Tick);
                }

                // async command results
                Some(msg) = self.rx.recv() => {
                    self.apply(msg);
                }
            }

            if self.model.should_quit {
                break;
            }
        }
        Ok(())
    }

    /// Run one event through the state machine and fan out the returned
    /// commands.
    fn apply(&mut self, msg: Msg) {
        if let Msg::SignedIn { access_token } = &msg {
            self.runner.install_client(Arc::new(HttpCommerceApi::new(
                &self.config.api_url,
                access_token.clone(),
            )));
            self.runner
                .install_tokenizer(Arc::new(HttpTokenizer::new(&self.config.tokenizer_url)));
        }
        let model = std::mem::take(&mut self.model);
        let (model, commands) = model.update(&msg);
        self.model = model;
        self.runner.dispatch_all(commands);
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}

fn draw(frame: &mut Frame, m: &Model) {
    let area = frame.area();

    if m.screen.size == SizeClass::Undersized {
        let text = chrome::undersized(m);
        let rect = centered_rect(area, area.width, text.lines.len() as u16);
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), rect);
        return;
    }

    if m.page == Page::Splash {
        let text = m.content();
        let rect = centered_rect(area, area.width, text.lines.len() as u16);
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), rect);
        return;
    }

    let container = centered_rect(area, m.screen.container_width, m.screen.container_height);
    let inner = Rect::new(
        container.x + 1,
        container.y,
        container.width.saturating_sub(2),
        container.height,
    );
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Length(1), // breadcrumbs
            Constraint::Length(1), // padding
            Constraint::Min(1),    // content
            Constraint::Length(1), // padding
            Constraint::Length(1), // footer
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(Text::from(chrome::header(m))), rows[0]);
    frame.render_widget(Paragraph::new(chrome::breadcrumbs(m)), rows[1]);

    let content = m.content();
    if m.viewport.has_scroll() {
        let content_area = Rect::new(
            rows[3].x,
            rows[3].y,
            rows[3].width.saturating_sub(2),
            rows[3].height,
        );
        let bar_area = Rect::new(
            rows[3].x + rows[3].width.saturating_sub(1),
            rows[3].y,
            1,
            rows[3].height,
        );
        frame.render_widget(
            Paragraph::new(content).scroll((m.viewport.offset as u16, 0)),
            content_area,
        );
        frame.render_widget(Paragraph::new(scrollbar(m)), bar_area);
    } else {
        frame.render_widget(Paragraph::new(content), rows[3]);
    }

    frame.render_widget(Paragraph::new(chrome::footer(m)), rows[5]);

    if let Some(fault) = &m.overlay {
        let text = chrome::error_overlay(m, fault);
        let height = text.lines.len() as u16 + 2;
        let dialog = centered_rect(area, m.screen.container_width, height);
        frame.render_widget(Clear, dialog);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(m.theme.error());
        let dialog_inner = block.inner(dialog);
        frame.render_widget(block, dialog);
        frame.render_widget(
            Paragraph::new(text).alignment(Alignment::Center),
            dialog_inner,
        );
    }
}

fn scrollbar(m: &Model) -> Text<'static> {
    let Some(thumb) = m.viewport.thumb() else {
        return Text::default();
    };
    let mut lines = Vec::with_capacity(m.viewport.visible);
    for y in 0..m.viewport.visible {
        if y >= thumb.top && y < thumb.top + thumb.height {
            lines.push(Line::from(Span::styled("█".to_string(), m.theme.accent())));
        } else {
            lines.push(Line::from(Span::styled("│".to_string(), m.theme.muted())));
        }
    }
    Text::from(lines)
}
