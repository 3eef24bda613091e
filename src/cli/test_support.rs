//! Headless driver for the terminal client, used by the rendering tests.

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::agent::Persona;
use crate::cli::api::ApiClient;
use crate::cli::app::{App, Effect, Outcome};
use crate::cli::theme::Theme;
use crate::cli::tui::perform;
use crate::cli::ui;
pub use crate::cli::ui::UiRegions;

pub struct UiHarness {
    terminal: Terminal<TestBackend>,
    app: App,
    theme: Theme,
}

/// App with a loaded persona and no pending requests.
pub fn loaded_app(persona: Persona) -> App {
    let mut app = App::new();
    app.apply(Outcome::Loaded(Ok(persona)));
    app
}

impl UiHarness {
    pub fn new(width: u16, height: u16, app: App) -> Result<Self> {
        let terminal = Terminal::new(TestBackend::new(width, height))?;
        Ok(Self {
            terminal,
            app,
            theme: Theme::new(false),
        })
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn render(&mut self) -> Result<()> {
        let Self {
            terminal,
            app,
            theme,
        } = self;
        terminal.draw(|frame| ui::draw(frame, app, theme))?;
        Ok(())
    }

    /// Feeds one key and re-renders. Returns the effect the key produced.
    pub fn send_key(&mut self, key: KeyEvent) -> Result<Option<Effect>> {
        let effect = self.app.handle_key(key);
        self.render()?;
        Ok(effect)
    }

    pub fn apply(&mut self, outcome: Outcome) -> Result<()> {
        self.app.apply(outcome);
        self.render()
    }

    /// Runs an effect against a live API and applies the outcome, as the event loop would.
    pub async fn run_effect(&mut self, api: &ApiClient, effect: Effect) -> Result<()> {
        if let Some(outcome) = perform(api, effect).await {
            self.apply(outcome)?;
        }
        Ok(())
    }

    pub fn regions(&self) -> Result<UiRegions> {
        let size = self.terminal.size()?;
        Ok(ui::regions(Rect::new(0, 0, size.width, size.height)))
    }

    pub fn buffer_lines(&self) -> Vec<String> {
        let buffer = self.terminal.backend().buffer();
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
            })
            .collect()
    }
}
