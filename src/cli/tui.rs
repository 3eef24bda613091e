use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::DefaultTerminal;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::info;

use crate::cli::api::ApiClient;
use crate::cli::app::{App, Effect, Outcome};
use crate::cli::theme::Theme;
use crate::cli::ui;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the full-screen client until the user quits. The terminal is restored on every exit path.
pub async fn run_client(api: ApiClient, theme: Theme) -> Result<()> {
    info!(api = %api.base_url(), "starting terminal client");
    let mut terminal = ratatui::try_init()?;
    let result = event_loop(&mut terminal, api, theme).await;
    ratatui::try_restore()?;
    result
}

async fn event_loop(terminal: &mut DefaultTerminal, api: ApiClient, theme: Theme) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut app = App::new();

    {
        let api = api.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            let loaded = api.get_agent().await.map_err(|err| format!("{err:#}"));
            let _ = tx.send(Outcome::Loaded(loaded));
        });
    }

    loop {
        while let Ok(outcome) = rx.try_recv() {
            app.apply(outcome);
        }

        terminal.draw(|frame| ui::draw(frame, &mut app, &theme))?;

        // Input polling blocks this worker briefly; network calls run on other tasks.
        if !event::poll(POLL_INTERVAL)? {
            tokio::task::yield_now().await;
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };

        match app.handle_key(key) {
            Some(Effect::Quit) => break,
            Some(effect) => spawn_effect(&api, &tx, effect),
            None => {}
        }
    }

    info!("terminal client exiting");
    Ok(())
}

fn spawn_effect(api: &ApiClient, tx: &UnboundedSender<Outcome>, effect: Effect) {
    let api = api.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        if let Some(outcome) = perform(&api, effect).await {
            let _ = tx.send(outcome);
        }
    });
}

/// Executes one effect against the API. `Quit` has no network side and yields nothing.
pub(crate) async fn perform(api: &ApiClient, effect: Effect) -> Option<Outcome> {
    match effect {
        Effect::SavePersona(persona) => {
            let saved = api
                .save_agent(&persona)
                .await
                .map_err(|err| format!("{err:#}"));
            Some(Outcome::Saved(saved))
        }
        Effect::SendChat { message, persona } => {
            let reply = api
                .chat(&message, &persona)
                .await
                .map_err(|err| format!("{err:#}"));
            Some(Outcome::Replied(reply))
        }
        Effect::Quit => None,
    }
}
