//! Client state machine. Key presses become [`Effect`]s for the event loop to run,
//! and finished network calls come back as [`Outcome`]s.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{info, warn};

use crate::agent::Persona;
use crate::cli::timeline::{NoticeKind, Timeline};

pub const SAVED_NOTICE: &str = "Agent Updated! It will now behave differently.";
const SCROLL_PAGE: u16 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Chat,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Role,
    Instructions,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Agent Name",
            Field::Role => "Role / Persona",
            Field::Instructions => "Instructions (System Prompt)",
        }
    }

    fn next(self) -> Self {
        match self {
            Field::Name => Field::Role,
            Field::Role => Field::Instructions,
            Field::Instructions => Field::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            Field::Name => Field::Instructions,
            Field::Role => Field::Name,
            Field::Instructions => Field::Role,
        }
    }
}

/// Work the event loop must perform on behalf of the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SavePersona(Persona),
    SendChat { message: String, persona: Persona },
    Quit,
}

/// Result of a network call, fed back through [`App::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Loaded(Result<Persona, String>),
    Saved(Result<Persona, String>),
    Replied(Result<String, String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

#[derive(Debug)]
pub struct App {
    pub view: View,
    pub focus: Field,
    /// Edited in place by the config form and sent with every chat request, saved or not.
    pub persona: Persona,
    pub input: String,
    pub timeline: Timeline,
    pub notice: Option<Notice>,
    pub in_flight: bool,
    pub saving: bool,
    /// Lines scrolled up from the bottom of the transcript.
    pub scroll: u16,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            view: View::Chat,
            focus: Field::Name,
            persona: Persona::empty(),
            input: String::new(),
            timeline: Timeline::new(),
            notice: None,
            in_flight: false,
            saving: false,
            scroll: 0,
        }
    }

    pub fn header(&self) -> String {
        match self.view {
            View::Chat => format!("Work Mode: {}", self.persona.role),
            View::Config => "Configure Agent".to_string(),
        }
    }

    pub fn field_value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.persona.name,
            Field::Role => &self.persona.role,
            Field::Instructions => &self.persona.instructions,
        }
    }

    fn field_value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.persona.name,
            Field::Role => &mut self.persona.role,
            Field::Instructions => &mut self.persona.instructions,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Effect> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        // A notice describes the last outcome and lasts until the next key.
        self.notice = None;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('c') if ctrl => return Some(Effect::Quit),
            KeyCode::F(1) => {
                self.view = View::Chat;
                return None;
            }
            KeyCode::F(2) => {
                self.view = View::Config;
                return None;
            }
            _ => {}
        }

        match self.view {
            View::Chat => self.handle_chat_key(key.code, ctrl),
            View::Config => self.handle_config_key(key.code, ctrl),
        }
    }

    fn handle_chat_key(&mut self, code: KeyCode, ctrl: bool) -> Option<Effect> {
        match code {
            KeyCode::Enter => return self.submit_message(),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(ch) if !ctrl => self.input.push(ch),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_add(SCROLL_PAGE),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_sub(SCROLL_PAGE),
            _ => {}
        }
        None
    }

    fn handle_config_key(&mut self, code: KeyCode, ctrl: bool) -> Option<Effect> {
        match code {
            KeyCode::Char('s') if ctrl => return self.submit_persona(),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::BackTab => self.focus = self.focus.previous(),
            KeyCode::Enter if self.focus == Field::Instructions => {
                self.persona.instructions.push('\n');
            }
            KeyCode::Enter => self.focus = self.focus.next(),
            KeyCode::Backspace => {
                self.field_value_mut(self.focus).pop();
            }
            KeyCode::Char(ch) if !ctrl => self.field_value_mut(self.focus).push(ch),
            _ => {}
        }
        None
    }

    fn submit_message(&mut self) -> Option<Effect> {
        if self.in_flight || self.input.trim().is_empty() {
            return None;
        }

        let message = std::mem::take(&mut self.input);
        self.timeline.push_user(&message);
        self.in_flight = true;
        self.scroll = 0;
        Some(Effect::SendChat {
            message,
            persona: self.persona.clone(),
        })
    }

    fn submit_persona(&mut self) -> Option<Effect> {
        if self.saving {
            return None;
        }
        self.saving = true;
        Some(Effect::SavePersona(self.persona.clone()))
    }

    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Loaded(Ok(persona)) => {
                if self.persona == Persona::empty() {
                    info!(name = %persona.name, "persona loaded");
                    self.persona = persona;
                } else {
                    info!(name = %persona.name, "persona loaded after local edits, keeping the form");
                }
            }
            Outcome::Loaded(Err(err)) => {
                warn!("failed to load persona: {err}");
                self.set_notice(NoticeKind::Error, format!("Could not load agent: {err}"));
            }
            Outcome::Saved(Ok(persona)) => {
                self.saving = false;
                self.persona = persona;
                self.set_notice(NoticeKind::Info, SAVED_NOTICE.to_string());
                self.view = View::Chat;
            }
            Outcome::Saved(Err(err)) => {
                self.saving = false;
                warn!("failed to save persona: {err}");
                self.set_notice(NoticeKind::Error, format!("Could not save agent: {err}"));
            }
            Outcome::Replied(Ok(reply)) => {
                self.in_flight = false;
                self.timeline.push_ai(&reply);
                self.scroll = 0;
            }
            Outcome::Replied(Err(err)) => {
                self.in_flight = false;
                warn!("chat request failed: {err}");
                self.timeline
                    .push_notice(NoticeKind::Error, &format!("Agent failed to respond: {err}"));
                self.scroll = 0;
            }
        }
    }

    fn set_notice(&mut self, kind: NoticeKind, text: String) {
        self.notice = Some(Notice { kind, text });
    }
}
