use ratatui::style::{Color, Modifier, Style};
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeToken {
    Header,
    UserPrompt,
    AiPrompt,
    UserText,
    AiText,
    Greeting,
    Thinking,
    NoticeInfo,
    NoticeError,
    Status,
    FieldLabel,
    FieldFocused,
    Placeholder,
    InputBlock,
}

#[derive(Debug, Clone)]
pub struct Theme {
    enabled: bool,
}

impl Theme {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Colors are off when `NO_COLOR` is set.
    pub fn from_env() -> Self {
        Self::new(env::var_os("NO_COLOR").is_none())
    }

    pub fn style(&self, token: ThemeToken) -> Style {
        if self.enabled {
            color_style(token)
        } else {
            plain_style(token)
        }
    }
}

fn color_style(token: ThemeToken) -> Style {
    match token {
        ThemeToken::Header => Style::default()
            .fg(Color::Rgb(192, 202, 245))
            .add_modifier(Modifier::BOLD),
        ThemeToken::UserPrompt => Style::default()
            .fg(Color::Rgb(122, 162, 247))
            .add_modifier(Modifier::BOLD),
        ThemeToken::AiPrompt => Style::default()
            .fg(Color::Rgb(158, 206, 106))
            .add_modifier(Modifier::BOLD),
        ThemeToken::UserText => Style::default().fg(Color::White),
        ThemeToken::AiText => Style::default().fg(Color::Rgb(192, 202, 245)),
        ThemeToken::Greeting => Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
        ThemeToken::Thinking => Style::default()
            .fg(Color::Rgb(138, 138, 138))
            .add_modifier(Modifier::ITALIC),
        ThemeToken::NoticeInfo | ThemeToken::Status => {
            Style::default().fg(Color::Rgb(86, 95, 137))
        }
        ThemeToken::NoticeError => Style::default()
            .fg(Color::Rgb(247, 118, 142))
            .add_modifier(Modifier::BOLD),
        ThemeToken::FieldLabel => Style::default().fg(Color::Rgb(138, 138, 138)),
        ThemeToken::FieldFocused => Style::default().fg(Color::Rgb(122, 162, 247)),
        ThemeToken::Placeholder => Style::default()
            .fg(Color::Rgb(86, 95, 137))
            .add_modifier(Modifier::ITALIC),
        ThemeToken::InputBlock => Style::default().bg(Color::Rgb(22, 22, 30)).fg(Color::White),
    }
}

fn plain_style(token: ThemeToken) -> Style {
    match token {
        ThemeToken::Header
        | ThemeToken::UserPrompt
        | ThemeToken::AiPrompt
        | ThemeToken::Greeting
        | ThemeToken::NoticeError
        | ThemeToken::FieldFocused => Style::default().add_modifier(Modifier::BOLD),
        ThemeToken::Thinking | ThemeToken::Placeholder => {
            Style::default().add_modifier(Modifier::DIM)
        }
        _ => Style::default(),
    }
}
