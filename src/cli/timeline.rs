use crate::agent::Persona;
use crate::cli::theme::{Theme, ThemeToken};
use ratatui::text::{Line, Span};

const USER_PREFIX: &str = "you> ";
const AI_PREFIX: &str = "ai> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Ai,
}

/// One transcript message. Lives only as long as the client process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimelineEntry {
    Message(ChatMessage),
    Notice { kind: NoticeKind, text: String },
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    entries: Vec<TimelineEntry>,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: &str) {
        self.push_message(ChatRole::User, content);
    }

    pub fn push_ai(&mut self, content: &str) {
        self.push_message(ChatRole::Ai, content);
    }

    fn push_message(&mut self, role: ChatRole, content: &str) {
        self.entries.push(TimelineEntry::Message(ChatMessage {
            role,
            content: content.to_string(),
        }));
    }

    /// Local notices are shown in the transcript but are not chat messages.
    pub fn push_notice(&mut self, kind: NoticeKind, text: &str) {
        self.entries.push(TimelineEntry::Notice {
            kind,
            text: text.to_string(),
        });
    }

    pub fn messages(&self) -> impl Iterator<Item = &ChatMessage> {
        self.entries.iter().filter_map(|entry| match entry {
            TimelineEntry::Message(message) => Some(message),
            TimelineEntry::Notice { .. } => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    pub fn render_lines(
        &self,
        theme: &Theme,
        persona: &Persona,
        thinking: bool,
        width: u16,
    ) -> Vec<Line<'static>> {
        let context = RenderContext {
            theme,
            width: usize::from(width.max(1)),
        };
        let mut lines = Vec::new();

        if self.entries.is_empty() {
            GreetingWidget { persona }.render(&context, &mut lines);
        }
        for entry in &self.entries {
            widget_for_entry(entry).render(&context, &mut lines);
        }
        if thinking {
            lines.push(Line::from(Span::styled(
                "Agent is thinking...",
                theme.style(ThemeToken::Thinking),
            )));
        }

        lines
    }
}

trait TimelineWidget {
    fn render(&self, context: &RenderContext<'_>, lines: &mut Vec<Line<'static>>);
}

struct RenderContext<'a> {
    theme: &'a Theme,
    width: usize,
}

struct GreetingWidget<'a> {
    persona: &'a Persona,
}

impl TimelineWidget for GreetingWidget<'_> {
    fn render(&self, context: &RenderContext<'_>, lines: &mut Vec<Line<'static>>) {
        let greeting = format!("Hello, I am {}", self.persona.name);
        let intro = format!(
            "I am your {}. How can I help with your work today?",
            self.persona.role
        );
        for (text, token) in [(greeting, ThemeToken::Greeting), (intro, ThemeToken::NoticeInfo)] {
            for chunk in wrap_text(&text, context.width) {
                lines.push(Line::from(Span::styled(chunk, context.theme.style(token))));
            }
        }
    }
}

struct MessageWidget<'a> {
    message: &'a ChatMessage,
}

impl TimelineWidget for MessageWidget<'_> {
    fn render(&self, context: &RenderContext<'_>, lines: &mut Vec<Line<'static>>) {
        let (prefix, prefix_token, text_token) = match self.message.role {
            ChatRole::User => (USER_PREFIX, ThemeToken::UserPrompt, ThemeToken::UserText),
            ChatRole::Ai => (AI_PREFIX, ThemeToken::AiPrompt, ThemeToken::AiText),
        };
        let indent = " ".repeat(prefix.len());
        let body_width = context.width.saturating_sub(prefix.len()).max(1);

        for (i, chunk) in wrap_text(&self.message.content, body_width)
            .into_iter()
            .enumerate()
        {
            let lead = if i == 0 {
                Span::styled(prefix, context.theme.style(prefix_token))
            } else {
                Span::raw(indent.clone())
            };
            lines.push(Line::from(vec![
                lead,
                Span::styled(chunk, context.theme.style(text_token)),
            ]));
        }
    }
}

struct NoticeWidget<'a> {
    kind: NoticeKind,
    text: &'a str,
}

impl TimelineWidget for NoticeWidget<'_> {
    fn render(&self, context: &RenderContext<'_>, lines: &mut Vec<Line<'static>>) {
        let token = match self.kind {
            NoticeKind::Info => ThemeToken::NoticeInfo,
            NoticeKind::Error => ThemeToken::NoticeError,
        };
        for chunk in wrap_text(self.text, context.width) {
            lines.push(Line::from(Span::styled(chunk, context.theme.style(token))));
        }
    }
}

fn widget_for_entry(entry: &TimelineEntry) -> Box<dyn TimelineWidget + '_> {
    match entry {
        TimelineEntry::Message(message) => Box::new(MessageWidget { message }),
        TimelineEntry::Notice { kind, text } => Box::new(NoticeWidget { kind: *kind, text }),
    }
}

/// Hard-wraps on character count. Blank lines are kept so replies keep their paragraphs.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for line in text.split('\n') {
        let chars: Vec<char> = line.trim_end_matches('\r').chars().collect();
        if chars.is_empty() {
            out.push(String::new());
            continue;
        }
        for chunk in chars.chunks(width) {
            out.push(chunk.iter().collect());
        }
    }
    out
}
