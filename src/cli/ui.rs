use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::cli::app::{App, Field, View};
use crate::cli::theme::{Theme, ThemeToken};
use crate::cli::timeline::{NoticeKind, wrap_text};

const ROLE_PLACEHOLDER: &str = "e.g. Senior Python Developer";
const INSTRUCTIONS_PLACEHOLDER: &str =
    "Define how the agent should behave, what rules it must follow, and its tone.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiRegions {
    pub header: Rect,
    pub body: Rect,
    pub input: Rect,
    pub status: Rect,
}

pub fn regions(area: Rect) -> UiRegions {
    let [header, body, input, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(3),
        Constraint::Length(1),
    ])
    .areas(area);
    UiRegions {
        header,
        body,
        input,
        status,
    }
}

/// Renders one frame. Clamps `app.scroll` to the transcript height.
pub fn draw(frame: &mut Frame<'_>, app: &mut App, theme: &Theme) {
    let regions = regions(frame.area());

    frame.render_widget(
        Paragraph::new(Span::styled(app.header(), theme.style(ThemeToken::Header))),
        regions.header,
    );

    match app.view {
        View::Chat => {
            draw_transcript(frame, app, theme, regions.body);
            draw_chat_input(frame, app, theme, regions.input);
        }
        View::Config => {
            let form = regions.body.union(regions.input);
            draw_config_form(frame, app, theme, form);
        }
    }

    draw_status(frame, app, theme, regions.status);
}

fn draw_transcript(frame: &mut Frame<'_>, app: &mut App, theme: &Theme, area: Rect) {
    let lines = app
        .timeline
        .render_lines(theme, &app.persona, app.in_flight, area.width);

    let max_scroll = lines.len().saturating_sub(usize::from(area.height));
    let max_scroll = u16::try_from(max_scroll).unwrap_or(u16::MAX);
    app.scroll = app.scroll.min(max_scroll);
    let top_row = max_scroll - app.scroll;

    frame.render_widget(
        Paragraph::new(Text::from(lines)).scroll((top_row, 0)),
        area,
    );
}

fn draw_chat_input(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.style(ThemeToken::InputBlock));
    let inner_width = usize::from(area.width.saturating_sub(2));

    let (content, cursor) = if app.input.is_empty() {
        let placeholder = format!("Message {}...", app.persona.name);
        (
            Span::styled(placeholder, theme.style(ThemeToken::Placeholder)),
            0,
        )
    } else {
        let chars: Vec<char> = app.input.chars().collect();
        let visible = inner_width.saturating_sub(1);
        let start = chars.len().saturating_sub(visible);
        let tail: String = chars[start..].iter().collect();
        let cursor = chars.len() - start;
        (
            Span::styled(tail, theme.style(ThemeToken::UserText)),
            cursor,
        )
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
    if !app.in_flight {
        let cursor = u16::try_from(cursor).unwrap_or(0);
        frame.set_cursor_position(Position::new(area.x + 1 + cursor, area.y + 1));
    }
}

fn draw_config_form(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let [name, role, instructions] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(area);

    for (field, rect) in [
        (Field::Name, name),
        (Field::Role, role),
        (Field::Instructions, instructions),
    ] {
        draw_field(frame, app, theme, field, rect);
    }
}

fn draw_field(frame: &mut Frame<'_>, app: &App, theme: &Theme, field: Field, area: Rect) {
    let focused = app.focus == field;
    let border = if focused {
        ThemeToken::FieldFocused
    } else {
        ThemeToken::FieldLabel
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.style(border))
        .title(Span::styled(field.label(), theme.style(border)));

    let value = app.field_value(field);
    let inner_width = usize::from(area.width.saturating_sub(2));
    let inner_height = usize::from(area.height.saturating_sub(2));

    let lines: Vec<Line<'static>> = if value.is_empty() {
        let placeholder = match field {
            Field::Name => "",
            Field::Role => ROLE_PLACEHOLDER,
            Field::Instructions => INSTRUCTIONS_PLACEHOLDER,
        };
        wrap_text(placeholder, inner_width)
            .into_iter()
            .map(|chunk| Line::from(Span::styled(chunk, theme.style(ThemeToken::Placeholder))))
            .collect()
    } else {
        wrap_text(value, inner_width)
            .into_iter()
            .map(Line::from)
            .collect()
    };

    // Keep the end of a long value in view; that is where the cursor is.
    let top = if value.is_empty() {
        0
    } else {
        lines.len().saturating_sub(inner_height.max(1))
    };
    let (cursor_row, cursor_col) = if value.is_empty() {
        (0, 0)
    } else {
        (
            lines.len().saturating_sub(1) - top,
            lines.last().map_or(0, Line::width),
        )
    };

    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .scroll((u16::try_from(top).unwrap_or(0), 0)),
        area,
    );

    if focused {
        let x = area.x + 1 + u16::try_from(cursor_col).unwrap_or(0);
        let y = area.y + 1 + u16::try_from(cursor_row).unwrap_or(0);
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn draw_status(frame: &mut Frame<'_>, app: &App, theme: &Theme, area: Rect) {
    let hints = match app.view {
        View::Chat => "F1 Chat | F2 Configure | Enter send | PgUp/PgDn scroll | Ctrl-C quit",
        View::Config => "F1 Chat | F2 Configure | Tab next field | Ctrl-S save | Ctrl-C quit",
    };

    let line = match &app.notice {
        Some(notice) => {
            let token = match notice.kind {
                NoticeKind::Info => ThemeToken::NoticeInfo,
                NoticeKind::Error => ThemeToken::NoticeError,
            };
            Line::from(vec![
                Span::styled(notice.text.clone(), theme.style(token)),
                Span::styled(format!("  {hints}"), theme.style(ThemeToken::Status)),
            ])
        }
        None => Line::from(Span::styled(hints, theme.style(ThemeToken::Status))),
    };

    frame.render_widget(Paragraph::new(line), area);
}
