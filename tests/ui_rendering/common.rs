use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use selfagent::agent::Persona;
use selfagent::cli::Effect;
use selfagent::cli::test_support::{UiHarness, loaded_app};

pub fn new_harness(width: u16, height: u16) -> Result<UiHarness> {
    let app = loaded_app(Persona::new("Bob", "Tutor", "Be concise"));
    let mut harness = UiHarness::new(width, height, app)?;
    harness.render()?;
    Ok(harness)
}

pub fn type_text(harness: &mut UiHarness, text: &str) -> Result<()> {
    for ch in text.chars() {
        harness.send_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE))?;
    }
    Ok(())
}

pub fn press(harness: &mut UiHarness, code: KeyCode) -> Result<Option<Effect>> {
    harness.send_key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn press_ctrl(harness: &mut UiHarness, ch: char) -> Result<Option<Effect>> {
    harness.send_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
}

pub fn normalized_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn region_text(harness: &UiHarness, area: Rect) -> String {
    let lines = harness.buffer_lines();
    let start_row = usize::from(area.y);
    let end_row = start_row.saturating_add(usize::from(area.height));

    let mut rendered = Vec::new();
    for line in lines.iter().take(end_row.min(lines.len())).skip(start_row) {
        let clipped = line
            .chars()
            .skip(usize::from(area.x))
            .take(usize::from(area.width))
            .collect::<String>();
        rendered.push(clipped);
    }

    normalized_text(&rendered.join("\n"))
}

pub fn header_snapshot(harness: &UiHarness) -> Result<String> {
    let regions = harness.regions()?;
    Ok(region_text(harness, regions.header))
}

pub fn body_snapshot(harness: &UiHarness) -> Result<String> {
    let regions = harness.regions()?;
    Ok(region_text(harness, regions.body))
}

pub fn input_snapshot(harness: &UiHarness) -> Result<String> {
    let regions = harness.regions()?;
    Ok(region_text(harness, regions.input))
}

pub fn status_snapshot(harness: &UiHarness) -> Result<String> {
    let regions = harness.regions()?;
    Ok(region_text(harness, regions.status))
}
