mod api;
mod app;
mod args;
pub(crate) mod theme;
mod timeline;
mod tui;
mod ui;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use api::ApiClient;
pub use app::{App, Effect, Field, Outcome, View};
pub use args::{CliArgs, Command};
pub use theme::Theme;
pub use timeline::{ChatMessage, ChatRole, NoticeKind};
pub use tui::run_client;
