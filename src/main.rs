mod demo;

use crate::demo::settings::{self, DemoSettings};
use crate::demo::{clipboard, logging, HistoryApp, Message};
use anyhow::Context;
use history_router::engine::memory::{MemoryRouter, MemoryTitle, MemoryViewport};
use history_router::NavigationCoordinator;
use std::env;
use std::fs;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let log_dir = settings::log_dir();
    fs::create_dir_all(&log_dir).context("Failed to create the log directory")?;
    let _logger = logging::init(&log_dir)?;

    let settings_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(settings::default_settings_path);
    let settings = DemoSettings::load(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;
    log::info!("Starting with settings from {}", settings_path.display());

    let title = MemoryTitle::new("Tour of Heroes");
    let viewport = MemoryViewport::new();
    let router = MemoryRouter::new(settings.routes, title.clone(), viewport.clone());
    let coordinator = NavigationCoordinator::new(
        router.clone(),
        title.clone(),
        viewport.clone(),
        settings.coordinator,
    );

    let mut app = HistoryApp::new(coordinator, router, title, viewport, clipboard::system_clipboard());
    app.run(Some(Message::FollowLink { url: "/".to_string() }))
        .await
        .context("Terminal error")
}
