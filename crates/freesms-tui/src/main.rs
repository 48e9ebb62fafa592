use std::fs::OpenOptions;
use std::io::{stdout, Stdout};
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use freesms_core::bus::{CommandBus, ConfigCache};
use freesms_core::module::{SmsModule, MODULE_NAME};
use freesms_core::provider::FreeMobileClient;
use freesms_core::service::SmsService;
use freesms_core::settings::{config_dir, Settings};
use freesms_core::store::ConfigStore;
use freesms_core::widget::CredentialsWidget;
use ratatui::prelude::{CrosstermBackend, Terminal};
use tracing_subscriber::EnvFilter;

mod ui;
use ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging()?;
    tracing::info!("freesms starting");

    let settings = match Settings::new() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Warning: Failed to load settings: {}. Using defaults.", e);
            Settings::default()
        }
    };

    let provider = match settings.provider_url.as_deref() {
        Some(url) => FreeMobileClient::with_base_url(url),
        None => FreeMobileClient::new(),
    };
    let module = SmsModule::load(ConfigStore::open(MODULE_NAME)?, provider);

    // module registration happens once, here
    let mut bus = CommandBus::new();
    bus.register(Arc::new(module));
    let bus = Arc::new(bus);

    let cache = Arc::new(ConfigCache::new(bus.clone()));
    let service = SmsService::new(bus);
    let mut widget = CredentialsWidget::new(cache, service);
    widget.load().await;

    let mut terminal = init_terminal()?;
    let mut app = App::new(settings, widget);

    let result = app.run(&mut terminal).await;

    restore_terminal(&mut terminal)?;

    result
}

fn init_logging() -> Result<()> {
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(config_dir()?.join("freesms.log"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Arc::new(log_file))
        .with_ansi(false)
        .init();

    Ok(())
}

fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
