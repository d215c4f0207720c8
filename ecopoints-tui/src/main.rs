//! Terminal UI for ecopoints that lists collection points and filters them by category.

mod app;
mod config;
mod input;
mod logging;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ecopoints_core::service::EcoPointsService;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info};

use crate::app::App;
use crate::config::Config;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    let _log_guard = logging::init_logging(&config.log_dir)?;

    // Source + service setup
    let home = config.center()?;
    let service = Arc::new(EcoPointsService::new(config.source()?));
    info!(source = %service.source().location, "starting ecopoints");

    // App state
    let app = App::new(service, home);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    reload(terminal, &mut app).await?;

    loop {
        app.sync();
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            match input::handle_key_event(key, &mut app) {
                Action::Quit => break,
                Action::None => {}
                Action::Toggle(kind) => app.service.state().toggle(kind),
                Action::ShowAll => app.service.state().show_all(),
                Action::CenterOnSelection => {
                    if let Some(point) = app.selected_point() {
                        let center = point.coordinate;
                        app.service.state().recenter(center);
                    }
                }
                Action::Reload => reload(terminal, &mut app).await?,
            }
        }
    }

    Ok(())
}

async fn reload(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    app.is_loading = true;
    app.error_message = None;
    terminal.draw(|frame| ui::draw(frame, &*app))?;

    let res = app.service.refresh(app.home).await;

    app.is_loading = false;
    match res {
        Ok(_) => app.list_index = 0,
        Err(err) => {
            error!(%err, "refresh failed");
            app.error_message = Some(format!("Failed to load collection points: {err}"));
        }
    }
    Ok(())
}
