mod app;
mod config;
mod dashboard;
mod data;
mod error;
mod logging;
mod model;
mod poller;
mod sort;
mod ui;
mod view;

use std::{io, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{error, info};

use app::{Action, App};
use config::{Args, Config};
use dashboard::Update;
use data::DataClient;
use poller::Poller;
use sort::SortState;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = Config::load(&args)?;
    let _log_guard = logging::init(&config.logging)?;
    info!(url = %config.server.base_url, "starting dashboard");

    let client = Arc::new(DataClient::new(&config.server.base_url, config.timeout())?);
    let (tx, mut rx) = mpsc::channel::<Update>(100);
    let poller = Poller::new(client, tx);
    let tasks = poller.spawn(config.polling.intervals());

    let mut app = App::new(SortState::for_column(config.display.sort_column()?));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, &mut rx, &poller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    for task in tasks {
        task.abort();
    }

    if let Err(err) = &res {
        error!(error = ?err, "dashboard exited with an error");
    }
    info!("dashboard stopped");
    res.context("terminal loop failed")
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::Receiver<Update>,
    poller: &Poller,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(Action::Refresh(endpoint)) = app.on_key(key.code) {
                        info!(endpoint = endpoint.path(), "manual refresh requested");
                        poller.refresh(endpoint);
                    }
                }
            }
        }

        while let Ok(update) = rx.try_recv() {
            app.on_update(update);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
