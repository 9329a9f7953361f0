use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use spigot::api::FaucetClient;
use spigot::app::{App, Focus, InputMode};
use spigot::catalog::run_catalog_poll;
use spigot::session::{FileSessionStore, SessionStore};
use spigot::state::ModalName;
use spigot::types::{AppEvent, DeployOutcome};
use spigot::{auth_callback, clipboard, config, ui};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (safe to ignore if not found)
    dotenvy::dotenv().ok();
    env_logger::init();

    let cfg = config::load().context("Failed to load configuration")?;
    let endpoints = cfg.endpoints();

    let session: Arc<dyn SessionStore> = Arc::new(FileSessionStore::new(
        cfg.session_file
            .clone()
            .map(PathBuf::from)
            .unwrap_or_else(FileSessionStore::default_path),
    ));
    let client = Arc::new(FaucetClient::new(
        endpoints.clone(),
        session.clone(),
        cfg.http_timeout_ms,
    )?);

    // terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // app + channels
    let (tx, rx) = unbounded_channel::<AppEvent>();
    let mut app = App::new(cfg.theme, endpoints, cfg.github_client_id.clone());

    // catalog poll task (fires immediately, then every interval)
    let poll_task = tokio::spawn(run_catalog_poll(
        client.clone(),
        Duration::from_secs(cfg.poll_interval_secs),
        tx.clone(),
    ));

    // A persisted session token implies a user; fetch it (failure clears
    // the stored token and leaves us signed out).
    if session.load().is_some() {
        spawn_fetch_user(&client, &tx);
    }

    // OAuth code handed in on the command line
    if let Some(raw) = cfg.auth_code.clone() {
        if let Some(code) = auth_callback::parse_auth_code(&raw) {
            app.session.set_code(Some(code.clone()));
            spawn_exchange(&client, &tx, code);
        }
    }

    let res = run_loop(
        &mut app,
        &mut terminal,
        rx,
        cfg.render_fps,
        &client,
        &tx,
        &session,
    )
    .await;

    // cleanup
    poll_task.abort();
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    res
}

async fn run_loop(
    app: &mut App,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut rx: UnboundedReceiver<AppEvent>,
    fps: u32,
    client: &Arc<FaucetClient>,
    tx: &UnboundedSender<AppEvent>,
    session: &Arc<dyn SessionStore>,
) -> Result<()> {
    let mut last_frame = Instant::now();
    loop {
        // frame budget (coalesced renders)
        let frame_ms = 1000u32.saturating_div(fps) as u64;
        let budget = Duration::from_millis(frame_ms.max(1));
        let wait = budget.saturating_sub(last_frame.elapsed());

        // input or background events
        if event::poll(wait)? {
            match event::read()? {
                Event::Key(k) => {
                    if k.kind == KeyEventKind::Press || k.kind == KeyEventKind::Repeat {
                        handle_key(app, k, client, tx, session);
                    }
                }
                Event::Mouse(m) => {
                    if let MouseEventKind::Down(_) = m.kind {
                        app.on_mouse_down(m.column, m.row);
                    }
                }
                _ => {}
            }
        }
        while let Ok(ev) = rx.try_recv() {
            app.on_event(ev);
        }

        if last_frame.elapsed() >= budget {
            terminal.draw(|f| ui::draw(f, app))?;
            last_frame = Instant::now();
        }
        if app.quit_flag() {
            break;
        }
    }
    Ok(())
}

fn handle_key(
    app: &mut App,
    k: KeyEvent,
    client: &Arc<FaucetClient>,
    tx: &UnboundedSender<AppEvent>,
    session: &Arc<dyn SessionStore>,
) {
    // Text-entry modes own the keyboard
    match app.input_mode() {
        InputMode::Address => {
            match k.code {
                KeyCode::Char(c) => app.address_push(c),
                KeyCode::Backspace => app.address_backspace(),
                KeyCode::Enter | KeyCode::Esc => app.end_address_entry(),
                KeyCode::Tab => {
                    app.end_address_entry();
                    app.next_focus();
                }
                _ => {}
            }
            return;
        }
        InputMode::Login => {
            match k.code {
                KeyCode::Char(c) => app.login_push(c),
                KeyCode::Backspace => app.login_backspace(),
                KeyCode::Enter => {
                    if let Some(code) = app.commit_login() {
                        spawn_exchange(client, tx, code);
                    }
                }
                KeyCode::Esc => app.cancel_login(),
                _ => {}
            }
            return;
        }
        InputMode::CreateToken => {
            match k.code {
                KeyCode::Esc => app.close_create_modal(),
                KeyCode::Tab | KeyCode::Down => app.create_form.next_field(),
                KeyCode::BackTab | KeyCode::Up => app.create_form.prev_field(),
                KeyCode::Backspace => {
                    app.create_form.field_mut().pop();
                }
                KeyCode::Enter => {
                    if let Some(job) = app.begin_deploy() {
                        spawn_deploy(client, tx, job);
                    }
                }
                KeyCode::Char(c) if !c.is_control() => {
                    app.create_form.field_mut().push(c);
                }
                _ => {}
            }
            return;
        }
        InputMode::Normal => {}
    }

    // Result modal swallows dismissal keys first
    if app.modals.is_open(ModalName::DripResult) {
        match (k.code, k.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Enter, _) => {
                app.dismiss_drip_modal();
                return;
            }
            (KeyCode::Char('c'), KeyModifiers::NONE) => {
                copy_result_link(app);
                return;
            }
            _ => {}
        }
    }

    // Normal mode keys
    match (k.code, k.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.on_event(AppEvent::Quit);
        }

        (KeyCode::Tab, _) => {
            app.close_dropdown();
            app.next_focus();
        }
        (KeyCode::BackTab, _) => {
            app.close_dropdown();
            app.prev_focus();
        }

        (KeyCode::Up, _) => {
            if app.dropdown_open() {
                app.dropdown_up();
            } else {
                app.prev_focus();
            }
        }
        (KeyCode::Down, _) => {
            if app.dropdown_open() {
                app.dropdown_down();
            } else {
                app.next_focus();
            }
        }

        (KeyCode::Enter, _) => match app.focus() {
            Focus::TokenSelect => {
                if app.dropdown_open() {
                    app.dropdown_select_current();
                } else {
                    app.toggle_dropdown();
                }
            }
            Focus::Address => app.start_address_entry(),
            Focus::Submit => {
                if let Some((address, token)) = app.begin_drip() {
                    spawn_drip(client, tx, address, token);
                }
            }
        },
        (KeyCode::Esc, _) => app.close_dropdown(),

        (KeyCode::Char('n'), _) => app.open_create_modal(),

        (KeyCode::Char('l'), KeyModifiers::CONTROL) => {
            // Sign out: drop the stored token and the in-memory user.
            session.clear();
            app.user.set_user(None);
            app.show_toast("Signed out");
        }
        (KeyCode::Char('l'), _) => {
            app.start_login();
            if clipboard::copy_to_clipboard(&app.github_authorize_url()) {
                app.show_toast("Authorize URL copied");
            }
        }

        (KeyCode::Char('r'), _) => {
            // Reopen the last result, if one was ever shown.
            if app.modals.has_opened(ModalName::DripResult) {
                app.modals.open(ModalName::DripResult);
            }
        }

        (KeyCode::Char('c'), _) => {
            let content = match app.selected_token() {
                Some(t) => t.address.clone(),
                None => return,
            };
            if clipboard::copy_to_clipboard(&content) {
                app.show_toast("Copied token address");
            } else {
                app.show_toast("Copy failed");
            }
        }
        _ => {}
    }
}

fn copy_result_link(app: &mut App) {
    let link = match &app.drip.tx_hash {
        Some(tx_hash) => app.endpoints().explorer_tx(tx_hash),
        None => return,
    };
    if clipboard::copy_to_clipboard(&link) {
        app.show_toast("Copied explorer link");
    } else {
        app.show_toast("Copy failed");
    }
}

fn spawn_drip(
    client: &Arc<FaucetClient>,
    tx: &UnboundedSender<AppEvent>,
    address: String,
    token: spigot::Token,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = client.request_drip(&address, Some(&token)).await;
        let _ = tx.send(AppEvent::DripFinished(outcome));
    });
}

fn spawn_deploy(
    client: &Arc<FaucetClient>,
    tx: &UnboundedSender<AppEvent>,
    job: spigot::app::DeployJob,
) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let ip = match client.fetch_ip().await {
            Ok(ip) => ip,
            Err(e) => {
                let _ = tx.send(AppEvent::DeployFinished(DeployOutcome::failure(
                    e.to_string(),
                )));
                return;
            }
        };
        let (request, icon_path) = job.into_request(ip);
        let icon_name = icon_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "icon".to_string());
        let icon_bytes = match tokio::fs::read(&icon_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = tx.send(AppEvent::DeployFinished(DeployOutcome::failure(format!(
                    "Failed to read icon {}: {e}",
                    icon_path.display()
                ))));
                return;
            }
        };
        let outcome = client.deploy_token(request, &icon_name, icon_bytes).await;
        let _ = tx.send(AppEvent::DeployFinished(outcome));
    });
}

fn spawn_exchange(client: &Arc<FaucetClient>, tx: &UnboundedSender<AppEvent>, code: String) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        match client.exchange_code(&code).await {
            Ok(_) => {
                let _ = tx.send(AppEvent::SessionEstablished);
                let user = client.fetch_user().await;
                let _ = tx.send(AppEvent::UserFetched(user));
            }
            Err(e) => {
                let _ = tx.send(AppEvent::AuthFailed(e.to_string()));
            }
        }
    });
}

fn spawn_fetch_user(client: &Arc<FaucetClient>, tx: &UnboundedSender<AppEvent>) {
    let client = client.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let user = client.fetch_user().await;
        let _ = tx.send(AppEvent::UserFetched(user));
    });
}
