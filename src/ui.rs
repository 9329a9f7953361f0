use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, DripPhase, Focus, InputMode, CREATE_FIELDS};
use crate::state::ModalName;
use crate::util_text::{format_units, short_hex, to_local_time};

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(0),    // body
            Constraint::Length(1), // footer
        ])
        .split(f.area());

    header(f, chunks[0], app);
    body(f, chunks[1], app);
    footer(f, chunks[2], app);

    // Overlays render last
    if app.dropdown_open() {
        draw_dropdown_overlay(f, app);
    }
    if app.modals.is_open(ModalName::CreateToken) {
        draw_create_token_modal(f, app);
    }
    if app.modals.is_open(ModalName::DripResult) {
        draw_drip_result_modal(f, app);
    }
    if app.input_mode() == InputMode::Login {
        draw_login_overlay(f, app);
    }
    if app.toast_message().is_some() {
        draw_toast(f, app);
    }
}

// ===============================
// Header / Footer
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let theme = *app.theme();
    let mut spans = vec![
        Span::styled(
            " Spigot ",
            Style::default()
                .fg(theme.focus_border)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("· testnet faucet", Style::default().fg(theme.text_dim)),
    ];

    let right = match app.user.user() {
        Some(user) => format!("@{} ", user.username),
        None => "not signed in · press l ".to_string(),
    };
    let pad = (area.width as usize)
        .saturating_sub(spans.iter().map(|s| s.content.len()).sum::<usize>() + right.len());
    spans.push(Span::raw(" ".repeat(pad)));
    spans.push(Span::styled(
        right,
        Style::default().fg(match app.user.user() {
            Some(_) => theme.badge,
            None => theme.text_dim,
        }),
    ));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = *app.theme();
    let hints = match app.input_mode() {
        InputMode::Address => "Enter/Esc done · type address".to_string(),
        InputMode::Login => "Enter exchange · Esc cancel".to_string(),
        InputMode::CreateToken => {
            "Tab next field · Enter deploy · Esc close".to_string()
        }
        InputMode::Normal => {
            let mut hints =
                "Tab focus · Enter activate · n new token · l login · c copy · q quit".to_string();
            // Only offer reopening once a result has ever been shown.
            if !app.modals.is_open(ModalName::DripResult)
                && app.modals.has_opened(ModalName::DripResult)
            {
                hints.push_str(" · r last result");
            }
            hints
        }
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {hints}"),
            Style::default().fg(theme.text_dim),
        ))),
        area,
    );
}

// ===============================
// Body: the faucet form
// ===============================
fn body(f: &mut Frame, area: Rect, app: &mut App) {
    const MIN_WIDTH: u16 = 50;
    const MIN_HEIGHT: u16 = 14;

    let theme = *app.theme();
    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let warning_text = format!(
            "Terminal too small!\n\nMinimum size: {}×{}\nCurrent size: {}×{}\n\nPlease resize your terminal.",
            MIN_WIDTH, MIN_HEIGHT, area.width, area.height
        );
        let warning = Paragraph::new(warning_text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.error).add_modifier(Modifier::BOLD))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(theme.error)),
            );
        f.render_widget(warning, area);
        return;
    }

    let panel = centered_rect(area, 52, 12);
    let form = Block::default()
        .title(" Request Testnet Tokens ")
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.unfocused_border));
    let inner = form.inner(panel);
    f.render_widget(form, panel);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tagline
            Constraint::Length(3), // token select
            Constraint::Length(3), // address input
            Constraint::Length(1), // validation hint
            Constraint::Length(1), // spacer
            Constraint::Length(1), // submit
        ])
        .split(inner);

    f.render_widget(
        Paragraph::new("Instantly get free testnet tokens for your wallet.")
            .style(Style::default().fg(theme.text_dim))
            .alignment(Alignment::Center),
        rows[0],
    );

    // Token dropdown button
    let token_focused = app.focus() == Focus::TokenSelect;
    let token_label = match app.selected_token() {
        Some(t) => format!("{}  {}", t.symbol, t.name),
        None => {
            if app.catalog.is_empty() {
                "Loading tokens...".to_string()
            } else {
                "Select a token".to_string()
            }
        }
    };
    let arrow = if app.dropdown_open() { "▴" } else { "▾" };
    let button = Paragraph::new(format!("{token_label}  {arrow}"))
        .style(Style::default().fg(match app.selected_token() {
            Some(_) => theme.text,
            None => theme.text_dim,
        }))
        .block(bordered(" Token ", token_focused, &theme));
    f.render_widget(button, rows[1]);
    let button_area = rows[1];

    // Address input
    let addr_focused = app.focus() == Focus::Address;
    let editing = app.input_mode() == InputMode::Address;
    let addr_text = if app.address_input().is_empty() && !editing {
        "0x...".to_string()
    } else {
        app.address_input().to_string()
    };
    let addr = Paragraph::new(addr_text)
        .style(Style::default().fg(if app.address_input().is_empty() {
            theme.text_dim
        } else {
            theme.text
        }))
        .block(bordered(" Wallet Address ", addr_focused || editing, &theme));
    f.render_widget(addr, rows[2]);
    if editing && rows[2].width > 2 {
        let x = rows[2].x
            + 1
            + (app.address_input().len().min((rows[2].width.saturating_sub(2)) as usize) as u16);
        f.set_cursor_position((x, rows[2].y + 1));
    }

    // Inline validation message, as in the form original: only for a
    // non-empty malformed address.
    if !app.address_input().is_empty() && !app.address_is_valid() {
        f.render_widget(
            Paragraph::new("Please enter a valid EVM address.")
                .style(Style::default().fg(theme.error)),
            rows[3],
        );
    }

    // Submit control
    let submit_focused = app.focus() == Focus::Submit;
    let enabled = app.submit_enabled();
    let label = if app.drip_phase() == DripPhase::Requesting {
        format!("{} {}", spinner_frame(), app.submit_label())
    } else {
        format!("[ {} ]", app.submit_label())
    };
    let style = if !enabled {
        Style::default().fg(theme.text_dim)
    } else if submit_focused {
        Style::default()
            .fg(theme.selection_fg)
            .bg(theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    };
    f.render_widget(
        Paragraph::new(label).style(style).alignment(Alignment::Center),
        rows[5],
    );

    // Dropdown geometry for mouse hit-testing; the list drops under the
    // button when open.
    let list_area = if app.dropdown_open() {
        let height = (app.catalog.len().min(6) as u16).saturating_add(2);
        let mut list = Rect::new(button_area.x, button_area.y + 2, button_area.width, height);
        let max_y = area.y.saturating_add(area.height);
        if list.y.saturating_add(list.height) > max_y {
            list.height = max_y.saturating_sub(list.y);
        }
        Some(list)
    } else {
        None
    };
    app.set_dropdown_areas(button_area, list_area);
}

fn draw_dropdown_overlay(f: &mut Frame, app: &App) {
    let theme = *app.theme();
    let Some(area) = app.dropdown_list_area() else {
        return;
    };
    if area.height < 3 {
        return;
    }

    let items: Vec<ListItem> = app
        .catalog
        .tokens()
        .iter()
        .map(|t| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<8}", t.symbol),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(t.name.clone(), Style::default().fg(theme.text_dim)),
            ]))
        })
        .collect();

    let mut state = ListState::default();
    state.select(Some(app.dropdown_selection()));

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.focus_border)),
        )
        .highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg),
        );

    f.render_widget(Clear, area);
    f.render_stateful_widget(list, area, &mut state);
}

// ===============================
// Modals
// ===============================
fn draw_drip_result_modal(f: &mut Frame, app: &mut App) {
    let theme = *app.theme();
    let area = centered_rect(f.area(), 64, 10);
    app.set_drip_modal_area(area);

    let mut lines: Vec<Line> = Vec::new();
    match &app.drip.tx_hash {
        Some(tx_hash) => {
            let (amount, symbol, decimals) = match &app.drip.drip_token {
                Some(t) => (
                    app.drip.amount.as_deref().unwrap_or("0"),
                    t.symbol.as_str(),
                    t.decimals,
                ),
                None => (app.drip.amount.as_deref().unwrap_or("0"), "", 0),
            };
            let pretty = format!("{} {}", format_units(amount, decimals), symbol);
            if app.drip.magnification > 1 {
                lines.push(Line::from(vec![
                    Span::raw("Your refreshment is on its way, with a "),
                    Span::styled(
                        format!("{}x boost", app.drip.magnification),
                        Style::default()
                            .fg(theme.badge)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(" ({pretty}), wow!")),
                ]));
            } else {
                lines.push(Line::from(format!(
                    "The refreshment ({pretty}) you requested is on its way, wow!"
                )));
            }
            lines.push(Line::raw(""));
            lines.push(Line::from(vec![
                Span::raw("Check how it's doing: "),
                Span::styled(
                    app.endpoints().explorer_tx(tx_hash),
                    Style::default().fg(theme.badge),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                format!("tx {}  ·  c to copy the link", short_hex(tx_hash)),
                Style::default().fg(theme.text_dim),
            )));
        }
        None => {
            let when = match &app.drip.next_access {
                Some(next) => format!("after {}", to_local_time(next)),
                None => "later......".to_string(),
            };
            lines.push(Line::from(format!("No refreshment for now, come back {when}")));
            if let Some(msg) = &app.drip.error_message {
                lines.push(Line::from(Span::styled(
                    msg.clone(),
                    Style::default().fg(theme.error),
                )));
            }
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Esc / Enter to close",
        Style::default().fg(theme.text_dim),
    )));

    let border = if app.drip.success {
        theme.success
    } else {
        theme.error
    };
    let modal = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Refreshment ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}

fn draw_create_token_modal(f: &mut Frame, app: &mut App) {
    let theme = *app.theme();
    let area = centered_rect(f.area(), 58, 14);
    app.set_create_modal_area(area);

    const LABELS: [&str; CREATE_FIELDS] = [
        "Token Name",
        "Token Symbol",
        "Total Supply",
        "Decimals",
        "Deployer Address",
        "Icon File",
    ];

    let mut lines: Vec<Line> = Vec::new();
    for (idx, label) in LABELS.iter().enumerate() {
        let focused = app.create_form.field == idx;
        let value = app.create_form.field_value(idx);
        let marker = if focused { "> " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{marker}{label:<17}"),
                if focused {
                    Style::default()
                        .fg(theme.focus_border)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(theme.text_dim)
                },
            ),
            Span::styled(
                if value.is_empty() { "…" } else { value },
                Style::default().fg(theme.text),
            ),
        ]));
    }
    lines.push(Line::raw(""));
    if let Some(message) = &app.create_form.message {
        let color = if message.starts_with("Token deployed") {
            theme.success
        } else {
            theme.error
        };
        lines.push(Line::from(Span::styled(
            message.clone(),
            Style::default().fg(color),
        )));
    } else if app.create_form.loading {
        lines.push(Line::from(Span::styled(
            format!("{} Deploying...", spinner_frame()),
            Style::default().fg(theme.text_dim),
        )));
    }

    let modal = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
        Block::default()
            .title(" Create New Token ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.focus_border)),
    );
    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}

fn draw_login_overlay(f: &mut Frame, app: &App) {
    let theme = *app.theme();
    let area = centered_rect(f.area(), 68, 9);

    let lines = vec![
        Line::from("1. Open this URL in a browser (copied to clipboard):"),
        Line::from(Span::styled(
            app.github_authorize_url(),
            Style::default().fg(theme.badge),
        )),
        Line::from("2. Authorize, then paste the redirect URL or code here:"),
        Line::raw(""),
        Line::from(Span::styled(
            format!("> {}", app.login_buffer()),
            Style::default().fg(theme.text),
        )),
    ];

    let modal = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(" Sign in with GitHub ")
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.focus_border)),
    );
    f.render_widget(Clear, area);
    f.render_widget(modal, area);
}

fn draw_toast(f: &mut Frame, app: &App) {
    let theme = *app.theme();
    let Some(msg) = app.toast_message() else { return };
    let width = (msg.len() as u16 + 4).min(f.area().width);
    let area = Rect::new(
        f.area().width.saturating_sub(width + 1),
        f.area().height.saturating_sub(4),
        width,
        3,
    );
    let toast = Paragraph::new(msg.to_string()).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.badge)),
    );
    f.render_widget(Clear, area);
    f.render_widget(toast, area);
}

// ===============================
// Helpers
// ===============================
fn bordered<'a>(
    title: &'a str,
    focused: bool,
    theme: &crate::theme::ColorScheme,
) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if focused {
            theme.focus_border
        } else {
            theme.unfocused_border
        }))
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

fn spinner_frame() -> char {
    const FRAMES: [char; 4] = ['|', '/', '-', '\\'];
    let ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    FRAMES[((ms / 120) % 4) as usize]
}
