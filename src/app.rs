use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::config::Endpoints;
use crate::state::{DripState, ModalName, ModalState, SessionState, TokenCatalog, UserState};
use crate::theme::{ColorScheme, Theme};
use crate::types::{AppEvent, DeployOutcome, DeployRequest, Token};
use crate::validate::is_valid_evm_address;

const TOAST_TTL: Duration = Duration::from_secs(3);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the wallet-address field.
    Address,
    /// Pasting the OAuth redirect URL / code.
    Login,
    /// The create-token modal owns the keyboard.
    CreateToken,
}

/// Faucet-form focus ladder (Tab cycles).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    TokenSelect,
    Address,
    Submit,
}

/// Drip request lifecycle. Success/Error park on the result modal and fall
/// back to Idle when it is dismissed or a new attempt starts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DripPhase {
    Idle,
    Validating,
    Requesting,
    Success,
    Error,
}

pub const CREATE_FIELDS: usize = 6;

/// Create-token form: field buffers plus inline status.
#[derive(Debug, Default)]
pub struct CreateTokenForm {
    pub name: String,
    pub symbol: String,
    pub supply: String,
    pub decimals: String,
    pub deployer_address: String,
    pub icon_path: String,
    pub field: usize,
    pub message: Option<String>,
    pub loading: bool,
}

/// A validated deploy, ready for the API task. The icon is read from disk by
/// the spawner so validation stays synchronous.
#[derive(Debug, Clone)]
pub struct DeployJob {
    pub name: String,
    pub symbol: String,
    pub total_supply: String,
    pub decimals: u32,
    pub deployer_address: String,
    pub icon_path: PathBuf,
}

impl DeployJob {
    pub fn into_request(self, ip: String) -> (DeployRequest, PathBuf) {
        let icon_path = self.icon_path.clone();
        (
            DeployRequest {
                name: self.name,
                symbol: self.symbol,
                total_supply: self.total_supply,
                decimals: self.decimals,
                deployer_address: self.deployer_address,
                ip,
            },
            icon_path,
        )
    }
}

impl CreateTokenForm {
    pub fn field_mut(&mut self) -> &mut String {
        match self.field {
            0 => &mut self.name,
            1 => &mut self.symbol,
            2 => &mut self.supply,
            3 => &mut self.decimals,
            4 => &mut self.deployer_address,
            _ => &mut self.icon_path,
        }
    }

    pub fn field_value(&self, idx: usize) -> &str {
        match idx {
            0 => &self.name,
            1 => &self.symbol,
            2 => &self.supply,
            3 => &self.decimals,
            4 => &self.deployer_address,
            _ => &self.icon_path,
        }
    }

    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % CREATE_FIELDS;
    }

    pub fn prev_field(&mut self) {
        self.field = (self.field + CREATE_FIELDS - 1) % CREATE_FIELDS;
    }

    fn reset(&mut self) {
        *self = CreateTokenForm::default();
    }

    /// Client-side checks; a `DeployJob` is only produced when everything
    /// passes, so no network request happens for an invalid form.
    fn validate(&self, catalog: &TokenCatalog) -> Result<DeployJob, String> {
        if self.name.trim().is_empty()
            || self.symbol.trim().is_empty()
            || self.supply.trim().is_empty()
            || self.decimals.trim().is_empty()
            || self.deployer_address.trim().is_empty()
            || self.icon_path.trim().is_empty()
        {
            return Err("Error: All fields are required.".to_string());
        }
        if !is_valid_evm_address(self.deployer_address.trim()) {
            return Err("Error: Invalid deployer address.".to_string());
        }
        let decimals: u32 = self
            .decimals
            .trim()
            .parse()
            .map_err(|_| "Error: Decimals must be a number.".to_string())?;
        if catalog.symbol_exists(self.symbol.trim()) {
            return Err("Error: The token symbol already exists.".to_string());
        }
        Ok(DeployJob {
            name: self.name.trim().to_string(),
            symbol: self.symbol.trim().to_uppercase(),
            total_supply: self.supply.trim().to_string(),
            decimals,
            deployer_address: self.deployer_address.trim().to_string(),
            icon_path: PathBuf::from(self.icon_path.trim()),
        })
    }

    fn finish(&mut self, outcome: &DeployOutcome) {
        self.loading = false;
        self.message = match (&outcome.contract_address, &outcome.error) {
            (Some(addr), _) => Some(format!("Token deployed successfully: {addr}")),
            (None, Some(err)) => Some(format!("Deployment Error: {err}")),
            (None, None) => Some("Deployment Error: Unexpected response format".to_string()),
        };
    }
}

pub struct App {
    quit: bool,
    theme_name: Theme,
    theme: ColorScheme,
    endpoints: Endpoints,
    github_client_id: String,

    input_mode: InputMode,
    focus: Focus,

    // Faucet form
    address_input: String,
    selected_token: Option<Token>,
    dropdown_open: bool,
    dropdown_selection: usize,
    // Last-rendered dropdown geometry, set by the UI layer each frame and
    // used to hit-test mouse clicks for outside-click dismissal.
    dropdown_button_area: Option<Rect>,
    dropdown_list_area: Option<Rect>,
    // Modal content rects, same purpose: overlay clicks dismiss, clicks on
    // the content itself do not propagate to the overlay.
    drip_modal_area: Option<Rect>,
    create_modal_area: Option<Rect>,

    drip_phase: DripPhase,
    pending_drip_token: Option<Token>,

    pub create_form: CreateTokenForm,
    login_buffer: String,

    // Stores
    pub catalog: TokenCatalog,
    pub drip: DripState,
    pub session: SessionState,
    pub user: UserState,
    pub modals: ModalState,

    toast: Option<(String, Instant)>,
}

impl App {
    pub fn new(theme_name: Theme, endpoints: Endpoints, github_client_id: String) -> Self {
        Self {
            quit: false,
            theme_name,
            theme: theme_name.colors(),
            endpoints,
            github_client_id,
            input_mode: InputMode::Normal,
            focus: Focus::TokenSelect,
            address_input: String::new(),
            selected_token: None,
            dropdown_open: false,
            dropdown_selection: 0,
            dropdown_button_area: None,
            dropdown_list_area: None,
            drip_modal_area: None,
            create_modal_area: None,
            drip_phase: DripPhase::Idle,
            pending_drip_token: None,
            create_form: CreateTokenForm::default(),
            login_buffer: String::new(),
            catalog: TokenCatalog::default(),
            drip: DripState::default(),
            session: SessionState::default(),
            user: UserState::default(),
            modals: ModalState::default(),
            toast: None,
        }
    }

    // ----- getters -----
    pub fn quit_flag(&self) -> bool {
        self.quit
    }
    pub fn theme(&self) -> &ColorScheme {
        &self.theme
    }
    pub fn theme_name(&self) -> Theme {
        self.theme_name
    }
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }
    pub fn focus(&self) -> Focus {
        self.focus
    }
    pub fn address_input(&self) -> &str {
        &self.address_input
    }
    pub fn selected_token(&self) -> Option<&Token> {
        self.selected_token.as_ref()
    }
    pub fn dropdown_open(&self) -> bool {
        self.dropdown_open
    }
    pub fn dropdown_selection(&self) -> usize {
        self.dropdown_selection
    }
    pub fn drip_phase(&self) -> DripPhase {
        self.drip_phase
    }
    pub fn login_buffer(&self) -> &str {
        &self.login_buffer
    }

    pub fn github_authorize_url(&self) -> String {
        Endpoints::github_authorize(&self.github_client_id)
    }

    pub fn toast_message(&self) -> Option<&str> {
        match &self.toast {
            Some((msg, at)) if at.elapsed() < TOAST_TTL => Some(msg),
            _ => None,
        }
    }

    pub fn show_toast(&mut self, msg: impl Into<String>) {
        self.toast = Some((msg.into(), Instant::now()));
    }

    // ----- focus / navigation -----
    pub fn next_focus(&mut self) {
        self.focus = match self.focus {
            Focus::TokenSelect => Focus::Address,
            Focus::Address => Focus::Submit,
            Focus::Submit => Focus::TokenSelect,
        };
    }

    pub fn prev_focus(&mut self) {
        self.focus = match self.focus {
            Focus::TokenSelect => Focus::Submit,
            Focus::Address => Focus::TokenSelect,
            Focus::Submit => Focus::Address,
        };
    }

    // ----- token dropdown -----
    pub fn toggle_dropdown(&mut self) {
        self.dropdown_open = !self.dropdown_open;
        if self.dropdown_open {
            // Start from the current selection when reopening.
            if let Some(sel) = &self.selected_token {
                if let Some(idx) = self
                    .catalog
                    .tokens()
                    .iter()
                    .position(|t| t.address == sel.address)
                {
                    self.dropdown_selection = idx;
                }
            }
        }
    }

    pub fn close_dropdown(&mut self) {
        self.dropdown_open = false;
    }

    pub fn dropdown_up(&mut self) {
        self.dropdown_selection = self.dropdown_selection.saturating_sub(1);
    }

    pub fn dropdown_down(&mut self) {
        if !self.catalog.is_empty() {
            self.dropdown_selection = (self.dropdown_selection + 1).min(self.catalog.len() - 1);
        }
    }

    pub fn dropdown_select_current(&mut self) {
        if let Some(token) = self.catalog.get(self.dropdown_selection) {
            self.selected_token = Some(token.clone());
        }
        self.dropdown_open = false;
    }

    pub fn dropdown_list_area(&self) -> Option<Rect> {
        self.dropdown_list_area
    }

    pub fn set_dropdown_areas(&mut self, button: Rect, list: Option<Rect>) {
        self.dropdown_button_area = Some(button);
        self.dropdown_list_area = list;
    }

    pub fn set_drip_modal_area(&mut self, area: Rect) {
        self.drip_modal_area = Some(area);
    }

    pub fn set_create_modal_area(&mut self, area: Rect) {
        self.create_modal_area = Some(area);
    }

    /// Pointer-down hit test. Open modals come first: a press on their
    /// content is swallowed, a press on the overlay dismisses them. Below
    /// that, a press inside the open dropdown list selects a row and
    /// anywhere outside closes it (outside-click dismissal).
    pub fn on_mouse_down(&mut self, x: u16, y: u16) {
        if self.modals.is_open(ModalName::DripResult) {
            if !matches!(self.drip_modal_area, Some(r) if contains(r, x, y)) {
                self.dismiss_drip_modal();
            }
            return;
        }
        if self.modals.is_open(ModalName::CreateToken) {
            if !matches!(self.create_modal_area, Some(r) if contains(r, x, y)) {
                self.close_create_modal();
            }
            return;
        }
        if !self.dropdown_open {
            return;
        }
        if let Some(list) = self.dropdown_list_area {
            if contains(list, x, y) {
                // First list row sits just under the top border.
                let row = y.saturating_sub(list.y.saturating_add(1)) as usize;
                if y > list.y && row < self.catalog.len() {
                    self.dropdown_selection = row;
                    self.dropdown_select_current();
                }
                return;
            }
        }
        if let Some(button) = self.dropdown_button_area {
            if contains(button, x, y) {
                self.toggle_dropdown();
                return;
            }
        }
        self.close_dropdown();
    }

    // ----- address input -----
    pub fn start_address_entry(&mut self) {
        self.input_mode = InputMode::Address;
        self.focus = Focus::Address;
    }

    pub fn end_address_entry(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn address_push(&mut self, c: char) {
        if !c.is_control() {
            self.address_input.push(c);
        }
    }

    pub fn address_backspace(&mut self) {
        self.address_input.pop();
    }

    pub fn address_is_valid(&self) -> bool {
        is_valid_evm_address(&self.address_input)
    }

    // ----- drip submission -----
    /// Mirrors the form's state ladder: what the submit control says.
    pub fn submit_label(&self) -> &'static str {
        if self.drip_phase == DripPhase::Requesting {
            "Requesting..."
        } else if self.selected_token.is_none() {
            "Select Token"
        } else if self.address_input.is_empty() {
            "Enter Wallet Address"
        } else if self.address_is_valid() {
            "Request Testnet Tokens"
        } else {
            "Invalid Address"
        }
    }

    pub fn submit_enabled(&self) -> bool {
        self.drip_phase != DripPhase::Requesting
            && self.selected_token.is_some()
            && !self.address_input.is_empty()
            && self.address_is_valid()
    }

    /// Idle -> Validating -> Requesting. Returns the request to spawn, or
    /// None when the submission is blocked (disabled control, in-flight
    /// request, or the format check failing).
    pub fn begin_drip(&mut self) -> Option<(String, Token)> {
        if self.drip_phase == DripPhase::Requesting {
            return None;
        }
        let token = match &self.selected_token {
            Some(t) if !self.address_input.is_empty() => t.clone(),
            _ => return None,
        };
        self.drip_phase = DripPhase::Validating;
        if !self.address_is_valid() {
            self.drip_phase = DripPhase::Idle;
            return None;
        }
        self.drip_phase = DripPhase::Requesting;
        self.drip.set_loading(true);
        self.pending_drip_token = Some(token.clone());
        Some((self.address_input.clone(), token))
    }

    pub fn dismiss_drip_modal(&mut self) {
        self.modals.close(ModalName::DripResult);
        self.drip_phase = DripPhase::Idle;
    }

    // ----- create-token modal -----
    pub fn open_create_modal(&mut self) {
        self.modals.open(ModalName::CreateToken);
        self.input_mode = InputMode::CreateToken;
    }

    pub fn close_create_modal(&mut self) {
        self.modals.close(ModalName::CreateToken);
        self.input_mode = InputMode::Normal;
        self.create_form.reset();
    }

    /// Validate and arm the deploy. Validation failures land in the inline
    /// message and produce no job (and therefore no network call).
    pub fn begin_deploy(&mut self) -> Option<DeployJob> {
        if self.create_form.loading {
            return None;
        }
        match self.create_form.validate(&self.catalog) {
            Ok(job) => {
                self.create_form.message = None;
                self.create_form.loading = true;
                Some(job)
            }
            Err(msg) => {
                self.create_form.message = Some(msg);
                None
            }
        }
    }

    // ----- login -----
    pub fn start_login(&mut self) {
        self.input_mode = InputMode::Login;
        self.login_buffer.clear();
    }

    pub fn cancel_login(&mut self) {
        self.input_mode = InputMode::Normal;
        self.login_buffer.clear();
    }

    pub fn login_push(&mut self, c: char) {
        if !c.is_control() {
            self.login_buffer.push(c);
        }
    }

    pub fn login_backspace(&mut self) {
        self.login_buffer.pop();
    }

    /// Parse the pasted redirect; on success the code becomes the pending
    /// session code and is handed to the exchange task.
    pub fn commit_login(&mut self) -> Option<String> {
        let code = crate::auth_callback::parse_auth_code(&self.login_buffer);
        self.login_buffer.clear();
        self.input_mode = InputMode::Normal;
        match code {
            Some(code) => {
                self.session.set_code(Some(code.clone()));
                Some(code)
            }
            None => {
                self.show_toast("No code found in pasted input");
                None
            }
        }
    }

    // ----- events -----
    pub fn on_event(&mut self, ev: AppEvent) {
        match ev {
            AppEvent::CatalogReplaced(tokens) => {
                self.catalog.replace_all(tokens);
                if self.dropdown_selection >= self.catalog.len() {
                    self.dropdown_selection = self.catalog.len().saturating_sub(1);
                }
            }
            AppEvent::DripFinished(outcome) => {
                let token = self
                    .pending_drip_token
                    .take()
                    .or_else(|| self.selected_token.clone());
                if let Some(token) = token {
                    self.drip.apply_outcome(&outcome, token);
                }
                self.drip_phase = if outcome.is_success() {
                    DripPhase::Success
                } else {
                    DripPhase::Error
                };
                self.modals.open(ModalName::DripResult);
            }
            AppEvent::DeployFinished(outcome) => {
                self.create_form.finish(&outcome);
            }
            AppEvent::SessionEstablished => {
                // Exchange done: the code has served its purpose.
                self.session.take_code();
            }
            AppEvent::AuthFailed(msg) => {
                self.session.take_code();
                self.show_toast(format!("Login failed: {msg}"));
            }
            AppEvent::UserFetched(user) => {
                if let Some(u) = &user {
                    self.show_toast(format!("Signed in as {}", u.username));
                }
                self.user.set_user(user);
            }
            AppEvent::Quit => {
                self.quit = true;
            }
        }
    }
}

fn contains(r: Rect, x: u16, y: u16) -> bool {
    x >= r.x && x < r.x.saturating_add(r.width) && y >= r.y && y < r.y.saturating_add(r.height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DripOutcome;

    fn app() -> App {
        App::new(
            Theme::Nord,
            Endpoints::new("https://faucet.example.org", "https://x.example/tx/"),
            "gh-abc".into(),
        )
    }

    fn usdc() -> Token {
        Token {
            created_by: "faucet".into(),
            token_type: "erc20".into(),
            address: "0xAAA0000000000000000000000000000000000001".into(),
            logo_url: String::new(),
            chain_id: 10143,
            symbol: "USDC".into(),
            name: "USD Coin".into(),
            decimals: 6,
        }
    }

    fn app_with_token() -> App {
        let mut a = app();
        a.on_event(AppEvent::CatalogReplaced(vec![usdc()]));
        a.dropdown_selection = 0;
        a.dropdown_select_current();
        a
    }

    #[test]
    fn submit_ladder_matches_form_state() {
        let mut a = app();
        assert_eq!(a.submit_label(), "Select Token");
        assert!(!a.submit_enabled());

        a = app_with_token();
        assert_eq!(a.submit_label(), "Enter Wallet Address");

        for c in "not-an-address".chars() {
            a.address_push(c);
        }
        assert_eq!(a.submit_label(), "Invalid Address");
        assert!(!a.submit_enabled());
        // Malformed address: submission is blocked before any request.
        assert!(a.begin_drip().is_none());
        assert_eq!(a.drip_phase(), DripPhase::Idle);
    }

    #[test]
    fn valid_submission_moves_to_requesting() {
        let mut a = app_with_token();
        for c in "0x1111111111111111111111111111111111111111".chars() {
            a.address_push(c);
        }
        assert!(a.submit_enabled());
        let (to, token) = a.begin_drip().unwrap();
        assert_eq!(to, "0x1111111111111111111111111111111111111111");
        assert_eq!(token.symbol, "USDC");
        assert_eq!(a.drip_phase(), DripPhase::Requesting);

        // Re-submission while in flight is blocked.
        assert!(a.begin_drip().is_none());
        assert!(!a.submit_enabled());
    }

    #[test]
    fn drip_finished_opens_modal_and_dismissal_returns_to_idle() {
        let mut a = app_with_token();
        for c in "0x1111111111111111111111111111111111111111".chars() {
            a.address_push(c);
        }
        a.begin_drip().unwrap();
        a.on_event(AppEvent::DripFinished(DripOutcome {
            tx_hash: Some("0xHASH".into()),
            amount: Some("1000000".into()),
            next_access: None,
            magnification: 1,
            error: None,
        }));
        assert_eq!(a.drip_phase(), DripPhase::Success);
        assert!(a.modals.is_open(ModalName::DripResult));
        assert_eq!(a.drip.tx_hash.as_deref(), Some("0xHASH"));
        assert_eq!(a.drip.drip_token.as_ref().unwrap().symbol, "USDC");

        a.dismiss_drip_modal();
        assert_eq!(a.drip_phase(), DripPhase::Idle);
        assert!(!a.modals.is_open(ModalName::DripResult));
        // Result fields persist after dismissal.
        assert_eq!(a.drip.tx_hash.as_deref(), Some("0xHASH"));
    }

    #[test]
    fn failed_drip_parks_on_error() {
        let mut a = app_with_token();
        for c in "0x1111111111111111111111111111111111111111".chars() {
            a.address_push(c);
        }
        a.begin_drip().unwrap();
        a.on_event(AppEvent::DripFinished(DripOutcome::failure("rate limited")));
        assert_eq!(a.drip_phase(), DripPhase::Error);
        assert!(a.modals.is_open(ModalName::DripResult));
        assert!(a.drip.error);
    }

    #[test]
    fn outside_click_closes_dropdown() {
        let mut a = app_with_token();
        a.toggle_dropdown();
        assert!(a.dropdown_open());
        a.set_dropdown_areas(
            Rect::new(10, 5, 20, 3),
            Some(Rect::new(10, 8, 20, 6)),
        );
        // Press far away from both areas.
        a.on_mouse_down(0, 0);
        assert!(!a.dropdown_open());
    }

    #[test]
    fn click_on_list_row_selects_token() {
        let mut a = app_with_token();
        a.selected_token = None;
        a.toggle_dropdown();
        a.set_dropdown_areas(
            Rect::new(10, 5, 20, 3),
            Some(Rect::new(10, 8, 20, 6)),
        );
        // Row 0 sits one line under the list's top border.
        a.on_mouse_down(12, 9);
        assert!(!a.dropdown_open());
        assert_eq!(a.selected_token().unwrap().symbol, "USDC");
    }

    #[test]
    fn overlay_click_dismisses_result_modal_but_content_click_does_not() {
        let mut a = app_with_token();
        for c in "0x1111111111111111111111111111111111111111".chars() {
            a.address_push(c);
        }
        a.begin_drip().unwrap();
        a.on_event(AppEvent::DripFinished(DripOutcome::failure("nope")));
        assert!(a.modals.is_open(ModalName::DripResult));
        a.set_drip_modal_area(Rect::new(20, 10, 40, 8));

        // Click on the modal content: swallowed.
        a.on_mouse_down(25, 12);
        assert!(a.modals.is_open(ModalName::DripResult));

        // Click on the overlay: dismissed, back to Idle.
        a.on_mouse_down(1, 1);
        assert!(!a.modals.is_open(ModalName::DripResult));
        assert_eq!(a.drip_phase(), DripPhase::Idle);
    }

    #[test]
    fn duplicate_symbol_blocks_deploy_without_a_job() {
        let mut a = app_with_token();
        a.open_create_modal();
        a.create_form.name = "My USD".into();
        a.create_form.symbol = "usdc".into();
        a.create_form.supply = "1000000".into();
        a.create_form.decimals = "6".into();
        a.create_form.deployer_address = "0x1111111111111111111111111111111111111111".into();
        a.create_form.icon_path = "/tmp/icon.png".into();

        assert!(a.begin_deploy().is_none());
        assert_eq!(
            a.create_form.message.as_deref(),
            Some("Error: The token symbol already exists.")
        );
        assert!(!a.create_form.loading);
    }

    #[test]
    fn valid_deploy_form_uppercases_symbol() {
        let mut a = app_with_token();
        a.open_create_modal();
        a.create_form.name = "New Token".into();
        a.create_form.symbol = "newt".into();
        a.create_form.supply = "1000000".into();
        a.create_form.decimals = "18".into();
        a.create_form.deployer_address = "0x1111111111111111111111111111111111111111".into();
        a.create_form.icon_path = "/tmp/icon.png".into();

        let job = a.begin_deploy().unwrap();
        assert_eq!(job.symbol, "NEWT");
        assert_eq!(job.decimals, 18);
        assert!(a.create_form.loading);
        // Second submit while loading is blocked.
        assert!(a.begin_deploy().is_none());
    }

    #[test]
    fn login_commit_sets_pending_code_and_exchange_clears_it() {
        let mut a = app();
        a.start_login();
        for c in "https://faucet.example.org/?code=abc123".chars() {
            a.login_push(c);
        }
        let code = a.commit_login().unwrap();
        assert_eq!(code, "abc123");
        assert_eq!(a.session.pending_code(), Some("abc123"));

        a.on_event(AppEvent::SessionEstablished);
        assert_eq!(a.session.pending_code(), None);
    }

    #[test]
    fn catalog_replacement_clamps_dropdown_selection() {
        let mut a = app_with_token();
        a.dropdown_selection = 5;
        a.on_event(AppEvent::CatalogReplaced(vec![usdc()]));
        assert_eq!(a.dropdown_selection(), 0);
    }
}
