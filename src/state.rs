//! Application state containers.
//!
//! The browser original kept these as process-wide stores; here each is an
//! explicit struct owned by the [`crate::app::App`] and mutated through named
//! reducers. A mutator touches only the fields it names.

use crate::types::{DripOutcome, Token, User};

/// OAuth code pending exchange. Exists only between paste/flag and the
/// exchange call; cleared afterwards either way a session was stored or not.
#[derive(Debug, Default)]
pub struct SessionState {
    code: Option<String>,
}

impl SessionState {
    pub fn pending_code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn set_code(&mut self, code: Option<String>) {
        self.code = code;
    }

    pub fn take_code(&mut self) -> Option<String> {
        self.code.take()
    }
}

/// Current user; `None` until an exchange + fetch completes, and again after
/// any auth failure.
#[derive(Debug, Default)]
pub struct UserState {
    user: Option<User>,
}

impl UserState {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn set_user(&mut self, user: Option<User>) {
        self.user = user;
    }
}

/// Result of the latest drip attempt plus its UI status flags. The
/// response-derived fields are only ever written together, per response;
/// dismissing the result modal does not clear them.
#[derive(Debug, Default)]
pub struct DripState {
    pub loading: bool,
    pub success: bool,
    pub error: bool,
    pub error_message: Option<String>,
    pub tx_hash: Option<String>,
    pub amount: Option<String>,
    pub next_access: Option<String>,
    pub magnification: u32,
    pub drip_token: Option<Token>,
}

impl DripState {
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Apply one withdrawal response. Every response-derived field is
    /// replaced, so nothing from a previous attempt survives.
    pub fn apply_outcome(&mut self, outcome: &DripOutcome, token: Token) {
        self.loading = false;
        self.success = outcome.is_success();
        self.error = outcome.error.is_some();
        self.error_message = outcome.error.clone();
        self.tx_hash = outcome.tx_hash.clone();
        self.amount = outcome.amount.clone();
        self.next_access = outcome.next_access.clone();
        self.magnification = outcome.magnification.max(1);
        self.drip_token = Some(token);
    }
}

/// Catalog of drippable tokens. Created empty; replaced wholesale on each
/// successful poll; a failed poll leaves the previous contents untouched
/// (the poller simply never calls `replace_all`).
#[derive(Debug, Default)]
pub struct TokenCatalog {
    tokens: Vec<Token>,
}

impl TokenCatalog {
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Token> {
        self.tokens.get(idx)
    }

    pub fn replace_all(&mut self, tokens: Vec<Token>) {
        self.tokens = tokens;
    }

    /// Case-insensitive symbol lookup, used to block duplicate deployments.
    pub fn symbol_exists(&self, symbol: &str) -> bool {
        self.tokens
            .iter()
            .any(|t| t.symbol.eq_ignore_ascii_case(symbol))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalName {
    DripResult,
    CreateToken,
}

#[derive(Debug, Default)]
struct ModalFlags {
    open: bool,
    /// Never true until the first open; lets the renderer tell "mount, never
    /// shown" apart from "closing" when animating.
    has_opened: bool,
}

/// Visibility of the two named modals. They are independent: opening or
/// closing one never touches the other.
#[derive(Debug, Default)]
pub struct ModalState {
    drip_result: ModalFlags,
    create_token: ModalFlags,
}

impl ModalState {
    fn flags(&self, name: ModalName) -> &ModalFlags {
        match name {
            ModalName::DripResult => &self.drip_result,
            ModalName::CreateToken => &self.create_token,
        }
    }

    fn flags_mut(&mut self, name: ModalName) -> &mut ModalFlags {
        match name {
            ModalName::DripResult => &mut self.drip_result,
            ModalName::CreateToken => &mut self.create_token,
        }
    }

    pub fn open(&mut self, name: ModalName) {
        let flags = self.flags_mut(name);
        flags.open = true;
        flags.has_opened = true;
    }

    pub fn close(&mut self, name: ModalName) {
        self.flags_mut(name).open = false;
    }

    pub fn is_open(&self, name: ModalName) -> bool {
        self.flags(name).open
    }

    pub fn has_opened(&self, name: ModalName) -> bool {
        self.flags(name).has_opened
    }

    pub fn any_open(&self) -> bool {
        self.drip_result.open || self.create_token.open
    }
}
