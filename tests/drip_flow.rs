//! End-to-end drip form scenario against the app state machine: catalog in,
//! address typed, request armed, response applied, result rendered state.

use spigot::config::Endpoints;
use spigot::state::ModalName;
use spigot::theme::Theme;
use spigot::types::{AppEvent, DripOutcome, DripRequest, Token};
use spigot::{App, DripPhase};

fn usdc() -> Token {
    Token {
        created_by: "faucet".into(),
        token_type: "erc20".into(),
        address: "0xAAA0000000000000000000000000000000000001".into(),
        logo_url: "https://img.example/usdc.png".into(),
        chain_id: 10143,
        symbol: "USDC".into(),
        name: "USD Coin".into(),
        decimals: 6,
    }
}

fn app_with_catalog() -> App {
    let mut app = App::new(
        Theme::default(),
        Endpoints::new("https://faucet.example.org", "https://x.example/tx/"),
        "gh-abc".into(),
    );
    app.on_event(AppEvent::CatalogReplaced(vec![usdc()]));
    app
}

fn type_address(app: &mut App, address: &str) {
    app.start_address_entry();
    for c in address.chars() {
        app.address_push(c);
    }
    app.end_address_entry();
}

#[test]
fn successful_drip_round_trip() {
    let mut app = app_with_catalog();

    // Pick USDC from the dropdown.
    app.toggle_dropdown();
    app.dropdown_select_current();
    assert_eq!(app.selected_token().unwrap().symbol, "USDC");

    type_address(&mut app, "0x1111111111111111111111111111111111111111");
    assert!(app.submit_enabled());

    let (to, token) = app.begin_drip().expect("submission should be armed");
    assert_eq!(app.drip_phase(), DripPhase::Requesting);

    // The request the spawner sends, exactly as the backend expects it.
    let body = DripRequest {
        token_address: token.address.clone(),
        to: to.clone(),
        token_type: token.token_type.clone(),
        magnification: 1,
        ip: "203.0.113.7".into(),
    };
    assert_eq!(
        serde_json::to_value(&body).unwrap(),
        serde_json::json!({
            "token_address": "0xAAA0000000000000000000000000000000000001",
            "to": "0x1111111111111111111111111111111111111111",
            "token_type": "erc20",
            "magnification": 1,
            "ip": "203.0.113.7",
        })
    );

    // Backend answers; the result store gets every field of this response.
    app.on_event(AppEvent::DripFinished(DripOutcome {
        tx_hash: Some("0xHASH".into()),
        amount: Some("1000000".into()),
        next_access: None,
        magnification: 1,
        error: None,
    }));

    assert_eq!(app.drip_phase(), DripPhase::Success);
    assert!(app.modals.is_open(ModalName::DripResult));
    assert_eq!(app.drip.tx_hash.as_deref(), Some("0xHASH"));
    assert_eq!(app.drip.amount.as_deref(), Some("1000000"));
    assert_eq!(app.drip.magnification, 1);
    assert_eq!(app.drip.drip_token.as_ref().unwrap().symbol, "USDC");
}

#[test]
fn malformed_address_never_arms_a_request() {
    let mut app = app_with_catalog();
    app.toggle_dropdown();
    app.dropdown_select_current();

    type_address(&mut app, "not-an-address");
    assert!(!app.submit_enabled());
    assert_eq!(app.submit_label(), "Invalid Address");
    assert!(app.begin_drip().is_none());
    assert_eq!(app.drip_phase(), DripPhase::Idle);
}

#[test]
fn a_second_response_replaces_all_result_fields() {
    let mut app = app_with_catalog();
    app.toggle_dropdown();
    app.dropdown_select_current();
    type_address(&mut app, "0x1111111111111111111111111111111111111111");

    app.begin_drip().unwrap();
    app.on_event(AppEvent::DripFinished(DripOutcome {
        tx_hash: Some("0xHASH".into()),
        amount: Some("1000000".into()),
        next_access: None,
        magnification: 1,
        error: None,
    }));
    app.dismiss_drip_modal();
    assert_eq!(app.drip_phase(), DripPhase::Idle);

    // Rate-limited follow-up: nothing of the earlier success lingers.
    app.begin_drip().unwrap();
    app.on_event(AppEvent::DripFinished(DripOutcome {
        tx_hash: None,
        amount: None,
        next_access: Some("2026-08-08T12:00:00Z".into()),
        magnification: 1,
        error: Some("come back later".into()),
    }));

    assert_eq!(app.drip_phase(), DripPhase::Error);
    assert_eq!(app.drip.tx_hash, None);
    assert_eq!(app.drip.amount, None);
    assert_eq!(app.drip.next_access.as_deref(), Some("2026-08-08T12:00:00Z"));
    assert!(app.modals.is_open(ModalName::DripResult));
}

#[test]
fn catalog_failure_leaves_previous_tokens_in_place() {
    let mut app = app_with_catalog();
    assert_eq!(app.catalog.len(), 1);
    // A failed poll sends no event at all, so the catalog simply stays.
    assert_eq!(app.catalog.tokens()[0].symbol, "USDC");
}
