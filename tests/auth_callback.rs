use spigot::auth_callback::parse_auth_code;

#[test]
fn full_redirect_url_yields_code() {
    assert_eq!(
        parse_auth_code("https://faucet.example.org/?code=gho_abc&state=s1"),
        Some("gho_abc".to_string())
    );
}

#[test]
fn bare_code_passes_through() {
    assert_eq!(parse_auth_code("gho_abc"), Some("gho_abc".to_string()));
}

#[test]
fn redirect_without_code_is_rejected() {
    assert_eq!(parse_auth_code("https://faucet.example.org/?error=access_denied"), None);
    assert_eq!(parse_auth_code(""), None);
}

#[test]
fn exchange_clears_the_pending_code() {
    use spigot::config::Endpoints;
    use spigot::theme::Theme;
    use spigot::types::AppEvent;

    let mut app = spigot::App::new(
        Theme::default(),
        Endpoints::new("https://faucet.example.org", "https://x.example/tx/"),
        "gh-abc".into(),
    );
    app.start_login();
    for c in "https://faucet.example.org/?code=gho_abc".chars() {
        app.login_push(c);
    }
    assert_eq!(app.commit_login().as_deref(), Some("gho_abc"));
    assert_eq!(app.session.pending_code(), Some("gho_abc"));

    // The exchange task reporting back retires the code for good.
    app.on_event(AppEvent::SessionEstablished);
    assert_eq!(app.session.pending_code(), None);
}
