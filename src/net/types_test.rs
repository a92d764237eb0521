use super::*;

// =============================================================
// Session labels
// =============================================================

fn session(id: i64, title: Option<&str>) -> Session {
    Session { id, title: title.map(str::to_owned), created_at: None }
}

#[test]
fn label_uses_title_when_meaningful() {
    assert_eq!(session(3, Some("Math Help")).label(), "Math Help");
}

#[test]
fn label_falls_back_for_placeholder_title() {
    assert_eq!(session(7, Some("New Chat")).label(), "Chat 7");
    assert_eq!(session(7, Some("NEW CHAT")).label(), "Chat 7");
    assert_eq!(session(7, Some("  new chat ")).label(), "Chat 7");
}

#[test]
fn label_falls_back_for_missing_or_blank_title() {
    assert_eq!(session(1, None).label(), "Chat 1");
    assert_eq!(session(2, Some("")).label(), "Chat 2");
    assert_eq!(session(4, Some("   ")).label(), "Chat 4");
}

#[test]
fn label_trims_real_titles() {
    assert_eq!(session(5, Some("  Fees  ")).label(), "Fees");
}

// =============================================================
// Deserialization
// =============================================================

#[test]
fn session_deserializes_null_title_and_extra_fields() {
    let json = r#"{"id": 12, "title": null, "user_id": 4, "created_at": "2024-05-01T09:30:00"}"#;
    let s: Session = serde_json::from_str(json).unwrap();
    assert_eq!(s.id, 12);
    assert!(s.title.is_none());
    assert_eq!(s.created_at.as_deref(), Some("2024-05-01T09:30:00"));
}

#[test]
fn message_deserializes_lowercase_roles() {
    let json = r#"[
        {"id": 1, "role": "user", "content": "hi", "session_id": 2, "created_at": null},
        {"id": 2, "role": "assistant", "content": "hello"}
    ]"#;
    let msgs: Vec<Message> = serde_json::from_str(json).unwrap();
    assert_eq!(msgs[0].role, Role::User);
    assert_eq!(msgs[1].role, Role::Assistant);
    assert!(msgs[1].created_at.is_none());
}

#[test]
fn message_rejects_unknown_role() {
    let json = r#"{"id": 1, "role": "system", "content": "x"}"#;
    assert!(serde_json::from_str::<Message>(json).is_err());
}

#[test]
fn token_response_requires_access_token() {
    assert!(serde_json::from_str::<TokenResponse>(r#"{"token_type": "bearer"}"#).is_err());
    let ok: TokenResponse =
        serde_json::from_str(r#"{"access_token": "tok1", "token_type": "bearer"}"#).unwrap();
    assert_eq!(ok.access_token, "tok1");
}

#[test]
fn send_response_reply_detection() {
    let with: SendMessageResponse =
        serde_json::from_str(r#"{"response": "Term starts in May."}"#).unwrap();
    assert!(with.has_reply());

    let null: SendMessageResponse = serde_json::from_str(r#"{"response": null}"#).unwrap();
    assert!(!null.has_reply());

    let empty: SendMessageResponse = serde_json::from_str(r#"{"response": ""}"#).unwrap();
    assert!(!empty.has_reply());

    let missing: SendMessageResponse = serde_json::from_str("{}").unwrap();
    assert!(!missing.has_reply());
}

#[test]
fn login_form_uses_username_field() {
    let form = LoginForm { username: "a@b.com", password: "secret1" };
    let value = serde_json::to_value(&form).unwrap();
    assert_eq!(value["username"], "a@b.com");
    assert!(value.get("email").is_none());
}
