use super::*;

#[test]
fn plain_text_is_a_message() {
    assert_eq!(
        parse_command("  What are the fees?  "),
        Ok(Command::Send("What are the fees?".to_owned()))
    );
}

#[test]
fn blank_line_is_empty() {
    assert_eq!(parse_command("   "), Ok(Command::Empty));
}

#[test]
fn login_and_register_take_positional_args() {
    assert_eq!(
        parse_command("/login a@b.com secret1"),
        Ok(Command::Login { email: "a@b.com".to_owned(), password: "secret1".to_owned() })
    );
    assert_eq!(
        parse_command("/register a@b.com secret1 secret2"),
        Ok(Command::Register {
            email: "a@b.com".to_owned(),
            password: "secret1".to_owned(),
            confirm: "secret2".to_owned(),
        })
    );
}

#[test]
fn wrong_arity_reports_usage() {
    assert_eq!(
        parse_command("/login a@b.com"),
        Err(CommandError::Usage("/login <email> <password>"))
    );
    assert!(matches!(parse_command("/register a b"), Err(CommandError::Usage(_))));
    assert!(matches!(parse_command("/new now"), Err(CommandError::Usage(_))));
}

#[test]
fn open_requires_numeric_id() {
    assert_eq!(parse_command("/open 12"), Ok(Command::Open(12)));
    assert_eq!(
        parse_command("/open twelve"),
        Err(CommandError::InvalidSessionId("twelve".to_owned()))
    );
}

#[test]
fn simple_commands() {
    assert_eq!(parse_command("/new"), Ok(Command::NewSession));
    assert_eq!(parse_command("/sessions"), Ok(Command::Sessions));
    assert_eq!(parse_command("/logout"), Ok(Command::Logout));
    assert_eq!(parse_command("/mode"), Ok(Command::ToggleMode));
    assert_eq!(parse_command("/help"), Ok(Command::Help));
    assert_eq!(parse_command("/quit"), Ok(Command::Quit));
    assert_eq!(parse_command("/exit"), Ok(Command::Quit));
}

#[test]
fn unknown_command_is_reported() {
    assert_eq!(parse_command("/dance"), Err(CommandError::Unknown("dance".to_owned())));
}
