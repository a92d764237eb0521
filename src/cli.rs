//! Line-oriented command parsing for the interactive terminal client.

#[cfg(test)]
#[path = "cli_test.rs"]
mod cli_test;

pub const HELP: &str = "\
Commands:
  /login <email> <password>                 sign in
  /register <email> <password> <confirm>    create an account and sign in
  /mode                                     switch between login and register
  /new                                      start a new session
  /sessions                                 list sessions
  /open <id>                                switch to a session
  /logout                                   sign out
  /help                                     show this help
  /quit                                     exit
Anything else is sent as a message.";

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, password: String },
    Register { email: String, password: String, confirm: String },
    ToggleMode,
    NewSession,
    Sessions,
    Open(i64),
    Logout,
    Help,
    Quit,
    Send(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("unknown command: /{0} (try /help)")]
    Unknown(String),
    #[error("invalid session id: {0}")]
    InvalidSessionId(String),
}

/// Parse one input line. Lines not starting with `/` are chat messages.
///
/// # Errors
///
/// Returns a [`CommandError`] for unknown commands or wrong arity.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Empty);
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Send(line.to_owned()));
    };
    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (name, args.as_slice()) {
        ("login", [email, password]) => {
            Ok(Command::Login { email: (*email).to_owned(), password: (*password).to_owned() })
        }
        ("login", _) => Err(CommandError::Usage("/login <email> <password>")),
        ("register", [email, password, confirm]) => Ok(Command::Register {
            email: (*email).to_owned(),
            password: (*password).to_owned(),
            confirm: (*confirm).to_owned(),
        }),
        ("register", _) => Err(CommandError::Usage("/register <email> <password> <confirm>")),
        ("open", [id]) => id
            .parse::<i64>()
            .map(Command::Open)
            .map_err(|_| CommandError::InvalidSessionId((*id).to_owned())),
        ("open", _) => Err(CommandError::Usage("/open <id>")),
        ("mode", []) => Ok(Command::ToggleMode),
        ("new", []) => Ok(Command::NewSession),
        ("sessions", []) => Ok(Command::Sessions),
        ("logout", []) => Ok(Command::Logout),
        ("help", _) => Ok(Command::Help),
        ("quit" | "exit", []) => Ok(Command::Quit),
        ("mode" | "new" | "sessions" | "logout" | "quit" | "exit", _) => {
            Err(CommandError::Usage("command takes no arguments"))
        }
        (other, _) => Err(CommandError::Unknown(other.to_owned())),
    }
}
