//! Command parser for the : command system

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // Navigation commands
    Dashboard,
    Tile(String),
    Goto(String),
    Back,

    // Session commands
    Login,
    Logout,

    // Catalog commands
    Refresh,
    Search(Option<String>),
    Onboard,

    // App commands
    Help,
    Quit,

    // Unknown command
    Unknown(String),
}

/// Parse a command string (without the leading :)
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    let mut parts = input.splitn(2, ' ');
    let cmd = parts.next().unwrap_or("");
    let args = parts
        .next()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    match cmd.to_lowercase().as_str() {
        // Navigation
        "dashboard" | "dash" | "home" => Command::Dashboard,
        "tile" | "open" => {
            if let Some(id) = args {
                Command::Tile(id)
            } else {
                Command::Unknown(input.to_string())
            }
        }
        "goto" | "go" => {
            if let Some(path) = args {
                Command::Goto(path)
            } else {
                Command::Unknown(input.to_string())
            }
        }
        "back" => Command::Back,

        // Session
        "login" => Command::Login,
        "logout" => Command::Logout,

        // Catalog
        "refresh" | "refresh-static" => Command::Refresh,
        "search" | "filter" | "find" => Command::Search(args),
        "onboard" | "wizard" => Command::Onboard,

        "help" => Command::Help,
        "quit" | "q" => Command::Quit,

        _ => Command::Unknown(input.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation_commands() {
        assert_eq!(parse_command("dashboard"), Command::Dashboard);
        assert_eq!(parse_command("dash"), Command::Dashboard);
        assert_eq!(
            parse_command("tile apimediationlayer"),
            Command::Tile("apimediationlayer".to_string())
        );
        assert_eq!(
            parse_command("goto /tile/x"),
            Command::Goto("/tile/x".to_string())
        );
        assert_eq!(parse_command("back"), Command::Back);
    }

    #[test]
    fn test_parse_catalog_commands() {
        assert_eq!(parse_command("refresh"), Command::Refresh);
        assert_eq!(parse_command("search"), Command::Search(None));
        assert_eq!(parse_command("search   "), Command::Search(None));
        assert_eq!(
            parse_command("filter gateway api"),
            Command::Search(Some("gateway api".to_string()))
        );
        assert_eq!(parse_command("onboard"), Command::Onboard);
    }

    #[test]
    fn test_parse_session_commands() {
        assert_eq!(parse_command("login"), Command::Login);
        assert_eq!(parse_command("LOGOUT"), Command::Logout);
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse_command("tile"), Command::Unknown("tile".to_string()));
        assert_eq!(
            parse_command("notacommand"),
            Command::Unknown("notacommand".to_string())
        );
    }
}
