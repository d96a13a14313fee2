use thiserror::Error;

use fleetpulse_core::error::FleetPulseError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    /// Quick-action button.
    Action(String),
    /// Alert card click.
    Alert,
    /// Maintenance item button.
    Maintenance(String),
    /// Driver status badge click.
    Driver(String),
    /// Search box submit.
    Search(String),
    /// Raw message straight to the sink.
    Post(String),
    Dismiss,
    Stats,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("{0} requires an argument")]
    MissingArgument(&'static str),
}

impl From<CommandError> for FleetPulseError {
    fn from(e: CommandError) -> Self {
        FleetPulseError::BadCommand(e.to_string())
    }
}

impl UiCommand {
    pub fn name(&self) -> &'static str {
        match self {
            UiCommand::Action(_) => "action",
            UiCommand::Alert => "alert",
            UiCommand::Maintenance(_) => "maintenance",
            UiCommand::Driver(_) => "driver",
            UiCommand::Search(_) => "search",
            UiCommand::Post(_) => "post",
            UiCommand::Dismiss => "dismiss",
            UiCommand::Stats => "stats",
            UiCommand::Quit => "quit",
        }
    }

    /// Toast text for interactions that produce one.
    pub fn notification_text(&self) -> Option<String> {
        match self {
            UiCommand::Action(name) => Some(format!("{name} clicked - Feature coming soon!")),
            UiCommand::Alert => Some("Alert details would open here".to_string()),
            UiCommand::Maintenance(action) => Some(format!("{action} action initiated")),
            UiCommand::Driver(name) => Some(format!("Driver {name} details would open here")),
            UiCommand::Search(term) => Some(format!("Searching for: {term}")),
            UiCommand::Post(msg) => Some(msg.clone()),
            UiCommand::Dismiss | UiCommand::Stats | UiCommand::Quit => None,
        }
    }
}

/// Parse one input line. Blank lines and blank searches yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<UiCommand>, CommandError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((v, r)) => (v, r.trim()),
        None => (line, ""),
    };

    let arg = |name: &'static str| {
        if rest.is_empty() {
            Err(CommandError::MissingArgument(name))
        } else {
            Ok(rest.to_string())
        }
    };

    let cmd = match verb.to_ascii_lowercase().as_str() {
        "action" => UiCommand::Action(arg("action")?),
        "alert" => UiCommand::Alert,
        "maintenance" => UiCommand::Maintenance(arg("maintenance")?),
        "driver" => UiCommand::Driver(arg("driver")?),
        "search" => {
            if rest.is_empty() {
                return Ok(None);
            }
            UiCommand::Search(rest.to_string())
        }
        "post" => UiCommand::Post(arg("post")?),
        "dismiss" => UiCommand::Dismiss,
        "stats" => UiCommand::Stats,
        "quit" | "exit" => UiCommand::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(cmd))
}
