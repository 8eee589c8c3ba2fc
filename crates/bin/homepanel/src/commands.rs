//! Terminal commands and how they drive the dashboard's view tree.

use std::str::FromStr;

use homepanel_app::components::{TEMPERATURE_CLASS, TOGGLE_CLASS};
use homepanel_app::dashboard::Dashboard;
use homepanel_app::view::{Element, Pending};
use homepanel_domain::component::ComponentKind;

pub const HELP: &str = "\
commands:
  set <name> <value>   change a heating setpoint
  toggle <name>        flip a lighting switch
  show                 print the panel
  help                 print this message
  quit                 exit";

/// One line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Set { name: String, value: String },
    Toggle { name: String },
    Show,
    Help,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),

    #[error("`{command}` expects {usage}")]
    Usage {
        command: &'static str,
        usage: &'static str,
    },

    #[error("no component named {0:?}")]
    UnknownComponent(String),

    #[error("{name} is a {kind} component")]
    WrongKind { name: String, kind: ComponentKind },

    #[error("{0} is not on the panel yet")]
    NotRendered(String),

    #[error("{name} rejected {value:?}")]
    Rejected { name: String, value: String },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            ["set", name, value] => Ok(Self::Set {
                name: (*name).to_string(),
                value: (*value).to_string(),
            }),
            ["set", ..] => Err(CommandError::Usage {
                command: "set",
                usage: "<name> <value>",
            }),
            ["toggle", name] => Ok(Self::Toggle {
                name: (*name).to_string(),
            }),
            ["toggle", ..] => Err(CommandError::Usage {
                command: "toggle",
                usage: "<name>",
            }),
            ["show"] => Ok(Self::Show),
            ["help" | "?"] => Ok(Self::Help),
            ["quit" | "exit"] => Ok(Self::Quit),
            _ => Err(CommandError::Unknown(line.trim().to_string())),
        }
    }
}

/// What the caller should do once a command has run.
#[derive(Debug)]
pub enum Outcome {
    /// A write was started.
    Started(Pending),
    Show,
    Help,
    Quit,
}

impl Command {
    /// Run the command against the panel, the way a user would: by firing
    /// the rendered control's handler.
    ///
    /// # Errors
    ///
    /// Returns an error if the target component is unknown, of the wrong
    /// kind, not rendered, or rejects the value.
    pub fn execute(self, dashboard: &Dashboard) -> Result<Outcome, CommandError> {
        match self {
            Self::Set { name, value } => {
                let input = control(dashboard, &name, ComponentKind::Heating, TEMPERATURE_CLASS)?;
                input
                    .dispatch_change(&value)
                    .map(Outcome::Started)
                    .ok_or(CommandError::Rejected { name, value })
            }
            Self::Toggle { name } => {
                let button = control(dashboard, &name, ComponentKind::Lighting, TOGGLE_CLASS)?;
                button
                    .dispatch_click()
                    .map(Outcome::Started)
                    .ok_or(CommandError::NotRendered(name))
            }
            Self::Show => Ok(Outcome::Show),
            Self::Help => Ok(Outcome::Help),
            Self::Quit => Ok(Outcome::Quit),
        }
    }
}

fn control(
    dashboard: &Dashboard,
    name: &str,
    expected: ComponentKind,
    class: &str,
) -> Result<Element, CommandError> {
    let component = dashboard
        .component(name)
        .ok_or_else(|| CommandError::UnknownComponent(name.to_string()))?;
    let kind = component.kind();
    if kind != expected {
        return Err(CommandError::WrongKind {
            name: name.to_string(),
            kind,
        });
    }
    dashboard
        .fragment(name)
        .and_then(|fragment| fragment.find_by_class(class))
        .ok_or_else(|| CommandError::NotRendered(name.to_string()))
}
