//! Session scripts: a comma-separated list of steps.
//!
//! ```text
//! audio.on,boot,connect,wait:1000,share:on,wait:1000,leave
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use framelink_bridge::Command;

pub const DEFAULT_SCRIPT: &str =
    "audio.on,audio.on,boot,connect,wait:1000,click:videoBtn,screen.start,wait:1000,screen.stop,wait:1000,leave";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("unknown step: {0}")]
    Unknown(String),
    #[error("invalid wait `{0}`: expected milliseconds")]
    InvalidWait(String),
    #[error("invalid share state `{0}`: expected on or off")]
    InvalidShare(String),
    #[error("step `{0}` needs an argument")]
    MissingArgument(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Host sends a command, e.g. `audio.on` or `send:custom.name`.
    Send(String),
    /// Start the client inside the frame.
    Boot,
    /// The room client finishes connecting.
    Connect,
    /// The room client's screen share changes outside the toolbar.
    Share(bool),
    /// A user click on a client element.
    Click(String),
    /// Advance the virtual clock.
    Wait(Duration),
    /// Host tears down the frame.
    Destroy,
    /// The client bridge shuts down.
    Shutdown,
}

fn argument<'a>(step: &str, arg: Option<&'a str>) -> Result<&'a str, ScriptError> {
    arg.filter(|a| !a.is_empty())
        .ok_or_else(|| ScriptError::MissingArgument(step.to_string()))
}

impl FromStr for Step {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (verb, arg) = match s.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (s, None),
        };
        match verb {
            "boot" => Ok(Step::Boot),
            "connect" => Ok(Step::Connect),
            "destroy" => Ok(Step::Destroy),
            "shutdown" => Ok(Step::Shutdown),
            "send" => Ok(Step::Send(argument(verb, arg)?.to_string())),
            "click" => Ok(Step::Click(argument(verb, arg)?.to_string())),
            "wait" => {
                let ms = argument(verb, arg)?;
                ms.parse::<u64>()
                    .map(|ms| Step::Wait(Duration::from_millis(ms)))
                    .map_err(|_| ScriptError::InvalidWait(ms.to_string()))
            }
            "share" => match argument(verb, arg)? {
                "on" => Ok(Step::Share(true)),
                "off" => Ok(Step::Share(false)),
                other => Err(ScriptError::InvalidShare(other.to_string())),
            },
            name if arg.is_none() && Command::parse(name).is_some() => {
                Ok(Step::Send(name.to_string()))
            }
            _ => Err(ScriptError::Unknown(s.to_string())),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Send(name) => write!(f, "send:{name}"),
            Step::Boot => f.write_str("boot"),
            Step::Connect => f.write_str("connect"),
            Step::Share(true) => f.write_str("share:on"),
            Step::Share(false) => f.write_str("share:off"),
            Step::Click(id) => write!(f, "click:{id}"),
            Step::Wait(d) => write!(f, "wait:{}", d.as_millis()),
            Step::Destroy => f.write_str("destroy"),
            Step::Shutdown => f.write_str("shutdown"),
        }
    }
}

/// Parse a whole script. Blank entries are skipped.
pub fn parse_script(script: &str) -> Result<Vec<Step>, ScriptError> {
    script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_script_parses() {
        let steps = parse_script(DEFAULT_SCRIPT).unwrap();
        assert_eq!(steps[0], Step::Send("audio.on".into()));
        assert_eq!(steps[2], Step::Boot);
        assert_eq!(steps.last(), Some(&Step::Send("leave".into())));
    }

    #[test]
    fn command_names_are_sends() {
        assert_eq!(
            "screen.toggle".parse::<Step>(),
            Ok(Step::Send("screen.toggle".into()))
        );
        assert_eq!(
            "send:custom.thing".parse::<Step>(),
            Ok(Step::Send("custom.thing".into()))
        );
    }

    #[test]
    fn steps_with_arguments() {
        assert_eq!(
            "wait:250".parse::<Step>(),
            Ok(Step::Wait(Duration::from_millis(250)))
        );
        assert_eq!("share:off".parse::<Step>(), Ok(Step::Share(false)));
        assert_eq!(
            "click:audioBtn".parse::<Step>(),
            Ok(Step::Click("audioBtn".into()))
        );
    }

    #[test]
    fn bad_steps() {
        assert_eq!(
            "dance".parse::<Step>(),
            Err(ScriptError::Unknown("dance".into()))
        );
        assert_eq!(
            "wait:soon".parse::<Step>(),
            Err(ScriptError::InvalidWait("soon".into()))
        );
        assert_eq!(
            "share:maybe".parse::<Step>(),
            Err(ScriptError::InvalidShare("maybe".into()))
        );
        assert_eq!(
            "click:".parse::<Step>(),
            Err(ScriptError::MissingArgument("click".into()))
        );
        assert!(parse_script("boot,,  leave ,").is_ok());
        assert!(parse_script("boot,nope").is_err());
    }

    #[test]
    fn display_parses_back() {
        for step in parse_script("boot,connect,share:on,click:x,wait:5,destroy,shutdown,leave")
            .unwrap()
        {
            assert_eq!(step.to_string().parse::<Step>(), Ok(step));
        }
    }
}
