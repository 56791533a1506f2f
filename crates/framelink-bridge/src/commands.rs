//! Command vocabulary, host → child.

use std::fmt;

/// A command the embedded client understands. Names outside this set are
/// still transmitted by the host but ignored by the embed side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    AudioToggle,
    VideoToggle,
    ScreenToggle,
    AudioOn,
    AudioOff,
    VideoOn,
    VideoOff,
    ScreenStart,
    ScreenStop,
    Leave,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::AudioToggle,
        Command::VideoToggle,
        Command::ScreenToggle,
        Command::AudioOn,
        Command::AudioOff,
        Command::VideoOn,
        Command::VideoOff,
        Command::ScreenStart,
        Command::ScreenStop,
        Command::Leave,
    ];

    /// Wire name of the command.
    pub fn as_str(self) -> &'static str {
        match self {
            Command::AudioToggle => "audio.toggle",
            Command::VideoToggle => "video.toggle",
            Command::ScreenToggle => "screen.toggle",
            Command::AudioOn => "audio.on",
            Command::AudioOff => "audio.off",
            Command::VideoOn => "video.on",
            Command::VideoOff => "video.off",
            Command::ScreenStart => "screen.start",
            Command::ScreenStop => "screen.stop",
            Command::Leave => "leave",
        }
    }

    /// Look up a command by wire name. Case-sensitive.
    pub fn parse(name: &str) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.as_str() == name)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_parses_from_its_name() {
        for command in Command::ALL {
            assert_eq!(Command::parse(command.as_str()), Some(command));
        }
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = Command::ALL.iter().map(|c| c.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Command::ALL.len());
    }

    #[test]
    fn unknown_names_rejected() {
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("eval"), None);
        assert_eq!(Command::parse("AUDIO.TOGGLE"), None);
        assert_eq!(Command::parse("audio.toggle "), None);
    }

    #[test]
    fn display_matches_wire_name() {
        assert_eq!(Command::ScreenStart.to_string(), "screen.start");
        assert_eq!(Command::Leave.to_string(), "leave");
    }
}
