use crate::MapError;
use std::{fmt, str::FromStr};

/// Commands the host UI sends to the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    DisplaySamples,
    HideSamples,
    DisplayCurrentLocation,
    HideCurrentLocation,
    DisplayPositionHistory,
    HidePositionHistory,
    DisplayKml,
    HideKml,
    PanToCurrentLocation,
    ChangeBaseMap,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::DisplaySamples,
        Command::HideSamples,
        Command::DisplayCurrentLocation,
        Command::HideCurrentLocation,
        Command::DisplayPositionHistory,
        Command::HidePositionHistory,
        Command::DisplayKml,
        Command::HideKml,
        Command::PanToCurrentLocation,
        Command::ChangeBaseMap,
    ];

    /// The wire name of the command
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::DisplaySamples => "DisplaySamples",
            Command::HideSamples => "HideSamples",
            Command::DisplayCurrentLocation => "DisplayCurrentLocation",
            Command::HideCurrentLocation => "HideCurrentLocation",
            Command::DisplayPositionHistory => "DisplayPositionHistory",
            Command::HidePositionHistory => "HidePositionHistory",
            Command::DisplayKml => "DisplayKML",
            Command::HideKml => "HideKML",
            Command::PanToCurrentLocation => "PanToCurrentLocation",
            Command::ChangeBaseMap => "ChangeBaseMap",
        }
    }
}

impl FromStr for Command {
    type Err = MapError;

    /// Names are matched exactly, case included
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::ALL
            .iter()
            .copied()
            .find(|command| command.as_str() == s)
            .ok_or_else(|| MapError::Bridge(format!("unknown command '{}'", s)))
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
    fn test_every_name_parses_back() {
        for command in Command::ALL {
            assert_eq!(command.as_str().parse::<Command>().unwrap(), command);
        }
    }

    #[test]
    fn test_kml_names_keep_upper_case() {
        assert_eq!("DisplayKML".parse::<Command>().unwrap(), Command::DisplayKml);
        assert!("DisplayKml".parse::<Command>().is_err());
    }

    #[test]
    fn test_unknown_command() {
        assert!(matches!("Explode".parse::<Command>(), Err(MapError::Bridge(_))));
        assert!("".parse::<Command>().is_err());
    }
}
