use std::str::FromStr;

use mineboard_core::{Coord, Coord2};
use thiserror::Error;

/// One line of player input.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Press and release at once.
    Open(Coord2),
    Press(Coord2),
    Release,
    Flag(Coord2),
    Restart,
    Dump,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Unknown command {0:?}, expected one of o, p, l, f, r, u, q")]
    Unknown(String),
    #[error("Command {0:?} takes a row and a column")]
    MissingCoords(String),
    #[error("Invalid coordinate {0:?}")]
    InvalidCoord(String),
    #[error("Unexpected trailing input {0:?}")]
    TrailingInput(String),
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();

        let command = match name {
            "o" | "open" => Command::Open(parse_coords(name, &mut words)?),
            "p" | "press" => Command::Press(parse_coords(name, &mut words)?),
            "f" | "flag" => Command::Flag(parse_coords(name, &mut words)?),
            "l" | "release" => Command::Release,
            "r" | "restart" => Command::Restart,
            "u" | "dump" => Command::Dump,
            "q" | "quit" => Command::Quit,
            _ => return Err(ParseCommandError::Unknown(name.to_string())),
        };

        match words.next() {
            Some(extra) => Err(ParseCommandError::TrailingInput(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn parse_coords<'a>(
    name: &str,
    words: &mut impl Iterator<Item = &'a str>,
) -> Result<Coord2, ParseCommandError> {
    let mut next = || {
        let word = words
            .next()
            .ok_or_else(|| ParseCommandError::MissingCoords(name.to_string()))?;
        word.parse::<Coord>()
            .map_err(|_| ParseCommandError::InvalidCoord(word.to_string()))
    };
    let row = next()?;
    let col = next()?;
    Ok((row, col))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_coordinate_commands() {
        assert_eq!("o 3 4".parse::<Command>(), Ok(Command::Open((3, 4))));
        assert_eq!("press 0 12".parse::<Command>(), Ok(Command::Press((0, 12))));
        assert_eq!("  f  7 1 ".parse::<Command>(), Ok(Command::Flag((7, 1))));
    }

    #[test]
    fn parses_bare_commands() {
        assert_eq!("l".parse::<Command>(), Ok(Command::Release));
        assert_eq!("r".parse::<Command>(), Ok(Command::Restart));
        assert_eq!("u".parse::<Command>(), Ok(Command::Dump));
        assert_eq!("quit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            "x".parse::<Command>(),
            Err(ParseCommandError::Unknown("x".into()))
        );
        assert_eq!(
            "o 1".parse::<Command>(),
            Err(ParseCommandError::MissingCoords("o".into()))
        );
        assert_eq!(
            "f 1 -2".parse::<Command>(),
            Err(ParseCommandError::InvalidCoord("-2".into()))
        );
        assert_eq!(
            "o 300 1".parse::<Command>(),
            Err(ParseCommandError::InvalidCoord("300".into()))
        );
        assert_eq!(
            "q now".parse::<Command>(),
            Err(ParseCommandError::TrailingInput("now".into()))
        );
    }
}
