use cvfs::Descriptor;
use std::convert::TryFrom;
use thiserror::Error;

/// One line of shell input, parsed.
#[derive(Debug, PartialEq)]
pub enum Command {
    Exit,
    Ls,
    Help,
    Clear,
    Man(String),
    Unlink(String),
    Stat(String),
    Fstat(Descriptor),
    /// The data to write follows on the next input line.
    Write(Descriptor),
    Create { name: String, permission: u8 },
    Read { fd: Descriptor, size: usize },
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("command not found")]
    UnknownCommand,
    #[error("\"{0}\" is not a valid number")]
    InvalidNumber(String),
}

/// Parses a command line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, ParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let command = match words.as_slice() {
        [] => return Ok(None),
        ["exit"] => Command::Exit,
        ["ls"] => Command::Ls,
        ["help"] => Command::Help,
        ["clear"] => Command::Clear,
        ["man", name] => Command::Man(name.to_string()),
        ["unlink", name] => Command::Unlink(name.to_string()),
        ["stat", name] => Command::Stat(name.to_string()),
        ["fstat", fd] => Command::Fstat(number(fd)?),
        ["write", fd] => Command::Write(number(fd)?),
        ["creat", name, permission] => Command::Create {
            name: name.to_string(),
            // Out of range values are passed on as 0 for the file system to reject.
            permission: permission
                .parse::<i64>()
                .map(|p| u8::try_from(p).unwrap_or(0))
                .map_err(|_| ParseError::InvalidNumber(permission.to_string()))?,
        },
        ["read", fd, size] => Command::Read {
            fd: number(fd)?,
            size: number(size)?,
        },
        _ => return Err(ParseError::UnknownCommand),
    };
    Ok(Some(command))
}

fn number(word: &str) -> Result<usize, ParseError> {
    word.parse()
        .map_err(|_| ParseError::InvalidNumber(word.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_skipped() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("   \t"), Ok(None));
    }

    #[test]
    fn parses_single_word_commands() {
        assert_eq!(parse("ls"), Ok(Some(Command::Ls)));
        assert_eq!(parse("  exit \n"), Ok(Some(Command::Exit)));
        assert_eq!(parse("help"), Ok(Some(Command::Help)));
        assert_eq!(parse("clear"), Ok(Some(Command::Clear)));
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse("creat a.txt 3"),
            Ok(Some(Command::Create {
                name: "a.txt".to_string(),
                permission: 3
            }))
        );
        assert_eq!(
            parse("read 3 10"),
            Ok(Some(Command::Read { fd: 3, size: 10 }))
        );
        assert_eq!(parse("write 4"), Ok(Some(Command::Write(4))));
        assert_eq!(
            parse("unlink a.txt"),
            Ok(Some(Command::Unlink("a.txt".to_string())))
        );
        assert_eq!(parse("fstat 3"), Ok(Some(Command::Fstat(3))));
        assert_eq!(
            parse("man creat"),
            Ok(Some(Command::Man("creat".to_string())))
        );
    }

    #[test]
    fn out_of_range_permission_becomes_zero() {
        assert_eq!(
            parse("creat a -1"),
            Ok(Some(Command::Create {
                name: "a".to_string(),
                permission: 0
            }))
        );
        assert_eq!(
            parse("creat a 300"),
            Ok(Some(Command::Create {
                name: "a".to_string(),
                permission: 0
            }))
        );
    }

    #[test]
    fn rejects_unknown_commands_and_bad_numbers() {
        assert_eq!(parse("format"), Err(ParseError::UnknownCommand));
        assert_eq!(parse("ls -l"), Err(ParseError::UnknownCommand));
        assert_eq!(parse("creat a"), Err(ParseError::UnknownCommand));
        assert_eq!(
            parse("read x 5"),
            Err(ParseError::InvalidNumber("x".to_string()))
        );
        assert_eq!(
            parse("write -3"),
            Err(ParseError::InvalidNumber("-3".to_string()))
        );
        assert_eq!(
            parse("creat a rw"),
            Err(ParseError::InvalidNumber("rw".to_string()))
        );
    }
}
