//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

//! The thin operator surface: `add`, `del`, `trace`, `quit`, one
//! command per line, whitespace-split. Startup files use the same grammar,
//! one command per line, `#` introduces a comment.

use std::net::Ipv4Addr;

use crate::error::CommandError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Ipv4Addr, u32),
    Del(Ipv4Addr),
    Trace(Ipv4Addr),
    Quit,
}

/// Parses one whitespace-split command line. Returns `Ok(None)` for blank
/// lines and comments, so callers can feed raw file/stdin lines straight in.
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["add", ip, weight] => {
            let ip = parse_ip(ip)?;
            let weight: u32 = weight.parse().map_err(|_| CommandError::InvalidWeight)?;
            if weight == 0 {
                return Err(CommandError::InvalidWeight);
            }
            Ok(Some(Command::Add(ip, weight)))
        }
        ["add", ..] => Err(CommandError::AddUsage),
        ["del", ip] => Ok(Some(Command::Del(parse_ip(ip)?))),
        ["del", ..] => Err(CommandError::DelUsage),
        ["trace", ip] => Ok(Some(Command::Trace(parse_ip(ip)?))),
        ["trace", ..] => Err(CommandError::TraceUsage),
        ["quit"] => Ok(Some(Command::Quit)),
        [other, ..] => Err(CommandError::Unknown(other.to_string())),
        [] => Ok(None),
    }
}

fn parse_ip(raw: &str) -> Result<Ipv4Addr, CommandError> {
    raw.parse()
        .map_err(|_| CommandError::InvalidAddress(raw.to_string()))
}

/// Reads a startup file: one command per line, `#` comments. Lines
/// that fail to parse are reported and skipped, the way a bad interactive
/// command would be; an unreadable file is a configuration error.
pub fn read_startup_file(path: &str) -> Result<Vec<Command>, std::io::Error> {
    let contents = std::fs::read_to_string(path)?;
    let mut commands = Vec::new();
    for (lineno, line) in contents.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(cmd)) => commands.push(cmd),
            Ok(None) => {}
            Err(error) => {
                tracing::error!(file = %path, line = lineno + 1, %error, "bad startup command");
            }
        }
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(o: u8) -> Ipv4Addr {
        Ipv4Addr::new(127, 0, 1, o)
    }

    #[test]
    fn parses_add() {
        assert_eq!(
            parse_line("add 127.0.1.2 5").unwrap(),
            Some(Command::Add(ip(2), 5))
        );
    }

    #[test]
    fn rejects_non_positive_weight() {
        assert_eq!(parse_line("add 127.0.1.2 0"), Err(CommandError::InvalidWeight));
        assert_eq!(
            parse_line("add 127.0.1.2 -1"),
            Err(CommandError::InvalidWeight)
        );
    }

    #[test]
    fn parses_del_and_trace_and_quit() {
        assert_eq!(parse_line("del 127.0.1.2").unwrap(), Some(Command::Del(ip(2))));
        assert_eq!(
            parse_line("trace 127.0.1.3").unwrap(),
            Some(Command::Trace(ip(3)))
        );
        assert_eq!(parse_line("quit").unwrap(), Some(Command::Quit));
    }

    #[test]
    fn blank_lines_and_comments_are_ignored() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# a comment").unwrap(), None);
    }

    #[test]
    fn unknown_command_reports_usage() {
        assert_eq!(
            parse_line("frobnicate 127.0.1.2"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }

    #[test]
    fn wrong_arity_reports_usage() {
        assert_eq!(parse_line("add 127.0.1.2"), Err(CommandError::AddUsage));
        assert_eq!(parse_line("del"), Err(CommandError::DelUsage));
    }

    #[test]
    fn startup_file_skips_comments_and_bad_lines() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("udprip-test-startup-{}.txt", std::process::id()));
        std::fs::write(&path, "# comment\nadd 127.0.1.2 5\n\nbogus line\ntrace 127.0.1.2\n").unwrap();

        let commands = read_startup_file(path.to_str().unwrap()).unwrap();
        assert_eq!(
            commands,
            vec![Command::Add(ip(2), 5), Command::Trace(ip(2))]
        );

        std::fs::remove_file(&path).unwrap();
    }
}
