//! Protocol codec
//!
//! Encoding and decoding functions for the line protocol.
//!
//! ## Parsing Rules
//! - The line is trimmed, then split on single spaces into at most 3 parts
//! - The verb is case-insensitive
//! - WRITE content is everything after the second space, spaces included
//!
//! Parse failures come back as `FsError::Protocol` whose text is the reply
//! message, so the connection can answer and keep going.

use std::io::{self, BufRead, Read, Write};

use crate::error::{FsError, Result};

use super::{Command, CommandType, Response, Status};

/// Longest accepted line, terminator excluded (64 KB)
pub const MAX_LINE_LEN: usize = 64 * 1024;

// =============================================================================
// Command Encoding/Decoding
// =============================================================================

/// Encode a command as a single line (no terminator)
pub fn encode_command(command: &Command) -> String {
    let verb = command.command_type().as_str();
    match command {
        Command::Create { name } | Command::Read { name } | Command::Delete { name } => {
            format!("{} {}", verb, name)
        }
        Command::Write { name, content } => format!("{} {} {}", verb, name, content),
        Command::List | Command::Quit => verb.to_string(),
    }
}

/// Decode a command line
pub fn decode_command(line: &str) -> Result<Command> {
    let line = line.trim();
    if line.is_empty() {
        return Err(FsError::Protocol("empty command".to_string()));
    }

    let parts: Vec<&str> = line.splitn(3, ' ').collect();
    let command_type = CommandType::parse(parts[0])
        .ok_or_else(|| FsError::Protocol("Unknown command.".to_string()))?;

    let name = || {
        parts
            .get(1)
            .map(|name| name.to_string())
            .ok_or_else(|| FsError::Protocol("missing filename".to_string()))
    };

    match command_type {
        CommandType::Create => Ok(Command::Create { name: name()? }),
        CommandType::Read => Ok(Command::Read { name: name()? }),
        CommandType::Delete => Ok(Command::Delete { name: name()? }),
        CommandType::Write => {
            if parts.len() < 3 {
                return Err(FsError::Protocol("missing content".to_string()));
            }
            Ok(Command::Write {
                name: parts[1].to_string(),
                content: parts[2].to_string(),
            })
        }
        CommandType::List => Ok(Command::List),
        CommandType::Quit => Ok(Command::Quit),
    }
}

// =============================================================================
// Response Encoding/Decoding
// =============================================================================

/// Encode a response as a single line (no terminator)
pub fn encode_response(response: &Response) -> String {
    format!("{} {}", response.status.prefix(), response.message)
}

/// Decode a response line
pub fn decode_response(line: &str) -> Result<Response> {
    let line = line.trim_end_matches(['\r', '\n']);

    for status in [Status::Success, Status::Error] {
        if let Some(rest) = line.strip_prefix(status.prefix()) {
            let message = rest.strip_prefix(' ').unwrap_or(rest);
            return Ok(Response {
                status,
                message: message.to_string(),
            });
        }
    }

    Err(FsError::Protocol(format!("Malformed response: {:?}", line)))
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one line, without its terminator
///
/// EOF before any byte is reported as `UnexpectedEof`; a line longer than
/// `MAX_LINE_LEN` as `InvalidData`. Invalid UTF-8 is replaced, not rejected.
fn read_line<R: BufRead>(reader: &mut R) -> Result<String> {
    let mut buf = Vec::new();
    let read = reader
        .by_ref()
        .take(MAX_LINE_LEN as u64 + 2)
        .read_until(b'\n', &mut buf)?;

    if read == 0 {
        return Err(FsError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed",
        )));
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }

    if buf.len() > MAX_LINE_LEN {
        return Err(FsError::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("line exceeds {} bytes", MAX_LINE_LEN),
        )));
    }

    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Read a complete command from a stream
///
/// Blocks until a full line is received or an error occurs
pub fn read_command<R: BufRead>(reader: &mut R) -> Result<Command> {
    let line = read_line(reader)?;
    decode_command(&line)
}

/// Write a command to a stream
pub fn write_command<W: Write>(writer: &mut W, command: &Command) -> Result<()> {
    writer.write_all(encode_command(command).as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read a complete response from a stream
pub fn read_response<R: BufRead>(reader: &mut R) -> Result<Response> {
    let line = read_line(reader)?;
    decode_response(&line)
}

/// Write a response to a stream
pub fn write_response<W: Write>(writer: &mut W, response: &Response) -> Result<()> {
    writer.write_all(encode_response(response).as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}
