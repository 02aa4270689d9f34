//! Protocol Module
//!
//! Defines the line-based text protocol between clients and the server.
//!
//! ## Request Format
//! One command per line, fields separated by a single space:
//! ```text
//! CREATE <name>
//! WRITE  <name> <content, rest of line>
//! READ   <name>
//! DELETE <name>
//! LIST
//! QUIT
//! ```
//!
//! ## Response Format
//! Exactly one line per command:
//! ```text
//! SUCCESS: <message>
//! ERROR: <message>
//! ```

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Response, Status};
pub use codec::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, MAX_LINE_LEN,
};
