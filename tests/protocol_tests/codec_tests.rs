//! Codec Tests
//!
//! Tests for command parsing and response formatting.

use std::io::{BufReader, Cursor};

use blockfs::protocol::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, Command, CommandType, Response, Status,
    MAX_LINE_LEN,
};
use blockfs::FsError;

fn protocol_error(line: &str) -> String {
    match decode_command(line) {
        Err(FsError::Protocol(message)) => message,
        other => panic!("expected protocol error for {:?}, got {:?}", line, other),
    }
}

// =============================================================================
// Command Decoding Tests
// =============================================================================

#[test]
fn test_decode_create() {
    assert_eq!(
        decode_command("CREATE notes").unwrap(),
        Command::Create { name: "notes".into() }
    );
}

#[test]
fn test_decode_write_keeps_spaces_in_content() {
    assert_eq!(
        decode_command("WRITE notes hello  big world").unwrap(),
        Command::Write {
            name: "notes".into(),
            content: "hello  big world".into(),
        }
    );
}

#[test]
fn test_decode_read_delete_list_quit() {
    assert_eq!(
        decode_command("READ a").unwrap(),
        Command::Read { name: "a".into() }
    );
    assert_eq!(
        decode_command("DELETE a").unwrap(),
        Command::Delete { name: "a".into() }
    );
    assert_eq!(decode_command("LIST").unwrap(), Command::List);
    assert_eq!(decode_command("QUIT").unwrap(), Command::Quit);
}

#[test]
fn test_decode_verb_case_insensitive() {
    assert_eq!(
        decode_command("create a").unwrap(),
        Command::Create { name: "a".into() }
    );
    assert_eq!(decode_command("LiSt").unwrap(), Command::List);
}

#[test]
fn test_decode_trims_line() {
    assert_eq!(
        decode_command("  READ a \r\n").unwrap(),
        Command::Read { name: "a".into() }
    );
}

#[test]
fn test_decode_errors() {
    assert_eq!(protocol_error(""), "empty command");
    assert_eq!(protocol_error("   "), "empty command");
    assert_eq!(protocol_error("FORMAT disk"), "Unknown command.");
    assert_eq!(protocol_error("CREATE"), "missing filename");
    assert_eq!(protocol_error("READ "), "missing filename");
    assert_eq!(protocol_error("DELETE"), "missing filename");
    assert_eq!(protocol_error("WRITE a"), "missing content");
    assert_eq!(protocol_error("WRITE"), "missing content");
}

#[test]
fn test_decode_double_space_gives_empty_name() {
    // The engine then rejects the empty name
    assert_eq!(
        decode_command("CREATE  a").unwrap(),
        Command::Create { name: "".into() }
    );
}

#[test]
fn test_command_type() {
    assert_eq!(Command::List.command_type(), CommandType::List);
    assert_eq!(CommandType::parse("write"), Some(CommandType::Write));
    assert_eq!(CommandType::parse("nope"), None);
    assert_eq!(CommandType::Delete.as_str(), "DELETE");
}

// =============================================================================
// Command Encoding Tests
// =============================================================================

#[test]
fn test_encode_command() {
    assert_eq!(
        encode_command(&Command::Write {
            name: "a".into(),
            content: "x y".into(),
        }),
        "WRITE a x y"
    );
    assert_eq!(encode_command(&Command::Create { name: "a".into() }), "CREATE a");
    assert_eq!(encode_command(&Command::Quit), "QUIT");
}

#[test]
fn test_encoded_command_parses_back() {
    let commands = vec![
        Command::Create { name: "f".into() },
        Command::Write {
            name: "f".into(),
            content: "some words here".into(),
        },
        Command::Read { name: "f".into() },
        Command::Delete { name: "f".into() },
        Command::List,
        Command::Quit,
    ];

    for command in commands {
        assert_eq!(decode_command(&encode_command(&command)).unwrap(), command);
    }
}

// =============================================================================
// Response Tests
// =============================================================================

#[test]
fn test_encode_response() {
    assert_eq!(
        encode_response(&Response::success("File 'a' created.")),
        "SUCCESS: File 'a' created."
    );
    assert_eq!(
        encode_response(&Response::error("Unknown command.")),
        "ERROR: Unknown command."
    );
    // Empty LIST keeps the space after the prefix
    assert_eq!(encode_response(&Response::success("")), "SUCCESS: ");
}

#[test]
fn test_decode_response() {
    let response = decode_response("SUCCESS: a b c\n").unwrap();
    assert_eq!(response.status, Status::Success);
    assert_eq!(response.message, "a b c");

    let response = decode_response("ERROR: file x does not exist").unwrap();
    assert_eq!(response.status, Status::Error);
    assert_eq!(response.message, "file x does not exist");

    let response = decode_response("SUCCESS: ").unwrap();
    assert!(response.is_success());
    assert_eq!(response.message, "");
}

#[test]
fn test_decode_response_malformed() {
    assert!(matches!(decode_response("OK fine"), Err(FsError::Protocol(_))));
}

// =============================================================================
// Stream Tests
// =============================================================================

#[test]
fn test_stream_commands() {
    let mut buf = Vec::new();
    write_command(&mut buf, &Command::Create { name: "a".into() }).unwrap();
    write_command(&mut buf, &Command::List).unwrap();
    assert_eq!(buf, b"CREATE a\nLIST\n");

    let mut reader = BufReader::new(Cursor::new(buf));
    assert_eq!(
        read_command(&mut reader).unwrap(),
        Command::Create { name: "a".into() }
    );
    assert_eq!(read_command(&mut reader).unwrap(), Command::List);

    match read_command(&mut reader) {
        Err(FsError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
        other => panic!("expected EOF, got {:?}", other),
    }
}

#[test]
fn test_stream_crlf_and_last_line_without_newline() {
    let mut reader = BufReader::new(Cursor::new(b"READ a\r\nLIST".to_vec()));

    assert_eq!(
        read_command(&mut reader).unwrap(),
        Command::Read { name: "a".into() }
    );
    assert_eq!(read_command(&mut reader).unwrap(), Command::List);
}

#[test]
fn test_stream_bad_line_does_not_poison_next() {
    let mut reader = BufReader::new(Cursor::new(b"BOGUS\nLIST\n".to_vec()));

    assert!(matches!(read_command(&mut reader), Err(FsError::Protocol(_))));
    assert_eq!(read_command(&mut reader).unwrap(), Command::List);
}

#[test]
fn test_stream_rejects_overlong_line() {
    let mut line = format!("WRITE a {}", "x".repeat(MAX_LINE_LEN));
    line.push('\n');
    let mut reader = BufReader::new(Cursor::new(line.into_bytes()));

    match read_command(&mut reader) {
        Err(FsError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::InvalidData),
        other => panic!("expected InvalidData, got {:?}", other),
    }
}

#[test]
fn test_stream_responses() {
    let mut buf = Vec::new();
    write_response(&mut buf, &Response::success("hello")).unwrap();
    write_response(&mut buf, &Response::error("nope")).unwrap();

    let mut reader = BufReader::new(Cursor::new(buf));
    assert_eq!(read_response(&mut reader).unwrap(), Response::success("hello"));
    assert_eq!(read_response(&mut reader).unwrap(), Response::error("nope"));
}
