//! BlockFS CLI Client
//!
//! Command-line interface for interacting with a BlockFS server.

use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::net::TcpStream;
use std::process::ExitCode;

use blockfs::protocol::{decode_command, read_response, write_command, Command, Response};
use clap::{Parser, Subcommand};

/// BlockFS CLI
#[derive(Parser, Debug)]
#[command(name = "blockfs-cli")]
#[command(about = "CLI for the BlockFS file store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:12345")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an empty file
    Create {
        /// File name
        name: String,
    },

    /// Replace a file's contents
    Write {
        /// File name
        name: String,

        /// Content words, joined by single spaces
        #[arg(required = true, num_args = 1..)]
        content: Vec<String>,
    },

    /// Print a file's contents
    Read {
        /// File name
        name: String,
    },

    /// Delete a file
    Delete {
        /// File name
        name: String,
    },

    /// List all files
    List,

    /// Send raw protocol lines from stdin, printing each reply
    Shell,
}

struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    fn connect(addr: &str) -> blockfs::Result<Self> {
        let stream = TcpStream::connect(addr)?;
        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
        })
    }

    fn send(&mut self, command: &Command) -> blockfs::Result<Response> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut client = match Client::connect(&args.server) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Could not connect to {}: {}", args.server, e);
            return ExitCode::FAILURE;
        }
    };

    let command = match args.command {
        Commands::Create { name } => Command::Create { name },
        Commands::Write { name, content } => Command::Write {
            name,
            content: content.join(" "),
        },
        Commands::Read { name } => Command::Read { name },
        Commands::Delete { name } => Command::Delete { name },
        Commands::List => Command::List,
        Commands::Shell => return run_shell(&mut client),
    };

    match client.send(&command) {
        Ok(response) => {
            println!("{}", blockfs::protocol::encode_response(&response));
            let _ = client.send(&Command::Quit);
            if response.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Request failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Forward stdin lines until EOF or QUIT
fn run_shell(client: &mut Client) -> ExitCode {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("stdin: {}", e);
                return ExitCode::FAILURE;
            }
        };

        // Malformed lines are still sent; the server owns the error text
        let quit = matches!(decode_command(&line), Ok(Command::Quit));
        let reply = writeln!(client.writer, "{}", line)
            .and_then(|_| client.writer.flush())
            .map_err(blockfs::FsError::from)
            .and_then(|_| read_response(&mut client.reader));

        match reply {
            Ok(response) => println!("{}", blockfs::protocol::encode_response(&response)),
            Err(e) => {
                eprintln!("Connection lost: {}", e);
                return ExitCode::FAILURE;
            }
        }

        if quit {
            break;
        }
    }
    ExitCode::SUCCESS
}
