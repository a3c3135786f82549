//! kvmock - An In-Process Redis-Style Command Emulator
//!
//! Interactive shell over the emulator. Reads one command per line from
//! stdin and prints each reply the way `redis-cli` does.

use kvmock::{CommandHandler, EmulatorConfig, Engine, Registry};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Shell configuration
#[derive(Default)]
struct Config {
    /// Storage area the session starts in
    storage: String,
    /// Default SCAN page size
    scan_count: Option<usize>,
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--storage" | "-s" => {
                    if i + 1 < args.len() {
                        config.storage = args[i + 1].clone();
                        i += 2;
                    } else {
                        eprintln!("Error: --storage requires a value");
                        std::process::exit(1);
                    }
                }
                "--scan-count" | "-c" => {
                    if i + 1 < args.len() {
                        let count = args[i + 1].parse().unwrap_or_else(|_| {
                            eprintln!("Error: invalid scan count");
                            std::process::exit(1);
                        });
                        config.scan_count = Some(count);
                        i += 2;
                    } else {
                        eprintln!("Error: --scan-count requires a value");
                        std::process::exit(1);
                    }
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("kvmock version {}", kvmock::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }

    fn emulator_config(&self) -> EmulatorConfig {
        let config = EmulatorConfig::default().with_storage(self.storage.clone());
        match self.scan_count {
            Some(count) => config.with_scan_count(count),
            None => config,
        }
    }
}

fn print_help() {
    println!(
        r#"
kvmock - An In-Process Redis-Style Command Emulator

USAGE:
    kvmock [OPTIONS]

OPTIONS:
    -s, --storage <NAME>      Storage area to start in (default: "")
    -c, --scan-count <N>      Default SCAN/SSCAN page size (default: 10)
    -v, --version             Print version information
    -h, --help                Print this help message

EXAMPLES:
    $ kvmock
    kvmock> SET name "Ada"
    OK
    kvmock> ZADD board 10 ada
    (integer) 1
    kvmock> QUIT

    $ printf 'RPUSH q a b\nLRANGE q 0 -1\n' | kvmock

Set RUST_LOG=debug to see expiry, flush and buffering events.
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::from_args();

    // Set up logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let registry = Arc::new(Registry::new());
    let engine = Engine::with_config(registry, config.emulator_config());
    info!(storage = %engine.storage(), "kvmock {} ready", kvmock::VERSION);

    let mut handler = CommandHandler::new(engine);
    run_shell(&mut handler).await?;

    info!("Session closed");
    Ok(())
}

/// Reads commands until `QUIT` or end of input.
async fn run_shell(handler: &mut CommandHandler) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(prompt(handler).as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let output = match handler.execute_line(line) {
            Ok(reply) => reply.to_string(),
            Err(e) => format!("(error) {}", e),
        };
        stdout.write_all(output.as_bytes()).await?;
        stdout.write_all(b"\n").await?;

        if is_quit(line) {
            debug!("QUIT received");
            break;
        }
    }

    stdout.flush().await?;
    Ok(())
}

fn prompt(handler: &CommandHandler) -> String {
    match handler.engine().storage() {
        "" => "kvmock> ".to_string(),
        storage => format!("kvmock[{}]> ", storage),
    }
}

fn is_quit(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|cmd| cmd.eq_ignore_ascii_case("QUIT"))
}
