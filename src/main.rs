use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use hash_quiz::client::{self, Outcome};
use hash_quiz::config::{DEFAULT_CONFIG_PATH, Endpoint, ServerConfig};
use hash_quiz::{DEFAULT_QUIZ_PATH, server};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Host the quiz
    Server {
        /// Two-line file with the host and port to listen on
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Question file, one `question?answer` per line, or a .json array
        #[arg(short, long, default_value = DEFAULT_QUIZ_PATH)]
        quiz: PathBuf,

        /// Keep accepting clients after one of them quits mid-quiz
        #[arg(long)]
        keep_running: bool,
    },

    /// Play in the console
    Client {
        /// Two-line file with the server host and port
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Play in a full-screen terminal UI
    Tui {
        /// Two-line file with the server host and port
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let result = match args.command {
        Command::Server {
            config,
            quiz,
            keep_running,
        } => {
            init_logging();
            let config = ServerConfig::new(Endpoint::load_or_default(config))
                .with_shutdown_on_quit(!keep_running);
            server::run(config, quiz).await
        }
        Command::Client { config } => {
            init_logging();
            let endpoint = Endpoint::load_or_default(config);
            client::console::run(&endpoint).await.map(|outcome| {
                if outcome == Outcome::Disconnected {
                    eprintln!("Server closed the connection before the quiz ended.");
                }
            })
        }
        Command::Tui { config } => {
            // No subscriber here: log lines would tear the screen.
            let endpoint = Endpoint::load_or_default(config);
            client::tui::run(&endpoint).await.map(|outcome| {
                if let Some(Outcome::Finished { score }) = outcome {
                    println!("Final Score: {}", score);
                }
            })
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
