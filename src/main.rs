use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::sync::Mutex;
use tracing::{error, info};

use rudis::commands::CommandContext;
use rudis::dispatch::Dispatcher;
use rudis::server;
use rudis::store::{Database, DATABASE_FILE_NAME, DATABASE_FILE_NUMBER, DEFAULT_DB_FOLDER};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 5555)]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Folder holding the per-database dump files
    #[arg(short, long, default_value = DEFAULT_DB_FOLDER)]
    data_dir: PathBuf,

    /// Number of logical databases
    #[arg(long, default_value_t = DATABASE_FILE_NUMBER)]
    databases: usize,

    /// Logo file printed at startup
    #[arg(long, default_value = "logo")]
    logo: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let database = Database::open(&args.data_dir, DATABASE_FILE_NAME, args.databases);
    let dispatcher = Arc::new(Mutex::new(Dispatcher::new(CommandContext::new(database))));

    server::print_logo(&args.logo, args.port);
    server::print_start_message(args.port);

    let addr = format!("{}:{}", args.host, args.port);
    let shutdown = dispatcher.clone();
    tokio::select! {
        res = server::run(&addr, dispatcher) => {
            if let Err(e) = res {
                error!("server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
        }
    }

    // Both exit paths persist the active database.
    shutdown.lock().await.context().db.flush();
    Ok(())
}
