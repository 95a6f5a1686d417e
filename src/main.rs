use bookshelf::config::{self, LibraryConfig};
use bookshelf::server::{self, ServeError, Site};
use bookshelf::{generate, output, scan};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bookshelf")]
#[command(about = "Self-updating index and LAN server for HTML book summaries")]
#[command(long_about = "\
Self-updating index and LAN server for HTML book summaries

Your filesystem is the data source. Every directory in the root is a
category and every .html file inside it is a book. The index page is
rebuilt each time it is opened, so adding a book is just copying a file.

Library structure:

  books/
  ├── library.toml                 # Optional config
  ├── index.html                   # Generated, overwritten on every refresh
  ├── المال-والاستثمار/             # Category
  │   └── psychology-of-money.html # Book
  ├── health/
  │   └── why-we-sleep.html
  └── .drafts/                     # Dot and __ directories are skipped

Metadata read from each book (first match wins):
  Title:       <h1>          → file name without .html
  Subtitle:    class=\"subtitle\"
  Author:      class=\"author\" (text before —)
  Icon:        class=\"book-icon\"   → 📖
  Description: first long <p> of intro-section, else problem-section
  Chapters:    number of class=\"chapter\" elements

Run 'bookshelf gen-config' to generate a documented library.toml.")]
#[command(version = env!("BOOKSHELF_VERSION"))]
struct Cli {
    /// Library root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Port to listen on (overrides library.toml)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Address to listen on (overrides library.toml)
    #[arg(long, global = true)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the index and serve the library (default)
    Serve,
    /// Rebuild the index once and exit
    Generate,
    /// List the books that would be indexed, without writing anything
    Scan {
        /// Print the library as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock library.toml with all options documented
    GenConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Command::Serve) {
        Command::Serve => {
            let library_config = load_config(&cli)?;
            serve(cli.root.clone(), library_config).await
        }
        Command::Generate => {
            let update = generate::update_index(&cli.root, &load_config(&cli)?)?;
            output::print_update_output(&update);
            Ok(ExitCode::SUCCESS)
        }
        Command::Scan { json } => {
            let library = scan::scan(&cli.root, &load_config(&cli)?)?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&library)?);
            } else {
                output::print_scan_output(&library);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// `library.toml` from the root, with `--port` and `--bind` applied on top.
fn load_config(cli: &Cli) -> Result<LibraryConfig, config::ConfigError> {
    let mut library_config = config::load_config(&cli.root)?;
    if let Some(port) = cli.port {
        library_config.server.port = port;
    }
    if let Some(bind) = &cli.bind {
        library_config.server.bind = bind.clone();
    }
    Ok(library_config)
}

async fn serve(root: PathBuf, library_config: LibraryConfig) -> Result<ExitCode, Box<dyn Error>> {
    output::print_banner();
    let update = generate::update_index(&root, &library_config)?;
    output::print_update_output(&update);

    let listener = match server::bind(&library_config.server.bind, library_config.server.port).await {
        Ok(listener) => listener,
        Err(ServeError::AddrInUse { port }) => {
            output::print_port_in_use(port);
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    let port = listener.local_addr()?.port();
    output::print_listening(port, &server::local_ip());

    server::serve(listener, Site::new(root, library_config), server::shutdown_signal()).await?;
    output::print_goodbye();
    Ok(ExitCode::SUCCESS)
}
