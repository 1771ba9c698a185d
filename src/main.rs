use std::path::PathBuf;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use artistscope::{cli, config, utils, warning};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Export artist metadata and top tracks for a list of artist names
    Collect(CollectOptions),

    /// Serve the export pipeline over HTTP
    Serve(ServeOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct CollectOptions {
    /// CSV file with one artist name per row
    #[clap(long, default_value = "bandname.csv")]
    pub input: PathBuf,

    /// Destination CSV file
    #[clap(long, default_value = "artist_top_tracks.csv")]
    pub output: PathBuf,

    /// Input column holding the artist names
    #[clap(long, default_value = utils::ARTIST_COLUMN)]
    pub column: String,
}

#[derive(Parser, Debug, Clone)]
pub struct ServeOptions {
    /// Address to bind, defaults to SERVER_ADDRESS or 127.0.0.1:5000
    #[clap(long)]
    pub address: Option<String>,

    /// Column of uploaded CSV files holding the artist names
    #[clap(long, default_value = utils::ARTIST_COLUMN)]
    pub column: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Collect(opt) => cli::collect(&opt.input, &opt.output, &opt.column).await,
        Command::Serve(opt) => {
            let address = opt.address.unwrap_or_else(config::server_addr);
            cli::serve(&address, &opt.column).await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
