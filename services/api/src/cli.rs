use crate::browse::{
    run_directory, run_listings, run_regions, DirectoryArgs, ListingsArgs, RegionsArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use listings_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Listings Portal",
    about = "Serve and browse the jobs and healthcare listings portal",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Search and page one listing kind, or print a listing's form
    Listings(ListingsArgs),
    /// Browse the public facility directory
    Directory(DirectoryArgs),
    /// List regions, or the districts of one region
    Regions(RegionsArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Listings(args) => run_listings(args),
        Command::Directory(args) => run_directory(args),
        Command::Regions(args) => run_regions(args),
    }
}
