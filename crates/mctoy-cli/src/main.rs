//! `mctoy` command-line client

mod cli;
mod output;

use clap::Parser;
use cli::{Cli, Command};
use mctoy_core::{Catalog, DirectoryStore, Error, PlaceId, Session};
use mctoy_db::{LiveDirectory, Store};
use mctoy_net::{ClientConfig, HttpDirectory, NominatimClient, OverpassClient};
use std::sync::Arc;

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("mctoy=debug,mctoy_core=debug,mctoy_net=debug,mctoy_db=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_directory(cli: &Cli, client: &ClientConfig) -> Result<Arc<dyn DirectoryStore>, Error> {
    match &cli.db {
        Some(path) => {
            let store = Store::open(path)?;
            Ok(Arc::new(LiveDirectory::new(store)?))
        }
        None => Ok(Arc::new(HttpDirectory::new(cli.server_url(), client)?)),
    }
}

async fn run(cli: Cli) -> Result<(), Error> {
    let catalog = Catalog::load(&cli.catalog)?;

    if let Command::Toys = cli.command {
        for toy in catalog.list_toys() {
            print!("{}", output::format_toy(toy));
        }
        return Ok(());
    }

    let client = ClientConfig {
        timeout: cli.timeout(),
    };
    let directory = open_directory(&cli, &client)?;
    let source = Arc::new(OverpassClient::new(&cli.overpass_url, &client)?);
    let geocoder = Arc::new(NominatimClient::new(&cli.nominatim_url, &client)?);
    let mut session = Session::new(directory, source, geocoder).with_radius(cli.radius);

    session.refresh().await?;

    match cli.command {
        Command::List { toy: Some(toy) } => {
            let places = session.places_with_toy(&toy);
            print!("{}", output::format_places(places, &catalog));
        }
        Command::List { toy: None } => {
            print!("{}", output::format_places(session.places().iter(), &catalog));
        }
        Command::Search { address } => {
            let summary = session.search(&address).await?;
            print!("{}", output::format_summary(&summary));
        }
        Command::SetToys { place_id, toys } => {
            for toy in toys.iter().filter(|toy| !catalog.contains(toy)) {
                tracing::warn!(toy = %toy, "toy is not in the catalog");
            }
            let place_id = PlaceId::new(place_id);
            session.edit_toys(&place_id, toys).await?;
            if let Some(place) = session.places().get(&place_id) {
                print!("{}", output::format_place(place, &catalog));
            }
        }
        Command::Toys => {}
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        match e {
            Error::AddressNotFound(_) => eprintln!("Address not found."),
            other => eprintln!("error: {}", other),
        }
        std::process::exit(1);
    }
}
