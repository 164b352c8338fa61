//! Command-line front end for the bike listing.
//!
//! Mounts the listing from a URL query string, applies any filter flags the
//! way the filter controls would, performs the resulting fetches and prints
//! the rendered page along with the canonical URL.
//!
//! ```text
//! bike-rental list "type=Mountain&page=2"
//! bike-rental list --status available --sort -price_per_hour
//! bike-rental login --access <token> --refresh <token>
//! bike-rental logout
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

use bike_rental::domain::{Filter, FilterKind};
use bike_rental::http::ReqwestTransport;
use bike_rental::infrastructure::token_file;
use bike_rental::storage::{shared, AuthTokens, JsonTokenStore, MemoryTokenStore, SharedTokenStore};
use bike_rental::{initialize, ui, BikeRentalError, Config, Event, Result, APP_NAME};

#[derive(Parser)]
#[command(name = "bike-rental", version, about = "Browse the bike rental catalogue", long_about = None)]
struct Cli {
    /// TOML configuration file (environment variables take precedence)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Keep tokens in memory instead of the data directory
    #[arg(long, global = true)]
    no_persist: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List bikes for a URL query string
    List(ListArgs),
    /// Store an access/refresh token pair
    Login {
        #[arg(long)]
        access: String,
        #[arg(long)]
        refresh: String,
    },
    /// Forget stored tokens
    Logout,
}

#[derive(Args, Default)]
struct ListArgs {
    /// Page URL query, e.g. "search=trek&type=Road&page=2"
    #[arg(default_value = "")]
    query: String,

    #[arg(long)]
    search: Option<String>,

    /// Bike type: Mountain, "City ride", Road, Hybrid, Electric, BMX ("" for all)
    #[arg(long = "type", value_name = "TYPE")]
    bike_type: Option<String>,

    /// available, booked or in_use ("" for all)
    #[arg(long)]
    status: Option<String>,

    /// price_per_hour, -price_per_hour, name, -name, added_on, -added_on
    #[arg(long)]
    sort: Option<String>,

    #[arg(long)]
    page: Option<u32>,

    /// Clear search, filters and sort after mounting
    #[arg(long)]
    clear: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let provider = bike_rental::observability::init_tracing(&config);

    let _span = tracing::debug_span!("cli", app = APP_NAME).entered();
    let store = open_store(&config, cli.no_persist)?;

    let result = match cli.command.unwrap_or_else(|| Commands::List(ListArgs::default())) {
        Commands::List(args) => list(&config, store, &args),
        Commands::Login { access, refresh } => store
            .borrow_mut()
            .store_tokens(&AuthTokens::new(access, refresh))
            .map(|()| println!("Tokens stored.")),
        Commands::Logout => store
            .borrow_mut()
            .clear_tokens()
            .map(|()| println!("Logged out.")),
    };

    if let Some(provider) = provider {
        if let Err(e) = provider.shutdown() {
            eprintln!("warning: failed to flush traces: {e}");
        }
    }
    result
}

fn open_store(config: &Config, no_persist: bool) -> Result<SharedTokenStore> {
    if no_persist {
        return Ok(shared(MemoryTokenStore::default()));
    }
    let store = JsonTokenStore::open(token_file(&config.resolved_data_dir()))?;
    Ok(shared(store))
}

fn list(config: &Config, store: SharedTokenStore, args: &ListArgs) -> Result<()> {
    let timeout = if args.timeout == 0 { 30 } else { args.timeout };
    let transport = Rc::new(ReqwestTransport::new(Duration::from_secs(timeout))?);
    let mut runtime = initialize(config, transport, store);

    runtime.dispatch(Event::Mount {
        query: args.query.clone(),
    })?;

    if args.clear {
        runtime.dispatch(Event::ClearFilters)?;
    }
    if let Some(term) = &args.search {
        runtime.dispatch(Event::SearchChanged(term.clone()))?;
    }
    for (kind, value) in [
        (FilterKind::Type, &args.bike_type),
        (FilterKind::Status, &args.status),
        (FilterKind::Sort, &args.sort),
    ] {
        if let Some(value) = value {
            runtime.dispatch(Event::FilterChanged(Filter::parse(kind, value)?))?;
        }
    }
    runtime.settle()?;

    if let Some(page) = args.page {
        let last = runtime.state().total_pages().max(1);
        if page == 0 || page > last {
            return Err(BikeRentalError::Validation(format!(
                "page {page} is out of range (1..={last})"
            )));
        }
        if runtime.dispatch(Event::PageRequested(page))? {
            runtime.settle()?;
        }
    }

    ui::render(&runtime.view());
    let url = runtime.current_url();
    println!();
    println!("URL: ?{url}");

    runtime.shutdown();
    Ok(())
}
