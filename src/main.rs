use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use knotbook::cli::{
    handle_category_command, handle_cost_command, handle_payment_command, CategoryCommands,
    CostCommands, PaymentCommands,
};
use knotbook::config::{paths::KnotbookPaths, settings::Settings};
use knotbook::services::ReconciliationService;
use knotbook::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "knotbook",
    version,
    about = "Wedding budget tracker",
    long_about = "knotbook tracks wedding costs and the installment payments made \
                  against them. Every cost's paid amount and status are derived \
                  from its payment ledger, so the numbers always add up."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cost management commands
    #[command(subcommand)]
    Cost(CostCommands),

    /// Payment ledger commands
    #[command(subcommand, alias = "pay")]
    Payment(PaymentCommands),

    /// Category management commands
    #[command(subcommand, alias = "cat")]
    Category(CategoryCommands),

    /// Recompute every cost from its payment ledger
    Reconcile,

    /// Run the HTTP API server
    Serve {
        /// Address to bind (defaults to the configured listen address)
        #[arg(long, env = "KNOTBOOK_LISTEN")]
        addr: Option<String>,
    },

    /// Initialize a new budget with default categories
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = KnotbookPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let mut storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Commands::Cost(cmd) => {
            handle_cost_command(&storage, cmd)?;
        }
        Commands::Payment(cmd) => {
            handle_payment_command(&storage, cmd)?;
        }
        Commands::Category(cmd) => {
            handle_category_command(&storage, cmd)?;
        }
        Commands::Reconcile => {
            let result = ReconciliationService::new(&storage).recompute_all()?;
            println!(
                "Reconciled {} cost(s); repaired {} drifted aggregate(s)",
                result.checked, result.repaired
            );
        }
        Commands::Serve { addr } => {
            let addr: SocketAddr = addr
                .unwrap_or_else(|| settings.listen_addr.clone())
                .parse()
                .context("Invalid listen address")?;

            println!("Serving knotbook API on http://{}", addr);

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(knotbook::server::serve(addr, Arc::new(storage)))?;
        }
        Commands::Init => {
            if paths.is_initialized() {
                println!("knotbook is already initialized at {}", paths.base_dir().display());
            } else {
                initialize_storage(&paths)?;
                let mut settings = settings;
                settings.setup_completed = true;
                settings.save(&paths)?;
                println!("Initialized knotbook at {}", paths.base_dir().display());
                println!("Created default categories. Run 'knotbook category list' to see them.");
            }
        }
        Commands::Config => {
            println!("Configuration:");
            println!("  Base directory: {}", paths.base_dir().display());
            println!("  Data directory: {}", paths.data_dir().display());
            println!("  Settings file:  {}", paths.settings_file().display());
            println!("  Audit log:      {}", paths.audit_log().display());
            println!("  Listen address: {}", settings.listen_addr);
            println!("  Currency:       {}", settings.currency_symbol);
            println!("  Initialized:    {}", paths.is_initialized());
        }
    }

    Ok(())
}
