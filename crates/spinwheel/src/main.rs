use anyhow::Context;
use clap::{Parser, Subcommand};
use spinwheel::config;
use spinwheel::source::{self, CatalogOrigin};
use spinwheel::{
    ControlCommand, Cuisine, FilterOutcome, Instructions, RecipeCatalog, ResultCard, RngSource,
    SOCKET_PATH, Settings, TimeBucket, Wheel,
};
use std::path::PathBuf;
use std::time::Duration;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "spinwheel", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Args, Debug, Clone)]
struct FilterArgs {
    /// Cuisine display name, or "all"
    #[arg(short, long, default_value = "all")]
    cuisine: Cuisine,

    /// quick (<30 min), medium (30-60), long (>60) or all
    #[arg(short, long, default_value = "all")]
    time: TimeBucket,

    /// Read recipes from this JSON snapshot instead of the configured sources
    #[arg(long)]
    catalog: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Spin the wheel without a window and print the winning recipe
    Pick {
        #[command(flatten)]
        filter: FilterArgs,

        /// Seed the random source for a repeatable pick
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List the recipes that would be on the wheel
    List {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Write the default config file if none exists
    InitConfig,
    /// Spin the running foodwheel window
    Spin,
    /// Show the running foodwheel window
    Show,
    /// Hide the running foodwheel window
    Hide,
    /// Make the running foodwheel window reload config and recipes
    Reload,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Pick { filter, seed }) => pick(filter, seed).await,
        Some(Commands::List { filter }) => list(filter).await,
        Some(Commands::InitConfig) => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
        Some(Commands::Spin) => send_command(ControlCommand::Spin),
        Some(Commands::Show) => send_command(ControlCommand::Show),
        Some(Commands::Hide) => send_command(ControlCommand::Hide),
        Some(Commands::Reload) => send_command(ControlCommand::Reload),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

async fn catalog_for(filter: &FilterArgs, settings: &Settings) -> anyhow::Result<RecipeCatalog> {
    let (catalog, origin) = match &filter.catalog {
        Some(path) => (
            source::read_snapshot(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            CatalogOrigin::Snapshot(path.clone()),
        ),
        None => source::load_catalog(&settings.data).await,
    };
    log::info!("Loaded {} recipes from {}", catalog.all().len(), origin);
    Ok(catalog)
}

fn report_filter(outcome: FilterOutcome) {
    if outcome == FilterOutcome::Reset {
        eprintln!("No recipes match that filter, using all recipes instead.");
    }
}

async fn pick(filter: FilterArgs, seed: Option<u64>) -> anyhow::Result<()> {
    let settings = config::load_or_default();
    let catalog = catalog_for(&filter, &settings).await?;

    let rng = match seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_os(),
    };
    let mut wheel = Wheel::new(catalog, settings, rng);
    report_filter(wheel.apply_filter(filter.cuisine, filter.time));

    wheel.spin(Duration::ZERO)?;
    let mut now = Duration::ZERO;
    let outcome = loop {
        now += FRAME;
        if let Some(outcome) = wheel.tick(now).outcome {
            break outcome;
        }
    };

    match outcome.card {
        Some(card) => print_card(&card),
        None => println!("The wheel stopped on an empty slot ({}). Spin again!", outcome.index),
    }
    Ok(())
}

fn print_card(card: &ResultCard) {
    println!("{}", card.name);
    println!("  Cuisine:     {}", card.country);
    println!("  Difficulty:  {}", card.difficulty.stars());
    if let Some(minutes) = card.cooking_minutes {
        println!("  Cooking:     {} min", minutes);
    }
    if let Some(minutes) = card.prepare_minutes {
        println!("  Preparation: {} min", minutes);
    }
    if let Some(servings) = card.servings {
        println!("  Serves:      {}", servings);
    }
    if let Some(description) = &card.description {
        println!();
        println!("{}", description);
    }
    println!();
    match &card.instructions {
        Instructions::Provided(text) => println!("{}", text),
        Instructions::Missing => println!("No instructions available."),
    }
}

async fn list(filter: FilterArgs) -> anyhow::Result<()> {
    let settings = config::load_or_default();
    let mut catalog = catalog_for(&filter, &settings).await?;
    report_filter(catalog.apply_filter(filter.cuisine, filter.time));

    for recipe in catalog.active() {
        println!(
            "{:<32} {:<12} {:>4} min",
            recipe.name,
            spinwheel::CountryNames::country_name(&catalog, &recipe.country),
            recipe.total_minutes()
        );
    }
    Ok(())
}

fn send_command(command: ControlCommand) -> anyhow::Result<()> {
    spinwheel::control::send_command(command).map_err(|e| {
        anyhow::anyhow!(
            "Failed to connect to foodwheel at {}: {}. Is foodwheel running?",
            SOCKET_PATH,
            e
        )
    })
}
