use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use playstyle_metrics::analysis::AggregationEngine;
use playstyle_metrics::catalog::{Category, MetricCatalog};
use playstyle_metrics::config::{parse_threshold, Config};
use playstyle_metrics::data::loader::{load_catalog, load_dataset};
use playstyle_metrics::data::store::ResultBucket;
use playstyle_metrics::display::output::{
    display_bucket_split, display_dataset_header, display_error, display_info,
    display_league_delta, display_metric_catalog, display_profile, display_snapshot,
    display_success, display_team_comparison, display_unknown_metric,
};
use playstyle_metrics::error::AppError;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "Playstyle")]
#[command(about = "Rank, normalize and compare team play-style metrics", long_about = None)]
struct Args {
    /// Dataset JSON file (overrides PLAYSTYLE_DATA_FILE)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    /// Custom metric catalog JSON file (overrides PLAYSTYLE_CATALOG_FILE)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Percent difference above which a gap is significant (default: 20)
    #[arg(short, long, global = true, value_parser = parse_threshold)]
    threshold: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the metrics in the catalog
    Metrics {
        /// Only show one category (possession, attacking, defensive, tempo, general)
        #[arg(short, long)]
        category: Option<Category>,
    },

    /// Rank every team on one metric
    Snapshot {
        metric: String,

        /// Result bucket: all, win, draw or loss
        #[arg(short, long, default_value = "all")]
        bucket: ResultBucket,
    },

    /// Compare two teams on one metric
    Compare {
        metric: String,
        team_a: String,
        team_b: String,

        #[arg(short, long, default_value = "all")]
        bucket: ResultBucket,
    },

    /// Compare a team against the league average
    League {
        team: String,
        metric: String,

        #[arg(short, long, default_value = "all")]
        bucket: ResultBucket,
    },

    /// Radar-style normalized profile of a team
    Profile {
        team: String,

        /// Only one category (default: every category)
        #[arg(short, long)]
        category: Option<Category>,

        #[arg(short, long, default_value = "all")]
        bucket: ResultBucket,
    },

    /// A team's metric split by match result
    Splits { team: String, metric: String },
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playstyle_metrics=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    // Load configuration
    let mut config = Config::from_env(args.threshold)?;
    if let Some(data) = args.data {
        config.data_file = data;
    }
    if let Some(catalog) = args.catalog {
        config.catalog_file = Some(catalog);
    }

    let catalog = match &config.catalog_file {
        Some(path) => load_catalog(path)
            .with_context(|| format!("loading catalog {}", path.display()))?,
        None => MetricCatalog::standard()?,
    };
    info!(metrics = catalog.len(), "catalog ready");

    if let Command::Metrics { category } = args.command {
        display_metric_catalog(&catalog, category);
        return Ok(());
    }

    let store = load_dataset(&config.data_file)
        .with_context(|| format!("loading dataset {}", config.data_file.display()))?;
    display_dataset_header(&store, &config.data_file.display().to_string());

    let engine =
        AggregationEngine::new(&catalog, &store).with_threshold(config.significance_threshold);
    let uncatalogued = engine.uncatalogued_metrics();
    if !uncatalogued.is_empty() {
        display_info(&format!("Ignoring uncatalogued metrics: {}", uncatalogued.join(", ")));
    }

    match execute(&engine, args.command) {
        Err(AppError::UnknownMetric(metric_id)) => {
            display_unknown_metric(&metric_id);
            Ok(())
        }
        other => Ok(other?),
    }
}

fn execute(engine: &AggregationEngine, command: Command) -> Result<(), AppError> {
    let catalog = engine.catalog();
    let store = engine.store();

    match command {
        Command::Metrics { category } => display_metric_catalog(catalog, category),

        Command::Snapshot { metric, bucket } => {
            let snapshot = engine.league_snapshot(&metric, bucket)?;
            display_snapshot(&snapshot, catalog, store);
        }

        Command::Compare {
            metric,
            team_a,
            team_b,
            bucket,
        } => match engine.compare_teams(&metric, bucket, &team_a, &team_b)? {
            Some(comparison) => display_team_comparison(&comparison, catalog, store),
            None => display_info(&format!(
                "No {} data for both {} and {} ({})",
                metric, team_a, team_b, bucket
            )),
        },

        Command::League {
            team,
            metric,
            bucket,
        } => match engine.compare_to_league(&metric, bucket, &team)? {
            Some(delta) => display_league_delta(&team, &delta, catalog, store),
            None => display_info(&format!("No {} data for {} ({})", metric, team, bucket)),
        },

        Command::Profile {
            team,
            category,
            bucket,
        } => {
            if !store.has_team(&team) {
                display_info(&format!("No data for team {}", team));
                return Ok(());
            }
            let categories = category.map(|c| vec![c]).unwrap_or_else(|| Category::ALL.to_vec());
            for category in categories {
                display_profile(&engine.team_profile(&team, category, bucket), catalog, store);
            }
            display_success(&format!("Profile built for {}", store.team_name(&team)));
        }

        Command::Splits { team, metric } => {
            let split = engine.bucket_split(&team, &metric)?;
            display_bucket_split(&split, catalog, store);
        }
    }

    Ok(())
}
