use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::path::PathBuf;
use talent_scout::constants::{get_supported_sites, site_alias_to_name};
use talent_scout::logging::init_logging;
use talent_scout::{CandidateSearch, Config, EmploymentType, ExperienceLevel, SearchOutcome, SearchSpecification};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "talent_scout")]
#[command(about = "Search and rank IT candidates on work.ua and robota.ua")]
#[command(version)]
struct Cli {
    /// Config file (defaults to $TALENT_SCOUT_CONFIG, then ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one or more result pages and print candidates best match first
    Search(SearchArgs),
    /// List supported sites
    Sites,
}

#[derive(Args)]
struct SearchArgs {
    #[arg(long)]
    position: Option<String>,

    #[arg(long)]
    location: Option<String>,

    /// Wanted experience level, repeatable (e.g. two-to-five)
    #[arg(long = "experience", value_name = "LEVEL")]
    experience: Vec<ExperienceLevel>,

    #[arg(long)]
    min_salary: Option<u32>,

    #[arg(long)]
    max_salary: Option<u32>,

    /// Skill keyword, repeatable
    #[arg(long = "keyword", value_name = "SKILL")]
    keywords: Vec<String>,

    /// full-time, part-time or remote
    #[arg(long)]
    employment: Option<EmploymentType>,

    /// First results page to fetch
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Number of consecutive pages to fetch
    #[arg(long, default_value_t = 1)]
    pages: u32,

    /// Sites to query (comma-separated), overriding the config file
    #[arg(long)]
    sites: Option<String>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Print Prometheus counters after the run
    #[arg(long)]
    metrics: bool,

    /// Maximum candidates to print per page
    #[arg(long)]
    limit: Option<usize>,
}

impl SearchArgs {
    fn specification(&self) -> SearchSpecification {
        let mut spec = SearchSpecification::new().with_salary_range(self.min_salary, self.max_salary);
        if let Some(position) = &self.position {
            spec = spec.with_position(position.clone());
        }
        if let Some(location) = &self.location {
            spec = spec.with_location(location.clone());
        }
        if let Some(employment) = self.employment {
            spec = spec.with_employment_type(employment);
        }
        for level in &self.experience {
            spec = spec.with_experience_level(*level);
        }
        for keyword in &self.keywords {
            spec = spec.with_keyword(keyword.clone());
        }
        spec
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let (config, source) = match &cli.config {
        Some(path) => {
            let config = Config::load_from(path)
                .with_context(|| format!("Failed to load config from '{}'", path.display()))?;
            (config, Some(path.clone()))
        }
        None => Config::load().context("Failed to load configuration")?,
    };
    let _guard = init_logging(&config.logging);
    match source {
        Some(path) => info!("Loaded configuration from '{}'", path.display()),
        None => info!(
            "No config file at '{}', using defaults",
            Config::default_path().display()
        ),
    }

    match cli.command {
        Commands::Sites => {
            for site in get_supported_sites() {
                println!("{}", site);
            }
        }
        Commands::Search(args) => run_search(config, args).await?,
    }

    Ok(())
}

async fn run_search(mut config: Config, args: SearchArgs) -> anyhow::Result<()> {
    let metrics_handle = if args.metrics {
        Some(
            PrometheusBuilder::new()
                .install_recorder()
                .context("Failed to install metrics recorder")?,
        )
    } else {
        None
    };

    if let Some(sites) = &args.sites {
        config.acquisition.sites = sites
            .split(',')
            .map(site_alias_to_name)
            .filter(|site| !site.is_empty())
            .collect();
    }

    let spec = args.specification();
    let mut search = CandidateSearch::connect(&config).context("Failed to build HTTP client")?;
    search.set_page(args.page);
    info!(sites = ?config.acquisition.sites, "Starting search");

    let mut outcomes = Vec::new();
    for i in 0..args.pages.max(1) {
        if i > 0 {
            search.next_page();
        }
        let mut outcome = search.search(&spec).await;
        if outcome.report.all_sources_failed() {
            warn!("Every source failed on page {}", outcome.page);
        }
        if let Some(limit) = args.limit {
            outcome.ranked.truncate(limit);
        }
        outcomes.push(outcome);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        for outcome in &outcomes {
            print_outcome(outcome);
        }
    }

    if let Some(handle) = metrics_handle {
        println!("{}", handle.render());
    }
    Ok(())
}

fn print_outcome(outcome: &SearchOutcome) {
    println!("\nPage {}:", outcome.page);
    for site in &outcome.report.sites {
        if site.listing_failed {
            println!("   {}: listing unavailable", site.site);
        } else {
            println!(
                "   {}: {} listed, {} acquired, {} dropped",
                site.site, site.listed, site.acquired, site.dropped
            );
        }
    }
    if outcome.ranked.is_empty() {
        println!("   No candidates found");
        return;
    }
    for (rank, scored) in outcome.ranked.iter().enumerate() {
        let candidate = &scored.candidate;
        println!(
            "{:>3}. {:>6.2}  {} | {} | {} | {}",
            rank + 1,
            scored.score,
            candidate.name,
            candidate.position,
            candidate.location.as_deref().unwrap_or("-"),
            candidate.source_url
        );
    }
}
