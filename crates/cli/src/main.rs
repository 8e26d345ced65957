use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::MovieCatalog;
use node_client::MasterClient;
use protocol::EnrichedMovie;
use scorer::FeatureScorer;
use server::{ClusterConfig, MasterNode, WorkerNode};
use tokio::sync::Semaphore;
use tracing::info;

/// ReelRecs - distributed content-based movie recommendations
#[derive(Parser)]
#[command(name = "reel-recs")]
#[command(about = "Master/worker cluster for movie similarity recommendations", long_about = None)]
struct Cli {
    /// Path to the movie catalog (JSON array of movies)
    #[arg(short, long, env = "MOVIES_FILE", default_value = "data/movies.json")]
    data_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the master node
    Master {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "PORT", default_value = "8081")]
        port: u16,

        /// Worker address; repeat the flag or pass a comma-separated list
        #[arg(long = "worker", env = "WORKER_NODES", value_delimiter = ',')]
        workers: Vec<String>,

        /// JSON cluster configuration; flags override its worker list
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run a worker node
    Worker {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        #[arg(long, env = "PORT", default_value = "8082")]
        port: u16,
    },

    /// Ask the master for movies similar to a title
    Recommend {
        /// Master node address
        #[arg(long, env = "MASTER_NODE", default_value = "localhost:8081")]
        master: String,

        /// Exact title of the movie (case-insensitive)
        #[arg(long)]
        title: String,

        /// Also print cast, director and overview
        #[arg(long)]
        explain: bool,
    },

    /// Search the catalog by title
    Search {
        /// Case-insensitive substring of the title
        #[arg(long)]
        query: String,

        #[arg(long, default_value = "20")]
        limit: usize,
    },

    /// Send random requests to the master and report latencies
    Benchmark {
        #[arg(long, env = "MASTER_NODE", default_value = "localhost:8081")]
        master: String,

        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Maximum requests in flight
        #[arg(long, default_value = "10")]
        concurrent: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Master {
            host,
            port,
            workers,
            config,
        } => handle_master(&host, port, workers, config.as_deref()).await?,
        Commands::Worker { host, port } => handle_worker(&host, port).await?,
        Commands::Recommend {
            master,
            title,
            explain,
        } => {
            let catalog = load_catalog(&cli.data_file)?;
            handle_recommend(&catalog, &master, &title, explain).await?
        }
        Commands::Search { query, limit } => {
            let catalog = load_catalog(&cli.data_file)?;
            handle_search(&catalog, &query, limit)
        }
        Commands::Benchmark {
            master,
            requests,
            concurrent,
        } => {
            let catalog = Arc::new(load_catalog(&cli.data_file)?);
            handle_benchmark(catalog, &master, requests, concurrent).await?
        }
    }

    Ok(())
}

fn load_catalog(path: &Path) -> Result<MovieCatalog> {
    println!("Loading movie catalog from {}...", path.display());
    let start = Instant::now();
    let catalog = MovieCatalog::load_from_file(path).context("Failed to load movie catalog")?;
    println!(
        "{} Loaded {} movies in {:?}",
        "✓".green(),
        catalog.len(),
        start.elapsed()
    );
    Ok(catalog)
}

/// Handle the 'master' command
async fn handle_master(
    host: &str,
    port: u16,
    workers: Vec<String>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => ClusterConfig::load(path)?,
        None => ClusterConfig::default(),
    };
    let workers: Vec<String> = workers
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect();
    if !workers.is_empty() {
        config = config.with_workers(workers);
    }

    let master = MasterNode::from_config(&config).context("Invalid cluster configuration")?;
    let addr = format!("{}:{}", host, port);
    info!("Starting master node on {}", addr);
    master.run(&addr).await
}

/// Handle the 'worker' command
async fn handle_worker(host: &str, port: u16) -> Result<()> {
    let node = WorkerNode::new(FeatureScorer::new());
    let addr = format!("{}:{}", host, port);
    info!("Starting worker node on {} ({})", addr, node.scorer_name());
    node.run(&addr).await
}

/// Handle the 'recommend' command
async fn handle_recommend(
    catalog: &MovieCatalog,
    master: &str,
    title: &str,
    explain: bool,
) -> Result<()> {
    let client = MasterClient::new(master);
    let start = Instant::now();
    let response = client.recommend_by_title(catalog, title).await?;

    print_recommendations(&response.target_movie, &response.movie_response, explain);
    println!("{}", format!("({:?})", start.elapsed()).dimmed());
    Ok(())
}

/// Handle the 'search' command
fn handle_search(catalog: &MovieCatalog, query: &str, limit: usize) {
    let matches = catalog.search(query, limit);
    println!("{}", format!("Search results for '{}':", query).bold().blue());
    if matches.is_empty() {
        println!("  no matching titles");
        return;
    }
    for movie in matches {
        println!(
            "{}: {} [{}] avg {:.1}",
            movie.id.to_string().green(),
            movie.title,
            movie.genres,
            movie.vote_average
        );
    }
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    catalog: Arc<MovieCatalog>,
    master: &str,
    requests: usize,
    concurrent: usize,
) -> Result<()> {
    if catalog.is_empty() {
        bail!("Catalog is empty, nothing to benchmark");
    }
    if requests == 0 {
        bail!("--requests must be at least 1");
    }

    let titles: Vec<String> = {
        use rand::Rng;
        let mut rng = rand::rng();
        (0..requests)
            .map(|_| {
                let index = rng.random_range(0..catalog.len());
                catalog.movies()[index].title.clone()
            })
            .collect()
    };

    let client = MasterClient::new(master);
    let permits = Arc::new(Semaphore::new(concurrent.max(1)));
    let wall_clock = Instant::now();

    let mut handles = Vec::with_capacity(requests);
    for title in titles {
        let client = client.clone();
        let catalog = catalog.clone();
        let permits = permits.clone();
        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let start = Instant::now();
            client.recommend_by_title(&catalog, &title).await?;
            Ok::<_, anyhow::Error>(start.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    let mut failures = 0usize;
    for handle in handles {
        match handle.await? {
            Ok(elapsed) => timings.push(elapsed),
            Err(e) => {
                failures += 1;
                tracing::warn!("Benchmark request failed: {:#}", e);
            }
        }
    }
    let total_time = wall_clock.elapsed();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} failed)", requests, failures);
    println!("Total time: {:?}", total_time);
    if timings.is_empty() {
        println!("{}", "No request succeeded".red());
        return Ok(());
    }

    timings.sort();
    let avg_latency = timings.iter().sum::<Duration>() / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f64 / total_time.as_secs_f64();

    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_recommendations(target: &str, movies: &[EnrichedMovie], explain: bool) {
    println!("{}", format!("Movies similar to '{}':", target).bold().blue());
    for (i, movie) in movies.iter().enumerate() {
        println!(
            "{}. {} [{}] - Similarity: {:.3} (rating {:.1})",
            (i + 1).to_string().green(),
            movie.title,
            movie.genres,
            movie.similarity,
            movie.vote_average
        );
        if explain {
            println!("   Director: {}", movie.director);
            println!("   Cast: {}", movie.actors);
            if !movie.overview.is_empty() {
                println!("   {}", movie.overview.dimmed());
            }
        }
    }
}
