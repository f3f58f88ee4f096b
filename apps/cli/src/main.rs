//! `birdland` - print query plans, run searches and list indexed books.

use anyhow::Context;
use birdland_query::{QueryBuilder, QueryPlan, SearchMode, SearchRequest};
use birdland_search::{
    db::{CatalogStore, MySqlCatalogStore},
    logging,
    services::SearchService,
    Config, Error,
};
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "birdland", version, about = "Birdland catalog search tools")]
struct Cli {
    /// Configuration file (defaults to ./config.toml when present)
    #[arg(short, long, global = true, env = "BIRDLAND_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the rows and count statements without touching the database
    Plan(SearchArgs),
    /// Run a search against the configured database and print the JSON envelope
    Search(SearchArgs),
    /// List canonical book names with their source indices
    Books,
}

#[derive(Debug, Args)]
struct SearchArgs {
    /// music-search or audio-search
    #[arg(long = "type", value_name = "MODE")]
    search_type: String,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    composer: Option<String>,
    #[arg(long)]
    lyricist: Option<String>,
    #[arg(long)]
    artist: Option<String>,
    #[arg(long)]
    album: Option<String>,
    #[arg(long)]
    limit: Option<String>,
}

impl SearchArgs {
    /// The same key/value items an HTTP request would carry.
    fn items(&self) -> Vec<(String, String)> {
        let mut items = vec![("type".to_string(), self.search_type.clone())];
        let fields = [
            ("title", &self.title),
            ("composer", &self.composer),
            ("lyricist", &self.lyricist),
            ("artist", &self.artist),
            ("album", &self.album),
            ("limit", &self.limit),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                items.push((key.to_string(), value.clone()));
            }
        }
        items
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_simple_logging();
    let cli = Cli::parse();

    match &cli.command {
        Command::Plan(args) => plan(args),
        Command::Search(args) => search(&load_config(&cli)?, args).await,
        Command::Books => books(&load_config(&cli)?).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = Config::load_from(cli.config.as_deref()).context("Failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Invalid configuration: {e}"))?;
    Ok(config)
}

fn plan(args: &SearchArgs) -> anyhow::Result<()> {
    let request = SearchRequest::from_items(&args.items())?;
    let plan = match request.mode {
        SearchMode::MusicSearch => QueryPlan::music(&request.filters),
        SearchMode::AudioSearch => QueryPlan::audio(&request.filters),
        SearchMode::IndexedBooks => {
            let statement = birdland_query::books::books_statement();
            println!("{}", serde_json::to_string_pretty(&json!({ "rows": statement.sql }))?);
            return Ok(());
        }
    };

    let builder = QueryBuilder::new(&plan);
    let rows = builder.build_sql();
    let count = builder.build_count_sql();
    let out = json!({
        "mode": plan.mode(),
        "aa_flag": plan.aa_flag(),
        "rows": rows.sql,
        "count": count.sql,
        "binding": rows.binding,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

async fn search(config: &Config, args: &SearchArgs) -> anyhow::Result<()> {
    let store = MySqlCatalogStore::connect_lazy(&config.database)?;
    let service = SearchService::new(Arc::new(store), config.search.default_limit);

    match service.search(&args.items()).await {
        Ok(body) => {
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", failure_output(config, &e)?);
            Err(anyhow::anyhow!("search failed"))
        }
    }
}

fn failure_output(config: &Config, err: &Error) -> anyhow::Result<String> {
    let envelope = err.to_envelope(config.search.expose_diagnostics);
    Ok(serde_json::to_string_pretty(&envelope)?)
}

async fn books(config: &Config) -> anyhow::Result<()> {
    let store = Arc::new(MySqlCatalogStore::connect_lazy(&config.database)?);
    let service = SearchService::new(store.clone(), config.search.default_limit);

    let mut session = store.session().await?;
    let index = service.list_books(session.as_mut()).await?;
    tracing::debug!(books = index.len(), "Loaded indexed books");
    print!("{}", index.render_table());
    Ok(())
}
