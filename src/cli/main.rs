use anyhow::Context;
use cda_api::state::DatasetCache;
use clap::{Parser, Subcommand};
use reqwest::Client;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cda-cli")]
#[command(about = "CDA API CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "CDA_API_ENDPOINT", default_value = "http://localhost:8000")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check server health
    Health,

    /// Search CDAs
    Search {
        /// Substring of the CDA number
        #[arg(short, long)]
        q: Option<String>,

        /// Category filter (repeatable)
        #[arg(short, long)]
        natureza: Vec<String>,

        /// Situation code or label (repeatable)
        #[arg(short, long)]
        situacao: Vec<String>,

        #[arg(long)]
        min_ano: Option<u32>,

        #[arg(long)]
        max_ano: Option<u32>,

        #[arg(long)]
        min_saldo: Option<f64>,

        #[arg(long)]
        max_saldo: Option<f64>,

        #[arg(long)]
        min_score: Option<f64>,

        #[arg(long)]
        max_score: Option<f64>,

        /// saldo, ano or score
        #[arg(long, default_value = "saldo")]
        sort_by: String,

        /// asc or desc
        #[arg(long, default_value = "desc")]
        sort_dir: String,

        #[arg(short, long, default_value = "1")]
        page: u32,

        #[arg(short = 'P', long, default_value = "50")]
        page_size: u32,
    },

    /// Number of CDAs in collection
    Kpi,

    /// Fetch a pre-computed summary
    Resumo {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Load a dataset file locally and report what the server would see
    Validate {
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = Client::new();

    match cli.command {
        Commands::Health => {
            get_json(&client, format!("{}/health", cli.endpoint), &[]).await?;
        }

        Commands::Search {
            q,
            natureza,
            situacao,
            min_ano,
            max_ano,
            min_saldo,
            max_saldo,
            min_score,
            max_score,
            sort_by,
            sort_dir,
            page,
            page_size,
        } => {
            let mut query: Vec<(&str, String)> = vec![
                ("sort_by", sort_by),
                ("sort_dir", sort_dir),
                ("page", page.to_string()),
                ("page_size", page_size.to_string()),
            ];
            if let Some(q) = q {
                query.push(("q", q));
            }
            query.extend(natureza.into_iter().map(|n| ("natureza", n)));
            query.extend(situacao.into_iter().map(|s| ("situacao", s)));
            for (key, value) in [("min_ano", min_ano), ("max_ano", max_ano)] {
                if let Some(v) = value {
                    query.push((key, v.to_string()));
                }
            }
            for (key, value) in [
                ("min_saldo", min_saldo),
                ("max_saldo", max_saldo),
                ("min_score", min_score),
                ("max_score", max_score),
            ] {
                if let Some(v) = value {
                    query.push((key, v.to_string()));
                }
            }

            get_json(&client, format!("{}/cda/search", cli.endpoint), &query).await?;
        }

        Commands::Kpi => {
            get_json(&client, format!("{}/kpis/volume_em_cobranca", cli.endpoint), &[]).await?;
        }

        Commands::Resumo { name } => {
            get_json(&client, format!("{}/resumo/{}", cli.endpoint, name), &[]).await?;
        }

        Commands::Validate { file } => {
            let datasets = DatasetCache::from_path(&file);

            let in_collection = datasets
                .in_collection_count()
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let dataset = datasets
                .dataset()
                .await
                .with_context(|| format!("{} is not a valid CDA dataset", file.display()))?;
            let stats = dataset.stats();

            println!("Dataset: {}", file.display());
            println!("  Records:       {}", stats.positions);
            println!("  Categories:    {}", stats.categories);
            println!("  Statuses:      {:?}", dataset.index.statuses());
            println!("  In collection: {}", in_collection);
        }
    }

    Ok(())
}

/// GET a JSON endpoint and pretty-print the body, failing on non-2xx
async fn get_json(client: &Client, url: String, query: &[(&str, String)]) -> anyhow::Result<()> {
    let response = client
        .get(&url)
        .query(query)
        .send()
        .await
        .with_context(|| format!("request to {} failed", url))?;

    let status = response.status();
    let body: serde_json::Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        anyhow::bail!("server responded with {}", status);
    }
    Ok(())
}
