//! Command line access to a Dexter REST API server.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dexter_client::{
    AnnotateOptions, ClientConfig, DexterClient, EntityRef, ParamPrecedence, MILNE_WITTEN,
};
use serde_json::Value;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "dexter")]
#[command(about = "Query a Dexter entity-linking server")]
#[command(version)]
struct Cli {
    /// Server URL (without the /rest/ prefix)
    #[arg(long, env = "DEXTER_URL")]
    url: String,

    /// Request timeout in seconds
    #[arg(long, env = "DEXTER_TIMEOUT_SECS", default_value_t = 30)]
    timeout: u64,

    /// Let call parameters override the default `lp` parameter
    #[arg(long, env = "DEXTER_EXPLICIT_PARAMS_WIN")]
    explicit_params_win: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Partition text into plain text and linked mentions
    NiceAnnotate {
        text: String,

        #[arg(long, default_value_t = 0.5)]
        min_conf: f64,
    },

    /// Raw annotate response
    Annotate {
        text: String,

        /// Include entity names
        #[arg(long)]
        wikiname: bool,

        #[arg(long, default_value_t = 0.5)]
        min_conf: f64,

        #[arg(long, default_value_t = 50)]
        max_spots: u32,
    },

    /// Mentions that could refer to an entity
    Spot {
        text: String,

        #[arg(long)]
        wikiname: bool,
    },

    /// Id of an entity title
    GetId { title: String },

    /// Description of an entity
    Desc {
        entity: String,

        #[arg(long)]
        title_only: bool,
    },

    /// Candidate entities for a query
    Candidates {
        query: String,

        #[arg(short, default_value_t = 10)]
        n: u32,
    },

    /// Relatedness between two entities
    Relatedness {
        entity1: String,
        entity2: String,

        #[arg(long, default_value = MILNE_WITTEN)]
        rel: String,

        #[arg(long)]
        wikiname: bool,
    },

    /// Entities linked by an entity
    Targets(EntityArgs),

    /// Entities linking to an entity
    Sources(EntityArgs),

    /// Categories of an entity
    Categories(EntityArgs),

    /// Entities belonging to a category
    Belonging(EntityArgs),

    /// Parent categories of a category
    Parents(EntityArgs),

    /// Child categories of a category
    Children(EntityArgs),
}

#[derive(clap::Args)]
struct EntityArgs {
    /// Numeric id or title
    entity: String,

    #[arg(long)]
    wikiname: bool,
}

/// An integer argument is an id, anything else a title.
fn entity_ref(arg: &str) -> EntityRef {
    match arg.parse::<i64>() {
        Ok(id) => EntityRef::Id(id),
        Err(_) => EntityRef::Title(arg.to_string()),
    }
}

fn client_config(cli: &Cli) -> ClientConfig {
    let precedence = if cli.explicit_params_win {
        ParamPrecedence::ExplicitWins
    } else {
        ParamPrecedence::DefaultsWin
    };
    ClientConfig::new(&cli.url)
        .with_timeout(Duration::from_secs(cli.timeout))
        .with_precedence(precedence)
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,dexter_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let client = DexterClient::with_config(client_config(&cli))
        .context("Failed to create Dexter client")?;
    tracing::debug!(base_url = client.base_url(), "Dexter client ready");

    let output = match cli.command {
        Commands::NiceAnnotate { text, min_conf } => {
            let segments = client.nice_annotate(&text, min_conf).await?;
            serde_json::to_value(segments)?
        }
        Commands::Annotate {
            text,
            wikiname,
            min_conf,
            max_spots,
        } => {
            let options = AnnotateOptions::default()
                .wikiname(wikiname)
                .min_conf(min_conf)
                .max_spots(max_spots);
            client.annotate(&text, &options).await?
        }
        Commands::Spot { text, wikiname } => client.spot(&text, wikiname).await?,
        Commands::GetId { title } => Value::from(client.get_id(&title).await?),
        Commands::Desc { entity, title_only } => {
            client.get_desc(entity_ref(&entity), title_only).await?
        }
        Commands::Candidates { query, n } => client.get_candidates(&query, n).await?,
        Commands::Relatedness {
            entity1,
            entity2,
            rel,
            wikiname,
        } => {
            client
                .relatedness(entity_ref(&entity1), entity_ref(&entity2), &rel, wikiname)
                .await?
        }
        Commands::Targets(args) => {
            client
                .get_target_entities(entity_ref(&args.entity), args.wikiname)
                .await?
        }
        Commands::Sources(args) => {
            client
                .get_source_entities(entity_ref(&args.entity), args.wikiname)
                .await?
        }
        Commands::Categories(args) => {
            client
                .get_entity_categories(entity_ref(&args.entity), args.wikiname)
                .await?
        }
        Commands::Belonging(args) => {
            client
                .get_belonging_entities(entity_ref(&args.entity), args.wikiname)
                .await?
        }
        Commands::Parents(args) => {
            client
                .get_parent_categories(entity_ref(&args.entity), args.wikiname)
                .await?
        }
        Commands::Children(args) => {
            client
                .get_child_categories(entity_ref(&args.entity), args.wikiname)
                .await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
