use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use cardy_core::{ContextScope, DEFAULT_MATCH_COUNT, DEFAULT_SIMILARITY_THRESHOLD, DocumentContent};
use cardy_embeddings::{EmbeddingClient, EmbeddingProvider};
use cardy_http::{AppState, create_router};
use cardy_jira::JiraClient;
use cardy_llm::LlmClient;
use cardy_service::{
    ChatService, GenerationService, IngestService, ProjectService, RetrievalService,
};
use cardy_storage::PgStorage;
use cardy_storage::traits::Storage;

#[derive(Parser)]
#[command(name = "cardy")]
#[command(about = "Document-grounded assistant and artifact generator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        #[arg(short, long, default_value = "8787")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Ingest a text file into a project and process it
    Ingest {
        file: PathBuf,
        #[arg(short, long)]
        project: Uuid,
        /// Display title; defaults to the file name
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Similarity search over stored chunks
    Query {
        text: String,
        #[arg(short, long)]
        project: Option<Uuid>,
        #[arg(short, long, default_value = "8")]
        limit: usize,
    },
    /// List projects
    Projects,
}

fn openai_api_key() -> Result<String> {
    std::env::var("OPENAI_API_KEY")
        .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY environment variable must be set"))
}

fn api_base_url() -> String {
    std::env::var("CARDY_API_URL").unwrap_or_else(|_| "https://api.openai.com".to_owned())
}

async fn connect_storage() -> Result<Arc<dyn Storage>> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable must be set"))?;
    let storage = PgStorage::new(&url).await.context("connecting to PostgreSQL")?;
    Ok(Arc::new(storage))
}

fn embeddings() -> Result<Arc<dyn EmbeddingProvider>> {
    Ok(Arc::new(EmbeddingClient::new(openai_api_key()?, api_base_url())?))
}

/// Jira is optional: without credentials the server runs with the Jira
/// routes answering 503.
fn jira_client() -> Result<Option<Arc<JiraClient>>> {
    let (base_url, email, token) = match (
        std::env::var("JIRA_BASE_URL"),
        std::env::var("JIRA_EMAIL"),
        std::env::var("JIRA_API_TOKEN"),
    ) {
        (Ok(b), Ok(e), Ok(t)) => (b, e, t),
        _ => return Ok(None),
    };
    Ok(Some(Arc::new(JiraClient::new(base_url, email, token)?)))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => {
            let storage = connect_storage().await?;
            let embeddings = embeddings()?;
            let llm = Arc::new(LlmClient::new(openai_api_key()?, api_base_url())?);

            let retrieval =
                Arc::new(RetrievalService::new(storage.clone(), embeddings.clone()));
            let state = Arc::new(AppState {
                projects: Arc::new(ProjectService::new(storage.clone())),
                ingest: Arc::new(IngestService::new(storage.clone(), embeddings)),
                retrieval: retrieval.clone(),
                chat: Arc::new(ChatService::new(retrieval.clone(), llm.clone())),
                generation: Arc::new(GenerationService::new(storage, retrieval, llm)),
                jira: jira_client()?,
            });

            let router = create_router(state);
            let addr = format!("{host}:{port}");
            tracing::info!("starting HTTP server on {addr}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            axum::serve(listener, router).await?;
        },
        Commands::Ingest { file, project, title } => {
            let storage = connect_storage().await?;
            let service = IngestService::new(storage, embeddings()?);

            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let file_name = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "upload.txt".to_owned());
            let title = title.unwrap_or_else(|| file_name.clone());
            let size_bytes = text.len() as i64;

            let document = service
                .ingest(
                    project,
                    &title,
                    &file_name,
                    None,
                    Some("text/plain"),
                    size_bytes,
                    &DocumentContent::Raw(text),
                )
                .await?;
            let report = service.process(document.id).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        },
        Commands::Query { text, project, limit } => {
            let storage = connect_storage().await?;
            let service = RetrievalService::new(storage, embeddings()?);

            let scope = project.map(ContextScope::project).unwrap_or_default();
            let limit = if limit == 0 { DEFAULT_MATCH_COUNT } else { limit };
            let results =
                service.search(&text, &scope, DEFAULT_SIMILARITY_THRESHOLD, limit).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        },
        Commands::Projects => {
            let storage = connect_storage().await?;
            let service = ProjectService::new(storage);
            let projects = service.list_projects().await?;
            println!("{}", serde_json::to_string_pretty(&projects)?);
        },
    }

    Ok(())
}
