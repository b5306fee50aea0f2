/// Claim Publisher command line
///
/// Resolves publish forms, publishes them through the SDK, searches and
/// uploads thumbnails using the same flows the client state is built on.
use anyhow::{Context, Result};
use chrono::Utc;
use claim_publisher::{
    claims::{my_channel_claims, Claim},
    publish::{self, PublishFormState, PublishOutcome},
    search::{flows::do_search, SearchOptions},
    Action, AppContext, ClientConfig,
};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "claim-publisher")]
#[command(about = "Publish claims, search content and upload thumbnails")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a publish form and send it to the SDK
    Publish {
        form: PathBuf,
        /// Validate with the SDK without broadcasting
        #[arg(long)]
        preview: bool,
        /// Existing claim (JSON) being edited
        #[arg(long)]
        editing: Option<PathBuf>,
        /// My channel claims (JSON array)
        #[arg(long)]
        channels: Option<PathBuf>,
    },

    /// Print the resolved publish payload without any network call
    Payload {
        form: PathBuf,
        #[arg(long)]
        channels: Option<PathBuf>,
    },

    /// Search for content
    Search {
        query: String,
        #[arg(long)]
        size: Option<u32>,
        #[arg(long)]
        from: Option<u32>,
        /// Include mature content
        #[arg(long)]
        nsfw: bool,
    },

    /// Upload a thumbnail image and print its URL
    Thumbnail { path: PathBuf },
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

async fn read_channels(path: Option<&Path>) -> Result<Vec<Claim>> {
    match path {
        Some(path) => read_json(path).await,
        None => Ok(Vec::new()),
    }
}

async fn run_publish(
    ctx: &AppContext,
    form_path: &Path,
    preview: bool,
    editing: Option<&Path>,
    channels: Option<&Path>,
) -> Result<()> {
    let mut form = PublishFormState::load(form_path)
        .await
        .with_context(|| format!("Failed to load form {}", form_path.display()))?;
    let channels = read_channels(channels).await?;

    let mut claims = Vec::new();
    let mut resolved = Vec::new();
    if let Some(path) = editing {
        let claim: Claim = read_json(path).await?;
        let uri = claim
            .permanent_url
            .clone()
            .unwrap_or_else(|| format!("lbry://{}#{}", claim.name, claim.claim_id));
        form.editing_uri = Some(uri.clone());
        form.claim_to_edit = Some(Box::new(claim.clone()));
        resolved.push((uri, claim.clone()));
        claims.push(claim);
    }

    ctx.store
        .dispatch_batch(vec![
            Action::SetMyClaims { claims, channels },
            Action::ResolveClaimsCompleted { resolved },
            Action::PrepareEdit(Box::new(form)),
        ])
        .await;

    match publish::do_publish(ctx, preview).await? {
        PublishOutcome::Preview(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        PublishOutcome::Published {
            claim,
            is_edit,
            reflector,
        } => {
            println!(
                "{} {}",
                if is_edit { "Updated" } else { "Published" },
                claim.permanent_url.as_deref().unwrap_or(&claim.claim_id)
            );
            if let Some(handle) = reflector {
                info!("Waiting for the file to reach the reflector");
                handle.await.context("Reflector check stopped unexpectedly")?;
            }
        }
    }

    Ok(())
}

async fn run_payload(form_path: &Path, channels: Option<&Path>) -> Result<()> {
    let form = PublishFormState::load(form_path)
        .await
        .with_context(|| format!("Failed to load form {}", form_path.display()))?;

    let mut state = claim_publisher::AppState::default();
    state = claim_publisher::store::reduce(
        state,
        &Action::SetMyClaims {
            claims: Vec::new(),
            channels: read_channels(channels).await?,
        },
    );

    let payload = publish::resolve_publish_payload(
        &form,
        None,
        &my_channel_claims(&state),
        Utc::now().timestamp(),
        false,
    )?;
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "claim_publisher=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if let Commands::Payload { form, channels } = &cli.command {
        return run_payload(form, channels.as_deref()).await;
    }

    // Load configuration
    let config = ClientConfig::from_env()?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Publish {
            form,
            preview,
            editing,
            channels,
        } => {
            run_publish(&ctx, &form, preview, editing.as_deref(), channels.as_deref()).await?;
        }
        Commands::Search {
            query,
            size,
            from,
            nsfw,
        } => {
            let options = SearchOptions {
                size,
                from,
                nsfw: nsfw.then_some(true),
                ..SearchOptions::default()
            };
            for uri in do_search(&ctx, &query, options).await? {
                println!("{}", uri);
            }
        }
        Commands::Thumbnail { path } => {
            let url = publish::do_upload_thumbnail_from_path(&ctx, &path).await?;
            println!("{}", url);
        }
        Commands::Payload { .. } => {}
    }

    Ok(())
}
