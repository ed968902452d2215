//! Folio CLI: manage portfolio entries from the command line.
//!
//! Storage is configured through the environment (or `.env`): STORAGE_BACKEND,
//! LOCAL_STORAGE_PATH, LOCAL_STORAGE_BASE_URL, DOCUMENT_STORE_PATH.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use folio_admin::{EditSession, PortfolioCatalog, SubmissionCoordinator};
use folio_cli::{init_tracing, load_payload, truncate_string};
use folio_core::{AdminConfig, ErrorMetadata, ImageLimits};
use folio_storage::{create_document_store, create_storage};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "folio", about = "Portfolio content admin")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List portfolios, newest first
    List {
        /// Only this category
        #[arg(long)]
        category: Option<String>,
        /// Only portfolios the public pages show (requires --category)
        #[arg(long, requires = "category")]
        visible: bool,
        /// Output format: json or table
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Show one portfolio
    Show {
        /// Portfolio id
        id: String,
    },
    /// Create a portfolio, or update one with --id
    Submit(SubmitArgs),
    /// Delete a portfolio and the images it uploaded
    Delete {
        /// Portfolio id
        id: String,
    },
}

#[derive(clap::Args)]
struct SubmitArgs {
    /// Existing portfolio to update; omitted fields keep their stored value
    #[arg(long)]
    id: Option<String>,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    korean_title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    english_description: Option<String>,
    #[arg(long)]
    project: Option<String>,
    #[arg(long)]
    client: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    subcategory: Option<String>,
    /// Hide the portfolio from the public pages
    #[arg(long)]
    disabled: bool,
    /// New thumbnail image file
    #[arg(long)]
    thumbnail: Option<PathBuf>,
    /// Detail image file to append (repeatable, kept in the given order)
    #[arg(long = "image")]
    images: Vec<PathBuf>,
    /// Position of an existing detail image to remove (repeatable)
    #[arg(long = "remove-image")]
    remove_images: Vec<usize>,
}

#[derive(Serialize)]
struct ListRow {
    id: String,
    title: String,
    category: String,
    images: usize,
    enabled: bool,
    created_at: String,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

fn apply(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

async fn submit(
    coordinator: &SubmissionCoordinator,
    catalog: &PortfolioCatalog,
    limits: ImageLimits,
    args: SubmitArgs,
) -> anyhow::Result<()> {
    let mut session = match &args.id {
        Some(id) => {
            let record = catalog
                .get(id)
                .await?
                .with_context(|| format!("Portfolio {} not found", id))?;
            EditSession::edit_with_limits(record, limits)
        }
        None => EditSession::create_with_limits(limits),
    };

    let draft = &mut session.draft;
    apply(&mut draft.english_title, args.title);
    apply(&mut draft.korean_title, args.korean_title);
    apply(&mut draft.korean_description, args.description);
    apply(&mut draft.english_description, args.english_description);
    apply(&mut draft.project, args.project);
    apply(&mut draft.client, args.client);
    apply(&mut draft.date, args.date);
    apply(&mut draft.category, args.category);
    apply(&mut draft.subcategory, args.subcategory);
    if args.disabled {
        draft.enabled = Some(false);
    }

    // Remove from the back so earlier positions stay valid
    let mut remove = args.remove_images;
    remove.sort_unstable();
    remove.dedup();
    for index in remove.into_iter().rev() {
        session.images.remove_at(index);
    }

    if let Some(path) = &args.thumbnail {
        let payload = load_payload(path).await?;
        session.thumbnail.choose(session.images.limits(), payload)?;
    }

    let mut payloads = Vec::with_capacity(args.images.len());
    for path in &args.images {
        payloads.push(load_payload(path).await?);
    }
    if !payloads.is_empty() {
        session.images.add_pending(payloads)?;
    }

    match coordinator.submit(&mut session).await {
        Ok(saved) => print_json(&saved),
        Err(e) => {
            for path in e.orphaned_blobs() {
                eprintln!("orphaned blob: {}", path);
            }
            Err(anyhow::anyhow!("{} ({})", e.client_message(), e))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = AdminConfig::from_env().context("Invalid configuration")?;
    let blobs = create_storage(&config).await?;
    let documents = create_document_store(&config).await?;
    tracing::debug!(
        backend = %config.storage_backend,
        required_fields = %config.required_fields,
        "Storage configured"
    );

    let coordinator =
        SubmissionCoordinator::new(blobs.clone(), documents.clone(), config.required_fields);
    let catalog = PortfolioCatalog::new(blobs, documents);

    match cli.command {
        Commands::List {
            category,
            visible,
            format,
        } => {
            let portfolios = match (&category, visible) {
                (Some(category), true) => catalog.list_visible(category).await?,
                (Some(category), false) => catalog.list_by_category(category).await?,
                (None, _) => catalog.list().await?,
            };

            if format == "json" {
                let rows: Vec<ListRow> = portfolios
                    .iter()
                    .map(|p| ListRow {
                        id: p.id.clone(),
                        title: p.english_title.clone(),
                        category: p.category.clone(),
                        images: p.images.len(),
                        enabled: p.is_enabled(),
                        created_at: p.created_at.map(|d| d.to_string()).unwrap_or_default(),
                    })
                    .collect();
                print_json(&rows)?;
            } else {
                println!(
                    "{:<36} {:<30} {:<14} {:>6} {:<10}",
                    "ID", "TITLE", "CATEGORY", "IMAGES", "CREATED"
                );
                for p in &portfolios {
                    let marker = if p.is_enabled() { "" } else { " (hidden)" };
                    println!(
                        "{:<36} {:<30} {:<14} {:>6} {:<10}{}",
                        truncate_string(&p.id, 36),
                        truncate_string(&p.english_title, 30),
                        truncate_string(&p.category, 14),
                        p.images.len(),
                        p.created_at.map(|d| d.to_string()).unwrap_or_default(),
                        marker
                    );
                }
                println!("\n{} portfolio(s)", portfolios.len());
            }
        }
        Commands::Show { id } => {
            let portfolio = catalog
                .get(&id)
                .await?
                .with_context(|| format!("Portfolio {} not found", id))?;
            print_json(&portfolio)?;
        }
        Commands::Submit(args) => {
            let limits = ImageLimits::with_max_size(config.max_image_size_bytes);
            submit(&coordinator, &catalog, limits, args).await?;
        }
        Commands::Delete { id } => {
            let deleted = catalog.delete(&id).await?;
            print_json(&serde_json::json!({
                "success": true,
                "message": format!("Portfolio {} deleted", deleted.id)
            }))?;
        }
    }

    Ok(())
}
