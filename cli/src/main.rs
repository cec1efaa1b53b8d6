mod storage;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use floorplan::demo::{DEMO_BUILDING_JSON, demo_building};
use floorplan::doc::Building;
use floorplan::error::DocumentError;
use floorplan::persist::{LoadSource, LoadTarget, PersistError, cache_building, resolve_load, viewer_url};
use floorplan::search::search;
use floorplan::session::EditorSession;
use serde_json::Value;

use crate::storage::FileStorage;

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Persist(#[from] PersistError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("failed to read {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "intramap-cli", about = "IntraMap building persistence CLI")]
struct Cli {
    #[arg(long, env = "INTRAMAP_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "INTRAMAP_CACHE_DIR", default_value = ".intramap-cache")]
    cache_dir: PathBuf,

    #[arg(long, env = "INTRAMAP_VIEWER_ORIGIN", help = "Origin used in printed viewer links; defaults to --base-url")]
    viewer_origin: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    viewer_origin: String,
    cache_dir: PathBuf,
}

impl CliContext {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    /// List stored buildings.
    List,
    /// Validate a building document and save it under an id derived from its name.
    Save {
        file: PathBuf,
        #[arg(long, help = "Rename the building before saving")]
        name: Option<String>,
    },
    /// Load a building by id or viewer link, falling back to the offline cache.
    Load {
        building: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Search a building's objects by label and tags.
    Search { building: String, query: String },
    /// Store the bundled demo building under `sample`.
    UploadSample,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();
    let ctx = CliContext {
        viewer_origin: cli.viewer_origin.unwrap_or_else(|| cli.base_url.clone()),
        base_url: cli.base_url,
        cache_dir: cli.cache_dir,
    };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::List => run_list(&ctx).await,
        Command::Save { file, name } => run_save(&ctx, file, name).await,
        Command::Load { building, json } => run_load(&ctx, &building, json).await,
        Command::Search { building, query } => run_search(&ctx, &building, &query).await,
        Command::UploadSample => run_upload_sample(&ctx).await,
    }
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    let response = reqwest::Client::new().get(ctx.url("/healthz")).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(PersistError::Server { status: status.as_u16(), message: "health check failed".to_owned() }.into());
    }
    println!("ok");
    Ok(())
}

async fn run_list(ctx: &CliContext) -> Result<(), CliError> {
    let response = reqwest::Client::new().get(ctx.url("/api/buildings")).send().await?;
    let json = read_api_response(response).await?;
    print_json(&json)
}

async fn run_save(ctx: &CliContext, file: PathBuf, name: Option<String>) -> Result<(), CliError> {
    let raw = std::fs::read_to_string(&file).map_err(|source| CliError::ReadFile { path: file.clone(), source })?;
    let building = Building::from_json(&raw)?;

    let mut session = EditorSession::default();
    session.load_document(building);
    if let Some(name) = name {
        session.rename_building(&name);
    }
    let (building_id, document) = session.prepare_cloud_save()?;

    let json = post_building(ctx, &building_id, &document).await?;
    print_json(&json)?;
    println!("{}", viewer_url(&ctx.viewer_origin, &building_id));
    Ok(())
}

async fn run_load(ctx: &CliContext, building: &str, json: bool) -> Result<(), CliError> {
    let target = parse_target(building)?;
    let (building, source) = load_target(ctx, &target).await?;

    if json {
        return print_json(&serde_json::to_value(&building)?);
    }
    println!("{}", describe(&building, source));
    for (floor_id, floor) in &building.floors {
        println!("  {floor_id}\t{}\t{} objects", floor.name, floor.objects.len());
    }
    Ok(())
}

async fn run_search(ctx: &CliContext, building: &str, query: &str) -> Result<(), CliError> {
    let target = parse_target(building)?;
    let (building, _) = load_target(ctx, &target).await?;

    let hits = search(&building, query);
    if hits.is_empty() {
        println!("No results found");
        return Ok(());
    }
    for hit in hits {
        println!("{}\t{}\t{}", hit.floor_name, hit.name, hit.tags);
    }
    Ok(())
}

async fn run_upload_sample(ctx: &CliContext) -> Result<(), CliError> {
    let target = LoadTarget::Demo;
    let response = reqwest::Client::new()
        .post(ctx.url(&format!("/api/buildings/{}", target.id())))
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body(DEMO_BUILDING_JSON)
        .send()
        .await?;
    let json = read_api_response(response).await?;
    print_json(&json)?;
    println!("{}", viewer_url(&ctx.viewer_origin, target.id()));
    Ok(())
}

// =============================================================================
// LOADING
// =============================================================================

/// Accept a bare id, a query string, or a full viewer link.
fn parse_target(raw: &str) -> Result<LoadTarget, PersistError> {
    match raw.split_once('?') {
        Some((_, query)) => LoadTarget::from_query(query),
        None if raw.contains("building=") => LoadTarget::from_query(raw),
        None => LoadTarget::from_id(raw),
    }
}

async fn load_target(ctx: &CliContext, target: &LoadTarget) -> Result<(Building, LoadSource), CliError> {
    match target {
        LoadTarget::Demo => Ok((demo_building()?, LoadSource::Demo)),
        LoadTarget::Remote(building_id) => {
            let remote = fetch_building(ctx, building_id).await;
            let mut storage = FileStorage::new(&ctx.cache_dir);
            Ok(resolve_load(building_id, remote, &mut storage)?)
        }
    }
}

/// One remote load attempt; no retry.
async fn fetch_building(ctx: &CliContext, building_id: &str) -> Result<Building, PersistError> {
    let response = reqwest::Client::new()
        .get(ctx.url(&format!("/api/buildings/{building_id}")))
        .send()
        .await
        .map_err(|e| PersistError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response.text().await.map_err(|e| PersistError::Transport(e.to_string()))?;
    if !(200..300).contains(&status) {
        return Err(remote_error(status, &body, building_id));
    }
    Ok(Building::from_json(&body)?)
}

/// Save a document remotely and, once the server accepts it, keep a copy in
/// the offline cache under the same id.
async fn post_building(ctx: &CliContext, building_id: &str, document: &Building) -> Result<Value, CliError> {
    let response = reqwest::Client::new()
        .post(ctx.url(&format!("/api/buildings/{building_id}")))
        .json(document)
        .send()
        .await?;
    let json = read_api_response(response).await?;
    let mut storage = FileStorage::new(&ctx.cache_dir);
    cache_building(&mut storage, building_id, document);
    Ok(json)
}

/// Classify a non-success API response.
fn remote_error(status: u16, body: &str, building_id: &str) -> PersistError {
    if status == 404 {
        return PersistError::NotFound(building_id.to_owned());
    }
    PersistError::Server { status, message: error_message(body) }
}

/// The API's `error` field, or the raw body when it is not an API error.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_owned))
        .unwrap_or_else(|| body.to_owned())
}

fn describe(building: &Building, source: LoadSource) -> String {
    let origin = match source {
        LoadSource::Remote => "server",
        LoadSource::Cache => "offline cache",
        LoadSource::Demo => "bundled demo",
    };
    format!(
        "{} ({}) from {origin}: {} floors, {} objects",
        building.name,
        building.building_id,
        building.floors.len(),
        building.object_count()
    )
}

// =============================================================================
// OUTPUT
// =============================================================================

async fn read_api_response(response: reqwest::Response) -> Result<Value, CliError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(PersistError::Server { status: status.as_u16(), message: error_message(&body) }.into());
    }
    Ok(serde_json::from_str(&body)?)
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
