use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::config::{Config, get_base_dir};
use crate::store::RetrievalStore;
use crate::store::models::ScoredResult;

fn load_config(base_dir: Option<PathBuf>) -> Result<Config> {
    let base_dir = match base_dir {
        Some(dir) => dir,
        None => get_base_dir().context("Failed to resolve the base directory")?,
    };
    Config::load(base_dir)
}

fn open_store(base_dir: Option<PathBuf>) -> Result<(Config, RetrievalStore)> {
    let config = load_config(base_dir)?;
    let store = RetrievalStore::open(&config).context("Failed to open the retrieval store")?;
    Ok((config, store))
}

/// Show the active configuration, optionally writing a default config file
#[inline]
pub fn show_config(base_dir: Option<PathBuf>, init: bool) -> Result<()> {
    let config = load_config(base_dir)?;

    if init && !config.config_file_path().exists() {
        config.save()?;
        println!("Wrote default config to {}", config.config_file_path().display());
    }

    println!("Base directory: {}", config.base_dir.display());
    println!("Index directory: {}", config.index_dir_path().display());
    println!(
        "Chunking: {} characters per chunk, {} overlap",
        config.chunking.chunk_size, config.chunking.overlap
    );
    println!(
        "Search: top {} results, recommend top {}, sample size {}",
        config.search.default_top_k, config.search.recommend_top_k, config.search.sample_size
    );

    Ok(())
}

/// Index a document from a plain-text file
#[inline]
pub async fn add_document(
    base_dir: Option<PathBuf>,
    id: String,
    file: PathBuf,
    title: Option<String>,
) -> Result<()> {
    let (_, store) = open_store(base_dir)?;
    let content = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let title = title.unwrap_or_else(|| file_stem(&file));

    let vector_id = store.add_document(&id, &title, &content).await?;

    println!("Indexed document '{}' as {}", title, vector_id);
    Ok(())
}

/// Index a knowledge base entry from a plain-text file
#[inline]
pub async fn add_kb_entry(
    base_dir: Option<PathBuf>,
    id: String,
    file: PathBuf,
    title: Option<String>,
    category: Option<String>,
) -> Result<()> {
    let (_, store) = open_store(base_dir)?;
    let content = fs::read_to_string(&file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let title = title.unwrap_or_else(|| file_stem(&file));

    let vector_id = store
        .add_knowledge_base_entry(&id, &title, &content, category.as_deref())
        .await?;

    println!("Indexed knowledge base entry '{}' as {}", title, vector_id);
    Ok(())
}

/// Index an automation description
#[inline]
pub async fn add_automation(
    base_dir: Option<PathBuf>,
    id: String,
    name: String,
    description: String,
) -> Result<()> {
    let (_, store) = open_store(base_dir)?;
    let vector_id = store.add_automation(&id, &name, &description).await?;
    println!("Indexed automation '{}' as {}", name, vector_id);
    Ok(())
}

/// Index a dashboard description
#[inline]
pub async fn add_dashboard(
    base_dir: Option<PathBuf>,
    id: String,
    name: String,
    description: String,
) -> Result<()> {
    let (_, store) = open_store(base_dir)?;
    let vector_id = store.add_dashboard(&id, &name, &description).await?;
    println!("Indexed dashboard '{}' as {}", name, vector_id);
    Ok(())
}

/// Remove a document from the index
#[inline]
pub async fn delete_document(base_dir: Option<PathBuf>, id: String) -> Result<()> {
    let (_, store) = open_store(base_dir)?;
    store.delete_document(&id).await?;
    println!("Deleted document {}", id);
    Ok(())
}

/// Remove a knowledge base entry from the index
#[inline]
pub async fn delete_kb_entry(base_dir: Option<PathBuf>, id: String) -> Result<()> {
    let (_, store) = open_store(base_dir)?;
    store.delete_knowledge_base_entry(&id).await?;
    println!("Deleted knowledge base entry {}", id);
    Ok(())
}

/// Bulk-index every `.txt` and `.md` file under a directory as documents,
/// using each file's stem as its id and title
#[inline]
pub async fn import_documents(base_dir: Option<PathBuf>, dir: PathBuf) -> Result<()> {
    let (_, store) = open_store(base_dir)?;

    let files: Vec<PathBuf> = WalkDir::new(&dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| !entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt") || ext.eq_ignore_ascii_case("md"))
        })
        .collect();

    if files.is_empty() {
        println!("No .txt or .md files found under {}", dir.display());
        return Ok(());
    }

    info!("Importing {} files from {}", files.len(), dir.display());

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?,
    );

    let mut indexed = 0_usize;
    for file in &files {
        let id = file_stem(file);
        progress.set_message(id.clone());

        match fs::read_to_string(file) {
            Ok(content) => {
                store.add_document(&id, &id, &content).await?;
                indexed += 1;
            }
            Err(e) => {
                warn!("Skipping {}: {}", file.display(), e);
            }
        }

        progress.inc(1);
    }
    progress.finish_and_clear();

    println!("Imported {} of {} files as documents", indexed, files.len());
    Ok(())
}

/// Search document or knowledge base chunks and print the ranked results
#[inline]
pub async fn search(
    base_dir: Option<PathBuf>,
    query: String,
    limit: Option<usize>,
    knowledge_base: bool,
) -> Result<()> {
    let (config, store) = open_store(base_dir)?;
    let top_k = limit.unwrap_or(config.search.default_top_k);

    let results = if knowledge_base {
        store.search_knowledge_base(&query, top_k).await
    } else {
        store.search(&query, top_k).await
    };

    if results.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    for (rank, result) in results.iter().enumerate() {
        print_result(rank + 1, result);
    }

    Ok(())
}

/// Recommend automations for the given free text
#[inline]
pub async fn recommend_automations(
    base_dir: Option<PathBuf>,
    text: String,
    limit: Option<usize>,
) -> Result<()> {
    let (config, store) = open_store(base_dir)?;
    let top_k = limit.unwrap_or(config.search.recommend_top_k);

    let ids = store.recommend_automations(&text, top_k).await;
    print_recommendations("automations", &ids);
    Ok(())
}

/// Recommend dashboards for the given free text
#[inline]
pub async fn recommend_dashboards(
    base_dir: Option<PathBuf>,
    text: String,
    limit: Option<usize>,
) -> Result<()> {
    let (config, store) = open_store(base_dir)?;
    let top_k = limit.unwrap_or(config.search.recommend_top_k);

    let ids = store.recommend_dashboards(&text, top_k).await;
    print_recommendations("dashboards", &ids);
    Ok(())
}

/// Print per-kind counts and a sample of stored chunks
#[inline]
pub async fn show_status(base_dir: Option<PathBuf>) -> Result<()> {
    let (config, store) = open_store(base_dir)?;

    let stats = store.stats(config.search.sample_size).await;
    let rendered =
        serde_json::to_string_pretty(&stats).context("Failed to render store statistics")?;
    println!("{}", rendered);

    Ok(())
}

fn print_result(rank: usize, result: &ScoredResult) {
    let preview: String = result.content.chars().take(160).collect();
    println!("{}. score {:.2}", rank, result.relevance_score);
    for (key, value) in &result.metadata {
        println!("   {}: {}", key, value);
    }
    println!("   {}", preview.replace('\n', " "));
}

fn print_recommendations(kind: &str, ids: &[String]) {
    if ids.is_empty() {
        println!("No related {} found", kind);
    } else {
        println!("Related {}: {}", kind, ids.join(", "));
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("untitled")
        .to_string()
}
