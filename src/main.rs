use clap::{Parser, Subcommand};
use ops_index::Result;
use ops_index::commands::{
    add_automation, add_dashboard, add_document, add_kb_entry, delete_document, delete_kb_entry,
    import_documents, recommend_automations, recommend_dashboards, search, show_config,
    show_status,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ops-index")]
#[command(about = "Retrieval index for operations content with keyword search and recommendations")]
#[command(version)]
struct Cli {
    /// Override the base directory holding config and index files
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the active configuration
    Config {
        /// Write a default config.toml if none exists
        #[arg(long)]
        init: bool,
    },
    /// Index a document from a plain-text file
    AddDocument {
        /// Entity id in the system of record
        id: String,
        /// Path to the extracted text content
        file: PathBuf,
        /// Display title; defaults to the file name
        #[arg(long)]
        title: Option<String>,
    },
    /// Index a knowledge base entry from a plain-text file
    AddKb {
        id: String,
        file: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Index an automation description
    AddAutomation {
        id: String,
        name: String,
        description: String,
    },
    /// Index a dashboard description
    AddDashboard {
        id: String,
        name: String,
        description: String,
    },
    /// Remove a document from the index
    DeleteDocument { id: String },
    /// Remove a knowledge base entry from the index
    DeleteKb { id: String },
    /// Bulk-index every .txt/.md file in a directory as documents
    Import { dir: PathBuf },
    /// Search indexed chunks
    Search {
        query: String,
        /// Maximum number of results
        #[arg(long)]
        limit: Option<usize>,
        /// Search knowledge base entries instead of documents
        #[arg(long)]
        knowledge_base: bool,
    },
    /// Recommend automations for the given text
    RecommendAutomations {
        text: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Recommend dashboards for the given text
    RecommendDashboards {
        text: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show per-kind counts and sample chunks
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config { init } => {
            show_config(cli.base_dir, init)?;
        }
        Commands::AddDocument { id, file, title } => {
            add_document(cli.base_dir, id, file, title).await?;
        }
        Commands::AddKb {
            id,
            file,
            title,
            category,
        } => {
            add_kb_entry(cli.base_dir, id, file, title, category).await?;
        }
        Commands::AddAutomation {
            id,
            name,
            description,
        } => {
            add_automation(cli.base_dir, id, name, description).await?;
        }
        Commands::AddDashboard {
            id,
            name,
            description,
        } => {
            add_dashboard(cli.base_dir, id, name, description).await?;
        }
        Commands::DeleteDocument { id } => {
            delete_document(cli.base_dir, id).await?;
        }
        Commands::DeleteKb { id } => {
            delete_kb_entry(cli.base_dir, id).await?;
        }
        Commands::Import { dir } => {
            import_documents(cli.base_dir, dir).await?;
        }
        Commands::Search {
            query,
            limit,
            knowledge_base,
        } => {
            search(cli.base_dir, query, limit, knowledge_base).await?;
        }
        Commands::RecommendAutomations { text, limit } => {
            recommend_automations(cli.base_dir, text, limit).await?;
        }
        Commands::RecommendDashboards { text, limit } => {
            recommend_dashboards(cli.base_dir, text, limit).await?;
        }
        Commands::Status => {
            show_status(cli.base_dir).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn cli_parsing() {
        let cli = Cli::try_parse_from(["ops-index", "status"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            matches!(parsed.command, Commands::Status);
        }
    }

    #[test]
    fn search_with_limit() {
        let cli = Cli::try_parse_from(["ops-index", "search", "outage report", "--limit", "5"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::Search { query, limit, .. } = parsed.command {
                assert_eq!(query, "outage report");
                assert_eq!(limit, Some(5));
            }
        }
    }

    #[test]
    fn add_document_requires_id_and_file() {
        let cli = Cli::try_parse_from(["ops-index", "add-document", "doc1"]);
        assert!(cli.is_err());

        let cli = Cli::try_parse_from(["ops-index", "add-document", "doc1", "notes.txt"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn add_kb_with_category() {
        let cli = Cli::try_parse_from([
            "ops-index",
            "add-kb",
            "kb-1",
            "vpn.txt",
            "--category",
            "networking",
        ]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            if let Commands::AddKb { id, category, .. } = parsed.command {
                assert_eq!(id, "kb-1");
                assert_eq!(category, Some("networking".to_string()));
            }
        }
    }

    #[test]
    fn global_base_dir_flag() {
        let cli = Cli::try_parse_from(["ops-index", "status", "--base-dir", "/tmp/ops"]);
        assert!(cli.is_ok());

        if let Ok(parsed) = cli {
            assert_eq!(parsed.base_dir, Some(PathBuf::from("/tmp/ops")));
        }
    }

    #[test]
    fn invalid_command() {
        let cli = Cli::try_parse_from(["ops-index", "invalid"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
        }
    }

    #[test]
    fn help_message() {
        let cli = Cli::try_parse_from(["ops-index", "--help"]);
        assert!(cli.is_err());

        if let Err(err) = cli {
            assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        }
    }
}
