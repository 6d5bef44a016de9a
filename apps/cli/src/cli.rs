use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "DocuSearch command-line client", long_about = None)]
pub struct Cli {
    /// Server root URL (overrides the configuration file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Session cookie for authenticated requests, e.g. "session=..."
    #[arg(long, global = true)]
    pub session: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload one or more PDF documents
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Document category
        #[arg(long)]
        category: Option<String>,

        /// Bytes per chunk for large files
        #[arg(long)]
        chunk_size: Option<usize>,

        /// Validate a single file against the basic form limit (16 MB)
        #[arg(long)]
        basic: bool,
    },

    /// Validate a query and follow the progress of its AI search
    Search {
        query: String,

        /// Server-side id of the running search
        #[arg(long)]
        query_id: String,
    },

    /// Show example searches seeded from the document topics
    Suggest {
        /// Maximum number of suggestions
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print rotating example questions for the search box
    Placeholders {
        #[arg(long, default_value_t = 5)]
        count: usize,
    },

    #[command(subcommand)]
    /// Onboarding tour
    Tour(TourCommands),

    /// Manage a document's thumbnail
    Thumbnail {
        document_id: String,

        #[command(subcommand)]
        action: ThumbnailCommands,
    },

    #[command(subcommand)]
    /// Inspect or create the configuration file
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum TourCommands {
    /// Show the planned steps and whether the tour would open by itself
    Status,
    /// Walk through every step, recording progress on the server
    Run,
    /// Clear tour progress and start over
    Reset,
    /// Stop the tour from opening by itself
    Dismiss,
}

#[derive(Subcommand, Debug)]
pub enum ThumbnailCommands {
    /// Upload a custom thumbnail image
    Upload { image: Option<PathBuf> },
    /// Generate the thumbnail from the document
    Generate,
    /// Restore the default thumbnail
    Reset,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
    /// Write the effective configuration to disk
    Init,
}
