//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - init/list/show: create and inspect stacks
//! - add/remove/pin: curate a section's tools
//! - subsection: manage user-named groupings
//! - catalog/search: browse the catalog and look up brands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stackshare::domain::Category;

/// Stackshare - curate your project's tech stack
#[derive(Parser, Debug)]
#[command(name = "stackshare")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Parse a section name (frontend, backend, ide, ai, other)
fn parse_section(s: &str) -> Result<Category, String> {
    Category::parse(s).ok_or_else(|| format!("unknown section '{}': expected frontend, backend, ide, ai or other", s))
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new stack with the five default sections
    Init {
        /// Stack name
        name: String,

        /// Owning user id
        #[arg(short, long)]
        user: Option<String>,

        /// Project URL
        #[arg(short, long)]
        project_url: Option<String>,
    },

    /// List all stacks
    List,

    /// Show a stack with its sections, subsections and pins
    Show {
        /// Stack ID
        stack: String,
    },

    /// List catalog tools, optionally for one section
    Catalog {
        #[arg(value_parser = parse_section)]
        section: Option<Category>,

        /// Only show tools whose name contains this text
        #[arg(short, long)]
        query: Option<String>,

        /// Hide tools already selected in this stack
        #[arg(short, long)]
        stack: Option<String>,
    },

    /// Add a tool to a section
    Add {
        /// Stack ID
        stack: String,

        #[arg(value_parser = parse_section)]
        section: Category,

        /// Tool name (catalog name or free text)
        tool: String,

        /// Subsection ID to add the tool to
        #[arg(short, long)]
        subsection: Option<String>,

        /// Look the name up with the brand resolver when it is not in the catalog
        #[arg(short, long)]
        brand: bool,
    },

    /// Remove a tool from a section
    Remove {
        /// Stack ID
        stack: String,

        #[arg(value_parser = parse_section)]
        section: Category,

        /// Tool name
        tool: String,

        #[arg(short, long)]
        subsection: Option<String>,
    },

    /// Toggle the pin on a selected tool
    Pin {
        /// Stack ID
        stack: String,

        #[arg(value_parser = parse_section)]
        section: Category,

        /// Tool name
        tool: String,

        #[arg(short, long)]
        subsection: Option<String>,
    },

    /// Subsection management commands
    Subsection {
        #[command(subcommand)]
        command: SubsectionCommands,
    },

    /// Search for brands by name, or interactively when no name is given
    Search {
        /// Name to look up
        name: Option<String>,
    },
}

/// Subsection management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SubsectionCommands {
    /// Create a subsection, optionally with initial tools
    Add {
        stack: String,

        #[arg(value_parser = parse_section)]
        section: Category,

        /// Subsection name
        name: String,

        /// Tools to assign to the new subsection
        tools: Vec<String>,
    },

    /// Rename a subsection
    Rename {
        stack: String,

        #[arg(value_parser = parse_section)]
        section: Category,

        /// Subsection ID
        id: String,

        /// New name
        name: String,
    },

    /// Delete a subsection with its tools and pins
    Delete {
        stack: String,

        #[arg(value_parser = parse_section)]
        section: Category,

        /// Subsection ID
        id: String,
    },
}
