use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::{info, warn};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

mod cli;
mod config;

use cli::Cli;
use cli::commands::{Commands, SubsectionCommands};
use config::Config;

use stackshare::brand::{
    BrandCandidate, BrandResolver, BrandfetchClient, DebouncedLookup, IconSource, LookupOutcome, icon_for,
};
use stackshare::catalog::ToolCatalog;
use stackshare::domain::{Category, SectionType, Tool};
use stackshare::selection::SectionState;
use stackshare::selector;
use stackshare::storage::JsonlStorage;
use stackshare::{StackService, StackView};

fn setup_logging(level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(env!("CARGO_PKG_NAME"))
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join(format!("{}.log", env!("CARGO_PKG_NAME")));

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    // RUST_LOG wins over the configured level
    let mut builder = env_logger::Builder::new();
    builder.filter_level(log::LevelFilter::Info);
    if let Some(level) = level {
        builder.parse_filters(level);
    }
    builder.parse_default_env();
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn open_service(config: &Config) -> Result<StackService<JsonlStorage>> {
    let catalog = match &config.catalog.path {
        Some(path) => ToolCatalog::from_file(path).context(format!("Failed to load catalog from {}", path.display()))?,
        None => ToolCatalog::builtin(),
    };
    let storage = JsonlStorage::new(&config.storage.data_dir)
        .context(format!("Failed to open storage at {}", config.storage.data_dir.display()))?;
    Ok(StackService::new(storage, catalog))
}

fn brand_client(config: &Config) -> Result<BrandfetchClient> {
    BrandfetchClient::new(config.brand.client_config()).context("Failed to create brand client")
}

async fn run_application(cli: &Cli, config: &Config) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    match &cli.command {
        Commands::Init {
            name,
            user,
            project_url,
        } => handle_init_command(name, user.as_deref(), project_url.as_deref(), config),
        Commands::List => handle_list_command(config),
        Commands::Show { stack } => handle_show_command(stack, cli.is_verbose(), config),
        Commands::Catalog { section, query, stack } => {
            handle_catalog_command(*section, query.as_deref(), stack.as_deref(), config)
        }
        Commands::Add {
            stack,
            section,
            tool,
            subsection,
            brand,
        } => handle_add_command(stack, *section, tool, subsection.as_deref(), *brand, config).await,
        Commands::Remove {
            stack,
            section,
            tool,
            subsection,
        } => handle_remove_command(stack, *section, tool, subsection.as_deref(), config),
        Commands::Pin {
            stack,
            section,
            tool,
            subsection,
        } => handle_pin_command(stack, *section, tool, subsection.as_deref(), config),
        Commands::Subsection { command } => handle_subsection_command(command, config),
        Commands::Search { name } => handle_search_command(name.as_deref(), config).await,
    }
}

fn handle_init_command(name: &str, user: Option<&str>, project_url: Option<&str>, config: &Config) -> Result<()> {
    let service = open_service(config)?;
    let stack = service.create_stack(name, user, project_url)?;
    println!("{} {} ({})", "Created stack:".green(), stack.name.bold(), stack.id);
    Ok(())
}

fn handle_list_command(config: &Config) -> Result<()> {
    let service = open_service(config)?;
    let stacks = service.list_stacks()?;
    if stacks.is_empty() {
        println!("{}", "No stacks yet. Create one with `stackshare init <name>`".yellow());
        return Ok(());
    }
    for stack in stacks {
        println!("{}  {}  {}", stack.id.dimmed(), stack.name.bold(), format_timestamp(stack.created_at));
    }
    Ok(())
}

fn format_timestamp(ms: i64) -> String {
    chrono::DateTime::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn format_tool(tool: &Tool, pinned: bool, verbose: bool, config: &Config) -> String {
    let mut line = if pinned {
        format!("{} {}", "*".yellow(), tool.name.bold())
    } else {
        format!("  {}", tool.name)
    };
    if let Some(domain) = tool.domain() {
        line.push_str(&format!(" {}", format!("({})", domain).dimmed()));
    }
    if verbose {
        let client_id = std::env::var(&config.brand.client_id_env).ok();
        let icon = match icon_for(tool, &config.brand.cdn_url, client_id.as_deref()) {
            IconSource::Image(url) => url,
            IconSource::Monogram(letter) => format!("[{}]", letter),
        };
        line.push_str(&format!(" {}", icon.dimmed()));
    }
    line
}

fn print_section(state: &SectionState, verbose: bool, config: &Config) {
    println!("{}", state.section().name.cyan().bold());

    let general = state.general_tools();
    if general.is_empty() && state.subsections().is_empty() {
        println!("    {}", "(empty)".dimmed());
    }
    for tool in general {
        println!("  {}", format_tool(tool, state.is_pinned(tool, None), verbose, config));
    }

    for subsection in state.subsections() {
        println!("  {} {}", subsection.name.magenta(), subsection.id.dimmed());
        let scope = Some(subsection.id.as_str());
        for tool in state.tools_in(scope) {
            println!("    {}", format_tool(tool, state.is_pinned(tool, scope), verbose, config));
        }
    }
}

fn handle_show_command(stack_id: &str, verbose: bool, config: &Config) -> Result<()> {
    let service = open_service(config)?;
    let StackView { stack, sections } = service.get_stack(stack_id)?;

    println!("{} {}", stack.name.bold(), stack.id.dimmed());
    if let Some(url) = &stack.project_url {
        println!("{}", url.blue());
    }
    println!("Updated {}", format_timestamp(stack.updated_at));
    for state in &sections {
        println!();
        print_section(state, verbose, config);
    }
    Ok(())
}

fn handle_catalog_command(
    section: Option<Category>,
    query: Option<&str>,
    stack: Option<&str>,
    config: &Config,
) -> Result<()> {
    let service = open_service(config)?;
    let view = match stack {
        Some(stack_id) => Some(service.get_stack(stack_id)?),
        None => None,
    };
    let categories = match section {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };
    let query = query.unwrap_or("");

    for category in categories {
        let tools = service.tools_by_category(category);
        let selected: Vec<Tool> = view
            .as_ref()
            .and_then(|v| v.section(category))
            .map(|state| state.assignments().iter().map(|a| a.tool.clone()).collect())
            .unwrap_or_default();
        let picker = selector::view(&tools, &selected, query);

        println!("{}", category.display_name().cyan().bold());
        if picker.exhausted {
            println!("  {}", "(every catalog tool is selected)".dimmed());
        }
        for tool in &picker.matches {
            println!("  {} {}", tool.name, format!("({})", tool.id).dimmed());
        }
        if picker.offer_custom {
            println!("  {} \"{}\" as a custom tool", "Add".green(), query.trim());
        }
    }
    Ok(())
}

/// Resolve free text to a tool, asking the brand resolver when requested.
///
/// Lookup failures are reported and the name falls back to a custom tool.
async fn resolve_tool(
    service: &StackService<JsonlStorage>,
    section: SectionType,
    name: &str,
    use_brand: bool,
    config: &Config,
) -> Result<Option<Tool>> {
    let in_catalog = service.catalog().find_in_category(section, name).is_some();
    if !use_brand || in_catalog {
        return Ok(service.resolve_tool(section, name, None));
    }

    let client = brand_client(config)?;
    let candidates = match client.search(name).await {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("Brand lookup for '{}' failed: {}", name, e);
            println!("{} {}", "Brand lookup failed:".yellow(), e);
            Vec::new()
        }
    };
    Ok(service.resolve_tool(section, name, candidates.first()))
}

async fn handle_add_command(
    stack: &str,
    section: SectionType,
    name: &str,
    subsection: Option<&str>,
    use_brand: bool,
    config: &Config,
) -> Result<()> {
    let service = open_service(config)?;
    let Some(tool) = resolve_tool(&service, section, name, use_brand, config).await? else {
        println!("{}", "Tool name is blank, nothing to add".yellow());
        return Ok(());
    };

    if service.assign(stack, section, tool.clone(), subsection)? {
        println!("{} {} to {}", "Added".green(), tool.name.bold(), section.display_name());
    } else {
        println!("{} is already in {}", tool.name.bold(), section.display_name());
    }
    Ok(())
}

fn handle_remove_command(
    stack: &str,
    section: SectionType,
    name: &str,
    subsection: Option<&str>,
    config: &Config,
) -> Result<()> {
    let service = open_service(config)?;
    let Some(tool) = service.resolve_tool(section, name, None) else {
        return Ok(());
    };

    if service.unassign(stack, section, &tool, subsection)? {
        println!("{} {} from {}", "Removed".red(), tool.name.bold(), section.display_name());
    } else {
        println!("{} is not in {}", tool.name.bold(), section.display_name());
    }
    Ok(())
}

fn handle_pin_command(
    stack: &str,
    section: SectionType,
    name: &str,
    subsection: Option<&str>,
    config: &Config,
) -> Result<()> {
    let service = open_service(config)?;
    let Some(tool) = service.resolve_tool(section, name, None) else {
        return Ok(());
    };

    if service.toggle_pin(stack, section, &tool, subsection)? {
        println!("{} {}", "Pinned".yellow(), tool.name.bold());
    } else {
        println!("{} {}", "Unpinned".dimmed(), tool.name.bold());
    }
    Ok(())
}

fn handle_subsection_command(command: &SubsectionCommands, config: &Config) -> Result<()> {
    let service = open_service(config)?;
    match command {
        SubsectionCommands::Add {
            stack,
            section,
            name,
            tools,
        } => {
            let tools: Vec<Tool> = tools
                .iter()
                .filter_map(|t| service.resolve_tool(*section, t, None))
                .collect();
            match service.create_subsection(stack, *section, name, tools)? {
                Some(id) => println!("{} {} ({})", "Created subsection".green(), name.trim().bold(), id),
                None => println!("{}", "Subsection name is blank, nothing created".yellow()),
            }
        }
        SubsectionCommands::Rename {
            stack,
            section,
            id,
            name,
        } => {
            if service.rename_subsection(stack, *section, id, name)? {
                println!("{} {} to {}", "Renamed".green(), id, name.trim().bold());
            }
        }
        SubsectionCommands::Delete { stack, section, id } => {
            service.delete_subsection(stack, *section, id)?;
            println!("{} {}", "Deleted subsection".red(), id);
        }
    }
    Ok(())
}

fn print_candidates(candidates: &[BrandCandidate]) {
    if candidates.is_empty() {
        println!("{}", "No brands found".yellow());
        return;
    }
    for candidate in candidates {
        let claimed = if candidate.claimed { "claimed".green() } else { "unclaimed".dimmed() };
        println!(
            "{}  {}  {}  {}",
            candidate.display_name().bold(),
            candidate.domain,
            claimed,
            candidate.brand_id.dimmed()
        );
    }
}

fn print_outcome(outcome: &LookupOutcome) {
    match &outcome.result {
        Ok(candidates) => {
            println!("{} {}", "Results for".cyan(), outcome.query.bold());
            print_candidates(candidates);
        }
        Err(e) => println!("{} {}", "Brand lookup failed:".yellow(), e),
    }
}

async fn handle_search_command(name: Option<&str>, config: &Config) -> Result<()> {
    let client = brand_client(config)?;
    match name {
        Some(name) => {
            let candidates = client.search(name).await.context("Brand search failed")?;
            print_candidates(&candidates);
            Ok(())
        }
        None => interactive_search(Arc::new(client), config).await,
    }
}

/// Read names line by line, debouncing lookups the way a search box would.
///
/// Only the newest line's results are printed; older lookups still in flight
/// are dropped.
async fn interactive_search(resolver: Arc<dyn BrandResolver>, config: &Config) -> Result<()> {
    let (lookup, mut outcomes) = DebouncedLookup::new(resolver, config.brand.debounce_config());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_shown = 0;

    println!("{}", "Type a name to search; an empty line or EOF quits".dimmed());
    loop {
        tokio::select! {
            line = lines.next_line() => match line.context("Failed to read input")? {
                Some(text) if !text.trim().is_empty() => {
                    lookup.on_input(&text);
                }
                _ => break,
            },
            Some(outcome) = outcomes.recv() => {
                last_shown = outcome.seq;
                print_outcome(&outcome);
            }
        }
    }

    // Input ended; wait for the newest lookup before exiting
    let latest = lookup.current();
    while last_shown < latest {
        let Some(outcome) = outcomes.recv().await else { break };
        last_shown = outcome.seq;
        print_outcome(&outcome);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(config.log_level.as_deref()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    run_application(&cli, &config).await.context("Application failed")?;

    Ok(())
}
