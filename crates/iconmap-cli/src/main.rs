use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;

use iconmap_core::scan::require_root;
use iconmap_core::settings::resolve_path;
use iconmap_core::{
    check_catalog, run_sync, Catalog, IconMapError, IconResolver, LookupEntry, Mode, Result,
    Settings, SyncOptions, SyncSummary,
};

mod args;
mod logger;
use args::{Cli, Commands, ConfigAction, ModeArg, PathArgs, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();

    logger::init_cli_logger(cli.verbose, cli.quiet);

    let base_dir = cli.base_dir.unwrap_or_else(|| PathBuf::from("."));

    let result = match cli.command {
        Some(Commands::Sync {
            mode,
            paths,
            prefix,
            scoped,
            dry_run,
        }) => handle_sync(&base_dir, mode, &paths, prefix, scoped, dry_run, cli.quiet),
        Some(Commands::Check { paths }) => handle_check(&base_dir, &paths, cli.quiet),
        Some(Commands::Lookup {
            category,
            json,
            config,
        }) => handle_lookup(&base_dir, category.as_deref(), json, config),
        Some(Commands::Config { action }) => handle_config(action, &base_dir),
        Some(Commands::Completions { shell }) => {
            handle_completions(shell);
            Ok(())
        }
        None => {
            Cli::command().print_help().ok();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "iconmap", &mut io::stdout());
}

/// Settings file values, then CLI/env overrides
fn build_options(base_dir: &Path, paths: &PathArgs) -> Result<SyncOptions> {
    let settings = Settings::load(base_dir)?;
    let mut options = settings.to_sync_options(base_dir);

    if let Some(official) = &paths.official {
        options.official = resolve_path(base_dir, official);
    }
    if let Some(manual) = &paths.manual {
        options.manual = Some(resolve_path(base_dir, manual));
    }
    if paths.no_manual {
        options.manual = None;
    }
    if let Some(config) = &paths.config {
        options.catalog = resolve_path(base_dir, config);
    }

    Ok(options)
}

fn handle_sync(
    base_dir: &Path,
    mode: Option<ModeArg>,
    paths: &PathArgs,
    prefix: Option<String>,
    scoped: bool,
    dry_run: bool,
    quiet: bool,
) -> Result<()> {
    let mut options = build_options(base_dir, paths)?;
    if let Some(mode) = mode {
        options.mode = match mode {
            ModeArg::Merge => Mode::Merge,
            ModeArg::Rebuild => Mode::Rebuild,
        };
    }
    if let Some(prefix) = prefix {
        options.rules.target_prefix = prefix;
    }
    options.rules.scoped |= scoped;
    options.dry_run = dry_run;

    let outcome = run_sync(&options)?;

    if dry_run {
        print!("{}", outcome.yaml);
        return Ok(());
    }

    if quiet {
        return Ok(());
    }

    println!();
    println!("Catalog: {}", options.catalog.display());
    println!("Mode: {}", options.mode.to_string().cyan());
    println!();

    match outcome.summary {
        SyncSummary::Merged(report) => {
            if report.is_unchanged() {
                println!("{}", "Already up to date.".green());
                return Ok(());
            }
            for name in &report.created_categories {
                println!("  {} {}", "[NEW]".green(), name);
            }
            for change in &report.removed {
                println!("  {} {} / {}", "[DEL]".red(), change.category, change.source);
            }
            println!();
            println!(
                "{} {} added, {} removed, {} new categories",
                "Merged:".green(),
                report.added.len(),
                report.removed.len(),
                report.created_categories.len()
            );
        }
        SyncSummary::Rebuilt {
            categories,
            services,
        } => {
            println!(
                "{} {} categories, {} services",
                "Rebuilt:".green(),
                categories,
                services
            );
        }
    }

    Ok(())
}

fn handle_check(base_dir: &Path, paths: &PathArgs, quiet: bool) -> Result<()> {
    let options = build_options(base_dir, paths)?;
    let catalog = Catalog::load(&options.catalog)?;

    let mut roots = vec![options.official.clone()];
    roots.extend(options.manual.clone());
    for root in &roots {
        require_root(root)?;
    }
    let resolver = IconResolver::new(&roots)?;
    let report = check_catalog(&catalog, &resolver);

    if !quiet {
        println!();
        for (entry, candidates) in &report.ambiguous {
            println!(
                "  {} {} / {} ({} files)",
                "[DUP]".yellow(),
                entry.category,
                entry.source,
                candidates.len()
            );
        }
        for entry in &report.missing {
            println!("  {} {} / {}", "[MISSING]".red(), entry.category, entry.source);
        }
        if !report.ambiguous.is_empty() || !report.missing.is_empty() {
            println!();
        }
        println!(
            "{} {} found, {} ambiguous, {} missing",
            "Checked:".cyan(),
            report.found,
            report.ambiguous.len(),
            report.missing.len()
        );
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(IconMapError::MissingIcons {
            count: report.missing.len(),
        })
    }
}

fn handle_lookup(
    base_dir: &Path,
    category: Option<&str>,
    json: bool,
    config: Option<PathBuf>,
) -> Result<()> {
    let catalog_path = match config {
        Some(path) => resolve_path(base_dir, &path),
        None => Settings::load(base_dir)?.to_sync_options(base_dir).catalog,
    };
    let catalog = Catalog::load(&catalog_path)?;

    let entries: Vec<_> = catalog
        .lookup()
        .into_iter()
        .filter(|e| category.map_or(true, |c| e.category == c))
        .collect();

    if json {
        println!("{}", render_json(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No services found.");
        return Ok(());
    }

    let mut current: Option<&str> = None;
    for entry in &entries {
        if current != Some(entry.category.as_str()) {
            println!();
            println!("{}", entry.category.cyan().bold());
            current = Some(entry.category.as_str());
        }
        let fit = if entry.fit_to_canvas { " (fit)" } else { "" };
        println!("  {} -> {}{}", entry.source, entry.target.green(), fit.dimmed());
    }
    println!();

    Ok(())
}

fn render_json(entries: &[LookupEntry]) -> Result<String> {
    serde_json::to_string_pretty(entries).map_err(|e| IconMapError::Io(io::Error::from(e)))
}

fn handle_config(action: ConfigAction, base_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let settings = Settings::load(base_dir)?;
            match settings.get(&key) {
                Some(value) => println!("{}", value),
                None => return Err(IconMapError::SettingsKeyNotFound { key }),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut settings = Settings::load(base_dir)?;
            settings.set(&key, &value)?;
            settings.save(base_dir)?;
            println!("{} {} = {}", "Set:".green(), key, value);
        }
        ConfigAction::List => {
            let settings = Settings::load(base_dir)?;
            println!();
            for (key, value) in settings.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Path => {
            println!("{}", Settings::path(base_dir).display());
        }
        ConfigAction::Init => {
            let path = Settings::init(base_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_json_lists_every_row() {
        let entries = vec![LookupEntry {
            category: "Compute".to_string(),
            source: "Virtual Machine".to_string(),
            target: "VirtualMachine".to_string(),
            fit_to_canvas: true,
        }];

        let json = render_json(&entries).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["category"], "Compute");
        assert_eq!(parsed[0]["fit_to_canvas"], true);
        assert_eq!(render_json(&[]).unwrap(), "[]");
    }
}
