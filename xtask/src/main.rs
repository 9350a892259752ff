//! Development automation for kube-infra
//!
//! Usage: cargo xtask <command>
//!
//! Available commands:
//! - test: Run unit and scenario tests
//! - sync-apis: Refresh vendored API types via api-sync
//! - check-apis: Fail if vendored API types drifted from upstream
//! - ci: Run CI checks

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use xshell::{cmd, Shell};

const DEFAULT_SYNC_CONFIG: &str = "sync-config";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development automation for kube-infra")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run tests
    Test {
        /// Run only the builder scenario tests under tests/
        #[arg(long)]
        scenarios: bool,
    },
    /// Rewrite vendored API directories from their upstream repositories
    SyncApis {
        /// Directory holding the sync target lists
        #[arg(long, default_value = DEFAULT_SYNC_CONFIG)]
        config_dir: String,
    },
    /// Report drift between vendored API directories and upstream
    CheckApis {
        #[arg(long, default_value = DEFAULT_SYNC_CONFIG)]
        config_dir: String,
    },
    /// Run CI checks (format, clippy, test)
    Ci,
    /// Format code
    Format {
        /// Check formatting without modifying files
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    sh.change_dir(project_root()?);

    match cli.command {
        Commands::Test { scenarios } => test(&sh, scenarios),
        Commands::SyncApis { config_dir } => api_sync(&sh, &config_dir, false),
        Commands::CheckApis { config_dir } => api_sync(&sh, &config_dir, true),
        Commands::Ci => ci(&sh),
        Commands::Format { check } => format(&sh, check),
        Commands::Clippy => clippy(&sh),
    }
}

fn test(sh: &Shell, scenarios: bool) -> Result<()> {
    println!("🧪 Running tests...");

    if scenarios {
        cmd!(sh, "cargo test -p kube-infra --test '*'").run()?;
    } else {
        cmd!(sh, "cargo test --all").run()?;
    }

    println!("✅ All tests passed");
    Ok(())
}

fn api_sync(sh: &Shell, config_dir: &str, check: bool) -> Result<()> {
    if !Path::new(config_dir).is_dir() {
        anyhow::bail!("sync config directory {} not found", config_dir);
    }

    let check_flag = if check { Some("--check") } else { None };
    println!(
        "🔄 {} vendored APIs from {}...",
        if check { "Checking" } else { "Syncing" },
        config_dir
    );

    cmd!(
        sh,
        "cargo run --quiet --bin api-sync -- --config-dir {config_dir} {check_flag...}"
    )
    .run()
    .context("api-sync reported failures")?;

    println!("✅ Vendored APIs up to date");
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("🔍 Running CI checks...");

    println!("\n📝 Checking formatting...");
    format(sh, true)?;

    println!("\n🔧 Running clippy...");
    clippy(sh)?;

    println!("\n🧪 Running tests...");
    test(sh, false)?;

    println!("\n✅ All CI checks passed!");
    Ok(())
}

fn format(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
        println!("✅ Code formatting is correct");
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
        println!("✅ Code formatted");
    }
    Ok(())
}

fn clippy(sh: &Shell) -> Result<()> {
    cmd!(
        sh,
        "cargo clippy --all-targets --all-features -- -D warnings"
    )
    .run()?;
    println!("✅ Clippy checks passed");
    Ok(())
}

fn project_root() -> Result<PathBuf> {
    Path::new(&env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(1)
        .map(Path::to_path_buf)
        .context("xtask must live one level below the workspace root")
}
