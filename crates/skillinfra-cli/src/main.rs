//! Skillinfra - multi-region skill infrastructure deployer
//!
//! Usage:
//!   skillinfra bootstrap             # Prepare the project for the configured deployer
//!   skillinfra deploy                # Deploy all regions and update skill.json
//!   skillinfra --profile beta deploy # Use another profile

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skillinfra_core::prelude::*;

#[derive(Parser)]
#[command(name = "skillinfra")]
#[command(about = "Multi-region skill infrastructure deployer", long_about = None)]
struct Cli {
    /// Profile in ask-resources.json
    #[arg(long, short, global = true, default_value = DEFAULT_PROFILE)]
    profile: String,

    /// Skill project root (defaults to the current directory)
    #[arg(long, global = true)]
    project_dir: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the deployer's bootstrap step and store its user config
    Bootstrap {
        /// Workspace handed to the deployer (defaults to the project root)
        #[arg(long)]
        workspace: Option<PathBuf>,
    },

    /// Deploy skill infrastructure to every region with configured code
    Deploy,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.debug {
        "skillinfra=debug,skillinfra_core=debug,info"
    } else {
        "skillinfra=info,skillinfra_core=info,warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let project_root = match cli.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let ctx = AppContext::new(project_root, cli.profile)?;
    tracing::debug!(
        project = %ctx.project_root().display(),
        profile = ctx.profile(),
        "resolved skill project"
    );
    let controller = SkillInfrastructureController::from_context(&ctx)?;

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))?;

    match cli.command {
        Commands::Bootstrap { workspace } => {
            let workspace = workspace.unwrap_or_else(|| ctx.project_root().to_path_buf());
            runtime.block_on(controller.bootstrap_infrastructures(&workspace))?;
            println!(
                "{} Skill infrastructure bootstrapped for profile '{}'",
                style("✓").green(),
                ctx.profile()
            );
        }
        Commands::Deploy => {
            runtime.block_on(controller.deploy_infrastructure())?;
            println!(
                "{} Skill infrastructure deployed for profile '{}'",
                style("✓").green(),
                ctx.profile()
            );
        }
    }

    Ok(())
}
