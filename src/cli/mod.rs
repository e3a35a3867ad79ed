//! CLI command handling
//!
//! Resolves configuration and plans, runs them and formats output.

use std::path::Path;

use crate::commands::{Commands, TargetArgs};
use crate::common::config::Config;
use crate::common::{mask_secret, paths, Error, Result};
use crate::testing::{self, suite, RunOptions, ScenarioPlan};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run { target, plan, json } => {
            let config = load_config(target)?;
            let plan = load_plan(plan.as_deref())?;

            let report = testing::run(&config, &plan, RunOptions { quiet: json }).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }

            if report.success() {
                Ok(())
            } else {
                Err(Error::RunFailed {
                    failed: report.failed(),
                    errored: report.errored(),
                    skipped: report.skipped(),
                })
            }
        }

        Commands::List { plan, json } => {
            let plan = load_plan(plan.as_deref())?;

            if json {
                let scenarios: Vec<_> = plan
                    .scenarios
                    .iter()
                    .enumerate()
                    .map(|(i, s)| {
                        serde_json::json!({
                            "order": i + 1,
                            "name": s.name,
                            "description": s.description,
                            "method": s.action.method(),
                            "path": s.action.path(),
                            "expect": s.expect,
                            "needs_story": s.action.needs_story(),
                            "captures_story": s.action.captures_story(),
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&serde_json::json!({
                        "plan": plan.name,
                        "scenarios": scenarios,
                    }))?
                );
            } else {
                println!("Plan: {}", plan.name);
                if let Some(desc) = &plan.description {
                    println!("  {}", desc);
                }
                println!();
                for (i, s) in plan.scenarios.iter().enumerate() {
                    let marker = if s.action.captures_story() {
                        " [captures story]"
                    } else if s.action.needs_story() {
                        " [needs story]"
                    } else {
                        ""
                    };
                    println!(
                        "  {:>2}. {:30} {:6} {:32} -> {}{}",
                        i + 1,
                        s.name,
                        s.action.method(),
                        s.action.path(),
                        s.expect.status,
                        marker
                    );
                }
            }
            Ok(())
        }

        Commands::Config { target } => {
            let path = target.config.clone().or_else(paths::config_path);
            let config = load_config(target)?;

            match &path {
                Some(p) if p.exists() => println!("Config file: {}", p.display()),
                Some(p) => println!("Config file: {} (not found, using defaults)", p.display()),
                None => println!("Config file: none (using defaults)"),
            }
            println!("Base URL: {}", config.service.base_url);
            println!("Username: {}", config.credentials.username);
            println!("Password: {}", mask_secret(&config.credentials.password));
            match config.timeouts.request_secs {
                Some(secs) => println!("Request timeout: {}s", secs),
                None => println!("Request timeout: client default"),
            }
            Ok(())
        }
    }
}

fn load_config(target: TargetArgs) -> Result<Config> {
    let config = match &target.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    Ok(config.with_overrides(target.base_url, target.username, target.password))
}

fn load_plan(path: Option<&Path>) -> Result<ScenarioPlan> {
    match path {
        Some(p) => ScenarioPlan::load(p),
        None => Ok(suite::story_crud()),
    }
}
