//! Test runner implementation
//!
//! Bootstraps one session, executes a plan's scenarios strictly in order and
//! threads the captured story id between them through a [`RunContext`].

use std::time::Instant;

use colored::Colorize;
use reqwest::StatusCode;
use serde::Serialize;

use crate::api::{ApiResponse, Session};
use crate::common::config::Config;
use crate::common::{Error, Result};

use super::config::{Action, Expectation, Scenario, ScenarioPlan};

/// Fixture state carried from one scenario to the next
#[derive(Debug, Default, Clone)]
pub struct RunContext {
    /// Id returned by the most recent capturing create
    pub story_id: Option<String>,
}

/// How a scenario ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    /// An expectation was not met
    Failed(String),
    /// No usable response was received
    Errored(String),
    /// A required fixture was missing
    Skipped(String),
}

impl Outcome {
    fn from_error(e: &Error) -> Self {
        match e {
            Error::Assertion(msg) => Outcome::Failed(msg.clone()),
            Error::Skipped(reason) => Outcome::Skipped(reason.clone()),
            other => Outcome::Errored(other.to_string()),
        }
    }
}

/// Result of one scenario
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    pub name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Status code received, if a response arrived
    pub status: Option<u16>,
    pub elapsed_ms: u128,
}

/// Result of a whole run
#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub plan: String,
    pub base_url: String,
    pub results: Vec<ScenarioResult>,
}

impl SuiteReport {
    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    pub fn passed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Passed))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Failed(_)))
    }

    pub fn errored(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Errored(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Skipped(_)))
    }

    /// True when every scenario passed
    pub fn success(&self) -> bool {
        self.passed() == self.results.len()
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

/// Runner settings
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Suppress the human-readable progress output
    pub quiet: bool,
}

/// Bootstrap a session from `config`, run `plan` and tear the session down
///
/// Only a failed bootstrap is returned as an error; scenario problems are
/// recorded in the report.
pub async fn run(config: &Config, plan: &ScenarioPlan, opts: RunOptions) -> Result<SuiteReport> {
    plan.validate()?;

    let session = Session::bootstrap(
        &config.service.base_url,
        &config.credentials(),
        config.request_timeout(),
    )
    .await?;

    let report = run_plan(&session, plan, opts).await;

    session.close();

    Ok(report)
}

/// Execute every scenario of `plan` in order against an open session
pub async fn run_plan(session: &Session, plan: &ScenarioPlan, opts: RunOptions) -> SuiteReport {
    if !opts.quiet {
        println!(
            "\n{} {}",
            "Running Plan:".blue().bold(),
            plan.name.white().bold()
        );
        if let Some(desc) = &plan.description {
            println!("  {}", desc.dimmed());
        }
        println!("  {}", session.base_url().dimmed());
        println!("\n{}", "Scenarios:".cyan());
    }

    tracing::info!(
        "Running {} scenario(s) from plan '{}'",
        plan.scenarios.len(),
        plan.name
    );

    let mut ctx = RunContext::default();
    let mut results = Vec::with_capacity(plan.scenarios.len());

    for (i, scenario) in plan.scenarios.iter().enumerate() {
        let started = Instant::now();

        let (outcome, status) =
            match execute_scenario(session, scenario, ctx.story_id.as_deref()).await {
                Ok((response, captured)) => {
                    if let Some(id) = captured {
                        tracing::debug!("Captured storyId {}", id);
                        ctx.story_id = Some(id);
                    }
                    (Outcome::Passed, Some(response.status))
                }
                Err(ScenarioError { response, error }) => {
                    if let Error::Skipped(reason) = &error {
                        tracing::warn!("Skipping '{}': {}", scenario.name, reason);
                    }
                    // A failed capturing create leaves no story to target
                    if scenario.action.captures_story() {
                        ctx.story_id = None;
                    }
                    (Outcome::from_error(&error), response.map(|r| r.status))
                }
            };

        let result = ScenarioResult {
            name: scenario.name.clone(),
            outcome,
            status,
            elapsed_ms: started.elapsed().as_millis(),
        };

        if !opts.quiet {
            print_result(i + 1, scenario, &result);
        }
        results.push(result);
    }

    let report = SuiteReport {
        plan: plan.name.clone(),
        base_url: session.base_url().to_string(),
        results,
    };

    if !opts.quiet {
        print_summary(&report);
    }

    report
}

/// Failure of a single scenario, with the response if one arrived
#[derive(Debug)]
pub struct ScenarioError {
    pub response: Option<ApiResponse>,
    pub error: Error,
}

impl From<Error> for ScenarioError {
    fn from(error: Error) -> Self {
        Self {
            response: None,
            error,
        }
    }
}

/// Make one scenario's call and judge the response
///
/// `story_id` is the id captured earlier in the run, if any. On success
/// returns the response and any newly captured id.
pub async fn execute_scenario(
    session: &Session,
    scenario: &Scenario,
    story_id: Option<&str>,
) -> std::result::Result<(ApiResponse, Option<String>), ScenarioError> {
    let response = match &scenario.action {
        Action::CreateStory { story, .. } => session.create_story(story).await?,
        Action::EditStory { id, story } => {
            let id = resolve_target(id.as_deref(), story_id)?;
            session.edit_story(id, story).await?
        }
        Action::ListStories => session.list_stories().await?,
        Action::DeleteStory { id } => {
            let id = resolve_target(id.as_deref(), story_id)?;
            session.delete_story(id).await?
        }
    };

    match evaluate(scenario, &response) {
        Ok(captured) => Ok((response, captured)),
        Err(error) => Err(ScenarioError {
            response: Some(response),
            error,
        }),
    }
}

/// Pick the explicit id, falling back to the captured one
fn resolve_target<'a>(explicit: Option<&'a str>, captured: Option<&'a str>) -> Result<&'a str> {
    explicit.or(captured).ok_or_else(|| {
        Error::Skipped("no story was captured by an earlier create".to_string())
    })
}

/// Check `response` against the scenario's expectations
///
/// Returns the story id to remember when the action captures one.
pub fn evaluate(scenario: &Scenario, response: &ApiResponse) -> Result<Option<String>> {
    check_expectation(&scenario.expect, response)?;

    if !scenario.action.captures_story() {
        return Ok(None);
    }

    response.body()?;
    match response.story_id() {
        Some(id) if !id.is_empty() => Ok(Some(id.to_string())),
        Some(_) => Err(Error::Assertion(
            "Expected a non-empty storyId, got an empty string".to_string(),
        )),
        None => Err(Error::Assertion(format!(
            "Expected storyId in response body, got: {}",
            excerpt(&response.text)
        ))),
    }
}

/// Compare status, `msg` and array shape in that order
///
/// A body that has to be inspected but does not decode as JSON is an
/// `InvalidResponse` error, not an assertion failure.
pub fn check_expectation(expect: &Expectation, response: &ApiResponse) -> Result<()> {
    if response.status != expect.status {
        return Err(Error::mismatch(
            "status",
            describe_status(expect.status),
            describe_status(response.status),
        ));
    }

    if let Some(expected_msg) = &expect.msg {
        let body = response.body()?;
        match body.get("msg").and_then(|m| m.as_str()) {
            Some(actual) if actual == expected_msg => {}
            Some(actual) => {
                return Err(Error::mismatch(
                    "msg",
                    format!("'{}'", expected_msg),
                    format!("'{}'", actual),
                ));
            }
            None => {
                return Err(Error::mismatch(
                    "msg",
                    format!("'{}'", expected_msg),
                    format!("no msg field in body: {}", excerpt(&response.text)),
                ));
            }
        }
    }

    if expect.non_empty {
        match response.body()? {
            serde_json::Value::Array(items) if !items.is_empty() => {}
            serde_json::Value::Array(_) => {
                return Err(Error::Assertion(
                    "Expected a non-empty array, got an empty array".to_string(),
                ));
            }
            _ => {
                return Err(Error::Assertion(format!(
                    "Expected a JSON array body, got: {}",
                    excerpt(&response.text)
                )));
            }
        }
    }

    Ok(())
}

fn describe_status(code: u16) -> String {
    StatusCode::from_u16(code)
        .map(|s| s.to_string())
        .unwrap_or_else(|_| code.to_string())
}

fn excerpt(text: &str) -> String {
    const MAX: usize = 120;
    if text.is_empty() {
        return "<empty body>".to_string();
    }
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn print_result(num: usize, scenario: &Scenario, result: &ScenarioResult) {
    let call = format!("{} {}", scenario.action.method(), scenario.action.path());
    match &result.outcome {
        Outcome::Passed => println!(
            "  {} {}. {} {}",
            "✓".green(),
            num,
            scenario.name,
            call.dimmed()
        ),
        Outcome::Failed(msg) => {
            println!("  {} {}. {} {}", "✗".red(), num, scenario.name, call.dimmed());
            println!("      {}", msg.red());
        }
        Outcome::Errored(msg) => {
            println!("  {} {}. {} {}", "!".red().bold(), num, scenario.name, call.dimmed());
            println!("      {}", msg.red());
        }
        Outcome::Skipped(reason) => println!(
            "  {} {}. {} {}",
            "-".yellow(),
            num,
            scenario.name,
            format!("skipped: {}", reason).yellow()
        ),
    }
}

fn print_summary(report: &SuiteReport) {
    let counts = format!(
        "{} passed, {} failed, {} errored, {} skipped",
        report.passed(),
        report.failed(),
        report.errored(),
        report.skipped()
    );
    if report.success() {
        println!("\n{} {}\n", "✓".green().bold(), counts.green().bold());
    } else {
        println!("\n{} {}\n", "✗".red().bold(), counts.red().bold());
    }
}
