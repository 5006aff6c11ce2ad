//! Stagetrack CLI - weighted stage planning and audit trail

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde_json::json;
use stagetrack_core::application::validators::{ProjectValidator, StageValidator};
use stagetrack_core::commands::{self, NewProject, Project, ProjectFilter, ProjectLog};
use stagetrack_core::config::Config;
use stagetrack_core::domain::dates::{date_value, parse_date};
use stagetrack_core::domain::schedule::{DEVELOPMENT_MILESTONE_SHARES, milestone_windows, plan_windows};
use stagetrack_core::domain::{
    EditSession, MilestoneEdit, Priority, ProjectEdit, ProjectStatus, Role, SaveBatch, StageEdit,
    StageStatus,
};
use stagetrack_core::storage::{Database, DatabaseConfig};
use tracing::warn;

#[derive(Parser)]
#[command(name = "stagetrack")]
#[command(author, version, about = "Weighted stage planning and audit trail", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Name recorded as the author of saved changes
    #[arg(long, global = true)]
    actor: Option<String>,

    /// Caller role (admin or hod)
    #[arg(long, global = true, default_value = "admin", value_parser = parse_role)]
    role: Role,

    /// Database file (overrides storage.database_path)
    #[arg(long, global = true)]
    database: Option<PathBuf>,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage projects
    Projects {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Preview how a date range splits across weights
    Allocate {
        /// First day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        start: NaiveDate,
        /// Last day (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        end: NaiveDate,
        /// Comma-separated weights, e.g. 50,30,20
        #[arg(long)]
        weights: String,
    },

    /// Set project dates and recalculate every stage's planned dates
    Plan {
        /// Project ID or code
        project: String,
        /// Planned start date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        /// Planned end date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,
    },

    /// Update a stage
    Stage {
        /// Project ID or code
        project: String,
        /// Stage name
        stage: String,
        /// Stage status
        #[arg(long)]
        status: Option<String>,
        /// Stage owner
        #[arg(long)]
        owner: Option<String>,
        /// Remarks
        #[arg(long)]
        remarks: Option<String>,
        /// Actual start date (YYYY-MM-DD, or "none" to clear)
        #[arg(long, value_parser = parse_clearable_date)]
        actual_start: Option<ClearableDate>,
        /// Actual end date (YYYY-MM-DD, or "none" to clear)
        #[arg(long, value_parser = parse_clearable_date)]
        actual_end: Option<ClearableDate>,
        /// Weight in percent
        #[arg(long)]
        weight: Option<String>,
    },

    /// Manage stage milestones
    Milestone {
        #[command(subcommand)]
        action: MilestoneAction,
    },

    /// Show a project's change log
    Logs {
        /// Project ID or code
        project: String,
        /// Maximum number of entries (defaults to audit.log_fetch_limit)
        #[arg(short, long)]
        limit: Option<i64>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// Create a project with the default stages
    Create {
        /// Project name
        name: String,
        #[arg(long)]
        department: String,
        #[arg(long)]
        tech_department: String,
        /// Project owner
        #[arg(long)]
        owner: String,
        #[arg(long)]
        business_owner: String,
        #[arg(long, default_value = "")]
        objectives: String,
        #[arg(long, default_value = "")]
        owner_email: String,
        #[arg(long, default_value = "")]
        business_owner_email: String,
        #[arg(long, value_parser = parse_date_arg)]
        start: Option<NaiveDate>,
        #[arg(long, value_parser = parse_date_arg)]
        end: Option<NaiveDate>,
        /// P1, P2 or P3
        #[arg(long)]
        priority: Option<String>,
        /// Work in Progress, Completed, On Hold or Delay
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value = "")]
        summary: String,
    },
    /// List projects, newest first
    List {
        #[arg(long)]
        department: Option<String>,
        /// Overall status: completed, in-progress, delayed or yet-to-start
        #[arg(long, value_parser = parse_overall_status)]
        status: Option<StageStatus>,
        /// Match against project code or name
        #[arg(long)]
        search: Option<String>,
    },
    /// Show project totals by overall status
    Stats,
    /// Show project counts per department and owner
    Departments,
    /// Show project details and stages
    Show { project: String },
    /// Delete a project and its change log
    Delete {
        project: String,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum MilestoneAction {
    /// Add a milestone to a stage
    Add {
        project: String,
        stage: String,
        title: String,
    },
    /// Edit a milestone
    Edit {
        project: String,
        stage: String,
        id: i64,
        #[arg(long)]
        stage_name: Option<String>,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        remarks: Option<String>,
    },
    /// Delete a milestone
    Delete {
        project: String,
        stage: String,
        id: i64,
    },
    /// Suggest development milestone dates within a stage
    Plan { project: String, stage: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a configuration value
    Get { key: String },
    /// Set a configuration value
    Set { key: String, value: String },
    /// List all configuration values
    List,
    /// Reset configuration to defaults
    Reset,
    /// Show the configuration file path
    Path,
}

/// A date argument that may also clear the field
#[derive(Clone, Copy, Debug)]
struct ClearableDate(Option<NaiveDate>);

fn parse_date_arg(value: &str) -> Result<NaiveDate, String> {
    parse_date(value).ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", value))
}

fn parse_clearable_date(value: &str) -> Result<ClearableDate, String> {
    match value.trim().to_lowercase().as_str() {
        "" | "none" => Ok(ClearableDate(None)),
        _ => parse_date_arg(value).map(|d| ClearableDate(Some(d))),
    }
}

fn parse_overall_status(value: &str) -> Result<StageStatus, String> {
    StageStatus::parse(&value.replace(['-', '_'], " ")).ok_or_else(|| {
        format!(
            "unknown status '{}', expected completed, in-progress, delayed or yet-to-start",
            value
        )
    })
}

fn parse_role(value: &str) -> Result<Role, String> {
    Role::parse(value).ok_or_else(|| format!("unknown role '{}', expected admin or hod", value))
}

/// Settings shared by every command
struct Context {
    format: OutputFormat,
    quiet: bool,
    actor: String,
    role: Role,
    config: Config,
}

impl Context {
    fn json(&self) -> bool {
        self.format == OutputFormat::Json
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let directive = if cli.quiet { "stagetrack=warn" } else { "stagetrack=info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .init();

    // Config commands must work even when the file is broken
    let command = match cli.command {
        Commands::Config { action } => return cmd_config(action, cli.quiet),
        command => command,
    };

    let mut config = Config::load()?;
    if let Some(path) = &cli.database {
        config.storage.database_path = path.clone();
    }

    let ctx = Context {
        format: cli.format,
        quiet: cli.quiet,
        actor: cli
            .actor
            .clone()
            .unwrap_or_else(|| config.audit.default_actor.clone()),
        role: cli.role,
        config,
    };

    let open_db = || Database::new(DatabaseConfig::from_config(&ctx.config));

    match command {
        Commands::Projects { action } => {
            let db = open_db().await?;
            cmd_projects(&db, action, &ctx).await
        }

        Commands::Allocate {
            start,
            end,
            weights,
        } => cmd_allocate(start, end, &weights, &ctx),

        Commands::Plan {
            project,
            start,
            end,
        } => {
            let db = open_db().await?;
            cmd_plan(&db, &project, start, end, &ctx).await
        }

        Commands::Stage {
            project,
            stage,
            status,
            owner,
            remarks,
            actual_start,
            actual_end,
            weight,
        } => {
            let mut edits = Vec::new();
            if let Some(status) = status {
                let parsed = StageStatus::parse(&status).ok_or_else(|| {
                    let valid: Vec<&str> = StageStatus::ALL.iter().map(|s| s.as_str()).collect();
                    anyhow::anyhow!(
                        "Invalid status '{}'. Valid options: {}",
                        status,
                        valid.join(", ")
                    )
                })?;
                edits.push(StageEdit::Status(parsed));
            }
            if let Some(owner) = owner {
                edits.push(StageEdit::Owner(owner));
            }
            if let Some(remarks) = remarks {
                edits.push(StageEdit::Remarks(remarks));
            }
            if let Some(ClearableDate(date)) = actual_start {
                edits.push(StageEdit::ActualStartDate(date));
            }
            if let Some(ClearableDate(date)) = actual_end {
                edits.push(StageEdit::ActualEndDate(date));
            }
            let weight = weight
                .map(|w| StageValidator::parse_weight(&w))
                .transpose()?;

            let db = open_db().await?;
            cmd_stage(&db, &project, &stage, edits, weight, &ctx).await
        }

        Commands::Milestone { action } => {
            let db = open_db().await?;
            cmd_milestone(&db, action, &ctx).await
        }

        Commands::Logs { project, limit } => {
            let db = open_db().await?;
            let limit = limit.unwrap_or(ctx.config.audit.log_fetch_limit);
            cmd_logs(&db, &project, limit, &ctx).await
        }

        Commands::Config { action } => cmd_config(action, ctx.quiet),
    }
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_projects(db: &Database, action: ProjectAction, ctx: &Context) -> anyhow::Result<()> {
    match action {
        ProjectAction::Create {
            name,
            department,
            tech_department,
            owner,
            business_owner,
            objectives,
            owner_email,
            business_owner_email,
            start,
            end,
            priority,
            status,
            summary,
        } => {
            let priority = match priority {
                Some(p) => Priority::parse(&p)
                    .ok_or_else(|| anyhow::anyhow!("Invalid priority '{}'. Use P1, P2 or P3", p))?,
                None => Priority::default(),
            };
            let status = match status {
                Some(s) => ProjectStatus::parse(&s).ok_or_else(|| {
                    anyhow::anyhow!(
                        "Invalid status '{}'. Use Work in Progress, Completed, On Hold or Delay",
                        s
                    )
                })?,
                None => ProjectStatus::default(),
            };

            let input = NewProject {
                objectives,
                project_owner_email: owner_email,
                business_owner_email,
                priority,
                status,
                overall_project_summary: summary,
                ..NewProject::new(name, department, tech_department, owner, business_owner)
            }
            .with_dates(start, end);

            let project = commands::create_project(db, ctx.role, input).await?;

            if ctx.json() {
                print_json(&project_json(&project))?;
            } else if ctx.quiet {
                println!("{}", project.code);
            } else {
                println!("Project created successfully!");
                println!("  Code: {}", project.code);
                println!("  ID: {}", project.id);
                println!("  Stages: {}", project.snapshot.stages.len());
            }
        }
        ProjectAction::List {
            department,
            status,
            search,
        } => {
            let filter = ProjectFilter {
                department,
                status,
                search,
            };
            let projects = commands::list_projects(db, &filter).await?;

            if ctx.json() {
                let items: Vec<_> = projects.iter().map(project_json).collect();
                print_json(&serde_json::Value::Array(items))?;
            } else if projects.is_empty() {
                if !ctx.quiet {
                    println!("No projects found.");
                    println!("\nCreate one with: stagetrack projects create <name> --department <dept> ...");
                }
            } else {
                if !ctx.quiet {
                    println!("Projects:");
                }
                for p in projects {
                    println!(
                        "  {} - {} [{}] {}% ({}, {}) {}",
                        p.code,
                        p.name,
                        p.department,
                        p.progress(),
                        p.status_summary(),
                        p.status,
                        p.overall_status()
                    );
                }
            }
        }
        ProjectAction::Stats => {
            let counts = commands::project_stats(db).await?;
            if ctx.json() {
                print_json(&serde_json::to_value(counts)?)?;
            } else {
                println!("Total projects: {}", counts.total);
                println!("  Completed: {}", counts.completed);
                println!("  In Progress: {}", counts.in_progress);
                println!("  Delayed: {}", counts.delayed);
            }
        }
        ProjectAction::Departments => {
            let summary = commands::department_summary(db).await?;
            if ctx.json() {
                print_json(&serde_json::to_value(&summary)?)?;
            } else if summary.is_empty() {
                if !ctx.quiet {
                    println!("No projects found.");
                }
            } else {
                for department in &summary {
                    println!("{} ({} projects)", department.department, department.total());
                    for owner in &department.owners {
                        println!("  {}: {}", owner.owner, owner.count);
                    }
                }
            }
        }
        ProjectAction::Show { project } => {
            let p = commands::get_project(db, &project).await?;

            if ctx.json() {
                print_json(&project_json(&p))?;
                return Ok(());
            }

            println!("Project: {} ({})", p.name, p.code);
            println!("  ID: {}", p.id);
            println!("  Department: {} / {}", p.department, p.tech_department);
            println!("  Status: {}", p.status);
            println!("  Priority: {}", p.snapshot.priority);
            println!("  Owners: {} / {}", p.project_owner, p.business_owner);
            println!(
                "  Planned: {} .. {}",
                display_date(p.snapshot.start_date),
                display_date(p.snapshot.end_date)
            );
            println!("  Progress: {}% ({})", p.progress(), p.status_summary());
            if !p.snapshot.overall_project_summary.is_empty() {
                println!("  Summary: {}", p.snapshot.overall_project_summary);
            }
            println!("  Stages:");
            for stage in &p.snapshot.stages {
                println!(
                    "    {:<28} {:>5}%  {} .. {}  {}{}",
                    stage.name,
                    stage.weight,
                    display_date(stage.start_date),
                    display_date(stage.end_date),
                    stage.status,
                    if stage.stage_owner.is_empty() {
                        String::new()
                    } else {
                        format!(" ({})", stage.stage_owner)
                    }
                );
                for m in &stage.milestones {
                    println!("      #{} {} {}", m.id, m.title, m.owner);
                }
            }

            if let Err(e) =
                StageValidator::validate_weights(&p.snapshot.stages, ctx.config.schedule.max_total_weight)
            {
                warn!(project = %p.code, "{}", e);
                println!("Warning: {}", e);
            }
            for name in StageValidator::duplicate_names(&p.snapshot.stages) {
                println!(
                    "Warning: stage '{}' appears more than once; only the first is tracked.",
                    name
                );
            }
        }
        ProjectAction::Delete { project, force } => {
            if !force {
                if !ctx.quiet {
                    println!("Warning: This will permanently delete project '{}' and its change log.", project);
                    println!("Use --force to confirm deletion.");
                }
                return Ok(());
            }

            let deleted = commands::delete_project(db, ctx.role, &project).await?;
            if ctx.json() {
                print_json(&json!({ "deleted": deleted.code, "id": deleted.id }))?;
            } else if !ctx.quiet {
                println!("Project '{}' permanently deleted.", deleted.code);
            }
        }
    }
    Ok(())
}

fn cmd_allocate(
    start: NaiveDate,
    end: NaiveDate,
    weights: &str,
    ctx: &Context,
) -> anyhow::Result<()> {
    let weights = weights
        .split(',')
        .filter(|w| !w.trim().is_empty())
        .map(|w| {
            let weight = StageValidator::parse_weight(w)?;
            StageValidator::validate_weight(weight, f64::MAX)?;
            Ok(weight)
        })
        .collect::<anyhow::Result<Vec<f64>>>()?;

    let windows = plan_windows(start, end, &weights).ok_or_else(|| {
        anyhow::anyhow!(
            "Nothing to allocate: need at least one positive weight and a start on or before the end"
        )
    })?;

    if ctx.json() {
        let items: Vec<_> = windows
            .iter()
            .zip(&weights)
            .enumerate()
            .map(|(i, (w, weight))| {
                json!({
                    "stage": i + 1,
                    "weight": weight,
                    "start": w.start.to_string(),
                    "end": w.end.to_string(),
                    "days": w.days,
                })
            })
            .collect();
        print_json(&serde_json::Value::Array(items))?;
        return Ok(());
    }

    for (i, (window, weight)) in windows.iter().zip(&weights).enumerate() {
        println!(
            "Stage {}: {} .. {} ({} days, {}%)",
            i + 1,
            window.start,
            window.end,
            window.days,
            weight
        );
    }
    Ok(())
}

async fn cmd_plan(
    db: &Database,
    project: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    ctx: &Context,
) -> anyhow::Result<()> {
    let (project, mut session) = open(db, project, ctx).await?;

    if start.is_some() || end.is_some() {
        ProjectValidator::validate_dates(
            start.or(session.working().start_date),
            end.or(session.working().end_date),
        )?;
    }
    if let Some(start) = start {
        session.edit_project(ProjectEdit::StartDate(Some(start)))?;
    }
    if let Some(end) = end {
        session.edit_project(ProjectEdit::EndDate(Some(end)))?;
    }

    match session.auto_calculate_dates() {
        Ok(changed) => {
            if !changed && !ctx.quiet && !ctx.json() {
                println!("Stage dates already match the project range.");
            }
        }
        Err(e) if e.is_warning() => {
            warn!(project = %project.code, "{}", e);
            eprintln!("Warning: {}", e);
        }
        Err(e) => return Err(e.into()),
    }

    save(db, &project, &mut session, ctx).await
}

async fn cmd_stage(
    db: &Database,
    project: &str,
    stage: &str,
    edits: Vec<StageEdit>,
    weight: Option<f64>,
    ctx: &Context,
) -> anyhow::Result<()> {
    StageValidator::validate_name(stage)?;
    let (project, mut session) = open(db, project, ctx).await?;
    let index = stage_index(&session, stage)?;

    for edit in edits {
        session.edit_stage(index, edit)?;
    }
    if let Some(weight) = weight {
        session.set_stage_weight(index, weight)?;
    }

    save(db, &project, &mut session, ctx).await
}

async fn cmd_milestone(db: &Database, action: MilestoneAction, ctx: &Context) -> anyhow::Result<()> {
    match action {
        MilestoneAction::Add {
            project,
            stage,
            title,
        } => {
            let (project, mut session) = open(db, &project, ctx).await?;
            let index = stage_index(&session, &stage)?;
            let id = session.add_milestone(index, title)?;
            if !ctx.quiet && !ctx.json() {
                println!("Added milestone #{} to '{}'.", id, stage);
            }
            save(db, &project, &mut session, ctx).await
        }
        MilestoneAction::Edit {
            project,
            stage,
            id,
            stage_name,
            owner,
            remarks,
        } => {
            let (project, mut session) = open(db, &project, ctx).await?;
            let index = stage_index(&session, &stage)?;

            let edits = [
                stage_name.map(MilestoneEdit::StageName),
                owner.map(MilestoneEdit::Owner),
                remarks.map(MilestoneEdit::Remarks),
            ];
            for edit in edits.into_iter().flatten() {
                session.edit_milestone(index, id, edit)?;
            }
            save(db, &project, &mut session, ctx).await
        }
        MilestoneAction::Delete { project, stage, id } => {
            let (project, mut session) = open(db, &project, ctx).await?;
            let index = stage_index(&session, &stage)?;
            let removed = session.delete_milestone(index, id)?;
            if !ctx.quiet && !ctx.json() {
                println!("Deleted milestone #{} '{}'.", removed.id, removed.title);
            }
            save(db, &project, &mut session, ctx).await
        }
        MilestoneAction::Plan { project, stage } => {
            let project = commands::get_project(db, &project).await?;
            let index = project
                .snapshot
                .stage_position(&stage)
                .ok_or_else(|| stagetrack_core::Error::StageNotFound(stage.clone()))?;
            let stage = &project.snapshot.stages[index];

            let windows = milestone_windows(
                stage.start_date,
                stage.end_date,
                &DEVELOPMENT_MILESTONE_SHARES,
            )
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Stage '{}' needs planned start and end dates. Run `stagetrack plan {}` first.",
                    stage.name,
                    project.code
                )
            })?;

            if ctx.json() {
                return print_json(&serde_json::to_value(&windows)?);
            }
            for (i, window) in windows.iter().enumerate() {
                println!(
                    "Milestone {}: {} .. {} ({} days, {}%)",
                    i + 1,
                    window.start,
                    window.end,
                    window.days,
                    window.share
                );
            }
            Ok(())
        }
    }
}

async fn cmd_logs(db: &Database, project: &str, limit: i64, ctx: &Context) -> anyhow::Result<()> {
    let project = commands::get_project(db, project).await?;
    let logs = commands::list_logs(db, &project.id, limit).await?;

    if ctx.json() {
        print_json(&serde_json::to_value(&logs)?)?;
    } else if logs.is_empty() {
        if !ctx.quiet {
            println!("No changes recorded for {}.", project.code);
        }
    } else {
        for log in &logs {
            print_log(log);
        }
    }
    Ok(())
}

fn cmd_config(action: ConfigAction, quiet: bool) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            if !quiet {
                println!("Set {} = {}", key, value);
            }
        }
        ConfigAction::List => {
            let config = Config::load()?;
            let items = config.list()?;
            for (key, value) in items {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Reset => {
            Config::reset()?;
            if !quiet {
                println!("Configuration reset to defaults.");
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

async fn open(db: &Database, key: &str, ctx: &Context) -> anyhow::Result<(Project, EditSession)> {
    let opened =
        commands::open_session(db, key, ctx.role, ctx.config.schedule.max_total_weight).await?;
    Ok(opened)
}

fn stage_index(session: &EditSession, name: &str) -> anyhow::Result<usize> {
    session
        .working()
        .stage_position(name)
        .ok_or_else(|| stagetrack_core::Error::StageNotFound(name.to_string()).into())
}

async fn save(
    db: &Database,
    project: &Project,
    session: &mut EditSession,
    ctx: &Context,
) -> anyhow::Result<()> {
    let batch = commands::save_session(db, &project.id, session, &ctx.actor).await?;
    print_batch(project, &batch, ctx)
}

fn print_batch(project: &Project, batch: &SaveBatch, ctx: &Context) -> anyhow::Result<()> {
    if ctx.json() {
        return print_json(&json!({
            "project": project.code,
            "progress": batch.snapshot.progress(),
            "changes": batch.changes,
        }));
    }
    if ctx.quiet {
        return Ok(());
    }

    if batch.changes.is_empty() {
        println!("No changes to record for {}.", project.code);
        return Ok(());
    }

    println!("Saved {} change(s) to {}:", batch.changes.len(), project.code);
    for change in &batch.changes {
        println!(
            "  [{}] {}: {} -> {}",
            change.stage_name, change.field_name, change.previous_value, change.new_value
        );
    }
    Ok(())
}

fn print_log(log: &ProjectLog) {
    println!(
        "{} {} [{}] {}: {} -> {}",
        log.changed_at.format("%Y-%m-%d %H:%M:%S"),
        log.changed_by,
        log.stage_name,
        log.field_changed,
        log.old_value,
        log.new_value
    );
}

fn project_json(project: &Project) -> serde_json::Value {
    let mut value = serde_json::to_value(project).unwrap_or_else(|_| json!({}));
    if let Some(map) = value.as_object_mut() {
        map.insert("progress".into(), json!(project.progress()));
        map.insert("statusSummary".into(), json!(project.status_summary()));
    }
    value
}

fn print_json(value: &serde_json::Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn display_date(date: Option<NaiveDate>) -> String {
    match date_value(date) {
        s if s.is_empty() => "-".to_string(),
        s => s,
    }
}
