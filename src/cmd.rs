//! Command implementations for the CLI interface.
//!
//! This module contains the subcommands and their handlers: session
//! commands that only touch the local session file, and task commands that
//! go through a [`Dashboard`] over the configured repository.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use tracing::debug;

use crate::cli::{Cli, GlobalArgs};
use crate::config::Config;
use crate::dashboard::{Dashboard, DashboardError, NoticeLevel, Request, Response};
use crate::db::*;
use crate::error::{Error, Result};
use crate::fields::*;
use crate::repository::{Backend, TaskFilter};
use crate::session::{Route, Session, User};
use crate::task::{Task, TaskDraft};

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with a user profile.
    #[command(alias = "signup")]
    Login {
        /// Email address of the account.
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },

    /// Sign out.
    Logout,

    /// Show the signed-in user.
    Whoami,

    /// Show or change the colour theme preference.
    Theme {
        #[arg(long, conflicts_with_all = ["light", "toggle"])]
        dark: bool,
        #[arg(long, conflicts_with = "toggle")]
        light: bool,
        #[arg(long)]
        toggle: bool,
    },

    /// Show which view a path resolves to for the current session.
    Route {
        /// Path such as "/", "/login" or "/signup".
        path: String,
    },

    /// Show the overview counts followed by every task.
    Dashboard,

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: low | medium | high.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Status: not-started | in-progress | completed.
        #[arg(long, value_enum, default_value_t = Status::NotStarted)]
        status: Status,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd". Defaults to a week from today.
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Due filter: today | this-week | overdue | upcoming.
        #[arg(long, value_enum)]
        due: Option<DueFilter>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Due)]
        sort: SortKey,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the overview counts.
    Stats,

    /// Set the status of a task.
    Status {
        id: String,
        #[arg(value_enum)]
        status: Status,
    },

    /// Mark a task in progress.
    Start { id: String },

    /// Mark a task completed.
    Complete { id: String },

    /// Mark a task not started.
    Reopen { id: String },

    /// Delete a task.
    Delete { id: String },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Resolved runtime context shared by the handlers.
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
    pub session: Session,
    pub today: NaiveDate,
}

impl Context {
    /// Load configuration and session, applying command-line overrides
    /// before the configuration is validated.
    pub fn load(args: &GlobalArgs) -> Result<Self> {
        let data_dir = resolve_data_dir(args.data_dir.as_deref());
        std::fs::create_dir_all(&data_dir)?;

        let mut config = Config::load_from_dir(&data_dir)?;
        if let Some(kind) = args.backend {
            config.backend.kind = kind;
        }
        if args.project_id.is_some() {
            config.remote.project_id = args.project_id.clone();
        }
        if args.public_key.is_some() {
            config.remote.public_key = args.public_key.clone();
        }
        config.validate()?;

        let session = Session::load(&data_dir)?;
        Ok(Context {
            data_dir,
            config,
            session,
            today: Local::now().date_naive(),
        })
    }

    /// Open a dashboard over the configured backend and load the task list.
    ///
    /// Requires a signed-in session.
    pub async fn dashboard(&self, filter: TaskFilter) -> Result<Dashboard<Backend>> {
        if self.session.resolve(Route::Dashboard) != Route::Dashboard {
            return Err(Error::NotSignedIn);
        }
        let backend = self.config.backend(&self.data_dir, self.today)?;
        debug!(backend = backend.name(), "opening dashboard");
        let mut dash = Dashboard::new(backend, self.today).strict(self.config.dashboard.strict);
        submit(&mut dash, Request::Reload(filter)).await?;
        Ok(dash)
    }
}

/// Data directory for a `--data-dir` value, falling back to `~/.taskflow`.
pub fn resolve_data_dir(dir: Option<&Path>) -> PathBuf {
    dir.map(Path::to_path_buf).unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".taskflow")
    })
}

/// Dispatch a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let Cli { global, command } = cli;
    let load = || Context::load(&global);
    match command {
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
        Commands::Login { email, first_name, last_name } => {
            cmd_login(&mut load()?, email, first_name, last_name)
        }
        Commands::Logout => cmd_logout(&mut load()?),
        Commands::Whoami => {
            cmd_whoami(&load()?.session);
            Ok(())
        }
        Commands::Theme { dark, light, toggle } => cmd_theme(&mut load()?, dark, light, toggle),
        Commands::Route { path } => {
            cmd_route(&load()?.session, &path);
            Ok(())
        }
        Commands::Dashboard => cmd_dashboard(&load()?).await,
        Commands::Add { title, desc, priority, status, due } => {
            cmd_add(&load()?, title, desc, priority, status, due).await
        }
        Commands::List { status, priority, due, sort, limit } => {
            cmd_list(&load()?, status, priority, due, sort, limit).await
        }
        Commands::Stats => cmd_stats(&load()?).await,
        Commands::Status { id, status } => cmd_set_status(&load()?, id, status).await,
        Commands::Start { id } => cmd_set_status(&load()?, id, Status::InProgress).await,
        Commands::Complete { id } => cmd_set_status(&load()?, id, Status::Completed).await,
        Commands::Reopen { id } => cmd_set_status(&load()?, id, Status::NotStarted).await,
        Commands::Delete { id } => cmd_delete(&load()?, id).await,
    }
}

/// Handle one request and print the notices it produced, whatever the
/// outcome.
async fn submit(dash: &mut Dashboard<Backend>, request: Request) -> Result<Response> {
    let result = dash.handle(request).await;
    for notice in dash.take_notices() {
        match notice.level {
            NoticeLevel::Error => eprintln!("{}", notice.message),
            NoticeLevel::Success | NoticeLevel::Info => println!("{}", notice.message),
        }
    }
    if let Err(DashboardError::Validation(errors)) = &result {
        for (field, message) in errors.iter() {
            eprintln!("  {}: {}", field.as_str(), message);
        }
    }
    Ok(result?)
}

pub fn cmd_login(
    ctx: &mut Context,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<()> {
    let email = email.trim().to_string();
    if email.is_empty() {
        return Err(Error::InvalidArgument("email cannot be empty".into()));
    }
    let user = User { email, first_name, last_name };
    let name = user.display_name();
    ctx.session.sign_in(user);
    ctx.session.save(&ctx.data_dir)?;
    println!("Signed in as {name}");
    Ok(())
}

pub fn cmd_logout(ctx: &mut Context) -> Result<()> {
    ctx.session.sign_out();
    ctx.session.save(&ctx.data_dir)?;
    println!("Signed out.");
    Ok(())
}

pub fn cmd_whoami(session: &Session) {
    match &session.user {
        Some(user) => println!("[{}] {} <{}>", user.initials(), user.display_name(), user.email),
        None => println!("Not signed in."),
    }
}

pub fn cmd_theme(ctx: &mut Context, dark: bool, light: bool, toggle: bool) -> Result<()> {
    let changed = if dark {
        ctx.session.dark_mode = true;
        true
    } else if light {
        ctx.session.dark_mode = false;
        true
    } else if toggle {
        ctx.session.toggle_dark_mode();
        true
    } else {
        false
    };
    if changed {
        ctx.session.save(&ctx.data_dir)?;
    }
    println!("{}", if ctx.session.dark_mode { "dark" } else { "light" });
    Ok(())
}

pub fn cmd_route(session: &Session, path: &str) {
    let requested = Route::parse(path);
    let shown = session.resolve(requested);
    if shown == requested {
        println!("{path} -> {shown:?}");
    } else {
        println!("{path} -> {shown:?} (redirected to {})", shown.path());
    }
}

pub async fn cmd_dashboard(ctx: &Context) -> Result<()> {
    let dash = ctx.dashboard(TaskFilter::default()).await?;
    if let Some(user) = &ctx.session.user {
        println!("TaskFlow - {}", user.display_name());
    }
    print_stats(&dash.stats());
    println!();
    if dash.tasks().is_empty() {
        println!("No tasks yet.");
    } else {
        let rows: Vec<&Task> = dash.tasks().iter().collect();
        print_table(&rows, ctx.today);
    }
    Ok(())
}

pub async fn cmd_add(
    ctx: &Context,
    title: String,
    desc: Option<String>,
    priority: Priority,
    status: Status,
    due: Option<String>,
) -> Result<()> {
    let mut draft = TaskDraft::default_for(ctx.today);
    draft.title = title;
    draft.description = desc.unwrap_or_default();
    draft.priority = priority;
    draft.status = status;
    if let Some(due) = due {
        draft.due_date = due;
    }

    let mut dash = ctx.dashboard(TaskFilter::default()).await?;
    if let Response::Created(task) = submit(&mut dash, Request::Create(draft)).await? {
        println!("Added task {} (due {})", task.id, task.due_date.format("%Y-%m-%d"));
    }
    Ok(())
}

pub async fn cmd_list(
    ctx: &Context,
    status: Option<Status>,
    priority: Option<Priority>,
    due: Option<DueFilter>,
    sort: SortKey,
    limit: Option<usize>,
) -> Result<()> {
    let dash = ctx.dashboard(TaskFilter { status, priority }).await?;
    let today = ctx.today;
    let (week_start, week_end) = start_end_of_this_week(today);

    let mut rows: Vec<&Task> = dash
        .tasks()
        .iter()
        .filter(|t| match due {
            None => true,
            Some(DueFilter::Today) => t.due_date == today,
            Some(DueFilter::ThisWeek) => t.due_date >= week_start && t.due_date <= week_end,
            Some(DueFilter::Overdue) => t.due_date < today && t.status != Status::Completed,
            Some(DueFilter::Upcoming) => t.is_upcoming(today),
        })
        .collect();

    match sort {
        // Listing order is already by due date.
        SortKey::Due => {}
        SortKey::Priority => rows.sort_by_key(|t| (t.priority.rank(), t.due_date)),
        SortKey::Created => rows.sort_by_key(|t| t.created_at),
    }
    if let Some(n) = limit {
        rows.truncate(n);
    }

    if rows.is_empty() {
        println!("No tasks found.");
    } else {
        print_table(&rows, today);
    }
    Ok(())
}

pub async fn cmd_stats(ctx: &Context) -> Result<()> {
    let dash = ctx.dashboard(TaskFilter::default()).await?;
    print_stats(&dash.stats());
    Ok(())
}

pub async fn cmd_set_status(ctx: &Context, id: String, status: Status) -> Result<()> {
    let mut dash = ctx.dashboard(TaskFilter::default()).await?;
    submit(&mut dash, Request::SetStatus { id, status }).await?;
    Ok(())
}

pub async fn cmd_delete(ctx: &Context, id: String) -> Result<()> {
    let mut dash = ctx.dashboard(TaskFilter::default()).await?;
    submit(&mut dash, Request::Delete { id }).await?;
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
