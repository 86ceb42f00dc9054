//! Command-line admin dashboard.
//!
//! Every command except `login` requires a stored session. With `--demo` the
//! commands run against the built-in sample records instead of the API; changes
//! made in demo mode last for a single invocation only.

use std::{
    fs::File,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Args, Parser, Subcommand};

use orphanage_admin::{
    client::{
        controller::{ControllerOptions, ListView, ResourceListController},
        error::RequestFailed,
        gateway::CrudGateway,
        http::ApiClient,
        memory::MemoryGateway,
        notify::{Notifications, ToastKind},
        resource::Resource,
        sample,
        session::{Authenticator, Session, SessionStore},
    },
    config::ClientConfig,
    models::{
        auth::LoginResponse,
        donation::Donation,
        expense::Expense,
        member::Member,
        orphan::Orphan,
        query::ListQuery,
        stats::{current_month, DashboardStats, DonationStats, Report},
        EntityId,
    },
};

#[derive(Parser)]
#[command(name = "admin", about = "Orphanage administration dashboard")]
struct Cli {
    /// Work offline on the built-in sample data
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Log in and remember the session
    Login {
        #[arg(long, short)]
        username: String,
        #[arg(long, short)]
        password: String,
    },
    Logout,
    /// Show who is logged in
    Whoami,
    /// Headline numbers, the latest donations and newest orphans
    Dashboard,
    /// Monthly donations, ages, donation types and expense categories
    Report,
    #[command(subcommand)]
    Orphans(ResourceCommand),
    #[command(subcommand)]
    Donations(ResourceCommand),
    #[command(subcommand)]
    Members(ResourceCommand),
    #[command(subcommand)]
    Expenses(ResourceCommand),
}

#[derive(Args, Clone, Default)]
struct ListArgs {
    /// Case-insensitive text search
    #[arg(long, short)]
    search: Option<String>,
    /// Categorical filter, e.g. `--filter status=active` (`all` clears)
    #[arg(long = "filter", short, value_parser = parse_key_val)]
    filters: Vec<(String, String)>,
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Subcommand, Clone)]
enum ResourceCommand {
    List(ListArgs),
    Show {
        id: EntityId,
    },
    /// Create a record from `--field key=value` pairs
    Add {
        #[arg(long = "field", short, value_parser = parse_key_val)]
        fields: Vec<(String, String)>,
    },
    /// Replace a record; unspecified fields keep their current value
    Edit {
        id: EntityId,
        #[arg(long = "field", short, value_parser = parse_key_val)]
        fields: Vec<(String, String)>,
    },
    Delete {
        id: EntityId,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Write the filtered list as CSV
    Export {
        #[command(flatten)]
        list: ListArgs,
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{s}`"))?;
    Ok((key.trim().to_string(), value.to_string()))
}

/// Offline stand-in for `/login`: any non-empty credentials open a session.
struct DemoAuthenticator;

#[async_trait]
impl Authenticator for DemoAuthenticator {
    async fn authenticate(&self, username: &str, _password: &str) -> Result<LoginResponse, RequestFailed> {
        Ok(LoginResponse {
            success: true,
            username: Some(username.to_string()),
            message: Some("Demo login".to_string()),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let api = ApiClient::new(&config.api_url);
    let mut session = Session::open(SessionStore::new(&config.session_file))
        .context("Failed to open session file")?;

    let options = ControllerOptions {
        search_debounce: config.search_debounce,
        toast_ttl: config.toast_ttl,
        ..if cli.demo {
            ControllerOptions::local()
        } else {
            ControllerOptions::remote()
        }
    };

    match cli.command {
        Command::Login { username, password } => {
            let mut toasts = Notifications::new(config.toast_ttl);
            let result = if cli.demo {
                session.login(&DemoAuthenticator, &username, &password).await
            } else {
                session.login(&api, &username, &password).await
            };
            match result {
                Ok(_) => {
                    toasts.success("Login successful! Welcome back admin.");
                }
                Err(e) => {
                    toasts.error(e.to_string());
                }
            }
            print_toasts(&mut toasts);
            session.require()?;
        }
        Command::Logout => {
            session.logout()?;
            println!("Logged out");
        }
        Command::Whoami => {
            println!("{}", session.require()?);
        }
        Command::Dashboard => {
            session.require()?;
            let (stats, donations) = if cli.demo {
                demo_dashboard()
            } else {
                (api.dashboard_stats().await?, api.donation_stats().await?)
            };
            print_dashboard(&stats, &donations);
        }
        Command::Report => {
            session.require()?;
            let report = if cli.demo { demo_report() } else { api.report().await? };
            print_report(&report);
        }
        Command::Orphans(cmd) => {
            session.require()?;
            if cli.demo {
                run::<Orphan, _>(MemoryGateway::new(sample::orphans()), options, cmd).await?;
            } else {
                run::<Orphan, _>(api.gateway(), options, cmd).await?;
            }
        }
        Command::Donations(cmd) => {
            session.require()?;
            if cli.demo {
                run::<Donation, _>(MemoryGateway::new(sample::donations()), options, cmd).await?;
            } else {
                run::<Donation, _>(api.gateway(), options, cmd).await?;
            }
        }
        Command::Members(cmd) => {
            session.require()?;
            if cli.demo {
                run::<Member, _>(MemoryGateway::new(sample::members()), options, cmd).await?;
            } else {
                run::<Member, _>(api.gateway(), options, cmd).await?;
            }
        }
        Command::Expenses(cmd) => {
            session.require()?;
            if cli.demo {
                run::<Expense, _>(MemoryGateway::new(sample::expenses()), options, cmd).await?;
            } else {
                run::<Expense, _>(api.gateway(), options, cmd).await?;
            }
        }
    }

    Ok(())
}

async fn run<R, G>(gateway: G, options: ControllerOptions, cmd: ResourceCommand) -> Result<()>
where
    R: Resource,
    G: CrudGateway<R>,
{
    let mut ctrl = ResourceListController::<R, G>::new(gateway, options);

    let outcome = match cmd {
        ResourceCommand::List(args) => {
            apply_list_args(&mut ctrl, &args).await;
            print_table(&ctrl);
            Ok(())
        }
        ResourceCommand::Show { id } => match ctrl.gateway().fetch(id).await {
            Ok(record) => {
                for (field, value) in record.to_form().fields() {
                    println!("{field:>18}: {value}");
                }
                Ok(())
            }
            Err(e) => Err(e.into()),
        },
        ResourceCommand::Add { fields } => {
            ctrl.open_create();
            for (key, value) in fields {
                ctrl.set_field(&key, value);
            }
            ctrl.submit().await.map(|record| print_row::<R>(&record))
        }
        ResourceCommand::Edit { id, fields } => match ctrl.open_edit(id).await {
            Ok(()) => {
                for (key, value) in fields {
                    ctrl.set_field(&key, value);
                }
                ctrl.submit().await.map(|record| print_row::<R>(&record))
            }
            Err(e) => Err(e),
        },
        ResourceCommand::Delete { id, yes } => {
            ctrl.request_delete(id);
            if yes || confirm(&format!("Delete {} #{id}?", R::LABEL))? {
                ctrl.confirm_delete().await
            } else {
                ctrl.cancel_delete();
                println!("Cancelled");
                Ok(())
            }
        }
        ResourceCommand::Export { list, output } => {
            apply_list_args(&mut ctrl, &list).await;
            export_csv(&ctrl, output)?;
            Ok(())
        }
    };

    print_toasts(ctrl.notifications_mut());
    outcome.map_err(anyhow::Error::from)
}

/// Applies search, filters and paging, then loads once.
async fn apply_list_args<R: Resource, G: CrudGateway<R>>(
    ctrl: &mut ResourceListController<R, G>,
    args: &ListArgs,
) {
    let mut query = ListQuery::default();
    if let Some(search) = &args.search {
        query.set_search(search);
    }
    for (key, value) in &args.filters {
        if !R::FILTERS.contains(&key.as_str()) {
            eprintln!("Unknown {} filter `{key}`; expected one of {:?}", R::LABEL, R::FILTERS);
        }
        query.set_filter(key, value);
    }
    query.page = args.page;
    query.limit = args.limit;
    ctrl.set_query(query);
    // Failures land in the view and the toast queue.
    let _ = ctrl.load().await;
}

fn print_table<R: Resource, G: CrudGateway<R>>(ctrl: &ResourceListController<R, G>) {
    println!("{}", R::COLUMNS.join(" | "));
    match ctrl.view() {
        ListView::Loading => println!("Loading..."),
        ListView::Failed(message) => println!("Failed to load {}: {message}", R::PATH),
        ListView::Empty => println!("No {} found", R::PATH),
        ListView::Rows(rows) => {
            for record in rows {
                println!("{}", record.row().join(" | "));
            }
        }
    }
}

fn print_row<R: Resource>(record: &R) {
    println!("{}", record.row().join(" | "));
}

fn export_csv<R: Resource, G: CrudGateway<R>>(
    ctrl: &ResourceListController<R, G>,
    output: Option<PathBuf>,
) -> Result<()> {
    let sink: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(R::COLUMNS)?;
    let rows = ctrl.visible();
    for record in &rows {
        writer.write_record(record.row())?;
    }
    writer.flush()?;
    if let Some(path) = output {
        eprintln!("Exported {} {} to {}", rows.len(), R::PATH, path.display());
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_toasts(toasts: &mut Notifications) {
    for toast in toasts.drain() {
        match toast.kind {
            ToastKind::Success => eprintln!("✓ {}", toast.message),
            ToastKind::Error => eprintln!("✗ {}", toast.message),
        }
    }
}

fn demo_dashboard() -> (DashboardStats, DonationStats) {
    let donations = sample::donations();
    let stats = DashboardStats::from_records(&sample::orphans(), &donations, &sample::expenses());
    (stats, DonationStats::from_donations(&donations, &current_month()))
}

fn demo_report() -> Report {
    Report::from_records(&sample::orphans(), &sample::donations(), &sample::expenses())
}

fn print_dashboard(stats: &DashboardStats, donations: &DonationStats) {
    println!("Orphans:          {} ({} adopted)", stats.orphan_count, stats.adopted_count);
    println!("Total donations:  ${:.2}", stats.total_donations);
    println!("This month:       ${:.2}", donations.monthly);
    println!("Donors:           {}", donations.donors);
    println!("Total expenses:   ${:.2}", stats.total_expenses);
    println!();
    println!("Recent donations:");
    if stats.recent_donations.is_empty() {
        println!("  none");
    }
    for donation in &stats.recent_donations {
        println!("  {}", donation.row().join(" | "));
    }
    println!();
    println!("Recent orphans:");
    if stats.recent_orphans.is_empty() {
        println!("  none");
    }
    for orphan in &stats.recent_orphans {
        println!("  {}", orphan.row().join(" | "));
    }
}

fn print_report(report: &Report) {
    println!("Monthly donations:");
    for m in &report.monthly_donations {
        println!("  {}  ${:.2}", m.month, m.amount);
    }
    println!("Orphans by age:");
    for a in &report.orphans_by_age {
        println!("  {:>5}  {}", a.age, a.count);
    }
    println!("Donations by type:");
    for t in &report.donations_by_type {
        println!("  {:<10} {}", t.name, t.value);
    }
    println!("Expenses by category:");
    for c in &report.expenses_by_category {
        println!("  {:<10} ${:.2}", c.name, c.value);
    }
}
