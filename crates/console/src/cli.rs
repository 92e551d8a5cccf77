//! Command-line surface of the console.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use warden_client::{
    AdminApi, ApiClient, AssignmentOwner, ReportFormat, ReportRequest,
};
use warden_core::{ListFilter, PageRequest, PermissionId, RoleId, UserId};
use warden_rbac::{AuditEvent, Module, Role, User};

use crate::editor::EditSession;
use crate::state::ListState;
use crate::{import, reports};

#[derive(Debug, Parser)]
#[command(
    name = "warden-console",
    version,
    about = "Terminal console for the Warden identity backend"
)]
pub struct Cli {
    /// Base URL of the backend API.
    #[arg(long, env = "WARDEN_API_URL", default_value = "http://127.0.0.1:8080")]
    pub api_url: String,

    /// Bearer credential for the session.
    #[arg(long, env = "WARDEN_CREDENTIAL", hide_env_values = true)]
    pub credential: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the identity and permissions of the active session.
    Whoami,

    /// List user accounts.
    Users(ListArgs),

    /// List roles.
    Roles(ListArgs),

    /// List modules.
    Modules(ListArgs),

    /// List audit log entries.
    Audit(AuditArgs),

    /// Show the permission catalog.
    Permissions {
        /// Group the catalog by owning module.
        #[arg(long)]
        grouped: bool,
    },

    /// Edit the permission assignment of a role (or a user/role pairing).
    Assign(AssignArgs),

    /// Bulk-create records from a CSV spreadsheet ("fast charge").
    #[command(subcommand)]
    Import(ImportCommand),

    /// Generate a report and save it to a file.
    Report(ReportArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = 25)]
    pub page_size: u32,

    /// Substring filter on name.
    #[arg(long)]
    pub name: Option<String>,

    /// Substring filter on email (users only).
    #[arg(long)]
    pub email: Option<String>,

    /// Equality filter on the active flag.
    #[arg(long)]
    pub active: Option<bool>,
}

impl ListArgs {
    fn filter(&self) -> ListFilter {
        ListFilter {
            name: self.name.clone(),
            email: self.email.clone(),
            active: self.active,
            event: None,
            module: None,
        }
    }

    fn page(&self) -> PageRequest {
        PageRequest::new(self.page, self.page_size)
    }
}

#[derive(Debug, Args)]
pub struct AuditArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long, default_value_t = 25)]
    pub page_size: u32,

    /// Equality filter on event kind (e.g. "role.permission_granted").
    #[arg(long)]
    pub event: Option<String>,

    /// Equality filter on module name.
    #[arg(long)]
    pub module: Option<String>,
}

#[derive(Debug, Args)]
pub struct AssignArgs {
    /// Role whose assignment is edited.
    #[arg(long)]
    pub role: RoleId,

    /// Edit the pairing of this user with the role instead of the role
    /// itself.
    #[arg(long)]
    pub user: Option<UserId>,

    /// The full desired selection (comma-separated permission IDs).
    #[arg(long = "select", value_delimiter = ',')]
    pub selected: Vec<PermissionId>,

    /// Skip the confirmation prompt.
    #[arg(long)]
    pub yes: bool,
}

#[derive(Debug, Subcommand)]
pub enum ImportCommand {
    /// Bulk-create users from `name,email,role_id` rows.
    Users { file: PathBuf },

    /// Bulk-create permissions from `name,description,module_id` rows.
    Permissions { file: PathBuf },
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Output format: pdf or xlsx.
    #[arg(long, default_value = "pdf")]
    pub format: String,

    /// Destination file.
    #[arg(long)]
    pub out: PathBuf,

    /// Substring filter on name.
    #[arg(long)]
    pub name: Option<String>,

    /// Equality filter on module name.
    #[arg(long)]
    pub module: Option<String>,
}

pub async fn run(command: Command, api: &ApiClient) -> anyhow::Result<()> {
    match command {
        Command::Whoami => whoami(api),
        Command::Users(args) => list_users(api, &args).await,
        Command::Roles(args) => list_roles(api, &args).await,
        Command::Modules(args) => list_modules(api, &args).await,
        Command::Audit(args) => list_audit(api, &args).await,
        Command::Permissions { grouped } => list_permissions(api, grouped).await,
        Command::Assign(args) => assign(api, args).await,
        Command::Import(cmd) => run_import(api, cmd).await,
        Command::Report(args) => report(api, args).await,
    }
}

fn whoami(api: &ApiClient) -> anyhow::Result<()> {
    match api.auth().claims() {
        Some(claims) => {
            println!("{} ({})", claims.name, claims.sub);
            println!("expires: {}", claims.expires_at);
            for key in &claims.permissions {
                println!("  {key}");
            }
            Ok(())
        }
        None => anyhow::bail!("not authenticated; pass --credential or set WARDEN_CREDENTIAL"),
    }
}

async fn list_users(api: &ApiClient, args: &ListArgs) -> anyhow::Result<()> {
    let mut state: ListState<User> = ListState::new(args.page_size);
    state.set_filter(args.filter());
    let fetched = api.list_users(args.page(), state.filter()).await?;
    state.apply(fetched);

    for user in state.items() {
        println!(
            "{}  {:<24} {:<32} {}",
            user.id,
            user.name,
            user.email,
            if user.active { "active" } else { "inactive" }
        );
    }
    print_page_footer(state.page(), state.total_pages(), state.total());
    Ok(())
}

async fn list_roles(api: &ApiClient, args: &ListArgs) -> anyhow::Result<()> {
    let mut state: ListState<Role> = ListState::new(args.page_size);
    state.set_filter(args.filter());
    let fetched = api.list_roles(args.page(), state.filter()).await?;
    state.apply(fetched);

    for role in state.items() {
        println!(
            "{}  {:<24} {:<3} permissions  {}",
            role.id,
            role.name,
            role.permissions.len(),
            if role.active { "active" } else { "inactive" }
        );
    }
    print_page_footer(state.page(), state.total_pages(), state.total());
    Ok(())
}

async fn list_modules(api: &ApiClient, args: &ListArgs) -> anyhow::Result<()> {
    let mut state: ListState<Module> = ListState::new(args.page_size);
    state.set_filter(args.filter());
    let fetched = api.list_modules(args.page(), state.filter()).await?;
    state.apply(fetched);

    for module in state.items() {
        println!(
            "{}  {:<24} {}",
            module.id,
            module.name,
            if module.active { "active" } else { "inactive" }
        );
    }
    print_page_footer(state.page(), state.total_pages(), state.total());
    Ok(())
}

async fn list_audit(api: &ApiClient, args: &AuditArgs) -> anyhow::Result<()> {
    let filter = ListFilter {
        event: args.event.clone(),
        module: args.module.clone(),
        ..ListFilter::default()
    };
    let mut state: ListState<AuditEvent> = ListState::new(args.page_size);
    state.set_filter(filter);
    let fetched = api
        .list_audit(PageRequest::new(args.page, args.page_size), state.filter())
        .await?;
    state.apply(fetched);

    for entry in state.items() {
        println!(
            "{}  {:<28} {:<16} {:<12} {}",
            entry.occurred_at, entry.event, entry.actor, entry.module, entry.detail
        );
    }
    print_page_footer(state.page(), state.total_pages(), state.total());
    Ok(())
}

async fn list_permissions(api: &ApiClient, grouped: bool) -> anyhow::Result<()> {
    let catalog = warden_rbac::PermissionCatalog::new(api.permission_catalog().await?);

    if grouped {
        for group in catalog.grouped_by_module() {
            println!("{}:", group.module);
            for perm in &group.permissions {
                println!("  {}  {:<28} {}", perm.id, perm.name, perm.description);
            }
        }
    } else {
        for perm in catalog.all() {
            println!("{}  {:<28} {}", perm.id, perm.name, perm.description);
        }
    }
    Ok(())
}

async fn assign(api: &ApiClient, args: AssignArgs) -> anyhow::Result<()> {
    let owner = match args.user {
        Some(user) => AssignmentOwner::UserRole {
            user,
            role: args.role,
        },
        None => AssignmentOwner::Role(args.role),
    };

    let mut session = EditSession::begin(api, owner).await?;
    session.set_desired(args.selected.iter().copied())?;

    let delta = session.pending_delta();
    if delta.is_empty() {
        println!("no changes");
        return Ok(());
    }

    println!("{}", session.describe_delta());
    if !args.yes && !confirm("apply these changes?")? {
        println!("cancelled");
        return Ok(());
    }

    let outcome = session.commit(api).await;
    for failure in &outcome.failures {
        eprintln!(
            "failed to {} {}: {}",
            match failure.op {
                crate::editor::CommitOp::Grant => "grant",
                crate::editor::CommitOp::Revoke => "revoke",
            },
            failure.permission,
            failure.error
        );
    }

    // The local selection is not trusted after a commit; re-fetch.
    let current = api.owner_permissions(&owner).await?;
    println!(
        "applied {} grants, {} revokes; {} now assigned",
        outcome.granted.len(),
        outcome.revoked.len(),
        current.len()
    );

    if !outcome.is_clean() {
        anyhow::bail!("{} change(s) failed; assignment is partially applied", outcome.failures.len());
    }
    Ok(())
}

async fn run_import(api: &ApiClient, cmd: ImportCommand) -> anyhow::Result<()> {
    match cmd {
        ImportCommand::Users { file } => {
            let rows = import::read_user_rows(std::fs::File::open(&file)?)?;
            let count = import::fast_charge_users(api, &rows).await?;
            println!("submitted {count} users");
        }
        ImportCommand::Permissions { file } => {
            let rows = import::read_permission_rows(std::fs::File::open(&file)?)?;
            let count = import::fast_charge_permissions(api, &rows).await?;
            println!("submitted {count} permissions");
        }
    }
    Ok(())
}

async fn report(api: &ApiClient, args: ReportArgs) -> anyhow::Result<()> {
    let format = match args.format.to_lowercase().as_str() {
        "pdf" => ReportFormat::Pdf,
        "xlsx" => ReportFormat::Xlsx,
        other => anyhow::bail!("unknown report format '{other}' (expected pdf or xlsx)"),
    };

    let requested_by = api
        .auth()
        .claims()
        .map(|c| c.name)
        .ok_or_else(|| anyhow::anyhow!("not authenticated; reports carry the requesting user"))?;

    let request = ReportRequest {
        filter: ListFilter {
            name: args.name.clone(),
            module: args.module.clone(),
            ..ListFilter::default()
        },
        format,
        requested_by,
    };

    let bytes = reports::download_report(api, &request, &args.out).await?;
    println!("wrote {} bytes to {}", bytes, args.out.display());
    Ok(())
}

fn print_page_footer(page: PageRequest, total_pages: u32, total: u64) {
    println!("page {} of {} ({} total)", page.page, total_pages, total);
}

fn confirm(prompt: &str) -> io::Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
