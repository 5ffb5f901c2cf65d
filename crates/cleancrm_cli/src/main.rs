//! CRM command-line entry point.
//!
//! # Responsibility
//! - Act as the form boundary: one record per invocation, added then saved.
//! - Print tabular listings of any collection.

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use cleancrm_core::{
    init_logging, AccountStatus, CleaningChecklist, CleaningFrequency, Client, ContactMethod,
    CrmService, EntityKind, Feedback, Invoice, InvoiceStatus, Property, PropertyType, Rating,
    Record, SalesScript, ServiceTier, StaffMember, StaffRole, StoreBackend, StoreConfig,
    StoreLayout, Task, TaskPriority, TaskStatus,
};
use log::info;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "cleancrm", version = cleancrm_core::core_version())]
#[command(about = "Client records for a cleaning-services business")]
struct Cli {
    /// Combined data file, or directory for the split layout
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value_t = LayoutArg::Combined)]
    layout: LayoutArg,

    #[arg(long, global = true, default_value = cleancrm_core::default_log_level())]
    log_level: String,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Combined,
    Split,
}

impl From<LayoutArg> for StoreLayout {
    fn from(value: LayoutArg) -> Self {
        match value {
            LayoutArg::Combined => StoreLayout::Combined,
            LayoutArg::Split => StoreLayout::Split,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CollectionArg {
    Clients,
    Properties,
    Tasks,
    Staff,
    Invoices,
    Feedback,
    Checklists,
    Scripts,
}

impl From<CollectionArg> for EntityKind {
    fn from(value: CollectionArg) -> Self {
        match value {
            CollectionArg::Clients => EntityKind::Client,
            CollectionArg::Properties => EntityKind::Property,
            CollectionArg::Tasks => EntityKind::Task,
            CollectionArg::Staff => EntityKind::Staff,
            CollectionArg::Invoices => EntityKind::Invoice,
            CollectionArg::Feedback => EntityKind::Feedback,
            CollectionArg::Checklists => EntityKind::Checklist,
            CollectionArg::Scripts => EntityKind::SalesScript,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Add a client
    AddClient(ClientArgs),
    /// Add or replace the property at an address
    AddProperty(PropertyArgs),
    /// Add or replace the active task for a property
    AddTask(TaskArgs),
    /// Add or replace a staff member
    AddStaff(StaffArgs),
    /// Add or replace the invoice for a client
    AddInvoice(InvoiceArgs),
    /// Record client feedback
    AddFeedback(FeedbackArgs),
    /// Add or replace the cleaning checklist for a property
    AddChecklist(ChecklistArgs),
    /// Add a sales-call script
    AddScript(ScriptArgs),
    /// Print one collection as a table
    List {
        #[arg(value_enum)]
        collection: CollectionArg,
    },
    /// Report references to clients, properties or staff that do not exist
    CheckRefs,
}

#[derive(Args)]
struct ClientArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long)]
    preferred_contact: Option<ContactMethod>,
    #[arg(long, default_value = "Basic")]
    tier: ServiceTier,
    #[arg(long, default_value = "Active")]
    status: AccountStatus,
    /// Registration date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    registered: Option<NaiveDate>,
    #[arg(long, default_value_t = 0.0)]
    annual_spend: f64,
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Args)]
struct PropertyArgs {
    #[arg(long)]
    client: String,
    #[arg(long)]
    address: String,
    #[arg(long, default_value = "")]
    size: String,
    #[arg(long = "type", default_value = "Residential")]
    property_type: PropertyType,
    #[arg(long, default_value = "Weekly")]
    frequency: CleaningFrequency,
    #[arg(long)]
    last_cleaned: Option<NaiveDate>,
    #[arg(long, default_value = "")]
    notes: String,
    /// Photo attachment names; shown once and never saved
    #[arg(long = "photo")]
    photos: Vec<String>,
}

#[derive(Args)]
struct TaskArgs {
    #[arg(long)]
    property: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    client: String,
    #[arg(long)]
    staff: Option<String>,
    #[arg(long)]
    date: Option<NaiveDate>,
    #[arg(long)]
    priority: Option<TaskPriority>,
    #[arg(long, default_value = "Pending")]
    status: TaskStatus,
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Args)]
struct StaffArgs {
    #[arg(long)]
    name: String,
    #[arg(long, default_value = "Cleaner")]
    role: StaffRole,
    #[arg(long, default_value = "")]
    email: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    schedule: String,
}

#[derive(Args)]
struct InvoiceArgs {
    #[arg(long)]
    client: String,
    #[arg(long)]
    amount: f64,
    #[arg(long)]
    due: Option<NaiveDate>,
    #[arg(long, default_value = "Unpaid")]
    status: InvoiceStatus,
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Args)]
struct FeedbackArgs {
    #[arg(long)]
    client: String,
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=5))]
    rating: u8,
    #[arg(long, default_value = "")]
    comments: String,
}

#[derive(Args)]
struct ChecklistArgs {
    #[arg(long)]
    property: String,
    /// One checklist entry; repeat for more
    #[arg(long = "item", required = true)]
    items: Vec<String>,
}

#[derive(Args)]
struct ScriptArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    audience: Option<ServiceTier>,
    #[arg(long)]
    body: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = StoreConfig::for_layout(cli.layout.into(), cli.data)
        .with_logging(cli.log_level, cli.log_dir);

    if let Some(log_dir) = &config.log_dir {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let mut service = match CrmService::open(config.open_backend()) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(&mut service, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run<B: StoreBackend>(service: &mut CrmService<B>, command: Command) -> Result<(), String> {
    let record = match command {
        Command::List { collection } => {
            let kind = EntityKind::from(collection);
            let table = service.table(kind);
            if table.is_empty() {
                println!("No {kind} yet.");
            } else {
                print!("{}", table.render_text());
            }
            let superseded = service.store().superseded().len_of(kind);
            if superseded > 0 {
                println!("{superseded} earlier {kind} record(s) kept from an older file.");
            }
            return Ok(());
        }
        Command::CheckRefs => {
            let dangling = service.dangling_references();
            if dangling.is_empty() {
                println!("All references resolve.");
            }
            for reference in dangling {
                println!(
                    "{} `{}` -> missing {} `{}`",
                    reference.from, reference.record, reference.target, reference.key
                );
            }
            return Ok(());
        }
        Command::AddClient(args) => Record::Client(client_from(args)),
        Command::AddProperty(args) => {
            for photo in &args.photos {
                println!("Attached photo {photo} (not saved)");
            }
            Record::Property(property_from(args))
        }
        Command::AddTask(args) => Record::Task(task_from(args)),
        Command::AddStaff(args) => Record::Staff(StaffMember {
            name: args.name,
            email: args.email,
            phone: args.phone,
            role: args.role,
            schedule: args.schedule,
        }),
        Command::AddInvoice(args) => Record::Invoice(Invoice {
            client_name: args.client,
            amount_due: args.amount,
            due_date: args.due,
            status: args.status,
            notes: args.notes,
        }),
        Command::AddFeedback(args) => {
            let rating = Rating::new(args.rating).map_err(|err| err.to_string())?;
            let mut feedback = Feedback::new(args.client, rating);
            feedback.comments = args.comments;
            feedback.submitted_on = Some(Local::now().date_naive());
            Record::Feedback(feedback)
        }
        Command::AddChecklist(args) => {
            Record::Checklist(CleaningChecklist::from_lines(args.property, args.items))
        }
        Command::AddScript(args) => Record::SalesScript(SalesScript {
            title: args.title,
            audience: args.audience,
            body: args.body,
        }),
    };

    let kind = record.kind();
    let label = record.label().to_string();
    let displaced = service.submit(record).map_err(|err| err.to_string())?;
    if displaced.is_some() {
        info!("event=cli_submit module=cli status=ok kind={kind} replaced=true");
        println!("Replaced existing {kind} record for {label}.");
    } else {
        println!("Saved {kind} record for {label}.");
    }
    Ok(())
}

fn client_from(args: ClientArgs) -> Client {
    let mut client = Client::new(args.name);
    client.email = args.email;
    client.phone = args.phone;
    client.address = args.address;
    client.preferred_contact = args.preferred_contact;
    client.service_tier = args.tier;
    client.status = args.status;
    client.registration_date = Some(args.registered.unwrap_or_else(|| Local::now().date_naive()));
    client.annual_spend = args.annual_spend;
    client.notes = args.notes;
    client
}

fn property_from(args: PropertyArgs) -> Property {
    let mut property = Property::new(args.client, args.address);
    property.size = args.size;
    property.property_type = args.property_type;
    property.cleaning_frequency = args.frequency;
    property.last_cleaned = args.last_cleaned;
    property.notes = args.notes;
    property.photos = args.photos;
    property
}

fn task_from(args: TaskArgs) -> Task {
    let mut task = Task::new(args.property);
    task.task_name = args.name;
    task.client_name = args.client;
    task.staff_assigned = args.staff;
    task.date = args.date;
    task.priority = args.priority;
    task.status = args.status;
    task.notes = args.notes;
    task
}
