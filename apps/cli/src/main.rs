use anyhow::{anyhow, bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use flightdeck::engine::accessor::text_of;
use flightdeck::{
    dashboard, fixtures, screens, DateRange, FieldPath, NumericBucket, PipelineOutput, PlanDraft,
    PlanGateway, Record, RecordStore,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "fdk")]
#[command(about = "Flightdeck admin console over the mocked betting stores", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Bet history with search, status and date filters
    Bets {
        #[arg(long, default_value = "")]
        search: String,
        /// all | won | lost
        #[arg(long, default_value = "all")]
        status: String,
        /// all | today | yesterday | thisWeek
        #[arg(long, default_value = "all")]
        date: String,
        /// Column to sort by (overrides the date-desc default)
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        desc: bool,
        /// JSON array of bet records to load instead of the mock data
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Payout management view
    Payouts {
        #[arg(long, default_value = "")]
        search: String,
        /// all | pending | completed | failed
        #[arg(long, default_value = "all")]
        status: String,
        /// all | paypal | bank | crypto
        #[arg(long, default_value = "all")]
        method: String,
        /// all | today | yesterday | thisWeek
        #[arg(long, default_value = "all")]
        date: String,
        #[arg(long)]
        only_pending: bool,
        #[arg(long)]
        sort: Option<String>,
        #[arg(long)]
        desc: bool,
        /// JSON array of payout records to load instead of the mock data
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Flight history (planned rounds only)
    Flights {
        #[arg(long, default_value = "")]
        search: String,
        /// all | today | yesterday | thisWeek
        #[arg(long, default_value = "all")]
        date: String,
        /// all | low | medium | high
        #[arg(long, default_value = "all")]
        multiplier: String,
        /// JSON array of flight records to load instead of the mock data
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Flight plan CRUD
    Plans {
        #[command(subcommand)]
        action: PlanAction,
    },
    /// Headline totals, recent bets and top players
    Dashboard,
    /// Store or verify the admin credential pair
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Save the pair instead of verifying it
        #[arg(long)]
        register: bool,
        #[arg(long, env = "FLIGHTDECK_AUTH_DB", default_value = "flightdeck-auth.redb")]
        store: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum PlanAction {
    List,
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        inactive: bool,
    },
    Edit {
        id: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        inactive: bool,
    },
    /// Delete a plan; destructive, requires --yes
    Rm {
        id: u64,
        #[arg(long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    match args.command {
        Commands::Bets { search, status, date, sort, desc, fixture } => {
            let mut screen = screens::Screen::new(
                screens::bet_history(),
                load_store(fixture, fixtures::bets)?,
            );
            screen.set_text_query(&search);
            screen.select("status", &status);
            screen.set_date_range(parse_date_range(&date)?);
            apply_sort(&mut screen, sort, desc);
            let out = screen.render(Utc::now());
            print_records(
                &out.records,
                &["player", "flightNumber", "amount", "multiplier", "payout", "date", "status"],
            );
            print_summary(&out);
        }
        Commands::Payouts { search, status, method, date, only_pending, sort, desc, fixture } => {
            let mut screen = screens::Screen::new(
                screens::payouts(),
                load_store(fixture, fixtures::payouts)?,
            );
            screen.set_text_query(&search);
            screen.select("status", &status);
            screen.select("method", &method);
            screen.set_date_range(parse_date_range(&date)?);
            screen.set_only_pending(only_pending);
            apply_sort(&mut screen, sort, desc);
            let out = screen.render(Utc::now());
            print_records(&out.records, &["player", "amount", "method", "createdAt", "status"]);
            print_summary(&out);
        }
        Commands::Flights { search, date, multiplier, fixture } => {
            let records = match fixture {
                Some(path) => load_records(&path)?,
                None => fixtures::flights(),
            };
            let mut screen = screens::Screen::new(
                screens::flight_history(),
                RecordStore::from_records(screens::planned_flights_only(records)),
            );
            screen.set_text_query(&search);
            screen.set_date_range(parse_date_range(&date)?);
            screen.set_numeric_bucket("multiplier", parse_bucket(&multiplier)?);
            let out = screen.render(Utc::now());
            print_records(
                &out.records,
                &["flightNumber", "multiplier", "timestamp", "duration", "players"],
            );
            print_summary(&out);
        }
        Commands::Plans { action } => {
            let gateway = PlanGateway::new(RecordStore::from_records(fixtures::flight_plans()));
            run_plan_action(&gateway, action).await?;
        }
        Commands::Dashboard => {
            let bets = fixtures::bets();
            let payouts = fixtures::payouts();
            let flights = screens::planned_flights_only(fixtures::flights());
            let summary = dashboard::summarize(&bets, &payouts, &flights);
            println!("{}", serde_json::to_string_pretty(&summary)?);

            println!("\nRecent bets:");
            print_records(
                &dashboard::recent_bets(&bets, 5),
                &["player", "amount", "multiplier", "payout", "date"],
            );

            println!("\nTop players:");
            for top in dashboard::top_players(&bets, 3) {
                println!(
                    "  {:<16} wins={:<3} payout={}",
                    top.player, top.total_wins, top.total_payout
                );
            }
        }
        Commands::Login { username, password, register, store } => {
            let store = flightdeck::auth::CredentialStore::open(&store)
                .context("opening credential store")?;
            if register {
                store.save(&username, &password)?;
                println!("credentials saved");
            } else if store.verify(&username, &password)? {
                println!("authenticated");
            } else {
                bail!("invalid username or password");
            }
        }
    }
    Ok(())
}

async fn run_plan_action(gateway: &PlanGateway, action: PlanAction) -> Result<()> {
    match action {
        PlanAction::List => {
            let records = gateway.snapshot().await;
            print_records(&records, &["name", "description", "isActive"]);
        }
        PlanAction::Add { name, description, inactive } => {
            let record = gateway
                .create(PlanDraft::new(&name, &description, !inactive))
                .await
                .context("creating flight plan")?;
            println!("created plan {}", record.id);
            print_records(&gateway.snapshot().await, &["name", "description", "isActive"]);
        }
        PlanAction::Edit { id, name, description, inactive } => {
            gateway
                .update(id, PlanDraft::new(&name, &description, !inactive))
                .await
                .context("updating flight plan")?;
            println!("updated plan {id}");
            print_records(&gateway.snapshot().await, &["name", "description", "isActive"]);
        }
        PlanAction::Rm { id, yes } => {
            if !yes {
                bail!("deleting plan {id} is destructive; re-run with --yes to confirm");
            }
            gateway.delete(id).await.context("deleting flight plan")?;
            println!("deleted plan {id}");
            print_records(&gateway.snapshot().await, &["name", "description", "isActive"]);
        }
    }
    Ok(())
}

fn load_records(path: &PathBuf) -> Result<Vec<Record>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    fixtures::records_from_json(&raw)
}

fn load_store(fixture: Option<PathBuf>, default: fn() -> Vec<Record>) -> Result<RecordStore> {
    let records = match fixture {
        Some(path) => load_records(&path)?,
        None => default(),
    };
    Ok(RecordStore::from_records(records))
}

fn apply_sort(screen: &mut screens::Screen, sort: Option<String>, desc: bool) {
    if let Some(key) = sort {
        screen.toggle_sort(&key);
        if desc {
            screen.toggle_sort(&key);
        }
    }
}

fn parse_date_range(s: &str) -> Result<DateRange> {
    match s {
        "all" => Ok(DateRange::All),
        "today" => Ok(DateRange::Today),
        "yesterday" => Ok(DateRange::Yesterday),
        "thisWeek" => Ok(DateRange::ThisWeek),
        other => Err(anyhow!("unknown date range '{other}' (all|today|yesterday|thisWeek)")),
    }
}

fn parse_bucket(s: &str) -> Result<Option<NumericBucket>> {
    match s {
        "all" => Ok(None),
        "low" => Ok(Some(NumericBucket::Low)),
        "medium" => Ok(Some(NumericBucket::Medium)),
        "high" => Ok(Some(NumericBucket::High)),
        other => Err(anyhow!("unknown multiplier bucket '{other}' (all|low|medium|high)")),
    }
}

fn print_records(records: &[Record], fields: &[&str]) {
    if records.is_empty() {
        println!("  (no records)");
        return;
    }
    let paths: Vec<FieldPath> = fields.iter().map(|f| FieldPath::new(f)).collect();
    for record in records {
        let row: Vec<String> = paths.iter().map(|p| text_of(record, p)).collect();
        println!("  #{:<4} {}", record.id, row.join(" | "));
    }
}

fn print_summary(out: &PipelineOutput) {
    println!("---");
    for (name, value) in &out.summary.values {
        println!("  {name}: {value}");
    }
    if out.summary.parse_warnings > 0 {
        println!("  (parse warnings: {})", out.summary.parse_warnings);
    }
}
