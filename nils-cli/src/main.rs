use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use nils_api::types::{AllocationMode, DateRange};
use nils_api::{
    hash_password, CostLineQuery, ErrorSink, NilsClient, NilsError, NilsOptions, Password,
    VendorAssignment,
};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "nils", version, about = "NILS back-office API client")]
struct Cli {
    /// NILS host, e.g. https://nils-tst.example.com
    #[arg(long, env = "NILS_HOST", global = true)]
    host: Option<String>,
    /// Login email
    #[arg(long, env = "NILS_EMAIL", global = true)]
    email: Option<String>,
    /// SHA-1 hashed password
    #[arg(long, env = "NILS_PASSWORD", global = true)]
    password: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Save connection settings to the config file
    Config {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        email: Option<String>,
        /// Raw password; stored as its SHA-1 digest
        #[arg(long)]
        password: Option<String>,
    },
    /// Verify credentials and show the logged-in user
    Login,
    /// List cost lines for a job
    CostLines {
        /// Job number
        job_no: i64,
        /// Consignment number
        #[arg(long)]
        consignment: Option<i64>,
        /// Service codes (default RAIL BRGE SHNT TRCK)
        #[arg(long, num_args = 0..)]
        service: Vec<String>,
        /// Cost codes (default RAIL BRGE SHNT TRCK)
        #[arg(long, num_args = 0..)]
        cost_code: Vec<String>,
        #[arg(long, default_value = "0")]
        start: u32,
        #[arg(long, default_value = "1500")]
        length: u32,
    },
    /// List reference data
    List {
        kind: ListKind,
        #[arg(long, default_value = "0")]
        start: u32,
        /// Page size (defaults to 1500, 500 for commodities and types)
        #[arg(long)]
        length: Option<u32>,
    },
    /// Look up a code table by name
    Type {
        name: String,
    },
    /// Assign a trucking vendor to a job route
    AssignVendor {
        job_route_activity_no: String,
        job_activity_service_no: i64,
        vendor_code: String,
        #[arg(long)]
        planned: bool,
        #[arg(long)]
        confirmed: bool,
        #[arg(long)]
        user_id: String,
    },
    /// Truck Planning Tool sync triggers
    #[command(subcommand)]
    Tpt(TptCommand),
    /// Tank Allocation Tool triggers
    #[command(subcommand)]
    Tat(TatCommand),
}

#[derive(Clone, Copy, ValueEnum)]
enum ListKind {
    Locations,
    G1Codes,
    G2Codes,
    G3Codes,
    G4Codes,
    Commodities,
    Activities,
    Types,
}

#[derive(Subcommand)]
enum TptCommand {
    /// Sync all jobs
    AllJobs {
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
    /// Sync one job
    Job { job_no: String },
    /// Sync all vendors
    AllVendors {
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
    /// Sync one vendor
    Vendor { vendor_id: String },
    /// Sync all rates
    AllRates {
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
    /// Sync one rate
    Rate { rate_id: String },
    /// Sync all currencies
    AllCurrencies {
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
    /// Sync one currency
    Currency { code: String },
}

#[derive(Subcommand)]
enum TatCommand {
    /// Allocate, reserve or release a tank for a job
    Allocate {
        job_no: String,
        unit_number: String,
        #[arg(long, default_value = "validate-allocation")]
        mode: ModeArg,
        #[arg(long)]
        user_id: String,
    },
    /// Sync all job overviews
    AllJobOverviews {
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
    /// Sync one job overview
    JobOverview { job_no: String },
    /// Sync all equipment
    AllEquipment {
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
    /// Sync one tank
    Equipment { tank_id: String },
    /// Sync all labels
    AllLabels {
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
    /// Sync one label
    Label { label_id: String },
    /// Sync all job service requirements
    AllJobServiceRequirements {
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
    /// Sync one job service requirement
    JobServiceRequirement { requirement_no: String },
    /// Sync all logistic rules
    AllLogisticRules {
        #[arg(long)]
        from: Option<i64>,
        #[arg(long)]
        to: Option<i64>,
    },
    /// Sync one logistic rule
    LogisticRule { rule_id: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    ValidateAllocation,
    ValidateReservation,
    Allocate,
    Reserve,
    UnReserve,
    Deallocate,
}

impl From<ModeArg> for AllocationMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::ValidateAllocation => Self::ValidateAllocation,
            ModeArg::ValidateReservation => Self::ValidateReservation,
            ModeArg::Allocate => Self::Allocate,
            ModeArg::Reserve => Self::Reserve,
            ModeArg::UnReserve => Self::UnReserve,
            ModeArg::Deallocate => Self::Deallocate,
        }
    }
}

/// Connection settings persisted at `~/.config/nils/config.json`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Config {
    host: Option<String>,
    email: Option<String>,
    hashed_password: Option<String>,
}

impl Config {
    fn path() -> Result<PathBuf> {
        let config = dirs::config_dir().context("cannot determine config directory")?;
        Ok(config.join("nils").join("config.json"))
    }

    fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))
    }

    fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}

/// Forwards every client error to stderr as it happens.
struct Stderr;

impl ErrorSink for Stderr {
    fn report(&self, error: &NilsError) {
        eprintln!("nils: {error}");
    }
}

fn build_client(cli: &Cli) -> Result<NilsClient> {
    let config = Config::load()?;
    let host = cli
        .host
        .clone()
        .or(config.host)
        .context("no host configured (use --host or `nils config`)")?;
    let email = cli
        .email
        .clone()
        .or(config.email)
        .context("no email configured (use --email or `nils config`)")?;
    let password = cli
        .password
        .clone()
        .or(config.hashed_password)
        .context("no password configured (use --password or `nils config`)")?;

    let options =
        NilsOptions::new(host, email, Password::Hashed(password)).with_error_sink(Arc::new(Stderr));
    Ok(NilsClient::new(options)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn date_range(from: Option<i64>, to: Option<i64>) -> DateRange {
    DateRange { from, to }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Config {
        host,
        email,
        password,
    } = &cli.command
    {
        let mut config = Config::load()?;
        if let Some(host) = host {
            config.host = Some(host.clone());
        }
        if let Some(email) = email {
            config.email = Some(email.clone());
        }
        if let Some(password) = password {
            config.hashed_password = Some(hash_password(password));
        }
        config.save()?;
        println!("saved {}", Config::path()?.display());
        return Ok(());
    }

    let client = build_client(&cli)?;
    match cli.command {
        Command::Config { .. } => unreachable!("handled above"),
        Command::Login => {
            let user = client.login(true).context("login failed")?;
            println!(
                "welcome {} ({})",
                user.full_name.as_deref().unwrap_or("?"),
                user.email
            );
        }
        Command::CostLines {
            job_no,
            consignment,
            service,
            cost_code,
            start,
            length,
        } => {
            let mut query = CostLineQuery::new(job_no);
            query.consignment_no = consignment;
            if !service.is_empty() {
                query.service = service;
            }
            if !cost_code.is_empty() {
                query.cost_code = cost_code;
            }
            query.start = start;
            query.length = length;
            print_json(&client.cost_lines(&query)?)?;
        }
        Command::List {
            kind,
            start,
            length,
        } => match kind {
            ListKind::Locations => {
                print_json(&client.list_locations(start, length.unwrap_or(1500))?)?;
            }
            ListKind::G1Codes => {
                print_json(&client.list_g1_codes(start, length.unwrap_or(1500))?)?;
            }
            ListKind::G2Codes => {
                print_json(&client.list_g2_codes(start, length.unwrap_or(1500))?)?;
            }
            ListKind::G3Codes => {
                print_json(&client.list_g3_codes(start, length.unwrap_or(1500))?)?;
            }
            ListKind::G4Codes => {
                print_json(&client.list_g4_codes(start, length.unwrap_or(1500))?)?;
            }
            ListKind::Commodities => {
                print_json(&client.list_commodities(start, length.unwrap_or(500))?)?;
            }
            ListKind::Activities => {
                print_json(&client.list_activities(start, length.unwrap_or(1500))?)?;
            }
            ListKind::Types => {
                print_json(&client.list_all_types(start, length.unwrap_or(500))?)?;
            }
        },
        Command::Type { name } => {
            print_json(&client.type_by_name(&name)?)?;
        }
        Command::AssignVendor {
            job_route_activity_no,
            job_activity_service_no,
            vendor_code,
            planned,
            confirmed,
            user_id,
        } => {
            let assignment = VendorAssignment {
                job_route_activity_no,
                job_activity_service_no,
                vendor_code,
                planned,
                confirmed,
                user_id,
            };
            client.update_trucking_vendor_for_job(&assignment)?;
            println!("ok");
        }
        Command::Tpt(command) => {
            match command {
                TptCommand::AllJobs { from, to } => client.tpt_sync_all_jobs(date_range(from, to)),
                TptCommand::Job { job_no } => client.tpt_sync_job(&job_no),
                TptCommand::AllVendors { from, to } => {
                    client.tpt_sync_all_vendors(date_range(from, to))
                }
                TptCommand::Vendor { vendor_id } => client.tpt_sync_vendor(&vendor_id),
                TptCommand::AllRates { from, to } => {
                    client.tpt_sync_all_rates(date_range(from, to))
                }
                TptCommand::Rate { rate_id } => client.tpt_sync_rate(&rate_id),
                TptCommand::AllCurrencies { from, to } => {
                    client.tpt_sync_all_currencies(date_range(from, to))
                }
                TptCommand::Currency { code } => client.tpt_sync_currency(&code),
            }?;
            println!("ok");
        }
        Command::Tat(command) => {
            match command {
                TatCommand::Allocate {
                    job_no,
                    unit_number,
                    mode,
                    user_id,
                } => client.tat_allocate_tank_to_job(&job_no, &unit_number, mode.into(), &user_id),
                TatCommand::AllJobOverviews { from, to } => {
                    client.tat_sync_all_job_overviews(date_range(from, to))
                }
                TatCommand::JobOverview { job_no } => client.tat_sync_job_overview(&job_no),
                TatCommand::AllEquipment { from, to } => {
                    client.tat_sync_all_equipment(date_range(from, to))
                }
                TatCommand::Equipment { tank_id } => client.tat_sync_equipment(&tank_id),
                TatCommand::AllLabels { from, to } => {
                    client.tat_sync_all_labels(date_range(from, to))
                }
                TatCommand::Label { label_id } => client.tat_sync_label(&label_id),
                TatCommand::AllJobServiceRequirements { from, to } => {
                    client.tat_sync_all_job_service_requirements(date_range(from, to))
                }
                TatCommand::JobServiceRequirement { requirement_no } => {
                    client.tat_sync_job_service_requirement(&requirement_no)
                }
                TatCommand::AllLogisticRules { from, to } => {
                    client.tat_sync_all_logistic_rules(date_range(from, to))
                }
                TatCommand::LogisticRule { rule_id } => client.tat_sync_logistic_rule(&rule_id),
            }?;
            println!("ok");
        }
    }
    Ok(())
}
