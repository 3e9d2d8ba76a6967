use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use flightdesk_core::{
    FlightField, FlightStatus, FlightUpdate, FlightView, MissingRowPolicy, NewDestination,
    NewFlight, NewPilot, StoreConfig, parse_date, parse_time,
};
use flightdesk_sqlite::FlightStore;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Configuration file read when `--config` is not given.
const DEFAULT_CONFIG: &str = "flightdesk.yml";

/// Output format for read commands.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Table,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "flightdesk")]
#[command(about = "Manage and report on flights, pilots and destinations")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// YAML configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,
    /// Database file path (overrides the configuration file).
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Disable foreign-key enforcement for this run.
    #[arg(long, global = true)]
    no_foreign_keys: bool,
    /// Fail when an update or delete matches no row.
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Drop and recreate the tables, then load the sample data.
    Init,
    /// Show whether the tables exist and how many rows they hold.
    Status,
    /// List, add, update and delete flights.
    Flights(FlightsArgs),
    /// List, add and delete destinations.
    Destinations(DestinationsArgs),
    /// List and add pilots, or show a pilot's schedule.
    Pilots(PilotsArgs),
    /// Run a reporting query.
    Report(ReportArgs),
}

#[derive(Debug, Args)]
struct FlightsArgs {
    #[command(subcommand)]
    operation: FlightsOperation,
}

#[derive(Debug, Subcommand)]
enum FlightsOperation {
    /// List flights, optionally filtered.
    List(ListFlightsArgs),
    /// Show a single flight.
    Show(ShowFlightArgs),
    /// Add a flight.
    Add(AddFlightArgs),
    /// Change one field of a flight.
    Update(UpdateFlightArgs),
    /// Delete a flight.
    Delete(DeleteFlightArgs),
}

#[derive(Debug, Args)]
#[group(id = "filter", multiple = false)]
struct FlightFilter {
    /// Only flights with this status.
    #[arg(long)]
    status: Option<FlightStatus>,
    /// Only flights arriving at this airport.
    #[arg(long)]
    airport: Option<String>,
    /// Only flights arriving in this city.
    #[arg(long)]
    city: Option<String>,
    /// Only flights departing on this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,
}

#[derive(Debug, Args)]
struct ListFlightsArgs {
    #[command(flatten)]
    filter: FlightFilter,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ShowFlightArgs {
    /// Flight id.
    id: i64,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct AddFlightArgs {
    /// Departure date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date)]
    date: NaiveDate,
    /// Departure time (HH:MM, 24-hour).
    #[arg(long, value_parser = parse_time)]
    time: chrono::NaiveTime,
    /// Origin destination id.
    #[arg(long)]
    origin: i64,
    /// Arrival destination id.
    #[arg(long)]
    destination: i64,
    /// Pilot id.
    #[arg(long)]
    pilot: i64,
    /// Initial status.
    #[arg(long, default_value = "Scheduled")]
    status: FlightStatus,
}

#[derive(Debug, Args)]
struct UpdateFlightArgs {
    /// Flight id.
    id: i64,
    /// Field to change: date, time, status, pilot_id, origin_id or destination_id.
    #[arg(long)]
    field: FlightField,
    /// New value for the field.
    #[arg(long)]
    value: String,
}

#[derive(Debug, Args)]
struct DeleteFlightArgs {
    /// Flight id.
    id: i64,
}

#[derive(Debug, Args)]
struct DestinationsArgs {
    #[command(subcommand)]
    operation: DestinationsOperation,
}

#[derive(Debug, Subcommand)]
enum DestinationsOperation {
    /// List all destinations.
    List(ListArgs),
    /// Add a destination.
    Add(AddDestinationArgs),
    /// Delete a destination by id or by airport name.
    Delete(DeleteDestinationArgs),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct AddDestinationArgs {
    #[arg(long)]
    airport: String,
    #[arg(long)]
    city: String,
    #[arg(long)]
    country: String,
}

#[derive(Debug, Args)]
#[group(id = "key", required = true, multiple = false)]
struct DeleteDestinationArgs {
    /// Destination id.
    #[arg(long)]
    id: Option<i64>,
    /// Airport name; removes every destination with this name.
    #[arg(long)]
    airport: Option<String>,
}

#[derive(Debug, Args)]
struct PilotsArgs {
    #[command(subcommand)]
    operation: PilotsOperation,
}

#[derive(Debug, Subcommand)]
enum PilotsOperation {
    /// List all pilots.
    List(ListArgs),
    /// Add a pilot.
    Add(AddPilotArgs),
    /// Show a pilot's flights.
    Schedule(ScheduleArgs),
}

#[derive(Debug, Args)]
struct AddPilotArgs {
    #[arg(long)]
    forename: String,
    #[arg(long)]
    surname: String,
    /// License number.
    #[arg(long)]
    license: String,
    /// Years of flying experience.
    #[arg(long)]
    years: u32,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
}

#[derive(Debug, Args)]
struct ScheduleArgs {
    /// Pilot id.
    id: i64,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum ReportKind {
    /// Flights per pilot, busiest first.
    PilotFlights,
    /// Three most experienced pilots.
    Experienced,
    /// Three least experienced pilots.
    Inexperienced,
    /// Three destinations with the most arrivals.
    Popular,
    /// Three destinations with the fewest arrivals.
    Unpopular,
}

#[derive(Debug, Args)]
struct ReportArgs {
    /// Which report to run.
    kind: ReportKind,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = load_config(&cli.global)?;
    debug!(?config, "resolved configuration");

    let store = FlightStore::open(&config).map_err(|e| {
        format!(
            "Failed to open database '{}': {e}",
            config.database.display()
        )
    })?;

    let outcome = dispatch(&store, &config, cli.command);
    let closed = store
        .close()
        .map_err(|e| format!("Failed to close database: {e}"));
    outcome.and(closed)
}

fn dispatch(store: &FlightStore, config: &StoreConfig, command: Command) -> Result<(), String> {
    if !matches!(command, Command::Init | Command::Status) {
        ensure_initialized(store, config)?;
    }

    match command {
        Command::Init => run_init(store),
        Command::Status => run_status(store),
        Command::Flights(args) => run_flights(store, args),
        Command::Destinations(args) => run_destinations(store, args),
        Command::Pilots(args) => run_pilots(store, args),
        Command::Report(args) => run_report(store, args),
    }
}

/// Reads the configuration file, if present, and applies command-line overrides.
fn load_config(global: &GlobalArgs) -> Result<StoreConfig, String> {
    let mut config = StoreConfig::load_or_default(&global.config).map_err(|e| {
        format!(
            "Failed to load configuration '{}': {e}",
            global.config.display()
        )
    })?;

    if let Some(db) = &global.db {
        config.database = db.clone();
    }
    if global.no_foreign_keys {
        config.foreign_keys = false;
    }
    if global.strict {
        config.missing_rows = MissingRowPolicy::Error;
    }
    Ok(config)
}

fn ensure_initialized(store: &FlightStore, config: &StoreConfig) -> Result<(), String> {
    let status = store
        .migration()
        .status()
        .map_err(|e| format!("Failed to read database status: {e}"))?;
    if !status.tables_exist {
        return Err(format!(
            "Database '{}' has no flight tables; run `flightdesk init` first",
            config.database.display()
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// init / status
// ---------------------------------------------------------------------------

fn run_init(store: &FlightStore) -> Result<(), String> {
    let report = store
        .migration()
        .reset()
        .map_err(|e| format!("Initialization failed: {e}"))?;
    println!("Database initialized:");
    println!("  Destinations inserted: {}", report.destinations_inserted);
    println!("  Pilots inserted: {}", report.pilots_inserted);
    println!("  Flights inserted: {}", report.flights_inserted);
    Ok(())
}

fn run_status(store: &FlightStore) -> Result<(), String> {
    let status = store
        .migration()
        .status()
        .map_err(|e| format!("Failed to get database status: {e}"))?;
    let foreign_keys = store
        .foreign_keys_enabled()
        .map_err(|e| format!("Failed to read foreign-key setting: {e}"))?;
    println!("Database Status:");
    println!(
        "  Tables exist: {}",
        if status.tables_exist { "yes" } else { "no" }
    );
    println!(
        "  Foreign keys: {}",
        if foreign_keys { "enforced" } else { "off" }
    );
    println!("  Destination count: {}", status.destination_count);
    println!("  Pilot count: {}", status.pilot_count);
    println!("  Flight count: {}", status.flight_count);
    Ok(())
}

// ---------------------------------------------------------------------------
// flights
// ---------------------------------------------------------------------------

fn run_flights(store: &FlightStore, args: FlightsArgs) -> Result<(), String> {
    match args.operation {
        FlightsOperation::List(a) => run_flights_list(store, a),
        FlightsOperation::Show(a) => run_flights_show(store, a),
        FlightsOperation::Add(a) => run_flights_add(store, a),
        FlightsOperation::Update(a) => run_flights_update(store, a),
        FlightsOperation::Delete(a) => run_flights_delete(store, a),
    }
}

fn run_flights_list(store: &FlightStore, args: ListFlightsArgs) -> Result<(), String> {
    let query = store.query();
    let filter = args.filter;
    let flights = if let Some(status) = filter.status {
        query.flights_by_status(status)
    } else if let Some(airport) = &filter.airport {
        query.flights_by_airport(airport)
    } else if let Some(city) = &filter.city {
        query.flights_by_city(city)
    } else if let Some(date) = filter.date {
        query.flights_by_date(date)
    } else {
        query.flights()
    }
    .map_err(|e| format!("Failed to list flights: {e}"))?;

    emit_flights(&flights, args.format)
}

fn run_flights_show(store: &FlightStore, args: ShowFlightArgs) -> Result<(), String> {
    let flight = store
        .query()
        .flight(args.id)
        .map_err(|e| format!("Failed to load flight: {e}"))?
        .ok_or_else(|| format!("Flight {} not found", args.id))?;
    emit_flights(&[flight], args.format)
}

fn run_flights_add(store: &FlightStore, args: AddFlightArgs) -> Result<(), String> {
    let flight = NewFlight {
        date: args.date,
        time: args.time,
        origin_id: args.origin,
        destination_id: args.destination,
        pilot_id: args.pilot,
        status: args.status,
    };
    let id = store
        .records()
        .insert_flight(&flight)
        .map_err(|e| format!("Failed to add flight: {e}"))?;
    println!("Added flight {id}.");
    Ok(())
}

fn run_flights_update(store: &FlightStore, args: UpdateFlightArgs) -> Result<(), String> {
    let update = FlightUpdate::parse(args.field, &args.value).map_err(|e| e.to_string())?;
    let rows = store
        .records()
        .update_flight(args.id, update)
        .map_err(|e| format!("Failed to update flight: {e}"))?;
    println!("Updated {rows} flight(s).");
    Ok(())
}

fn run_flights_delete(store: &FlightStore, args: DeleteFlightArgs) -> Result<(), String> {
    let rows = store
        .records()
        .delete_flight(args.id)
        .map_err(|e| format!("Failed to delete flight: {e}"))?;
    println!("Deleted {rows} flight(s).");
    Ok(())
}

// ---------------------------------------------------------------------------
// destinations
// ---------------------------------------------------------------------------

fn run_destinations(store: &FlightStore, args: DestinationsArgs) -> Result<(), String> {
    match args.operation {
        DestinationsOperation::List(a) => {
            let destinations = store
                .query()
                .destinations()
                .map_err(|e| format!("Failed to list destinations: {e}"))?;
            emit(
                &destinations,
                a.format,
                &["ID", "Airport", "City", "Country"],
                |d| {
                    vec![
                        d.destination_id.to_string(),
                        d.airport.clone(),
                        d.city.clone(),
                        d.country.clone(),
                    ]
                },
            )
        }
        DestinationsOperation::Add(a) => {
            let destination = NewDestination::new(a.airport, a.city, a.country);
            let id = store
                .records()
                .insert_destination(&destination)
                .map_err(|e| format!("Failed to add destination: {e}"))?;
            println!("Added destination {id}.");
            Ok(())
        }
        DestinationsOperation::Delete(a) => {
            let records = store.records();
            let rows = match (a.id, a.airport) {
                (Some(id), _) => records.delete_destination(id),
                (None, Some(airport)) => records.delete_destinations_by_airport(&airport),
                (None, None) => return Err("Specify --id or --airport".to_string()),
            }
            .map_err(|e| format!("Failed to delete destination: {e}"))?;
            println!("Deleted {rows} destination(s).");
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// pilots
// ---------------------------------------------------------------------------

fn run_pilots(store: &FlightStore, args: PilotsArgs) -> Result<(), String> {
    match args.operation {
        PilotsOperation::List(a) => {
            let pilots = store
                .query()
                .pilots()
                .map_err(|e| format!("Failed to list pilots: {e}"))?;
            emit_pilots(&pilots, a.format)
        }
        PilotsOperation::Add(a) => {
            let pilot = NewPilot {
                forename: a.forename,
                surname: a.surname,
                license_no: a.license,
                years_of_xp: a.years,
                email: a.email,
                phone: a.phone,
            };
            let id = store
                .records()
                .insert_pilot(&pilot)
                .map_err(|e| format!("Failed to add pilot: {e}"))?;
            println!("Added pilot {id}.");
            Ok(())
        }
        PilotsOperation::Schedule(a) => {
            let schedule = store
                .query()
                .pilot_schedule(a.id)
                .map_err(|e| format!("Failed to load schedule: {e}"))?;
            if schedule.is_empty() {
                return Err(format!("Pilot {} not found", a.id));
            }
            emit(
                &schedule,
                a.format,
                &["Pilot", "Flight", "Date", "Time", "Status", "From", "To"],
                |r| {
                    vec![
                        format!("{} {}", r.forename, r.surname),
                        or_dash(r.flight_id.map(|id| id.to_string())),
                        or_dash(r.date.map(|d| d.to_string())),
                        or_dash(r.time.map(|t| t.format(flightdesk_core::TIME_FORMAT).to_string())),
                        or_dash(r.status.map(|s| s.to_string())),
                        or_dash(r.origin_airport.clone()),
                        or_dash(r.destination_airport.clone()),
                    ]
                },
            )
        }
    }
}

// ---------------------------------------------------------------------------
// report
// ---------------------------------------------------------------------------

fn run_report(store: &FlightStore, args: ReportArgs) -> Result<(), String> {
    let query = store.query();
    let failed = |e: flightdesk_sqlite::StoreError| format!("Report failed: {e}");

    match args.kind {
        ReportKind::PilotFlights => {
            let counts = query.flight_counts_by_pilot().map_err(failed)?;
            emit(&counts, args.format, &["Pilot", "Name", "Flights"], |c| {
                let name = match (&c.forename, &c.surname) {
                    (Some(forename), Some(surname)) => format!("{forename} {surname}"),
                    _ => "-".to_string(),
                };
                vec![c.pilot_id.to_string(), name, c.flights.to_string()]
            })
        }
        ReportKind::Experienced => {
            emit_pilots(&query.most_experienced_pilots().map_err(failed)?, args.format)
        }
        ReportKind::Inexperienced => {
            emit_pilots(&query.least_experienced_pilots().map_err(failed)?, args.format)
        }
        ReportKind::Popular | ReportKind::Unpopular => {
            let ranking = if matches!(args.kind, ReportKind::Popular) {
                query.most_popular_destinations()
            } else {
                query.least_popular_destinations()
            }
            .map_err(failed)?;
            emit(
                &ranking,
                args.format,
                &["Country", "Airport", "City", "Arrivals"],
                |d| {
                    vec![
                        d.country.clone(),
                        d.airport.clone(),
                        d.city.clone(),
                        d.arrivals.to_string(),
                    ]
                },
            )
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn emit_flights(flights: &[FlightView], format: CliOutputFormat) -> Result<(), String> {
    emit(
        flights,
        format,
        &["ID", "Date", "Time", "Status", "From", "To", "Pilot"],
        |f| {
            let pilot = match (&f.pilot_forename, &f.pilot_surname) {
                (Some(forename), Some(surname)) => format!("{forename} {surname}"),
                _ => "-".to_string(),
            };
            vec![
                f.flight_id.to_string(),
                f.date.to_string(),
                f.time.format(flightdesk_core::TIME_FORMAT).to_string(),
                f.status.to_string(),
                or_dash(f.origin_airport.clone()),
                or_dash(f.destination_airport.clone()),
                pilot,
            ]
        },
    )
}

fn emit_pilots(pilots: &[flightdesk_core::Pilot], format: CliOutputFormat) -> Result<(), String> {
    emit(
        pilots,
        format,
        &["ID", "Name", "License", "Years", "Email", "Phone"],
        |p| {
            vec![
                p.pilot_id.to_string(),
                format!("{} {}", p.forename, p.surname),
                p.license_no.clone(),
                p.years_of_xp.to_string(),
                or_dash(p.email.clone()),
                or_dash(p.phone.clone()),
            ]
        },
    )
}

/// Prints rows as JSON or as an aligned text table.
fn emit<T: Serialize>(
    rows: &[T],
    format: CliOutputFormat,
    headers: &[&str],
    to_cells: impl Fn(&T) -> Vec<String>,
) -> Result<(), String> {
    match format {
        CliOutputFormat::Json => {
            let raw = serde_json::to_string_pretty(rows)
                .map_err(|err| format!("Failed to serialize rows: {err}"))?;
            println!("{raw}");
        }
        CliOutputFormat::Table => {
            if rows.is_empty() {
                println!("No rows.");
            } else {
                let cells: Vec<Vec<String>> = rows.iter().map(to_cells).collect();
                print!("{}", render_table(headers, &cells));
            }
        }
    }
    Ok(())
}

/// Renders a header, separator, and rows with columns padded to equal width.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let render_line = |cells: &[&str]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&render_line(headers));
    out.push('\n');
    let separator: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&separator.join("  "));
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&render_line(&cells));
        out.push('\n');
    }
    out
}

fn or_dash(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_aligns_columns() {
        let rendered = render_table(
            &["ID", "Airport"],
            &[
                vec!["1".to_string(), "Heathrow".to_string()],
                vec!["12".to_string(), "Changi".to_string()],
            ],
        );
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines[0], "ID  Airport");
        assert_eq!(lines[1], "--  --------");
        assert_eq!(lines[2], "1   Heathrow");
        assert_eq!(lines[3], "12  Changi");
    }

    #[test]
    fn test_cli_parses_filters() {
        let cli = Cli::try_parse_from(["flightdesk", "flights", "list", "--status", "scheduled"])
            .unwrap();
        match cli.command {
            Command::Flights(FlightsArgs {
                operation: FlightsOperation::List(args),
            }) => assert_eq!(args.filter.status, Some(FlightStatus::Scheduled)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_two_filters() {
        assert!(Cli::try_parse_from([
            "flightdesk",
            "flights",
            "list",
            "--status",
            "Arrived",
            "--city",
            "Paris",
        ])
        .is_err());
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        assert!(Cli::try_parse_from(["flightdesk", "flights", "list", "--date", "2025/01/01"])
            .is_err());
    }

    #[test]
    fn test_destination_delete_requires_key() {
        assert!(Cli::try_parse_from(["flightdesk", "destinations", "delete"]).is_err());
        assert!(Cli::try_parse_from(["flightdesk", "destinations", "delete", "--airport", "Gatwick"])
            .is_ok());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from([
            "flightdesk",
            "status",
            "--config",
            "/nonexistent/flightdesk.yml",
            "--db",
            "other.db",
            "--strict",
            "--no-foreign-keys",
        ])
        .unwrap();
        let config = load_config(&cli.global).unwrap();
        assert_eq!(config.database, PathBuf::from("other.db"));
        assert!(!config.foreign_keys);
        assert!(config.is_strict());
    }
}
