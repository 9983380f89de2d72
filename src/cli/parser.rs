use crate::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for drivershift
/// Driver shift attendance: four-stage lifecycle, overtime and dashboard on SQLite
#[derive(Parser)]
#[command(
    name = "drivershift",
    version = env!("CARGO_PKG_VERSION"),
    about = "Driver shift attendance tracker: staged shift lifecycle, overtime and dashboard on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Override the directory photos are stored in
    #[arg(global = true, long = "photos")]
    pub photos: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pin the civil clock to a fixed instant (DD/MM/YYYY HH:MM[:SS])
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only show one operation (e.g. startShift)")]
        op: Option<String>,

        #[arg(long = "last", help = "Only show the most recent N rows")]
        last: Option<usize>,
    },

    /// Stage 1: register a driver's arrival at the gate
    Start {
        #[arg(long = "driver-id")]
        driver_id: String,

        #[arg(long = "driver-name")]
        driver_name: String,

        #[arg(long = "helper-id")]
        helper_id: Option<String>,

        #[arg(long = "helper-name")]
        helper_name: Option<String>,

        #[arg(long = "helper-company")]
        helper_company: Option<String>,

        #[arg(long = "vehicle")]
        vehicle: String,

        #[arg(long = "odometer", help = "Start odometer reading (km)")]
        odometer: f64,

        #[arg(long = "photo", help = "Image file of the start odometer")]
        photo: String,

        #[arg(long = "fuel")]
        fuel: Option<String>,

        #[arg(long = "destination")]
        destination: Option<String>,

        #[arg(long = "customer")]
        customer: Option<String>,

        #[arg(long = "drops", default_value_t = 0)]
        drops: u32,

        #[arg(long = "at", help = "Arrival time (DD/MM/YYYY HH:MM or YYYY-MM-DDTHH:MM)")]
        at: String,
    },

    /// Stage 2: record departure from the warehouse
    Depart {
        row_id: String,

        #[arg(long = "at")]
        at: String,
    },

    /// Stage 3: record the last drop
    LastDrop {
        row_id: String,

        #[arg(long = "at")]
        at: String,

        #[arg(long = "failed", default_value_t = 0)]
        failed: u32,

        #[arg(long = "photo", help = "Image file taken at the last drop")]
        photo: String,
    },

    /// Stage 4: close the shift
    End {
        row_id: String,

        #[arg(long = "at")]
        at: String,

        #[arg(long = "odometer", help = "End odometer reading (km)")]
        odometer: f64,

        #[arg(long = "photo", help = "Image file of the end odometer")]
        photo: String,
    },

    /// List drivers waiting to submit a stage (2, 3 or 4)
    Pending {
        #[arg(long = "stage", value_parser = clap::value_parser!(u8).range(2..=4))]
        stage: u8,
    },

    /// Print the operational dashboard
    Dashboard,

    /// Per-vehicle kilometres and stage gaps for one date
    Detail {
        #[arg(long = "date", help = "Shift date (DD/MM/YYYY or YYYY-MM-DD)")]
        date: String,
    },

    /// Completed hours per vehicle over an inclusive date range
    VehicleHours {
        #[arg(long = "from")]
        from: String,

        #[arg(long = "to")]
        to: String,
    },

    /// Answer one raw JSON request (`{"op": "...", ...}`), from argument or stdin
    Rpc { request: Option<String> },

    /// Show or import the reference lists (drivers, helpers, vehicles, ...)
    Lookup {
        #[arg(long = "import", help = "Replace the reference table with a CSV file")]
        import: Option<String>,
    },

    /// Export shift records
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Absolute output file path
        #[arg(long)]
        file: String,

        /// YYYY, YYYY-MM, YYYY-MM-DD, or start:end of the same shape
        #[arg(long)]
        range: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
