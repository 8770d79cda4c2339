mod commands;
mod feed;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use chills_core::{ChillsConfig, OverlapScope, SortOrder};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chills")]
#[command(about = "Find classmates who share your courses and form study squads")]
struct Cli {
    /// Log more (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read a timetable (.ics file or webcal/https URL) into enrolments
    Import {
        /// Path or URL of the timetable
        source: String,

        /// Replace your enrolments in this roster with the imported classes
        #[arg(long)]
        roster: Option<PathBuf>,

        /// Print enrolment rows as JSON
        #[arg(long)]
        json: bool,
    },
    /// List classmates and what you share with them
    Match {
        #[command(flatten)]
        pool: PoolArgs,

        /// Ordering: common-courses, shared-tutorials or name
        #[arg(short, long)]
        sort: Option<SortOrder>,

        /// Search first name, last name, zID or degree
        #[arg(long)]
        search: Option<String>,

        /// Only classmates sharing this course (repeatable)
        #[arg(short, long = "course")]
        courses: Vec<String>,

        /// Only classmates in one of your tutorials
        #[arg(long)]
        same_tutorial: bool,

        /// Only classmates with an overlapping class time
        #[arg(long)]
        time_overlap: bool,

        /// Only classmates on campus on one of your days
        #[arg(long)]
        same_day: bool,

        /// Print match records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Work out the squad course for a group of classmates
    Squad {
        #[command(flatten)]
        pool: PoolArgs,

        /// User ids of the classmates to include
        #[arg(required = true)]
        members: Vec<String>,

        /// Squad name; without it only the course decision is shown
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long, default_value = "")]
        description: String,

        /// Course to use when the group shares several
        #[arg(short, long)]
        course: Option<String>,

        /// Print the decision (and draft) as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the config file location and effective settings
    Config {
        #[arg(long)]
        json: bool,
    },
}

/// Where the current user and candidate pool come from.
#[derive(Args)]
struct PoolArgs {
    /// Roster JSON (defaults to `roster` in the config file)
    #[arg(short, long)]
    roster: Option<PathBuf>,

    /// Which classes count for time overlap: same-course or any-course
    #[arg(long)]
    scope: Option<OverlapScope>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = ChillsConfig::load()?;

    match cli.command {
        Commands::Import {
            source,
            roster,
            json,
        } => commands::import::run(&config, &source, roster.as_deref(), json).await,
        Commands::Match {
            pool,
            sort,
            search,
            courses,
            same_tutorial,
            time_overlap,
            same_day,
            json,
        } => {
            let session = commands::load_session(&config, &pool, sort)?;
            let filters = commands::matches::Filters {
                search,
                courses,
                same_tutorial,
                time_overlap,
                same_day,
            };
            commands::matches::run(session, filters, json)
        }
        Commands::Squad {
            pool,
            members,
            name,
            description,
            course,
            json,
        } => {
            let session = commands::load_session(&config, &pool, None)?;
            let request = commands::squad::Request {
                members,
                name,
                description,
                course,
            };
            commands::squad::run(session, request, json)
        }
        Commands::Config { json } => commands::config::run(&config, json),
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
