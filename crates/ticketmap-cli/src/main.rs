use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use ticketmap::render::{MapError, MapOutcome, MapRequest, OrgChart, RenderError};
use ticketmap::report::OUTPUT_TARGET;
use ticketmap::{Reporter, SiteConfig};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::{EnvFilter, Targets};
use tracing_subscriber::prelude::*;

#[derive(Debug)]
enum CliError {
    Help,
    NoAction,
    Usage(&'static str),
    Io(std::io::Error),
    Map(MapError),
    Render(RenderError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Help | CliError::NoAction => write!(f, "{}", usage()),
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Map(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<MapError> for CliError {
    fn from(value: MapError) -> Self {
        Self::Map(value)
    }
}

impl From<RenderError> for CliError {
    fn from(value: RenderError) -> Self {
        Self::Render(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    CreateMap(String),
    OrgChart(String),
}

#[derive(Debug, Default)]
struct Args {
    action: Option<Action>,
    output: Option<String>,
    title: Option<String>,
    responsibilities: bool,
    pretty: bool,
    verbose: bool,
    quiet: bool,
}

fn usage() -> &'static str {
    "ticketmap-cli\n\
\n\
USAGE:\n\
  ticketmap-cli --create-map <csv> [-o|--output <file>] [-t|--title <title>] [-v|--verbose|-q|--quiet]\n\
  ticketmap-cli --org-chart <drawio> [--responsibilities] [--pretty] [-v|--verbose|-q|--quiet]\n\
\n\
NOTES:\n\
  - The CSV needs `key` and `depth` columns; `from_key`, `link_via`, `summary` and `status` are optional.\n\
  - If <csv> does not exist and has no extension, `.csv` is appended.\n\
  - The map is written next to the input (`tickets.csv` -> `tickets.drawio`) unless --output is given.\n\
  - --org-chart prints the people, reporting lines and teams of a draw.io org chart as JSON.\n\
  - JIRA_URL sets the ticket link base; TICKETMAP_LOG_FILE sets the log file (default ticketmap-cli.log).\n\
\n\
COLORS:\n\
  - Root ticket: light green background\n\
  - \"is blocked by\" / \"blocks\": red border, light red fill\n\
  - \"relates to\": blue border, light blue fill\n\
  - Other link types: gray border, white fill\n\
"
}

fn take_value<'a>(
    it: &mut impl Iterator<Item = &'a String>,
    slot: &mut Option<String>,
) -> Result<(), CliError> {
    let Some(value) = it.next() else {
        return Err(CliError::Usage("missing value for flag"));
    };
    if slot.is_some() {
        return Err(CliError::Usage("flag given more than once"));
    }
    *slot = Some(value.clone());
    Ok(())
}

fn set_flag(flag: &mut bool) -> Result<(), CliError> {
    if *flag {
        return Err(CliError::Usage("flag given more than once"));
    }
    *flag = true;
    Ok(())
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();
    let mut create_map = None;
    let mut org_chart = None;

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Help),
            "--create-map" => take_value(&mut it, &mut create_map)?,
            "--org-chart" => take_value(&mut it, &mut org_chart)?,
            "--output" | "-o" => take_value(&mut it, &mut args.output)?,
            "--title" | "-t" => take_value(&mut it, &mut args.title)?,
            "--responsibilities" => set_flag(&mut args.responsibilities)?,
            "--pretty" => set_flag(&mut args.pretty)?,
            "--verbose" | "-v" => set_flag(&mut args.verbose)?,
            "--quiet" | "-q" => set_flag(&mut args.quiet)?,
            _ => return Err(CliError::Usage("unrecognized argument")),
        }
    }

    if args.verbose && args.quiet {
        return Err(CliError::Usage("--verbose and --quiet are mutually exclusive"));
    }
    args.action = match (create_map, org_chart) {
        (Some(_), Some(_)) => {
            return Err(CliError::Usage("--create-map and --org-chart are mutually exclusive"));
        }
        (Some(csv), None) => Some(Action::CreateMap(csv)),
        (None, Some(drawio)) => Some(Action::OrgChart(drawio)),
        (None, None) => None,
    };
    if args.output.is_some() && !matches!(args.action, Some(Action::CreateMap(_))) {
        return Err(CliError::Usage("--output requires --create-map"));
    }
    if args.title.is_some() && !matches!(args.action, Some(Action::CreateMap(_))) {
        return Err(CliError::Usage("--title requires --create-map"));
    }
    if args.action.is_none() {
        return Err(CliError::NoAction);
    }
    Ok(args)
}

/// Installs the file and console log layers. The returned guard flushes the file log on drop.
fn init_logging(
    args: &Args,
    site: &SiteConfig,
) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_level = if args.verbose {
        LevelFilter::DEBUG
    } else if args.quiet {
        LevelFilter::ERROR
    } else {
        LevelFilter::INFO
    };
    let console = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(
            Targets::new()
                .with_default(console_level)
                .with_target(OUTPUT_TARGET, LevelFilter::OFF),
        );

    let (file_layer, guard) = match File::create(&site.log_file) {
        Ok(file) => {
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_line_number(true)
                .with_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
                );
            (Some(layer), Some(guard))
        }
        Err(err) => {
            eprintln!(
                "warning: cannot open log file {}: {err}",
                site.log_file.display()
            );
            (None, None)
        }
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .init();
    guard
}

fn log_banner() {
    tracing::info!("++++++++++++++++++++++++++++++++++++++++++++++");
    tracing::info!("+  ticketmap-cli {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("+  Today is: {}", chrono::Local::now().date_naive());
    tracing::info!("++++++++++++++++++++++++++++++++++++++++++++++");
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    if pretty {
        serde_json::to_writer_pretty(&mut stdout, value)?;
    } else {
        serde_json::to_writer(&mut stdout, value)?;
    }
    writeln!(stdout)?;
    Ok(())
}

fn run_create_map(
    input: &str,
    args: &Args,
    site: &SiteConfig,
    reporter: &mut Reporter,
) -> Result<(), CliError> {
    let mut request = MapRequest::new(input);
    request.output = args.output.as_ref().map(PathBuf::from);
    request.title = args.title.clone();

    match ticketmap::render::create_map(&request, site, reporter)? {
        MapOutcome::NoTickets => tracing::warn!(input, "no tickets found; nothing written"),
        MapOutcome::Written { output, tickets, .. } => {
            tracing::debug!(output = %output.display(), tickets, "map written");
        }
    }
    Ok(())
}

fn run_org_chart(input: &str, args: &Args) -> Result<(), CliError> {
    let doc = ticketmap::render::read_drawio_file(input)?;
    let chart = OrgChart::from_document(&doc);
    if args.responsibilities {
        write_json(&chart.responsibilities(), args.pretty)
    } else {
        write_json(&chart, args.pretty)
    }
}

fn run(args: &Args, site: &SiteConfig, reporter: &mut Reporter) -> Result<(), CliError> {
    match &args.action {
        Some(Action::CreateMap(input)) => run_create_map(input, args, site, reporter),
        Some(Action::OrgChart(input)) => run_org_chart(input, args),
        None => Err(CliError::NoAction),
    }
}

fn report_failure(reporter: &mut Reporter, err: &CliError) {
    if matches!(err, CliError::Map(map_err) if map_err.is_input_error()) {
        tracing::error!("{err}");
    } else {
        tracing::error!("Unexpected error: {err}");
    }
    // The console may already be gone; the log has the message.
    let _ = reporter.blank();
    let _ = reporter.line(format!("ERROR: {err}"));
    let _ = reporter.blank();
}

/// Runs with the log guard alive so the file log is flushed before the process exits.
fn real_main() -> i32 {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Help) => {
            println!("{}", usage());
            return 0;
        }
        Err(CliError::NoAction) => {
            println!("{}", usage());
            return 1;
        }
        Err(err) => {
            eprintln!("error: {err}\n\n{}", usage());
            return 2;
        }
    };

    let site = SiteConfig::from_env();
    let _guard = init_logging(&args, &site);
    log_banner();
    tracing::debug!(jira_url = %site.jira_url, log_file = %site.log_file.display(), "site config");

    let mut reporter = Reporter::stdout(args.quiet);
    match run(&args, &site, &mut reporter) {
        Ok(()) => {
            tracing::info!("Operation complete.");
            0
        }
        Err(err) => {
            report_failure(&mut reporter, &err);
            1
        }
    }
}

fn main() {
    std::process::exit(real_main());
}
