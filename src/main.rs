//! SIMD Oracle CLI.
//!
//! Compares results snapshots captured on different back-ends.

use clap::{ArgAction, Parser, Subcommand};
use simd_oracle::compare::TextSink;
use simd_oracle::{
    compare_archs, snapshot, CompareOptions, Diagnostic, DiagnosticSink, MismatchReport, OracleError,
    TestSuite,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oracle")]
#[command(about = "Differential oracle for SIMD back-end results", long_about = None)]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information
    Version,

    /// Compare a snapshot against a reference snapshot
    Compare {
        /// Snapshot of the reference back-end
        reference: PathBuf,
        /// Snapshot of the back-end under test
        other: PathBuf,
        /// Use the stricter of both tolerances
        #[arg(long)]
        strict: bool,
        /// Let two NaNs compare equal
        #[arg(long)]
        nan_equal: bool,
        /// Write a text report to this path
        #[arg(long)]
        report: Option<PathBuf>,
        /// Write a JSON report to this path
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Print what a snapshot contains
    Summary {
        /// Snapshot file
        snapshot: PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Version) => {
            println!("SIMD Oracle v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Some(Commands::Compare {
            reference,
            other,
            strict,
            nan_equal,
            report,
            json,
        }) => run_compare(reference, other, strict, nan_equal, report, json),
        Some(Commands::Summary { snapshot }) => run_summary(snapshot),
        None => {
            println!("SIMD Oracle v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for usage information");
            ExitCode::SUCCESS
        }
    }
}

fn run_compare(
    reference: PathBuf,
    other: PathBuf,
    strict: bool,
    nan_equal: bool,
    report_path: Option<PathBuf>,
    json_path: Option<PathBuf>,
) -> ExitCode {
    let (reference, other) = match (snapshot::load(&reference), snapshot::load(&other)) {
        (Ok(r), Ok(o)) => (r, o),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    let options = if strict {
        CompareOptions::strict()
    } else {
        CompareOptions::default()
    }
    .with_nan_equal(nan_equal);

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let mut suite = TestSuite::new();
    let ok = compare_archs(&reference, &other, options, &mut diagnostics, &mut suite);

    let mut sink = TextSink::new(std::io::stdout().lock());
    for d in &diagnostics {
        sink.report(d.clone());
    }
    if let Err(e) = sink.finish() {
        eprintln!("error: writing diagnostics: {}", e);
        return ExitCode::from(2);
    }
    println!("{}", suite.summary());

    let report = MismatchReport::new(reference.arch(), other.arch(), suite.summary(), diagnostics);
    if let Some(path) = report_path {
        if let Err(e) = report.save(&path) {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    }
    if let Some(path) = json_path {
        let written = report.to_json().and_then(|json| {
            std::fs::write(&path, json).map_err(|source| OracleError::Io {
                path: path.clone(),
                source,
            })
        });
        if let Err(e) = written {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn run_summary(path: PathBuf) -> ExitCode {
    let results = match snapshot::load(&path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    println!("arch: {}", results.arch());
    println!("test cases: {}", results.len());
    println!("results: {}", results.num_results());
    for set in &results {
        println!(
            "  {}: {} sections, {} results",
            set.name(),
            set.num_sections(),
            set.num_results()
        );
    }
    ExitCode::SUCCESS
}
