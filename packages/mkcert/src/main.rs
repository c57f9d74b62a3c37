//! `mkcert` command line entry point

use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use mkcert::{
    normalize_flags, run_cli, ModeFlags, OsFamily, ProcessEnv, RunOutcome, SystemTrustStore,
};

const USAGE: &str = r#"Usage:

	$ mkcert -install
	Install the local CA in the system trust store.

	$ mkcert example.org
	Generate "example.org.pem" and "example.org-key.pem".

	$ mkcert example.com myapp.dev localhost 127.0.0.1 ::1
	Generate "example.com+4.pem" and "example.com+4-key.pem".

	$ mkcert '*.example.com'
	Generate "_wildcard.example.com.pem" and "_wildcard.example.com-key.pem".

	$ mkcert -uninstall
	Uninstall the local CA (but do not delete it).

Change the CA certificate and key storage location by setting $CAROOT,
print it with "mkcert -CAROOT".
"#;

#[derive(Parser, Debug)]
#[command(
    name = "mkcert",
    version,
    about = "Make locally-trusted development certificates",
    after_help = USAGE
)]
struct Args {
    /// Install the local CA in the system trust store
    #[arg(long)]
    install: bool,
    /// Uninstall the local CA (but do not delete it)
    #[arg(long)]
    uninstall: bool,
    /// Print the CA certificate and key storage location
    #[arg(long = "CAROOT")]
    caroot: bool,
    /// Override the default log level (info)
    #[arg(long = "log-level", value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
    /// Hostnames, wildcard names and IP addresses to certify
    identifiers: Vec<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

fn init_logging(level: LogLevel) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter_str()));

    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_level(false)
        .init();
}

fn run(args: Args) -> mkcert::Result<()> {
    let flags = ModeFlags {
        install: args.install,
        uninstall: args.uninstall,
        print_caroot: args.caroot,
        identifiers: args.identifiers,
    };

    let outcome = run_cli(
        flags,
        &ProcessEnv,
        OsFamily::current(),
        SystemTrustStore::for_host(),
        Path::new("."),
    )?;
    match outcome {
        RunOutcome::Caroot(path) => println!("{}", path.display()),
        RunOutcome::Usage => eprint!("{USAGE}"),
        RunOutcome::Installed(_) | RunOutcome::Uninstalled | RunOutcome::Issued(_) => {}
    }
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse_from(normalize_flags(std::env::args_os()));
    init_logging(args.log_level);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {e}");
            ExitCode::FAILURE
        }
    }
}
