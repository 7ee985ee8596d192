//! CLI entry point for jss-scripts, a read-only Jamf Pro script inventory.
//!
//! Resolves the session (credentials, then server URL), then runs exactly
//! one action:
//!
//! - `-p` lists every policy that runs a script, one `(policy, script)` row
//!   per line;
//! - `-e` saves the script of every Mac extension attribute to a folder.
//!
//! Exit codes:
//! - 0: success
//! - 1: runtime error (configuration, network, HTTP status, XML, folder)
//! - 2: argument validation error (clap handles this automatically)

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use jss_scripts::auth::CredentialResolver;
use jss_scripts::client::JssClient;
use jss_scripts::config::Settings;
use jss_scripts::endpoint::EndpointResolver;
use jss_scripts::error::{JssError, Result};
use jss_scripts::extension_attributes;
use jss_scripts::policies::PolicyScriptEnumerator;
use jss_scripts::prompt::TerminalPrompt;
use jss_scripts::session::Session;

/// Folder under the home directory that receives extracted scripts.
const DEFAULT_OUTPUT_DIR: &str = "Desktop/ext_att_scripts";

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Jamf Pro base URL. When omitted, `jss_url` is read from the Jamf
    /// preference file on enrolled Macs, or prompted for.
    #[arg(long, env = "JSS_URL")]
    url: Option<String>,

    /// API account name. Prompted for when not given here or in the
    /// config file.
    #[arg(long, env = "JSS_USER")]
    user: Option<String>,

    /// API account password. Prefer the JSS_PASSWORD environment variable
    /// or the config file to keep it out of process listings.
    #[arg(long, env = "JSS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Settings file (defaults to ~/.jss-scripts.toml when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Folder for extracted extension attribute scripts
    /// (defaults to ~/Desktop/ext_att_scripts).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the policy listing as JSON instead of fixed-width columns.
    #[arg(long)]
    json: bool,

    /// Log every request to stderr.
    #[arg(long)]
    debug: bool,

    #[command(flatten)]
    actions: ActionFlags,
}

/// Action flags: exactly one must be set per invocation.
#[derive(clap::Args)]
#[group(required = true, multiple = false)]
struct ActionFlags {
    /// List all policies that contain scripts, including those created
    /// through Casper Remote.
    #[arg(short, long)]
    policies: bool,

    /// Save the scripts of Mac-based computer extension attributes.
    #[arg(short, long)]
    extension_attributes: bool,
}

fn init_tracing(debug: bool) {
    let default = if debug {
        "jss_scripts=debug"
    } else {
        "jss_scripts=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn output_dir(args: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &args.output_dir {
        return Ok(dir.clone());
    }
    dirs::home_dir()
        .map(|home| home.join(DEFAULT_OUTPUT_DIR))
        .ok_or_else(|| JssError::configuration("home directory not found; pass --output-dir"))
}

async fn list_policy_scripts(client: &JssClient, json: bool, out: &mut impl Write) -> Result<()> {
    let mut pairs = PolicyScriptEnumerator::new(client);
    if json {
        let all = pairs.collect_all().await?;
        serde_json::to_writer_pretty(&mut *out, &all)?;
        writeln!(out)?;
        return Ok(());
    }

    while let Some(pair) = pairs.next().await? {
        writeln!(out, "{pair}")?;
    }
    Ok(())
}

async fn save_extension_attribute_scripts(client: &JssClient, dir: PathBuf) -> Result<()> {
    println!("Querying the JSS . . .");
    std::io::stdout().flush()?;

    let summary = extension_attributes::run(client, &dir).await?;
    println!(
        "Saved {} script(s) to {}",
        summary.files_written(),
        dir.display()
    );
    if !summary.failed.is_empty() {
        eprintln!("{} script(s) could not be written", summary.failed.len());
    }

    // Audible completion signal.
    println!("\x07");
    Ok(())
}

/// Command-line and environment values take precedence over the config file.
fn presets(args: &Cli, file: Settings) -> Settings {
    Settings {
        jss_user: args.user.clone().or(file.jss_user),
        jss_pass: args.password.clone().or(file.jss_pass),
        jss_url: args.url.clone().or(file.jss_url),
    }
}

async fn run(args: Cli) -> Result<()> {
    let settings = Settings::load(args.config.as_deref())?;

    // Resolve the folder before prompting so a bad path fails fast.
    let dir = if args.actions.extension_attributes {
        Some(output_dir(&args)?)
    } else {
        None
    };

    let presets = presets(&args, settings);

    let mut credentials = CredentialResolver::new(presets.jss_user, presets.jss_pass);
    let endpoint = EndpointResolver::new(presets.jss_url);
    let session = Session::resolve(&mut credentials, &endpoint, &mut TerminalPrompt)?;
    let client = JssClient::new(session)?;

    match dir {
        Some(dir) => save_extension_attribute_scripts(&client, dir).await,
        None => list_policy_scripts(&client, args.json, &mut std::io::stdout().lock()).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(args.debug);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
