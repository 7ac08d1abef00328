use std::{io, path::PathBuf, process};

use clap::Parser;
use feed2groups::{run_from_file, write_report, GraphClient, Poster, RunOutcome, GRAPH_URL};
use secrecy::SecretString;
use tracing::info;

/// Post the message from a group file to every group it lists.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON file with `groups` and `message`
    #[arg(short, long, default_value = "group_data.json")]
    config: PathBuf,

    /// Graph API user access token
    #[arg(short = 't', long, env = "GRAPH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Graph API base url
    #[arg(long, env = "GRAPH_API_URL", default_value = GRAPH_URL)]
    graph_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logs on stderr, per-group results on stdout
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let Args {
        config,
        access_token,
        graph_url,
    } = Args::parse();

    let client = GraphClient::with_base_url(SecretString::from(access_token), &graph_url)?;
    let poster = Poster::new(client);
    info!(msg = "posting", config = ?config, url = %poster.client().base_url());

    let outcome = run_from_file(&poster, &config).await;
    match &outcome {
        RunOutcome::Posted(report) => write_report(report, &mut io::stdout().lock())?,
        RunOutcome::Skipped(e) | RunOutcome::Aborted(e) => {
            println!("Error reading or processing the JSON file: {e}")
        }
    }
    if outcome.exit_code() != 0 {
        process::exit(outcome.exit_code());
    }
    Ok(())
}
