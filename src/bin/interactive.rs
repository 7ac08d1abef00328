use std::{error::Error, io, process};

use clap::Parser;
use feed2groups::{
    prompt::Prompter, run_interactive, write_report, GraphClient, Poster, RunOutcome, GRAPH_URL,
};
use secrecy::SecretString;

/// Ask for a group file, a message, a link and an image folder, then post.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Graph API user access token
    #[arg(short = 't', long, env = "GRAPH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: String,

    /// Graph API base url
    #[arg(long, env = "GRAPH_API_URL", default_value = GRAPH_URL)]
    graph_url: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // keep logs off stdout so they don't land between prompts
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let Args {
        access_token,
        graph_url,
    } = Args::parse();

    let client = GraphClient::with_base_url(SecretString::from(access_token), &graph_url)?;
    let poster = Poster::new(client);

    let mut prompter = Prompter::stdio();
    let outcome = run_interactive(&poster, &mut prompter).await?;
    match &outcome {
        RunOutcome::Posted(report) => write_report(report, &mut io::stdout().lock())?,
        RunOutcome::Skipped(e) | RunOutcome::Aborted(e) => eprintln!("{e}"),
    }
    if outcome.exit_code() != 0 {
        process::exit(outcome.exit_code());
    }
    Ok(())
}
