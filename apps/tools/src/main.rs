use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use shared::{
    error::{ApiError, ApiException},
    protocol::{
        activities_route, signup_action, unregister_action, ActivityListing, MessageResponse,
    },
};
use storage::{load_seed_file, RosterStore};
use url::Url;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server: Url,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a seed file without starting the server.
    CheckSeed { path: PathBuf },
    List,
    Signup {
        activity: String,
        email: String,
        #[arg(long)]
        name: Option<String>,
    },
    Unregister {
        activity: String,
        email: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Command::CheckSeed { path } => {
            let seeds = load_seed_file(&path)?;
            let total_participants: usize = seeds.iter().map(|s| s.participants.len()).sum();
            let roster = RosterStore::from_seed(seeds)
                .with_context(|| format!("invalid seed file '{}'", path.display()))?;
            println!(
                "ok: {} activities, {} seeded participants",
                roster.len().await,
                total_participants
            );
        }
        Command::List => {
            let url = activities_url(&cli.server)?;
            let listing: ActivityListing = read_json(client.get(url).send().await?).await?;
            for (name, activity) in listing {
                println!(
                    "{name}: {}/{} participants ({})",
                    activity.participants_count, activity.max_participants, activity.schedule
                );
            }
        }
        Command::Signup {
            activity,
            email,
            name,
        } => {
            let mut url = action_url(&cli.server, &activity, signup_action())?;
            url.query_pairs_mut().append_pair("email", &email);
            if let Some(name) = name.as_deref() {
                url.query_pairs_mut().append_pair("name", name);
            }
            let response: MessageResponse = read_json(client.post(url).send().await?).await?;
            println!("{}", response.message);
        }
        Command::Unregister { activity, email } => {
            let mut url = action_url(&cli.server, &activity, unregister_action())?;
            url.query_pairs_mut().append_pair("email", &email);
            let response: MessageResponse = read_json(client.post(url).send().await?).await?;
            println!("{}", response.message);
        }
    }

    Ok(())
}

fn activities_url(server: &Url) -> Result<Url> {
    server
        .join(activities_route())
        .with_context(|| format!("invalid server url '{server}'"))
}

/// `{server}/activities/{activity}/{action}` with the activity name encoded
/// as a single path segment.
fn action_url(server: &Url, activity: &str, action: &str) -> Result<Url> {
    let mut url = activities_url(server)?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("server url '{server}' cannot carry a path"))?
        .pop_if_empty()
        .push(activity)
        .push(action);
    Ok(url)
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let error: ApiError = response
        .json()
        .await
        .with_context(|| format!("server returned {status}"))?;
    if error.is_not_found() {
        return Err(anyhow!("{}; run `tools list` for known activities", error.message));
    }
    Err(ApiException::from(error).into())
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
