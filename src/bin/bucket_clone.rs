//! CLI for the bucket-clone tool.

use anyhow::{Context, Result};
use bucket_clone::prelude::*;
use clap::Parser;
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bucket-clone")]
#[command(author, version, about = "Clone every repository a Bitbucket account owns", long_about = None)]
struct Cli {
    /// Account or team whose repositories are cloned
    owner: String,

    /// Directory the repositories are cloned into (created if absent)
    target_dir: PathBuf,

    /// Bitbucket login; omit it to list anonymously
    login: Option<String>,

    /// App password; prompted for when the login is given without one
    password: Option<String>,

    /// Print each repository and its ssh clone URL without cloning
    #[arg(long)]
    list_only: bool,
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let credentials = cli
        .login
        .map(|login| resolve_credentials(login, cli.password))
        .transpose()?;

    let client = match credentials {
        Some(credentials) => BitbucketClient::with_credentials(credentials),
        None => BitbucketClient::new(),
    };

    let repos = client
        .list_repositories(&cli.owner)
        .with_context(|| format!("failed to list repositories for {}", cli.owner))?;

    fs::create_dir_all(&cli.target_dir)
        .with_context(|| format!("failed to create {}", cli.target_dir.display()))?;

    for repo in &repos {
        let url = repo
            .ssh_clone_url()
            .ok_or_else(|| Error::MissingSshUrl(repo.full_name.clone()))?;
        println!("{} - {}", repo.name, url);
        if !cli.list_only {
            clone_repository(url, &cli.target_dir)?;
        }
    }

    Ok(())
}

/// Pair the login with its password, prompting on the terminal when the
/// password was not given on the command line.
fn resolve_credentials(login: String, password: Option<String>) -> Result<Credentials> {
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("password: ")
            .context("no terminal available: give the password on the command line")?,
    };
    Ok(Credentials::new(login, password))
}
