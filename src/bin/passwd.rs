use std::io::BufRead;

use anyhow::Context;
use clap::Parser;
use mergington_roster::data::teacher::{TeacherCredential, DEFAULT_COST};

/// Reads a password from stdin and prints a credentials file entry for it.
#[derive(Debug, Parser)]
#[command(name = "mergington-passwd")]
#[command(version)]
#[command(about = "Create a teacher entry for the credentials file", long_about = None)]
struct Args {
    /// Teacher login name
    username: String,

    /// bcrypt cost factor
    #[arg(default_value_t = DEFAULT_COST, value_parser = clap::value_parser!(u32).range(4..=31))]
    cost: u32,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut password = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut password)
        .context("unable to read password from stdin")?;
    let password = password.trim_end_matches(['\r', '\n']);

    let credential = TeacherCredential::new(args.username, password, args.cost);
    println!("{}", serde_json::to_string_pretty(&credential)?);

    Ok(())
}
