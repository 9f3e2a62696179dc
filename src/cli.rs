use clap::Parser;

use crate::config::parse_duration_secs;

fn duration_arg(value: &str) -> Result<f64, String> {
    let secs: f64 = value.parse().map_err(|err| format!("{err}"))?;
    parse_duration_secs(secs).map_err(|err| err.to_string())?;
    Ok(secs)
}

#[derive(Parser, Debug)]
#[command(name = "ecoindex-dialog", version, about = "Analyse web pages from the terminal")]
pub struct Args {
    /// Page to analyse on startup (e.g., "https://example.com")
    #[arg(short, long)]
    pub url: Option<String>,

    /// Make every analysis fail with this status code (e.g., 429)
    #[arg(short, long)]
    pub fail_with: Option<u16>,

    /// Seconds a simulated analysis takes
    #[arg(short, long, value_parser = duration_arg)]
    pub duration: Option<f64>,

    /// Theme name (e.g., "Catppuccin Latte")
    #[arg(short, long)]
    pub theme: Option<String>,
}
