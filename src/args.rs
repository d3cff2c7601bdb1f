use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use corona_routes::Municipality;

#[derive(Parser, Debug)]
#[command(name = "corona-routes")]
#[command(about = "Scrapes COVID-19 patient-movement disclosures from municipal sites")]
#[command(version)]
pub struct Args {
    /// Municipality to scrape
    #[arg(value_enum)]
    pub municipality: MunicipalityArg,

    /// Run the browser without a visible window
    #[arg(long)]
    pub headless: bool,

    /// Attach to a running WebDriver server instead of launching one
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pretty-print the resulting table
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum MunicipalityArg {
    Bucheon,
    Seoul,
}

/// Convert from CLI argument municipality to internal municipality
pub fn convert_municipality(arg: MunicipalityArg) -> Municipality {
    match arg {
        MunicipalityArg::Bucheon => Municipality::Bucheon,
        MunicipalityArg::Seoul => Municipality::Seoul,
    }
}
