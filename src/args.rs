use clap::Parser;
use secrecy::SecretString;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use trust_score::WeightPreset;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// File with one package or repository URL per line
    pub url_file: PathBuf,

    /// API OAuth access token
    #[clap(short, long, env = "GITHUB_TOKEN")]
    pub api_token: Option<SecretString>,

    /// Repository API URL
    #[clap(long, env, default_value = "https://api.github.com")]
    pub api_url: String,

    /// Package registry URL
    #[clap(long, env, default_value = "https://registry.npmjs.org")]
    pub registry_url: String,

    /// Metric weighting preset
    #[clap(short, long, env, default_value = "balanced")]
    pub weights: WeightPreset,

    /// Directory of local checkouts, one `<owner>_<repo>` subdirectory per
    /// repository, consulted for license files
    #[clap(long, env)]
    pub checkout_dir: Option<PathBuf>,

    /// Maximal pages fetched per list endpoint
    #[clap(long, env, default_value_t = 30, parse(try_from_str=max_pages_in_range))]
    pub max_pages: u32,

    /// Per-request timeout in seconds
    #[clap(long, env, default_value_t = 30, parse(try_from_str=timeout_in_range))]
    pub timeout: u64,

    /// Per-metric timeout in seconds
    #[clap(long, env, default_value_t = 120, parse(try_from_str=timeout_in_range))]
    pub metric_timeout: u64,
}

fn max_pages_in_range(value: &str) -> clap::Result<u32, String> {
    number_in_range(value, 1, u32::MAX, "max_pages".to_string())
}

fn timeout_in_range(value: &str) -> clap::Result<u64, String> {
    number_in_range(value, 1, 3600, "timeout".to_string())
}

fn number_in_range<T>(value: &str, min: T, max: T, name: String) -> clap::Result<T, String>
where
    T: FromStr + PartialOrd + Display,
    <T as FromStr>::Err: Display,
{
    value.parse::<T>().map_err(|err| format!("{}", err)).and_then(|value| {
        if value < min || value > max {
            return Err(format!("{} is not in range {} .. {}.", name, min, max));
        }
        Ok(value)
    })
}

/// Tests
