use clap::Parser;
use trust_score::api::Error;
use trust_score_app::Args;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let _ = dotenv::dotenv();
    env_logger::init();

    let args = Args::parse();
    let mut reports = trust_score_app::score_packages(args).await?;

    while let Some(report) = reports.recv().await {
        let line = serde_json::to_string(&report).map_err(anyhow::Error::from)?;
        println!("{line}");
    }

    Ok(())
}
