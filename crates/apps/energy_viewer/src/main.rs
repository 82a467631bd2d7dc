use clap::Parser;
use formats::DatasetSource;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use energy_viewer::app::{animate, interactive, load_config, render_index, write_svg};
use energy_viewer::cli::{Cli, Command};
use energy_viewer::error::AppError;
use energy_viewer::loading::load_both;
use energy_viewer::session::MapSession;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(Cli::parse()).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = load_config(cli.config.as_deref())?;
    let renewable = DatasetSource::parse(&cli.renewable);
    let fossil = DatasetSource::parse(&cli.fossil);
    info!(%renewable, %fossil, "loading datasets");

    let http = reqwest::Client::new();
    let loaded = load_both(&renewable, &fossil, &http).await;
    let mut session = MapSession::new(loaded, &config);

    match cli.command {
        Command::Render { index, out } => {
            let svg = render_index(&mut session, &config, index);
            match out {
                Some(path) => {
                    write_svg(&path, &svg).await?;
                    println!("{}", path.display());
                }
                None => print!("{svg}"),
            }
        }
        Command::Animate { out_dir } => {
            for path in animate(&mut session, &config, &out_dir).await? {
                println!("{}", path.display());
            }
        }
        Command::Interactive { out } => {
            let stdin = BufReader::new(tokio::io::stdin());
            interactive(&mut session, &config, &out, stdin).await?;
        }
    }
    Ok(())
}
