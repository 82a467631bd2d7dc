use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Proportional-symbol map of renewable and fossil energy shares by country"
)]
pub struct Cli {
    /// Renewable production dataset: a GeoJSON file path or http(s) URL
    #[arg(
        long,
        env = "ENERGY_ATLAS_RENEWABLE",
        default_value = "data/percentRenewableEnergy.geojson"
    )]
    pub renewable: String,

    /// Fossil fuel consumption dataset: a GeoJSON file path or http(s) URL
    #[arg(
        long,
        env = "ENERGY_ATLAS_FOSSIL",
        default_value = "data/percentFosFuels.geojson"
    )]
    pub fossil: String,

    /// JSON map configuration; built-in defaults when omitted
    #[arg(long, env = "ENERGY_ATLAS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Command {
    /// Render one year to SVG
    Render {
        /// Year index (0 is the first year)
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Render every year, one SVG per frame
    Animate {
        /// Output directory
        #[arg(long, default_value = "out/frames")]
        out_dir: PathBuf,
    },

    /// Drive the sequence controls from stdin, rewriting the SVG after each change
    Interactive {
        /// File rewritten after every command that changes the map
        #[arg(long, default_value = "out/map.svg")]
        out: PathBuf,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn render_defaults() {
        let cli = Cli::try_parse_from(["energy-atlas", "render"]).expect("parse");
        assert_eq!(
            cli.command,
            Command::Render {
                index: 0,
                out: None
            }
        );
        assert!(cli.config.is_none());
    }

    #[test]
    fn sources_and_subcommand_args() {
        let cli = Cli::try_parse_from([
            "energy-atlas",
            "--renewable",
            "https://example.org/ren.geojson",
            "--fossil",
            "ff.geojson",
            "animate",
            "--out-dir",
            "frames",
        ])
        .expect("parse");
        assert_eq!(cli.renewable, "https://example.org/ren.geojson");
        assert_eq!(cli.fossil, "ff.geojson");
        assert_eq!(
            cli.command,
            Command::Animate {
                out_dir: PathBuf::from("frames")
            }
        );
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["energy-atlas"]).is_err());
    }
}
