//! Subcommand drivers shared by the binary and the tests.

use std::path::{Path, PathBuf};

use runtime::Step;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::config::MapConfig;
use crate::error::AppError;
use crate::input::{Command, HELP};
use crate::render::render_svg;
use crate::session::MapSession;

pub fn load_config(path: Option<&Path>) -> Result<MapConfig, AppError> {
    match path {
        Some(path) => {
            let config = MapConfig::load(path)?;
            info!(path = %path.display(), "config loaded");
            Ok(config)
        }
        None => Ok(MapConfig::default()),
    }
}

pub async fn write_svg(path: &Path, svg: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
    }
    tokio::fs::write(path, svg).await.map_err(|e| AppError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), bytes = svg.len(), "svg written");
    Ok(())
}

/// Jumps to `index` (when it is not already active) and renders that year.
pub fn render_index(session: &mut MapSession, config: &MapConfig, index: usize) -> String {
    if session.sequence().index() != index {
        session.step(Step::Set(index));
    }
    render_svg(session, config)
}

/// Writes one frame per year, starting from the first, and returns the paths.
pub async fn animate(
    session: &mut MapSession,
    config: &MapConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>, AppError> {
    let frames = session.sequence().len();
    if frames == 0 {
        warn!("no years to animate");
        return Ok(Vec::new());
    }
    if session.sequence().index() != 0 {
        session.step(Step::Set(0));
    }

    let mut written = Vec::with_capacity(frames);
    for i in 0..frames {
        if i > 0 {
            session.step(Step::Forward);
        }
        let year = session
            .current_pair()
            .and_then(|p| p.year.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let path = out_dir.join(format!("frame_{i:02}_{year}.svg"));
        write_svg(&path, &render_svg(session, config)).await?;
        written.push(path);
    }
    info!(frames, dir = %out_dir.display(), "animation written");
    Ok(written)
}

/// What a command did, for echoing back to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub lines: Vec<String>,
    pub quit: bool,
}

impl Reply {
    fn line(text: impl Into<String>) -> Self {
        Self {
            lines: vec![text.into()],
            quit: false,
        }
    }
}

pub fn execute(session: &mut MapSession, command: &Command) -> Reply {
    match command {
        Command::Step(step) => {
            let applied = session.step(*step);
            match &applied.year {
                Some(year) => Reply::line(format!("index {} ({year})", applied.index)),
                None => Reply::line(format!(
                    "index {} has no year; map unchanged",
                    applied.index
                )),
            }
        }
        Command::Hover(name) => {
            let popups = session.hover(name);
            if popups.is_empty() {
                return Reply::line(format!("no visible marker named {name:?}"));
            }
            Reply {
                lines: popups.iter().map(|p| p.text()).collect(),
                quit: false,
            }
        }
        Command::Leave(name) => {
            let closed = session.leave(name);
            Reply::line(format!("closed {closed} popup(s)"))
        }
        Command::Base(name) => {
            if session.set_base_layer(name) {
                Reply::line(format!("base layer: {}", session.base_layer()))
            } else {
                Reply::line(format!(
                    "unknown base layer {name:?}; choose from {}",
                    session.base_layers().join(", ")
                ))
            }
        }
        Command::Overlay { theme, visible } => {
            if session.set_overlay_visible(*theme, *visible) {
                let state = if *visible { "shown" } else { "hidden" };
                Reply::line(format!("{theme:?} overlay {state}"))
            } else {
                Reply::line(format!("{theme:?} overlay is not loaded"))
            }
        }
        Command::Legend => Reply {
            lines: session.legend_summary(),
            quit: false,
        },
        Command::Help => Reply::line(HELP),
        Command::Quit => Reply {
            lines: Vec::new(),
            quit: true,
        },
    }
}

/// Reads commands line by line until `quit` or end of input. The SVG at
/// `out` is written once up front and again after every map change.
pub async fn interactive<R>(
    session: &mut MapSession,
    config: &MapConfig,
    out: &Path,
    input: R,
) -> Result<(), AppError>
where
    R: AsyncBufRead + Unpin,
{
    write_svg(out, &render_svg(session, config)).await?;
    println!("{}", session.year_label().text());
    println!("map written to {}; type help for commands", out.display());

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.map_err(AppError::Stdin)? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        let reply = execute(session, &command);
        for text in &reply.lines {
            println!("{text}");
        }
        if reply.quit {
            break;
        }
        if command.changes_view() {
            write_svg(out, &render_svg(session, config)).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{animate, execute, interactive, load_config, render_index};
    use crate::config::MapConfig;
    use crate::input::Command;
    use crate::loading::LoadedDatasets;
    use crate::session::MapSession;
    use formats::Dataset;
    use layers::Theme;
    use pretty_assertions::assert_eq;

    fn dataset(token: &str, base: f64) -> Dataset {
        let props: Vec<String> = [2002, 2003, 2004]
            .iter()
            .enumerate()
            .map(|(i, y)| format!(r#""perc_{token}_{y}": {}"#, base + i as f64))
            .collect();
        let payload = format!(
            r#"{{"type": "FeatureCollection", "features": [
                {{"type": "Feature", "properties": {{"Country": "Peru", {}}},
                  "geometry": {{"type": "Point", "coordinates": [-75.0, -9.0]}}}}
            ]}}"#,
            props.join(", ")
        );
        Dataset::from_geojson_str(token, &payload).expect("parse")
    }

    fn session() -> MapSession {
        MapSession::new(
            LoadedDatasets {
                renewable: Some(dataset("ren", 40.0)),
                fossil: Some(dataset("ff", 50.0)),
            },
            &MapConfig::default(),
        )
    }

    #[test]
    fn no_config_path_uses_defaults() {
        assert_eq!(load_config(None).expect("config"), MapConfig::default());
    }

    #[test]
    fn render_index_moves_the_sequence() {
        let config = MapConfig::default();
        let mut s = session();
        let svg = render_index(&mut s, &config, 2);
        assert_eq!(s.sequence().index(), 2);
        assert!(svg.contains("Year: 2004"));
    }

    #[test]
    fn execute_reports_each_command() {
        let mut s = session();
        let reply = execute(&mut s, &"f".parse::<Command>().expect("cmd"));
        assert_eq!(reply.lines, vec!["index 1 (2003)".to_string()]);

        let reply = execute(&mut s, &"hover peru".parse::<Command>().expect("cmd"));
        assert_eq!(reply.lines.len(), 2);
        assert!(reply.lines[0].starts_with("Peru | 41%"));

        let reply = execute(&mut s, &"leave Peru".parse::<Command>().expect("cmd"));
        assert_eq!(reply.lines, vec!["closed 2 popup(s)".to_string()]);

        let reply = execute(
            &mut s,
            &Command::Overlay {
                theme: Theme::Fossil,
                visible: false,
            },
        );
        assert_eq!(reply.lines, vec!["Fossil overlay hidden".to_string()]);

        let reply = execute(&mut s, &Command::Quit);
        assert!(reply.quit);
    }

    #[tokio::test]
    async fn animate_writes_one_frame_per_year() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = MapConfig::default();
        let mut s = session();
        let frames = animate(&mut s, &config, dir.path()).await.expect("animate");

        let names: Vec<String> = frames
            .iter()
            .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        assert_eq!(
            names,
            vec![
                "frame_00_2002.svg".to_string(),
                "frame_01_2003.svg".to_string(),
                "frame_02_2004.svg".to_string(),
            ]
        );
        let last = std::fs::read_to_string(&frames[2]).expect("read");
        assert!(last.contains("Year: 2004"));
    }

    #[tokio::test]
    async fn interactive_rewrites_map_until_quit() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().join("map.svg");
        let config = MapConfig::default();
        let mut s = session();

        let script: &[u8] = b"forward\nbogus\nforward\nquit\nforward\n";
        interactive(&mut s, &config, &out, script)
            .await
            .expect("interactive");

        assert_eq!(s.sequence().index(), 2);
        let svg = std::fs::read_to_string(&out).expect("read");
        assert!(svg.contains("Year: 2004"));
    }
}
