//! Command implementations

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::app::{AppContainer, ControlKind, EditorSession, ProbeInteractor};
use crate::cli::args::{EditArgs, ProbeArgs, TrimArgs};
use crate::domain::errors::DomainError;
use crate::domain::model::{ExportReport, SelectedMedia, TimeSpec, TrimRequest};
use crate::domain::rules::RangeValidator;
use crate::utils::format_file_size;

const EDIT_HELP: &str = "\
Commands:
  status          show the file, playhead and trim range
  seek <time>     move the playhead
  scrub <time>    drag the player's own position control
  start <time>    set the trim start
  end <time>      set the trim end
  play | pause    start or stop playback
  tick <secs>     let playback run for a number of seconds
  open <file>     select another video
  close           discard the current video
  export          trim the selected range and save it
  help            show this help
  quit            leave the editor
Times accept seconds (12.5), MM:SS.ms or HH:MM:SS.ms.";

fn require_arg<'a>(name: &str, rest: &'a str) -> Result<&'a str> {
    if rest.is_empty() {
        Err(anyhow!("'{}' needs an argument", name))
    } else {
        Ok(rest)
    }
}

fn parse_time(label: &str, raw: &str) -> Result<f64> {
    TimeSpec::parse(raw)
        .map(|t| t.as_seconds())
        .map_err(|e| anyhow!("Invalid {} time '{}': {}", label, raw, e))
}

/// Execute the probe command
pub async fn probe(container: &impl AppContainer, args: ProbeArgs) -> Result<()> {
    info!("Starting probe operation");
    info!("Input: {}", args.input.display());

    let media = SelectedMedia::from_path(&args.input)?;
    let report = container.probe_interactor().inspect(&media).await;
    let output = ProbeInteractor::format_report(&report, &args.format)?;
    print!("{}", output);
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}

/// Execute the trim command
pub async fn trim(container: &impl AppContainer, args: TrimArgs) -> Result<()> {
    info!("Starting trim operation");
    info!("Input: {}", args.input.display());
    info!("Start: {}", args.start);
    info!("End: {}", args.end);

    let start_time = parse_time("start", &args.start)?;
    let end_time = parse_time("end", &args.end)?;
    RangeValidator::validate(start_time, end_time)?;

    let media = SelectedMedia::from_path(&args.input)?;

    if let Some(duration) = container.probe_interactor().resolve_duration(&media).await {
        if end_time > duration {
            warn!(
                end = end_time,
                duration, "End time is past the end of the video; the backend may reject it"
            );
        }
    }

    let report = container
        .export_interactor()
        .export(TrimRequest::new(media, start_time, end_time))
        .await
        .context("Trim failed")?;

    display_export_report(&mut std::io::stdout(), &report)?;
    info!("Trim operation completed successfully");
    Ok(())
}

/// Execute the edit command, reading session commands from stdin
pub async fn edit(container: &impl AppContainer, args: EditArgs) -> Result<()> {
    info!("Starting edit session");

    let mut session = container.editor_session();
    session
        .select_media(&args.input)
        .await
        .with_context(|| format!("Cannot open {}", args.input.display()))?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    run_edit_loop(&mut session, stdin, &mut std::io::stdout()).await?;

    info!("Edit session finished");
    Ok(())
}

/// One line of input to the edit session
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    Status,
    Seek(f64),
    Scrub(f64),
    Start(f64),
    End(f64),
    Play,
    Pause,
    Tick(f64),
    Open(PathBuf),
    Close,
    Export,
    Help,
    Quit,
}

impl EditCommand {
    /// Parse a line; blank lines yield `None`
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "" => return Ok(None),
            "status" => EditCommand::Status,
            "seek" => EditCommand::Seek(parse_time("seek", require_arg("seek", rest)?)?),
            "scrub" => EditCommand::Scrub(parse_time("scrub", require_arg("scrub", rest)?)?),
            "start" => EditCommand::Start(parse_time("start", require_arg("start", rest)?)?),
            "end" => EditCommand::End(parse_time("end", require_arg("end", rest)?)?),
            "play" => EditCommand::Play,
            "pause" => EditCommand::Pause,
            "tick" => {
                let raw = require_arg("tick", rest)?;
                let secs: f64 = raw
                    .parse()
                    .map_err(|_| anyhow!("Invalid tick length '{}'", raw))?;
                if !secs.is_finite() || secs <= 0.0 {
                    return Err(anyhow!("Tick length must be a positive number of seconds"));
                }
                EditCommand::Tick(secs)
            }
            "open" => EditCommand::Open(PathBuf::from(require_arg("open", rest)?)),
            "close" => EditCommand::Close,
            "export" => EditCommand::Export,
            "help" | "?" => EditCommand::Help,
            "quit" | "exit" | "q" => EditCommand::Quit,
            other => return Err(anyhow!("Unknown command '{}' (try 'help')", other)),
        };
        Ok(Some(command))
    }
}

/// Drive a session from line input until `quit` or end of input.
/// Command errors are printed and the session continues.
pub async fn run_edit_loop<R, W>(session: &mut EditorSession, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    writeln!(out, "{}", session.status())?;

    while let Some(line) = lines.next_line().await? {
        let command = match EditCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "error: {}", e)?;
                continue;
            }
        };
        if command == EditCommand::Quit {
            break;
        }
        if let Err(e) = apply_edit_command(session, command, out).await {
            warn!("Edit command failed: {}", e);
            writeln!(out, "error: {}", e)?;
        }
    }

    session.clear_media();
    Ok(())
}

async fn apply_edit_command<W: Write>(
    session: &mut EditorSession,
    command: EditCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        EditCommand::Status => display_status(out, session)?,
        EditCommand::Seek(t) => {
            let value = session.change_control(ControlKind::Playhead, t)?;
            writeln!(out, "playhead {}", TimeSpec::from_seconds(value))?;
        }
        EditCommand::Scrub(t) => {
            let position = session.scrub(t)?;
            writeln!(out, "playhead {}", TimeSpec::from_seconds(position))?;
        }
        EditCommand::Start(t) => {
            let value = session.change_control(ControlKind::Start, t)?;
            writeln!(out, "start {}", TimeSpec::from_seconds(value))?;
        }
        EditCommand::End(t) => {
            let value = session.change_control(ControlKind::End, t)?;
            writeln!(out, "end {}", TimeSpec::from_seconds(value))?;
        }
        EditCommand::Play => {
            session.play()?;
            writeln!(out, "playing")?;
        }
        EditCommand::Pause => {
            session.pause();
            writeln!(out, "paused")?;
        }
        EditCommand::Tick(secs) => match session.advance(secs) {
            Some(position) => writeln!(out, "playhead {}", TimeSpec::from_seconds(position))?,
            None => writeln!(out, "not playing")?,
        },
        EditCommand::Open(path) => {
            session.select_media(&path).await?;
            writeln!(out, "{}", session.status())?;
        }
        EditCommand::Close => {
            session.clear_media();
            writeln!(out, "{}", session.status())?;
        }
        EditCommand::Export => {
            writeln!(out, "Exporting...")?;
            let report = session.export().await?;
            display_export_report(out, &report)?;
        }
        EditCommand::Help => writeln!(out, "{}", EDIT_HELP)?,
        EditCommand::Quit => {}
    }
    Ok(())
}

fn display_status<W: Write>(out: &mut W, session: &EditorSession) -> Result<()> {
    writeln!(out, "{}", session.status())?;
    match session.controls() {
        Ok(controls) => {
            for control in controls {
                writeln!(out, "  {:<8} {}", format!("{:?}", control.kind).to_lowercase(), control.label())?;
            }
        }
        Err(DomainError::NoMediaSelected) => {}
        Err(e) => writeln!(out, "  {}", e)?,
    }
    Ok(())
}

fn display_export_report<W: Write>(out: &mut W, report: &ExportReport) -> Result<()> {
    writeln!(out, "Trimmed video saved:")?;
    writeln!(out, "  Source: {}", report.source)?;
    writeln!(
        out,
        "  Range: {} - {}",
        TimeSpec::from_seconds(report.start_time),
        TimeSpec::from_seconds(report.end_time)
    )?;
    writeln!(out, "  File: {}", report.saved_to.display())?;
    writeln!(
        out,
        "  Size: {} ({})",
        format_file_size(report.bytes),
        report.content_type
    )?;
    writeln!(out, "  Completed: {}", report.completed_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
    Ok(())
}
