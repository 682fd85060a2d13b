use std::path::PathBuf;

use kanal::{AsyncReceiver, AsyncSender};
use songngu_core::render::Overlay;
use songngu_types::{AppEvent, Position, ReadingMode, SummaryRow};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;

const HELP: &str = "\
Commands (positions are LINE.COL, line 1-based, column 0-based):
  open <path>                  load a text document
  mark <L.C> <L.C>             mark the text between two positions
  delete <n>                   delete entry number n
  translate                    translate the document into the mirror
  mirror <path>                load the mirror text from a file
  font <n>                     change the font size
  list                         show the vocabulary table
  show                         show both documents with highlights
  save <path> | load <path>    save or restore a session
  export <path>                export the vocabulary as TSV
  read paragraph | read sentence <L.C> | read word <L.C> <L.C>
  say <n>                      read entry number n aloud
  pause                        pause or resume reading
  stop                         stop reading
  quit";

#[derive(Debug)]
pub enum Command {
    Send(AppEvent),
    Help,
    Empty,
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Bad position '{0}', expected LINE.COL with LINE starting at 1")]
    BadPosition(String),

    #[error("Bad number '{0}'")]
    BadNumber(String),
}

/// Console I/O: reads commands from stdin and prints what the app sends back
pub async fn console_loop(
    app_to_console_rx: AsyncReceiver<AppEvent>,
    console_to_app_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut quitting = false;
    println!("{HELP}");

    loop {
        tokio::select! {
            biased;

            event = app_to_console_rx.recv() => {
                print_event(&event?);
            }
            _ = cancel.cancelled() => {
                tracing::info!("Console stopping");
                break;
            }
            line = lines.next_line(), if !quitting => {
                let Some(line) = line? else {
                    tracing::info!("Input closed");
                    quitting = true;
                    console_to_app_tx.send(AppEvent::Shutdown).await?;
                    continue;
                };

                match parse_command(&line) {
                    Ok(Command::Empty) => {}
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Send(event)) => {
                        quitting = matches!(event, AppEvent::Shutdown);
                        console_to_app_tx.send(event).await?;
                    }
                    Err(e) => println!("{e}"),
                }
            }
        }
    }

    Ok(())
}

fn print_event(event: &AppEvent) {
    match event {
        AppEvent::ShowSummary(rows) => println!("{}", format_summary(rows)),
        AppEvent::ShowText { role, text } => println!("--- {role} ---\n{text}"),
        AppEvent::ReadingStatus { status, .. } => println!("[reading] {status}"),
        AppEvent::Notice(notice) => println!("{notice}"),
        other => tracing::debug!("Console ignoring {:?}", std::mem::discriminant(other)),
    }
}

pub fn format_summary(rows: &[SummaryRow]) -> String {
    if rows.is_empty() {
        return "No entries.".to_string();
    }

    let mut out = format!("{:>3}  {:<24} {:<10} {}", "#", "word", "pos", "meaning");
    for row in rows {
        out.push_str(&format!(
            "\n{:>3}  {:<24} {:<10} {}",
            row.ordinal, row.display_form, row.part_of_speech, row.target_meaning
        ));
    }
    out
}

pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let line = line.trim();
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let args: Vec<&str> = rest.split_whitespace().collect();

    let event = match name {
        "" => return Ok(Command::Empty),
        "help" | "?" => return Ok(Command::Help),
        "open" => AppEvent::OpenDocument(path_arg(rest, "open <path>")?),
        "mark" => match args.as_slice() {
            [start, end] => AppEvent::MarkSelection {
                start: parse_position(start)?,
                end: parse_position(end)?,
            },
            _ => return Err(CommandError::Usage("mark <L.C> <L.C>")),
        },
        "delete" => match args.as_slice() {
            [n] => AppEvent::DeleteEntry {
                ordinal: parse_number(n)?,
            },
            _ => return Err(CommandError::Usage("delete <n>")),
        },
        "translate" => AppEvent::TranslateMirror,
        "mirror" => AppEvent::LoadMirror(path_arg(rest, "mirror <path>")?),
        "font" => match args.as_slice() {
            [n] => AppEvent::ChangeFont(parse_number(n)?),
            _ => return Err(CommandError::Usage("font <n>")),
        },
        "list" => AppEvent::ListEntries,
        "show" => AppEvent::ShowDocuments,
        "save" => AppEvent::SaveSession(path_arg(rest, "save <path>")?),
        "load" => AppEvent::LoadSession(path_arg(rest, "load <path>")?),
        "export" => AppEvent::Export(path_arg(rest, "export <path>")?),
        "read" => AppEvent::StartReading(parse_reading_mode(&args)?),
        "say" => match args.as_slice() {
            [n] => AppEvent::StartReading(ReadingMode::Entry {
                ordinal: parse_number(n)?,
            }),
            _ => return Err(CommandError::Usage("say <n>")),
        },
        "pause" => AppEvent::TogglePause,
        "stop" => AppEvent::StopReading,
        "quit" | "exit" => AppEvent::Shutdown,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Command::Send(event))
}

fn parse_reading_mode(args: &[&str]) -> Result<ReadingMode, CommandError> {
    const USAGE: &str = "read paragraph | read sentence <L.C> | read word <L.C> <L.C>";
    match args {
        ["paragraph"] => Ok(ReadingMode::Paragraph),
        ["sentence", cursor] => Ok(ReadingMode::Sentence {
            cursor: parse_position(cursor)?,
        }),
        ["word", start, end] => Ok(ReadingMode::Word {
            start: parse_position(start)?,
            end: parse_position(end)?,
        }),
        _ => Err(CommandError::Usage(USAGE)),
    }
}

/// `LINE.COL` with a 1-based line, as text widgets count them
pub fn parse_position(value: &str) -> Result<Position, CommandError> {
    let bad = || CommandError::BadPosition(value.to_string());
    let (line, col) = value.split_once('.').ok_or_else(bad)?;
    let line: usize = line.parse().map_err(|_| bad())?;
    let col: usize = col.parse().map_err(|_| bad())?;
    if line == 0 {
        return Err(bad());
    }
    Ok(Position::new(line - 1, col))
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::BadNumber(value.to_string()))
}

fn path_arg(rest: &str, usage: &'static str) -> Result<PathBuf, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::Usage(usage));
    }
    Ok(PathBuf::from(rest))
}

/// Plain-text rendering of a document: `[n:...]` around marked spans, `{...}` around the
/// segment being read
pub fn annotate_text(text: &str, overlay: &Overlay) -> String {
    // (offset, closing before opening, text)
    let mut inserts: Vec<(usize, u8, String)> = Vec::new();
    for highlight in &overlay.highlights {
        let open = match overlay.marker_for(&highlight.key) {
            Some(marker) => format!("[{}:", marker.ordinal),
            None => "[".to_string(),
        };
        inserts.push((highlight.range.start, 1, open));
        inserts.push((highlight.range.end, 0, "]".to_string()));
    }
    if let Some(range) = overlay.reading {
        inserts.push((range.start, 1, "{".to_string()));
        inserts.push((range.end, 0, "}".to_string()));
    }
    inserts.sort_by_key(|(offset, order, _)| (*offset, *order));

    let mut out = String::with_capacity(text.len() + inserts.len() * 4);
    let mut pending = inserts.into_iter().peekable();
    for (idx, ch) in text.chars().enumerate() {
        while let Some((_, _, insert)) = pending.next_if(|(offset, _, _)| *offset <= idx) {
            out.push_str(&insert);
        }
        out.push(ch);
    }
    for (_, _, insert) in pending {
        out.push_str(&insert);
    }
    out
}
