//! Control surface: line commands on stdin drive the projection store.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use lt_app::{AutoplayDriver, AutoplayHandle, AutoplayNotice, ContentSequence, ProjectionStore};
use lt_core::resource::filter_hymns;
use lt_core::{DisplaySettings, ProjectionState, ResourceId, ResourceKind, ResourcePack};

use crate::bootstrap::AppDeps;

pub const HELP: &str = "\
commands:
  text <content> [| <reference>]    project free text
  lyric <content> [| <reference>]   project a lyric line
  hymn <number>                     project a hymn, stanza by stanza
  search <term>                     find hymns by title or number
  verse <book> <chapter>[:<verse>]  project scripture, verse by verse
  slides <file>                     project a text file, one slide per paragraph
  next | prev                       step through the active sequence
  autoplay                          start or stop automatic advance
  blackout                          toggle blackout
  font <size>                       set the body font size
  clear                             back to the welcome screen
  status | help | quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    Text { content: String, reference: String },
    Lyric { content: String, reference: String },
    Hymn(u32),
    Search(String),
    Verse { book: String, chapter: usize, verse: usize },
    Slides(PathBuf),
    Next,
    Prev,
    Autoplay,
    Blackout,
    Font(f32),
    Clear,
    Status,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<ControlCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "text" | "lyric" => {
            if rest.is_empty() {
                return Err(format!("usage: {word} <content> [| <reference>]"));
            }
            let (content, reference) = match rest.split_once('|') {
                Some((content, reference)) => (content.trim(), reference.trim()),
                None => (rest, ""),
            };
            // "\n" in the input line stands for a line break on screen.
            let content = content.replace("\\n", "\n");
            let reference = reference.to_string();
            if word.eq_ignore_ascii_case("text") {
                ControlCommand::Text { content, reference }
            } else {
                ControlCommand::Lyric { content, reference }
            }
        }
        "hymn" => ControlCommand::Hymn(
            rest.parse()
                .map_err(|_| "usage: hymn <number>".to_string())?,
        ),
        "search" => ControlCommand::Search(rest.to_string()),
        "verse" => parse_verse(rest)?,
        "slides" if !rest.is_empty() => ControlCommand::Slides(PathBuf::from(rest)),
        "slides" => return Err("usage: slides <file>".into()),
        "next" | "n" => ControlCommand::Next,
        "prev" | "p" => ControlCommand::Prev,
        "autoplay" => ControlCommand::Autoplay,
        "blackout" | "b" => ControlCommand::Blackout,
        "font" => ControlCommand::Font(
            rest.parse()
                .map_err(|_| "usage: font <size>".to_string())?,
        ),
        "clear" => ControlCommand::Clear,
        "status" => ControlCommand::Status,
        "help" | "?" => ControlCommand::Help,
        "quit" | "exit" => ControlCommand::Quit,
        other => return Err(format!("unknown command `{other}`, try `help`")),
    };
    Ok(Some(command))
}

/// `"1 Coríntios 13:4"` → book "1 Coríntios", chapter 13, verse 4.
fn parse_verse(rest: &str) -> Result<ControlCommand, String> {
    const USAGE: &str = "usage: verse <book> <chapter>[:<verse>]";
    let (book, location) = rest.rsplit_once(char::is_whitespace).ok_or(USAGE)?;
    let (chapter, verse) = match location.split_once(':') {
        Some((c, v)) => (c, v),
        None => (location, "1"),
    };
    let chapter = chapter.parse().map_err(|_| USAGE)?;
    let verse = verse.parse().map_err(|_| USAGE)?;
    if chapter == 0 || verse == 0 {
        return Err(USAGE.into());
    }
    Ok(ControlCommand::Verse {
        book: book.trim().to_string(),
        chapter,
        verse,
    })
}

pub enum Flow {
    Continue(Option<String>),
    Quit,
}

pub struct ControlSession {
    store: Arc<ProjectionStore>,
    hymnal: Option<ResourcePack>,
    scripture: Option<ResourcePack>,
    autoplay: Option<AutoplayHandle>,
    autoplay_interval: Duration,
}

impl ControlSession {
    pub fn new(
        store: Arc<ProjectionStore>,
        hymnal: Option<ResourcePack>,
        scripture: Option<ResourcePack>,
        autoplay_interval: Duration,
    ) -> Self {
        Self {
            store,
            hymnal,
            scripture,
            autoplay: None,
            autoplay_interval,
        }
    }

    pub fn handle(&mut self, command: ControlCommand) -> Result<Flow, String> {
        let message = match command {
            ControlCommand::Text { content, reference } => {
                self.project_single(ProjectionState::text(content, reference));
                None
            }
            ControlCommand::Lyric { content, reference } => {
                self.project_single(ProjectionState::lyric(content, reference));
                None
            }
            ControlCommand::Hymn(number) => {
                let hymnal = self.hymnal.as_ref().ok_or("no hymnal loaded")?;
                let hymn = hymnal
                    .hymn(number)
                    .ok_or_else(|| format!("hymn {number} not found"))?;
                let sequence = ContentSequence::stanzas(hymn);
                self.start_sequence(sequence, 0)?;
                Some(format!("{}. {}", hymn.number, hymn.title))
            }
            ControlCommand::Search(term) => {
                let hymnal = self.hymnal.as_ref().ok_or("no hymnal loaded")?;
                let found: Vec<String> = filter_hymns(hymnal.hymns().unwrap_or_default(), &term)
                    .into_iter()
                    .take(20)
                    .map(|h| format!("{:>4}  {}", h.number, h.title))
                    .collect();
                Some(if found.is_empty() {
                    "no hymns found".to_string()
                } else {
                    found.join("\n")
                })
            }
            ControlCommand::Verse {
                book,
                chapter,
                verse,
            } => {
                let scripture = self.scripture.as_ref().ok_or("no scripture loaded")?;
                let found = scripture
                    .books()
                    .unwrap_or_default()
                    .iter()
                    .find(|b| {
                        b.name.to_lowercase() == book.to_lowercase()
                            || b.abbrev
                                .as_deref()
                                .is_some_and(|a| a.eq_ignore_ascii_case(&book))
                    })
                    .ok_or_else(|| format!("book `{book}` not found"))?;
                let sequence = ContentSequence::verses(found, chapter)
                    .ok_or_else(|| format!("{} has no chapter {chapter}", found.name))?;
                self.start_sequence(sequence, verse - 1)?;
                None
            }
            ControlCommand::Slides(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
                let title = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let sequence = ContentSequence::slides(&title, &text);
                let count = sequence.len();
                self.start_sequence(sequence, 0)?;
                Some(format!("{count} slides"))
            }
            ControlCommand::Next => {
                (!self.store.advance()).then(|| "end of sequence".to_string())
            }
            ControlCommand::Prev => {
                (!self.store.retreat()).then(|| "start of sequence".to_string())
            }
            ControlCommand::Autoplay => Some(self.toggle_autoplay()),
            ControlCommand::Blackout => Some(if self.store.toggle_blackout() {
                "blackout on".to_string()
            } else {
                "blackout off".to_string()
            }),
            ControlCommand::Font(size) => {
                let current = self.store.settings();
                let settings = DisplaySettings::new(size, current.background_image)
                    .map_err(|e| e.to_string())?;
                self.store
                    .set_display_settings(settings)
                    .map_err(|e| e.to_string())?;
                None
            }
            ControlCommand::Clear => {
                self.stop_autoplay();
                self.store.clear_projection();
                None
            }
            ControlCommand::Status => Some(self.status()),
            ControlCommand::Help => Some(HELP.to_string()),
            ControlCommand::Quit => {
                self.stop_autoplay();
                return Ok(Flow::Quit);
            }
        };
        Ok(Flow::Continue(message))
    }

    /// Resolves when a running autoplay ends on its own; pending otherwise.
    pub async fn autoplay_finished(&mut self) -> AutoplayNotice {
        match self.autoplay.as_mut() {
            Some(handle) => {
                let notice = handle.finished().await;
                self.autoplay = None;
                notice
            }
            None => std::future::pending().await,
        }
    }

    fn project_single(&self, state: ProjectionState) {
        self.store.set_projection(state);
        self.store.set_navigation_handlers(Default::default());
    }

    fn start_sequence(&self, sequence: ContentSequence, index: usize) -> Result<(), String> {
        if sequence.is_empty() {
            return Err("nothing to project".into());
        }
        let sequence = Arc::new(sequence);
        if !sequence.project_at(&self.store, index) {
            return Err(format!("only {} items", sequence.len()));
        }
        Ok(())
    }

    fn toggle_autoplay(&mut self) -> String {
        if self.autoplay.as_ref().is_some_and(|h| !h.is_finished()) {
            self.stop_autoplay();
            return AutoplayNotice::Stopped.message().to_string();
        }
        if !self.store.navigation_handlers().can_advance() {
            return "nothing to advance".to_string();
        }
        self.autoplay =
            Some(AutoplayDriver::new(self.store.clone(), self.autoplay_interval).spawn());
        format!("autoplay every {}s", self.autoplay_interval.as_secs())
    }

    /// Stop autoplay so the session can be dropped.
    pub fn shutdown(&mut self) {
        self.stop_autoplay();
    }

    fn stop_autoplay(&mut self) {
        if let Some(mut handle) = self.autoplay.take() {
            handle.stop();
        }
    }

    fn status(&self) -> String {
        let snapshot = self.store.snapshot();
        let handlers = self.store.navigation_handlers();
        format!(
            "seq {} | {:?} | {} | blackout {} | font {}px | next {} | prev {} | autoplay {}",
            snapshot.seq,
            snapshot.projection.kind(),
            snapshot.projection.reference(),
            snapshot.blackout,
            snapshot.settings.font_size,
            handlers.can_advance(),
            handlers.can_retreat(),
            self.autoplay.is_some(),
        )
    }
}

async fn load_pack(
    deps: &AppDeps,
    kind: ResourceKind,
    requested: Option<&str>,
) -> Option<ResourcePack> {
    let resource_id = match requested {
        Some(id) => ResourceId::new(id),
        None => deps
            .load_resource
            .configured()
            .find(|(_, config)| config.kind == kind)
            .map(|(id, _)| id.clone())?,
    };

    match deps.load_resource.execute(&resource_id, false).await {
        Ok(acquired) => {
            println!(
                "{resource_id}: {} items ({})",
                acquired.pack.len(),
                acquired.status
            );
            Some(acquired.pack)
        }
        Err(err) => {
            warn!(resource_id = %resource_id, error = %err, "resource not loaded");
            println!("{resource_id}: unavailable ({err})");
            None
        }
    }
}

enum Event {
    Line(Option<String>),
    AutoplayEnded(AutoplayNotice),
}

pub async fn run(deps: &AppDeps, hymnal: Option<&str>, bible: Option<&str>) -> Result<()> {
    let (store, publisher) = deps.projection_store().await?;
    let publisher_task = tokio::spawn(publisher.run());

    let hymnal = load_pack(deps, ResourceKind::Hymnal, hymnal).await;
    let scripture = load_pack(deps, ResourceKind::Scripture, bible).await;
    let mut session = ControlSession::new(store, hymnal, scripture, deps.autoplay_interval());

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let event = tokio::select! {
            line = lines.next_line() => Event::Line(line?),
            notice = session.autoplay_finished() => Event::AutoplayEnded(notice),
        };

        let line = match event {
            Event::AutoplayEnded(notice) => {
                println!("{}", notice.message());
                continue;
            }
            Event::Line(None) => break,
            Event::Line(Some(line)) => line,
        };

        match parse_command(&line).and_then(|cmd| match cmd {
            Some(cmd) => session.handle(cmd),
            None => Ok(Flow::Continue(None)),
        }) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue(Some(message))) => println!("{message}"),
            Ok(Flow::Continue(None)) => {}
            Err(message) => println!("{message}"),
        }
    }

    // Dropping the last store reference ends the publisher once it drained.
    session.shutdown();
    drop(session);
    publisher_task.await?;
    info!("control surface closed");
    Ok(())
}
