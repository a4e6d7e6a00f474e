//! Live log tailing
//!
//! Follows the active combat log from its current end, batching complete
//! lines into a channel for the matcher. In directory mode a watcher rolls
//! the tail over to newly created log files, the way the game starts a fresh
//! file per session.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use std::time::Duration;

use encoding_rs::WINDOWS_1252;
use memchr::memchr_iter;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, BufReader};
use tokio::sync::mpsc::{self, Receiver, Sender};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const TAIL_SLEEP_DURATION: Duration = Duration::from_millis(100);
const READ_CHUNK: usize = 8 * 1024;

fn is_log_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("log") || ext.eq_ignore_ascii_case("txt"))
}

/// Most recently modified log file in a directory.
pub fn newest_log(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut newest: Option<(std::time::SystemTime, PathBuf)> = None;

    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        if !path.is_file() || !is_log_file(&path) {
            continue;
        }
        let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
            continue;
        };
        if newest.as_ref().is_none_or(|(t, _)| modified > *t) {
            newest = Some((modified, path));
        }
    }

    Ok(newest.map(|(_, path)| path))
}

/// Tail one file from its current end until cancelled.
///
/// Lines are decoded as WINDOWS_1252 (the game client's log encoding) and
/// sent in batches of whatever was readable at once; incomplete trailing
/// lines wait for their newline.
pub async fn tail_file(
    path: PathBuf,
    tx: Sender<Vec<String>>,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let file = File::open(&path).await?;
    let mut reader = BufReader::new(file);
    reader.seek(SeekFrom::End(0)).await?;

    info!(path = %path.display(), "tailing log file");

    let mut carry: Vec<u8> = Vec::new();
    let mut chunk = vec![0u8; READ_CHUNK];

    loop {
        if cancel.is_cancelled() {
            break;
        }

        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = sleep(TAIL_SLEEP_DURATION) => {}
            }
            continue;
        }

        carry.extend_from_slice(&chunk[..n]);

        let mut lines = Vec::new();
        let mut start = 0;
        for end in memchr_iter(b'\n', &carry) {
            if end > start {
                let raw = &carry[start..end];
                let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
                if !raw.is_empty() {
                    let (line, _, _) = WINDOWS_1252.decode(raw);
                    lines.push(line.into_owned());
                }
            }
            start = end + 1;
        }
        carry.drain(..start);

        if !lines.is_empty() && tx.send(lines).await.is_err() {
            break;
        }
    }

    Ok(())
}

/// Watches a log directory for newly created log files.
pub struct LogWatcher {
    _watcher: RecommendedWatcher,
    rx: Receiver<notify::Result<Event>>,
}

impl LogWatcher {
    pub fn new(dir: &Path) -> notify::Result<Self> {
        let (tx, rx) = mpsc::channel(100);

        let mut watcher = RecommendedWatcher::new(
            move |res| {
                let _ = tx.blocking_send(res);
            },
            Config::default(),
        )?;

        watcher.watch(dir, RecursiveMode::NonRecursive)?;

        Ok(Self {
            _watcher: watcher,
            rx,
        })
    }

    /// Next created log file, or None when the watcher dies.
    pub async fn next_created(&mut self) -> Option<PathBuf> {
        while let Some(event_result) = self.rx.recv().await {
            match event_result {
                Ok(event) => {
                    if let EventKind::Create(_) = event.kind {
                        for path in event.paths {
                            if is_log_file(&path) {
                                return Some(path);
                            }
                        }
                    }
                }
                Err(e) => warn!(error = %e, "log directory watcher error"),
            }
        }
        None
    }
}

/// Keep a tail running against the active log.
///
/// With an explicit file, tails just that file. With a directory, starts on
/// the newest log inside it and rolls over whenever a new log file appears.
/// Runs until `cancel` fires; the line channel stays open for its lifetime.
pub async fn run_tail(
    file: Option<PathBuf>,
    dir: Option<PathBuf>,
    tx: Sender<Vec<String>>,
    cancel: CancellationToken,
) {
    if let Some(path) = file {
        if let Err(e) = tail_file(path.clone(), tx, cancel).await {
            warn!(path = %path.display(), error = %e, "log tail failed");
        }
        return;
    }

    let Some(dir) = dir else {
        warn!("no log file or directory configured, matcher will receive no lines");
        cancel.cancelled().await;
        return;
    };

    let mut watcher = match LogWatcher::new(&dir) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot watch log directory");
            None
        }
    };

    let mut current = match newest_log(&dir) {
        Ok(path) => path,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot index log directory");
            None
        }
    };

    loop {
        if cancel.is_cancelled() {
            break;
        }

        let child = cancel.child_token();
        let tail = current.clone().map(|path| {
            let tx = tx.clone();
            let child = child.clone();
            tokio::spawn(async move {
                if let Err(e) = tail_file(path.clone(), tx, child).await {
                    warn!(path = %path.display(), error = %e, "log tail failed");
                }
            })
        });

        // Wait for a newer file (or shutdown), then roll the tail over
        let next = match watcher.as_mut() {
            Some(watcher) => {
                tokio::select! {
                    _ = cancel.cancelled() => None,
                    created = watcher.next_created() => created,
                }
            }
            None => {
                cancel.cancelled().await;
                None
            }
        };

        child.cancel();
        if let Some(tail) = tail {
            let _ = tail.await;
        }

        match next {
            Some(path) => {
                debug!(path = %path.display(), "switching to new log file");
                current = Some(path);
            }
            None => break,
        }
    }
}
