//! The source stage: every regular file under a root.
//!
//! The directory walk runs on the blocking pool and feeds paths back to the
//! async former over a bounded channel.

use async_trait::async_trait;
use flowline::stages::{Former, Joint};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use walkdir::WalkDir;

const WALK_CHANNEL_CAPACITY: usize = 64;

/// Puts the path of every regular file under `root`. Symbolic links are not
/// followed. The first walk error is reported and ends the walk.
#[derive(Debug, Clone)]
pub struct Walker {
    root: PathBuf,
}

impl Walker {
    /// Creates a walker of `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// Sends every regular file under `root`, stopping after the first error or
/// once the receiving side is gone.
fn walk(root: &Path, found: &mpsc::Sender<walkdir::Result<PathBuf>>) {
    for entry in WalkDir::new(root) {
        let item = match entry {
            Ok(entry) if !entry.file_type().is_file() => continue,
            Ok(entry) => Ok(entry.into_path()),
            Err(err) => Err(err),
        };
        let failed = item.is_err();
        if found.blocking_send(item).is_err() || failed {
            return;
        }
    }
}

#[async_trait]
impl Former<(), PathBuf> for Walker {
    async fn form(&self, joint: &dyn Joint<(), PathBuf>) {
        let (found, mut paths) = mpsc::channel(WALK_CHANNEL_CAPACITY);
        let root = self.root.clone();
        let walking = tokio::task::spawn_blocking(move || walk(&root, &found));

        while let Some(item) = paths.recv().await {
            match item {
                Ok(path) => {
                    if joint.put(path).await.is_err() {
                        debug!("walk stopped early");
                        break;
                    }
                }
                Err(err) => {
                    let _ = joint.report(err.into()).await;
                    break;
                }
            }
        }

        drop(paths);
        if let Err(err) = walking.await {
            warn!(%err, "directory walk did not finish cleanly");
        }
    }
}
