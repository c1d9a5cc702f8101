//! Configuration file watcher for hot reload.
//!
//! The parent directory is watched rather than the file: editors that save by
//! writing a temporary file and renaming it over the original replace the
//! inode, and a watch on the old inode would go quiet after the first save.
//! Only events naming the config file are considered, and only configs that
//! load and validate are forwarded.

use notify::event::{EventKind, ModifyKind};
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::GatewayConfig;

pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<GatewayConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for validated configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<GatewayConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive for as long as
    /// updates are wanted.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let directory = watched_directory(&self.path);
        let file_name = self.path.file_name().map(OsString::from).ok_or_else(|| {
            notify::Error::generic("config path has no file name")
                .add_path(self.path.clone())
        })?;

        let tx = self.update_tx;
        let path = self.path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if is_reload_event(&event, &file_name) => {
                    tracing::info!(path = ?path, kind = ?event.kind, "Config file change detected, reloading");
                    match load_config(&path) {
                        Ok(new_config) => {
                            let _ = tx.send(new_config);
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to reload config, keeping current configuration");
                        }
                    }
                }
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&directory, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, directory = ?directory, "Config watcher started");
        Ok(watcher)
    }
}

fn watched_directory(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Writes, creations and renames that land on the config file.
fn is_reload_event(event: &Event, file_name: &OsString) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Name(_))
            | EventKind::Modify(ModifyKind::Any)
    );
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(file_name.as_os_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RenameMode};

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("token-gateway-watch-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_reload_events_filtered_by_file_name() {
        let name = OsString::from("gateway.toml");

        assert!(is_reload_event(
            &event(EventKind::Modify(ModifyKind::Name(RenameMode::To)), "/etc/gw/gateway.toml"),
            &name
        ));
        assert!(is_reload_event(
            &event(EventKind::Create(CreateKind::File), "/etc/gw/gateway.toml"),
            &name
        ));
        assert!(is_reload_event(
            &event(EventKind::Modify(ModifyKind::Data(DataChange::Content)), "/etc/gw/gateway.toml"),
            &name
        ));
        assert!(!is_reload_event(
            &event(EventKind::Create(CreateKind::File), "/etc/gw/.gateway.toml.swp"),
            &name
        ));
        assert!(!is_reload_event(
            &event(EventKind::Remove(notify::event::RemoveKind::File), "/etc/gw/gateway.toml"),
            &name
        ));
    }

    #[test]
    fn test_watched_directory_for_bare_file_name() {
        assert_eq!(watched_directory(Path::new("gateway.toml")), PathBuf::from("."));
        assert_eq!(watched_directory(Path::new("/etc/gw/gateway.toml")), PathBuf::from("/etc/gw"));
    }

    #[tokio::test]
    async fn test_rename_over_config_delivers_update() {
        let dir = scratch_dir();
        let path = dir.join("gateway.toml");
        std::fs::write(&path, "[backend]\ntimeout_ms = 1000\n").unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let _handle = watcher.run().unwrap();

        let staged = dir.join("gateway.toml.tmp");
        std::fs::write(&staged, "[backend]\ntimeout_ms = 2500\n").unwrap();
        std::fs::rename(&staged, &path).unwrap();

        let update = tokio::time::timeout(Duration::from_secs(10), updates.recv())
            .await
            .expect("no update after atomic save")
            .unwrap();
        assert_eq!(update.backend.timeout_ms, 2500);

        // the watch survives the inode swap
        let staged = dir.join("gateway.toml.tmp");
        std::fs::write(&staged, "[backend]\ntimeout_ms = 4000\n").unwrap();
        std::fs::rename(&staged, &path).unwrap();

        let mut latest = None;
        while let Ok(Some(update)) =
            tokio::time::timeout(Duration::from_secs(10), updates.recv()).await
        {
            if update.backend.timeout_ms == 4000 {
                latest = Some(update);
                break;
            }
        }
        assert!(latest.is_some(), "no update after second atomic save");

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_invalid_config_not_forwarded() {
        let dir = scratch_dir();
        let path = dir.join("gateway.toml");
        std::fs::write(&path, "").unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(&path);
        let _handle = watcher.run().unwrap();

        std::fs::write(&path, "[backend]\ntimeout_ms = 0\n").unwrap();

        let received = tokio::time::timeout(Duration::from_millis(500), updates.recv()).await;
        assert!(received.is_err());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
