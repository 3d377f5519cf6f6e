// ============================
// crates/backend-lib/src/storage/persistent.rs
// ============================
//! Document store on the local filesystem.
//!
//! Every account is one JSON document, appended as a line to
//! `<root>/users.jsonl`. The log is replayed into an in-memory index on
//! open; the index and the write handle live behind one async mutex so the
//! duplicate check and the append cannot interleave.
//!
//! A failed append is rolled back by truncating the log to its previous
//! length. Ids are handed out before the write is attempted, so an id is
//! never reused even when the rollback itself fails.
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use loginsvc_common::UserId;
use tokio::{fs as tokio_fs, io::AsyncWriteExt, sync::Mutex};

use super::{duplicate_email, User, UserStore};
use crate::error::AppError;
use crate::validation::normalize_email;

const USERS_FILE: &str = "users.jsonl";

struct Index {
    by_email: HashMap<String, User>,
    next_id: UserId,
    log: tokio_fs::File,
    #[cfg(test)]
    fail_next_sync: bool,
}

impl Index {
    async fn append(&mut self, line: &[u8]) -> std::io::Result<()> {
        self.log.write_all(line).await?;
        self.log.flush().await?;
        #[cfg(test)]
        if std::mem::take(&mut self.fail_next_sync) {
            return Err(std::io::Error::other("sync_data failed"));
        }
        self.log.sync_data().await
    }
}

/// Flat-file implementation of the `UserStore` trait
pub struct PersistentStore {
    path: PathBuf,
    index: Mutex<Index>,
}

impl PersistentStore {
    /// Open (or create) the store under `root` and replay its log.
    ///
    /// A final line without its newline is the remains of an interrupted
    /// append; it is dropped from the log. Any other unreadable line fails
    /// the open.
    pub async fn open<P: AsRef<Path>>(root: P) -> Result<Self, AppError> {
        let root = root.as_ref();
        tokio_fs::create_dir_all(root).await?;
        let path = root.join(USERS_FILE);

        let mut by_email = HashMap::new();
        let mut max_id: UserId = 0;
        let mut torn_tail = None;

        if tokio_fs::try_exists(&path).await? {
            let content = tokio_fs::read_to_string(&path).await?;
            let complete = content.rfind('\n').map_or(0, |i| i + 1);
            if complete < content.len() {
                torn_tail = Some(complete as u64);
            }

            for (line_no, line) in content[..complete].lines().enumerate() {
                if line.trim().is_empty() {
                    continue;
                }
                let user: User = serde_json::from_str(line).map_err(|e| {
                    AppError::Store(format!(
                        "corrupt user record at {}:{}: {e}",
                        path.display(),
                        line_no + 1
                    ))
                })?;
                max_id = max_id.max(user.id);
                let key = normalize_email(&user.email);
                if by_email.contains_key(&key) {
                    tracing::warn!(line = line_no + 1, "skipping duplicate user record");
                    continue;
                }
                by_email.insert(key, user);
            }
        }

        let log = tokio_fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        if let Some(len) = torn_tail {
            tracing::warn!(
                path = %path.display(),
                offset = len,
                "dropping incomplete trailing user record"
            );
            log.set_len(len).await?;
        }

        tracing::info!(
            path = %path.display(),
            users = by_email.len(),
            "opened persistent user store"
        );

        Ok(Self {
            path,
            index: Mutex::new(Index {
                by_email,
                next_id: max_id + 1,
                log,
                #[cfg(test)]
                fail_next_sync: false,
            }),
        })
    }

    /// Path of the backing log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UserStore for PersistentStore {
    async fn find_by_email(&self, normalized_email: &str) -> Result<Option<User>, AppError> {
        let index = self.index.lock().await;
        Ok(index.by_email.get(normalized_email).cloned())
    }

    async fn insert(&self, email: &str, password_hash: &str) -> Result<User, AppError> {
        let mut index = self.index.lock().await;
        let key = normalize_email(email);
        if index.by_email.contains_key(&key) {
            return Err(duplicate_email());
        }

        let user = User {
            id: index.next_id,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        let mut line = serde_json::to_string(&user)?;
        line.push('\n');

        let len_before = index.log.metadata().await?.len();
        index.next_id += 1;

        // the index only changes once the record is on disk
        if let Err(e) = index.append(line.as_bytes()).await {
            if let Err(rollback) = index.log.set_len(len_before).await {
                tracing::error!(error = %rollback, "failed to roll back partial user record");
            }
            return Err(e.into());
        }

        index.by_email.insert(key, user.clone());
        Ok(user)
    }

    async fn user_count(&self) -> Result<usize, AppError> {
        Ok(self.index.lock().await.by_email.len())
    }

    fn backend_name(&self) -> &'static str {
        "persistent"
    }
}
