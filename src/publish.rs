/*!
Snapshot publication (spec §4.6 / §7 Lifecycle).

Grounded in the original `Server`'s `graphMutex sync.RWMutex` plus
`graphData`/`graph`/`lastModified` fields: one reader-writer lock guards
an immutable, atomically swapped snapshot. Readers (the HTTP handlers)
never block each other, and a writer publishes by building the new
snapshot off to the side and only then taking the write lock for the
swap itself, so in-flight reads never observe a half-built snapshot.
*/
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use prost::Message;

use crate::error::PublishError;
use crate::models::Snapshot;

/// One published generation: the typed snapshot plus its pre-encoded
/// protobuf bytes (so `/map?type=binary` never re-serializes per request).
pub struct Published {
    pub snapshot: Snapshot,
    pub encoded: Vec<u8>,
    pub last_modified: DateTime<Utc>,
}

pub struct Store {
    inner: RwLock<Option<Published>>,
    output_file: PathBuf,
    post_generate_command: Option<String>,
}

impl Store {
    pub fn new(output_file: PathBuf, post_generate_command: Option<String>) -> Store {
        Store {
            inner: RwLock::new(None),
            output_file,
            post_generate_command,
        }
    }

    pub fn current(&self) -> std::sync::RwLockReadGuard<'_, Option<Published>> {
        self.inner.read().unwrap()
    }

    /// Encodes `snapshot`, writes it to the configured output file (a
    /// failure here is logged but does not block publishing to memory,
    /// per spec §7), atomically swaps it in, then fires the optional
    /// post-generation hook command (spec §4.6), detached and not awaited.
    pub fn publish(&self, snapshot: Snapshot) -> Result<(), PublishError> {
        let encoded = snapshot.to_proto().encode_to_vec();

        let write_result = fs::write(&self.output_file, &encoded);

        let mut guard = self.inner.write().unwrap();
        *guard = Some(Published {
            snapshot,
            encoded,
            last_modified: Utc::now(),
        });
        drop(guard);

        self.run_post_generate_hook();

        write_result.map_err(PublishError)
    }

    fn run_post_generate_hook(&self) {
        let Some(command) = &self.post_generate_command else {
            return;
        };
        let command = command.clone();
        std::thread::spawn(move || {
            let status = std::process::Command::new("sh").arg("-c").arg(&command).status();
            match status {
                Ok(status) if !status.success() => {
                    log::warn!("post-generation command {command:?} exited with {status}")
                }
                Err(e) => log::warn!("post-generation command {command:?} failed to start: {e}"),
                Ok(_) => {}
            }
        });
    }
}
