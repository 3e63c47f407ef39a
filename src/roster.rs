// 🗂️ Roster Store - the only persisted state
//
// A JSON array of {name, position} objects, four-space indented.
// Missing file = empty roster (the defined initial state).
// Save replaces the whole file atomically; no merging, no history.

use crate::atomic::write_atomically;
use crate::error::{CommitteeError, CommitteeResult};
use crate::model::Roster;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default roster file name, relative to the working directory
pub const DEFAULT_ROSTER_FILE: &str = "members.json";

#[derive(Debug, Clone)]
pub struct RosterStore {
    path: PathBuf,
}

impl RosterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        RosterStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted roster; a missing file yields an empty roster
    pub fn load(&self) -> CommitteeResult<Roster> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no roster file yet, starting empty");
                return Ok(Roster::new());
            }
            Err(e) => return Err(CommitteeError::io(&self.path, e)),
        };

        let roster: Roster =
            serde_json::from_str(&contents).map_err(|source| CommitteeError::RosterFormat {
                path: self.path.clone(),
                source,
            })?;

        info!(path = %self.path.display(), members = roster.len(), "roster loaded");
        Ok(roster)
    }

    /// Overwrite the persisted roster with `roster`
    pub fn save(&self, roster: &Roster) -> CommitteeResult<()> {
        let bytes = to_pretty_json(roster).map_err(|source| CommitteeError::RosterFormat {
            path: self.path.clone(),
            source,
        })?;

        write_atomically(&self.path, |file| {
            use std::io::Write;
            file.write_all(&bytes)
                .map_err(|e| CommitteeError::io(&self.path, e))
        })?;

        info!(path = %self.path.display(), members = roster.len(), "roster saved");
        Ok(())
    }
}

fn to_pretty_json(roster: &Roster) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    roster.serialize(&mut ser)?;
    Ok(buf)
}
