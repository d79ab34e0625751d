use crate::markers::{Marker, MarkerError, MarkerStore};
use time::OffsetDateTime;

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Elapsed {
    pub started_at: OffsetDateTime,
    pub minutes: u64,
}

impl Elapsed {
    fn between(started_at: OffsetDateTime, until: OffsetDateTime) -> Self {
        // clock skew or hand-edited markers can put `until` before the start
        let minutes = (until - started_at).whole_minutes().max(0) as u64;
        Elapsed {
            started_at,
            minutes,
        }
    }
}

/// The state of the sync job as derived from the marker files.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum RunStatus {
    NoStatus,
    Running(Elapsed),
    Failed(Elapsed),
    Succeeded(Elapsed),
}

impl RunStatus {
    fn elapsed(&self) -> Option<&Elapsed> {
        match self {
            RunStatus::NoStatus => None,
            RunStatus::Running(elapsed)
            | RunStatus::Failed(elapsed)
            | RunStatus::Succeeded(elapsed) => Some(elapsed),
        }
    }

    pub fn started_at(&self) -> Option<OffsetDateTime> {
        self.elapsed().map(|e| e.started_at)
    }

    pub fn duration_minutes(&self) -> Option<u64> {
        self.elapsed().map(|e| e.minutes)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, RunStatus::Running(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::NoStatus => "no status",
            RunStatus::Running(_) => "running",
            RunStatus::Failed(_) => "failed",
            RunStatus::Succeeded(_) => "succeeded",
        }
    }
}

#[derive(Debug, Copy, Clone)]
enum Until {
    Now,
    MarkerModified,
}

/// Checked top to bottom once a `start` marker is known to exist.
const RULES: [(Marker, Until, fn(Elapsed) -> RunStatus); 3] = [
    (Marker::Lock, Until::Now, RunStatus::Running),
    (Marker::Error, Until::MarkerModified, RunStatus::Failed),
    (Marker::Success, Until::MarkerModified, RunStatus::Succeeded),
];

/// Read-only view deriving a [`RunStatus`] from a [`MarkerStore`].
#[derive(Debug)]
pub struct StatusResolver<'a> {
    markers: &'a MarkerStore,
}

impl<'a> StatusResolver<'a> {
    pub fn new(markers: &'a MarkerStore) -> Self {
        StatusResolver { markers }
    }

    pub fn resolve(&self) -> Result<RunStatus, MarkerError> {
        self.resolve_at(OffsetDateTime::now_utc())
    }

    pub fn resolve_at(&self, now: OffsetDateTime) -> Result<RunStatus, MarkerError> {
        if !self.markers.exists(Marker::Start) {
            return Ok(RunStatus::NoStatus);
        }
        let Some(started_at) = self.timestamp(Marker::Start)? else {
            return Ok(RunStatus::NoStatus);
        };

        for (marker, until, status) in RULES {
            if !self.markers.exists(marker) {
                continue;
            }
            let until = match until {
                Until::Now => now,
                Until::MarkerModified => match self.timestamp(marker)? {
                    Some(modified) => modified,
                    None => continue,
                },
            };
            return Ok(status(Elapsed::between(started_at, until)));
        }

        Ok(RunStatus::NoStatus)
    }

    /// A marker can vanish between the existence check and this read when a
    /// runner in another process is mid-transition; that counts as absent.
    fn timestamp(&self, marker: Marker) -> Result<Option<OffsetDateTime>, MarkerError> {
        match self.markers.modified_at(marker) {
            Ok(modified) => Ok(Some(modified)),
            Err(MarkerError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
