use serde::{Deserialize, Serialize};
use std::time::Duration;

const MANUAL: &str = "manual";

/// How often the sync job should be started automatically.
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Frequency {
    /// Only ever started by hand.
    #[default]
    Manual,
    Every(Duration),
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency '{0}', expected 'manual' or a number followed by one of s, m, h, d")]
pub struct InvalidFrequency(String);

impl Frequency {
    pub fn interval(&self) -> Option<Duration> {
        match self {
            Frequency::Manual => None,
            Frequency::Every(interval) => Some(*interval),
        }
    }

    pub fn minutes(&self) -> Option<u64> {
        self.interval().map(|interval| interval.as_secs() / 60)
    }
}

impl std::str::FromStr for Frequency {
    type Err = InvalidFrequency;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(MANUAL) {
            return Ok(Frequency::Manual);
        }
        // humantime accepts far more than we want to promise in the config
        // format, so only hand it a single number with one of our units
        let invalid = || InvalidFrequency(s.to_owned());
        let number = s
            .strip_suffix(&['s', 'm', 'h', 'd'][..])
            .ok_or_else(invalid)?;
        if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let interval = humantime::parse_duration(s).map_err(|_| invalid())?;
        if interval.is_zero() {
            return Err(invalid());
        }
        Ok(Frequency::Every(interval))
    }
}

impl TryFrom<String> for Frequency {
    type Error = InvalidFrequency;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Manual => f.write_str(MANUAL),
            Frequency::Every(interval) => {
                let secs = interval.as_secs();
                let (value, unit) = [(86400, 'd'), (3600, 'h'), (60, 'm')]
                    .into_iter()
                    .find(|(factor, _)| secs % factor == 0)
                    .map(|(factor, unit)| (secs / factor, unit))
                    .unwrap_or((secs, 's'));
                write!(f, "{}{}", value, unit)
            }
        }
    }
}

impl From<Frequency> for String {
    fn from(frequency: Frequency) -> Self {
        frequency.to_string()
    }
}
