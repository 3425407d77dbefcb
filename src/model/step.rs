use std::fmt::Display;
use std::time::Duration;

pub fn millis(value: Duration) -> f64 {
    value.as_secs_f64() * 1000.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolutionMode {
    Iterative,
    Cached,
}

impl Display for ResolutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Iterative => write!(f, "iterative"),
            Self::Cached => write!(f, "cached"),
        }
    }
}

/// Which tier of the hierarchy answered: one of the hardcoded roots, any
/// later referral target, or the local cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Root,
    TldAuth,
    Cache,
}

impl Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => write!(f, "ROOT"),
            Self::TldAuth => write!(f, "TLD/AUTH"),
            Self::Cache => write!(f, "CACHE"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseType {
    Answer,
    Referral,
    NoResponse,
    #[allow(dead_code)]
    Nxdomain,
}

impl Display for ResponseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Answer => write!(f, "ANSWER"),
            Self::Referral => write!(f, "REFERRAL"),
            Self::NoResponse => write!(f, "NO_RESPONSE"),
            Self::Nxdomain => write!(f, "NXDOMAIN"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
    #[allow(dead_code)]
    NotApplicable,
}

impl Display for CacheStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hit => write!(f, "HIT"),
            Self::Miss => write!(f, "MISS"),
            Self::NotApplicable => write!(f, "N/A"),
        }
    }
}

/// One entry of the per-query trace: a single server contact, or the cache
/// lookup that short-circuited the walk.
#[derive(Clone, Debug)]
pub struct Step {
    pub domain: String,
    pub mode: ResolutionMode,
    /// contacted server address, or the literal `cache`
    pub server: String,
    pub stage: Stage,
    pub response: ResponseType,
    /// round trip of this contact; `None` when the server never answered
    pub rtt: Option<Duration>,
    /// whole-query time, filled only on the terminal step of a success
    pub total: Option<Duration>,
    pub cache_status: CacheStatus,
}

impl Step {
    pub fn rtt_field(&self) -> String {
        match self.rtt {
            Some(value) => format!("{:.2}", millis(value)),
            None => "timeout".into(),
        }
    }

    pub fn total_field(&self) -> String {
        match self.total {
            Some(value) => format!("{:.2}", millis(value)),
            None => "-".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheStatus, ResolutionMode, ResponseType, Stage, Step};
    use std::time::Duration;

    #[test]
    fn fields_should_render_like_the_csv_expects() {
        let step = Step {
            domain: "example.com".into(),
            mode: ResolutionMode::Iterative,
            server: "198.41.0.4".into(),
            stage: Stage::Root,
            response: ResponseType::Referral,
            rtt: Some(Duration::from_micros(12_345)),
            total: None,
            cache_status: CacheStatus::Miss,
        };
        assert_eq!(step.rtt_field(), "12.35");
        assert_eq!(step.total_field(), "-");
        assert_eq!(step.mode.to_string(), "iterative");
        assert_eq!(step.stage.to_string(), "ROOT");
        assert_eq!(step.response.to_string(), "REFERRAL");
        assert_eq!(step.cache_status.to_string(), "MISS");
    }

    #[test]
    fn timeout_should_render_as_literal() {
        let step = Step {
            domain: "example.com".into(),
            mode: ResolutionMode::Iterative,
            server: "198.41.0.4".into(),
            stage: Stage::Root,
            response: ResponseType::NoResponse,
            rtt: None,
            total: None,
            cache_status: CacheStatus::Miss,
        };
        assert_eq!(step.rtt_field(), "timeout");
    }
}
