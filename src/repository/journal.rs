use crate::model::step::{millis, Step};
use crate::repository::metrics::MetricsSnapshot;
use std::fs::OpenOptions;
use std::io::Write;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SUMMARY_HEADER: &str = "timestamp,client,domain,result_ip,total_time_ms";
const STEPS_HEADER: &str =
    "timestamp,domain,resolution_mode,dns_server_ip,step,response_type,rtt_ms,total_time_ms,cache_status";
const METRICS_HEADER: &str =
    "Total Queries,Success,Failed,Avg Latency (ms),Throughput (qps),% Cache Resolved";

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_summary_path")]
    summary_path: PathBuf,
    #[serde(default = "Config::default_steps_path")]
    steps_path: PathBuf,
    #[serde(default = "Config::default_metrics_path")]
    metrics_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            summary_path: Self::default_summary_path(),
            steps_path: Self::default_steps_path(),
            metrics_path: Self::default_metrics_path(),
        }
    }
}

impl Config {
    fn default_summary_path() -> PathBuf {
        PathBuf::from("resolver_summary.csv")
    }

    fn default_steps_path() -> PathBuf {
        PathBuf::from("resolver_detailed_steps.csv")
    }

    fn default_metrics_path() -> PathBuf {
        PathBuf::from("resolver_metrics.csv")
    }
}

impl Config {
    pub fn build(self) -> std::io::Result<CsvJournal> {
        let journal = CsvJournal {
            summary_path: self.summary_path,
            steps_path: self.steps_path,
            metrics_path: self.metrics_path,
        };
        journal.reset()?;
        Ok(journal)
    }
}

/// Where a query's summary, its step trace and the aggregate metrics land.
/// The two log files only ever grow; the metrics file is rewritten whole.
pub trait JournalService {
    fn record_summary(
        &self,
        timestamp: &str,
        client: &str,
        domain: &str,
        address: Option<Ipv4Addr>,
        total: Duration,
    ) -> std::io::Result<()>;

    fn record_steps(&self, timestamp: &str, steps: &[Step]) -> std::io::Result<()>;

    fn record_metrics(&self, snapshot: &MetricsSnapshot) -> std::io::Result<()>;
}

pub struct CsvJournal {
    summary_path: PathBuf,
    steps_path: PathBuf,
    metrics_path: PathBuf,
}

fn append(path: &Path, lines: &[String]) -> std::io::Result<()> {
    let mut file = OpenOptions::new().append(true).open(path)?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(())
}

impl CsvJournal {
    /// Starts both log files over with just their header rows.
    fn reset(&self) -> std::io::Result<()> {
        std::fs::write(&self.summary_path, format!("{SUMMARY_HEADER}\n"))?;
        std::fs::write(&self.steps_path, format!("{STEPS_HEADER}\n"))?;
        std::fs::write(&self.metrics_path, format!("{METRICS_HEADER}\n"))?;
        Ok(())
    }
}

impl JournalService for CsvJournal {
    fn record_summary(
        &self,
        timestamp: &str,
        client: &str,
        domain: &str,
        address: Option<Ipv4Addr>,
        total: Duration,
    ) -> std::io::Result<()> {
        let result = address
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "FAIL".into());
        append(
            &self.summary_path,
            &[format!(
                "{timestamp},{client},{domain},{result},{:.2}",
                millis(total)
            )],
        )
    }

    fn record_steps(&self, timestamp: &str, steps: &[Step]) -> std::io::Result<()> {
        let lines: Vec<String> = steps
            .iter()
            .map(|step| {
                format!(
                    "{timestamp},{},{},{},{},{},{},{},{}",
                    step.domain,
                    step.mode,
                    step.server,
                    step.stage,
                    step.response,
                    step.rtt_field(),
                    step.total_field(),
                    step.cache_status,
                )
            })
            .collect();
        append(&self.steps_path, &lines)
    }

    fn record_metrics(&self, snapshot: &MetricsSnapshot) -> std::io::Result<()> {
        std::fs::write(
            &self.metrics_path,
            format!(
                "{METRICS_HEADER}\n{},{},{},{:.2},{:.2},{:.2}\n",
                snapshot.total_queries,
                snapshot.successes,
                snapshot.failures,
                snapshot.avg_latency_ms,
                snapshot.throughput_qps,
                snapshot.cache_resolved_pct,
            ),
        )
    }
}

#[cfg(test)]
pub use mock::MockJournal;


#[cfg(test)]
mod tests {
    use super::{Config, JournalService};
    use crate::model::step::{CacheStatus, ResolutionMode, ResponseType, Stage, Step};
    use crate::repository::metrics::MetricsSnapshot;
    use std::net::Ipv4Addr;
    use std::path::PathBuf;
    use std::time::Duration;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!("rootwalk-{name}-{}", std::process::id()));
            std::fs::create_dir_all(&path).unwrap();
            Self(path)
        }

        fn journal(&self) -> super::CsvJournal {
            Config {
                summary_path: self.0.join("summary.csv"),
                steps_path: self.0.join("steps.csv"),
                metrics_path: self.0.join("metrics.csv"),
            }
            .build()
            .unwrap()
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn build_should_write_headers() {
        let dir = TempDir::new("headers");
        let _journal = dir.journal();
        let summary = std::fs::read_to_string(dir.0.join("summary.csv")).unwrap();
        assert_eq!(summary, "timestamp,client,domain,result_ip,total_time_ms\n");
        let steps = std::fs::read_to_string(dir.0.join("steps.csv")).unwrap();
        assert!(steps.starts_with("timestamp,domain,resolution_mode"));
    }

    #[test]
    fn summary_should_append_rows() {
        let dir = TempDir::new("summary");
        let journal = dir.journal();
        journal
            .record_summary(
                "2026-08-01 10:00:00",
                "10.0.0.1",
                "example.com",
                Some(Ipv4Addr::new(93, 184, 216, 34)),
                Duration::from_millis(125),
            )
            .unwrap();
        journal
            .record_summary(
                "2026-08-01 10:00:01",
                "10.0.0.1",
                "unknown.invalid",
                None,
                Duration::from_millis(39_000),
            )
            .unwrap();

        let content = std::fs::read_to_string(dir.0.join("summary.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "2026-08-01 10:00:00,10.0.0.1,example.com,93.184.216.34,125.00"
        );
        assert_eq!(
            lines[2],
            "2026-08-01 10:00:01,10.0.0.1,unknown.invalid,FAIL,39000.00"
        );
    }

    #[test]
    fn steps_should_append_one_row_each() {
        let dir = TempDir::new("steps");
        let journal = dir.journal();
        let steps = vec![
            Step {
                domain: "example.com".into(),
                mode: ResolutionMode::Iterative,
                server: "198.41.0.4".into(),
                stage: Stage::Root,
                response: ResponseType::Referral,
                rtt: Some(Duration::from_millis(10)),
                total: None,
                cache_status: CacheStatus::Miss,
            },
            Step {
                domain: "example.com".into(),
                mode: ResolutionMode::Iterative,
                server: "192.0.2.1".into(),
                stage: Stage::TldAuth,
                response: ResponseType::Answer,
                rtt: Some(Duration::from_millis(20)),
                total: Some(Duration::from_millis(30)),
                cache_status: CacheStatus::Miss,
            },
        ];
        journal.record_steps("2026-08-01 10:00:00", &steps).unwrap();

        let content = std::fs::read_to_string(dir.0.join("steps.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            "2026-08-01 10:00:00,example.com,iterative,198.41.0.4,ROOT,REFERRAL,10.00,-,MISS"
        );
        assert_eq!(
            lines[2],
            "2026-08-01 10:00:00,example.com,iterative,192.0.2.1,TLD/AUTH,ANSWER,20.00,30.00,MISS"
        );
    }

    #[test]
    fn metrics_should_be_rewritten_not_appended() {
        let dir = TempDir::new("metrics");
        let journal = dir.journal();
        for total in 1..=2 {
            journal
                .record_metrics(&MetricsSnapshot {
                    total_queries: total,
                    successes: total,
                    failures: 0,
                    avg_latency_ms: 12.5,
                    throughput_qps: 0.5,
                    cache_resolved_pct: 0.0,
                })
                .unwrap();
        }

        let content = std::fs::read_to_string(dir.0.join("metrics.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "Total Queries,Success,Failed,Avg Latency (ms),Throughput (qps),% Cache Resolved"
        );
        assert_eq!(lines[1], "2,2,0,12.50,0.50,0.00");
    }
}
