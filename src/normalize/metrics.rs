use tracing::info;

/// Per-pass change counts for one normalization run.
pub struct PassTracker {
    run_id: String,
    metrics: Vec<PassMetric>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassMetric {
    pub pass_name: &'static str,
    pub records: usize,
    pub changed: usize,
}

impl PassTracker {
    pub fn new(run_id: String) -> Self {
        PassTracker {
            run_id,
            metrics: Vec::new(),
        }
    }

    /// Count one record through `pass_name`, changed or not.
    pub fn record(&mut self, pass_name: &'static str, changed: bool) {
        let idx = match self.metrics.iter().position(|m| m.pass_name == pass_name) {
            Some(idx) => idx,
            None => {
                self.metrics.push(PassMetric {
                    pass_name,
                    records: 0,
                    changed: 0,
                });
                self.metrics.len() - 1
            }
        };
        let metric = &mut self.metrics[idx];
        metric.records += 1;
        if changed {
            metric.changed += 1;
        }
    }

    pub fn metrics(&self) -> &[PassMetric] {
        &self.metrics
    }

    pub fn log_summary(&self) {
        for m in &self.metrics {
            info!(
                run = %self.run_id,
                pass = m.pass_name,
                records = m.records,
                changed = m.changed,
                "normalization pass"
            );
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

pub fn new_run_id() -> String {
    format!("run-{}", chrono::Utc::now().format("%Y%m%dT%H%M%SZ"))
}
