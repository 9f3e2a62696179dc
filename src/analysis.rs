//! Analysis backend driven by the app and the dialog's cancel button.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::json;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::catalog::ErrorCode;
use crate::config::AnalysisConfig;
use crate::template::Details;

/// Requests a page analysis and aborts it. Both calls are fire-and-forget:
/// results arrive later on whatever channel the implementation reports to.
pub trait AnalysisApi: Send + Sync {
    fn start_analysis(&self, url: &str);

    fn abort_analysis(&self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    Completed {
        url: String,
    },
    Failed {
        url: String,
        code: Option<u16>,
        details: Option<Details>,
    },
    Aborted {
        url: String,
    },
}

struct InFlight {
    id: u64,
    token: CancellationToken,
}

type Slot = Arc<Mutex<Option<InFlight>>>;

fn lock(slot: &Slot) -> MutexGuard<'_, Option<InFlight>> {
    match slot.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Analysis backend that waits a fixed time and then succeeds or fails
/// with a configured status code.
pub struct SimulatedAnalysis {
    config: AnalysisConfig,
    outcome_tx: UnboundedSender<AnalysisOutcome>,
    current: Slot,
    next_id: AtomicU64,
}

impl SimulatedAnalysis {
    pub fn new(config: AnalysisConfig, outcome_tx: UnboundedSender<AnalysisOutcome>) -> Self {
        Self {
            config,
            outcome_tx,
            current: Arc::new(Mutex::new(None)),
            next_id: AtomicU64::new(0),
        }
    }

    /// The error body a failing request would answer with, as JSON.
    fn error_body(&self, code: u16, url: &str) -> Option<serde_json::Value> {
        match ErrorCode::try_from(code) {
            Ok(ErrorCode::TooManyRequests) => Some(json!({
                "daily_limit_per_host": self.config.daily_limit_per_host,
                "host": host_of(url),
            })),
            _ => None,
        }
    }

    fn failure(&self, url: &str) -> Option<AnalysisOutcome> {
        let code = self.config.fail_with?;
        let details = self
            .error_body(code, url)
            .as_ref()
            .and_then(Details::from_json);
        Some(AnalysisOutcome::Failed {
            url: url.to_string(),
            code: Some(code),
            details,
        })
    }

    #[cfg(test)]
    fn is_idle(&self) -> bool {
        lock(&self.current).is_none()
    }
}

impl AnalysisApi for SimulatedAnalysis {
    fn start_analysis(&self, url: &str) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let token = CancellationToken::new();
        let previous = lock(&self.current).replace(InFlight {
            id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            debug!("Cancelling previous analysis");
            previous.token.cancel();
        }

        let url = url.to_string();
        let outcome = self.failure(&url).unwrap_or_else(|| AnalysisOutcome::Completed {
            url: url.clone(),
        });
        let duration = self.config.delay();
        let outcome_tx = self.outcome_tx.clone();
        let current = Arc::clone(&self.current);

        info!(%url, "Starting analysis");
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                () = token.cancelled() => AnalysisOutcome::Aborted { url },
                () = tokio::time::sleep(duration) => outcome,
            };
            {
                let mut slot = lock(&current);
                if slot.as_ref().is_some_and(|in_flight| in_flight.id == id) {
                    slot.take();
                }
            }
            if outcome_tx.send(outcome).is_err() {
                warn!("Analysis outcome dropped, receiver closed");
            }
        });
    }

    fn abort_analysis(&self) {
        let in_flight = lock(&self.current).take();
        match in_flight {
            Some(in_flight) => {
                info!("Aborting analysis");
                in_flight.token.cancel();
            }
            None => debug!("No analysis in flight to abort"),
        }
    }
}

/// Host part of a URL, or the input unchanged if it has none.
pub fn host_of(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let authority = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
    host.split(':').next().unwrap_or(host).to_string()
}
