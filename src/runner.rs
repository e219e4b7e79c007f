use std::future::Future;

use tokio::sync::oneshot;
use tracing::{error, warn};

use crate::config::CheckConfig;
use crate::evaluate::{evaluate, Verdict};
use crate::fetch::{self, FetchOptions};
use crate::model::CheckResponse;
use crate::report::{status_report, timeout_report};
use crate::types::Severity;

/// What the process prints and how it exits.
#[derive(Debug)]
pub struct Outcome {
    pub severity: Severity,
    pub output: String,
}

/// Run one check against the configured URL.
pub async fn run(cfg: &CheckConfig) -> Outcome {
    run_with(cfg, fetch::probe).await
}

/// Race `probe` against the run deadline and act on whichever finishes first.
///
/// The probe runs as its own task and hands back its single result over a
/// oneshot channel. When the deadline wins, the task is left running; the
/// caller is expected to exit right after.
pub async fn run_with<F, Fut>(cfg: &CheckConfig, probe: F) -> Outcome
where
    F: FnOnce(FetchOptions) -> Fut,
    Fut: Future<Output = CheckResponse> + Send + 'static,
{
    let (tx, rx) = oneshot::channel();
    let pending = probe(cfg.fetch_options());
    tokio::spawn(async move {
        let _ = tx.send(pending.await);
    });

    tokio::select! {
        biased;

        delivered = rx => match delivered {
            Ok(cr) => {
                let verdict = evaluate(&cr, &cfg.thresholds);
                Outcome {
                    severity: verdict.severity,
                    output: status_report(&verdict, &cr, &cfg.thresholds, cfg.verbose),
                }
            }
            Err(_) => {
                error!(url = %cfg.url, "probe task ended without a result");
                let verdict = Verdict {
                    severity: Severity::Unknown,
                    description: "probe task ended without a result".to_string(),
                };
                let cr = CheckResponse::new(&cfg.url);
                Outcome {
                    severity: verdict.severity,
                    output: status_report(&verdict, &cr, &cfg.thresholds, false),
                }
            }
        },
        _ = tokio::time::sleep(cfg.timeout) => {
            warn!(url = %cfg.url, timeout = ?cfg.timeout, "deadline reached before a response");
            Outcome {
                severity: Severity::Unknown,
                output: timeout_report(cfg.timeout, &cfg.url),
            }
        }
    }
}
