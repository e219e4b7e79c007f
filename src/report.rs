use std::time::Duration;

use crate::evaluate::{Thresholds, Verdict};
use crate::model::CheckResponse;
use crate::types::Severity;

/// Status line plus optional tree dump for a completed run.
///
/// The `|time=<secs>s;<warn>;<crit>` suffix is performance data parsed by the
/// monitoring system; its shape must not change.
pub fn status_report(
    verdict: &Verdict,
    cr: &CheckResponse,
    limits: &Thresholds,
    verbose: bool,
) -> String {
    let secs = cr.response_time.as_secs_f64();
    let mut out = format!(
        "{}: {}; Response time: {:.6}; URL: {:?}|time={:.6}s;{:.6};{:.6}\n",
        verdict.severity, verdict.description, secs, cr.url, secs, limits.warning, limits.critical
    );
    if verbose {
        out.push_str(&cr.to_string());
    }
    out
}

/// Line printed when the run deadline fires before any result arrives.
pub fn timeout_report(deadline: Duration, url: &str) -> String {
    format!(
        "{}: Timed out after {:.2} seconds getting {:?}\n",
        Severity::Unknown,
        deadline.as_secs_f64(),
        url
    )
}
