use crate::model::CheckResponse;
use crate::types::Severity;

/// Response-time limits in seconds. `warning < critical` is expected but not enforced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub warning: f64,
    pub critical: f64,
}

/// Final classification of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub severity: Severity,
    pub description: String,
}

impl Verdict {
    fn new(severity: Severity, description: impl Into<String>) -> Self {
        Self {
            severity,
            description: description.into(),
        }
    }
}

/// Classify a finished response. First matching rule wins:
/// transport/decode error, non-200 status, failed payload, critical time,
/// warning time, otherwise OK.
pub fn evaluate(cr: &CheckResponse, limits: &Thresholds) -> Verdict {
    if let Some(err) = &cr.err {
        return Verdict::new(Severity::Critical, format!("{:?}", err.to_string()));
    }
    if cr.http_code != 200 {
        return Verdict::new(
            Severity::Unknown,
            format!("HTTP problem, code: {}", cr.http_code),
        );
    }
    if !cr.ok() {
        return Verdict::new(Severity::Critical, "Response tagged as failed, see long output");
    }

    let secs = cr.response_time.as_secs_f64();
    if secs >= limits.critical {
        return Verdict::new(Severity::Critical, "Response time at or above critical limit");
    }
    if secs >= limits.warning {
        return Verdict::new(Severity::Warning, "Response time at or above warning limit");
    }
    Verdict::new(Severity::Ok, "All good")
}
