use std::fmt;
use std::io::{self, Write};
use std::time::Duration;

use quick_xml::events::Event;
use serde::Deserialize;

use crate::error::CheckError;

/// Root element every payload must carry.
const ROOT_ELEMENT: &str = "CheckResponse";

/// Indent unit repeated once per nesting level in the pretty-printed tree.
const INDENT: &str = "  ";

// --- Wire payload ---

/// Leaf status record reported by the monitored endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Check {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "failureReason", default)]
    pub failure_reason: Option<String>,
}

/// A component report: its own status flag plus the checks it ran.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Application {
    #[serde(rename = "longName", default)]
    pub long_name: String,
    #[serde(rename = "shortName", default)]
    pub short_name: String,
    #[serde(rename = "componentVersion", default)]
    pub component_version: String,
    #[serde(default)]
    pub success: bool,
    #[serde(rename = "failureReason", default)]
    pub failure_reason: Option<String>,
    #[serde(rename = "check", default)]
    pub checks: Vec<Check>,
}

/// Root of a check run: the decoded payload plus what the fetcher observed.
///
/// The run-scoped fields (`url` through `err`) never come from the payload.
#[derive(Debug, Default, Deserialize)]
#[serde(rename = "CheckResponse")]
pub struct CheckResponse {
    #[serde(rename = "minorVersion", default)]
    pub minor_version: i64,
    #[serde(rename = "application", default)]
    pub applications: Vec<Application>,

    #[serde(skip)]
    pub url: String,
    #[serde(skip)]
    pub response_time: Duration,
    #[serde(skip)]
    pub http_code: u16,
    #[serde(skip)]
    pub body: Vec<u8>,
    #[serde(skip)]
    pub err: Option<CheckError>,
}

// --- Aggregation ---

impl Check {
    pub fn ok(&self) -> bool {
        self.success
    }
}

impl Application {
    /// The application's own flag and all of its checks must pass.
    pub fn ok(&self) -> bool {
        self.success && checks_ok(&self.checks)
    }
}

/// All checks pass. An empty list counts as a failure.
pub fn checks_ok(checks: &[Check]) -> bool {
    !checks.is_empty() && checks.iter().all(Check::ok)
}

/// All applications pass. An empty list counts as a failure.
pub fn applications_ok(applications: &[Application]) -> bool {
    !applications.is_empty() && applications.iter().all(Application::ok)
}

impl CheckResponse {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// Aggregate status of the payload; only the applications count.
    pub fn ok(&self) -> bool {
        applications_ok(&self.applications)
    }

    /// Decode `body` into the payload fields, keeping the run metadata as is.
    pub fn decode_body(&mut self) -> Result<(), CheckError> {
        match root_element(&self.body)? {
            Some(name) if name == ROOT_ELEMENT => {}
            Some(name) => return Err(CheckError::Root(format!("<{name}>"))),
            None => return Err(CheckError::Root("no element".to_string())),
        }

        let payload: CheckResponse = quick_xml::de::from_reader(self.body.as_slice())?;
        self.minor_version = payload.minor_version;
        self.applications = payload.applications;
        Ok(())
    }

    /// Write the indented tree dump used for verbose output.
    pub fn pretty_print(&self, w: &mut dyn Write) -> io::Result<()> {
        self.pp(w, 0)
    }

    fn pp(&self, w: &mut dyn Write, level: usize) -> io::Result<()> {
        let error = self.err.as_ref().map(|e| e.to_string()).unwrap_or_default();

        writeln!(w, "===== BEGIN: CheckResponse =====")?;
        write_fields(
            w,
            &[
                Field::text("URL", &self.url),
                Field::scalar("HTTP code", self.http_code),
                Field::scalar(
                    "Response time",
                    format!("{:.6}", self.response_time.as_secs_f64()),
                ),
                Field::text("Error", &error),
                Field::scalar("MinorVersion", self.minor_version),
            ],
            level,
        )?;
        write_children(w, "Application", &self.applications, level, Application::pp)?;
        writeln!(w, "===== END: CheckResponse =======")
    }
}

impl Application {
    fn pp(&self, w: &mut dyn Write, level: usize) -> io::Result<()> {
        write_fields(
            w,
            &[
                Field::text("LongName", &self.long_name),
                Field::text("ShortName", &self.short_name),
                Field::text("ComponentVersion", &self.component_version),
                Field::scalar("Success", self.success),
                Field::text("FailureReason", self.failure_reason.as_deref().unwrap_or("")),
            ],
            level,
        )?;
        write_children(w, "Check", &self.checks, level, Check::pp)
    }
}

impl Check {
    fn pp(&self, w: &mut dyn Write, level: usize) -> io::Result<()> {
        write_fields(
            w,
            &[
                Field::text("Name", &self.name),
                Field::scalar("Success", self.success),
                Field::text("FailureReason", self.failure_reason.as_deref().unwrap_or("")),
            ],
            level,
        )
    }
}

impl fmt::Display for CheckResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Vec::new();
        self.pretty_print(&mut buf).map_err(|_| fmt::Error)?;
        f.write_str(&String::from_utf8_lossy(&buf))
    }
}

/// Local name of the document's first element, if there is one.
fn root_element(body: &[u8]) -> Result<Option<String>, CheckError> {
    let mut reader = quick_xml::Reader::from_reader(body);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf).map_err(quick_xml::DeError::from)? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned()));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

// --- Layout ---

/// One printable scalar of a node.
struct Field {
    label: &'static str,
    value: String,
    /// Text fields drop out when empty; booleans and numbers always print.
    omit_empty: bool,
}

impl Field {
    fn text(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: value.to_string(),
            omit_empty: true,
        }
    }

    fn scalar(label: &'static str, value: impl fmt::Display) -> Self {
        Self {
            label,
            value: value.to_string(),
            omit_empty: false,
        }
    }
}

/// Print `key : value` rows, padding keys to the longest label of this node kind.
///
/// The width includes labels whose row is skipped, so a node kind always
/// lines up the same way regardless of which optional fields are present.
fn write_fields(w: &mut dyn Write, fields: &[Field], level: usize) -> io::Result<()> {
    let pad = INDENT.repeat(level);
    let width = fields.iter().map(|f| f.label.len()).max().unwrap_or(0);

    for field in fields {
        if field.omit_empty && field.value.is_empty() {
            continue;
        }
        writeln!(w, "{pad}{:<width$} : {}", field.label, field.value)?;
    }
    Ok(())
}

/// Print a `Label (#i/N) =>` header per element, each followed by the element one level deeper.
fn write_children<T>(
    w: &mut dyn Write,
    label: &str,
    items: &[T],
    level: usize,
    pp: fn(&T, &mut dyn Write, usize) -> io::Result<()>,
) -> io::Result<()> {
    let pad = INDENT.repeat(level);
    let total = items.len();

    for (i, item) in items.iter().enumerate() {
        writeln!(w, "{pad}{label} (#{}/{total}) =>", i + 1)?;
        pp(item, w, level + 1)?;
    }
    Ok(())
}
