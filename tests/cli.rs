use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;

const PASSING: &str = "<CheckResponse><minorVersion>1</minorVersion><application>\
    <longName>Order Service</longName><shortName>ord</shortName><success>true</success>\
    <check><name>db</name><success>true</success></check>\
    <check><name>cache</name><success>true</success></check>\
    </application></CheckResponse>";

const FAILING: &str = "<CheckResponse><application>\
    <longName>Order Service</longName><success>true</success>\
    <check><name>db</name><success>false</success><failureReason>pool exhausted</failureReason></check>\
    </application></CheckResponse>";

/// Answer a single request with a canned response and return the URL to hit.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (mut sock, _) = listener.accept().unwrap();
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = sock.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        write!(
            sock,
            "HTTP/1.1 {status_line}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
    });
    format!("http://{addr}/status")
}

fn refused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/status")
}

fn check() -> Command {
    Command::cargo_bin("check_xml_api").unwrap()
}

#[test]
fn test_help_exits_zero() {
    check()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--url"))
        .stdout(predicate::str::contains("--critical"));
}

#[test]
fn test_missing_url_is_unknown() {
    check()
        .assert()
        .code(3)
        .stdout(predicate::str::starts_with("UNKNOWN: No URL to check"));
}

#[test]
fn test_bad_flag_value_is_unknown() {
    check()
        .args(["--url", "http://localhost/", "--timeout", "soon"])
        .assert()
        .code(3)
        .stdout(predicate::str::starts_with("UNKNOWN: "));
}

#[test]
fn test_passing_endpoint_is_ok() {
    let url = serve_once("200 OK", PASSING);
    check()
        .args(["--url", &url])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("OK: All good; Response time: "))
        .stdout(predicate::str::contains(format!("; URL: \"{url}\"|time=")))
        .stdout(predicate::str::ends_with(";10.000000;15.000000\n"));
}

#[test]
fn test_verbose_prints_tree() {
    let url = serve_once("200 OK", PASSING);
    check()
        .args(["-U", &url, "--verbose"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("===== BEGIN: CheckResponse =====\n"))
        .stdout(predicate::str::contains("Application (#1/1) =>\n"))
        .stdout(predicate::str::contains("  Check (#2/2) =>\n    Name          : cache\n"))
        .stdout(predicate::str::contains("===== END: CheckResponse =======\n"));
}

#[test]
fn test_failed_payload_is_critical() {
    let url = serve_once("200 OK", FAILING);
    check()
        .args(["-U", &url])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with(
            "CRITICAL: Response tagged as failed, see long output; ",
        ));
}

#[test]
fn test_html_page_with_ok_status_is_critical() {
    let url = serve_once("200 OK", "<html><body>Maintenance</body></html>");
    check()
        .args(["-U", &url])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with(
            "CRITICAL: \"decoding payload: expected element type <CheckResponse> but have <html>\"; ",
        ));
}

#[test]
fn test_http_error_is_unknown() {
    let url = serve_once("500 Internal Server Error", "<html>oops</html>");
    check()
        .args(["-U", &url])
        .assert()
        .code(3)
        .stdout(predicate::str::starts_with("UNKNOWN: HTTP problem, code: 500; "));
}

#[test]
fn test_connection_refused_is_critical() {
    check()
        .args(["-U", &refused_url(), "-t", "5"])
        .assert()
        .code(2)
        .stdout(predicate::str::starts_with("CRITICAL: \""))
        .stdout(predicate::str::contains("|time="));
}

#[test]
fn test_zero_warning_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[check]\nwarning = 0.0\ncritical = 60.0").unwrap();

    let url = serve_once("200 OK", PASSING);
    check()
        .args(["-U", &url, "--config", file.path().to_str().unwrap()])
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with(
            "WARNING: Response time at or above warning limit; ",
        ))
        .stdout(predicate::str::ends_with(";0.000000;60.000000\n"));
}

#[test]
fn test_logs_stay_off_stdout() {
    let url = serve_once("200 OK", PASSING);
    check()
        .env_remove("RUST_LOG")
        .args(["-U", &url, "--debug"])
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("OK: "))
        .stdout(predicate::str::contains("Entrypoint params").not())
        .stderr(predicate::str::contains("Entrypoint params"));
}
