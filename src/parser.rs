use regex::Regex;
use std::sync::OnceLock;

/// Expected (but not enforced) line shape:
///   IP - - [DATE] "METHOD PATH HTTP/x.y" STATUS BYTES
///
/// Example:
///   192.168.1.1 - - [03/Dec/2024:10:12:34 +0000] "GET /home HTTP/1.1" 200 512
///
/// Octets are not range-checked, so `999.999.999.999` is a valid address token.
static ADDRESS_REGEX: OnceLock<Regex> = OnceLock::new();
static ENDPOINT_REGEX: OnceLock<Regex> = OnceLock::new();
static STATUS_REGEX: OnceLock<Regex> = OnceLock::new();

fn address_regex() -> &'static Regex {
    ADDRESS_REGEX.get_or_init(|| {
        Regex::new(r"\d{1,3}\.\d{1,3}\.\d{1,3}\.\d{1,3}")
            .expect("hard-coded regex should always compile")
    })
}

fn endpoint_regex() -> &'static Regex {
    ENDPOINT_REGEX.get_or_init(|| {
        Regex::new(r#""[A-Z]+\s(?P<endpoint>\S+)\sHTTP"#)
            .expect("hard-coded regex should always compile")
    })
}

fn status_regex() -> &'static Regex {
    STATUS_REGEX.get_or_init(|| {
        Regex::new(r#"" (?P<status>\d{3}) "#).expect("hard-coded regex should always compile")
    })
}

/// Return the first dotted-quad token in the line, verbatim.
pub fn extract_address(line: &str) -> Option<&str> {
    address_regex().find(line).map(|m| m.as_str())
}

/// Return the path of the first quoted HTTP request in the line.
pub fn extract_endpoint(line: &str) -> Option<&str> {
    endpoint_regex()
        .captures(line)
        .and_then(|caps| caps.name("endpoint"))
        .map(|m| m.as_str())
}

/// Return the three digits following the closing quote of the request.
pub fn extract_status(line: &str) -> Option<&str> {
    status_regex()
        .captures(line)
        .and_then(|caps| caps.name("status"))
        .map(|m| m.as_str())
}

// ─── Unit Tests ──────────────────────────────────────────────────────────────
