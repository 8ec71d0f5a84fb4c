//! CGI front end for the health probe.
//!
//! Reads `hostname` and `resource` from `QUERY_STRING` and answers with a
//! `Status:` header whose code is the probe result, so a load balancer can
//! poll e.g. `/cgi-bin/crm-ops?resource=vip`.

use cib_core::probe::{self, ProbeRequest, ProbeResponse};
use cib_core::CibSource;
use std::env;
use std::io::{self, Write};
use url::form_urlencoded;

/// Handles one CGI request and writes the response to stdout.
pub fn run(source: &CibSource) -> io::Result<()> {
    let query = env::var("QUERY_STRING").unwrap_or_default();
    let request = request_from_query(&query);
    tracing::debug!(?request, source = %source.describe(), "CGI probe");

    let response = probe::probe(&request, probe::local_hostname(), || source.load());

    let mut stdout = io::stdout().lock();
    stdout.write_all(render(&response).as_bytes())?;
    stdout.flush()
}

/// Builds a probe request from a form-encoded query; the first value of a
/// repeated parameter wins.
pub fn request_from_query(query: &str) -> ProbeRequest {
    let mut node = None;
    let mut resource = None;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "hostname" if node.is_none() => node = Some(value.into_owned()),
            "resource" if resource.is_none() => resource = Some(value.into_owned()),
            _ => {}
        }
    }

    ProbeRequest::new(node, resource)
}

/// CGI response text: status header, content type, one-line HTML body.
pub fn render(response: &ProbeResponse) -> String {
    format!(
        "Status: {} {}\r\nContent-type:text/html\r\n\r\n<html>{}</html>\r\n",
        response.code,
        header_safe(&response.message),
        escape_html(&response.message)
    )
}

fn header_safe(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
