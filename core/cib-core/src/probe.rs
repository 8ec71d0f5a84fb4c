//! Health probe: is resource R running on node N?
//!
//! ```text
//! no node (and no local host name) -> 400
//! no resource                      -> 400
//! CIB could not be loaded          -> 500
//! node or resource not in the CIB  -> 404
//! status start | promote           -> 200
//! anything else (stop, ?)          -> 503
//! ```

use tracing::{debug, warn};

use crate::document::Document;
use crate::error::Result;
use crate::lrm;
use crate::model::CibModel;

pub const OK: u16 = 200;
pub const BAD_REQUEST: u16 = 400;
pub const NOT_FOUND: u16 = 404;
pub const INTERNAL_ERROR: u16 = 500;
pub const UNAVAILABLE: u16 = 503;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeRequest {
    pub node: Option<String>,
    pub resource: Option<String>,
}

impl ProbeRequest {
    pub fn new(node: Option<String>, resource: Option<String>) -> Self {
        Self {
            node: non_empty(node),
            resource: non_empty(resource),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub code: u16,
    pub message: String,
}

impl ProbeResponse {
    fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.code == OK
    }
}

/// Answers a probe request.
///
/// `local_hostname` stands in for a missing node. `load` is only called once
/// both identifiers are known.
pub fn probe<F>(request: &ProbeRequest, local_hostname: Option<String>, load: F) -> ProbeResponse
where
    F: FnOnce() -> Result<Document>,
{
    let Some(node) = request
        .node
        .clone()
        .or_else(|| non_empty(local_hostname))
    else {
        return ProbeResponse::new(BAD_REQUEST, "No hostname sent");
    };

    let Some(resource) = request.resource.as_deref() else {
        return ProbeResponse::new(BAD_REQUEST, "No resource sent");
    };

    let document = match load() {
        Ok(document) => document,
        Err(err) => {
            warn!(error = %err, "Could not get CIB");
            return ProbeResponse::new(INTERNAL_ERROR, "Could not get CIB");
        }
    };

    probe_model(&lrm::decode(&document), &node, resource)
}

/// Answers a probe against an already decoded model.
pub fn probe_model(model: &CibModel, node: &str, resource: &str) -> ProbeResponse {
    let found = match model.resource(node, resource) {
        Ok(found) => found,
        Err(err) if err.is_lookup_miss() => {
            return ProbeResponse::new(NOT_FOUND, err.to_string())
        }
        Err(err) => return ProbeResponse::new(INTERNAL_ERROR, err.to_string()),
    };

    let status = found.recompute_status();
    let code = if status.is_running() { OK } else { UNAVAILABLE };
    debug!(node, resource, %status, code, "Probe answered");

    ProbeResponse::new(
        code,
        format!(
            "Resource \"{}\" on node \"{}\" has status \"{}\"",
            resource, node, status
        ),
    )
}

/// Host name of the machine we run on.
pub fn local_hostname() -> Option<String> {
    non_empty(sysinfo::System::host_name())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
