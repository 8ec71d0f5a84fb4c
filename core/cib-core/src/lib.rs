//! # cib-core
//!
//! Core library for crm-ops: reads a Pacemaker CIB (Cluster Information Base)
//! and derives, per node and resource, the current state of the resource from
//! its recorded operation history.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime. Decoding is one pass over a document
//!   that is already in memory.
//! - **Decode once, read many**: A [`CibModel`] is built per document and never
//!   mutated afterwards; concurrent probes each decode their own snapshot.
//! - **Tolerant decoding**: Elements without an `id` are skipped, missing
//!   attributes never fail a decode.
//! - **Explicit failures**: Acquisition, parse and lookup failures are
//!   [`CibError`] variants, never panics.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cib_core::{lrm, CibSource};
//!
//! let document = CibSource::cibadmin().load()?;
//! let model = lrm::decode_strict(&document)?;
//! let status = model.resource("node1", "vip")?.status;
//! ```

pub mod config;
pub mod document;
pub mod error;
pub mod lrm;
pub mod model;
pub mod probe;
pub mod rc_code;
pub mod source;
pub mod status;

// Re-export commonly used items at crate root
pub use config::{load_config, Config};
pub use document::{Document, Element};
pub use error::{CibError, Result};
pub use lrm::{decode, decode_strict};
pub use model::{CibModel, Node, Operation, Resource};
pub use probe::{probe, ProbeRequest, ProbeResponse};
pub use rc_code::{RcCode, Severity};
pub use source::CibSource;
pub use status::{classify, ResourceStatus};
