//! Status document model and streaming builder
//!
//! The XML body of a monit status report is folded into a [`StatusTree`]:
//! a nested mapping that mirrors the element hierarchy. Repeated `SERVICE`
//! elements get numbered keys (`SERVICE-1`, `SERVICE-2`, …) so they can live
//! side by side, and the system pseudo-service (`type="5"`) lands under
//! `SYSTEM`.
//!
//! # Example
//!
//! ```rust
//! use monitview_core::document::{ParseOptions, parse_status};
//!
//! let body = b"<MONIT><SERVICE><NAME>sshd</NAME></SERVICE></MONIT>";
//! let doc = parse_status(body, ParseOptions::default()).unwrap();
//! assert_eq!(doc.tree.lookup("SERVICE-1.NAME"), Some("sshd"));
//! assert_eq!(doc.service_count, 1);
//! ```

mod builder;
mod parser;
mod tree;

pub use builder::{
    ParseOptions, SERVICE_ELEMENT, SYSTEM_ELEMENT, SYSTEM_SERVICE_TYPE, StructureBuilder,
    TYPE_ATTRIBUTE,
};
pub use parser::parse_status;
pub use tree::{StatusDocument, StatusNode, StatusTree, service_key};
