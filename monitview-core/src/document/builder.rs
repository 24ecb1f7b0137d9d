//! Streaming structure builder
//!
//! Folds open/text/close events into a [`StatusTree`] in one forward pass.
//! The builder owns the element path, the service counter, and the tree; it
//! does not know about the tokenizer driving it.

use std::borrow::Cow;

use crate::error::{DocumentError, DocumentResult};

use super::tree::{StatusDocument, StatusTree, service_key};

/// Element name whose occurrences are numbered
pub const SERVICE_ELEMENT: &str = "SERVICE";

/// Name substituted for elements declaring the system service type
pub const SYSTEM_ELEMENT: &str = "SYSTEM";

/// Attribute carrying the monit service type
pub const TYPE_ATTRIBUTE: &str = "TYPE";

/// Service type monit uses for the host system pseudo-service
pub const SYSTEM_SERVICE_TYPE: u8 = 5;

/// Options controlling key construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Number of outermost path segments omitted from keys.
    /// `1` drops the root element common to every field.
    pub starting_level: usize,
    /// Upper-case element and attribute names (ASCII) before use
    pub case_folding: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            starting_level: 1,
            case_folding: true,
        }
    }
}

impl ParseOptions {
    /// Default options: skip the root element, fold names to upper case
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the starting level
    #[must_use]
    pub const fn with_starting_level(mut self, level: usize) -> Self {
        self.starting_level = level;
        self
    }

    /// Enables or disables case folding
    #[must_use]
    pub const fn with_case_folding(mut self, enabled: bool) -> Self {
        self.case_folding = enabled;
        self
    }
}

/// One entry of the element path
#[derive(Debug, Clone)]
struct Frame {
    name: String,
    /// Counter value when this `SERVICE` element was opened
    service_no: Option<u32>,
}

impl Frame {
    fn key(&self) -> Cow<'_, str> {
        match self.service_no {
            Some(n) => Cow::Owned(service_key(n)),
            None => Cow::Borrowed(&self.name),
        }
    }
}

/// Stateful builder turning parse events into a [`StatusDocument`]
#[derive(Debug)]
pub struct StructureBuilder {
    options: ParseOptions,
    stack: Vec<Frame>,
    service_count: u32,
    tree: StatusTree,
}

impl StructureBuilder {
    /// Creates a builder with an empty path, counter, and tree
    #[must_use]
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            stack: Vec::new(),
            service_count: 0,
            tree: StatusTree::new(),
        }
    }

    /// Current element depth
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Number of `SERVICE` elements opened so far
    #[must_use]
    pub const fn service_count(&self) -> u32 {
        self.service_count
    }

    /// Options this builder was created with
    #[must_use]
    pub const fn options(&self) -> ParseOptions {
        self.options
    }

    /// Applies case folding to an element or attribute name
    #[must_use]
    pub fn fold_name<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.options.case_folding && name.bytes().any(|b| b.is_ascii_lowercase()) {
            Cow::Owned(name.to_ascii_uppercase())
        } else {
            Cow::Borrowed(name)
        }
    }

    /// Returns true if `key` names the service type attribute
    #[must_use]
    pub fn is_type_attribute(&self, key: &str) -> bool {
        self.fold_name(key) == TYPE_ATTRIBUTE
    }

    /// Handles an element-open event.
    ///
    /// `service_type` is the raw value of the element's `TYPE` attribute.
    pub fn open(&mut self, name: &str, service_type: Option<&str>) {
        let is_system = service_type.is_some_and(is_system_type);

        let name = if is_system {
            SYSTEM_ELEMENT.to_string()
        } else {
            self.fold_name(name).into_owned()
        };

        let service_no = if name == SERVICE_ELEMENT {
            self.service_count += 1;
            Some(self.service_count)
        } else {
            None
        };

        self.stack.push(Frame { name, service_no });
    }

    /// Handles a character-data event.
    ///
    /// Whitespace-only data is ignored. Otherwise the trimmed text is
    /// assigned at the current key path, replacing any earlier value there.
    pub fn text(&mut self, data: &str) {
        let trimmed = data.trim();
        if trimmed.is_empty() {
            return;
        }

        let path = key_path(&self.stack, self.options.starting_level);
        if path.is_empty() {
            tracing::debug!(
                depth = self.stack.len(),
                starting_level = self.options.starting_level,
                "Dropping text above the starting level"
            );
            return;
        }
        self.tree.insert(&path, trimmed);
    }

    /// Handles an element-close event.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnmatchedClose`] if no element is open.
    pub fn close(&mut self, name: &str) -> DocumentResult<()> {
        self.stack
            .pop()
            .map(|_| ())
            .ok_or_else(|| DocumentError::UnmatchedClose(name.to_string()))
    }

    /// Completes the document.
    ///
    /// # Errors
    ///
    /// Returns [`DocumentError::UnclosedElements`] if elements are still open.
    pub fn finish(self) -> DocumentResult<StatusDocument> {
        if let Some(innermost) = self.stack.last() {
            return Err(DocumentError::UnclosedElements {
                depth: self.stack.len(),
                innermost: innermost.name.clone(),
            });
        }
        Ok(StatusDocument {
            tree: self.tree,
            service_count: self.service_count,
        })
    }
}

/// Numeric comparison with the system type, so `"5"`, `" 5 "` and `"5.0"`
/// all match while non-numeric values never do
fn is_system_type(raw: &str) -> bool {
    raw.trim()
        .parse::<f64>()
        .is_ok_and(|t| (t - f64::from(SYSTEM_SERVICE_TYPE)).abs() < f64::EPSILON)
}

/// Key segments for the current path, starting level applied
fn key_path(stack: &[Frame], starting_level: usize) -> Vec<Cow<'_, str>> {
    stack.iter().skip(starting_level).map(Frame::key).collect()
}
