//! Typed view of a status document for renderers
//!
//! Reads the fields the WAP status page shows out of the key layout produced
//! with starting level 1. Missing fields stay `None`; nothing here fails.

use std::fmt;

use serde::Serialize;

use crate::document::{StatusDocument, StatusTree};
use crate::status::{EventFlags, MonitorState};

/// Uptime in seconds, displayed as `{d}d {h}h {m}m`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Uptime(pub u64);

impl Uptime {
    /// Parses a decimal seconds value
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse().ok().map(Self)
    }

    /// Whole days
    #[must_use]
    pub const fn days(self) -> u64 {
        self.0 / 86_400
    }

    /// Hours within the day
    #[must_use]
    pub const fn hours(self) -> u64 {
        self.0 / 3_600 % 24
    }

    /// Minutes within the hour
    #[must_use]
    pub const fn minutes(self) -> u64 {
        self.0 / 60 % 60
    }
}

impl fmt::Display for Uptime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d {}h {}m", self.days(), self.hours(), self.minutes())
    }
}

/// Host-level figures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SystemSummary {
    /// Host name (`SYSTEM.NAME`)
    pub hostname: Option<String>,
    /// Daemon uptime (`SERVER.UPTIME`)
    pub uptime: Option<Uptime>,
    /// 15-minute load average (`SYSTEM.LOAD.AVG15`)
    pub load_avg15: Option<String>,
    /// Memory usage in percent (`SYSTEM.MEMORY.PERCENT`)
    pub memory_percent: Option<String>,
    /// User CPU in percent (`SYSTEM.CPU.USER`)
    pub cpu_user: Option<String>,
    /// System CPU in percent (`SYSTEM.CPU.SYSTEM`)
    pub cpu_system: Option<String>,
}

/// One monitored service
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSummary {
    /// Position in document order (1-based)
    pub number: u32,
    /// Service name
    pub name: Option<String>,
    /// Monitoring label ("Yes", "No", "Init", or the raw value)
    pub monitored: Option<String>,
    /// Status label ("OK", failure labels, or the raw value)
    pub status: Option<String>,
    /// Raw status bitmask, if numeric
    pub status_bits: Option<u32>,
    /// Service uptime, if reported
    pub uptime: Option<Uptime>,
}

impl ServiceSummary {
    fn from_tree(number: u32, tree: &StatusTree) -> Self {
        let raw_status = tree.value(&["STATUS"]);
        Self {
            number,
            name: tree.value(&["NAME"]).map(str::to_string),
            monitored: tree.value(&["MONITOR"]).map(MonitorState::describe),
            status: raw_status.map(EventFlags::describe),
            status_bits: raw_status.and_then(|s| s.trim().parse().ok()),
            uptime: tree.value(&["UPTIME"]).and_then(Uptime::parse),
        }
    }

    /// Returns true when the status is known and no failure bit is set
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status_bits == Some(0)
    }

    /// Returns true when the status is numeric and has a failure bit set.
    /// A missing or non-numeric status is neither ok nor failing.
    #[must_use]
    pub fn is_failing(&self) -> bool {
        self.status_bits.is_some_and(|bits| bits != 0)
    }
}

/// Everything a status page needs, extracted from a [`StatusDocument`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    /// Host-level figures
    pub system: SystemSummary,
    /// Services in document order; numbers without data are skipped
    pub services: Vec<ServiceSummary>,
}

impl StatusReport {
    /// Builds the report from a document parsed with starting level 1
    #[must_use]
    pub fn from_document(document: &StatusDocument) -> Self {
        let tree = &document.tree;
        let owned = |path: &[&str]| tree.value(path).map(str::to_string);

        let system = SystemSummary {
            hostname: owned(&["SYSTEM", "NAME"]),
            uptime: tree.value(&["SERVER", "UPTIME"]).and_then(Uptime::parse),
            load_avg15: owned(&["SYSTEM", "LOAD", "AVG15"]),
            memory_percent: owned(&["SYSTEM", "MEMORY", "PERCENT"]),
            cpu_user: owned(&["SYSTEM", "CPU", "USER"]),
            cpu_system: owned(&["SYSTEM", "CPU", "SYSTEM"]),
        };

        let services = document
            .services()
            .map(|(n, service)| ServiceSummary::from_tree(n, service))
            .collect();

        Self { system, services }
    }

    /// Number of services reporting at least one failure bit
    #[must_use]
    pub fn failing_count(&self) -> usize {
        self.services.iter().filter(|s| s.is_failing()).count()
    }
}
