//! Status-code vocabulary of the monit report
//!
//! `STATUS` of a service is a bitmask of failed checks; `MONITOR` is a
//! tri-state flag. The labels are the ones the WAP status page shows.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Failure reasons carried in a service's `STATUS` field
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventFlags: u32 {
        /// Checksum test failed
        const CHECKSUM = 0x1;
        /// Resource limit matched
        const RESOURCE = 0x2;
        /// Timeout
        const TIMEOUT = 0x4;
        /// Timestamp test failed
        const TIMESTAMP = 0x8;
        /// Size test failed
        const SIZE = 0x10;
        /// Connection test failed
        const CONNECTION = 0x20;
        /// Permission test failed
        const PERMISSION = 0x40;
        /// UID test failed
        const UID = 0x80;
        /// GID test failed
        const GID = 0x100;
        /// Monitored object does not exist
        const NONEXIST = 0x200;
        /// Object has an invalid type
        const INVALID = 0x400;
        /// Data access error
        const DATA = 0x800;
        /// Program execution failed
        const EXEC = 0x1000;
        /// Monitored object changed
        const CHANGED = 0x2000;
        /// ICMP test failed
        const ICMP = 0x4000;
        /// Content match
        const CONTENT = 0x8000;
        /// Monit instance changed
        const INSTANCE = 0x10000;
        /// Action requested
        const ACTION = 0x20000;
        /// Process ID changed
        const PID = 0x40000;
        /// Parent process ID changed
        const PPID = 0x80000;
        /// Heartbeat missed
        const HEARTBEAT = 0x100000;
    }
}

/// Labels for the single-bit values, in bit order
const EVENT_LABELS: &[(EventFlags, &str)] = &[
    (EventFlags::CHECKSUM, "Checksum failed"),
    (EventFlags::RESOURCE, "Resource limit matched"),
    (EventFlags::TIMEOUT, "Timeout"),
    (EventFlags::TIMESTAMP, "Timestamp failed"),
    (EventFlags::SIZE, "Size failed"),
    (EventFlags::CONNECTION, "Connection failed"),
    (EventFlags::PERMISSION, "Permission failed"),
    (EventFlags::UID, "UID failed"),
    (EventFlags::GID, "GID failed"),
    (EventFlags::NONEXIST, "Does not exist"),
    (EventFlags::INVALID, "Invalid type"),
    (EventFlags::DATA, "Data access error"),
    (EventFlags::EXEC, "Execution failed"),
    (EventFlags::CHANGED, "Changed"),
    (EventFlags::ICMP, "ICMP failed"),
    (EventFlags::CONTENT, "Content match"),
    (EventFlags::INSTANCE, "Monit instance changed"),
    (EventFlags::ACTION, "Action requested"),
    (EventFlags::PID, "PID changed"),
    (EventFlags::PPID, "PPID changed"),
    (EventFlags::HEARTBEAT, "Heartbeat failed"),
];

impl EventFlags {
    /// Label for a single flag, `None` for combinations or the empty set
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        EVENT_LABELS
            .iter()
            .find(|(flag, _)| *flag == self)
            .map(|(_, label)| *label)
    }

    /// Labels of all set flags, in bit order
    #[must_use]
    pub fn labels(self) -> Vec<&'static str> {
        EVENT_LABELS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, label)| *label)
            .collect()
    }

    /// Describes a raw `STATUS` value.
    ///
    /// `0` is "OK"; known bits are listed by label; values that are not a
    /// number or carry unknown bits are returned unchanged.
    #[must_use]
    pub fn describe(raw: &str) -> String {
        let Ok(bits) = raw.trim().parse::<u32>() else {
            return raw.to_string();
        };
        if bits == 0 {
            return "OK".to_string();
        }
        match Self::from_bits(bits) {
            Some(flags) => flags.labels().join(", "),
            None => raw.to_string(),
        }
    }
}

/// Monitoring state carried in a service's `MONITOR` field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorState {
    /// Monitoring disabled
    NotMonitored,
    /// Monitoring active
    Monitored,
    /// Monitoring is initializing
    Initializing,
}

impl MonitorState {
    /// Maps the numeric code (0, 1, 2)
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::NotMonitored),
            1 => Some(Self::Monitored),
            2 => Some(Self::Initializing),
            _ => None,
        }
    }

    /// Numeric code used in the report
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::NotMonitored => 0,
            Self::Monitored => 1,
            Self::Initializing => 2,
        }
    }

    /// Short label ("No", "Yes", "Init")
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotMonitored => "No",
            Self::Monitored => "Yes",
            Self::Initializing => "Init",
        }
    }

    /// Describes a raw `MONITOR` value, returning it unchanged if unknown
    #[must_use]
    pub fn describe(raw: &str) -> String {
        raw.trim()
            .parse::<i64>()
            .ok()
            .and_then(Self::from_code)
            .map_or_else(|| raw.to_string(), |state| state.label().to_string())
    }
}

impl fmt::Display for MonitorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
