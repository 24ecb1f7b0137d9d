//! Property tests for status code labels and uptime display

use monitview_core::{EventFlags, MonitorState, Uptime};
use proptest::prelude::*;

proptest! {
    /// Property: each known bit contributes exactly its label
    #[test]
    fn describe_lists_each_set_bit(bits in 1u32..=EventFlags::all().bits()) {
        prop_assume!(EventFlags::from_bits(bits).is_some());
        let flags = EventFlags::from_bits_truncate(bits);
        let described = EventFlags::describe(&bits.to_string());
        prop_assert_eq!(described.split(", ").count(), flags.iter().count());
        for flag in flags.iter() {
            prop_assert!(described.contains(flag.label().unwrap()));
        }
    }

    /// Property: unknown bits leave the raw value untouched
    #[test]
    fn unknown_bits_are_passed_through(extra in 21u32..32, known in 0u32..0x8000) {
        let raw = (known | (1 << extra)).to_string();
        prop_assert_eq!(EventFlags::describe(&raw), raw);
    }

    /// Property: monitor codes map to a label and back
    #[test]
    fn monitor_state_codes(code in -5i64..10) {
        match MonitorState::from_code(code) {
            Some(state) => {
                prop_assert_eq!(state.code(), code);
                prop_assert_eq!(MonitorState::describe(&code.to_string()), state.label());
            }
            None => prop_assert_eq!(MonitorState::describe(&code.to_string()), code.to_string()),
        }
    }

    /// Property: uptime components recombine to the truncated minute
    #[test]
    fn uptime_components(secs in 0u64..10_000_000) {
        let uptime = Uptime(secs);
        prop_assert!(uptime.hours() < 24);
        prop_assert!(uptime.minutes() < 60);
        let minutes = uptime.days() * 1440 + uptime.hours() * 60 + uptime.minutes();
        prop_assert_eq!(minutes, secs / 60);
        prop_assert_eq!(
            uptime.to_string(),
            format!("{}d {}h {}m", uptime.days(), uptime.hours(), uptime.minutes())
        );
    }
}
