//! Property tests for the structure builder

use monitview_core::{DocumentError, ParseOptions, StructureBuilder, service_key};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9]{0,11}".prop_filter("reserved", |s| s != "SERVICE" && s != "SYSTEM")
}

fn arb_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9._-]{1,16}"
}

fn arb_blank() -> impl Strategy<Value = String> {
    "[ \t\r\n]{0,8}"
}

proptest! {
    /// Property: k services are numbered 1..=k in document order
    #[test]
    fn services_numbered_in_order(names in prop::collection::vec(arb_value(), 0..12)) {
        let mut b = StructureBuilder::new(ParseOptions::default());
        b.open("MONIT", None);
        for name in &names {
            b.open("SERVICE", None);
            b.open("NAME", None);
            b.text(name);
            b.close("NAME").unwrap();
            b.close("SERVICE").unwrap();
        }
        b.close("MONIT").unwrap();
        let doc = b.finish().unwrap();

        prop_assert_eq!(doc.service_count as usize, names.len());
        for (i, name) in names.iter().enumerate() {
            let n = u32::try_from(i + 1).unwrap();
            prop_assert_eq!(doc.tree.get(&[service_key(n), "NAME".to_string()])
                .and_then(|node| node.as_value()), Some(name.as_str()));
        }
    }

    /// Property: whitespace-only text never replaces a value
    #[test]
    fn blank_text_never_overwrites(
        field in arb_name(),
        value in arb_value(),
        blanks in prop::collection::vec(arb_blank(), 1..5),
    ) {
        let mut b = StructureBuilder::new(ParseOptions::default());
        b.open("MONIT", None);
        b.open(&field, None);
        b.text(&value);
        for blank in &blanks {
            b.text(blank);
        }
        b.close(&field).unwrap();
        b.close("MONIT").unwrap();

        let doc = b.finish().unwrap();
        prop_assert_eq!(doc.tree.value(&[field.as_str()]), Some(value.as_str()));
    }

    /// Property: stored values are trimmed
    #[test]
    fn values_are_trimmed(
        field in arb_name(),
        lead in arb_blank(),
        value in arb_value(),
        trail in arb_blank(),
    ) {
        let mut b = StructureBuilder::new(ParseOptions::default());
        b.open("MONIT", None);
        b.open(&field, None);
        b.text(&format!("{lead}{value}{trail}"));
        b.close(&field).unwrap();
        b.close("MONIT").unwrap();

        let doc = b.finish().unwrap();
        prop_assert_eq!(doc.tree.value(&[field.as_str()]), Some(value.as_str()));
    }

    /// Property: TYPE=5 maps any element to SYSTEM without counting it
    #[test]
    fn type_five_maps_to_system(
        element in prop_oneof![Just("SERVICE".to_string()), arb_name()],
        padding in "[ ]{0,3}",
        value in arb_value(),
    ) {
        let mut b = StructureBuilder::new(ParseOptions::default());
        b.open("MONIT", None);
        let service_type = format!("{padding}5{padding}");
        b.open(&element, Some(service_type.as_str()));
        b.open("NAME", None);
        b.text(&value);
        b.close("NAME").unwrap();
        b.close(&element).unwrap();
        b.close("MONIT").unwrap();

        let doc = b.finish().unwrap();
        prop_assert_eq!(doc.service_count, 0);
        prop_assert_eq!(doc.tree.value(&["SYSTEM", "NAME"]), Some(value.as_str()));
    }

    /// Property: finish succeeds only when every open has been closed
    #[test]
    fn finish_requires_balanced_stack(depth in 1usize..8, closes in 0usize..8) {
        let mut b = StructureBuilder::new(ParseOptions::default());
        for _ in 0..depth {
            b.open("NODE", None);
        }
        let mut overflow = false;
        for _ in 0..closes {
            if let Err(err) = b.close("NODE") {
                prop_assert!(matches!(err, DocumentError::UnmatchedClose(_)));
                overflow = true;
            }
        }

        let result = b.finish();
        if closes == depth {
            prop_assert!(result.is_ok());
        } else if closes < depth {
            let is_unclosed = matches!(
                result,
                Err(DocumentError::UnclosedElements { depth: d, .. }) if d == depth - closes
            );
            prop_assert!(is_unclosed);
        } else {
            prop_assert!(overflow);
        }
    }
}
