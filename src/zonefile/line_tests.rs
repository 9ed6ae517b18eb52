// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Tests for zone line classification.

#[cfg(test)]
mod tests {
    use crate::zonefile::line::{is_record_field, RecordType, ZoneLine, ZoneRecord};

    #[test]
    fn test_classify_serial_line() {
        let line = "\t\t2024010101 ;Serial";

        match ZoneLine::classify(line) {
            ZoneLine::Serial(serial) => {
                assert_eq!(serial.value, 2_024_010_101);
                // Rendering the same value reproduces the line exactly
                assert_eq!(serial.render(serial.value), line);
                assert_eq!(serial.render(serial.next_value()), "\t\t2024010102 ;Serial");
            }
            other => panic!("Expected serial directive, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_serial_line_with_trailing_whitespace() {
        match ZoneLine::classify("  17;Serial   ") {
            ZoneLine::Serial(serial) => {
                assert_eq!(serial.value, 17);
                assert_eq!(serial.render(18), "  18;Serial   ");
            }
            other => panic!("Expected serial directive, got {other:?}"),
        }
    }

    #[test]
    fn test_serial_wraps_at_top_of_range() {
        match ZoneLine::classify("4294967295 ;Serial") {
            ZoneLine::Serial(serial) => assert_eq!(serial.next_value(), 0),
            other => panic!("Expected serial directive, got {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_serial_is_opaque() {
        let line = "; bump the ;Serial";
        assert_eq!(ZoneLine::classify(line), ZoneLine::Opaque(line.to_string()));
    }

    #[test]
    fn test_classify_a_record() {
        assert_eq!(
            ZoneLine::classify("frodo\t\tIN\tA\t192.168.11.26"),
            ZoneLine::Record(ZoneRecord::new("frodo", RecordType::A, "192.168.11.26"))
        );
    }

    #[test]
    fn test_classify_ptr_record_with_spaces() {
        assert_eq!(
            ZoneLine::classify("26   IN   PTR   frodo.home.arpa."),
            ZoneLine::Record(ZoneRecord::new("26", RecordType::Ptr, "frodo.home.arpa."))
        );
    }

    #[test]
    fn test_other_record_types_are_opaque() {
        for line in [
            "@\tIN\tNS\tns1.home.arpa.",
            "www\tIN\tCNAME\tfrodo",
            "frodo\tIN\tAAAA\tfd00::1",
        ] {
            assert_eq!(ZoneLine::classify(line), ZoneLine::Opaque(line.to_string()));
        }
    }

    #[test]
    fn test_wrong_token_count_is_opaque() {
        for line in [
            "frodo IN A",
            "frodo 300 IN A 192.168.11.26",
            "frodo IN A 192.168.11.26 ; laptop",
        ] {
            assert_eq!(ZoneLine::classify(line), ZoneLine::Opaque(line.to_string()));
        }
    }

    #[test]
    fn test_non_in_class_is_opaque() {
        let line = "frodo CH A 192.168.11.26";
        assert_eq!(ZoneLine::classify(line), ZoneLine::Opaque(line.to_string()));
    }

    #[test]
    fn test_blank_and_comment_lines_are_opaque() {
        assert_eq!(ZoneLine::classify(""), ZoneLine::Opaque(String::new()));
        assert_eq!(
            ZoneLine::classify("; managed by kea"),
            ZoneLine::Opaque("; managed by kea".to_string())
        );
    }

    #[test]
    fn test_record_render() {
        let record = ZoneRecord::new("11", RecordType::Ptr, "camera.home.arpa.");
        assert_eq!(record.render(), "11\t\tIN\tPTR\tcamera.home.arpa.");

        // A rendered record classifies back to itself
        assert_eq!(ZoneLine::classify(&record.render()), ZoneLine::Record(record));
    }

    #[test]
    fn test_record_type_display_and_parse() {
        assert_eq!(RecordType::A.to_string(), "A");
        assert_eq!(RecordType::Ptr.to_string(), "PTR");
        assert_eq!("PTR".parse::<RecordType>(), Ok(RecordType::Ptr));
        assert!("ptr".parse::<RecordType>().is_err());
    }

    #[test]
    fn test_record_fields() {
        assert!(is_record_field("frodo"));
        assert!(is_record_field("26"));
        assert!(is_record_field("frodo.home.arpa."));
        assert!(is_record_field("aa_bb_cc_dd_ee_ff"));

        assert!(!is_record_field(""));
        assert!(!is_record_field("my laptop"));
        assert!(!is_record_field("a;b"));
        assert!(!is_record_field("host(1)"));
        assert!(!is_record_field("$INCLUDE"));
        assert!(!is_record_field("tab\there"));
    }
}
