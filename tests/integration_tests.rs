// Integration tests for metar-core using test fixtures
use metar_core::{error::FieldWarning, parse_file, report::FieldName, DecodedReport};
use std::path::PathBuf;

fn get_test_file_path(subdir: &str, filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join(subdir)
        .join(filename)
}

fn decode_fixture(subdir: &str, filename: &str) -> Vec<DecodedReport> {
    let path = get_test_file_path(subdir, filename);
    parse_file(&path)
        .unwrap_or_else(|e| panic!("Failed to read test file {:?}: {e}", path))
        .into_iter()
        .map(|result| result.expect("Should decode"))
        .collect()
}

// Fixtures whose leading groups all decode
mod ok_tests {
    use super::*;

    #[test]
    fn test_routine_reports() {
        let reports = decode_fixture("ok", "routine.metar");
        assert_eq!(reports.len(), 3);

        let icaos: Vec<&str> = reports
            .iter()
            .map(|r| r.report.icao.as_deref().unwrap())
            .collect();
        assert_eq!(icaos, vec!["CYTZ", "KJFK", "CYYZ"]);

        let kjfk = &reports[1].report;
        let wind = kjfk.wind.as_ref().unwrap();
        assert_eq!(wind.direction.as_str(), "310");
        assert_eq!(wind.gusting_speed.as_deref(), Some("25"));
        assert_eq!(
            reports[1].unparsed,
            vec!["10SM", "SCT250", "M02/M14", "A3012", "RMK", "AO2"]
        );

        // Calm wind
        let calm = reports[2].report.wind.as_ref().unwrap();
        assert_eq!(calm.speed, "00");
        assert!(reports[2].report.report_type.is_none());
    }

    #[test]
    fn test_special_reports() {
        let reports = decode_fixture("ok", "special.metar");
        assert_eq!(reports.len(), 2);
        for decoded in &reports {
            assert!(decoded.is_clean());
            let json = decoded.to_json();
            assert!(json.is_ok(), "Should serialize to JSON");
            assert!(json.unwrap().contains("\"reportType\": \"SPECI\""));
        }
    }

    #[test]
    fn test_display_reencodes_leading_groups() {
        let reports = decode_fixture("ok", "routine.metar");
        assert_eq!(
            reports[0].report.to_string(),
            "METAR CYTZ 051900Z AUTO 17011KT"
        );
        assert_eq!(reports[2].report.to_string(), "CYYZ 010000Z 00000KT");
    }
}

// Fixtures where a mandatory position is malformed
mod partial_tests {
    use super::*;

    #[test]
    fn test_bad_time_fixtures() {
        let reports = decode_fixture("partial", "bad_time.metar");
        assert_eq!(reports.len(), 2);
        for decoded in &reports {
            assert!(decoded.report.timestamp.is_none());
            assert!(decoded.report.wind.is_some());
            assert_eq!(decoded.warnings.len(), 1);
            assert_eq!(decoded.warnings[0].field(), FieldName::Timestamp);
        }
        assert_eq!(reports[0].report.modifier.map(|m| m.as_str()), Some("AUTO"));
    }

    #[test]
    fn test_bad_wind_fixtures() {
        let reports = decode_fixture("partial", "bad_wind.metar");
        for decoded in &reports {
            assert!(decoded.report.timestamp.is_some());
            assert!(decoded.report.wind.is_none());
            assert!(matches!(
                decoded.warnings.as_slice(),
                [FieldWarning::DiscardedToken {
                    field: FieldName::Wind,
                    ..
                }]
            ));
        }
        let json = reports[0].report_json().unwrap();
        assert!(!json.contains("wind"));
    }
}
