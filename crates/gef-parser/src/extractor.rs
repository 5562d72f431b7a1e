//! Line scanner that turns GEF header tags into a `MetadataRecord`.

use std::path::Path;

use cpt_common::MetadataRecord;
use projection::TransformRegistry;
use tracing::debug;

use crate::error::{ParseError, ParseResult, TagError};
use crate::tags::GefTag;

/// Extracts CPT metadata, reprojecting positions through a transform registry.
///
/// Lines are scanned top to bottom; when a tag occurs more than once the
/// last occurrence wins.
#[derive(Debug, Clone, Copy)]
pub struct MetadataExtractor<'a> {
    registry: &'a TransformRegistry,
}

impl<'a> MetadataExtractor<'a> {
    pub fn new(registry: &'a TransformRegistry) -> Self {
        Self { registry }
    }

    /// Extract metadata from file content.
    ///
    /// `origin` identifies the content in errors. Missing tags leave their
    /// fields at the zero/empty default; a malformed tag or an unsupported
    /// reference system fails the whole extraction.
    pub fn extract(&self, content: &str, origin: &str) -> ParseResult<MetadataRecord> {
        let mut record = MetadataRecord::default();

        for (index, line) in content.lines().enumerate() {
            let Some(tag) = GefTag::detect(line) else {
                continue;
            };

            self.apply(tag, line, &mut record)
                .map_err(|cause| ParseError::Tag {
                    origin: origin.to_string(),
                    line: index + 1,
                    tag,
                    cause,
                })?;
        }

        debug!(
            origin = %origin,
            name = %record.name,
            x = record.x,
            y = record.y,
            date = %record.date,
            "Extracted CPT metadata"
        );

        Ok(record)
    }

    /// Read a whole file and extract its metadata.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> ParseResult<MetadataRecord> {
        let path = path.as_ref();
        let origin = path.display().to_string();

        let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: origin.clone(),
            source,
        })?;

        self.extract(&content, &origin)
    }

    fn apply(&self, tag: GefTag, line: &str, record: &mut MetadataRecord) -> Result<(), TagError> {
        let payload = payload(line)?;

        match tag {
            GefTag::Position => {
                let values = elements(payload);
                let code = parse_int(&values, 0, "reference system")?;
                let x = parse_float(&values, 1, "x")?;
                let y = parse_float(&values, 2, "y")?;

                let transform = self
                    .registry
                    .get(code)
                    .ok_or(TagError::UnsupportedSrid(code))?;
                let (lon, lat) = transform.to_geographic(x, y);

                record.x = x;
                record.y = y;
                record.lon = lon;
                record.lat = lat;
            }
            GefTag::Elevation => {
                let values = elements(payload);
                let code = parse_int(&values, 0, "reference system")?;
                let z = parse_float(&values, 1, "z")?;

                if !self.registry.is_supported(code) {
                    return Err(TagError::UnsupportedSrid(code));
                }
                record.z = z;
            }
            GefTag::TestId => {
                record.name = payload.trim().to_string();
            }
            GefTag::StartDate => {
                let values = elements(payload);
                if values.len() != 3 {
                    return Err(TagError::WrongElementCount {
                        expected: 3,
                        found: values.len(),
                    });
                }
                let year = parse_int(&values, 0, "year")?;
                let month = parse_int(&values, 1, "month")?;
                let day = parse_int(&values, 2, "day")?;

                check_range("year", year, 0, 9999)?;
                check_range("month", month, 1, 12)?;
                check_range("day", day, 1, 31)?;

                record.date = format!("{:04}{:02}{:02}", year, month, day);
            }
        }

        Ok(())
    }
}

/// Everything after the first `=`.
fn payload(line: &str) -> Result<&str, TagError> {
    line.split_once('=')
        .map(|(_, rest)| rest)
        .ok_or(TagError::MissingPayload)
}

fn elements(payload: &str) -> Vec<&str> {
    payload.split(',').map(str::trim).collect()
}

fn element<'v>(values: &[&'v str], index: usize, name: &'static str) -> Result<&'v str, TagError> {
    values
        .get(index)
        .copied()
        .ok_or(TagError::MissingElement { index, name })
}

fn parse_int(values: &[&str], index: usize, name: &'static str) -> Result<i64, TagError> {
    let value = element(values, index, name)?;
    value.parse::<i64>().map_err(|source| TagError::InvalidInteger {
        name,
        value: value.to_string(),
        source,
    })
}

fn parse_float(values: &[&str], index: usize, name: &'static str) -> Result<f64, TagError> {
    let value = element(values, index, name)?;
    let parsed = value.parse::<f64>().map_err(|source| TagError::InvalidFloat {
        name,
        value: value.to_string(),
        source,
    })?;

    // `f64::from_str` accepts "NaN" and "inf"
    if !parsed.is_finite() {
        return Err(TagError::NonFinite {
            name,
            value: value.to_string(),
        });
    }
    Ok(parsed)
}

fn check_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<(), TagError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(TagError::DateOutOfRange { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use projection::default_registry;

    fn extract(content: &str) -> ParseResult<MetadataRecord> {
        MetadataExtractor::new(default_registry()).extract(content, "test.gef")
    }

    #[test]
    fn test_start_date_zero_padded() {
        let record = extract("#STARTDATE= 2021, 3, 7\n").unwrap();
        assert_eq!(record.date, "20210307");
    }

    #[test]
    fn test_start_date_without_spaces() {
        let record = extract("#STARTDATE=2021,3,7").unwrap();
        assert_eq!(record.date, "20210307");
    }

    #[test]
    fn test_start_date_wrong_count() {
        let err = extract("#STARTDATE= 2021, 3\n").unwrap_err();
        match err {
            ParseError::Tag { cause, line, tag, .. } => {
                assert_eq!(line, 1);
                assert_eq!(tag, GefTag::StartDate);
                assert_eq!(cause, TagError::WrongElementCount { expected: 3, found: 2 });
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_start_date_out_of_range() {
        let err = extract("#STARTDATE= 2021, 13, 7\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Tag {
                cause: TagError::DateOutOfRange { name: "month", value: 13 },
                ..
            }
        ));
    }

    #[test]
    fn test_test_id_trimmed() {
        let record = extract("#TESTID=   CPT 01 \r\n").unwrap();
        assert_eq!(record.name, "CPT 01");
    }

    #[test]
    fn test_test_id_keeps_later_equals() {
        let record = extract("#TESTID= a=b\n").unwrap();
        assert_eq!(record.name, "a=b");
    }

    #[test]
    fn test_position_extra_elements_ignored() {
        let record = extract("#XYID= 31000, 123456.78, 654321.00, 0.01, 0.01\n").unwrap();
        assert_eq!(record.x, 123456.78);
        assert_eq!(record.y, 654321.0);
        assert!(record.lat > 53.0 && record.lat < 54.0);
        assert!(record.lon > 4.0 && record.lon < 5.0);
    }

    #[test]
    fn test_position_missing_y() {
        let err = extract("#XYID= 31000, 123456.78\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Tag {
                cause: TagError::MissingElement { index: 2, name: "y" },
                ..
            }
        ));
    }

    #[test]
    fn test_position_bad_number() {
        let err = extract("#XYID= 31000, 12x, 654321.00\n").unwrap_err();
        match err {
            ParseError::Tag {
                cause: TagError::InvalidFloat { name, value, .. },
                ..
            } => {
                assert_eq!(name, "x");
                assert_eq!(value, "12x");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_position_not_a_number() {
        for payload in ["NaN, 463000.00", "nan, 463000.00", "155000.00, inf", "155000.00, -infinity"] {
            let err = extract(&format!("#XYID= 31000, {}\n", payload)).unwrap_err();
            assert!(
                matches!(
                    err,
                    ParseError::Tag {
                        cause: TagError::NonFinite { .. },
                        tag: GefTag::Position,
                        ..
                    }
                ),
                "{payload}: {err:?}"
            );
        }
    }

    #[test]
    fn test_elevation_not_a_number() {
        let err = extract("#ZID= 31000, NaN\n").unwrap_err();
        match err {
            ParseError::Tag { cause, .. } => {
                assert_eq!(
                    cause,
                    TagError::NonFinite {
                        name: "z",
                        value: "NaN".to_string()
                    }
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_equals() {
        let err = extract("#ZID 31000 1.0\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::Tag {
                cause: TagError::MissingPayload,
                tag: GefTag::Elevation,
                ..
            }
        ));
    }

    #[test]
    fn test_elevation_unsupported_srid() {
        let err = extract("#ZID= 31001, 1.25\n").unwrap_err();
        assert!(err.is_unsupported_srid());
        assert_eq!(err.tag(), Some(GefTag::Elevation));
    }

    #[test]
    fn test_empty_registry_rejects_position() {
        let registry = TransformRegistry::empty();
        let err = MetadataExtractor::new(&registry)
            .extract("#XYID= 31000, 1.0, 2.0\n", "x.gef")
            .unwrap_err();
        assert!(err.is_unsupported_srid());
        assert_eq!(err.origin(), "x.gef");
    }

    #[test]
    fn test_error_message_names_file_and_tag() {
        let err = extract("#TESTID= a\n#XYID= 4326, 5.1, 52.1\n").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("test.gef"), "{message}");
        assert!(message.contains("line 2"), "{message}");
        assert!(message.contains("#XYID"), "{message}");
        assert!(message.contains("4326"), "{message}");
    }
}
