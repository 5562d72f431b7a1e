//! Common GEF fixtures for cpt-store tests.
//!
//! This module provides pre-defined file contents that represent common
//! scenarios in GEF metadata extraction.

/// Complete GEF header with all four extracted tags and a short data block.
pub const GEF_COMPLETE: &str = "\
#GEFID= 1, 1, 0
#COLUMN= 2
#COLUMNINFO= 1, m, penetration length, 1
#COLUMNINFO= 2, MPa, cone resistance, 2
#TESTID= CPT-01
#XYID= 31000, 123456.78, 654321.00, 0.01, 0.01
#ZID= 31000, -1.25, 0.01
#STARTDATE= 2021, 3, 7
#EOH=
0.0200;0.253;
0.0400;0.412;
";

/// Header without any of the extracted tags.
pub const GEF_NO_TAGS: &str = "\
#GEFID= 1, 1, 0
#COLUMN= 2
#EOH=
0.0200;0.253;
";

/// Position in an unsupported reference system (EPSG code instead of GEF code).
pub const GEF_UNSUPPORTED_POSITION: &str = "\
#TESTID= CPT-02
#XYID= 28992, 123456.78, 654321.00
#EOH=
";

/// Elevation in an unsupported reference system.
pub const GEF_UNSUPPORTED_ELEVATION: &str = "\
#TESTID= CPT-03
#XYID= 31000, 123456.78, 654321.00
#ZID= 31002, -1.25
#EOH=
";

/// Every tag twice; the second occurrence is the one that counts.
pub const GEF_DUPLICATE_TAGS: &str = "\
#TESTID= FIRST
#XYID= 31000, 100000.00, 400000.00
#ZID= 31000, 1.00
#STARTDATE= 2020, 1, 1
#TESTID= SECOND
#XYID= 31000, 155000.00, 463000.00
#ZID= 31000, 2.50
#STARTDATE= 2022, 12, 31
#EOH=
";

/// Malformed start date payload.
pub const GEF_BAD_DATE: &str = "\
#TESTID= CPT-04
#STARTDATE= 2021, march, 7
#EOH=
";

/// Raw content with characters that must survive storage verbatim.
pub const GEF_UNICODE: &str = "\
#GEFID= 1, 1, 0\r
#FILEOWNER= Grondmechanica Zuid-Oost \u{2013} \u{e9}\u{e8}\u{fc}\r
#TESTID= CPT-\u{3b1}\r
#XYID= 31000, 155000.00, 463000.00\r
#ZID= 31000, 0.10\r
#STARTDATE= 2019, 11, 30\r
#EOH=\r
0.0200;0.253;\t\r
";
