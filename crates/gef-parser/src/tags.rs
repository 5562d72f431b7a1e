//! Recognized GEF header tags.

use std::fmt;

/// Header keywords the extractor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GefTag {
    /// `#XYID`
    Position,
    /// `#ZID`
    Elevation,
    /// `#TESTID`
    TestId,
    /// `#STARTDATE`
    StartDate,
}

impl GefTag {
    /// All tags, in the order lines are tested against them.
    pub const ALL: [GefTag; 4] = [
        GefTag::Position,
        GefTag::Elevation,
        GefTag::TestId,
        GefTag::StartDate,
    ];

    pub fn marker(&self) -> &'static str {
        match self {
            GefTag::Position => "#XYID",
            GefTag::Elevation => "#ZID",
            GefTag::TestId => "#TESTID",
            GefTag::StartDate => "#STARTDATE",
        }
    }

    /// Find the tag a line carries. The marker may appear anywhere in the line.
    pub fn detect(line: &str) -> Option<GefTag> {
        Self::ALL.into_iter().find(|tag| line.contains(tag.marker()))
    }
}

impl fmt::Display for GefTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}
