use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Letter grade, in the order offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Grade {
    #[default]
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    #[serde(rename = "D+")]
    DPlus,
    D,
    F,
    /// Withdrawal. Carries no points and is left out of the GPA.
    W,
}

impl Grade {
    pub const ALL: [Grade; 9] = [
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::CPlus,
        Grade::C,
        Grade::DPlus,
        Grade::D,
        Grade::F,
        Grade::W,
    ];

    /// Point value on the 4.0 scale, or `None` for a withdrawal.
    pub fn points(&self) -> Option<f64> {
        match self {
            Grade::A => Some(4.0),
            Grade::BPlus => Some(3.5),
            Grade::B => Some(3.0),
            Grade::CPlus => Some(2.5),
            Grade::C => Some(2.0),
            Grade::DPlus => Some(1.5),
            Grade::D => Some(1.0),
            Grade::F => Some(0.0),
            Grade::W => None,
        }
    }

    pub fn letter(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::DPlus => "D+",
            Grade::D => "D",
            Grade::F => "F",
            Grade::W => "W",
        }
    }

    pub fn is_failing(&self) -> bool {
        matches!(self, Grade::F)
    }

    /// Get the next grade in display order (wrapping around)
    pub fn next(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Get the previous grade in display order (wrapping around)
    pub fn prev(&self) -> Self {
        let idx = self.index();
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|g| g == self).unwrap_or(0)
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown grade: {0}")]
pub struct ParseGradeError(pub String);

impl FromStr for Grade {
    type Err = ParseGradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|g| g.letter() == wanted)
            .ok_or_else(|| ParseGradeError(s.to_string()))
    }
}

/// A subject and the grade recorded for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Subject {
    pub name: String,
    pub grade: Grade,
}

impl Subject {
    pub fn new(name: impl Into<String>, grade: Grade) -> Self {
        Self {
            name: name.into(),
            grade,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_points_table() {
        assert_eq!(Grade::A.points(), Some(4.0));
        assert_eq!(Grade::BPlus.points(), Some(3.5));
        assert_eq!(Grade::B.points(), Some(3.0));
        assert_eq!(Grade::CPlus.points(), Some(2.5));
        assert_eq!(Grade::C.points(), Some(2.0));
        assert_eq!(Grade::DPlus.points(), Some(1.5));
        assert_eq!(Grade::D.points(), Some(1.0));
        assert_eq!(Grade::F.points(), Some(0.0));
        assert_eq!(Grade::W.points(), None);
    }

    #[test]
    fn test_grade_from_str() {
        assert_eq!("A".parse::<Grade>(), Ok(Grade::A));
        assert_eq!("b+".parse::<Grade>(), Ok(Grade::BPlus));
        assert_eq!(" C+ ".parse::<Grade>(), Ok(Grade::CPlus));
        assert_eq!("w".parse::<Grade>(), Ok(Grade::W));
        assert!("E".parse::<Grade>().is_err());
        assert!("".parse::<Grade>().is_err());
    }

    #[test]
    fn test_grade_serializes_as_letter() {
        assert_eq!(serde_json::to_string(&Grade::DPlus).unwrap(), "\"D+\"");
        let parsed: Grade = serde_json::from_str("\"B+\"").unwrap();
        assert_eq!(parsed, Grade::BPlus);
    }

    #[test]
    fn test_grade_next_prev() {
        assert_eq!(Grade::A.next(), Grade::BPlus);
        assert_eq!(Grade::W.next(), Grade::A); // Wraps around
        assert_eq!(Grade::A.prev(), Grade::W); // Wraps around
        assert_eq!(Grade::B.prev(), Grade::BPlus);
    }

    #[test]
    fn test_default_grade_is_a() {
        assert_eq!(Grade::default(), Grade::A);
    }
}
