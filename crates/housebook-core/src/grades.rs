//! Subject list and grade-point average.
//!
//! The GPA is only computed when `GradeTracker::calculate` is called. Any
//! change to the subject list drops the previous result, so the front end
//! shows placeholders until the user asks for a fresh calculation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Grade, Subject};

/// GPA at or above this is shown as good standing.
const GOOD_STANDING_GPA: f64 = 3.2;

/// GPA at or above this (and below good) is shown as fair.
const FAIR_STANDING_GPA: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct GpaResult {
    /// Subjects that carry points (everything except `W`)
    pub counted_subjects: usize,
    pub total_points: f64,
    /// `total_points / counted_subjects`, or 0 when nothing is counted
    pub gpa: f64,
}

impl GpaResult {
    /// GPA with two decimals, or "-" when no subject is counted
    pub fn gpa_display(&self) -> String {
        if self.counted_subjects == 0 {
            "-".to_string()
        } else {
            format!("{:.2}", self.gpa)
        }
    }

    pub fn total_points_display(&self) -> String {
        format!("{:.2}", self.total_points)
    }

    pub fn standing(&self) -> GpaStanding {
        if self.counted_subjects == 0 {
            GpaStanding::None
        } else if self.gpa >= GOOD_STANDING_GPA {
            GpaStanding::Good
        } else if self.gpa >= FAIR_STANDING_GPA {
            GpaStanding::Fair
        } else {
            GpaStanding::Poor
        }
    }
}

/// Coarse classification of a GPA for display colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpaStanding {
    None,
    Good,
    Fair,
    Poor,
}

/// Compute count, point total and average over `subjects`, skipping withdrawals.
pub fn compute_gpa(subjects: &[Subject]) -> GpaResult {
    let (counted_subjects, total_points) = subjects
        .iter()
        .filter_map(|s| s.grade.points())
        .fold((0usize, 0.0f64), |(count, sum), points| (count + 1, sum + points));

    let gpa = if counted_subjects > 0 {
        total_points / counted_subjects as f64
    } else {
        0.0
    };

    GpaResult {
        counted_subjects,
        total_points,
        gpa,
    }
}

/// Transient subject input: the name being typed and the selected grade.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubjectDraft {
    pub name: String,
    pub grade: Grade,
}

impl SubjectDraft {
    /// Add the draft to `tracker`. Resets the draft only when it was accepted.
    pub fn submit(&mut self, tracker: &mut GradeTracker) -> bool {
        let added = tracker.add_subject(&self.name, self.grade);
        if added {
            *self = Self::default();
        }
        added
    }
}

/// Ordered list of subjects plus the last explicitly calculated GPA.
#[derive(Debug, Clone, Default)]
pub struct GradeTracker {
    subjects: Vec<Subject>,
    result: Option<GpaResult>,
}

impl GradeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Append a subject. Returns false (and changes nothing) for a blank name.
    pub fn add_subject(&mut self, name: &str, grade: Grade) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        debug!(subject = name, %grade, "Adding subject");
        self.subjects.push(Subject::new(name, grade));
        self.result = None;
        true
    }

    /// Remove the subject at `index`. Out-of-range indices are ignored.
    pub fn delete_subject(&mut self, index: usize) -> Option<Subject> {
        if index >= self.subjects.len() {
            return None;
        }
        let removed = self.subjects.remove(index);
        debug!(subject = %removed.name, index, "Deleted subject");
        self.result = None;
        Some(removed)
    }

    /// Compute the GPA from the current subjects and keep it as the result.
    pub fn calculate(&mut self) -> GpaResult {
        let result = compute_gpa(&self.subjects);
        debug!(
            counted = result.counted_subjects,
            total = result.total_points,
            gpa = result.gpa,
            "Calculated GPA"
        );
        self.result = Some(result);
        result
    }

    /// Last calculated result, `None` until `calculate` runs after a change
    pub fn result(&self) -> Option<&GpaResult> {
        self.result.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects(grades: &[Grade]) -> Vec<Subject> {
        grades
            .iter()
            .enumerate()
            .map(|(i, g)| Subject::new(format!("Subject {}", i), *g))
            .collect()
    }

    #[test]
    fn test_compute_gpa_empty() {
        let result = compute_gpa(&[]);
        assert_eq!(result.counted_subjects, 0);
        assert_eq!(result.total_points, 0.0);
        assert_eq!(result.gpa, 0.0);
        assert_eq!(result.gpa_display(), "-");
    }

    #[test]
    fn test_compute_gpa_excludes_withdrawal() {
        let result = compute_gpa(&subjects(&[Grade::A, Grade::W]));
        assert_eq!(result.counted_subjects, 1);
        assert_eq!(result.total_points, 4.0);
        assert_eq!(result.gpa, 4.0);
    }

    #[test]
    fn test_compute_gpa_mixed() {
        let result = compute_gpa(&subjects(&[Grade::BPlus, Grade::C]));
        assert_eq!(result.counted_subjects, 2);
        assert_eq!(result.total_points, 5.5);
        assert_eq!(result.gpa, 2.75);
        assert_eq!(result.gpa_display(), "2.75");
        assert_eq!(result.total_points_display(), "5.50");
    }

    #[test]
    fn test_compute_gpa_only_withdrawals() {
        let result = compute_gpa(&subjects(&[Grade::W, Grade::W]));
        assert_eq!(result.counted_subjects, 0);
        assert_eq!(result.gpa, 0.0);
        assert_eq!(result.standing(), GpaStanding::None);
    }

    #[test]
    fn test_standing_thresholds() {
        assert_eq!(compute_gpa(&subjects(&[Grade::A, Grade::B])).standing(), GpaStanding::Good);
        assert_eq!(compute_gpa(&subjects(&[Grade::BPlus, Grade::C])).standing(), GpaStanding::Fair);
        assert_eq!(compute_gpa(&subjects(&[Grade::C])).standing(), GpaStanding::Fair);
        assert_eq!(compute_gpa(&subjects(&[Grade::D, Grade::F])).standing(), GpaStanding::Poor);
    }

    #[test]
    fn test_add_subject_rejects_blank_name() {
        let mut tracker = GradeTracker::new();
        assert!(!tracker.add_subject("", Grade::A));
        assert!(!tracker.add_subject("   ", Grade::B));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_add_subject_trims_name() {
        let mut tracker = GradeTracker::new();
        assert!(tracker.add_subject("  Physics ", Grade::B));
        assert_eq!(tracker.subjects()[0], Subject::new("Physics", Grade::B));
    }

    #[test]
    fn test_delete_subject_out_of_range_is_noop() {
        let mut tracker = GradeTracker::new();
        tracker.add_subject("Math", Grade::A);
        assert_eq!(tracker.delete_subject(5), None);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.delete_subject(0).map(|s| s.name), Some("Math".to_string()));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_result_requires_explicit_calculate() {
        let mut tracker = GradeTracker::new();
        tracker.add_subject("Math", Grade::A);
        assert!(tracker.result().is_none());

        tracker.calculate();
        assert_eq!(tracker.result().map(|r| r.gpa), Some(4.0));

        // Any change to the list drops the stale result
        tracker.add_subject("Art", Grade::C);
        assert!(tracker.result().is_none());
        tracker.calculate();
        assert_eq!(tracker.result().map(|r| r.gpa), Some(3.0));
        tracker.delete_subject(0);
        assert!(tracker.result().is_none());
    }

    #[test]
    fn test_draft_submit_resets_on_success_only() {
        let mut tracker = GradeTracker::new();
        let mut draft = SubjectDraft {
            name: "Chemistry".to_string(),
            grade: Grade::CPlus,
        };
        assert!(draft.submit(&mut tracker));
        assert_eq!(draft, SubjectDraft::default());
        assert_eq!(tracker.subjects()[0].grade, Grade::CPlus);

        let mut blank = SubjectDraft {
            name: "  ".to_string(),
            grade: Grade::F,
        };
        assert!(!blank.submit(&mut tracker));
        assert_eq!(blank.grade, Grade::F);
        assert_eq!(tracker.len(), 1);
    }
}
