use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct RanGenProblem {
    // header
    pub node_count: usize,
    pub resource_count: usize,
    // second line, one value per renewable resource
    pub resource_availabilities: Vec<u32>,
    // one entry per activity line, in file order
    pub activities: Vec<RanGenActivity>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RanGenActivity {
    /// 1-based id, assigned in file order (dummy start/end included).
    pub id: usize,
    /// Physical line of the activity in the input.
    pub line: usize,
    pub duration: u32,
    pub resource_requests: Vec<u32>,
    /// Successor count as declared on the line.
    pub successor_count: usize,
    /// Successor ids actually present on the line (1-based).
    pub successors: Vec<usize>,
}

/// Inconsistency between what a file declares and what it contains.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatIssue {
    #[error("resource availability lists {found} values but {expected} resources are declared")]
    AvailabilityMismatch { expected: usize, found: usize },
    #[error("header declares {declared} nodes but {found} activity lines were found")]
    NodeCountMismatch { declared: usize, found: usize },
    #[error("line #{line}: activity {activity} declares {declared} successors but lists {found}")]
    SuccessorCountMismatch {
        line: usize,
        activity: usize,
        declared: usize,
        found: usize,
    },
    #[error("line #{line}: activity {activity} names unknown successor {successor}")]
    UnknownSuccessor {
        line: usize,
        activity: usize,
        successor: usize,
    },
}

impl RanGenProblem {
    pub fn activity_count(&self) -> usize {
        self.activities.len()
    }

    /// Checks that every count in the file matches the values that follow it.
    ///
    /// All issues are collected, an empty vector means the file is well formed.
    pub fn check_format(&self) -> Vec<FormatIssue> {
        let mut issues = vec![];

        if self.resource_availabilities.len() != self.resource_count {
            issues.push(FormatIssue::AvailabilityMismatch {
                expected: self.resource_count,
                found: self.resource_availabilities.len(),
            });
        }

        if self.node_count != self.activity_count() {
            issues.push(FormatIssue::NodeCountMismatch {
                declared: self.node_count,
                found: self.activity_count(),
            });
        }

        for activity in &self.activities {
            if activity.successor_count != activity.successors.len() {
                issues.push(FormatIssue::SuccessorCountMismatch {
                    line: activity.line,
                    activity: activity.id,
                    declared: activity.successor_count,
                    found: activity.successors.len(),
                });
            }

            issues.extend(
                activity
                    .successors
                    .iter()
                    .filter(|&&successor| successor == 0 || successor > self.activity_count())
                    .map(|&successor| FormatIssue::UnknownSuccessor {
                        line: activity.line,
                        activity: activity.id,
                        successor,
                    }),
            );
        }

        issues
    }
}
