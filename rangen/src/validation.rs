use std::fmt;

use log::{debug, warn};

use crate::dag::{Adjacency, PrecedenceGraph};
use crate::project::Activity;

/// A broken time window constraint. Activities are named by their 1-based number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// `d - r < p` for a single activity.
    Window { activity: usize },
    /// As [`Violation::Window`], with the duration recovered from the max progress.
    RoundedWindow { activity: usize },
    /// One of the three precedence inequalities fails for the edge.
    Precedence { predecessor: usize, successor: usize },
    /// As [`Violation::Precedence`], with durations recovered from the max progress.
    RoundedPrecedence { predecessor: usize, successor: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Window { activity: a } => {
                write!(f, "violation found: d_{a} - r_{a} < p_{a}")
            }
            Violation::RoundedWindow { activity: a } => {
                write!(f, "rounding violation found: d_{a} - r_{a} < p_{a}")
            }
            Violation::Precedence {
                predecessor,
                successor,
            } => write!(f, "violation found: <{predecessor},{successor}>"),
            Violation::RoundedPrecedence {
                predecessor,
                successor,
            } => write!(f, "rounding violation found: <{predecessor},{successor}>"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// `d - r >= p`
fn window_holds(activity: &Activity, duration: u64) -> bool {
    activity.deadline >= activity.release + duration
}

/// `d_i - r_i >= p_i`, `r_j - r_i >= p_i` and `d_j - d_i >= p_j` for the edge `<i, j>`.
fn precedence_holds(
    parent: &Activity,
    parent_duration: u64,
    child: &Activity,
    child_duration: u64,
) -> bool {
    window_holds(parent, parent_duration)
        && child.release >= parent.release + parent_duration
        && child.deadline >= parent.deadline + child_duration
}

/// Re-checks every vertex and every edge against the generated windows.
///
/// Does not stop at the first problem, every violation is logged and collected.
pub fn validate_time_windows<A: Adjacency>(
    graph: &PrecedenceGraph<Activity, A>,
) -> ValidationReport {
    let mut report = ValidationReport::default();

    for j in 0..graph.vertex_count() {
        let child = graph.vertex(j);

        if !window_holds(child, child.duration) {
            report.violations.push(Violation::Window { activity: j + 1 });
        }
        if !window_holds(child, child.rounded_duration()) {
            report.violations.push(Violation::RoundedWindow { activity: j + 1 });
        }

        for i in graph.predecessors(j) {
            let parent = graph.vertex(i);
            let (predecessor, successor) = (i + 1, j + 1);

            if !precedence_holds(parent, parent.duration, child, child.duration) {
                report.violations.push(Violation::Precedence {
                    predecessor,
                    successor,
                });
            }
            if !precedence_holds(
                parent,
                parent.rounded_duration(),
                child,
                child.rounded_duration(),
            ) {
                report.violations.push(Violation::RoundedPrecedence {
                    predecessor,
                    successor,
                });
            }
        }
    }

    for violation in &report.violations {
        warn!("{violation}");
    }
    debug!(
        "validated {} activities, {} violations",
        graph.vertex_count(),
        report.violations.len()
    );

    report
}
