use log::{debug, trace};
use rangen_parser::structs::RanGenProblem;
use thiserror::Error;

use crate::dag::{AdjacencyMatrix, PrecedenceGraph};

/// Added to `1 / duration` so that a solver running at full progress never ends up just
/// short of finishing an activity because of floating point rounding.
pub const MAX_PROGRESS_EPSILON: f64 = 0.000001;

/// Vertex data of the precedence graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Activity {
    /// 1-based, in input order. The first and the last activity are the dummy start and
    /// end nodes.
    pub id: usize,
    pub duration: u64,
    pub resource_demand: Vec<u32>,
    /// 1-based ids of the direct successors.
    pub successors: Vec<usize>,
    /// Earliest permissible start, set by the time window generator.
    pub release: u64,
    /// Latest permissible completion, set by the time window generator.
    pub deadline: u64,
}

impl Activity {
    /// Slack between release and deadline.
    pub fn window(&self) -> u64 {
        self.deadline.saturating_sub(self.release)
    }

    /// Maximal progress per period, `inf` for zero durations.
    pub fn max_progress(&self) -> f64 {
        1.0 / self.duration as f64 + MAX_PROGRESS_EPSILON
    }

    /// Duration as seen by a consumer that only knows [`Self::max_progress`].
    pub fn rounded_duration(&self) -> u64 {
        (1.0 / self.max_progress()) as u64
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectError {
    #[error("Project contains no activities")]
    Empty,
    #[error("Activity {activity} names successor {successor}, valid ids are 1..={activity_count}")]
    UnknownSuccessor {
        activity: usize,
        successor: usize,
        activity_count: usize,
    },
    #[error("Precedence graph is not a DAG")]
    Cyclic,
}

/// A parsed project: activities in a precedence graph plus constant resource capacities.
#[derive(Debug, Clone)]
pub struct ProjectModel {
    resource_availability: Vec<u32>,
    graph: PrecedenceGraph<Activity, AdjacencyMatrix>,
}

impl ProjectModel {
    /// Builds the precedence graph from the successor lists and makes sure it is a DAG.
    pub fn from_problem(problem: &RanGenProblem) -> Result<Self, ProjectError> {
        let activity_count = problem.activities.len();
        if activity_count == 0 {
            return Err(ProjectError::Empty);
        }

        let mut graph = PrecedenceGraph::new(activity_count);

        for (index, parsed) in problem.activities.iter().enumerate() {
            for &successor in &parsed.successors {
                if successor == 0 || successor > activity_count {
                    return Err(ProjectError::UnknownSuccessor {
                        activity: parsed.id,
                        successor,
                        activity_count,
                    });
                }

                graph.set_edge(index, successor - 1, true);
            }

            graph.set_vertex(
                index,
                Activity {
                    id: parsed.id,
                    duration: u64::from(parsed.duration),
                    resource_demand: parsed.resource_requests.clone(),
                    successors: parsed.successors.clone(),
                    release: 0,
                    deadline: 0,
                },
            );
        }

        if graph.is_cyclic() {
            return Err(ProjectError::Cyclic);
        }
        debug!("precedence graph with {activity_count} activities is a DAG");
        trace!("edges: {:?}", graph.edges().collect::<Vec<_>>());

        Ok(Self {
            resource_availability: problem.resource_availabilities.clone(),
            graph,
        })
    }

    pub fn resource_availability(&self) -> &[u32] {
        &self.resource_availability
    }

    pub fn resource_count(&self) -> usize {
        self.resource_availability.len()
    }

    pub fn activity_count(&self) -> usize {
        self.graph.vertex_count()
    }

    /// Activity at 0-based `index`.
    pub fn activity(&self, index: usize) -> &Activity {
        self.graph.vertex(index)
    }

    pub fn activities(&self) -> &[Activity] {
        self.graph.vertices()
    }

    pub fn graph(&self) -> &PrecedenceGraph<Activity, AdjacencyMatrix> {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut PrecedenceGraph<Activity, AdjacencyMatrix> {
        &mut self.graph
    }

    /// Latest deadline of all activities, bounds the time index set of the model.
    pub fn horizon(&self) -> u64 {
        self.activities()
            .iter()
            .map(|activity| activity.deadline)
            .max()
            .unwrap_or(0)
    }
}
