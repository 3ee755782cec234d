use log::{debug, trace, warn};
use rand::Rng;
use thiserror::Error;

use crate::dag::{Adjacency, PrecedenceGraph};
use crate::project::Activity;

pub mod sampling;

/// Vertex whose window is pinned to `[0, duration]`, the dummy start node.
pub const ROOT_VERTEX: usize = 0;

#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindowOptions {
    /// Caps the random stretch of a single window. Higher values give more slack but a
    /// longer time horizon.
    pub time_limit: u64,
    /// Rate of the geometric draw that delays the release.
    pub release_rate: f64,
    /// Rate of the geometric draw that widens the window towards the deadline.
    pub deadline_rate: f64,
}

impl Default for TimeWindowOptions {
    fn default() -> Self {
        Self {
            time_limit: 10,
            release_rate: 0.6,
            deadline_rate: 0.4,
        }
    }
}

impl TimeWindowOptions {
    pub fn validate(&self) -> Result<(), TimeWindowError> {
        for (name, value) in [
            ("release rate", self.release_rate),
            ("deadline rate", self.deadline_rate),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(TimeWindowError::InvalidRate { name, value });
            }
        }

        Ok(())
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum TimeWindowError {
    #[error("The {name} must lie strictly between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: f64 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    pub processed: usize,
    /// Vertices whose predecessors had a latest deadline before their latest release.
    pub anomalies: usize,
}

/// Assigns every activity a release and a deadline consistent with the precedence
/// constraints.
///
/// For an edge `<i, j>` the generated windows satisfy
///
/// 1. `d_i - r_i >= p_i`
/// 2. `r_j - r_i >= p_i`
/// 3. `d_j - d_i >= p_j`
///
/// Vertices are visited in topological order. With `I` the predecessors of `j`:
///
/// ```text
/// d_max = max d_i, r_max = max r_i, p_max = max p_i    over I, 0 if I is empty
/// W ~ Geo(release_rate), Z ~ Geo(deadline_rate), both capped by the time limit
/// X = p_max + W, Y = X + Z
/// r_j = r_max + X
/// d_j = p_j + d_max + Y
/// ```
#[derive(Debug)]
pub struct TimeWindowGenerator<R> {
    options: TimeWindowOptions,
    rng: R,
}

impl<R: Rng> TimeWindowGenerator<R> {
    pub fn new(options: TimeWindowOptions, rng: R) -> Result<Self, TimeWindowError> {
        options.validate()?;
        Ok(Self { options, rng })
    }

    pub fn options(&self) -> &TimeWindowOptions {
        &self.options
    }

    /// Overwrites release and deadline of every vertex. The graph has to be a DAG.
    pub fn generate<A: Adjacency>(
        &mut self,
        graph: &mut PrecedenceGraph<Activity, A>,
    ) -> GenerationSummary {
        let mut summary = GenerationSummary::default();

        for j in graph.topological_sort() {
            let (d_max, r_max, p_max) = graph
                .predecessors(j)
                .into_iter()
                .map(|i| graph.vertex(i))
                .fold((0, 0, 0), |(d_max, r_max, p_max), parent| {
                    (
                        d_max.max(parent.deadline),
                        r_max.max(parent.release),
                        p_max.max(parent.duration),
                    )
                });

            let mut w = sampling::geometric(&mut self.rng, self.options.release_rate);
            let mut z = sampling::geometric(&mut self.rng, self.options.deadline_rate);

            // keep the time horizon from exploding
            w = w.min(sampling::draw_cap(&mut self.rng, self.options.time_limit));
            z = z.min(sampling::draw_cap(&mut self.rng, self.options.time_limit));

            if j == ROOT_VERTEX {
                w = 0;
                z = 0;
            }

            if d_max < r_max {
                warn!("logical flaw at activity {}: d_max {d_max} < r_max {r_max}", j + 1);
                summary.anomalies += 1;
            }

            let x = p_max + w;
            let y = x + z;

            let activity = graph.vertex_mut(j);
            activity.release = r_max + x;
            activity.deadline = activity.duration + d_max + y;

            debug_assert!(x >= p_max);
            debug_assert!(y >= x);
            debug_assert!(activity.deadline >= activity.release + activity.duration);

            trace!(
                "activity {}: release {}, deadline {} (W {w}, Z {z})",
                j + 1,
                activity.release,
                activity.deadline
            );
            summary.processed += 1;
        }

        debug!("generated {} time windows", summary.processed);
        summary
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};
    use rangen_parser::parse_rangen;

    use super::{TimeWindowError, TimeWindowGenerator, TimeWindowOptions};
    use crate::dag::{AdjacencyList, PrecedenceGraph};
    use crate::project::{Activity, ProjectModel};
    use crate::validation::validate_time_windows;

    static TEST_FILE: &str = include_str!("../../../instances/small.rcp");

    fn generator(seed: u64) -> TimeWindowGenerator<StdRng> {
        TimeWindowGenerator::new(TimeWindowOptions::default(), StdRng::seed_from_u64(seed))
            .unwrap()
    }

    fn windows(project: &ProjectModel) -> Vec<(u64, u64)> {
        project
            .activities()
            .iter()
            .map(|activity| (activity.release, activity.deadline))
            .collect()
    }

    #[test]
    fn rates_are_validated() {
        let invalid = [(0.0, 0.4), (0.6, 1.0), (f64::NAN, 0.4), (0.6, -2.0)];

        for (release_rate, deadline_rate) in invalid {
            let options = TimeWindowOptions {
                release_rate,
                deadline_rate,
                ..TimeWindowOptions::default()
            };

            assert!(matches!(
                TimeWindowGenerator::new(options, StdRng::seed_from_u64(0)),
                Err(TimeWindowError::InvalidRate { .. })
            ));
        }
    }

    #[test]
    fn zero_time_limit_gives_tightest_windows() {
        let mut project = ProjectModel::from_problem(&parse_rangen(TEST_FILE).unwrap()).unwrap();
        let options = TimeWindowOptions {
            time_limit: 0,
            ..TimeWindowOptions::default()
        };
        let mut generator = TimeWindowGenerator::new(options, StdRng::seed_from_u64(3)).unwrap();

        let summary = generator.generate(project.graph_mut());

        assert_eq!(summary.processed, 8);
        assert_eq!(summary.anomalies, 0);
        assert_eq!(
            windows(&project),
            vec![
                (0, 0),
                (0, 3),
                (0, 4),
                (0, 2),
                (3, 11),
                (3, 7),
                (4, 10),
                (9, 16),
            ]
        );
        assert_eq!(project.horizon(), 16);
    }

    #[test]
    fn root_window_is_pinned() {
        let problem = parse_rangen("4 1\n10\n2 3 2 2 3\n1 2 1 4\n3 1 1 4\n0 0 0\n").unwrap();
        assert!(problem.check_format().is_empty());

        for seed in 0..20 {
            let mut project = ProjectModel::from_problem(&problem).unwrap();
            assert_eq!(project.graph().topological_sort()[0], 0);

            generator(seed).generate(project.graph_mut());

            assert_eq!(project.activity(0).release, 0);
            assert_eq!(project.activity(0).deadline, 2);
            assert!(validate_time_windows(project.graph()).is_valid());
        }
    }

    #[test]
    fn same_seed_same_windows() {
        let problem = parse_rangen(TEST_FILE).unwrap();
        let mut first = ProjectModel::from_problem(&problem).unwrap();
        let mut second = ProjectModel::from_problem(&problem).unwrap();

        generator(11).generate(first.graph_mut());
        generator(11).generate(second.graph_mut());

        assert_eq!(windows(&first), windows(&second));
    }

    #[test]
    fn generated_windows_pass_validation() {
        let mut rng = StdRng::seed_from_u64(2015);

        for seed in 0..100 {
            let vertex_count = rng.gen_range(2..60);
            let mut labels: Vec<usize> = (1..vertex_count).collect();
            labels.shuffle(&mut rng);
            // keep vertex 0 as the single source so it is processed first
            labels.insert(0, 0);

            let mut graph: PrecedenceGraph<Activity, AdjacencyList> =
                PrecedenceGraph::new(vertex_count);
            for v in 0..vertex_count {
                let activity = graph.vertex_mut(v);
                activity.id = v + 1;
                activity.duration = rng.gen_range(0..15);
            }
            for i in 0..vertex_count {
                for j in (i + 1)..vertex_count {
                    if i == 0 || rng.gen_bool(0.2) {
                        graph.set_edge(labels[i], labels[j], true);
                    }
                }
            }
            assert!(!graph.is_cyclic());

            let options = TimeWindowOptions {
                time_limit: rng.gen_range(0..25),
                ..TimeWindowOptions::default()
            };
            let summary = TimeWindowGenerator::new(options, StdRng::seed_from_u64(seed))
                .unwrap()
                .generate(&mut graph);

            assert_eq!(summary.processed, vertex_count);
            assert_eq!(summary.anomalies, 0);
            assert_eq!(graph.vertex(0).release, 0);
            assert_eq!(graph.vertex(0).deadline, graph.vertex(0).duration);
            for activity in graph.vertices() {
                assert!(activity.deadline >= activity.release + activity.duration);
            }

            let report = validate_time_windows(&graph);
            assert!(report.is_valid(), "seed {seed}: {:?}", report.violations);
        }
    }
}
