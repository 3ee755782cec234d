use std::fmt::Display;
use std::ops::Range;

mod graphml;
mod solver_model;

pub use graphml::write_graphml;
pub use solver_model::write_solver_model;

/// 0-based indices of the activities that end up in the output. Without dummies the first
/// and the last activity are dropped.
fn retained(activity_count: usize, include_dummies: bool) -> Range<usize> {
    if include_dummies {
        0..activity_count
    } else {
        1..activity_count.saturating_sub(1)
    }
}

/// 1-based activity number in the output, consecutive over the retained activities.
fn activity_number(index: usize, include_dummies: bool) -> usize {
    if include_dummies {
        index + 1
    } else {
        index
    }
}

fn join<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
