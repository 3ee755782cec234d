pub mod dag;
pub mod project;
pub mod time_windows;
pub mod validation;

pub use project::{Activity, ProjectError, ProjectModel};
pub use time_windows::{GenerationSummary, TimeWindowGenerator, TimeWindowOptions};
pub use validation::{validate_time_windows, ValidationReport};
