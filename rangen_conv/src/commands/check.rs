use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use log::{debug, error};
use rangen::ProjectModel;
use rangen_parser::parse_rangen;

pub fn check(path: PathBuf) -> Result<()> {
    let contents =
        fs::read_to_string(&path).with_context(|| format!("File {path:?} cannot be read"))?;

    if is_well_formed(&contents) {
        println!("file ok");
        Ok(())
    } else {
        println!("file bad");
        bail!("{path:?} does not obey the RanGen format")
    }
}

/// Parses, runs the format consistency check and makes sure the precedence graph is a DAG.
/// Every problem found is logged.
fn is_well_formed(contents: &str) -> bool {
    let problem = match parse_rangen(contents) {
        Ok(problem) => problem,
        Err(err) => {
            error!("{err}");
            return false;
        }
    };

    let issues = problem.check_format();
    for issue in &issues {
        error!("inconsistency found: {issue}");
    }
    if !issues.is_empty() {
        return false;
    }

    match ProjectModel::from_problem(&problem) {
        Ok(project) => {
            debug!("{} activities, graph is a DAG", project.activity_count());
            true
        }
        Err(err) => {
            error!("{err}");
            false
        }
    }
}
