use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use log::{debug, error, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rangen::{validate_time_windows, ProjectModel, TimeWindowGenerator, TimeWindowOptions};
use rangen_parser::parse_rangen;

use crate::output::{write_graphml, write_solver_model};
use crate::Convert;

pub fn convert(args: Convert) -> Result<()> {
    let contents = fs::read_to_string(&args.input)
        .with_context(|| format!("Input file {:?} cannot be read", args.input))?;
    trace!("input file contents: {contents}");

    let problem = parse_rangen(&contents)?;
    let issues = problem.check_format();
    if !issues.is_empty() {
        for issue in &issues {
            error!("inconsistency found: {issue}");
        }
        bail!(
            "{:?} does not obey the RanGen format, {} inconsistencies found",
            args.input,
            issues.len()
        );
    }
    ensure!(
        args.dummy || problem.activity_count() >= 2,
        "Dropping the dummy nodes needs at least two activities, found {}",
        problem.activity_count()
    );

    let mut project = ProjectModel::from_problem(&problem)?;
    info!("Parsed {} activities, graph is a DAG", project.activity_count());

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Generating time windows with seed {seed}");

    let options = TimeWindowOptions {
        time_limit: args.time_limit,
        release_rate: args.release_rate,
        deadline_rate: args.deadline_rate,
    };
    let mut generator = TimeWindowGenerator::new(options, StdRng::seed_from_u64(seed))?;
    let summary = generator.generate(project.graph_mut());
    debug!("{summary:?}");

    let report = validate_time_windows(project.graph());
    if !report.is_valid() {
        bail!(
            "Validation of the time windows failed with {} violations",
            report.violations.len()
        );
    }
    info!("Time horizon is {} periods long", project.horizon());

    write_with(&args.output, |writer| {
        write_solver_model(writer, &project, args.dummy)
    })?;
    info!("Wrote solver model to {:?}", args.output);

    if args.graphml {
        let path = graphml_path(&args.output);
        write_with(&path, |writer| write_graphml(writer, &project, args.dummy))?;
        info!("Wrote GraphML file to {path:?}");
    }

    Ok(())
}

fn write_with<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let file =
        File::create(path).with_context(|| format!("Output file {path:?} cannot be written"))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer).with_context(|| format!("Failed writing {path:?}"))?;
    writer.flush()?;

    Ok(())
}

/// `<output>.graphml`, next to the solver model.
fn graphml_path(output: &Path) -> PathBuf {
    let mut path = output.as_os_str().to_owned();
    path.push(".graphml");
    PathBuf::from(path)
}
