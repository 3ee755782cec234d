use std::io::{self, Write};

use log::debug;
use rangen::ProjectModel;

use super::{activity_number, join, retained};

/// Writes the time-indexed model, one declaration per line:
///
/// ```text
/// time = {1,2,3,4,5,6,7};
/// activity = {1,2,3};
/// resource = {1,2};
/// res_capacity = [[4,4],[4,4],[4,4],[4,4],[4,4],[4,4],[4,4]];
/// maxProgress = [0.5,0.5,0.5];
/// minProgress = [0,0,0];
/// Relations = {<1,2>,<2,3>};
/// release = [0,0,0];
/// deadline = [4,5,7];
/// res_demand = [[0,1],[1,1],[2,2]];
/// ```
pub fn write_solver_model<W: Write>(
    writer: &mut W,
    project: &ProjectModel,
    include_dummies: bool,
) -> io::Result<()> {
    let retained = retained(project.activity_count(), include_dummies);
    let activities = &project.activities()[retained.clone()];
    let horizon = project.horizon();
    let first_period = if include_dummies { 0 } else { 1 };

    writeln!(writer, "time = {{{}}};", join(first_period..=horizon))?;
    writeln!(
        writer,
        "activity = {{{}}};",
        join(1..=activities.len())
    )?;
    writeln!(
        writer,
        "resource = {{{}}};",
        join(1..=project.resource_count())
    )?;

    let capacity = format!("[{}]", join(project.resource_availability()));
    writeln!(
        writer,
        "res_capacity = [{}];",
        join((first_period..=horizon).map(|_| &capacity))
    )?;

    writeln!(
        writer,
        "maxProgress = [{}];",
        join(
            activities
                .iter()
                .map(|activity| format_general(activity.max_progress()))
        )
    )?;
    writeln!(
        writer,
        "minProgress = [{}];",
        join(activities.iter().map(|_| 0))
    )?;

    let relations = project
        .graph()
        .edges()
        .filter(|(i, j)| retained.contains(i) && retained.contains(j))
        .map(|(i, j)| {
            format!(
                "<{},{}>",
                activity_number(i, include_dummies),
                activity_number(j, include_dummies)
            )
        });
    writeln!(writer, "Relations = {{{}}};", join(relations))?;

    writeln!(
        writer,
        "release = [{}];",
        join(activities.iter().map(|activity| activity.release))
    )?;
    writeln!(
        writer,
        "deadline = [{}];",
        join(activities.iter().map(|activity| activity.deadline))
    )?;
    writeln!(
        writer,
        "res_demand = [{}];",
        join(
            activities
                .iter()
                .map(|activity| format!("[{}]", join(&activity.resource_demand)))
        )
    )?;

    debug!(
        "solver model with {} activities over {} periods written",
        activities.len(),
        horizon + 1 - first_period
    );
    Ok(())
}

/// Formats like the `%g` conversion: six significant digits, trailing zeros removed,
/// scientific notation for exponents below -4 or above 5.
fn format_general(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        let sign = if value < 0.0 { "-" } else { "" };
        return format!("{sign}inf");
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // rounding to the precision may carry into the next power of ten
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return scientific;
    };

    if exponent < -4 || exponent >= PRECISION {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{sign}{:02}",
            trim_fraction(mantissa),
            exponent.abs()
        )
    } else {
        let decimals = (PRECISION - 1 - exponent) as usize;
        trim_fraction(&format!("{value:.decimals$}")).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}
