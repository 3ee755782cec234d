// The format is line oriented and count driven, so chumsky only tokenises
// lines of integers and the counts are interpreted afterwards.

use chumsky::{prelude::*, Parser};
use structs::{RanGenActivity, RanGenProblem};
use thiserror::Error;

pub mod structs;

#[derive(Debug, Error)]
pub enum RanGenParseError {
    #[error("ParseError occurred: {0:?}")]
    ParseError(Vec<Simple<char>>),
    #[error("Input contains no header line")]
    MissingHeader,
    #[error("line #{line}: header must hold node and resource count, found {found} values")]
    MalformedHeader { line: usize, found: usize },
    #[error("Resource availability line is missing")]
    MissingAvailability,
    #[error("line #{line}: activity needs at least {expected} values, found {found}")]
    TruncatedActivity {
        line: usize,
        expected: usize,
        found: usize,
    },
}

pub fn parse_rangen(content: &str) -> Result<RanGenProblem, RanGenParseError> {
    let lines = crate::document_parser()
        .parse(content)
        .map_err(RanGenParseError::ParseError)?;

    let mut lines = lines
        .into_iter()
        .enumerate()
        .map(|(index, values)| (index + 1, values))
        .filter(|(_, values)| !values.is_empty());

    let (header_line, header) = lines.next().ok_or(RanGenParseError::MissingHeader)?;
    let (node_count, resource_count) = match header.as_slice() {
        [nodes, resources] => (*nodes as usize, *resources as usize),
        _ => {
            return Err(RanGenParseError::MalformedHeader {
                line: header_line,
                found: header.len(),
            })
        }
    };

    let (_, resource_availabilities) = lines
        .next()
        .ok_or(RanGenParseError::MissingAvailability)?;

    let activities = lines
        .enumerate()
        .map(|(index, (line, values))| {
            activity_from_values(index + 1, line, resource_count, values)
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RanGenProblem {
        node_count,
        resource_count,
        resource_availabilities,
        activities,
    })
}

fn activity_from_values(
    id: usize,
    line: usize,
    resource_count: usize,
    values: Vec<u32>,
) -> Result<RanGenActivity, RanGenParseError> {
    // duration, one demand per resource, successor count
    let expected = resource_count + 2;
    if values.len() < expected {
        return Err(RanGenParseError::TruncatedActivity {
            line,
            expected,
            found: values.len(),
        });
    }

    Ok(RanGenActivity {
        id,
        line,
        duration: values[0],
        resource_requests: values[1..=resource_count].to_vec(),
        successor_count: values[resource_count + 1] as usize,
        successors: values[expected..]
            .iter()
            .map(|&successor| successor as usize)
            .collect(),
    })
}

pub(crate) fn number_parser() -> impl Parser<char, u32, Error = Simple<char>> + Clone {
    filter(|c: &char| c.is_ascii_digit())
        .repeated()
        .at_least(1)
        .collect::<String>()
        .try_map(|digits, span| {
            digits
                .parse::<u32>()
                .map_err(|err| Simple::custom(span, format!("{digits}: {err}")))
        })
        .labelled("number")
}

pub(crate) fn inline_whitespace() -> impl Parser<char, (), Error = Simple<char>> + Clone {
    filter(|c: &char| *c == ' ' || *c == '\t' || *c == '\r')
        .repeated()
        .ignored()
}

pub(crate) fn line_parser() -> impl Parser<char, Vec<u32>, Error = Simple<char>> + Clone {
    inline_whitespace()
        .ignore_then(
            number_parser()
                .then_ignore(inline_whitespace())
                .repeated(),
        )
        .labelled("line")
}

pub(crate) fn document_parser() -> impl Parser<char, Vec<Vec<u32>>, Error = Simple<char>> {
    line_parser().separated_by(just('\n')).then_ignore(end())
}
