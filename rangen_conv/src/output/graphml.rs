use std::io::{self, Write};

use log::debug;
use rangen::ProjectModel;

use super::retained;

const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<graphml xmlns="http://graphml.graphdrawing.org/xmlns" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://graphml.graphdrawing.org/xmlns http://graphml.graphdrawing.org/xmlns/1.0/graphml.xsd">"#;

/// Node attributes, the resource demands follow as `d4..`.
const NODE_KEYS: [&str; 4] = ["activity_duration", "release", "deadline", "window"];

fn write_key<W: Write>(writer: &mut W, index: usize, name: &str) -> io::Result<()> {
    writeln!(
        writer,
        r#"<key id="d{index}" for="node" attr.name="{name}" attr.type="int">"#
    )?;
    writeln!(writer, "<default>0</default>")?;
    writeln!(writer, "</key>")
}

/// Writes the precedence network as GraphML, e.g. for Gephi. Nodes are named `n<index>`
/// after the 0-based activity index, edges `e0, e1, ...` in output order.
pub fn write_graphml<W: Write>(
    writer: &mut W,
    project: &ProjectModel,
    include_dummies: bool,
) -> io::Result<()> {
    let retained = retained(project.activity_count(), include_dummies);

    writeln!(writer, "{HEADER}")?;
    for (index, name) in NODE_KEYS.iter().enumerate() {
        write_key(writer, index, name)?;
    }
    for resource in 1..=project.resource_count() {
        write_key(
            writer,
            NODE_KEYS.len() + resource - 1,
            &format!("res{resource}_demand"),
        )?;
    }

    writeln!(writer, r#"<graph id="G" edgedefault="directed">"#)?;

    for index in retained.clone() {
        let activity = project.activity(index);
        let values = [
            activity.duration,
            activity.release,
            activity.deadline,
            activity.window(),
        ]
        .into_iter()
        .chain(activity.resource_demand.iter().map(|&demand| u64::from(demand)));

        writeln!(writer, r#"<node id="n{index}">"#)?;
        for (key, value) in values.enumerate() {
            writeln!(writer, r#"<data key="d{key}">{value}</data>"#)?;
        }
        writeln!(writer, "</node>")?;
    }

    let edges = project
        .graph()
        .edges()
        .filter(|(i, j)| retained.contains(i) && retained.contains(j));
    let mut edge_count = 0;
    for (id, (source, target)) in edges.enumerate() {
        writeln!(
            writer,
            r#"<edge id="e{id}" source="n{source}" target="n{target}" />"#
        )?;
        edge_count += 1;
    }

    writeln!(writer, "</graph>")?;
    writeln!(writer, "</graphml>")?;

    debug!(
        "GraphML with {} nodes and {edge_count} edges written",
        retained.len()
    );
    Ok(())
}
