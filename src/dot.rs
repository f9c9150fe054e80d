//! Graph-description documents for the external layout engine.
//!
//! A small model of the DOT language: graph attributes, nodes and edges
//! with quoted or HTML-like attribute values, and cluster subgraphs. The
//! serialized form doubles as the raw debugging artifact written when
//! temporary files are preserved.

use std::fs;
use std::io;
use std::path::Path;

/// A node or edge attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Plain value, quoted on output.
    Text(String),
    /// HTML-like label, wrapped in angle brackets on output.
    Html(String),
}

impl AttrValue {
    fn write(&self, out: &mut String) {
        match self {
            AttrValue::Text(text) => {
                out.push('"');
                out.push_str(&text.replace('\\', "\\\\").replace('"', "\\\""));
                out.push('"');
            }
            AttrValue::Html(html) => {
                out.push('<');
                out.push_str(html);
                out.push('>');
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotNode {
    pub id: String,
    attrs: Vec<(String, AttrValue)>,
}

impl DotNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.push((key.to_string(), AttrValue::Text(value.into())));
        self
    }

    pub fn attr_html(mut self, key: &str, html: impl Into<String>) -> Self {
        self.attrs.push((key.to_string(), AttrValue::Html(html.into())));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotEdge {
    pub from: String,
    pub to: String,
    attrs: Vec<(String, AttrValue)>,
}

impl DotEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.push((key.to_string(), AttrValue::Text(value.into())));
        self
    }
}

/// A directed graph description.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DotGraph {
    name: String,
    attrs: Vec<(String, AttrValue)>,
    nodes: Vec<DotNode>,
    edges: Vec<DotEdge>,
    subgraphs: Vec<DotGraph>,
}

impl DotGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A cluster subgraph; the serialized name carries the `cluster_`
    /// prefix the layout engine keys on.
    pub fn cluster(name: impl Into<String>) -> Self {
        Self::new(format!("cluster_{}", name.into()))
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        self.attrs.push((key.to_string(), AttrValue::Text(value.into())));
    }

    pub fn add_node(&mut self, node: DotNode) {
        self.nodes.push(node);
    }

    pub fn add_edge(&mut self, edge: DotEdge) {
        self.edges.push(edge);
    }

    pub fn add_subgraph(&mut self, subgraph: DotGraph) {
        self.subgraphs.push(subgraph);
    }

    pub fn nodes(&self) -> &[DotNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[DotEdge] {
        &self.edges
    }

    fn write_attr_list(attrs: &[(String, AttrValue)], out: &mut String) {
        if attrs.is_empty() {
            return;
        }
        out.push_str(" [");
        for (i, (key, value)) in attrs.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            out.push_str(key);
            out.push('=');
            value.write(out);
        }
        out.push(']');
    }

    fn write_body(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        for (key, value) in &self.attrs {
            out.push_str(&pad);
            out.push_str(key);
            out.push('=');
            value.write(out);
            out.push_str(";\n");
        }
        for node in &self.nodes {
            out.push_str(&format!("{pad}\"{}\"", node.id.replace('"', "\\\"")));
            Self::write_attr_list(&node.attrs, out);
            out.push_str(";\n");
        }
        for edge in &self.edges {
            out.push_str(&format!(
                "{pad}\"{}\" -> \"{}\"",
                edge.from.replace('"', "\\\""),
                edge.to.replace('"', "\\\"")
            ));
            Self::write_attr_list(&edge.attrs, out);
            out.push_str(";\n");
        }
        for subgraph in &self.subgraphs {
            out.push_str(&format!("{pad}subgraph {} {{\n", subgraph.name));
            subgraph.write_body(out, indent + 1);
            out.push_str(&format!("{pad}}}\n"));
        }
    }

    /// Serialize to DOT text.
    pub fn to_dot(&self) -> String {
        let mut out = format!("digraph {} {{\n", self.name);
        self.write_body(&mut out, 1);
        out.push_str("}\n");
        out
    }

    /// Write the raw graph description for debugging.
    pub fn write_raw(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_dot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_ids_and_values() {
        let mut graph = DotGraph::new("g");
        graph.set_attr("layout", "sfdp");
        graph.add_node(DotNode::new("0").attr("shape", "point").attr("color", "#00000080"));
        graph.add_edge(DotEdge::new("0", "1").attr("label", "L"));
        let dot = graph.to_dot();
        assert!(dot.starts_with("digraph g {"));
        assert!(dot.contains("layout=\"sfdp\";"));
        assert!(dot.contains("\"0\" [shape=\"point\", color=\"#00000080\"];"));
        assert!(dot.contains("\"0\" -> \"1\" [label=\"L\"];"));
    }

    #[test]
    fn html_labels_keep_angle_brackets() {
        let mut graph = DotGraph::new("g");
        graph.add_node(DotNode::new("index").attr_html("label", "<table><tr></tr></table>"));
        assert!(graph
            .to_dot()
            .contains("\"index\" [label=<<table><tr></tr></table>>];"));
    }

    #[test]
    fn clusters_nest_with_prefix() {
        let mut graph = DotGraph::new("g");
        let mut legend = DotGraph::cluster("legend");
        legend.set_attr("rankdir", "BT");
        legend.add_node(DotNode::new("start"));
        graph.add_subgraph(legend);
        let dot = graph.to_dot();
        assert!(dot.contains("subgraph cluster_legend {"));
        assert!(dot.contains("rankdir=\"BT\";"));
    }

    #[test]
    fn escapes_embedded_quotes() {
        let mut graph = DotGraph::new("g");
        graph.add_node(DotNode::new("a").attr("label", "say \"hi\""));
        assert!(graph.to_dot().contains("label=\"say \\\"hi\\\"\""));
    }
}
