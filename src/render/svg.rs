//! Minimal in-memory SVG document model.
//!
//! The cube renderer builds an immutable element tree and serializes it
//! once at the end, so rendering stays a pure function of its inputs and
//! tests can compare trees instead of file bytes.

use std::fs;
use std::io;
use std::path::Path;

/// Format a coordinate without trailing zeros.
pub fn num(v: f64) -> String {
    let s = format!("{v:.6}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() || s == "-" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
    pub anchor: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub transform: String,
    pub children: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Rect(Rect),
    Line(Line),
    Text(Text),
    Group(Group),
}

/// A complete SVG image.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub width: f64,
    pub height: f64,
    pub elements: Vec<Element>,
}

impl Element {
    fn write(&self, out: &mut String, indent: usize) {
        let pad = "  ".repeat(indent);
        match self {
            Element::Rect(r) => {
                out.push_str(&format!(
                    "{pad}<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                    num(r.x),
                    num(r.y),
                    num(r.width),
                    num(r.height),
                    r.fill,
                    r.stroke,
                    num(r.stroke_width),
                ));
            }
            Element::Line(l) => {
                out.push_str(&format!(
                    "{pad}<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>\n",
                    num(l.x1),
                    num(l.y1),
                    num(l.x2),
                    num(l.y2),
                    l.stroke,
                    num(l.stroke_width),
                ));
            }
            Element::Text(t) => {
                out.push_str(&format!(
                    "{pad}<text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"{}\" font-family=\"sans-serif\" font-weight=\"bold\">{}</text>\n",
                    num(t.x),
                    num(t.y),
                    num(t.font_size),
                    t.anchor,
                    escape(&t.content),
                ));
            }
            Element::Group(g) => {
                out.push_str(&format!("{pad}<g transform=\"{}\">\n", g.transform));
                for child in &g.children {
                    child.write(out, indent + 1);
                }
                out.push_str(&format!("{pad}</g>\n"));
            }
        }
    }
}

impl Document {
    /// Serialize the whole document.
    pub fn to_svg(&self) -> String {
        let mut out = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\">\n",
            num(self.width),
            num(self.height),
        );
        for element in &self.elements {
            element.write(&mut out, 1);
        }
        out.push_str("</svg>\n");
        out
    }

    pub fn write_to(&self, path: &Path) -> io::Result<()> {
        fs::write(path, self.to_svg())
    }
}
