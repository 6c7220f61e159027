//! Documentation blocks

use scenekit_schema::{transition_spec_fields, FieldSchema, FieldType};
use std::borrow::Cow;
use serde::Serialize;
use std::fmt::Write;

/// Documentation for a single field, ready to be written as text or HTML
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocBlock {
    pub field: String,
    #[serde(rename = "type")]
    pub type_label: String,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    pub animatable: bool,
    /// Value of the field in a rendered record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Blocks for the fields of a nested struct or transition entry
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DocBlock>,
}

impl DocBlock {
    pub fn from_field(field: &FieldSchema) -> Self {
        let range = if field.has_range() {
            let min = field.min.map(|v| v.to_string()).unwrap_or_default();
            let max = field.max.map(|v| v.to_string()).unwrap_or_default();
            Some(format!("{} .. {}", min, max))
        } else {
            None
        };

        Self {
            field: field.name.clone(),
            type_label: field.field_type.label(),
            required: field.required,
            default: field.default.as_ref().map(format_value),
            description: field.description.clone(),
            range,
            animatable: field.animatable,
            value: None,
            children: nested_fields(&field.field_type)
                .iter()
                .map(DocBlock::from_field)
                .collect(),
        }
    }

    pub fn with_value(mut self, value: &toml::Value) -> Self {
        self.value = Some(format_value(value));
        self
    }

    /// Plain text, one line per field plus indented comment lines
    pub fn to_text(&self, include_descriptions: bool) -> String {
        let mut out = String::new();
        self.write_text(&mut out, 1, include_descriptions);
        out
    }

    fn write_text(&self, out: &mut String, depth: usize, include_descriptions: bool) {
        let indent = "  ".repeat(depth);
        let required = if self.required { " (required)" } else { "" };

        let _ = write!(out, "{}{} : {}{}", indent, self.field, self.type_label, required);
        match (&self.value, &self.default) {
            (Some(value), _) => {
                let _ = write!(out, " = {}", value);
            }
            (None, Some(default)) => {
                let _ = write!(out, " (default {})", default);
            }
            (None, None) => {}
        }
        out.push('\n');

        if include_descriptions {
            if let Some(desc) = &self.description {
                let _ = writeln!(out, "{}  # {}", indent, desc);
            }
        }
        if let Some(range) = &self.range {
            let _ = writeln!(out, "{}  # Range: {}", indent, range);
        }
        if self.animatable {
            let _ = writeln!(out, "{}  # Animatable", indent);
        }
        for child in &self.children {
            child.write_text(out, depth + 1, include_descriptions);
        }
    }

    /// A `<dt>`/`<dd>` pair; nested struct fields become a nested `<dl>`
    pub fn to_html(&self, include_descriptions: bool) -> String {
        let mut out = String::new();
        self.write_html(&mut out, include_descriptions);
        out
    }

    fn write_html(&self, out: &mut String, include_descriptions: bool) {
        let _ = write!(
            out,
            "<dt id=\"field-{name}\"><code>{name}</code> <span class=\"type\">{ty}</span>",
            name = escape_html(&self.field),
            ty = escape_html(&self.type_label)
        );
        if self.required {
            out.push_str(" <span class=\"required\">required</span>");
        }
        out.push_str("</dt>\n<dd>");

        if let Some(value) = &self.value {
            let _ = write!(out, "<p class=\"value\"><code>{}</code></p>", escape_html(value));
        }
        if include_descriptions {
            if let Some(desc) = &self.description {
                let _ = write!(out, "<p>{}</p>", escape_html(desc));
            }
        }
        if let Some(default) = &self.default {
            let _ = write!(
                out,
                "<p class=\"default\">Default: <code>{}</code></p>",
                escape_html(default)
            );
        }
        if let Some(range) = &self.range {
            let _ = write!(out, "<p class=\"range\">Range: {}</p>", escape_html(range));
        }
        if self.animatable {
            out.push_str("<p class=\"animatable\">Animatable</p>");
        }
        if !self.children.is_empty() {
            out.push_str("\n<dl>\n");
            for child in &self.children {
                child.write_html(out, include_descriptions);
            }
            out.push_str("</dl>\n");
        }
        out.push_str("</dd>\n");
    }
}

/// Fields documented under a block; a transition lists the settings of one entry
fn nested_fields(field_type: &FieldType) -> Cow<'_, [FieldSchema]> {
    match field_type {
        FieldType::Struct { fields } => Cow::Borrowed(fields),
        FieldType::List { element } => nested_fields(element),
        FieldType::Transition => Cow::Owned(transition_spec_fields()),
        _ => Cow::Borrowed(&[]),
    }
}

/// Format a value the way entity definitions write it
pub fn format_value(v: &toml::Value) -> String {
    match v {
        toml::Value::String(s) => format!("\"{}\"", s),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        toml::Value::Table(t) => {
            let items: Vec<String> = t
                .iter()
                .map(|(k, v)| format!("{}: {}", k, format_value(v)))
                .collect();
            format!("{{ {} }}", items.join(", "))
        }
        toml::Value::Datetime(d) => d.to_string(),
    }
}

pub(crate) fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
