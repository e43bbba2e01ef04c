//! Markup helpers for field rendering.
//!
//! Deterministic string builders; attribute order is exactly the order the
//! caller supplies.

/// HTML-escapes ampersands, angle brackets and both quote styles.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// One attribute value in a rendered tag.
///
/// `Missing` and `Flag(false)` are skipped, `Flag(true)` renders as
/// `k="k"`, and `Tokens` joins its non-`None` entries with spaces (useful
/// for CSS class lists).
#[derive(Clone, Debug)]
pub enum AttrValue {
    Missing,
    Flag(bool),
    Text(String),
    Tokens(Vec<Option<String>>),
}

impl AttrValue {
    pub fn opt(value: Option<&str>) -> Self {
        match value {
            Some(text) => AttrValue::Text(text.to_string()),
            None => AttrValue::Missing,
        }
    }
}

/// Renders one tag; self-closing unless there is content or the tag is a
/// textarea (which always needs a closing tag).
pub fn render_tag(tag: &str, content: Option<&str>, attrs: &[(&str, AttrValue)]) -> String {
    let mut text = format!("<{tag}");
    for (name, value) in attrs {
        let rendered = match value {
            AttrValue::Missing | AttrValue::Flag(false) => continue,
            AttrValue::Flag(true) => (*name).to_string(),
            AttrValue::Text(v) => v.clone(),
            AttrValue::Tokens(tokens) => tokens
                .iter()
                .flatten()
                .cloned()
                .collect::<Vec<_>>()
                .join(" "),
        };
        text.push(' ');
        text.push_str(name);
        text.push_str("=\"");
        text.push_str(&escape(&rendered));
        text.push('"');
    }
    match content {
        Some(body) if !body.is_empty() || tag == "textarea" => {
            format!("{text}>{body}</{tag}>")
        }
        None if tag == "textarea" => format!("{text}></{tag}>"),
        _ => format!("{text} />"),
    }
}

/// One entry of a select control.
#[derive(Clone, Debug)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

pub fn render_option(option: &SelectOption, current: Option<&str>) -> String {
    render_tag(
        "option",
        Some(&escape(&option.label)),
        &[
            ("value", AttrValue::Text(option.value.clone())),
            ("selected", AttrValue::Flag(current == Some(option.value.as_str()))),
        ],
    )
}

pub fn render_select(
    options: &[SelectOption],
    current: Option<&str>,
    name: &str,
    klass: Vec<Option<String>>,
) -> String {
    let rendered: String = options
        .iter()
        .map(|option| render_option(option, current))
        .collect();
    render_tag(
        "select",
        Some(&rendered),
        &[
            ("id", AttrValue::Text(name.to_string())),
            ("name", AttrValue::Text(name.to_string())),
            ("class", AttrValue::Tokens(klass)),
        ],
    )
}
