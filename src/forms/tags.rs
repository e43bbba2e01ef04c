//! Template-tag boundary.
//!
//! The template engine calls in here with a form, a field name, optional
//! per-call parameters and an optional cell name. Cells are named wrapper
//! fragments registered on the render context; a missing cell renders a
//! literal placeholder instead of failing the whole template.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::field::RenderParams;
use super::form::Form;

/// Values handed to a cell template when it wraps a rendered field.
#[derive(Clone, Debug)]
pub struct CellBinding {
    /// Field name (`f` in templates).
    pub field: String,
    /// Rendered field markup (`v`).
    pub markup: String,
    /// `"error"` when the field has an error, empty otherwise (`ec`).
    pub error_class: String,
    /// Error message or empty (`e`).
    pub error: String,
}

/// A named wrapper fragment; the engine-side nodelist is opaque here.
pub trait CellTemplate: Send + Sync {
    fn render_cell(&self, binding: &CellBinding) -> String;
}

impl<F> CellTemplate for F
where
    F: Fn(&CellBinding) -> String + Send + Sync,
{
    fn render_cell(&self, binding: &CellBinding) -> String {
        self(binding)
    }
}

/// Cells visible to field tags during one template render.
#[derive(Clone, Default)]
pub struct RenderContext {
    cells: BTreeMap<String, Arc<dyn CellTemplate>>,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define_cell(&mut self, name: impl Into<String>, cell: Arc<dyn CellTemplate>) {
        self.cells.insert(name.into(), cell);
    }

    pub fn cell(&self, name: &str) -> Option<&Arc<dyn CellTemplate>> {
        self.cells.get(name)
    }
}

/// Entry point for the `field` template tag: renders the field, surfaces
/// its error message and optionally wraps the result in a named cell.
pub fn render_field_tag<V, M>(
    form: &Form<V, M>,
    field_name: &str,
    cell_name: Option<&str>,
    params: &RenderParams,
    ctx: &RenderContext,
) -> String {
    let Some(field) = form.field(field_name) else {
        return format!("(! unknown field {field_name} !)");
    };
    let markup = field.render(&form.values, params);
    let error = form.field_error(field_name);

    match cell_name {
        None => markup,
        Some(name) => match ctx.cell(name) {
            None => format!("(! cell {name} is missing !)"),
            Some(cell) => cell.render_cell(&CellBinding {
                field: field.name().to_string(),
                markup,
                error_class: if error.is_some() { "error" } else { "" }.to_string(),
                error: error.unwrap_or_default().to_string(),
            }),
        },
    }
}

/// Helper for the `default` template tag: keeps an existing context value,
/// otherwise computes one.
pub fn default_value(
    context: &mut BTreeMap<String, String>,
    name: &str,
    produce: impl FnOnce() -> String,
) {
    if !context.contains_key(name) {
        context.insert(name.to_string(), produce());
    }
}
