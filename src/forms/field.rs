//! Field descriptors: schema-level, immutable, shared across requests.
//!
//! A field never stores per-request state; current values live on the form
//! instance's value struct and are reached through explicit accessor pairs
//! supplied at construction time.

use std::collections::BTreeMap;

use super::render::{AttrValue, escape, render_tag};
use super::session::Postback;
use super::validators::{StringRules, valid_string};

/// Per-render parameter overrides coming from the template tag.
pub type RenderParams = BTreeMap<String, String>;

/// Reflection-free get/set pair for one field's slot on `T`.
pub struct Accessor<T, F> {
    pub get: fn(&T) -> F,
    pub set: fn(&mut T, F),
}

/// Default value: a literal or a zero-argument producer.
pub enum FieldDefault<T> {
    Value(T),
    Producer(fn() -> T),
}

impl<T: Clone> FieldDefault<T> {
    pub fn produce(&self) -> T {
        match self {
            FieldDefault::Value(value) => value.clone(),
            FieldDefault::Producer(producer) => producer(),
        }
    }
}

/// One logical form input: ordering, defaults, request binding, model
/// binding and rendering.
///
/// `V` is the form's value struct, `M` the bound domain model. Ordinals
/// are assigned by the schema builder at registration; a form's field
/// order is ascending ordinal, which equals declaration order.
pub trait FormField<V, M>: Send + Sync {
    fn name(&self) -> &str;

    fn ordinal(&self) -> usize;

    fn set_ordinal(&mut self, ordinal: usize);

    /// Sets the field's slot on the value struct to its default.
    fn initialize(&self, values: &mut V);

    /// Binds and validates against the submitted request, storing the
    /// resulting value (valid or not) on the value struct.
    fn postback(&self, values: &mut V, pb: &mut Postback<'_>);

    fn load(&self, values: &mut V, model: &M);

    fn save(&self, values: &V, model: &mut M);

    /// Deterministic markup for the field given the current value and
    /// per-call overrides.
    fn render(&self, values: &V, params: &RenderParams) -> String;

    /// Session keys this field records errors under. Composite fields
    /// return their sub-keys so form-level lookup can map errors back to
    /// the owning field.
    fn error_keys(&self) -> Vec<String> {
        vec![self.name().to_string()]
    }
}

/// Single-line text input backed by [`valid_string`].
pub struct StringField<V, M> {
    name: String,
    ordinal: usize,
    default: FieldDefault<Option<String>>,
    rules: StringRules,
    klass: Option<String>,
    placeholder: Option<String>,
    style: Option<String>,
    value: Accessor<V, Option<String>>,
    model: Option<Accessor<M, Option<String>>>,
}

impl<V, M> StringField<V, M> {
    pub fn new(name: impl Into<String>, value: Accessor<V, Option<String>>) -> Self {
        Self {
            name: name.into(),
            ordinal: 0,
            default: FieldDefault::Value(Some(String::new())),
            rules: StringRules::default(),
            klass: None,
            placeholder: None,
            style: None,
            value,
            model: None,
        }
    }

    pub fn default_value(mut self, default: FieldDefault<Option<String>>) -> Self {
        self.default = default;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.rules.required = required;
        self
    }

    pub fn use_none(mut self, use_none: bool) -> Self {
        self.rules.use_none = use_none;
        self
    }

    pub fn min_len(mut self, min_len: usize) -> Self {
        self.rules.min_len = Some(min_len);
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.rules.max_len = Some(max_len);
        self
    }

    pub fn rules(mut self, rules: StringRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn klass(mut self, klass: impl Into<String>) -> Self {
        self.klass = Some(klass.into());
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn model(mut self, model: Accessor<M, Option<String>>) -> Self {
        self.model = Some(model);
        self
    }
}

impl<V: Send + Sync, M: Send + Sync> FormField<V, M> for StringField<V, M> {
    fn name(&self) -> &str {
        &self.name
    }

    fn ordinal(&self) -> usize {
        self.ordinal
    }

    fn set_ordinal(&mut self, ordinal: usize) {
        self.ordinal = ordinal;
    }

    fn initialize(&self, values: &mut V) {
        (self.value.set)(values, self.default.produce());
    }

    fn postback(&self, values: &mut V, pb: &mut Postback<'_>) {
        let value = valid_string(pb, &self.name, &self.rules);
        (self.value.set)(values, value);
    }

    fn load(&self, values: &mut V, model: &M) {
        if let Some(accessor) = &self.model {
            (self.value.set)(values, (accessor.get)(model));
        }
    }

    fn save(&self, values: &V, model: &mut M) {
        if let Some(accessor) = &self.model {
            (accessor.set)(model, (self.value.get)(values));
        }
    }

    fn render(&self, values: &V, params: &RenderParams) -> String {
        let value = (self.value.get)(values).unwrap_or_default();
        render_tag(
            "input",
            None,
            &[
                ("id", AttrValue::Text(self.name.clone())),
                ("name", AttrValue::Text(self.name.clone())),
                ("type", AttrValue::Text("text".to_string())),
                (
                    "class",
                    AttrValue::Tokens(vec![
                        self.klass.clone(),
                        params.get("klass").cloned(),
                    ]),
                ),
                ("value", AttrValue::Text(value)),
                ("placeholder", AttrValue::opt(self.placeholder.as_deref())),
                ("style", AttrValue::opt(self.style.as_deref())),
            ],
        )
    }
}

/// Multi-line text input; same validation as [`StringField`], rendered as
/// a textarea with a configurable row count.
pub struct TextField<V, M> {
    inner: StringField<V, M>,
    rows: u32,
}

impl<V, M> TextField<V, M> {
    pub fn new(name: impl Into<String>, value: Accessor<V, Option<String>>) -> Self {
        Self {
            inner: StringField::new(name, value),
            rows: 3,
        }
    }

    pub fn rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    pub fn default_value(mut self, default: FieldDefault<Option<String>>) -> Self {
        self.inner = self.inner.default_value(default);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.inner = self.inner.required(required);
        self
    }

    pub fn min_len(mut self, min_len: usize) -> Self {
        self.inner = self.inner.min_len(min_len);
        self
    }

    pub fn max_len(mut self, max_len: usize) -> Self {
        self.inner = self.inner.max_len(max_len);
        self
    }

    pub fn rules(mut self, rules: StringRules) -> Self {
        self.inner = self.inner.rules(rules);
        self
    }

    pub fn klass(mut self, klass: impl Into<String>) -> Self {
        self.inner = self.inner.klass(klass);
        self
    }

    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.inner = self.inner.placeholder(placeholder);
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.inner = self.inner.style(style);
        self
    }

    pub fn model(mut self, model: Accessor<M, Option<String>>) -> Self {
        self.inner = self.inner.model(model);
        self
    }
}

impl<V: Send + Sync, M: Send + Sync> FormField<V, M> for TextField<V, M> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn ordinal(&self) -> usize {
        self.inner.ordinal()
    }

    fn set_ordinal(&mut self, ordinal: usize) {
        self.inner.set_ordinal(ordinal);
    }

    fn initialize(&self, values: &mut V) {
        self.inner.initialize(values);
    }

    fn postback(&self, values: &mut V, pb: &mut Postback<'_>) {
        self.inner.postback(values, pb);
    }

    fn load(&self, values: &mut V, model: &M) {
        self.inner.load(values, model);
    }

    fn save(&self, values: &V, model: &mut M) {
        self.inner.save(values, model);
    }

    fn render(&self, values: &V, params: &RenderParams) -> String {
        let value = (self.inner.value.get)(values).unwrap_or_default();
        render_tag(
            "textarea",
            Some(&escape(&value)),
            &[
                ("id", AttrValue::Text(self.inner.name.clone())),
                ("name", AttrValue::Text(self.inner.name.clone())),
                (
                    "class",
                    AttrValue::Tokens(vec![
                        self.inner.klass.clone(),
                        params.get("klass").cloned(),
                    ]),
                ),
                ("rows", AttrValue::Text(self.rows.to_string())),
                (
                    "placeholder",
                    AttrValue::opt(self.inner.placeholder.as_deref()),
                ),
                ("style", AttrValue::opt(self.inner.style.as_deref())),
            ],
        )
    }
}
