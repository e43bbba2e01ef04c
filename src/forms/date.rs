//! Composite calendar-date field: three linked select controls posting
//! back as `<name>_year`, `<name>_month` and `<name>_day`.

use chrono::{Datelike, Local, NaiveDate};

use super::field::{Accessor, FieldDefault, FormField, RenderParams};
use super::render::{SelectOption, render_select};
use super::session::Postback;
use super::validators::{IntRules, valid_int};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn default_today() -> Option<NaiveDate> {
    Some(today())
}

/// Date input split into year/month/day selects.
///
/// The year window is `[reference_year - past_years, reference_year +
/// future_years]`, each side collapsing to the reference year when the
/// corresponding `past`/`future` flag is off.
pub struct DateField<V, M> {
    name: String,
    ordinal: usize,
    year_key: String,
    month_key: String,
    day_key: String,
    default: FieldDefault<Option<NaiveDate>>,
    reference_date: NaiveDate,
    past: bool,
    future: bool,
    past_years: i32,
    future_years: i32,
    order: [DatePart; 3],
    month_format: String,
    day_with_zeros: bool,
    no_such_day_message: String,
    klass: Option<String>,
    value: Accessor<V, Option<NaiveDate>>,
    model: Option<Accessor<M, Option<NaiveDate>>>,
}

impl<V, M> DateField<V, M> {
    pub const MONTH_FULL: &'static str = "%B";
    pub const MONTH_ABBREV: &'static str = "%b";
    pub const MONTH_ORDINAL_AND_FULL: &'static str = "%m - %B";

    pub fn new(name: impl Into<String>, value: Accessor<V, Option<NaiveDate>>) -> Self {
        let name = name.into();
        Self {
            year_key: format!("{name}_year"),
            month_key: format!("{name}_month"),
            day_key: format!("{name}_day"),
            name,
            ordinal: 0,
            default: FieldDefault::Producer(default_today),
            reference_date: today(),
            past: true,
            future: true,
            past_years: 10,
            future_years: 10,
            order: [DatePart::Month, DatePart::Day, DatePart::Year],
            month_format: Self::MONTH_FULL.to_string(),
            day_with_zeros: true,
            no_such_day_message: "No such day in %B %Y".to_string(),
            klass: None,
            value,
            model: None,
        }
    }

    pub fn default_value(mut self, default: FieldDefault<Option<NaiveDate>>) -> Self {
        self.default = default;
        self
    }

    pub fn reference_date(mut self, reference_date: NaiveDate) -> Self {
        self.reference_date = reference_date;
        self
    }

    pub fn past(mut self, past: bool) -> Self {
        self.past = past;
        self
    }

    pub fn future(mut self, future: bool) -> Self {
        self.future = future;
        self
    }

    pub fn past_years(mut self, past_years: i32) -> Self {
        self.past_years = past_years;
        self
    }

    pub fn future_years(mut self, future_years: i32) -> Self {
        self.future_years = future_years;
        self
    }

    pub fn order(mut self, order: [DatePart; 3]) -> Self {
        self.order = order;
        self
    }

    pub fn month_format(mut self, month_format: impl Into<String>) -> Self {
        self.month_format = month_format.into();
        self
    }

    pub fn day_with_zeros(mut self, day_with_zeros: bool) -> Self {
        self.day_with_zeros = day_with_zeros;
        self
    }

    pub fn no_such_day_message(mut self, message: impl Into<String>) -> Self {
        self.no_such_day_message = message.into();
        self
    }

    pub fn klass(mut self, klass: impl Into<String>) -> Self {
        self.klass = Some(klass.into());
        self
    }

    pub fn model(mut self, model: Accessor<M, Option<NaiveDate>>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn min_year(&self) -> i32 {
        if self.past {
            self.reference_date.year() - self.past_years
        } else {
            self.reference_date.year()
        }
    }

    pub fn max_year(&self) -> i32 {
        if self.future {
            self.reference_date.year() + self.future_years
        } else {
            self.reference_date.year()
        }
    }

    fn klass_tokens(&self, part_class: &str, params: &RenderParams) -> Vec<Option<String>> {
        vec![
            self.klass.clone(),
            Some(part_class.to_string()),
            params.get("klass").cloned(),
        ]
    }
}

impl<V: Send + Sync, M: Send + Sync> FormField<V, M> for DateField<V, M> {
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
        let year = valid_int(
            pb,
            &self.year_key,
            &IntRules {
                min_value: Some(self.min_year() as i64),
                max_value: Some(self.max_year() as i64),
                missing_values: vec![-1],
                ..IntRules::default()
            },
        );
        let month = valid_int(
            pb,
            &self.month_key,
            &IntRules {
                min_value: Some(1),
                max_value: Some(12),
                missing_values: vec![-1],
                ..IntRules::default()
            },
        );
        let day = valid_int(
            pb,
            &self.day_key,
            &IntRules {
                min_value: Some(1),
                max_value: Some(31),
                missing_values: vec![-1],
                ..IntRules::default()
            },
        );

        // A sub-part may come back with a value despite a recorded bound
        // violation; an invalid part never contributes to a date.
        let parts_valid = pb.field_valid(&self.year_key)
            && pb.field_valid(&self.month_key)
            && pb.field_valid(&self.day_key);

        let value = match (year, month, day) {
            (Some(year), Some(month), Some(day)) if parts_valid => {
                let year = i32::try_from(year).ok();
                let month = u32::try_from(month).ok();
                let day = u32::try_from(day).ok();
                match (year, month, day) {
                    (Some(y), Some(m), Some(d)) => match NaiveDate::from_ymd_opt(y, m, d) {
                        Some(date) => Some(date),
                        None => {
                            // Day 31 in a 30-day month and the like.
                            if let Some(anchor) = NaiveDate::from_ymd_opt(y, m, 1) {
                                let message =
                                    anchor.format(&self.no_such_day_message).to_string();
                                pb.invalid(&self.day_key, &message);
                            }
                            None
                        }
                    },
                    _ => None,
                }
            }
            _ => None,
        };
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
        let value = (self.value.get)(values);
        let (year, month, day) = match value {
            Some(date) => (
                date.year().to_string(),
                date.month().to_string(),
                date.day().to_string(),
            ),
            None => ("-1".to_string(), "-1".to_string(), "-1".to_string()),
        };

        let years: Vec<SelectOption> = (self.min_year()..=self.max_year())
            .map(|y| SelectOption::new(y.to_string(), y.to_string()))
            .collect();
        let months: Vec<SelectOption> = (1..=12u32)
            .map(|m| {
                // Anchor on an arbitrary year; only the month name matters.
                let label = NaiveDate::from_ymd_opt(2000, m, 1)
                    .map(|d| d.format(&self.month_format).to_string())
                    .unwrap_or_else(|| m.to_string());
                SelectOption::new(label, m.to_string())
            })
            .collect();
        let days: Vec<SelectOption> = (1..=31u32)
            .map(|d| {
                let label = if self.day_with_zeros {
                    format!("{d:02}")
                } else {
                    d.to_string()
                };
                SelectOption::new(label, d.to_string())
            })
            .collect();

        let year_select = render_select(
            &years,
            Some(&year),
            &self.year_key,
            self.klass_tokens("year-select", params),
        );
        let month_select = render_select(
            &months,
            Some(&month),
            &self.month_key,
            self.klass_tokens("month-select", params),
        );
        let day_select = render_select(
            &days,
            Some(&day),
            &self.day_key,
            self.klass_tokens("day-select", params),
        );

        self.order
            .iter()
            .map(|part| match part {
                DatePart::Year => year_select.as_str(),
                DatePart::Month => month_select.as_str(),
                DatePart::Day => day_select.as_str(),
            })
            .collect()
    }

    fn error_keys(&self) -> Vec<String> {
        vec![
            self.year_key.clone(),
            self.month_key.clone(),
            self.day_key.clone(),
        ]
    }
}
