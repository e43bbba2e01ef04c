use std::sync::Arc;

use chrono::NaiveDate;

use formbox::forms::{
    Accessor, CellBinding, DateField, DatePart, FieldDefault, Form, FormSchema,
    RenderContext, RenderParams, StringField, TextField, render_field_tag,
};
use formbox::testing::FakeRequest;

#[derive(Debug, Default)]
struct TaskValues {
    title: Option<String>,
    notes: Option<String>,
    due: Option<NaiveDate>,
}

#[derive(Debug, Default, Clone)]
struct TaskModel {
    title: Option<String>,
    notes: Option<String>,
    due: Option<NaiveDate>,
}

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 15).unwrap()
}

fn task_schema() -> Arc<FormSchema<TaskValues, TaskModel>> {
    FormSchema::builder()
        .field(
            // Named so alphabetical order would differ from declaration
            // order.
            StringField::new(
                "title",
                Accessor {
                    get: |v: &TaskValues| v.title.clone(),
                    set: |v, value| v.title = value,
                },
            )
            .min_len(3)
            .max_len(60)
            .model(Accessor {
                get: |m: &TaskModel| m.title.clone(),
                set: |m, value| m.title = value,
            }),
        )
        .field(
            TextField::new(
                "notes",
                Accessor {
                    get: |v: &TaskValues| v.notes.clone(),
                    set: |v, value| v.notes = value,
                },
            )
            .required(false)
            .rows(5)
            .model(Accessor {
                get: |m: &TaskModel| m.notes.clone(),
                set: |m, value| m.notes = value,
            }),
        )
        .field(
            DateField::new(
                "due",
                Accessor {
                    get: |v: &TaskValues| v.due,
                    set: |v, value| v.due = value,
                },
            )
            .reference_date(reference_date())
            .default_value(FieldDefault::Value(None))
            .model(Accessor {
                get: |m: &TaskModel| m.due,
                set: |m, value| m.due = value,
            }),
        )
        .build()
}

#[test]
fn fields_keep_declaration_order() {
    let schema = task_schema();
    let names: Vec<_> = schema.fields().map(|f| f.name().to_string()).collect();
    assert_eq!(names, vec!["title", "notes", "due"]);

    let ordinals: Vec<_> = schema.fields().map(|f| f.ordinal()).collect();
    assert_eq!(ordinals, vec![0, 1, 2]);
}

#[test]
fn new_form_carries_defaults() {
    let form = Form::new(task_schema());
    assert_eq!(form.values.title.as_deref(), Some(""));
    assert_eq!(form.values.notes.as_deref(), Some(""));
    assert_eq!(form.values.due, None);
    assert!(form.is_valid());
}

#[test]
fn valid_postback_binds_all_fields() {
    let mut form = Form::new(task_schema());
    let request = FakeRequest::post("/tasks")
        .with_param("title", "  Water the plants  ")
        .with_param("notes", "every other day")
        .with_param("due_year", "2023")
        .with_param("due_month", "6")
        .with_param("due_day", "30");

    form.postback(&request);

    assert!(form.is_valid());
    assert_eq!(form.values.title.as_deref(), Some("Water the plants"));
    assert_eq!(form.values.notes.as_deref(), Some("every other day"));
    assert_eq!(form.values.due, NaiveDate::from_ymd_opt(2023, 6, 30));
}

#[test]
fn invalid_field_still_holds_best_effort_value() {
    let mut form = Form::new(task_schema());
    let request = FakeRequest::post("/tasks")
        .with_param("title", "ab")
        .with_param("due_year", "2023")
        .with_param("due_month", "6")
        .with_param("due_day", "30");

    form.postback(&request);

    assert!(!form.is_valid());
    // The out-of-range value is kept so the UI can redisplay it.
    assert_eq!(form.values.title.as_deref(), Some("ab"));
    assert_eq!(
        form.field_error("title"),
        Some("Please enter at least 3 characters.")
    );
}

#[test]
fn impossible_date_marks_the_day_subfield() {
    let mut form = Form::new(task_schema());
    let request = FakeRequest::post("/tasks")
        .with_param("title", "Check calendar")
        .with_param("due_year", "2023")
        .with_param("due_month", "2")
        .with_param("due_day", "30");

    form.postback(&request);

    assert!(!form.is_valid());
    assert_eq!(form.values.due, None);
    let session = form.session().unwrap();
    assert_eq!(
        session.message("due_day"),
        Some("No such day in February 2023")
    );
    assert!(session.field_valid("due_year"));
    assert!(session.field_valid("due_month"));
}

#[test]
fn out_of_window_year_never_assembles_a_date() {
    let mut form = Form::new(task_schema());
    let request = FakeRequest::post("/tasks")
        .with_param("title", "Check calendar")
        .with_param("due_year", "2050")
        .with_param("due_month", "6")
        .with_param("due_day", "15");

    form.postback(&request);

    assert!(!form.is_valid());
    assert_eq!(form.values.due, None);
    assert_eq!(
        form.session().unwrap().message("due_year"),
        Some("Cannot be greater than 2033.")
    );
}

#[test]
fn missing_date_part_yields_none_without_panic() {
    let mut form = Form::new(task_schema());
    let request = FakeRequest::post("/tasks")
        .with_param("title", "Check calendar")
        .with_param("due_year", "2023")
        .with_param("due_month", "6");

    form.postback(&request);

    assert!(!form.is_valid());
    assert_eq!(form.values.due, None);
}

#[test]
fn first_invalid_walks_declaration_order_and_maps_subkeys() {
    let mut form = Form::new(task_schema());
    // Both title and the date are invalid; title is declared first.
    let request = FakeRequest::post("/tasks")
        .with_param("title", "ab")
        .with_param("due_year", "2023")
        .with_param("due_month", "2")
        .with_param("due_day", "30");

    form.postback(&request);

    let (name, message) = form.first_invalid().unwrap();
    assert_eq!(name, "title");
    assert_eq!(message, "Please enter at least 3 characters.");

    // Only the date invalid: the composite field claims its sub-key error
    // under its own name.
    let mut form = Form::new(task_schema());
    let request = FakeRequest::post("/tasks")
        .with_param("title", "Check calendar")
        .with_param("due_year", "2023")
        .with_param("due_month", "2")
        .with_param("due_day", "30");
    form.postback(&request);

    let (name, message) = form.first_invalid().unwrap();
    assert_eq!(name, "due");
    assert_eq!(message, "No such day in February 2023");
}

#[test]
fn load_and_save_round_trip_through_a_model() {
    let schema = task_schema();
    let mut form = Form::new(schema.clone());
    let model = TaskModel {
        title: Some("Water the plants".to_string()),
        notes: Some("rainwater only".to_string()),
        due: NaiveDate::from_ymd_opt(2023, 7, 1),
    };

    form.load(&model);
    assert_eq!(form.values.title.as_deref(), Some("Water the plants"));
    assert_eq!(form.values.due, NaiveDate::from_ymd_opt(2023, 7, 1));

    form.values.title = Some("Water the cactus".to_string());
    let mut saved = TaskModel::default();
    form.save(&mut saved);
    assert_eq!(saved.title.as_deref(), Some("Water the cactus"));
    assert_eq!(saved.notes.as_deref(), Some("rainwater only"));
    assert_eq!(saved.due, NaiveDate::from_ymd_opt(2023, 7, 1));
}

#[test]
fn string_field_renders_current_value_and_classes() {
    let mut form = Form::new(task_schema());
    form.values.title = Some("Hello <world>".to_string());

    let mut params = RenderParams::new();
    params.insert("klass".to_string(), "wide".to_string());
    let markup = form.render_field("title", &params).unwrap();

    assert!(markup.starts_with("<input "));
    assert!(markup.contains(r#"id="title""#));
    assert!(markup.contains(r#"name="title""#));
    assert!(markup.contains(r#"value="Hello &lt;world&gt;""#));
    assert!(markup.contains(r#"class="wide""#));
}

#[test]
fn text_field_renders_a_textarea_with_rows() {
    let mut form = Form::new(task_schema());
    form.values.notes = Some("line one".to_string());

    let markup = form.render_field("notes", &RenderParams::new()).unwrap();
    assert!(markup.starts_with("<textarea "));
    assert!(markup.contains(r#"rows="5""#));
    assert!(markup.ends_with(">line one</textarea>"));
}

#[test]
fn date_field_renders_three_selects_in_configured_order() {
    let schema: Arc<FormSchema<TaskValues, TaskModel>> = FormSchema::builder()
        .field(
            DateField::new(
                "due",
                Accessor {
                    get: |v: &TaskValues| v.due,
                    set: |v, value| v.due = value,
                },
            )
            .reference_date(reference_date())
            .past_years(2)
            .future_years(2)
            .order([DatePart::Year, DatePart::Month, DatePart::Day])
            .default_value(FieldDefault::Value(NaiveDate::from_ymd_opt(2023, 2, 5))),
        )
        .build();
    let form: Form<TaskValues, TaskModel> = Form::new(schema);

    let markup = form.render_field("due", &RenderParams::new()).unwrap();

    let year_at = markup.find(r#"name="due_year""#).unwrap();
    let month_at = markup.find(r#"name="due_month""#).unwrap();
    let day_at = markup.find(r#"name="due_day""#).unwrap();
    assert!(year_at < month_at && month_at < day_at);

    // Window is 2021..=2025 around the reference year.
    assert!(markup.contains(r#"<option value="2021">2021</option>"#));
    assert!(markup.contains(r#"<option value="2025">2025</option>"#));
    assert!(!markup.contains(r#"<option value="2020">"#));

    // Current value selects its parts; day labels are zero-padded.
    assert!(markup.contains(r#"<option value="2023" selected="selected">2023</option>"#));
    assert!(markup.contains(r#"<option value="2" selected="selected">February</option>"#));
    assert!(markup.contains(r#"<option value="5" selected="selected">05</option>"#));
}

#[test]
fn field_tag_wraps_markup_in_a_cell() {
    let mut form = Form::new(task_schema());
    let request = FakeRequest::post("/tasks").with_param("title", "ab");
    form.postback(&request);

    let mut ctx = RenderContext::new();
    ctx.define_cell(
        "row",
        Arc::new(|binding: &CellBinding| {
            format!(
                "<div class=\"{}\">{}<span>{}</span></div>",
                binding.error_class, binding.markup, binding.error
            )
        }),
    );

    let html = render_field_tag(&form, "title", Some("row"), &RenderParams::new(), &ctx);
    assert!(html.starts_with("<div class=\"error\">"));
    assert!(html.contains("<input "));
    assert!(html.ends_with("<span>Please enter at least 3 characters.</span></div>"));
}

#[test]
fn missing_cell_renders_a_placeholder() {
    let form = Form::new(task_schema());
    let html = render_field_tag(
        &form,
        "title",
        Some("row"),
        &RenderParams::new(),
        &RenderContext::new(),
    );
    assert_eq!(html, "(! cell row is missing !)");
}

#[test]
fn render_is_deterministic() {
    let form = Form::new(task_schema());
    let params = RenderParams::new();
    let first = form.render_field("due", &params).unwrap();
    let second = form.render_field("due", &params).unwrap();
    assert_eq!(first, second);
}
