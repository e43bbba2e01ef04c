//! Pure validators over a postback in progress.
//!
//! A failed constraint marks the session invalid but still returns the
//! best-effort value wherever one exists, so the UI can redisplay what the
//! user typed. Message templates use `{min}`/`{max}`-style placeholders.

use super::session::Postback;

/// Substitutes `{name}` placeholders; unknown placeholders pass through.
fn expand(template: &str, vars: &[(&str, String)]) -> String {
    let mut text = template.to_string();
    for (name, value) in vars {
        text = text.replace(&format!("{{{name}}}"), value);
    }
    text
}

#[derive(Clone, Debug)]
pub struct StringRules {
    pub required: bool,
    /// Optional empty input becomes `None` when set, `Some("")` otherwise.
    pub use_none: bool,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub required_message: String,
    pub min_len_message: String,
    pub max_len_message: String,
}

impl Default for StringRules {
    fn default() -> Self {
        Self {
            required: true,
            use_none: true,
            min_len: None,
            max_len: None,
            required_message: "Required.".to_string(),
            min_len_message: "Please enter at least {min} characters.".to_string(),
            max_len_message: "Cannot be longer than {max} characters.".to_string(),
        }
    }
}

/// Fetches, trims and length-checks a string parameter.
///
/// Empty + required records the required message and returns the empty
/// string; a length violation records its message and still returns the
/// out-of-range value.
pub fn valid_string(pb: &mut Postback<'_>, key: &str, rules: &StringRules) -> Option<String> {
    let value = pb.get(key).trim().to_string();
    let len = value.chars().count();
    let vars = [
        ("min", rules.min_len.map(|v| v.to_string()).unwrap_or_default()),
        ("max", rules.max_len.map(|v| v.to_string()).unwrap_or_default()),
        ("len", len.to_string()),
        ("key", key.to_string()),
        ("value", value.clone()),
    ];

    if value.is_empty() {
        if rules.required {
            pb.invalid(key, &expand(&rules.required_message, &vars));
            return Some(value);
        }
        return if rules.use_none {
            None
        } else {
            Some(String::new())
        };
    }
    if let Some(min) = rules.min_len {
        if len < min {
            pb.invalid(key, &expand(&rules.min_len_message, &vars));
            return Some(value);
        }
    }
    if let Some(max) = rules.max_len {
        if len > max {
            pb.invalid(key, &expand(&rules.max_len_message, &vars));
            return Some(value);
        }
    }
    Some(value)
}

#[derive(Clone, Debug)]
pub struct IntRules {
    pub required: bool,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    /// Sentinel values treated as "no selection", e.g. -1 for an unset
    /// select control.
    pub missing_values: Vec<i64>,
    pub required_message: String,
    pub not_a_number_message: String,
    pub min_value_message: String,
    pub max_value_message: String,
}

impl Default for IntRules {
    fn default() -> Self {
        Self {
            required: true,
            min_value: None,
            max_value: None,
            missing_values: Vec::new(),
            required_message: "Required.".to_string(),
            not_a_number_message: "Must be a number.".to_string(),
            min_value_message: "Cannot be less than {min}.".to_string(),
            max_value_message: "Cannot be greater than {max}.".to_string(),
        }
    }
}

/// Fetches and parses an integer parameter.
///
/// Required/empty handling is delegated to [`valid_string`]; non-numeric
/// input records the not-a-number message and yields `None`; a sentinel
/// "missing" value yields `None` (recording the required message when the
/// field is required); a bound violation records its message but still
/// returns the number.
pub fn valid_int(pb: &mut Postback<'_>, key: &str, rules: &IntRules) -> Option<i64> {
    let string_rules = StringRules {
        required: rules.required,
        use_none: true,
        required_message: rules.required_message.clone(),
        ..StringRules::default()
    };
    let s = valid_string(pb, key, &string_rules)?;
    if !pb.field_valid(key) {
        return None;
    }

    if !is_integer_literal(&s) {
        tracing::warn!(value = %s, key, "not a number");
        pb.invalid(key, &rules.not_a_number_message);
        return None;
    }
    let i: i64 = match s.parse() {
        Ok(i) => i,
        Err(_) => {
            tracing::warn!(value = %s, key, "integer out of range");
            pb.invalid(key, &rules.not_a_number_message);
            return None;
        }
    };

    if rules.missing_values.contains(&i) {
        if rules.required {
            pb.invalid(key, &rules.required_message);
        }
        return None;
    }

    let vars = [
        ("min", rules.min_value.map(|v| v.to_string()).unwrap_or_default()),
        ("max", rules.max_value.map(|v| v.to_string()).unwrap_or_default()),
        ("value", i.to_string()),
        ("key", key.to_string()),
    ];
    if let Some(min) = rules.min_value {
        if i < min {
            pb.invalid(key, &expand(&rules.min_value_message, &vars));
            return Some(i);
        }
    }
    if let Some(max) = rules.max_value {
        if i > max {
            pb.invalid(key, &expand(&rules.max_value_message, &vars));
            return Some(i);
        }
    }
    Some(i)
}

fn is_integer_literal(s: &str) -> bool {
    let digits = s.strip_prefix('-').unwrap_or(s);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// True only for the literal tokens "1", "yes", "on" and "True"
/// (case-sensitive). Never records an error.
pub fn valid_bool(pb: &mut Postback<'_>, key: &str) -> bool {
    matches!(pb.get(key).as_str(), "1" | "yes" | "on" | "True")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forms::session::PostbackSession;
    use crate::testing::FakeRequest;

    fn postback_over<'a>(
        request: &'a FakeRequest,
        session: &'a mut PostbackSession,
    ) -> Postback<'a> {
        Postback { request, session }
    }

    #[test]
    fn required_empty_string_is_invalid_and_empty() {
        let request = FakeRequest::post("/").with_param("name", "   ");
        let mut session = PostbackSession::new();
        let mut pb = postback_over(&request, &mut session);

        let value = valid_string(&mut pb, "name", &StringRules::default());
        assert_eq!(value, Some(String::new()));
        assert!(!session.field_valid("name"));
        assert_eq!(session.message("name"), Some("Required."));
    }

    #[test]
    fn optional_empty_string_honors_use_none() {
        let request = FakeRequest::post("/");
        let mut session = PostbackSession::new();
        let mut pb = postback_over(&request, &mut session);
        let rules = StringRules {
            required: false,
            ..StringRules::default()
        };
        assert_eq!(valid_string(&mut pb, "a", &rules), None);

        let rules = StringRules {
            required: false,
            use_none: false,
            ..StringRules::default()
        };
        assert_eq!(valid_string(&mut pb, "b", &rules), Some(String::new()));
        assert!(session.is_valid());
    }

    #[test]
    fn short_string_is_returned_despite_violation() {
        let request = FakeRequest::post("/").with_param("name", "ab");
        let mut session = PostbackSession::new();
        let mut pb = postback_over(&request, &mut session);
        let rules = StringRules {
            min_len: Some(3),
            ..StringRules::default()
        };

        let value = valid_string(&mut pb, "name", &rules);
        assert_eq!(value, Some("ab".to_string()));
        assert_eq!(
            session.message("name"),
            Some("Please enter at least 3 characters.")
        );
    }

    #[test]
    fn long_string_is_returned_despite_violation() {
        let request = FakeRequest::post("/").with_param("name", "abcdef");
        let mut session = PostbackSession::new();
        let mut pb = postback_over(&request, &mut session);
        let rules = StringRules {
            max_len: Some(4),
            ..StringRules::default()
        };

        assert_eq!(valid_string(&mut pb, "name", &rules), Some("abcdef".into()));
        assert_eq!(
            session.message("name"),
            Some("Cannot be longer than 4 characters.")
        );
    }

    #[test]
    fn non_numeric_input_does_not_panic() {
        let request = FakeRequest::post("/").with_param("count", "12a");
        let mut session = PostbackSession::new();
        let mut pb = postback_over(&request, &mut session);

        assert_eq!(valid_int(&mut pb, "count", &IntRules::default()), None);
        assert_eq!(session.message("count"), Some("Must be a number."));
    }

    #[test]
    fn negative_numbers_parse() {
        let request = FakeRequest::post("/").with_param("count", "-42");
        let mut session = PostbackSession::new();
        let mut pb = postback_over(&request, &mut session);

        assert_eq!(valid_int(&mut pb, "count", &IntRules::default()), Some(-42));
        assert!(session.is_valid());
    }

    #[test]
    fn required_missing_sentinel_is_invalid_and_none() {
        let request = FakeRequest::post("/").with_param("year", "-1");
        let mut session = PostbackSession::new();
        let mut pb = postback_over(&request, &mut session);
        let rules = IntRules {
            missing_values: vec![-1],
            ..IntRules::default()
        };

        assert_eq!(valid_int(&mut pb, "year", &rules), None);
        assert_eq!(session.message("year"), Some("Required."));
    }

    #[test]
    fn optional_missing_sentinel_is_silently_none() {
        let request = FakeRequest::post("/").with_param("year", "-1");
        let mut session = PostbackSession::new();
        let mut pb = postback_over(&request, &mut session);
        let rules = IntRules {
            required: false,
            missing_values: vec![-1],
            ..IntRules::default()
        };

        assert_eq!(valid_int(&mut pb, "year", &rules), None);
        assert!(session.is_valid());
    }

    #[test]
    fn bound_violation_still_returns_the_number() {
        let request = FakeRequest::post("/").with_param("count", "99");
        let mut session = PostbackSession::new();
        let mut pb = postback_over(&request, &mut session);
        let rules = IntRules {
            max_value: Some(10),
            ..IntRules::default()
        };

        assert_eq!(valid_int(&mut pb, "count", &rules), Some(99));
        assert_eq!(
            session.message("count"),
            Some("Cannot be greater than 10.")
        );
    }

    #[test]
    fn bool_matches_literal_tokens_only() {
        let request = FakeRequest::post("/")
            .with_param("a", "1")
            .with_param("b", "yes")
            .with_param("c", "on")
            .with_param("d", "True")
            .with_param("e", "true")
            .with_param("f", "0");
        let mut session = PostbackSession::new();
        let mut pb = postback_over(&request, &mut session);

        assert!(valid_bool(&mut pb, "a"));
        assert!(valid_bool(&mut pb, "b"));
        assert!(valid_bool(&mut pb, "c"));
        assert!(valid_bool(&mut pb, "d"));
        assert!(!valid_bool(&mut pb, "e"));
        assert!(!valid_bool(&mut pb, "f"));
        assert!(!valid_bool(&mut pb, "absent"));
        assert!(session.is_valid());
    }
}
