//! Custom CEL functions registered on every expression context.
//!
//! `split` is a method call (`"a,b".split(",")`); the `gcp_matches_*` and
//! `matches_*_bool` functions are regex-shaped predicates frequently needed
//! by scaffolding templates that validate GCP resource names or other
//! conventionally-capitalized identifiers.

use cel_interpreter::extractors::This;
use cel_interpreter::{Context, Value};
use std::sync::{Arc, LazyLock};

static SERVICE_ACCOUNT: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[a-z](?:[-a-z0-9]{4,28}[a-z0-9])?@[a-z](?:[-a-z0-9]{4,28}[a-z0-9])?\.iam\.gserviceaccount\.com$")
        .expect("valid regex")
});
static GCP_ID: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-z](?:[-a-z0-9]{0,61}[a-z0-9])?$").expect("valid regex"));
static GCP_PROJECT_ID: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-z][-a-z0-9]{4,28}[a-z0-9]$").expect("valid regex"));
static GCP_PROJECT_NUMBER: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[1-9][0-9]*$").expect("valid regex"));
static CAPITALIZED: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Z]").expect("valid regex"));
static UNCAPITALIZED: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[a-z]").expect("valid regex"));

/// Register every custom function this crate adds on top of stock CEL.
pub fn register(context: &mut Context) {
    context
        .add_function("split", |This(s): This<Arc<String>>, sep: Arc<String>| -> Arc<Vec<Value>> {
            Arc::new(
                s.split(sep.as_str())
                    .map(|part| Value::String(Arc::new(part.to_string())))
                    .collect(),
            )
        });
    context.add_function("gcp_matches_service_account", |This(s): This<Arc<String>>| {
        SERVICE_ACCOUNT.is_match(&s)
    });
    context.add_function("gcp_matches_id", |This(s): This<Arc<String>>| GCP_ID.is_match(&s));
    context.add_function("gcp_matches_project_id", |This(s): This<Arc<String>>| {
        GCP_PROJECT_ID.is_match(&s)
    });
    context.add_function("gcp_matches_project_number", |This(s): This<Arc<String>>| {
        GCP_PROJECT_NUMBER.is_match(&s)
    });
    context.add_function("matches_capitalized_bool", |This(s): This<Arc<String>>| {
        CAPITALIZED.is_match(&s)
    });
    context.add_function("matches_uncapitalized_bool", |This(s): This<Arc<String>>| {
        UNCAPITALIZED.is_match(&s)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gcp_id_pattern_rejects_uppercase() {
        assert!(!GCP_ID.is_match("Invalid-Name"));
        assert!(GCP_ID.is_match("valid-name"));
    }

    #[test]
    fn capitalized_matcher() {
        assert!(CAPITALIZED.is_match("Foo"));
        assert!(!CAPITALIZED.is_match("foo"));
    }
}
