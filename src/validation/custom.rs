//! Custom validator functions
//!
//! Schemas reference custom validators by name (`"validate": "phone"`).
//! Before a schema reaches the engine, names are resolved against the
//! `ValidatorBindings` supplied in the validator configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

/// Outcome of a custom validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    /// Rejected, with an optional message overriding the default one
    Fail(Option<String>),
}

impl Verdict {
    pub fn fail(message: impl Into<String>) -> Self {
        Verdict::Fail(Some(message.into()))
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Pass)
    }
}

impl From<bool> for Verdict {
    fn from(ok: bool) -> Self {
        if ok {
            Verdict::Pass
        } else {
            Verdict::Fail(None)
        }
    }
}

/// A user-supplied field check.
///
/// Receives the field value and the whole data object. May be asynchronous
/// (lookups, remote calls).
pub trait CustomValidator: Send + Sync {
    fn check<'a>(
        &'a self,
        value: &'a Value,
        data: &'a Value,
    ) -> Pin<Box<dyn Future<Output = Verdict> + Send + 'a>>;
}

/// Adapter turning a synchronous closure into a `CustomValidator`.
pub struct FnValidator<F> {
    f: F,
}

impl<F> CustomValidator for FnValidator<F>
where
    F: Fn(&Value, &Value) -> Verdict + Send + Sync,
{
    fn check<'a>(
        &'a self,
        value: &'a Value,
        data: &'a Value,
    ) -> Pin<Box<dyn Future<Output = Verdict> + Send + 'a>> {
        let verdict = (self.f)(value, data);
        Box::pin(async move { verdict })
    }
}

/// Wraps a synchronous closure as a shareable validator.
pub fn validator_fn<F>(f: F) -> Arc<dyn CustomValidator>
where
    F: Fn(&Value, &Value) -> Verdict + Send + Sync + 'static,
{
    Arc::new(FnValidator { f })
}

/// Named validator functions available to schemas.
#[derive(Clone, Default)]
pub struct ValidatorBindings {
    validators: BTreeMap<String, Arc<dyn CustomValidator>>,
}

impl ValidatorBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a validator under `name`, replacing any previous binding.
    pub fn bind(&mut self, name: impl Into<String>, validator: Arc<dyn CustomValidator>) {
        self.validators.insert(name.into(), validator);
    }

    pub fn with(mut self, name: impl Into<String>, validator: Arc<dyn CustomValidator>) -> Self {
        self.bind(name, validator);
        self
    }

    /// Merges `other` into self; bindings in `other` win.
    pub fn extend(&mut self, other: ValidatorBindings) {
        self.validators.extend(other.validators);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn CustomValidator>> {
        self.validators.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.validators.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorBindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorBindings")
            .field("validators", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verdict_from_bool() {
        assert_eq!(Verdict::from(true), Verdict::Pass);
        assert_eq!(Verdict::from(false), Verdict::Fail(None));
    }

    #[tokio::test]
    async fn test_fn_validator_sees_value_and_data() {
        let v = validator_fn(|value, data| {
            (value.as_str() == data.get("confirm").and_then(|c| c.as_str())).into()
        });

        let data = json!({ "password": "abc", "confirm": "abc" });
        assert!(v.check(&data["password"], &data).await.is_pass());

        let data = json!({ "password": "abc", "confirm": "xyz" });
        assert!(!v.check(&data["password"], &data).await.is_pass());
    }

    #[tokio::test]
    async fn test_bindings_later_wins() {
        let mut bindings = ValidatorBindings::new().with("a", validator_fn(|_, _| Verdict::Pass));
        bindings.extend(ValidatorBindings::new().with("a", validator_fn(|_, _| Verdict::fail("no"))));
        assert_eq!(bindings.len(), 1);
        assert!(bindings.get("b").is_none());

        let data = json!({});
        let verdict = bindings.get("a").unwrap().check(&json!(1), &data).await;
        assert_eq!(verdict, Verdict::fail("no"));
    }
}
