//! Fluent per-field rule builder producing guard validators.
//!
//! The guard accepts any async validator; this module provides the stock
//! way to build one from declarative rules:
//!
//! ```ignore
//! let validator = RuleSet::new()
//!     .field("username")
//!         .required("Username is required")
//!         .min_length(3, "Username must be at least 3 characters")
//!     .field("email")
//!         .required("Email is required")
//!         .email("Please enter a valid email")
//!     .into_validator();
//! ```
//!
//! When the resulting validator is invoked for a field, that field's sync
//! rules run first, then its async rules; the first failure decides the
//! verdict and its message becomes the error set for the attempt. Fields
//! with no registered rules always pass.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::guard::{Validator, Verdict};

type SyncRule<V> = Box<dyn Fn(&V) -> Result<(), String> + Send + Sync>;
type AsyncRule<V> = Box<dyn Fn(V) -> BoxFuture<'static, Result<(), String>> + Send + Sync>;

struct FieldRules<V> {
    sync_rules: Vec<SyncRule<V>>,
    async_rules: Vec<AsyncRule<V>>,
}

impl<V> Default for FieldRules<V> {
    fn default() -> Self {
        Self {
            sync_rules: Vec::new(),
            async_rules: Vec::new(),
        }
    }
}

/// A collection of per-field validation rules.
pub struct RuleSet<V> {
    fields: HashMap<String, FieldRules<V>>,
}

impl<V> RuleSet<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create an empty rule set.
    pub fn new() -> Self {
        Self {
            fields: HashMap::new(),
        }
    }

    /// Start declaring rules for a field.
    pub fn field(self, name: impl Into<String>) -> RuleBuilder<V> {
        RuleBuilder {
            set: self,
            name: name.into(),
            rules: FieldRules::default(),
        }
    }

    /// Turn the rule set into a guard-compatible validator.
    pub fn into_validator(self) -> Validator<V, String> {
        let fields = Arc::new(self.fields);
        Arc::new(move |field: String, value: V| {
            let fields = Arc::clone(&fields);
            Box::pin(async move {
                let Some(rules) = fields.get(&field) else {
                    return Ok(Verdict::pass());
                };

                for rule in &rules.sync_rules {
                    if let Err(msg) = rule(&value) {
                        return Ok(Verdict::fail_field(field, msg));
                    }
                }
                for rule in &rules.async_rules {
                    if let Err(msg) = rule(value.clone()).await {
                        return Ok(Verdict::fail_field(field, msg));
                    }
                }

                Ok(Verdict::pass())
            })
        })
    }
}

impl<V> Default for RuleSet<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the rules of a single field.
pub struct RuleBuilder<V> {
    set: RuleSet<V>,
    name: String,
    rules: FieldRules<V>,
}

impl<V> RuleBuilder<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Add a custom synchronous rule.
    pub fn rule<F>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(&V) -> bool + Send + Sync + 'static,
    {
        let msg = msg.into();
        self.rules
            .sync_rules
            .push(Box::new(move |v| if f(v) { Ok(()) } else { Err(msg.clone()) }));
        self
    }

    /// Add a custom asynchronous rule.
    pub fn rule_async<F, Fut>(mut self, f: F, msg: impl Into<String>) -> Self
    where
        F: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = bool> + Send + 'static,
    {
        let msg = msg.into();
        self.rules.async_rules.push(Box::new(move |v| {
            let fut = f(v);
            let msg = msg.clone();
            Box::pin(async move { if fut.await { Ok(()) } else { Err(msg) } })
        }));
        self
    }

    /// Continue to the next field.
    pub fn field(self, name: impl Into<String>) -> RuleBuilder<V> {
        self.finish().field(name)
    }

    /// Finalize into the rule set.
    pub fn build(self) -> RuleSet<V> {
        self.finish()
    }

    /// Finalize and turn the set into a validator.
    pub fn into_validator(self) -> Validator<V, String> {
        self.finish().into_validator()
    }

    fn finish(self) -> RuleSet<V> {
        let mut set = self.set;
        let entry = set.fields.entry(self.name).or_default();
        entry.sync_rules.extend(self.rules.sync_rules);
        entry.async_rules.extend(self.rules.async_rules);
        set
    }
}

// Built-in rules for String values
impl RuleBuilder<String> {
    /// Require the field to be non-empty.
    pub fn required(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(|v| !v.trim().is_empty(), msg)
    }

    /// Require minimum length (in characters).
    pub fn min_length(self, min: usize, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(move |v| v.chars().count() >= min, msg)
    }

    /// Require maximum length (in characters).
    pub fn max_length(self, max: usize, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(move |v| v.chars().count() <= max, msg)
    }

    /// Require the value to match a regex pattern.
    pub fn pattern(self, pattern: &str, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        let re = regex::Regex::new(pattern).expect("Invalid regex pattern");
        self.rule(move |v| re.is_match(v), msg)
    }

    /// Require a valid email address.
    pub fn email(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(
            |v| {
                if v.is_empty() {
                    true // Empty is valid; use required() for non-empty
                } else {
                    email_address::EmailAddress::is_valid(v)
                }
            },
            msg,
        )
    }

    /// Require the value to equal another value.
    pub fn equals(self, other: String, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(move |v| v == &other, msg)
    }

    /// Require the value to contain a substring.
    pub fn contains(self, substr: impl Into<String>, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        let substr = substr.into();
        self.rule(move |v| v.contains(&substr), msg)
    }
}

// Built-in rules for bool values
impl RuleBuilder<bool> {
    /// Require the flag to be set.
    pub fn checked(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(|&v| v, msg)
    }

    /// Require the flag to be unset.
    pub fn unchecked(self, msg: impl Into<String>) -> Self {
        let msg = msg.into();
        self.rule(|&v| !v, msg)
    }
}
