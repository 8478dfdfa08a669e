//! Validation middleware between an upstream data context and its descendants.
//!
//! A [`ValidationGuard`] sits between an ancestor that owns committed field
//! values and the components below it. It keeps a local draft of the data,
//! intercepts every update attempt, runs an async validator, and only
//! forwards the update upstream when the validator accepts it. Descendants
//! never see the upstream context directly: the guard republishes its own
//! [`DataContext`] (draft plus update entry point) and [`ErrorContext`]
//! after every change, so the guard acts as a proxy or middleware layer.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use futures::future::BoxFuture;
use log::{debug, trace, warn};

use crate::context::{Context, Subscription};
use crate::error::{BoxError, GuardError};

/// Mapping of field name to field value.
pub type FieldMap<V> = HashMap<String, V>;

/// Mapping of field name to validation error.
pub type ErrorMap<E> = HashMap<String, E>;

/// Shared async validator callback.
///
/// Invoked with the field name and candidate value of an update attempt;
/// resolves to a [`Verdict`], or to an error when the validator itself fails.
pub type Validator<V, E> =
    Arc<dyn Fn(String, V) -> BoxFuture<'static, Result<Verdict<E>, BoxError>> + Send + Sync>;

/// Upstream commit callback, invoked once per accepted update.
pub type CommitFn<V> = Arc<dyn Fn(&str, &V) + Send + Sync>;

/// Update entry point published to descendants inside [`DataContext`].
pub type UpdateFn<V> =
    Arc<dyn Fn(String, V) -> BoxFuture<'static, Result<UpdateOutcome, GuardError>> + Send + Sync>;

/// What a validator decided about an update attempt.
///
/// Validity and the error mapping are independent: the verdict carries the
/// error set for the attempt as a whole, and `errors` replaces the guard's
/// previous error state outright (it is never merged into it).
#[derive(Debug, Clone)]
pub struct Verdict<E> {
    /// Whether the value may be committed upstream.
    pub valid: bool,
    /// Error mapping to publish; `None` clears all errors.
    pub errors: Option<ErrorMap<E>>,
}

impl<E> Verdict<E> {
    /// Accept the value with no errors.
    pub fn pass() -> Self {
        Self {
            valid: true,
            errors: None,
        }
    }

    /// Reject the value with the given error mapping.
    pub fn fail(errors: ErrorMap<E>) -> Self {
        Self {
            valid: false,
            errors: Some(errors),
        }
    }

    /// Reject the value with a single-field error.
    pub fn fail_field(field: impl Into<String>, error: E) -> Self {
        Self::fail(ErrorMap::from_iter([(field.into(), error)]))
    }
}

/// How an update attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The validator accepted the value; it was committed upstream.
    Committed,
    /// The validator rejected the value; the draft holds it, the errors were
    /// published, and nothing was committed upstream.
    Rejected,
    /// A newer attempt on the same field finished first; this result was
    /// discarded without touching draft or error state.
    Superseded,
}

/// Data context published to descendants: the draft plus the guarded update
/// entry point.
#[derive(Clone)]
pub struct DataContext<V> {
    /// Current draft values.
    pub data: FieldMap<V>,
    /// Dispatches to [`ValidationGuard::try_update`].
    pub update: UpdateFn<V>,
}

/// Error context published to descendants.
#[derive(Debug, Clone)]
pub struct ErrorContext<E> {
    /// Errors from the most recent applied validation attempt.
    pub errors: ErrorMap<E>,
}

struct GuardState<V, E> {
    /// Last upstream snapshot, for structural change detection.
    data: FieldMap<V>,
    /// Upstream values overlaid with local edits; what descendants render.
    draft: FieldMap<V>,
    errors: ErrorMap<E>,
    /// Latest issued attempt number per field.
    seq: HashMap<String, u64>,
}

struct GuardInner<V, E> {
    name: String,
    state: RwLock<GuardState<V, E>>,
    validator: Validator<V, E>,
    commit: CommitFn<V>,
    update_fn: UpdateFn<V>,
    data_ctx: Context<DataContext<V>>,
    error_ctx: Context<ErrorContext<E>>,
}

/// Draft-state/validation layer between an upstream data owner and the
/// component tree below it.
///
/// Cheap to clone; all clones share the same state and contexts.
///
/// # Example
///
/// ```ignore
/// let guard = ValidationGuard::builder()
///     .name("SignupForm")
///     .data(initial)
///     .validator(|field, value| async move { Ok(Verdict::pass()) })
///     .on_commit(|field, value| store.set(field, value))
///     .build();
///
/// match guard.try_update("email", input).await? {
///     UpdateOutcome::Committed => {}
///     UpdateOutcome::Rejected => {} // draft updated, errors published
///     UpdateOutcome::Superseded => {}
/// }
/// ```
pub struct ValidationGuard<V, E> {
    inner: Arc<GuardInner<V, E>>,
}

impl<V, E> Clone for ValidationGuard<V, E> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, E> ValidationGuard<V, E>
where
    V: Clone + PartialEq + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Start building a guard with default configuration: an always-valid
    /// validator, a no-op commit, and empty initial data.
    pub fn builder() -> GuardBuilder<V, E> {
        GuardBuilder::new()
    }

    fn from_builder(builder: GuardBuilder<V, E>) -> Self {
        let GuardBuilder {
            name,
            data,
            validator,
            commit,
        } = builder;

        let name = format!("ValidationGuard({name})");
        let inner = Arc::new_cyclic(|weak: &Weak<GuardInner<V, E>>| {
            let update_fn = make_update_fn(weak.clone());
            GuardInner {
                name,
                state: RwLock::new(GuardState {
                    data: data.clone(),
                    draft: data.clone(),
                    errors: ErrorMap::new(),
                    seq: HashMap::new(),
                }),
                validator,
                commit,
                update_fn: Arc::clone(&update_fn),
                data_ctx: Context::new(DataContext {
                    data,
                    update: update_fn,
                }),
                error_ctx: Context::new(ErrorContext {
                    errors: ErrorMap::new(),
                }),
            }
        });

        Self { inner }
    }

    /// Diagnostic label, derived from the wrapped component's name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The data context descendants should consume instead of the upstream
    /// one.
    pub fn data_context(&self) -> Context<DataContext<V>> {
        self.inner.data_ctx.clone()
    }

    /// The error context descendants (e.g. an [`ErrorGate`]) consume.
    ///
    /// [`ErrorGate`]: crate::gate::ErrorGate
    pub fn error_context(&self) -> Context<ErrorContext<E>> {
        self.inner.error_ctx.clone()
    }

    /// Current draft values.
    pub fn draft(&self) -> FieldMap<V> {
        self.read_state(|state| state.draft.clone())
    }

    /// Last upstream snapshot.
    pub fn data(&self) -> FieldMap<V> {
        self.read_state(|state| state.data.clone())
    }

    /// Errors from the most recent applied validation attempt.
    pub fn errors(&self) -> ErrorMap<E> {
        self.read_state(|state| state.errors.clone())
    }

    /// Reconcile an upstream data change into local state.
    ///
    /// Compares `data` structurally against the stored snapshot; when it
    /// differs, the snapshot is replaced and the draft is recomputed as the
    /// new data overlaid with existing draft entries, so upstream values fill
    /// fields the user has not touched but never clobber an in-progress
    /// edit. Idempotent: calling again with the same data is a no-op and
    /// publishes nothing.
    pub fn sync(&self, data: &FieldMap<V>) {
        let changed = {
            let mut state = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if state.data == *data {
                false
            } else {
                state.data = data.clone();
                let mut draft = data.clone();
                draft.extend(state.draft.drain());
                state.draft = draft;
                true
            }
        };

        if changed {
            trace!("{}: upstream data changed, draft merged", self.inner.name);
            self.republish();
        }
    }

    /// Subscribe [`sync`](Self::sync) to an upstream data context.
    ///
    /// Performs an initial sync against the upstream's current value, then
    /// follows every publish until the returned subscription is dropped.
    pub fn bind_upstream(&self, upstream: &Context<FieldMap<V>>) -> Subscription {
        self.sync(&upstream.get());
        let guard = self.clone();
        upstream.subscribe(move |data| guard.sync(data))
    }

    /// Validate `value` for `field` and apply the outcome.
    ///
    /// Awaits the validator (the only suspension point). Unless a newer
    /// attempt on the same field finished in the meantime, it then replaces
    /// the error state with the verdict's mapping, writes the value into the
    /// draft whether or not it was valid, republishes both contexts, and
    /// finally commits upstream when the verdict was valid.
    ///
    /// A failing validator leaves all state untouched.
    pub async fn try_update(
        &self,
        field: impl Into<String>,
        value: V,
    ) -> Result<UpdateOutcome, GuardError> {
        let field = field.into();
        let seq = {
            let mut state = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            let counter = state.seq.entry(field.clone()).or_insert(0);
            *counter += 1;
            *counter
        };

        let verdict = match (self.inner.validator)(field.clone(), value.clone()).await {
            Ok(verdict) => verdict,
            Err(source) => {
                warn!(
                    "{}: validator failed for '{}': {}",
                    self.inner.name, field, source
                );
                return Err(GuardError::Validator { field, source });
            }
        };

        {
            let mut state = self
                .inner
                .state
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            if state.seq.get(&field).copied().unwrap_or(0) != seq {
                trace!(
                    "{}: dropping superseded validation result for '{}'",
                    self.inner.name, field
                );
                return Ok(UpdateOutcome::Superseded);
            }

            let errors = verdict.errors.clone().unwrap_or_default();
            debug!(
                "{}: attempt on '{}' -> valid={}, errors on {:?}",
                self.inner.name,
                field,
                verdict.valid,
                errors.keys().collect::<Vec<_>>()
            );
            state.errors = errors;
            // The draft always reflects the latest input, valid or not.
            state.draft.insert(field.clone(), value.clone());
        }
        self.republish();

        if verdict.valid {
            (self.inner.commit)(&field, &value);
            Ok(UpdateOutcome::Committed)
        } else {
            Ok(UpdateOutcome::Rejected)
        }
    }

    fn republish(&self) {
        let (draft, errors) = self.read_state(|state| (state.draft.clone(), state.errors.clone()));
        self.inner.data_ctx.publish(DataContext {
            data: draft,
            update: Arc::clone(&self.inner.update_fn),
        });
        self.inner.error_ctx.publish(ErrorContext { errors });
    }

    fn read_state<R>(&self, f: impl FnOnce(&GuardState<V, E>) -> R) -> R {
        let state = self
            .inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }
}

fn make_update_fn<V, E>(weak: Weak<GuardInner<V, E>>) -> UpdateFn<V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    Arc::new(move |field, value| {
        let weak = weak.clone();
        Box::pin(async move {
            // The context can outlive the guard; updates then fail cleanly.
            let Some(inner) = weak.upgrade() else {
                return Err(GuardError::Detached);
            };
            ValidationGuard { inner }.try_update(field, value).await
        })
    })
}

/// Builder for [`ValidationGuard`], carrying the explicit defaults: an
/// always-valid no-error validator and a no-op commit.
pub struct GuardBuilder<V, E> {
    name: String,
    data: FieldMap<V>,
    validator: Validator<V, E>,
    commit: CommitFn<V>,
}

impl<V, E> GuardBuilder<V, E>
where
    V: Clone + PartialEq + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self {
            name: "component".to_string(),
            data: FieldMap::new(),
            validator: Arc::new(|_, _| Box::pin(async { Ok(Verdict::pass()) })),
            commit: Arc::new(|_, _| {}),
        }
    }

    /// Name of the wrapped component, used in the guard's diagnostic label.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Initial upstream data; also seeds the draft.
    pub fn data(mut self, data: FieldMap<V>) -> Self {
        self.data = data;
        self
    }

    /// Async validator invoked on every update attempt.
    pub fn validator<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(String, V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Verdict<E>, BoxError>> + Send + 'static,
    {
        self.validator = Arc::new(move |field, value| Box::pin(f(field, value)));
        self
    }

    /// Upstream commit callback, invoked once per accepted update.
    pub fn on_commit<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, &V) + Send + Sync + 'static,
    {
        self.commit = Arc::new(f);
        self
    }

    /// Build the guard and publish its initial contexts.
    pub fn build(self) -> ValidationGuard<V, E> {
        ValidationGuard::from_builder(self)
    }
}

impl<V, E> Default for GuardBuilder<V, E>
where
    V: Clone + PartialEq + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
