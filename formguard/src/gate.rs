//! Error-aware rendering gate over a validation error context.
//!
//! An [`ErrorGate`] wraps a component and decides, from the current error
//! context, whether the component renders at all. By default a component
//! behind a gate is suppressed while relevant errors exist; `show` (set at
//! decoration time or overridden per render) keeps it visible so it can
//! display the errors it receives.

use log::trace;

use crate::context::Context;
use crate::guard::{ErrorContext, ErrorMap};

/// Per-render props for an [`ErrorGate`].
#[derive(Debug, Clone, Default)]
pub struct GateProps {
    /// Scope the error check to a single field.
    pub field: Option<String>,
    /// Override the gate's decoration-time `show` default.
    pub show: Option<bool>,
}

impl GateProps {
    /// Props with no field scope and no show override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope the error check to `field`.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Override the gate's `show` default for this render.
    pub fn show(mut self, show: bool) -> Self {
        self.show = Some(show);
        self
    }
}

/// Resolved view props forwarded to the wrapped component.
#[derive(Debug, Clone, PartialEq)]
pub struct GateView<E> {
    /// The scoped field's error, when the props named a field.
    pub error: Option<E>,
    /// The full error mapping, when no field matched the scope.
    pub errors: Option<ErrorMap<E>>,
}

/// Stateless wrapper deciding visibility from the ambient error context.
///
/// # Example
///
/// ```ignore
/// let gate = ErrorGate::new(&guard.error_context()).show(true);
/// if let Some(view) = gate.resolve(&GateProps::new().field("email")) {
///     render_field_error(view.error);
/// }
/// ```
pub struct ErrorGate<E> {
    name: String,
    show: bool,
    errors: Context<ErrorContext<E>>,
}

impl<E> ErrorGate<E>
where
    E: Clone + Send + Sync + 'static,
{
    /// Create a gate over the given error context. Suppression is the
    /// default; use [`show`](Self::show) to keep the wrapped component
    /// visible while errors exist.
    pub fn new(errors: &Context<ErrorContext<E>>) -> Self {
        Self {
            name: "ErrorGate(component)".to_string(),
            show: false,
            errors: errors.clone(),
        }
    }

    /// Name of the wrapped component, used in the gate's diagnostic label.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = format!("ErrorGate({})", name.into());
        self
    }

    /// Decoration-time default for showing the component despite errors.
    pub fn show(mut self, show: bool) -> Self {
        self.show = show;
        self
    }

    /// Evaluate the rendering decision against the current error context.
    ///
    /// Returns `None` when the component is suppressed: relevant errors
    /// exist and `show` resolves to false. Otherwise returns the view props
    /// to forward.
    pub fn resolve(&self, props: &GateProps) -> Option<GateView<E>> {
        let errors = self.errors.get().errors;

        let mut has_error = true;
        let mut view_errors = None;
        match &props.field {
            Some(field) if errors.contains_key(field) => {}
            _ if !errors.is_empty() => view_errors = Some(errors.clone()),
            _ => has_error = false,
        }

        let show = props.show.unwrap_or(self.show);
        if !has_error || show {
            // `error` is always the `field` lookup, even on the full-map
            // branch where it is usually absent.
            let error = props.field.as_ref().and_then(|f| errors.get(f)).cloned();
            Some(GateView {
                error,
                errors: view_errors,
            })
        } else {
            trace!(
                "{}: suppressed ({} error(s) pending)",
                self.name,
                errors.len()
            );
            None
        }
    }

    /// Decorator form of [`resolve`](Self::resolve): invoke the wrapped
    /// render closure only when the component is visible.
    pub fn render<C, R>(&self, props: &GateProps, component: C) -> Option<R>
    where
        C: FnOnce(GateView<E>) -> R,
    {
        self.resolve(props).map(component)
    }
}
