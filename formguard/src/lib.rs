//! Draft-state validation middleware for context-driven form trees.
//!
//! `formguard` provides two decorators over a store-and-subscribe context
//! abstraction:
//!
//! - [`ValidationGuard`] sits between an upstream data owner and its
//!   descendants. It keeps a local draft of the data, intercepts update
//!   attempts, runs an async validator, and only commits upstream when the
//!   value is accepted. Descendants consume the guard's own data and error
//!   contexts instead of the upstream's.
//! - [`ErrorGate`] wraps a component and decides from the error context
//!   whether it renders at all, forwarding the resolved error props.
//!
//! # Example
//!
//! ```ignore
//! use formguard::rules::RuleSet;
//! use formguard::{ErrorGate, GateProps, UpdateOutcome, ValidationGuard};
//!
//! let guard = ValidationGuard::builder()
//!     .name("SignupForm")
//!     .data(initial_data)
//!     .validator({
//!         let rules = RuleSet::new()
//!             .field("email")
//!             .required("Email is required")
//!             .email("Please enter a valid email")
//!             .into_validator();
//!         move |field, value| rules(field, value)
//!     })
//!     .on_commit(|field, value| store.commit(field, value))
//!     .build();
//!
//! let gate = ErrorGate::new(&guard.error_context()).show(true);
//!
//! if guard.try_update("email", input).await? == UpdateOutcome::Rejected {
//!     let view = gate.resolve(&GateProps::new().field("email"));
//!     // view.error holds the validation message
//! }
//! ```

pub mod context;
pub mod error;
pub mod gate;
pub mod guard;
pub mod rules;

pub use context::{Context, Subscription};
pub use error::{BoxError, GuardError};
pub use gate::{ErrorGate, GateProps, GateView};
pub use guard::{
    CommitFn, DataContext, ErrorContext, ErrorMap, FieldMap, GuardBuilder, UpdateFn,
    UpdateOutcome, ValidationGuard, Validator, Verdict,
};
pub use rules::{RuleBuilder, RuleSet};
