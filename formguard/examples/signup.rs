// Example: Signup form
//
// Wires a committed upstream store through a ValidationGuard and renders
// field errors through an ErrorGate:
// - invalid input stays in the draft and never reaches the store
// - valid input is committed upstream and flows back through bind_upstream

use std::collections::HashMap;

use formguard::rules::RuleSet;
use formguard::{Context, ErrorGate, GateProps, UpdateOutcome, ValidationGuard};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[tokio::main]
async fn main() {
    TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .expect("logger init");

    // The ancestor-owned, committed field values.
    let committed: Context<HashMap<String, String>> = Context::new(HashMap::from([
        ("name".to_string(), String::new()),
        ("email".to_string(), String::new()),
    ]));

    let rules = RuleSet::new()
        .field("name")
        .required("Name is required")
        .field("email")
        .required("Email is required")
        .email("Please enter a valid email")
        .into_validator();

    let store = committed.clone();
    let guard = ValidationGuard::builder()
        .name("SignupForm")
        .validator(move |field, value| rules(field, value))
        .on_commit(move |field, value| {
            let mut data = store.get();
            data.insert(field.to_string(), value.clone());
            store.publish(data);
        })
        .build();
    let _upstream = guard.bind_upstream(&committed);

    let email_error = ErrorGate::new(&guard.error_context())
        .name("EmailField")
        .show(true);

    // A descendant edits through the published data context.
    let update = guard.data_context().get().update;

    let outcome = update("email".to_string(), "not-an-email".to_string())
        .await
        .expect("validator does not fail");
    assert_eq!(outcome, UpdateOutcome::Rejected);

    email_error.render(&GateProps::new().field("email"), |view| {
        println!(
            "email field error: {}",
            view.error.unwrap_or_else(|| "<none>".to_string())
        );
    });
    println!("committed after invalid edit: {:?}", committed.get());
    println!("draft after invalid edit:     {:?}", guard.draft());

    let outcome = update("email".to_string(), "ada@example.com".to_string())
        .await
        .expect("validator does not fail");
    assert_eq!(outcome, UpdateOutcome::Committed);

    println!("committed after valid edit:   {:?}", committed.get());
}
