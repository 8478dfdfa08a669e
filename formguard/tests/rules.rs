//! Tests for the stock rule-set validators.

use formguard::rules::RuleSet;
use formguard::{Validator, Verdict};

async fn check(validator: &Validator<String, String>, field: &str, value: &str) -> Verdict<String> {
    validator(field.to_string(), value.to_string())
        .await
        .expect("rule validators do not fail")
}

fn error_for<'a>(verdict: &'a Verdict<String>, field: &str) -> Option<&'a String> {
    verdict.errors.as_ref().and_then(|errors| errors.get(field))
}

#[tokio::test]
async fn test_required_rejects_blank() {
    let validator = RuleSet::new()
        .field("name")
        .required("Name is required")
        .into_validator();

    let verdict = check(&validator, "name", "   ").await;
    assert!(!verdict.valid);
    assert_eq!(
        error_for(&verdict, "name"),
        Some(&"Name is required".to_string())
    );

    let verdict = check(&validator, "name", "Ada").await;
    assert!(verdict.valid);
    assert!(verdict.errors.is_none());
}

#[tokio::test]
async fn test_min_and_max_length() {
    let validator = RuleSet::new()
        .field("username")
        .min_length(3, "Too short")
        .max_length(8, "Too long")
        .into_validator();

    assert!(!check(&validator, "username", "ab").await.valid);
    assert!(check(&validator, "username", "abc").await.valid);
    assert!(!check(&validator, "username", "abcdefghi").await.valid);
}

#[tokio::test]
async fn test_email_allows_empty_rejects_invalid() {
    let validator = RuleSet::new()
        .field("email")
        .email("Invalid email")
        .into_validator();

    assert!(check(&validator, "email", "").await.valid);
    assert!(check(&validator, "email", "ada@example.com").await.valid);
    assert!(!check(&validator, "email", "not-an-email").await.valid);
}

#[tokio::test]
async fn test_pattern_rule() {
    let validator = RuleSet::new()
        .field("zip")
        .pattern(r"^\d{5}$", "Must be five digits")
        .into_validator();

    assert!(check(&validator, "zip", "12345").await.valid);
    assert!(!check(&validator, "zip", "123").await.valid);
}

#[tokio::test]
async fn test_equals_and_contains() {
    let validator = RuleSet::new()
        .field("confirm")
        .equals("secret".to_string(), "Passwords must match")
        .field("bio")
        .contains("rust", "Mention rust")
        .into_validator();

    assert!(check(&validator, "confirm", "secret").await.valid);
    assert!(!check(&validator, "confirm", "other").await.valid);
    assert!(check(&validator, "bio", "I write rust").await.valid);
    assert!(!check(&validator, "bio", "I write go").await.valid);
}

#[tokio::test]
async fn test_first_failing_rule_wins() {
    let validator = RuleSet::new()
        .field("name")
        .required("Name is required")
        .min_length(3, "Too short")
        .into_validator();

    let verdict = check(&validator, "name", "").await;
    assert_eq!(
        error_for(&verdict, "name"),
        Some(&"Name is required".to_string())
    );
}

#[tokio::test]
async fn test_unregistered_field_passes() {
    let validator = RuleSet::new()
        .field("name")
        .required("Name is required")
        .into_validator();

    let verdict = check(&validator, "nickname", "").await;
    assert!(verdict.valid);
    assert!(verdict.errors.is_none());
}

#[tokio::test]
async fn test_fields_validate_independently() {
    let validator = RuleSet::new()
        .field("name")
        .required("Name is required")
        .field("email")
        .email("Invalid email")
        .into_validator();

    // Validating email does not evaluate name's rules.
    let verdict = check(&validator, "email", "ada@example.com").await;
    assert!(verdict.valid);
}

#[tokio::test]
async fn test_custom_async_rule() {
    let validator = RuleSet::new()
        .field("username")
        .rule_async(
            |value: String| async move { value != "taken" },
            "Username is taken",
        )
        .into_validator();

    assert!(check(&validator, "username", "free").await.valid);

    let verdict = check(&validator, "username", "taken").await;
    assert!(!verdict.valid);
    assert_eq!(
        error_for(&verdict, "username"),
        Some(&"Username is taken".to_string())
    );
}

#[tokio::test]
async fn test_checked_rule() {
    let validator = RuleSet::new()
        .field("terms")
        .checked("You must accept the terms")
        .into_validator();

    let verdict = validator("terms".to_string(), false).await.unwrap();
    assert!(!verdict.valid);

    let verdict = validator("terms".to_string(), true).await.unwrap();
    assert!(verdict.valid);
}

#[tokio::test]
async fn test_custom_sync_rule() {
    let validator = RuleSet::new()
        .field("age")
        .rule(|v: &i64| (18..=120).contains(v), "Must be an adult age")
        .into_validator();

    assert!(validator("age".to_string(), 30).await.unwrap().valid);
    assert!(!validator("age".to_string(), 7).await.unwrap().valid);
}
