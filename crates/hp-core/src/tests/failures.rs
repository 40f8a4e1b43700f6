use crate::{Failure, FailureCategory, Failures, UnsupportedChange};

fn batch(messages: &[&str]) -> Vec<String> {
    messages.iter().map(|m| m.to_string()).collect()
}

#[test]
fn given_duplicate_message_when_recorded_then_kept_once() {
    // Given
    let mut failures = Failures::new();
    failures.record(Failure::apply_error("boom"));

    // When
    let added = failures.record(Failure::apply_error("boom"));

    // Then
    assert!(!added);
    assert_eq!(failures.len(), 1);
}

#[test]
fn given_repeated_message_when_recorded_then_moved_to_back() {
    // Given
    let mut failures = Failures::new();
    failures.record(Failure::unsupported("a"));
    failures.record(Failure::unsupported("b"));

    // When
    let added = failures.record(Failure::unsupported("a"));

    // Then
    assert!(!added);
    assert_eq!(failures.messages(), vec!["b", "a"]);
}

#[test]
fn given_existing_entries_when_promoted_then_moved_to_front_without_duplicate() {
    // Given
    let mut failures = Failures::new();
    failures.record(Failure::unsupported("a"));
    failures.record(Failure::unsupported("b"));
    failures.record(Failure::unsupported("c"));

    // When
    failures.promote(Failure::unsupported("c"));

    // Then
    assert_eq!(failures.messages(), vec!["c", "a", "b"]);
}

#[test]
fn given_batch_with_marker_when_applied_then_compile_error_recorded() {
    // Given
    let mut failures = Failures::new();

    // When
    let outcome = failures.apply_compile_batch(
        &batch(&["Foo.cs(1,1): error CS1002: ; expected", "warning: slow"]),
        "error CS",
    );

    // Then
    assert_eq!(outcome.fatal, 1);
    assert_eq!(outcome.non_fatal, 1);
    assert!(failures.has_compile_error());
    assert_eq!(failures.messages()[0], "warning: slow");
}

#[test]
fn given_compile_error_when_empty_batch_applied_then_compile_error_cleared() {
    // Given
    let mut failures = Failures::new();
    failures.apply_compile_batch(&batch(&["error CS0103"]), "error CS");
    failures.record(Failure::apply_error("apply failed"));

    // When
    failures.apply_compile_batch(&[], "error CS");

    // Then
    assert!(!failures.has_compile_error());
    assert_eq!(failures.messages(), vec!["apply failed"]);
}

#[test]
fn given_compile_error_when_new_batch_applied_then_previous_errors_replaced() {
    let mut failures = Failures::new();
    failures.apply_compile_batch(&batch(&["error CS0001"]), "error CS");

    failures.apply_compile_batch(&batch(&["error CS0002"]), "error CS");

    assert_eq!(failures.messages(), vec!["error CS0002"]);
}

#[test]
fn given_only_apply_errors_then_no_unsupported_changes() {
    // Given
    let mut failures = Failures::new();
    failures.record(Failure::apply_error("Game::Player::Jump(): invalid IL"));

    // When
    let before = failures.has_unsupported_changes();
    failures.record(Failure::unsupported_edit(
        UnsupportedChange::AssemblyFileEdit,
        "Assets/Game.asmdef",
    ));

    // Then
    assert!(!before);
    assert!(failures.has_unsupported_changes());
}

#[test]
fn given_failures_when_cleared_then_empty() {
    let mut failures = Failures::new();
    failures.record(Failure::unsupported_edit(
        UnsupportedChange::AssemblyFileEdit,
        "Assets/Game.asmdef",
    ));

    failures.clear();

    assert!(failures.is_empty());
}

#[test]
fn given_unsupported_edit_when_formatted_then_names_kind_and_path() {
    let failure = Failure::unsupported_edit(UnsupportedChange::NativePluginEdit, "Plugin.dll");

    assert_eq!(failure.category, FailureCategory::UnsupportedChange);
    assert!(failure.message.starts_with("errors: NativePluginEdit:"));
    assert!(failure.message.ends_with("in Plugin.dll"));
}
