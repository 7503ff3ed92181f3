use crate::SelectionSet;

use std::path::Path;

/// WHAT: Toggling adds then removes a file
/// WHY: Tapping a row twice must leave selection mode again
#[test]
fn given_empty_selection_when_toggling_twice_then_back_to_empty() {
    // Given: No selection
    let empty = SelectionSet::default();
    let file = Path::new("/rec/a.m4a");

    // When: Toggling the same file twice
    let once = empty.toggle(file);
    let twice = once.toggle(file);

    // Then: Selected after the first toggle, cleared after the second
    assert!(once.is_selected(file));
    assert!(once.is_in_selection_mode());
    assert!(!twice.is_in_selection_mode());
    assert_eq!(twice, empty);
}

/// WHAT: Rename target only exists for exactly one selected file
/// WHY: Rename is a single-file action
#[test]
fn given_selection_sizes_when_asking_for_single_then_only_one_qualifies() {
    let a = Path::new("/rec/a.m4a");
    let b = Path::new("/rec/b.m4a");

    let one = SelectionSet::default().set_selected(a, true);
    let two = one.set_selected(b, true);

    assert!(one.is_single_selection());
    assert_eq!(one.single(), Some(a));
    assert!(!two.is_single_selection());
    assert_eq!(two.single(), None);
    assert_eq!(two.len(), 2);
}

/// WHAT: Explicit set_selected is idempotent and clear empties everything
/// WHY: Checkbox events may repeat the same state
#[test]
fn given_repeated_checks_when_setting_selected_then_idempotent() {
    let a = Path::new("/rec/a.m4a");

    let checked = SelectionSet::default()
        .set_selected(a, true)
        .set_selected(a, true);
    let unchecked = checked.set_selected(a, false).set_selected(a, false);

    assert_eq!(checked.len(), 1);
    assert!(unchecked.is_empty());
    assert!(checked.clear().is_empty());
}
