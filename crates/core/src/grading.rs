use std::collections::BTreeSet;

/// Grade a selection against the correct answers.
///
/// A selection is correct only when it matches the correct set exactly:
/// a missing answer or an extra pick both fail. Order never matters.
#[must_use]
pub fn grade(correct: &BTreeSet<String>, selected: &BTreeSet<String>) -> bool {
    correct == selected
}
