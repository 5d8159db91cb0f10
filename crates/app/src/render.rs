use std::fmt::Write as _;

use quiz_core::model::{QuestionStatus, QuizSummary};
use services::{QuestionView, QuizResults, SummaryItem};

use crate::command::option_letter;

#[must_use]
pub fn format_timer(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("Time: {minutes}:{remainder:02}")
}

#[must_use]
pub fn timer_line(seconds: u32, overdue: bool) -> String {
    if overdue {
        "Time: 0:00 (time is up, submit when ready)".to_string()
    } else {
        format_timer(seconds)
    }
}

#[must_use]
pub fn question(view: &QuestionView<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Question {}/{}", view.number(), view.total);
    let _ = writeln!(out, "{}", view.text);
    if let Some(code) = view.code {
        let _ = writeln!(out, "```\n{code}\n```");
    }
    if view.multi_select {
        let _ = writeln!(out, "(select all that apply)");
    }

    for option in &view.options {
        let mark = if option.selected { "[x]" } else { "[ ]" };
        let verdict = match option.correct {
            Some(true) => "  <- correct",
            Some(false) if option.selected => "  <- wrong",
            _ => "",
        };
        let letter = option_letter(option.position)
            .map(|c| format!(" {c})"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {}{letter} {mark} {}{verdict}",
            option.position, option.text
        );
    }

    match (view.is_correct, view.explanation) {
        (Some(correct), explanation) => {
            let _ = writeln!(out, "{}", if correct { "Correct!" } else { "Incorrect." });
            if let Some(explanation) = explanation.filter(|e| !e.is_empty()) {
                let _ = writeln!(out, "{explanation}");
            }
        }
        (None, _) => {
            let _ = writeln!(out, "{}", timer_line(view.time_remaining, view.overdue));
        }
    }

    let hints: Vec<&str> = [
        (view.can_go_back, "p previous"),
        (view.can_go_next, "n next"),
    ]
    .into_iter()
    .filter_map(|(allowed, hint)| allowed.then_some(hint))
    .collect();
    if !hints.is_empty() {
        let _ = writeln!(out, "({})", hints.join(", "));
    }
    out
}

fn status_label(status: QuestionStatus) -> &'static str {
    match status {
        QuestionStatus::Unanswered => "not answered",
        QuestionStatus::Pending => "not submitted",
        QuestionStatus::Correct => "correct",
        QuestionStatus::Incorrect => "incorrect",
    }
}

#[must_use]
pub fn summary(items: &[SummaryItem], totals: &QuizSummary) -> String {
    let mut out = String::from("Summary\n");
    for item in items {
        let cursor = if item.is_current { ">" } else { " " };
        let _ = writeln!(
            out,
            "{cursor} {:>3}. {}",
            item.index + 1,
            status_label(item.status)
        );
    }
    let _ = writeln!(
        out,
        "Answered {}/{}, correct {} ({}%)",
        totals.answered_count(),
        totals.total(),
        totals.correct_count(),
        totals.percentage()
    );
    out
}

#[must_use]
pub fn results(results: &QuizResults) -> String {
    let s = &results.summary;
    let elapsed = results.elapsed().num_seconds().max(0);
    let seconds = u32::try_from(elapsed).unwrap_or(u32::MAX);
    format!(
        "Results\nScore: {}/{} answered correctly ({}%)\nIncorrect: {}\nUnanswered: {}\nTaken: {}\n",
        s.correct_count(),
        s.answered_count(),
        s.percentage(),
        s.incorrect_count(),
        s.unanswered_count(),
        format_timer(seconds).trim_start_matches("Time: ")
    )
}
