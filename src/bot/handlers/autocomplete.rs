//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions are case-insensitive substring matches, sorted, deduplicated, and capped
//! at Discord's limit of 25 choices.

use crate::{
    bot::BotData,
    core::{link, listing::StudentSortField, parent, student, teacher},
    errors::Error,
};

const DISCORD_CHOICE_LIMIT: usize = 25;

/// Keeps the candidates containing `partial`, sorted and capped at 25.
#[must_use]
pub fn filter_suggestions<I, S>(candidates: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let partial_lower = partial.trim().to_lowercase();
    let mut matching: Vec<String> = candidates
        .into_iter()
        .map(Into::into)
        .filter(|candidate| candidate.to_lowercase().contains(&partial_lower))
        .collect();
    matching.sort();
    matching.dedup();
    matching.truncate(DISCORD_CHOICE_LIMIT);
    matching
}

/// Suggests registered parent names.
pub async fn autocomplete_parent_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(parents) = parent::get_all_parents(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_suggestions(parents.into_iter().map(|p| p.name), partial)
}

/// Suggests student names.
pub async fn autocomplete_student_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(students) = student::get_all_students(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_suggestions(students.into_iter().map(|s| s.name), partial)
}

/// Suggests names of students with no parent.
pub async fn autocomplete_available_student(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(students) = link::available_students(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_suggestions(students.into_iter().map(|s| s.name), partial)
}

/// Suggests teacher names.
pub async fn autocomplete_teacher_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let Ok(teachers) = teacher::get_all_teachers(&ctx.data().database).await else {
        return Vec::new();
    };
    filter_suggestions(teachers.into_iter().map(|t| t.name), partial)
}

/// Suggests class names from enrolled students and teachers' assigned classes.
pub async fn autocomplete_class_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let db = &ctx.data().database;
    let (Ok(students), Ok(teachers)) = (
        student::get_all_students(db).await,
        teacher::get_all_teachers(db).await,
    ) else {
        return Vec::new();
    };
    let classes = students
        .into_iter()
        .map(|s| s.class_name)
        .chain(teachers.into_iter().flat_map(|t| t.assigned_classes.0));
    filter_suggestions(classes, partial)
}

/// Suggests the configured payment methods.
pub async fn autocomplete_payment_method(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_suggestions(ctx.data().config.payment_methods.iter().cloned(), partial)
}

/// Suggests student status tabs.
pub async fn autocomplete_student_status(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_suggestions(["active", "inactive", "transferred"], partial)
}

/// Suggests teacher status tabs.
pub async fn autocomplete_teacher_status(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_suggestions(["active", "inactive", "on_leave"], partial)
}

/// Suggests parent payment tabs.
pub async fn autocomplete_payment_status(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_suggestions(["paid", "unpaid"], partial)
}

/// Suggests student list sort columns.
pub async fn autocomplete_sort_field(
    _ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    filter_suggestions(StudentSortField::NAMES, partial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_suggestions_case_insensitive() {
        let names = ["Jane Doe", "Ana Reyes", "John Smith"];
        assert_eq!(filter_suggestions(names, "JA"), vec!["Jane Doe"]);
        assert_eq!(filter_suggestions(names, "an"), vec!["Ana Reyes", "Jane Doe"]);
    }

    #[test]
    fn test_filter_suggestions_empty_partial_returns_all_sorted() {
        let names = ["b", "a", "c", "a"];
        assert_eq!(filter_suggestions(names, ""), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_filter_suggestions_capped() {
        let many = (0..40).map(|i| format!("Student {i:02}"));
        let result = filter_suggestions(many, "student");
        assert_eq!(result.len(), 25);
        assert_eq!(result[0], "Student 00");
    }
}
