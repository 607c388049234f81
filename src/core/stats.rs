//! Statistics aggregation.
//!
//! [`compute_statistics`] is a pure function over in-memory snapshots so it can be
//! tested without a database; [`load_statistics`] fetches the snapshots and calls it.
//! Percentages are whole numbers rounded half up, and any ratio with an empty
//! denominator is reported as 0.

use crate::{
    entities::{Parent, Payment, Student, Teacher, parent, payment, student},
    errors::Result,
};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::collections::BTreeMap;

/// Everything the aggregator needs, fetched in one go.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// All students
    pub students: Vec<student::Model>,
    /// All payments
    pub payments: Vec<payment::Model>,
    /// All parents
    pub parents: Vec<parent::Model>,
    /// Class names known from elsewhere (e.g. teacher assignments) that may have no
    /// students yet; they appear in the class summary at 0%
    pub extra_classes: Vec<String>,
}

/// Paid percentage for a single class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSummary {
    /// Class name
    pub class_name: String,
    /// Students in the class
    pub total: usize,
    /// Students in the class marked paid
    pub paid: usize,
    /// `paid / total` as a whole percentage, 0 for an empty class
    pub percentage_paid: u32,
}

/// Read-only dashboard summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    /// Number of students
    pub total_students: usize,
    /// Number of students marked paid
    pub paid_students: usize,
    /// Paid students as a whole percentage of all students
    pub percentage_paid: u32,
    /// Sum of all payment amounts
    pub total_collected: f64,
    /// Collected amount as a whole percentage of the target, 0 without a target
    pub percentage_of_target: u32,
    /// Number of parents
    pub total_parents: usize,
    /// Number of parents marked paid
    pub paid_parents: usize,
    /// Per-class summaries ordered by class name
    pub class_summary: Vec<ClassSummary>,
    /// Class with the highest paid percentage
    pub highest_class: Option<ClassSummary>,
    /// Class with the lowest paid percentage
    pub lowest_class: Option<ClassSummary>,
}

/// Whole-number percentage of `part` in `whole`, 0 when `whole` is 0.
#[must_use]
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    // Counts are a few hundred at most, far inside f64's exact integer range
    #[allow(clippy::cast_precision_loss)]
    let ratio = part as f64 / whole as f64;
    to_percent(ratio)
}

/// Whole-number percentage of `amount` in `target`, 0 when the target is not positive.
#[must_use]
pub fn percentage_of_amount(amount: f64, target: f64) -> u32 {
    if !target.is_finite() || target <= 0.0 || !amount.is_finite() {
        return 0;
    }
    to_percent(amount / target)
}

fn to_percent(ratio: f64) -> u32 {
    // Clamped to be non-negative and bounded before the cast
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let percent = (ratio * 100.0).round().clamp(0.0, f64::from(u32::MAX)) as u32;
    percent
}

/// Renders a text progress bar such as `[██████░░░░] 60%`.
///
/// Percentages above 100 draw a full bar but still print the real number.
#[must_use]
pub fn format_progress_bar(percent: u32, bar_length: usize) -> String {
    let clamped = percent.min(100) as usize;
    let filled = (clamped * bar_length + 50) / 100;
    let empty = bar_length.saturating_sub(filled);
    format!("[{}{}] {percent}%", "█".repeat(filled), "░".repeat(empty))
}

/// Computes the dashboard statistics from a snapshot.
#[must_use]
pub fn compute_statistics(snapshot: &Snapshot, target_amount: f64) -> Statistics {
    let total_students = snapshot.students.len();
    let paid_students = snapshot
        .students
        .iter()
        .filter(|s| s.payment_status)
        .count();
    let total_collected: f64 = snapshot.payments.iter().map(|p| p.amount).sum();
    let paid_parents = snapshot
        .parents
        .iter()
        .filter(|p| p.payment_status)
        .count();

    let class_summary = summarize_classes(&snapshot.students, &snapshot.extra_classes);

    let highest_class = class_summary
        .iter()
        .min_by(|a, b| {
            b.percentage_paid
                .cmp(&a.percentage_paid)
                .then_with(|| a.class_name.cmp(&b.class_name))
        })
        .cloned();
    let lowest_class = class_summary
        .iter()
        .min_by(|a, b| {
            a.percentage_paid
                .cmp(&b.percentage_paid)
                .then_with(|| a.class_name.cmp(&b.class_name))
        })
        .cloned();

    Statistics {
        total_students,
        paid_students,
        percentage_paid: percentage(paid_students, total_students),
        total_collected,
        percentage_of_target: percentage_of_amount(total_collected, target_amount),
        total_parents: snapshot.parents.len(),
        paid_parents,
        class_summary,
        highest_class,
        lowest_class,
    }
}

/// Groups students by `class_name` and computes each class's paid percentage.
#[must_use]
pub fn summarize_classes(students: &[student::Model], extra_classes: &[String]) -> Vec<ClassSummary> {
    let mut counts: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for class_name in extra_classes {
        counts.entry(class_name.as_str()).or_default();
    }
    for student in students {
        let entry = counts.entry(student.class_name.as_str()).or_default();
        entry.0 += 1;
        if student.payment_status {
            entry.1 += 1;
        }
    }

    counts
        .into_iter()
        .map(|(class_name, (total, paid))| ClassSummary {
            class_name: class_name.to_string(),
            total,
            paid,
            percentage_paid: percentage(paid, total),
        })
        .collect()
}

/// Loads every student, payment and parent plus teachers' assigned classes.
pub async fn load_snapshot(db: &DatabaseConnection) -> Result<Snapshot> {
    let students = Student::find().all(db).await?;
    let payments = Payment::find().all(db).await?;
    let parents = Parent::find().all(db).await?;
    let extra_classes = Teacher::find()
        .all(db)
        .await?
        .into_iter()
        .flat_map(|t| t.assigned_classes.0)
        .collect();

    Ok(Snapshot {
        students,
        payments,
        parents,
        extra_classes,
    })
}

/// Loads the current snapshot and computes statistics against `target_amount`.
pub async fn load_statistics(db: &DatabaseConnection, target_amount: f64) -> Result<Statistics> {
    let snapshot = load_snapshot(db).await?;
    Ok(compute_statistics(&snapshot, target_amount))
}
