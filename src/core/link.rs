//! Student-parent linkage.
//!
//! The link is stored once, as `students.parent_id`; a parent's linked set is always
//! derived from it. Every student is therefore in exactly one of two pools: linked to
//! some parent, or available (no parent).

use crate::{
    config::LinkPolicy,
    entities::{Parent, Student, student},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*};
use tracing::info;

/// Links a student to a parent.
///
/// * Linking to the parent the student already has is a no-op.
/// * If the student belongs to a different parent, [`LinkPolicy::Reject`] fails with
///   [`Error::AlreadyLinked`] and [`LinkPolicy::Replace`] moves the student.
/// * If the parent has already paid, an unpaid student is marked paid as of the
///   parent's payment date.
pub async fn link_student(
    db: &DatabaseConnection,
    student_id: Uuid,
    parent_id: Uuid,
    policy: LinkPolicy,
) -> Result<student::Model> {
    let txn = db.begin().await?;

    let student = Student::find_by_id(student_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Student", student_id))?;
    let parent = Parent::find_by_id(parent_id)
        .one(&txn)
        .await?
        .ok_or_else(|| Error::not_found("Parent", parent_id))?;

    match student.parent_id {
        Some(current) if current == parent_id => return Ok(student),
        Some(current) if policy == LinkPolicy::Reject => {
            return Err(Error::AlreadyLinked {
                student_id: student_id.to_string(),
                parent_id: current.to_string(),
            });
        }
        _ => {}
    }

    let previous_parent = student.parent_id;
    let already_paid = student.payment_status;
    let mut student: student::ActiveModel = student.into();
    student.parent_id = Set(Some(parent_id));
    if parent.payment_status && !already_paid {
        student.payment_status = Set(true);
        student.payment_date = Set(parent.payment_date);
    }
    student.updated_at = Set(chrono::Utc::now());
    let student = student.update(&txn).await?;

    txn.commit().await?;

    info!(
        %student_id,
        %parent_id,
        replaced = previous_parent.is_some(),
        "Linked student to parent"
    );
    Ok(student)
}

/// Removes a student's parent link. The student's payment status is left as is.
///
/// Unlinking a student that has no parent succeeds without changes.
pub async fn unlink_student(db: &DatabaseConnection, student_id: Uuid) -> Result<student::Model> {
    let student = Student::find_by_id(student_id)
        .one(db)
        .await?
        .ok_or_else(|| Error::not_found("Student", student_id))?;

    let Some(previous_parent) = student.parent_id else {
        return Ok(student);
    };

    let mut student: student::ActiveModel = student.into();
    student.parent_id = Set(None);
    student.updated_at = Set(chrono::Utc::now());
    let student = student.update(db).await?;

    info!(%student_id, parent_id = %previous_parent, "Unlinked student from parent");
    Ok(student)
}

/// Students with no parent, ordered by name.
pub async fn available_students(db: &DatabaseConnection) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::ParentId.is_null())
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Students linked to `parent_id`, ordered by name.
pub async fn linked_students(
    db: &DatabaseConnection,
    parent_id: Uuid,
) -> Result<Vec<student::Model>> {
    Student::find()
        .filter(student::Column::ParentId.eq(parent_id))
        .order_by_asc(student::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{parent as parents, payment, student as students};
    use crate::test_utils::*;
    use std::collections::HashSet;

    /// Checks that linked and available sets partition all students and that every
    /// `parent_id` shows up in exactly that parent's linked set.
    async fn assert_partitioned(db: &DatabaseConnection) -> Result<()> {
        let all = students::get_all_students(db).await?;
        let available = available_students(db).await?;
        let mut seen: HashSet<Uuid> = available.iter().map(|s| s.id).collect();
        assert_eq!(seen.len(), available.len(), "available set has duplicates");

        for parent in parents::get_all_parents(db).await? {
            for student in linked_students(db, parent.id).await? {
                assert_eq!(student.parent_id, Some(parent.id));
                assert!(seen.insert(student.id), "student in two pools");
            }
        }

        let all_ids: HashSet<Uuid> = all.iter().map(|s| s.id).collect();
        assert_eq!(seen, all_ids);
        Ok(())
    }

    #[tokio::test]
    async fn test_link_student() -> Result<()> {
        let db = setup_test_db().await?;
        let parent = create_test_parent(&db, "Jane Doe").await?;
        let alice = create_test_student(&db, "Alice", "Grade 3-A").await?;
        assert_eq!(available_students(&db).await?.len(), 1);

        let linked = link_student(&db, alice.id, parent.id, LinkPolicy::Reject).await?;
        assert_eq!(linked.parent_id, Some(parent.id));
        assert!(!linked.payment_status);

        assert!(available_students(&db).await?.is_empty());
        let family = linked_students(&db, parent.id).await?;
        assert_eq!(family.len(), 1);
        assert_eq!(family[0].id, alice.id);
        assert_partitioned(&db).await
    }

    #[tokio::test]
    async fn test_link_same_parent_is_idempotent() -> Result<()> {
        let (db, parent, family) = setup_with_family().await?;

        let again = link_student(&db, family[0].id, parent.id, LinkPolicy::Reject).await?;
        assert_eq!(again, family[0]);
        assert_eq!(linked_students(&db, parent.id).await?.len(), 2);
        assert_partitioned(&db).await
    }

    #[tokio::test]
    async fn test_link_to_other_parent_rejected() -> Result<()> {
        let (db, parent, family) = setup_with_family().await?;
        let ana = create_test_parent(&db, "Ana Reyes").await?;

        let result = link_student(&db, family[0].id, ana.id, LinkPolicy::Reject).await;
        match result {
            Err(Error::AlreadyLinked {
                student_id,
                parent_id,
            }) => {
                assert_eq!(student_id, family[0].id.to_string());
                assert_eq!(parent_id, parent.id.to_string());
            }
            other => panic!("expected AlreadyLinked, got {other:?}"),
        }

        // The existing link is intact
        let alice = students::get_student_by_id(&db, family[0].id).await?.unwrap();
        assert_eq!(alice.parent_id, Some(parent.id));
        assert_partitioned(&db).await
    }

    #[tokio::test]
    async fn test_link_to_other_parent_replaced() -> Result<()> {
        let (db, parent, family) = setup_with_family().await?;
        let ana = create_test_parent(&db, "Ana Reyes").await?;

        let moved = link_student(&db, family[0].id, ana.id, LinkPolicy::Replace).await?;
        assert_eq!(moved.parent_id, Some(ana.id));

        assert_eq!(linked_students(&db, parent.id).await?.len(), 1);
        assert_eq!(linked_students(&db, ana.id).await?.len(), 1);
        assert_partitioned(&db).await
    }

    #[tokio::test]
    async fn test_link_missing_records() -> Result<()> {
        let db = setup_test_db().await?;
        let parent = create_test_parent(&db, "Jane Doe").await?;
        let alice = create_test_student(&db, "Alice", "Grade 3-A").await?;

        let result = link_student(&db, Uuid::new_v4(), parent.id, LinkPolicy::Reject).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "Student",
                ..
            }
        ));

        let result = link_student(&db, alice.id, Uuid::new_v4(), LinkPolicy::Reject).await;
        assert!(matches!(
            result.unwrap_err(),
            Error::NotFound {
                entity: "Parent",
                ..
            }
        ));
        assert_partitioned(&db).await
    }

    #[tokio::test]
    async fn test_link_to_paid_parent_marks_student_paid() -> Result<()> {
        let (db, parent, _family) = setup_with_family().await?;
        payment::record_payment(&db, test_payment(parent.id, 500.0)).await?;
        let carlo = create_test_student(&db, "Carlo", "Grade 2-B").await?;

        let carlo = link_student(&db, carlo.id, parent.id, LinkPolicy::Reject).await?;
        assert!(carlo.payment_status);
        assert_eq!(carlo.payment_date, Some(test_date()));
        Ok(())
    }

    #[tokio::test]
    async fn test_unlink_moves_student_to_available_once() -> Result<()> {
        let (db, parent, family) = setup_with_family().await?;
        let before = available_students(&db).await?.len();

        let alice = unlink_student(&db, family[0].id).await?;
        assert_eq!(alice.parent_id, None);

        let available = available_students(&db).await?;
        assert_eq!(available.len(), before + 1);
        assert_eq!(available.iter().filter(|s| s.id == alice.id).count(), 1);

        let remaining = linked_students(&db, parent.id).await?;
        assert_eq!(remaining.len(), 1);
        assert!(remaining.iter().all(|s| s.id != alice.id));
        assert_partitioned(&db).await
    }

    #[tokio::test]
    async fn test_unlink_unlinked_student_is_noop() -> Result<()> {
        let db = setup_test_db().await?;
        let alice = create_test_student(&db, "Alice", "Grade 3-A").await?;

        let unchanged = unlink_student(&db, alice.id).await?;
        assert_eq!(unchanged, alice);
        assert_eq!(available_students(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_unlink_missing_student() -> Result<()> {
        let db = setup_test_db().await?;
        let result = unlink_student(&db, Uuid::new_v4()).await;
        assert!(matches!(result.unwrap_err(), Error::NotFound { .. }));
        Ok(())
    }

    #[tokio::test]
    async fn test_partition_holds_across_sequence() -> Result<()> {
        let (db, parent, family) = setup_with_family().await?;
        let ana = create_test_parent(&db, "Ana Reyes").await?;
        let carlo = create_test_student(&db, "Carlo", "Grade 2-B").await?;

        link_student(&db, carlo.id, ana.id, LinkPolicy::Reject).await?;
        assert_partitioned(&db).await?;
        unlink_student(&db, family[1].id).await?;
        assert_partitioned(&db).await?;
        link_student(&db, family[1].id, ana.id, LinkPolicy::Reject).await?;
        assert_partitioned(&db).await?;
        link_student(&db, carlo.id, parent.id, LinkPolicy::Replace).await?;
        assert_partitioned(&db).await?;

        assert_eq!(linked_students(&db, ana.id).await?.len(), 1);
        assert_eq!(linked_students(&db, parent.id).await?.len(), 2);
        Ok(())
    }
}
