//! Search, filter, sort and pagination for list views.
//!
//! Lists are small (a single school), so these work on slices already in memory rather
//! than building queries. Text search is a case-insensitive substring match.

use crate::{
    core::{parent::ParentWithStudents, student::StudentDetails},
    entities::{StudentStatus, TeacherStatus, teacher},
    errors::{Error, Result},
};
use std::cmp::Ordering;

/// Filters applied to the student list.
#[derive(Debug, Clone, Default)]
pub struct StudentQuery {
    /// Text matched against student name, class name, and parent name
    pub search: String,
    /// Status tab; `None` shows all students
    pub status: Option<StudentStatus>,
    /// Exact class name; `None` shows all classes
    pub class_name: Option<String>,
}

/// Filters applied to the parent list.
#[derive(Debug, Clone, Default)]
pub struct ParentQuery {
    /// Text matched against parent name and email
    pub search: String,
    /// `Some(true)` keeps paid parents, `Some(false)` unpaid ones; `None` shows all
    pub paid: Option<bool>,
}

/// Filters applied to the teacher list.
#[derive(Debug, Clone, Default)]
pub struct TeacherQuery {
    /// Text matched against teacher name, employee ID, and email
    pub search: String,
    /// Status tab; `None` shows all teachers
    pub status: Option<TeacherStatus>,
}

/// Column the student list is sorted by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StudentSortField {
    /// Student name
    #[default]
    Name,
    /// Class name
    ClassName,
    /// Linked parent's name (unlinked students first when ascending)
    ParentName,
    /// Payment status (unpaid first when ascending)
    PaymentStatus,
    /// Payment date (unpaid first when ascending)
    PaymentDate,
}

impl StudentSortField {
    /// Names accepted by [`StudentSortField::parse`].
    pub const NAMES: [&'static str; 5] = ["name", "class", "parent", "payment_status", "payment_date"];

    /// Parses a sort column name, ignoring case.
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().replace(' ', "_").as_str() {
            "name" => Ok(Self::Name),
            "class" | "class_name" => Ok(Self::ClassName),
            "parent" | "parent_name" => Ok(Self::ParentName),
            "payment_status" | "status" => Ok(Self::PaymentStatus),
            "payment_date" | "date" => Ok(Self::PaymentDate),
            other => Err(Error::validation(
                "sort",
                format!("'{other}' is not one of {}", Self::NAMES.join(", ")),
            )),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first
    #[default]
    Ascending,
    /// Largest first
    Descending,
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based page number actually returned
    pub page: usize,
    /// Number of pages (at least 1)
    pub total_pages: usize,
    /// Number of items across all pages
    pub total_items: usize,
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Returns the students matching `query`, preserving input order.
///
/// An empty (or whitespace-only) search matches every student; the status tab and
/// class filter still apply.
#[must_use]
pub fn filter_students<'a>(
    students: &'a [StudentDetails],
    query: &StudentQuery,
) -> Vec<&'a StudentDetails> {
    let needle = query.search.trim().to_lowercase();

    students
        .iter()
        .filter(|details| {
            let student = &details.student;
            let matches_search = needle.is_empty()
                || contains_ignore_case(&student.name, &needle)
                || contains_ignore_case(&student.class_name, &needle)
                || details
                    .parent_name()
                    .is_some_and(|name| contains_ignore_case(name, &needle));
            let matches_status = query.status.is_none_or(|status| student.status == status);
            let matches_class = query
                .class_name
                .as_deref()
                .is_none_or(|class_name| student.class_name == class_name);

            matches_search && matches_status && matches_class
        })
        .collect()
}

/// Returns the parents matching `query`, preserving input order.
#[must_use]
pub fn filter_parents<'a>(
    families: &'a [ParentWithStudents],
    query: &ParentQuery,
) -> Vec<&'a ParentWithStudents> {
    let needle = query.search.trim().to_lowercase();

    families
        .iter()
        .filter(|family| {
            let parent = &family.parent;
            let matches_search = needle.is_empty()
                || contains_ignore_case(&parent.name, &needle)
                || contains_ignore_case(&parent.email, &needle);
            let matches_paid = query.paid.is_none_or(|paid| parent.payment_status == paid);
            matches_search && matches_paid
        })
        .collect()
}

/// Returns the teachers matching `query`, preserving input order.
#[must_use]
pub fn filter_teachers<'a>(
    teachers: &'a [teacher::Model],
    query: &TeacherQuery,
) -> Vec<&'a teacher::Model> {
    let needle = query.search.trim().to_lowercase();

    teachers
        .iter()
        .filter(|teacher| {
            let matches_search = needle.is_empty()
                || contains_ignore_case(&teacher.name, &needle)
                || contains_ignore_case(&teacher.employee_id, &needle)
                || contains_ignore_case(&teacher.email, &needle);
            let matches_status = query.status.is_none_or(|status| teacher.status == status);
            matches_search && matches_status
        })
        .collect()
}

/// Sorts students in place. The sort is stable, so equal keys keep their order.
pub fn sort_students(
    students: &mut [&StudentDetails],
    field: StudentSortField,
    direction: SortDirection,
) {
    students.sort_by(|a, b| {
        let ordering = compare_students(a, b, field);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn compare_students(a: &StudentDetails, b: &StudentDetails, field: StudentSortField) -> Ordering {
    match field {
        StudentSortField::Name => a.student.name.cmp(&b.student.name),
        StudentSortField::ClassName => a.student.class_name.cmp(&b.student.class_name),
        StudentSortField::ParentName => a.parent_name().cmp(&b.parent_name()),
        StudentSortField::PaymentStatus => a.student.payment_status.cmp(&b.student.payment_status),
        StudentSortField::PaymentDate => a.student.payment_date.cmp(&b.student.payment_date),
    }
}

/// Cuts one page out of `items`.
///
/// Pages are 1-based. A page past the end is clamped to the last page, page 0 to the
/// first, and a `per_page` of 0 is treated as 1.
#[must_use]
pub fn paginate<T: Clone>(items: &[T], page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = (page - 1) * per_page;
    let end = (start + per_page).min(total_items);
    let items = items.get(start..end).map(<[T]>::to_vec).unwrap_or_default();

    Page {
        items,
        page,
        total_pages,
        total_items,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{AssignedClasses, parent, student};
    use crate::test_utils::test_date;
    use chrono::{NaiveDate, Utc};
    use sea_orm::prelude::Uuid;

    fn details(
        name: &str,
        class_name: &str,
        parent_name: Option<&str>,
        status: StudentStatus,
        paid_on: Option<NaiveDate>,
    ) -> StudentDetails {
        let now = Utc::now();
        let parent = parent_name.map(|name| parent::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            contact_number: "0917 555 0000".to_string(),
            email: "parent@example.com".to_string(),
            address: None,
            payment_status: false,
            payment_date: None,
            payment_amount: None,
            payment_method: None,
            receipt_reference: None,
            created_at: now,
            updated_at: now,
        });
        StudentDetails {
            student: student::Model {
                id: Uuid::new_v4(),
                name: name.to_string(),
                class_name: class_name.to_string(),
                grade_level: "Grade 1".to_string(),
                date_of_birth: test_date(),
                contact_number: "0917 555 0000".to_string(),
                email: None,
                address: "Somewhere".to_string(),
                enrollment_date: test_date(),
                status,
                payment_status: paid_on.is_some(),
                payment_date: paid_on,
                parent_id: parent.as_ref().map(|p| p.id),
                teacher_id: None,
                notes: None,
                created_at: now,
                updated_at: now,
            },
            parent,
            teacher: None,
        }
    }

    fn roster() -> Vec<StudentDetails> {
        vec![
            details("Alice Doe", "Grade 1-A", Some("Jane Doe"), StudentStatus::Active, Some(test_date())),
            details("Bob Doe", "Grade 2-B", Some("Jane Doe"), StudentStatus::Active, None),
            details("Carlo Reyes", "Grade 1-A", None, StudentStatus::Inactive, None),
            details("Dana Lim", "Grade 3-C", Some("Ana Lim"), StudentStatus::Transferred, None),
        ]
    }

    fn names(list: &[&StudentDetails]) -> Vec<String> {
        list.iter().map(|d| d.student.name.clone()).collect()
    }

    #[test]
    fn test_empty_search_returns_all() {
        let roster = roster();
        let result = filter_students(&roster, &StudentQuery::default());
        assert_eq!(result.len(), roster.len());

        let result = filter_students(
            &roster,
            &StudentQuery {
                search: "   ".to_string(),
                ..StudentQuery::default()
            },
        );
        assert_eq!(result.len(), roster.len());
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let roster = roster();
        let query = StudentQuery {
            search: "ALICE".to_string(),
            ..StudentQuery::default()
        };
        assert_eq!(names(&filter_students(&roster, &query)), vec!["Alice Doe"]);
    }

    #[test]
    fn test_search_matches_class_name() {
        let roster = roster();
        let query = StudentQuery {
            search: "grade 1".to_string(),
            ..StudentQuery::default()
        };
        assert_eq!(
            names(&filter_students(&roster, &query)),
            vec!["Alice Doe", "Carlo Reyes"]
        );
    }

    #[test]
    fn test_search_matches_parent_name() {
        let roster = roster();
        let query = StudentQuery {
            search: "ana".to_string(),
            ..StudentQuery::default()
        };
        assert_eq!(names(&filter_students(&roster, &query)), vec!["Dana Lim"]);
    }

    #[test]
    fn test_status_tab_restricts_results() {
        let roster = roster();
        let query = StudentQuery {
            search: "doe".to_string(),
            status: Some(StudentStatus::Active),
            ..StudentQuery::default()
        };
        assert_eq!(
            names(&filter_students(&roster, &query)),
            vec!["Alice Doe", "Bob Doe"]
        );

        let query = StudentQuery {
            status: Some(StudentStatus::Inactive),
            ..StudentQuery::default()
        };
        assert_eq!(names(&filter_students(&roster, &query)), vec!["Carlo Reyes"]);
    }

    #[test]
    fn test_class_filter() {
        let roster = roster();
        let query = StudentQuery {
            class_name: Some("Grade 1-A".to_string()),
            ..StudentQuery::default()
        };
        assert_eq!(
            names(&filter_students(&roster, &query)),
            vec!["Alice Doe", "Carlo Reyes"]
        );
    }

    #[test]
    fn test_sort_by_payment_status() {
        let roster = roster();
        let mut list: Vec<&StudentDetails> = roster.iter().collect();

        sort_students(&mut list, StudentSortField::PaymentStatus, SortDirection::Descending);
        assert_eq!(list[0].student.name, "Alice Doe");

        sort_students(&mut list, StudentSortField::PaymentStatus, SortDirection::Ascending);
        assert_eq!(list[3].student.name, "Alice Doe");
    }

    #[test]
    fn test_sort_by_name_descending() {
        let roster = roster();
        let mut list: Vec<&StudentDetails> = roster.iter().collect();
        sort_students(&mut list, StudentSortField::Name, SortDirection::Descending);
        assert_eq!(
            names(&list),
            vec!["Dana Lim", "Carlo Reyes", "Bob Doe", "Alice Doe"]
        );
    }

    #[test]
    fn test_sort_by_parent_name_puts_unlinked_first() {
        let roster = roster();
        let mut list: Vec<&StudentDetails> = roster.iter().collect();
        sort_students(&mut list, StudentSortField::ParentName, SortDirection::Ascending);
        assert_eq!(list[0].student.name, "Carlo Reyes");
        assert_eq!(list[1].student.name, "Dana Lim");
    }

    #[test]
    fn test_parse_sort_field() {
        assert_eq!(StudentSortField::parse("Name").unwrap(), StudentSortField::Name);
        assert_eq!(
            StudentSortField::parse("payment date").unwrap(),
            StudentSortField::PaymentDate
        );
        assert_eq!(StudentSortField::parse("class").unwrap(), StudentSortField::ClassName);
        for name in StudentSortField::NAMES {
            assert!(StudentSortField::parse(name).is_ok());
        }
        assert!(StudentSortField::parse("age").is_err());
    }

    #[test]
    fn test_paginate() {
        let items: Vec<u32> = (1..=12).collect();

        let first = paginate(&items, 1, 5);
        assert_eq!(first.items, vec![1, 2, 3, 4, 5]);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 12);

        let last = paginate(&items, 3, 5);
        assert_eq!(last.items, vec![11, 12]);

        let clamped = paginate(&items, 99, 5);
        assert_eq!(clamped.page, 3);
        assert_eq!(clamped.items, vec![11, 12]);

        let zero = paginate(&items, 0, 5);
        assert_eq!(zero.page, 1);
    }

    #[test]
    fn test_paginate_school_sized_list() {
        let items: Vec<u32> = (1..=300).collect();

        let page = paginate(&items, 20, 15);
        assert_eq!(page.total_pages, 20);
        assert_eq!(page.items.len(), 15);
        assert_eq!(page.items.first(), Some(&286));
        assert!((1..=20).all(|n| paginate(&items, n, 15).items.len() <= 15));
    }

    #[test]
    fn test_filter_parents() {
        fn parent_names(list: Vec<&ParentWithStudents>) -> Vec<String> {
            list.iter().map(|f| f.parent.name.clone()).collect()
        }

        let family = |name: &str, email: &str, paid: bool| {
            let now = Utc::now();
            ParentWithStudents {
                parent: parent::Model {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    contact_number: "0917 555 0000".to_string(),
                    email: email.to_string(),
                    address: None,
                    payment_status: paid,
                    payment_date: paid.then(test_date),
                    payment_amount: paid.then_some(500.0),
                    payment_method: paid.then(|| "cash".to_string()),
                    receipt_reference: None,
                    created_at: now,
                    updated_at: now,
                },
                students: Vec::new(),
            }
        };
        let families = vec![
            family("Jane Doe", "jane@example.com", true),
            family("Ana Reyes", "ana.reyes@school.ph", false),
            family("Mark Lim", "mlim@example.com", false),
        ];

        assert_eq!(filter_parents(&families, &ParentQuery::default()).len(), 3);

        let by_name = ParentQuery {
            search: "JANE".to_string(),
            paid: None,
        };
        assert_eq!(parent_names(filter_parents(&families, &by_name)), vec!["Jane Doe"]);

        let by_email = ParentQuery {
            search: "school.ph".to_string(),
            paid: None,
        };
        assert_eq!(parent_names(filter_parents(&families, &by_email)), vec!["Ana Reyes"]);

        let unpaid = ParentQuery {
            search: String::new(),
            paid: Some(false),
        };
        assert_eq!(
            parent_names(filter_parents(&families, &unpaid)),
            vec!["Ana Reyes", "Mark Lim"]
        );

        let paid_example = ParentQuery {
            search: "example.com".to_string(),
            paid: Some(true),
        };
        assert_eq!(parent_names(filter_parents(&families, &paid_example)), vec!["Jane Doe"]);
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<u32> = Vec::new();
        let page = paginate(&items, 1, 5);
        assert!(page.items.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn test_filter_teachers() {
        let now = Utc::now();
        let teacher = |name: &str, employee_id: &str, status: TeacherStatus| teacher::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            employee_id: employee_id.to_string(),
            contact_number: "0917 555 0000".to_string(),
            email: format!("{}@school.edu", employee_id.to_lowercase()),
            address: "Somewhere".to_string(),
            date_of_birth: test_date(),
            hire_date: test_date(),
            department: "Science".to_string(),
            position: "Adviser".to_string(),
            assigned_classes: AssignedClasses::default(),
            status,
            salary: None,
            notes: None,
            created_at: now,
            updated_at: now,
        };
        let teachers = vec![
            teacher("Mr. Cruz", "T-001", TeacherStatus::Active),
            teacher("Ms. Lim", "T-002", TeacherStatus::OnLeave),
        ];

        let by_id = filter_teachers(
            &teachers,
            &TeacherQuery {
                search: "t-002".to_string(),
                status: None,
            },
        );
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].name, "Ms. Lim");

        let by_email = filter_teachers(
            &teachers,
            &TeacherQuery {
                search: "T-001@SCHOOL".to_string(),
                status: None,
            },
        );
        assert_eq!(by_email.len(), 1);

        let on_leave = filter_teachers(
            &teachers,
            &TeacherQuery {
                search: String::new(),
                status: Some(TeacherStatus::OnLeave),
            },
        );
        assert_eq!(on_leave.len(), 1);
        assert_eq!(on_leave[0].employee_id, "T-002");
    }
}
