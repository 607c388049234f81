//! Student Discord commands - enrollment, search, and parent linking.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            BotData,
            commands::{fit_message, page_header},
            handlers::autocomplete,
        },
        core::{
            link,
            listing::{self, SortDirection, StudentQuery, StudentSortField},
            parent,
            student::{self, StudentInput},
            teacher, validation,
        },
        entities::StudentStatus,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    const STUDENTS_PER_PAGE: usize = 15;
    const AVAILABLE_PER_PAGE: usize = 25;

    /// Enrolls a new student, optionally linked to a parent and a teacher.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_student(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Full name"] name: String,
        #[description = "Class or section (e.g. 'Grade 1-A')"] class_name: String,
        #[description = "Grade level (e.g. 'Grade 1')"] grade_level: String,
        #[description = "Date of birth (YYYY-MM-DD)"] date_of_birth: String,
        #[description = "Contact number"] contact_number: String,
        #[description = "Home address"] address: String,
        #[description = "Parent to link to"]
        #[autocomplete = "autocomplete::autocomplete_parent_name"]
        parent_name: Option<String>,
        #[description = "Homeroom teacher"]
        #[autocomplete = "autocomplete::autocomplete_teacher_name"]
        teacher_name: Option<String>,
        #[description = "Email address"] email: Option<String>,
        #[description = "Enrollment date (YYYY-MM-DD, default today)"] enrollment_date: Option<
            String,
        >,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let date_of_birth = validation::date("date_of_birth", &date_of_birth)?;
        let enrollment_date = match enrollment_date {
            Some(value) => validation::date("enrollment_date", &value)?,
            None => chrono::Local::now().date_naive(),
        };

        let parent = match parent_name {
            Some(name) => {
                let Some(found) = parent::get_parent_by_name(db, &name).await? else {
                    ctx.say(format!("❌ Parent '{name}' not found.")).await?;
                    return Ok(());
                };
                Some(found)
            }
            None => None,
        };
        let teacher = match teacher_name {
            Some(name) => {
                let Some(found) = teacher::get_teacher_by_name(db, &name).await? else {
                    ctx.say(format!("❌ Teacher '{name}' not found.")).await?;
                    return Ok(());
                };
                Some(found)
            }
            None => None,
        };

        let created = student::create_student(
            db,
            StudentInput {
                name,
                class_name,
                grade_level,
                date_of_birth,
                contact_number,
                email,
                address,
                enrollment_date,
                status: StudentStatus::Active,
                notes,
            },
            parent.as_ref().map(|p| p.id),
            teacher.as_ref().map(|t| t.id),
        )
        .await?;

        let mut response = format!(
            "✅ Enrolled **{}** in {}",
            created.name, created.class_name
        );
        if let Some(p) = &parent {
            write!(&mut response, ", linked to {}", p.name)?;
        }
        if created.payment_status {
            response.push_str(" (already paid)");
        }
        ctx.say(response).await?;
        Ok(())
    }

    /// Searches the student list.
    ///
    /// Matches name, class, or parent name. Results can be narrowed by status tab and
    /// class, sorted by any column, and paged.
    #[poise::command(slash_command, prefix_command)]
    pub async fn students(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Text to search for"] search: Option<String>,
        #[description = "Status tab (active, inactive, transferred)"]
        #[autocomplete = "autocomplete::autocomplete_student_status"]
        status: Option<String>,
        #[description = "Only this class"]
        #[autocomplete = "autocomplete::autocomplete_class_name"]
        class_name: Option<String>,
        #[description = "Sort by (name, class, parent, payment_status, payment_date)"]
        #[autocomplete = "autocomplete::autocomplete_sort_field"]
        sort: Option<String>,
        #[description = "Sort descending"] descending: Option<bool>,
        #[description = "Page number"] page: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();

        let query = StudentQuery {
            search: search.unwrap_or_default(),
            status: status.as_deref().map(validation::student_status).transpose()?,
            class_name,
        };
        let field = sort
            .as_deref()
            .map(StudentSortField::parse)
            .transpose()?
            .unwrap_or_default();
        let direction = if descending.unwrap_or(false) {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        let all = student::list_student_details(&data.database).await?;
        let mut matching = listing::filter_students(&all, &query);
        listing::sort_students(&mut matching, field, direction);
        let page = listing::paginate(
            &matching,
            page.map_or(1, |p| p as usize),
            STUDENTS_PER_PAGE,
        );

        if page.total_items == 0 {
            ctx.say("🔍 No students match.").await?;
            return Ok(());
        }

        let mut response = page_header("🎒 **Students**", &page);
        for details in page.items {
            let s = &details.student;
            let mark = if s.payment_status { "✅" } else { "⏳" };
            writeln!(
                &mut response,
                "{mark} **{}** - {} | parent: {} | teacher: {}",
                s.name,
                s.class_name,
                details.parent_name().unwrap_or("-"),
                details.teacher_name().unwrap_or("-"),
            )?;
        }

        ctx.say(fit_message(response)).await?;
        Ok(())
    }

    /// Lists students that are not linked to any parent.
    #[poise::command(slash_command, prefix_command)]
    pub async fn available_students(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Page number"] page: Option<u32>,
    ) -> Result<()> {
        let available = link::available_students(&ctx.data().database).await?;

        if available.is_empty() {
            ctx.say("🎒 Every student is linked to a parent.").await?;
            return Ok(());
        }

        let page = listing::paginate(
            &available,
            page.map_or(1, |p| p as usize),
            AVAILABLE_PER_PAGE,
        );
        let mut response = page_header("🎒 **Available Students**", &page);
        for s in &page.items {
            writeln!(&mut response, "• **{}** ({})", s.name, s.class_name)?;
        }
        ctx.say(fit_message(response)).await?;
        Ok(())
    }

    /// Edits a student's profile. Only the given fields change.
    ///
    /// Parent and teacher links are changed with `/link_student`, `/unlink_student`,
    /// `/assign_teacher` and `/unassign_teacher`.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit_student(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        student_name: String,
        #[description = "New full name"] name: Option<String>,
        #[description = "New class or section"]
        #[autocomplete = "autocomplete::autocomplete_class_name"]
        class_name: Option<String>,
        #[description = "New grade level"] grade_level: Option<String>,
        #[description = "New date of birth (YYYY-MM-DD)"] date_of_birth: Option<String>,
        #[description = "New contact number"] contact_number: Option<String>,
        #[description = "New email address"] email: Option<String>,
        #[description = "New home address"] address: Option<String>,
        #[description = "New enrollment date (YYYY-MM-DD)"] enrollment_date: Option<String>,
        #[description = "New status (active, inactive, transferred)"]
        #[autocomplete = "autocomplete::autocomplete_student_status"]
        status: Option<String>,
        #[description = "New notes"] notes: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(found) = student::get_student_by_name(db, &student_name).await? else {
            ctx.say(format!("❌ Student '{student_name}' not found.")).await?;
            return Ok(());
        };

        let mut input = StudentInput::from(&found);
        if let Some(name) = name {
            input.name = name;
        }
        if let Some(class_name) = class_name {
            input.class_name = class_name;
        }
        if let Some(grade_level) = grade_level {
            input.grade_level = grade_level;
        }
        if let Some(value) = date_of_birth {
            input.date_of_birth = validation::date("date_of_birth", &value)?;
        }
        if let Some(contact_number) = contact_number {
            input.contact_number = contact_number;
        }
        if email.is_some() {
            input.email = email;
        }
        if let Some(address) = address {
            input.address = address;
        }
        if let Some(value) = enrollment_date {
            input.enrollment_date = validation::date("enrollment_date", &value)?;
        }
        if let Some(value) = status {
            input.status = validation::student_status(&value)?;
        }
        if notes.is_some() {
            input.notes = notes;
        }

        let updated = student::update_student(db, found.id, input).await?;
        ctx.say(format!(
            "✏️ Updated student **{}** ({})",
            updated.name, updated.class_name
        ))
        .await?;
        Ok(())
    }

    /// Links a student to a parent.
    #[poise::command(slash_command, prefix_command)]
    pub async fn link_student(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_available_student"]
        student_name: String,
        #[description = "Parent name"]
        #[autocomplete = "autocomplete::autocomplete_parent_name"]
        parent_name: String,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let Some(s) = student::get_student_by_name(db, &student_name).await? else {
            ctx.say(format!("❌ Student '{student_name}' not found.")).await?;
            return Ok(());
        };
        let Some(p) = parent::get_parent_by_name(db, &parent_name).await? else {
            ctx.say(format!("❌ Parent '{parent_name}' not found.")).await?;
            return Ok(());
        };

        match link::link_student(db, s.id, p.id, data.config.link_policy).await {
            Ok(linked) => {
                let paid = if linked.payment_status { " (paid)" } else { "" };
                ctx.say(format!("🔗 Linked **{}** to **{}**{paid}", linked.name, p.name))
                    .await?;
            }
            Err(Error::AlreadyLinked { .. }) => {
                ctx.say(format!(
                    "❌ **{}** is already linked to another parent. Unlink them first with `/unlink_student`.",
                    s.name
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Removes a student's parent link.
    #[poise::command(slash_command, prefix_command)]
    pub async fn unlink_student(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        student_name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(s) = student::get_student_by_name(db, &student_name).await? else {
            ctx.say(format!("❌ Student '{student_name}' not found.")).await?;
            return Ok(());
        };
        if s.parent_id.is_none() {
            ctx.say(format!("ℹ️ **{}** is not linked to a parent.", s.name))
                .await?;
            return Ok(());
        }

        let unlinked = link::unlink_student(db, s.id).await?;
        ctx.say(format!("✂️ **{}** is now available for linking.", unlinked.name))
            .await?;
        Ok(())
    }

    /// Deletes a student.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_student(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        student_name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(s) = student::get_student_by_name(db, &student_name).await? else {
            ctx.say(format!("❌ Student '{student_name}' not found.")).await?;
            return Ok(());
        };

        student::delete_student(db, s.id).await?;
        ctx.say(format!("🗑️ Deleted student **{}**.", s.name)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
