//! Teacher Discord commands - registration, listing, and homeroom assignment.

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
            listing::{self, TeacherQuery},
            student,
            teacher::{self, TeacherInput},
            validation,
        },
        entities::TeacherStatus,
        errors::{Error, Result},
    };
    use std::fmt::Write;

    const TEACHERS_PER_PAGE: usize = 10;

    /// Registers a new teacher.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_teacher(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Full name"] name: String,
        #[description = "Employee ID (must be unique)"] employee_id: String,
        #[description = "Contact number"] contact_number: String,
        #[description = "Email address"] email: String,
        #[description = "Home address"] address: String,
        #[description = "Date of birth (YYYY-MM-DD)"] date_of_birth: String,
        #[description = "Hire date (YYYY-MM-DD)"] hire_date: String,
        #[description = "Department"] department: String,
        #[description = "Position"] position: String,
        #[description = "Assigned classes, comma separated"] classes: Option<String>,
        #[description = "Monthly salary"] salary: Option<f64>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();

        let input = TeacherInput {
            name,
            employee_id,
            contact_number,
            email,
            address,
            date_of_birth: validation::date("date_of_birth", &date_of_birth)?,
            hire_date: validation::date("hire_date", &hire_date)?,
            department,
            position,
            assigned_classes: classes.as_deref().map(validation::class_list).unwrap_or_default(),
            status: TeacherStatus::Active,
            salary,
            notes,
        };

        match teacher::create_teacher(&data.database, input).await {
            Ok(created) => {
                let classes = if created.assigned_classes.0.is_empty() {
                    "no classes".to_string()
                } else {
                    created.assigned_classes.0.join(", ")
                };
                ctx.say(format!(
                    "✅ Registered teacher **{}** ({}) - {classes}",
                    created.name, created.employee_id
                ))
                .await?;
            }
            Err(Error::DuplicateEmployeeId { employee_id }) => {
                ctx.say(format!(
                    "❌ Employee ID '{employee_id}' is already in use by another teacher."
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Lists teachers, optionally filtered by text and status.
    #[poise::command(slash_command, prefix_command)]
    pub async fn teachers(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Matches name, employee ID, or email"] search: Option<String>,
        #[description = "Status tab (active, inactive, on_leave)"]
        #[autocomplete = "autocomplete::autocomplete_teacher_status"]
        status: Option<String>,
        #[description = "Page number"] page: Option<u32>,
    ) -> Result<()> {
        let query = TeacherQuery {
            search: search.unwrap_or_default(),
            status: status.as_deref().map(validation::teacher_status).transpose()?,
        };

        let all = teacher::get_all_teachers(&ctx.data().database).await?;
        let matching = listing::filter_teachers(&all, &query);
        let page = listing::paginate(
            &matching,
            page.map_or(1, |p| p as usize),
            TEACHERS_PER_PAGE,
        );

        if page.total_items == 0 {
            ctx.say("🔍 No teachers match.").await?;
            return Ok(());
        }

        let mut response = page_header("🧑‍🏫 **Teachers**", &page);
        for t in page.items {
            let status = match t.status {
                TeacherStatus::Active => "active",
                TeacherStatus::Inactive => "inactive",
                TeacherStatus::OnLeave => "on leave",
            };
            writeln!(
                &mut response,
                "**{}** ({}) - {} {} [{status}] classes: {}",
                t.name,
                t.employee_id,
                t.department,
                t.position,
                if t.assigned_classes.0.is_empty() {
                    "-".to_string()
                } else {
                    t.assigned_classes.0.join(", ")
                },
            )?;
        }

        ctx.say(fit_message(response)).await?;
        Ok(())
    }

    /// Edits a teacher's record. Only the given fields change.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit_teacher(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Teacher name or employee ID"]
        #[autocomplete = "autocomplete::autocomplete_teacher_name"]
        teacher_name: String,
        #[description = "New full name"] name: Option<String>,
        #[description = "New employee ID (must be unique)"] employee_id: Option<String>,
        #[description = "New contact number"] contact_number: Option<String>,
        #[description = "New email address"] email: Option<String>,
        #[description = "New home address"] address: Option<String>,
        #[description = "New department"] department: Option<String>,
        #[description = "New position"] position: Option<String>,
        #[description = "Assigned classes, comma separated (replaces the list)"] classes: Option<
            String,
        >,
        #[description = "New status (active, inactive, on_leave)"]
        #[autocomplete = "autocomplete::autocomplete_teacher_status"]
        status: Option<String>,
        #[description = "New monthly salary"] salary: Option<f64>,
        #[description = "New notes"] notes: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(found) = teacher::get_teacher_by_name(db, &teacher_name).await? else {
            ctx.say(format!("❌ Teacher '{teacher_name}' not found.")).await?;
            return Ok(());
        };

        let mut input = TeacherInput::from(&found);
        if let Some(name) = name {
            input.name = name;
        }
        if let Some(employee_id) = employee_id {
            input.employee_id = employee_id;
        }
        if let Some(contact_number) = contact_number {
            input.contact_number = contact_number;
        }
        if let Some(email) = email {
            input.email = email;
        }
        if let Some(address) = address {
            input.address = address;
        }
        if let Some(department) = department {
            input.department = department;
        }
        if let Some(position) = position {
            input.position = position;
        }
        if let Some(classes) = classes {
            input.assigned_classes = validation::class_list(&classes);
        }
        if let Some(value) = status {
            input.status = validation::teacher_status(&value)?;
        }
        if salary.is_some() {
            input.salary = salary;
        }
        if notes.is_some() {
            input.notes = notes;
        }

        match teacher::update_teacher(db, found.id, input).await {
            Ok(updated) => {
                ctx.say(format!(
                    "✏️ Updated teacher **{}** ({})",
                    updated.name, updated.employee_id
                ))
                .await?;
            }
            Err(Error::DuplicateEmployeeId { employee_id }) => {
                ctx.say(format!(
                    "❌ Employee ID '{employee_id}' is already in use by another teacher."
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Assigns a student to a homeroom teacher.
    #[poise::command(slash_command, prefix_command)]
    pub async fn assign_teacher(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Student name"]
        #[autocomplete = "autocomplete::autocomplete_student_name"]
        student_name: String,
        #[description = "Teacher name or employee ID"]
        #[autocomplete = "autocomplete::autocomplete_teacher_name"]
        teacher_name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(s) = student::get_student_by_name(db, &student_name).await? else {
            ctx.say(format!("❌ Student '{student_name}' not found.")).await?;
            return Ok(());
        };
        let Some(t) = teacher::get_teacher_by_name(db, &teacher_name).await? else {
            ctx.say(format!("❌ Teacher '{teacher_name}' not found.")).await?;
            return Ok(());
        };

        teacher::assign_teacher(db, s.id, t.id).await?;
        let note = if t.assigned_classes.contains(&s.class_name) {
            String::new()
        } else {
            format!(" (note: {} is not one of their classes)", s.class_name)
        };
        ctx.say(format!("🏫 **{}** is now in **{}**'s homeroom{note}", s.name, t.name))
            .await?;
        Ok(())
    }

    /// Removes a student's homeroom teacher.
    #[poise::command(slash_command, prefix_command)]
    pub async fn unassign_teacher(
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
        if s.teacher_id.is_none() {
            ctx.say(format!("ℹ️ **{}** has no homeroom teacher.", s.name))
                .await?;
            return Ok(());
        }

        let updated = teacher::unassign_teacher(db, s.id).await?;
        ctx.say(format!("✂️ **{}** no longer has a homeroom teacher.", updated.name))
            .await?;
        Ok(())
    }

    /// Deletes a teacher. Their students keep their records but lose the assignment.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_teacher(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Teacher name or employee ID"]
        #[autocomplete = "autocomplete::autocomplete_teacher_name"]
        teacher_name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(t) = teacher::get_teacher_by_name(db, &teacher_name).await? else {
            ctx.say(format!("❌ Teacher '{teacher_name}' not found.")).await?;
            return Ok(());
        };

        teacher::delete_teacher(db, t.id).await?;
        ctx.say(format!("🗑️ Deleted teacher **{}**.", t.name)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
