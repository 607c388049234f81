//! Parent Discord commands - registration, listing, details, and deletion.

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
            listing::{self, ParentQuery},
            parent::{self, ParentInput},
            payment, validation,
        },
        errors::{Error, Result},
    };
    use std::fmt::Write;

    const PARENTS_PER_PAGE: usize = 15;
    const PAYMENTS_PER_PAGE: usize = 10;

    /// Registers a new parent.
    #[poise::command(slash_command, prefix_command)]
    pub async fn add_parent(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Full name"] name: String,
        #[description = "Contact number"] contact_number: String,
        #[description = "Email address"] email: String,
        #[description = "Home address"] address: Option<String>,
    ) -> Result<()> {
        let created = parent::create_parent(
            &ctx.data().database,
            ParentInput {
                name,
                contact_number,
                email,
                address,
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Registered parent **{}** ({})",
            created.name, created.email
        ))
        .await?;
        Ok(())
    }

    /// Lists parents with their linked students and payment status.
    ///
    /// Matches name or email, and can be narrowed to paid or unpaid parents.
    #[poise::command(slash_command, prefix_command)]
    pub async fn parents(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Matches name or email"] search: Option<String>,
        #[description = "Payment tab (paid, unpaid)"]
        #[autocomplete = "autocomplete::autocomplete_payment_status"]
        status: Option<String>,
        #[description = "Page number"] page: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let query = ParentQuery {
            search: search.unwrap_or_default(),
            paid: status.as_deref().map(validation::payment_status).transpose()?,
        };

        let families = parent::get_all_parents_with_students(&data.database).await?;
        if families.is_empty() {
            ctx.say("👪 No parents registered yet. Add one with `/add_parent`.")
                .await?;
            return Ok(());
        }

        let matching = listing::filter_parents(&families, &query);
        let page = listing::paginate(
            &matching,
            page.map_or(1, |p| p as usize),
            PARENTS_PER_PAGE,
        );
        if page.total_items == 0 {
            ctx.say("🔍 No parents match.").await?;
            return Ok(());
        }

        let mut response = page_header("👪 **Parents**", &page);
        for family in page.items {
            let status = match (family.parent.payment_status, family.parent.payment_amount) {
                (true, Some(amount)) => format!("✅ Paid {}", data.config.format_amount(amount)),
                (true, None) => "✅ Paid".to_string(),
                (false, _) => "⏳ Unpaid".to_string(),
            };
            let children: Vec<&str> = family.students.iter().map(|s| s.name.as_str()).collect();
            let children = if children.is_empty() {
                "no students linked".to_string()
            } else {
                children.join(", ")
            };
            writeln!(
                &mut response,
                "**{}** - {status} ({children})",
                family.parent.name
            )?;
        }

        ctx.say(fit_message(response)).await?;
        Ok(())
    }

    /// Shows a parent's contact details, linked students, and payment history.
    #[poise::command(slash_command, prefix_command)]
    pub async fn parent_info(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Parent name"]
        #[autocomplete = "autocomplete::autocomplete_parent_name"]
        parent_name: String,
        #[description = "Payment history page"] page: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let Some(found) = parent::get_parent_by_name(db, &parent_name).await? else {
            ctx.say(format!("❌ Parent '{parent_name}' not found.")).await?;
            return Ok(());
        };
        let Some(family) = parent::get_parent_with_students(db, found.id).await? else {
            ctx.say(format!("❌ Parent '{parent_name}' not found.")).await?;
            return Ok(());
        };
        let history = payment::get_payments_for_parent(db, found.id).await?;

        let p = &family.parent;
        let mut response = format!("👤 **{}**\n", p.name);
        writeln!(&mut response, "📞 {} | ✉️ {}", p.contact_number, p.email)?;
        if let Some(address) = &p.address {
            writeln!(&mut response, "🏠 {address}")?;
        }
        if p.payment_status {
            writeln!(
                &mut response,
                "💰 Paid {} on {} via {}",
                p.payment_amount
                    .map_or_else(String::new, |a| data.config.format_amount(a)),
                p.payment_date
                    .map_or_else(String::new, |d| d.format("%Y-%m-%d").to_string()),
                p.payment_method.as_deref().unwrap_or("-"),
            )?;
        } else {
            writeln!(&mut response, "⏳ Not yet paid")?;
        }

        writeln!(&mut response, "\n**Students:**")?;
        if family.students.is_empty() {
            response.push_str("_No students linked_\n");
        }
        for student in &family.students {
            let mark = if student.payment_status { "✅" } else { "⏳" };
            writeln!(&mut response, "{mark} {} ({})", student.name, student.class_name)?;
        }

        let history = listing::paginate(
            &history,
            page.map_or(1, |n| n as usize),
            PAYMENTS_PER_PAGE,
        );
        if history.total_items == 0 {
            writeln!(&mut response, "\n**Payments:**")?;
            response.push_str("_No payments recorded_\n");
        } else {
            write!(&mut response, "\n{}", page_header("**Payments**", &history))?;
        }
        for record in &history.items {
            writeln!(
                &mut response,
                "• {} - {} ({}){}",
                record.payment_date.format("%Y-%m-%d"),
                data.config.format_amount(record.amount),
                record.payment_method,
                record
                    .receipt_reference
                    .as_deref()
                    .map_or_else(String::new, |r| format!(" receipt {r}")),
            )?;
        }

        ctx.say(fit_message(response)).await?;
        Ok(())
    }

    /// Edits a parent's contact details. Only the given fields change.
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit_parent(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Parent name"]
        #[autocomplete = "autocomplete::autocomplete_parent_name"]
        parent_name: String,
        #[description = "New full name"] name: Option<String>,
        #[description = "New contact number"] contact_number: Option<String>,
        #[description = "New email address"] email: Option<String>,
        #[description = "New home address"] address: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(found) = parent::get_parent_by_name(db, &parent_name).await? else {
            ctx.say(format!("❌ Parent '{parent_name}' not found.")).await?;
            return Ok(());
        };

        let mut input = ParentInput::from(&found);
        if let Some(name) = name {
            input.name = name;
        }
        if let Some(contact_number) = contact_number {
            input.contact_number = contact_number;
        }
        if let Some(email) = email {
            input.email = email;
        }
        if address.is_some() {
            input.address = address;
        }

        let updated = parent::update_parent(db, found.id, input).await?;
        ctx.say(format!(
            "✏️ Updated parent **{}** ({} | {})",
            updated.name, updated.contact_number, updated.email
        ))
        .await?;
        Ok(())
    }

    /// Deletes a parent. Linked students become available again.
    ///
    /// Parents with recorded payments cannot be deleted.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_parent(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Parent name"]
        #[autocomplete = "autocomplete::autocomplete_parent_name"]
        parent_name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;

        let Some(found) = parent::get_parent_by_name(db, &parent_name).await? else {
            ctx.say(format!("❌ Parent '{parent_name}' not found.")).await?;
            return Ok(());
        };

        match parent::delete_parent(db, found.id).await {
            Ok(()) => {
                ctx.say(format!("🗑️ Deleted parent **{}**.", found.name))
                    .await?;
            }
            Err(Error::ParentHasPayments { count, .. }) => {
                ctx.say(format!(
                    "❌ **{}** has {count} recorded payment(s) and cannot be deleted.",
                    found.name
                ))
                .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
