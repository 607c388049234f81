//! Payment Discord commands - recording, listing, and removing payments.

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
            listing, parent,
            payment::{self, PaymentInput},
            validation,
        },
        errors::{Error, Result},
    };
    use sea_orm::prelude::Uuid;
    use std::fmt::Write;

    const PAYMENTS_PER_PAGE: usize = 10;

    /// Records a parent's PTA payment and marks their linked students as paid.
    #[poise::command(slash_command, prefix_command)]
    pub async fn record_payment(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Parent who paid"]
        #[autocomplete = "autocomplete::autocomplete_parent_name"]
        parent_name: String,
        #[description = "Amount paid"] amount: f64,
        #[description = "Payment method"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        method: String,
        #[description = "Payment date (YYYY-MM-DD, default today)"] date: Option<String>,
        #[description = "Receipt or reference number"] receipt: Option<String>,
        #[description = "Notes"] notes: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let payment_date = match date {
            Some(value) => validation::date("payment_date", &value)?,
            None => chrono::Local::now().date_naive(),
        };

        let Some(p) = parent::get_parent_by_name(db, &parent_name).await? else {
            ctx.say(format!(
                "❌ Parent '{parent_name}' not found. Use `/parents` to see registered parents."
            ))
            .await?;
            return Ok(());
        };

        let receipt = payment::record_payment(
            db,
            PaymentInput {
                parent_id: p.id,
                amount,
                payment_method: method,
                payment_date,
                receipt_reference: receipt,
                notes,
            },
        )
        .await?;

        let mut response = format!(
            "💰 Recorded {} from **{}** ({}) on {}\n",
            data.config.format_amount(receipt.payment.amount),
            receipt.parent.name,
            receipt.payment.payment_method,
            receipt.payment.payment_date.format("%Y-%m-%d"),
        );
        if receipt.students_marked_paid.is_empty() {
            response.push_str("_No students are linked to this parent yet._");
        } else {
            let names: Vec<&str> = receipt
                .students_marked_paid
                .iter()
                .map(|s| s.name.as_str())
                .collect();
            write!(&mut response, "✅ Marked paid: {}", names.join(", "))?;
        }

        ctx.say(response).await?;
        Ok(())
    }

    /// Shows recent payments, or every payment from one parent.
    #[poise::command(slash_command, prefix_command)]
    pub async fn payments(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Only this parent's payments"]
        #[autocomplete = "autocomplete::autocomplete_parent_name"]
        parent_name: Option<String>,
        #[description = "Page number"] page: Option<u32>,
    ) -> Result<()> {
        let data = ctx.data();
        let db = &data.database;

        let (title, rows) = if let Some(name) = parent_name {
            let Some(p) = parent::get_parent_by_name(db, &name).await? else {
                ctx.say(format!("❌ Parent '{name}' not found.")).await?;
                return Ok(());
            };
            let rows = payment::get_payments_for_parent(db, p.id)
                .await?
                .into_iter()
                .map(|record| payment::PaymentWithParent {
                    payment: record,
                    parent_name: Some(p.name.clone()),
                })
                .collect::<Vec<_>>();
            (format!("Payments from {}", p.name), rows)
        } else {
            let rows = payment::recent_payments(db, data.config.recent_payments_limit).await?;
            ("Recent Payments".to_string(), rows)
        };

        if rows.is_empty() {
            ctx.say("🧾 No payments recorded yet.").await?;
            return Ok(());
        }

        let page = listing::paginate(&rows, page.map_or(1, |p| p as usize), PAYMENTS_PER_PAGE);
        let mut response = page_header(&format!("🧾 **{title}**"), &page);
        for row in &page.items {
            let record = &row.payment;
            writeln!(
                &mut response,
                "• {} **{}** {} via {}{} `{}`",
                record.payment_date.format("%Y-%m-%d"),
                row.parent_name.as_deref().unwrap_or("(deleted parent)"),
                data.config.format_amount(record.amount),
                record.payment_method,
                record
                    .receipt_reference
                    .as_deref()
                    .map_or_else(String::new, |r| format!(" #{r}")),
                record.id,
            )?;
        }

        ctx.say(fit_message(response)).await?;
        Ok(())
    }

    /// Deletes a payment record by ID and recomputes the parent's payment summary.
    ///
    /// Students already marked paid stay paid.
    #[poise::command(slash_command, prefix_command)]
    pub async fn delete_payment(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Payment ID (shown by /payments)"] payment_id: String,
    ) -> Result<()> {
        let Ok(id) = Uuid::parse_str(payment_id.trim()) else {
            ctx.say(format!("❌ '{payment_id}' is not a payment ID."))
                .await?;
            return Ok(());
        };

        let parent = payment::delete_payment(&ctx.data().database, id).await?;
        let status = if parent.payment_status {
            "still paid"
        } else {
            "now unpaid"
        };
        ctx.say(format!("🗑️ Deleted payment. **{}** is {status}.", parent.name))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
