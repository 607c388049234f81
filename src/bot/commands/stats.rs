//! Statistics dashboard command.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        core::{payment, stats},
        errors::{Error, Result},
    };
    use std::fmt::Write;

    /// Shows collection progress: totals, per-class summary, and recent payments.
    #[poise::command(slash_command, prefix_command)]
    pub async fn stats(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        use poise::serenity_prelude as serenity;

        let data = ctx.data();
        let db = &data.database;
        let config = &data.config;

        ctx.defer().await?;

        let statistics = stats::load_statistics(db, config.target_amount).await?;
        let recent = payment::recent_payments(db, config.recent_payments_limit).await?;

        let mut overview = String::new();
        writeln!(
            &mut overview,
            "**Students paid:** {} / {}",
            statistics.paid_students, statistics.total_students
        )?;
        writeln!(
            &mut overview,
            "{}",
            stats::format_progress_bar(statistics.percentage_paid, 10)
        )?;
        writeln!(
            &mut overview,
            "**Parents paid:** {} / {}",
            statistics.paid_parents, statistics.total_parents
        )?;
        write!(
            &mut overview,
            "**Collected:** {}",
            config.format_amount(statistics.total_collected)
        )?;
        if config.target_amount > 0.0 {
            write!(
                &mut overview,
                " of {} ({}%)",
                config.format_amount(config.target_amount),
                statistics.percentage_of_target
            )?;
        }

        let mut classes = String::new();
        for class in &statistics.class_summary {
            writeln!(
                &mut classes,
                "**{}** {} / {} {}",
                class.class_name,
                class.paid,
                class.total,
                stats::format_progress_bar(class.percentage_paid, 8)
            )?;
        }
        if classes.is_empty() {
            classes.push_str("_No classes yet_");
        }

        let mut standings = String::new();
        if let Some(best) = &statistics.highest_class {
            writeln!(
                &mut standings,
                "🏆 Highest: {} ({}%)",
                best.class_name, best.percentage_paid
            )?;
        }
        if let Some(worst) = &statistics.lowest_class {
            writeln!(
                &mut standings,
                "📉 Lowest: {} ({}%)",
                worst.class_name, worst.percentage_paid
            )?;
        }
        if standings.is_empty() {
            standings.push('-');
        }

        let mut latest = String::new();
        for row in &recent {
            writeln!(
                &mut latest,
                "• {} {} {}",
                row.payment.payment_date.format("%Y-%m-%d"),
                row.parent_name.as_deref().unwrap_or("(deleted parent)"),
                config.format_amount(row.payment.amount),
            )?;
        }
        if latest.is_empty() {
            latest.push_str("_No payments yet_");
        }

        let embed = serenity::CreateEmbed::default()
            .title(format!("📊 {} PTA Collection", config.school_name))
            .description(overview)
            .color(0x0034_98DB)
            .fields(vec![
                ("Classes", classes, false),
                ("Standings", standings, false),
                ("Recent Payments", latest, false),
            ])
            .footer(serenity::CreateEmbedFooter::new(format!(
                "As of {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M")
            )));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
