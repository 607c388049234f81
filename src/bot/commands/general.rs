//! General Discord commands - ping and help.
//! These commands don't touch the database.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = format!(
            "**{} PTA Tracker Help**\n\n\
            **Parents**\n\
            • `/add_parent <name> <contact> <email> [address]` - Registers a parent.\n\
            • `/parents [search] [paid|unpaid] [page]` - Lists parents with their payment status.\n\
            • `/parent_info <parent> [page]` - Shows linked students and payment history.\n\
            • `/edit_parent <parent> ...` - Changes contact details.\n\
            • `/delete_parent <parent>` - Deletes a parent with no payments.\n\n\
            **Students**\n\
            • `/add_student ...` - Enrolls a student, optionally under a parent and teacher.\n\
            • `/students [search] [status] [class] [sort] [page]` - Searches the student list.\n\
            • `/available_students [page]` - Lists students with no parent.\n\
            • `/edit_student <student> ...` - Changes a student's profile.\n\
            • `/link_student <student> <parent>` / `/unlink_student <student>`\n\
            • `/delete_student <student>`\n\n\
            **Teachers**\n\
            • `/add_teacher ...`, `/edit_teacher <teacher> ...`, `/teachers [search] [status] [page]`\n\
            • `/assign_teacher <student> <teacher>`, `/unassign_teacher <student>`, `/delete_teacher <teacher>`\n\n\
            **Payments**\n\
            • `/record_payment <parent> <amount> <method> [date] [receipt] [notes]`\n\
            • `/payments [parent] [page]`, `/delete_payment <payment_id>`\n\n\
            **Dashboard**\n\
            • `/stats` - Collection totals and per-class progress.\n\
            • `/ping` - Checks if the bot is responsive.\n\n\
            Dates use the `YYYY-MM-DD` format.",
            ctx.data().config.school_name
        );

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
