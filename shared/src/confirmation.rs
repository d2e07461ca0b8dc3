use crate::types::Result;
use dialoguer::{theme::ColorfulTheme, Confirm};

/// Yes/no prompt styled like the quiz menus. Esc or `q` counts as "no".
pub fn ask_confirmation(prompt: &str, default_yes: bool) -> Result<bool> {
    let choice = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default_yes)
        .wait_for_newline(true)
        .interact_opt()?;
    Ok(choice.unwrap_or(false))
}
