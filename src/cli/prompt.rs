use dialoguer::{theme::ColorfulTheme, Input};

use crate::error::{FetchError, Result};
use crate::fetcher::ProductSelector;
use crate::models::DayWindow;
use crate::remote::HubProduct;

/// Asks on the terminal which listed product to take; Enter keeps the first.
pub struct InteractiveSelector;

impl ProductSelector for InteractiveSelector {
    fn select(&self, day: &DayWindow, products: &[HubProduct]) -> Result<Option<usize>> {
        if products.len() == 1 {
            return Ok(None);
        }

        let index: usize = Input::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "{}: select number or press Enter if you want to select the first result",
                day.token()
            ))
            .default(0)
            .show_default(false)
            .validate_with(|input: &usize| -> std::result::Result<(), String> {
                if *input < products.len() {
                    Ok(())
                } else {
                    Err(format!("Choose a number between 0 and {}", products.len() - 1))
                }
            })
            .interact_text()
            .map_err(|e| FetchError::Prompt(e.to_string()))?;

        Ok(Some(index))
    }
}
