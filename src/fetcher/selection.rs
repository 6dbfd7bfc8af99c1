use crate::error::Result;
use crate::models::DayWindow;
use crate::remote::HubProduct;

/// Chooses one of the listed hub products for a day.
/// `Ok(None)` means "take the default", which is the first product.
pub trait ProductSelector: Send + Sync {
    fn select(&self, day: &DayWindow, products: &[HubProduct]) -> Result<Option<usize>>;
}

/// Always accepts the default
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstProduct;

impl ProductSelector for FirstProduct {
    fn select(&self, _day: &DayWindow, _products: &[HubProduct]) -> Result<Option<usize>> {
        Ok(None)
    }
}

/// Same index for every day, as given on the command line
#[derive(Debug, Clone, Copy)]
pub struct FixedSelection(pub usize);

impl ProductSelector for FixedSelection {
    fn select(&self, _day: &DayWindow, _products: &[HubProduct]) -> Result<Option<usize>> {
        Ok(Some(self.0))
    }
}

/// Selection that made it through the query loop, with the day it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedProduct {
    pub day: DayWindow,
    pub file_id: String,
    pub product_name: String,
}
