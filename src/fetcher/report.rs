use std::path::PathBuf;

use crate::fetcher::selection::SelectedProduct;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    Downloaded { token: String, path: PathBuf, bytes: u64 },
    AlreadyPresent { token: String, path: PathBuf },
    Unavailable { token: String },
}

impl UnitOutcome {
    pub fn token(&self) -> &str {
        match self {
            UnitOutcome::Downloaded { token, .. }
            | UnitOutcome::AlreadyPresent { token, .. }
            | UnitOutcome::Unavailable { token } => token,
        }
    }
}

/// What a fetch run did, unit by unit
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchReport {
    pub outcomes: Vec<UnitOutcome>,
    /// Set when a day had no products in either NRT or Offline mode
    pub aborted_on: Option<String>,
    pub selection: Option<SelectedProduct>,
}

impl FetchReport {
    pub fn downloaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, UnitOutcome::Downloaded { .. }))
            .count()
    }

    pub fn already_present(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, UnitOutcome::AlreadyPresent { .. }))
            .count()
    }

    pub fn unavailable(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, UnitOutcome::Unavailable { .. }))
            .count()
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted_on.is_some()
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Downloaded: {}, already present: {}, unavailable: {}",
            self.downloaded(),
            self.already_present(),
            self.unavailable()
        );
        if let Some(ref day) = self.aborted_on {
            summary.push_str(&format!("\nRun aborted: no products found for {}", day));
        }
        summary
    }
}
