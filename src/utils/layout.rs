use std::path::{Path, PathBuf};

use crate::models::{DayWindow, Mission, Parameter, ProcessingLevel, YearMonth};
use crate::utils::constants::{L2_PRODUCT_EXTENSION, L3_FILE_SUFFIX};

/// `{root}/{mission}/{level}/{parameter}/{period_token}`
pub fn period_dir(
    root: &Path,
    mission: Mission,
    level: ProcessingLevel,
    parameter: Parameter,
    period_token: &str,
) -> PathBuf {
    root.join(mission.as_str())
        .join(level.as_str())
        .join(parameter.as_str())
        .join(period_token)
}

/// Query-mode L2 directory for one day
pub fn swath_dir(root: &Path, mission: Mission, parameter: Parameter, day: &DayWindow) -> PathBuf {
    period_dir(root, mission, ProcessingLevel::L2, parameter, &day.token())
}

/// Manual-mode L2 directory: `{root}/{YYYY-MM-DD}` with no mission, level or parameter segment
pub fn manual_swath_dir(root: &Path, day: &DayWindow) -> PathBuf {
    root.join(day.token())
}

pub fn monthly_dir(root: &Path, mission: Mission, parameter: Parameter, month: &YearMonth) -> PathBuf {
    period_dir(root, mission, ProcessingLevel::L3, parameter, &month.token())
}

/// `{title}.nc`
pub fn swath_file_name(title: &str) -> String {
    format!("{}.{}", title, L2_PRODUCT_EXTENSION)
}

/// `{param_lower}_{YYYYMM}.asc.gz`
pub fn monthly_file_name(parameter: Parameter, month: &YearMonth) -> String {
    format!("{}_{}{}", parameter.to_lowercase(), month.compact(), L3_FILE_SUFFIX)
}

/// `{base}/{param_lower}/{YYYY}/{MM}/{param_lower}_{YYYYMM}.asc.gz`
pub fn monthly_url(base_url: &str, parameter: Parameter, month: &YearMonth) -> String {
    format!(
        "{}/{}/{:04}/{:02}/{}",
        base_url.trim_end_matches('/'),
        parameter.to_lowercase(),
        month.year,
        month.month,
        monthly_file_name(parameter, month)
    )
}

/// Recover the month from a `{param}_{YYYYMM}.asc.gz` file name
pub fn month_from_file_name(path: &Path) -> Option<YearMonth> {
    let name = path.file_name()?.to_str()?;
    let stem = name.strip_suffix(L3_FILE_SUFFIX).or_else(|| name.strip_suffix(".asc"))?;
    let (_, compact) = stem.rsplit_once('_')?;
    if compact.len() != 6 || !compact.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    compact.parse().ok()
}
