pub mod grid;
pub mod period;
pub mod product;
pub mod request;

pub use grid::{GridCube, GridCubeBuilder, GridSummary};
pub use period::{plan_days, plan_months, plan_periods, DayWindow, PeriodUnit, YearMonth};
pub use product::ProductType;
pub use request::{
    validate_combination, BoundingBox, DownloadRequest, InputType, ManualSelection, Mission,
    Parameter, ProcessingLevel,
};
