/// Remote endpoints
pub const DEFAULT_HUB_URL: &str = "https://s5phub.copernicus.eu/dhus";
pub const DEFAULT_L3_BASE_URL: &str = "https://www.temis.nl/airpollution/no2col/data/tropomi";
pub const GUEST_USERNAME: &str = "s5pguest";
pub const GUEST_PASSWORD: &str = "s5pguest";

/// Hub query defaults
pub const DEFAULT_QUERY_LIMIT: usize = 10;
pub const HUB_PROCESSING_LEVEL: &str = "L2";
pub const HUB_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
pub const DAY_WINDOW_HOURS: i64 = 23;

/// Local layout
pub const DEFAULT_OUTPUT_ROOT: &str = "data";
pub const L2_PRODUCT_EXTENSION: &str = "nc";
pub const L3_FILE_SUFFIX: &str = ".asc.gz";

/// TEMIS L3 grid format
pub const GRID_HEADER_LINES: usize = 4;
pub const GRID_FIELD_WIDTH: usize = 4;
pub const GRID_LAT_MARKER: &str = "lat=";
pub const GRID_LON_START: f64 = -179.9375;
pub const GRID_LON_STEP: f64 = 0.125;
pub const GRID_MISSING_VALUE: &str = "-999";
pub const GRID_VALUE_SCALE: f64 = 1e13;

/// I/O
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
