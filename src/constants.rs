/// Field names and fixed values shared across the pipeline stages

// Required fields, in the order the validator checks them
pub const ORDER_ID: &str = "order_id";
pub const TIMESTAMP: &str = "timestamp";
pub const ITEM: &str = "item";
pub const QUANTITY: &str = "quantity";
pub const PRICE: &str = "price";
pub const PAYMENT_STATUS: &str = "payment_status";
pub const TOTAL: &str = "total";

pub const REQUIRED_FIELDS: [&str; 7] = [
    ORDER_ID,
    TIMESTAMP,
    ITEM,
    QUANTITY,
    PRICE,
    PAYMENT_STATUS,
    TOTAL,
];

/// Fields that must hold a positive number to pass validation
pub const POSITIVE_NUMERIC_FIELDS: [&str; 3] = [QUANTITY, PRICE, TOTAL];

/// Literal spellings of zero that are not treated as parse failures
pub const ZERO_LITERALS: [&str; 2] = ["0", "0.0"];

/// Currency markers stripped from the front of amounts ("$15.99", "N2000")
pub const CURRENCY_PREFIX_CHARS: [char; 3] = ['$', 'N', 'n'];

// Files
pub const JSON_EXTENSION: &str = ".json";
pub const DEFAULT_INPUT_PATH: &str = "shoplink.json";
pub const DEFAULT_OUTPUT_PATH: &str = "shoplink_cleaned.json";
pub const DEFAULT_CONFIG_PATH: &str = "pipeline.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "order_pipeline.log";
pub const DEFAULT_LOG_FILTER: &str = "order_pipeline=info";

/// Placeholder used in diagnostics when a record has no usable order_id
pub const UNKNOWN_ORDER_ID: &str = "N/A";

/// Whether a path carries the extension every input and output file must use.
/// Case-sensitive, like the files the exporters produce.
pub fn has_json_extension(path: &str) -> bool {
    path.ends_with(JSON_EXTENSION)
}
