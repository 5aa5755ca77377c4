pub mod cache;
pub mod dates;
pub mod normalizer;

pub use cache::{LoadedSheet, SheetCache};
pub use normalizer::{
    is_complete, normalize, DropReason, DroppedColumn, NormalizationReport, ADDED,
    COMPLETE_STATUS, EXCLUDED_COLUMNS, REQUIRED_COLUMNS, SPURIOUS_DUPLICATE,
};
