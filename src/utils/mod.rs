// Utility functions
// Helper functions for common operations

pub mod calendar;
pub mod data_state;
pub mod export;
pub mod format;
pub mod jwt;
pub mod pagination;
pub mod print;
pub mod time;
pub mod validation;

pub use data_state::{DataState, ListView};
pub use format::format_brl;
pub use validation::FormErrors;
