pub mod app_context;

pub use app_context::{use_app_context, AppContext};
