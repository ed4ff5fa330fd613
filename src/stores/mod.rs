// Global state management
// Stores provide shared state across the application

pub mod auth_store;
pub mod cart;
pub mod category_store;
pub mod settings_store;
