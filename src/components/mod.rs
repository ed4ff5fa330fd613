// UI Components
// Shared building blocks and the modals used across pages

pub mod appointment_modal;
pub mod bar_list;
pub mod calendar_grid;
pub mod confirm_modal;
pub mod form_field;
pub mod icons;
pub mod loading;
pub mod modal;
pub mod pagination;
pub mod payment_modal;
pub mod sale_details;
pub mod sale_modal;
pub mod states;
pub mod toast;

pub use appointment_modal::AppointmentModal;
pub use bar_list::BarList;
pub use calendar_grid::CalendarGrid;
pub use confirm_modal::ConfirmModal;
pub use form_field::{FormAlert, TextField, INPUT_CLASS};
pub use loading::{ListSkeleton, Spinner};
pub use modal::Modal;
pub use pagination::Pagination;
pub use payment_modal::PaymentModal;
pub use sale_details::SaleDetails;
pub use sale_modal::SaleModal;
pub use states::{Badge, EmptyState, ErrorBanner, PageHeader, StatCard};
