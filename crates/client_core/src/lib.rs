//! Client-side core of the feeder dashboard: backend access, the silo view
//! model, and the workflows that drive the dashboard pages.

pub mod controller;
pub mod error;
pub mod forms;
pub mod gateway;
pub mod page;
pub mod view;

pub use controller::{
    DashboardController, DashboardState, PetRegistration, ScheduleEditor, WorkflowOutcome,
};
pub use error::{GatewayError, GatewayResult};
pub use forms::{FormError, RegistrationForm, ScheduleForm};
pub use gateway::{DismissOutcome, FeederGateway, HttpGateway};
pub use page::{Notice, Page, PageError, PageHost};
pub use view::{
    build_view, fill_percent, DashboardView, FillMode, SiloConflict, SiloViewModel, SILO_CAPACITY,
};
