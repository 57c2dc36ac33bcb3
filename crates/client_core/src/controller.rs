//! Dashboard lifecycle and the form-driven workflows.
//!
//! Every workflow ends either in a refetch of the whole dashboard or in a
//! navigation; displayed state is never patched locally.

use std::sync::Arc;

use shared::domain::{Pet, Rfid};
use tracing::{debug, error, info, warn};

use crate::{
    error::GatewayError,
    forms::{RegistrationForm, ScheduleForm},
    gateway::{DismissOutcome, FeederGateway},
    page::{Notice, Page, PageError, PageHost},
    view::{build_view, DashboardView, FillMode},
};

pub const SCHEDULE_UPDATED: &str = "Schedule updated!";
pub const PET_REGISTERED: &str = "Pet registered!";

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardState {
    Loading,
    Rendered(DashboardView),
    Failed(String),
}

impl DashboardState {
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            Self::Rendered(view) => Some(view),
            Self::Loading | Self::Failed(_) => None,
        }
    }
}

pub struct DashboardController {
    gateway: Arc<dyn FeederGateway>,
    host: Arc<dyn PageHost>,
    fill_mode: FillMode,
    state: DashboardState,
}

impl DashboardController {
    pub fn new(
        gateway: Arc<dyn FeederGateway>,
        host: Arc<dyn PageHost>,
        fill_mode: FillMode,
    ) -> Self {
        Self {
            gateway,
            host,
            fill_mode,
            state: DashboardState::Loading,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Fetches silos, pets and unknown tags concurrently and renders only if
    /// all three succeed. Every fetch runs to completion, even after a
    /// sibling has failed.
    pub async fn load(&mut self) -> &DashboardState {
        self.state = DashboardState::Loading;

        let gateway = &self.gateway;
        let (silos, pets, unknown_tags) = futures::join!(
            gateway.list_silos(),
            gateway.list_pets(),
            gateway.list_unknown_tags(),
        );

        self.state = match (silos, pets, unknown_tags) {
            (Ok(silos), Ok(pets), Ok(unknown_tags)) => {
                debug!(
                    silos = silos.len(),
                    pets = pets.len(),
                    unknown = unknown_tags.len(),
                    "dashboard data fetched"
                );
                DashboardState::Rendered(build_view(silos, pets, unknown_tags, self.fill_mode))
            }
            (silos, pets, unknown_tags) => {
                let failures: Vec<String> = [silos.err(), pets.err(), unknown_tags.err()]
                    .into_iter()
                    .flatten()
                    .map(|err| err.to_string())
                    .collect();
                for failure in &failures {
                    error!("dashboard load failed: {failure}");
                }
                DashboardState::Failed(format!("Could not load dashboard: {}", failures.join("; ")))
            }
        };
        &self.state
    }

    pub async fn refresh(&mut self) -> &DashboardState {
        self.load().await
    }

    /// Dismisses an unknown tag. The dashboard is refetched only when the
    /// backend confirms; otherwise a notice is shown and the view is kept.
    pub async fn dismiss(&mut self, rfid: &Rfid) -> DismissOutcome {
        let outcome = self.gateway.dismiss_tag(rfid).await;
        match &outcome {
            DismissOutcome::Dismissed => {
                self.refresh().await;
            }
            DismissOutcome::Rejected { status } => {
                self.host.notify(Notice::Error(format!(
                    "Failed to dismiss RFID {rfid} (status {status})."
                )));
            }
            DismissOutcome::Unreachable { reason } => {
                self.host.notify(Notice::Error(format!(
                    "Error occurred while dismissing RFID {rfid}: {reason}"
                )));
            }
        }
        outcome
    }

    pub fn edit_schedule(&self, pet: &Rfid) {
        self.host.navigate(Page::EditSchedule { rfid: pet.clone() });
    }

    pub fn register(&self, tag: &Rfid) {
        self.host.navigate(Page::RegisterPet { rfid: tag.clone() });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
    Completed,
    StayOnForm,
}

// A workflow page opened without a usable rfid sends the user back home.
fn enter_page(host: &dyn PageHost, location: &str) -> Result<Page, PageError> {
    Page::parse(location).inspect_err(|err| {
        warn!(location, "cannot open workflow page: {err}");
        host.notify(Notice::Error(err.to_string()));
        host.navigate(Page::Dashboard);
    })
}

fn reject_page(host: &dyn PageHost, page: &Page, expected: &'static str) -> PageError {
    let err = PageError::UnknownPage(page.href());
    warn!(page = %page.href(), expected, "workflow opened on the wrong page");
    host.notify(Notice::Error(err.to_string()));
    host.navigate(Page::Dashboard);
    err
}

pub struct ScheduleEditor {
    gateway: Arc<dyn FeederGateway>,
    host: Arc<dyn PageHost>,
    pet: Option<Pet>,
    form: ScheduleForm,
}

impl ScheduleEditor {
    /// Opens the editor for `/edit-schedule.html?rfid=...`.
    pub async fn open(
        gateway: Arc<dyn FeederGateway>,
        host: Arc<dyn PageHost>,
        location: &str,
    ) -> Result<Self, PageError> {
        let rfid = match enter_page(host.as_ref(), location)? {
            Page::EditSchedule { rfid } => rfid,
            other => return Err(reject_page(host.as_ref(), &other, "edit-schedule")),
        };
        Ok(Self::open_for(gateway, host, rfid).await)
    }

    pub async fn open_for(
        gateway: Arc<dyn FeederGateway>,
        host: Arc<dyn PageHost>,
        rfid: Rfid,
    ) -> Self {
        let pet = match gateway.get_pet(&rfid).await {
            Ok(pet) => Some(pet),
            Err(GatewayError::NotFound { .. }) => {
                host.notify(Notice::Error(format!("No pet is registered for RFID {rfid}.")));
                None
            }
            Err(err) => {
                warn!(%rfid, "pet lookup failed: {err}");
                host.notify(Notice::Error(format!("Could not load pet {rfid}: {err}")));
                None
            }
        };

        let mut form = match &pet {
            Some(pet) => {
                ScheduleForm::prefilled(rfid.clone(), pet.time_window.as_deref(), pet.amount)
            }
            None => ScheduleForm::blank(rfid.clone()),
        };

        // Pets without schedule fields: fall back to the stored schedule.
        if pet.is_some() && form.is_blank() {
            match gateway.list_schedules().await {
                Ok(schedules) => {
                    if let Some(schedule) = schedules.into_iter().find(|s| s.rfid == rfid) {
                        form = ScheduleForm::prefilled(
                            rfid.clone(),
                            Some(schedule.time_window.as_str()),
                            Some(schedule.amount),
                        );
                    }
                }
                Err(err) => debug!(%rfid, "schedule prefill unavailable: {err}"),
            }
        }

        Self {
            gateway,
            host,
            pet,
            form,
        }
    }

    pub fn pet(&self) -> Option<&Pet> {
        self.pet.as_ref()
    }

    pub fn form(&self) -> &ScheduleForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ScheduleForm {
        &mut self.form
    }

    /// Submits the form. Navigates to the dashboard only after the backend
    /// accepted the schedule.
    pub async fn submit(&mut self) -> WorkflowOutcome {
        let schedule = match self.form.to_schedule() {
            Ok(schedule) => schedule,
            Err(err) => {
                self.host.notify(Notice::Error(err.to_string()));
                return WorkflowOutcome::StayOnForm;
            }
        };

        match self.gateway.submit_schedule(&schedule).await {
            Ok(_) => {
                info!(rfid = %schedule.rfid, window = %schedule.time_window, "schedule updated");
                self.host.notify(Notice::Info(SCHEDULE_UPDATED.to_string()));
                self.host.navigate(Page::Dashboard);
                WorkflowOutcome::Completed
            }
            Err(err) => {
                warn!(rfid = %schedule.rfid, "schedule update failed: {err}");
                self.host
                    .notify(Notice::Error(format!("Schedule update failed: {err}")));
                WorkflowOutcome::StayOnForm
            }
        }
    }
}

pub struct PetRegistration {
    gateway: Arc<dyn FeederGateway>,
    host: Arc<dyn PageHost>,
    form: RegistrationForm,
}

impl PetRegistration {
    /// Opens the registration form for `/register-pet.html?rfid=...`.
    pub fn open(
        gateway: Arc<dyn FeederGateway>,
        host: Arc<dyn PageHost>,
        location: &str,
    ) -> Result<Self, PageError> {
        match enter_page(host.as_ref(), location)? {
            Page::RegisterPet { rfid } => Ok(Self::for_tag(gateway, host, rfid)),
            other => Err(reject_page(host.as_ref(), &other, "register-pet")),
        }
    }

    pub fn for_tag(gateway: Arc<dyn FeederGateway>, host: Arc<dyn PageHost>, rfid: Rfid) -> Self {
        Self {
            gateway,
            host,
            form: RegistrationForm::for_tag(rfid),
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    pub async fn submit(&mut self) -> WorkflowOutcome {
        let pet = match self.form.to_pet() {
            Ok(pet) => pet,
            Err(err) => {
                self.host.notify(Notice::Error(err.to_string()));
                return WorkflowOutcome::StayOnForm;
            }
        };

        match self.gateway.register_pet(&pet).await {
            Ok(_) => {
                info!(rfid = %pet.rfid, name = %pet.name, "pet registered from unknown tag");
                self.host.notify(Notice::Info(PET_REGISTERED.to_string()));
                self.host.navigate(Page::Dashboard);
                WorkflowOutcome::Completed
            }
            Err(err) => {
                warn!(rfid = %pet.rfid, "pet registration failed: {err}");
                self.host
                    .notify(Notice::Error(format!("Pet registration failed: {err}")));
                WorkflowOutcome::StayOnForm
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
