//! Joins silos, pets, and unknown tags into the renderable dashboard.

use std::{collections::HashSet, fmt::Write as _, str::FromStr};

use serde::{Deserialize, Serialize};
use shared::domain::{Pet, Rfid, Silo, SiloId, UnknownRfidEntry};
use tracing::warn;

use crate::page::Page;

/// Full-stock weight of a silo, in the backend's weight unit.
pub const SILO_CAPACITY: f64 = 20.0;

/// Which silo field carries the fill level for this deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    #[default]
    Percentage,
    StockWeight,
}

impl FromStr for FillMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "percentage" | "percent" => Ok(Self::Percentage),
            "stock_weight" | "weight" => Ok(Self::StockWeight),
            other => Err(format!("unknown fill mode '{other}'")),
        }
    }
}

/// Fill level in percent. Not clamped: an overfull silo reads above 100.
pub fn fill_percent(silo: &Silo, mode: FillMode) -> f64 {
    let measure = match mode {
        FillMode::Percentage => silo.percentage,
        FillMode::StockWeight => silo
            .stock_weight
            .map(|weight| weight / SILO_CAPACITY * 100.0),
    };
    measure.unwrap_or_else(|| {
        warn!(silo = %silo.id, ?mode, "silo has no fill measure; showing 0%");
        0.0
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct SiloViewModel {
    pub silo: Silo,
    pub assigned_pet: Option<Pet>,
    pub fill_percent: f64,
}

/// Several pets reference one silo. `pets[0]` is the one shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiloConflict {
    pub silo: SiloId,
    pub pets: Vec<Rfid>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardView {
    pub silos: Vec<SiloViewModel>,
    pub unknown_tags: Vec<UnknownRfidEntry>,
    pub conflicts: Vec<SiloConflict>,
    pub unplaced_pets: Vec<Pet>,
}

pub fn build_view(
    silos: Vec<Silo>,
    pets: Vec<Pet>,
    unknown_tags: Vec<UnknownRfidEntry>,
    mode: FillMode,
) -> DashboardView {
    let mut conflicts = Vec::new();
    let mut view_models = Vec::with_capacity(silos.len());

    for silo in silos {
        let mut matching = pets.iter().filter(|pet| pet.silo == Some(silo.id));
        let assigned_pet = matching.next().cloned();
        let others: Vec<Rfid> = matching.map(|pet| pet.rfid.clone()).collect();

        if let Some(first) = &assigned_pet {
            if !others.is_empty() {
                warn!(
                    silo = %silo.id,
                    shown = %first.rfid,
                    ignored = others.len(),
                    "multiple pets assigned to one silo"
                );
                let mut rfids = vec![first.rfid.clone()];
                rfids.extend(others);
                conflicts.push(SiloConflict {
                    silo: silo.id,
                    pets: rfids,
                });
            }
        }

        let fill_percent = fill_percent(&silo, mode);
        view_models.push(SiloViewModel {
            silo,
            assigned_pet,
            fill_percent,
        });
    }

    let known: HashSet<SiloId> = view_models.iter().map(|vm| vm.silo.id).collect();
    let unplaced_pets = pets
        .into_iter()
        .filter(|pet| pet.silo.map_or(true, |id| !known.contains(&id)))
        .collect();

    DashboardView {
        silos: view_models,
        unknown_tags,
        conflicts,
        unplaced_pets,
    }
}

impl DashboardView {
    pub fn silo(&self, id: SiloId) -> Option<&SiloViewModel> {
        self.silos.iter().find(|vm| vm.silo.id == id)
    }

    pub fn has_unknown_tag(&self, rfid: &Rfid) -> bool {
        self.unknown_tags.iter().any(|entry| &entry.rfid == rfid)
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();

        for vm in &self.silos {
            let _ = writeln!(out, "Silo {}", vm.silo.id);
            let _ = writeln!(out, "  Fill: {:.0}%", vm.fill_percent);
            match &vm.assigned_pet {
                Some(pet) => {
                    let _ = writeln!(out, "  Assigned to: {}", pet.name);
                    let edit = Page::EditSchedule {
                        rfid: pet.rfid.clone(),
                    };
                    let _ = writeln!(out, "  [Edit Schedule] {}", edit.href());
                }
                None => {
                    let _ = writeln!(out, "  Assigned to: None");
                }
            }
        }

        for conflict in &self.conflicts {
            let pets: Vec<&str> = conflict.pets.iter().map(Rfid::as_str).collect();
            let _ = writeln!(
                out,
                "! Silo {} is referenced by several pets: {}",
                conflict.silo,
                pets.join(", ")
            );
        }

        if !self.unplaced_pets.is_empty() {
            let _ = writeln!(out, "Unassigned pets");
            for pet in &self.unplaced_pets {
                match pet.silo {
                    Some(silo) => {
                        let _ = writeln!(
                            out,
                            "  {} (RFID {}) references unknown silo {}",
                            pet.name, pet.rfid, silo
                        );
                    }
                    None => {
                        let _ = writeln!(out, "  {} (RFID {})", pet.name, pet.rfid);
                    }
                }
            }
        }

        let _ = writeln!(out, "Unknown RFIDs");
        if self.unknown_tags.is_empty() {
            let _ = writeln!(out, "  none");
        }
        for entry in &self.unknown_tags {
            let register = Page::RegisterPet {
                rfid: entry.rfid.clone(),
            };
            let _ = writeln!(
                out,
                "  RFID: {}  [Dismiss]  [Register] {}",
                entry.rfid,
                register.href()
            );
        }

        out
    }
}

#[cfg(test)]
#[path = "tests/view_tests.rs"]
mod tests;
