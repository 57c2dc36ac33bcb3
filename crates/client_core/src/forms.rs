//! Form state for the schedule and registration pages, and the parsing that
//! turns raw field text into submittable records.

use shared::domain::{Pet, Rfid, Schedule, SiloId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Name must not be empty.")]
    EmptyName,
    #[error("Amount '{0}' is not a non-negative number.")]
    InvalidAmount(String),
    #[error("Time window '{0}' must look like HH:MM-HH:MM.")]
    InvalidTimeWindow(String),
    #[error("Silo '{0}' is not a valid silo id.")]
    InvalidSilo(String),
}

pub fn parse_amount(raw: &str) -> Result<f64, FormError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => Ok(amount),
        _ => Err(FormError::InvalidAmount(trimmed.to_string())),
    }
}

/// Accepts `HH:MM-HH:MM` with a 24-hour clock and returns it trimmed.
pub fn parse_time_window(raw: &str) -> Result<String, FormError> {
    let trimmed = raw.trim();
    let invalid = || FormError::InvalidTimeWindow(trimmed.to_string());

    let (start, end) = trimmed.split_once('-').ok_or_else(invalid)?;
    if !is_clock_time(start) || !is_clock_time(end) {
        return Err(invalid());
    }
    Ok(trimmed.to_string())
}

fn is_clock_time(value: &str) -> bool {
    let Some((hours, minutes)) = value.split_once(':') else {
        return false;
    };
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return false;
    }
    matches!((hours.parse::<u8>(), minutes.parse::<u8>()), (Ok(h), Ok(m)) if h < 24 && m < 60)
}

/// Empty means unassigned.
pub fn parse_silo(raw: &str) -> Result<Option<SiloId>, FormError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(|id| Some(SiloId(id)))
        .map_err(|_| FormError::InvalidSilo(trimmed.to_string()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleForm {
    pub rfid: Rfid,
    pub time_window: String,
    pub amount: String,
}

impl ScheduleForm {
    pub fn blank(rfid: Rfid) -> Self {
        Self {
            rfid,
            time_window: String::new(),
            amount: String::new(),
        }
    }

    pub fn prefilled(rfid: Rfid, time_window: Option<&str>, amount: Option<f64>) -> Self {
        Self {
            rfid,
            time_window: time_window.unwrap_or_default().to_string(),
            amount: amount.map(|a| a.to_string()).unwrap_or_default(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.time_window.is_empty() && self.amount.is_empty()
    }

    pub fn to_schedule(&self) -> Result<Schedule, FormError> {
        Ok(Schedule {
            rfid: self.rfid.clone(),
            time_window: parse_time_window(&self.time_window)?,
            amount: parse_amount(&self.amount)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    pub rfid: Rfid,
    pub name: String,
    pub silo: String,
    pub time_window: String,
    pub amount: String,
}

impl RegistrationForm {
    pub fn for_tag(rfid: Rfid) -> Self {
        Self {
            rfid,
            name: String::new(),
            silo: String::new(),
            time_window: String::new(),
            amount: String::new(),
        }
    }

    pub fn to_pet(&self) -> Result<Pet, FormError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(FormError::EmptyName);
        }
        Ok(Pet {
            rfid: self.rfid.clone(),
            name: name.to_string(),
            silo: parse_silo(&self.silo)?,
            time_window: Some(parse_time_window(&self.time_window)?),
            amount: Some(parse_amount(&self.amount)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_must_be_finite_and_non_negative() {
        assert_eq!(parse_amount(" 0.5 "), Ok(0.5));
        assert_eq!(parse_amount("0"), Ok(0.0));
        assert!(parse_amount("-1").is_err());
        assert!(parse_amount("NaN").is_err());
        assert!(parse_amount("inf").is_err());
        assert!(parse_amount("").is_err());
    }

    #[test]
    fn time_window_requires_two_clock_times() {
        assert_eq!(parse_time_window("08:00-20:00").as_deref(), Ok("08:00-20:00"));
        assert!(parse_time_window("8:00-20:00").is_err());
        assert!(parse_time_window("08:00-24:00").is_err());
        assert!(parse_time_window("08:60-20:00").is_err());
        assert!(parse_time_window("30").is_err());
        assert!(parse_time_window("08:00").is_err());
    }

    #[test]
    fn empty_silo_means_unassigned() {
        assert_eq!(parse_silo("  "), Ok(None));
        assert_eq!(parse_silo("2"), Ok(Some(SiloId(2))));
        assert!(parse_silo("left").is_err());
    }

    #[test]
    fn schedule_form_builds_schedule() {
        let form = ScheduleForm {
            rfid: Rfid::from("A1"),
            time_window: "08:00-20:00".into(),
            amount: "0.5".into(),
        };
        let schedule = form.to_schedule().expect("schedule");
        assert_eq!(schedule.rfid, Rfid::from("A1"));
        assert_eq!(schedule.time_window, "08:00-20:00");
        assert_eq!(schedule.amount, 0.5);
    }

    #[test]
    fn prefilled_form_renders_amount_text() {
        let form = ScheduleForm::prefilled(Rfid::from("A1"), Some("06:00-18:00"), Some(0.25));
        assert_eq!(form.time_window, "06:00-18:00");
        assert_eq!(form.amount, "0.25");
        assert!(!form.is_blank());
        assert!(ScheduleForm::prefilled(Rfid::from("A1"), None, None).is_blank());
    }

    #[test]
    fn registration_requires_name() {
        let mut form = RegistrationForm::for_tag(Rfid::from("B7"));
        form.time_window = "07:00-19:00".into();
        form.amount = "1".into();
        assert_eq!(form.to_pet(), Err(FormError::EmptyName));

        form.name = " Biscuit ".into();
        form.silo = "1".into();
        let pet = form.to_pet().expect("pet");
        assert_eq!(pet.name, "Biscuit");
        assert_eq!(pet.silo, Some(SiloId(1)));
        assert_eq!(pet.time_window.as_deref(), Some("07:00-19:00"));
        assert_eq!(pet.amount, Some(1.0));
    }
}
