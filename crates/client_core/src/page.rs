//! Page addressing and the host surface (notices and navigation).

use shared::domain::Rfid;
use thiserror::Error;
use url::{form_urlencoded, Url};

pub const EDIT_SCHEDULE_PATH: &str = "/edit-schedule.html";
pub const REGISTER_PET_PATH: &str = "/register-pet.html";

// Only used to resolve relative locations; never requested.
const LOCATION_BASE: &str = "http://dashboard.invalid/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Dashboard,
    EditSchedule { rfid: Rfid },
    RegisterPet { rfid: Rfid },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("invalid location '{location}': {message}")]
    InvalidLocation { location: String, message: String },
    #[error("unknown page '{0}'")]
    UnknownPage(String),
    #[error("page {page} requires an rfid query parameter")]
    MissingRfid { page: &'static str },
}

impl Page {
    /// Resolves a path with optional query string, e.g.
    /// `/edit-schedule.html?rfid=A1`.
    pub fn parse(location: &str) -> Result<Self, PageError> {
        let base = Url::parse(LOCATION_BASE).map_err(|err| PageError::InvalidLocation {
            location: location.to_string(),
            message: err.to_string(),
        })?;
        let url = base
            .join(location.trim())
            .map_err(|err| PageError::InvalidLocation {
                location: location.to_string(),
                message: err.to_string(),
            })?;

        let rfid = url
            .query_pairs()
            .find(|(key, _)| *key == "rfid")
            .map(|(_, value)| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(Rfid);

        match url.path() {
            "/" | "/index.html" => Ok(Self::Dashboard),
            EDIT_SCHEDULE_PATH => rfid
                .map(|rfid| Self::EditSchedule { rfid })
                .ok_or(PageError::MissingRfid {
                    page: EDIT_SCHEDULE_PATH,
                }),
            REGISTER_PET_PATH => rfid
                .map(|rfid| Self::RegisterPet { rfid })
                .ok_or(PageError::MissingRfid {
                    page: REGISTER_PET_PATH,
                }),
            other => Err(PageError::UnknownPage(other.to_string())),
        }
    }

    pub fn href(&self) -> String {
        match self {
            Self::Dashboard => "/".to_string(),
            Self::EditSchedule { rfid } => with_rfid(EDIT_SCHEDULE_PATH, rfid),
            Self::RegisterPet { rfid } => with_rfid(REGISTER_PET_PATH, rfid),
        }
    }
}

fn with_rfid(path: &str, rfid: &Rfid) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("rfid", rfid.as_str())
        .finish();
    format!("{path}?{query}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    Error(String),
}

impl Notice {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Side effects a workflow may have on the page that hosts it.
pub trait PageHost: Send + Sync {
    fn notify(&self, notice: Notice);
    fn navigate(&self, page: Page);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dashboard_root() {
        assert_eq!(Page::parse("/"), Ok(Page::Dashboard));
        assert_eq!(Page::parse("/index.html"), Ok(Page::Dashboard));
    }

    #[test]
    fn parses_rfid_from_query() {
        assert_eq!(
            Page::parse("/edit-schedule.html?rfid=A1"),
            Ok(Page::EditSchedule { rfid: Rfid::from("A1") })
        );
        assert_eq!(
            Page::parse("register-pet.html?foo=1&rfid=04%3AA2"),
            Ok(Page::RegisterPet {
                rfid: Rfid::from("04:A2")
            })
        );
    }

    #[test]
    fn rejects_workflow_page_without_rfid() {
        assert_eq!(
            Page::parse("/register-pet.html?rfid="),
            Err(PageError::MissingRfid {
                page: REGISTER_PET_PATH
            })
        );
        assert!(matches!(
            Page::parse("/settings.html"),
            Err(PageError::UnknownPage(_))
        ));
    }

    #[test]
    fn href_round_trips_through_parse() {
        let page = Page::RegisterPet {
            rfid: Rfid::from("a b&c"),
        };
        assert_eq!(page.href(), "/register-pet.html?rfid=a+b%26c");
        assert_eq!(Page::parse(&page.href()), Ok(page));
    }
}
