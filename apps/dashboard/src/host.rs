//! Terminal stand-in for the browser page: notices go to the console and
//! navigation is remembered for the caller to follow.

use std::sync::{Mutex, PoisonError};

use client_core::{Notice, Page, PageHost};
use tracing::debug;

#[derive(Default)]
pub struct ConsoleHost {
    navigation: Mutex<Option<Page>>,
}

impl ConsoleHost {
    pub fn take_navigation(&self) -> Option<Page> {
        self.navigation
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

impl PageHost for ConsoleHost {
    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Info(text) => println!("{text}"),
            Notice::Error(text) => eprintln!("error: {text}"),
        }
    }

    fn navigate(&self, page: Page) {
        debug!(page = %page.href(), "navigate");
        *self
            .navigation
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(page);
    }
}
