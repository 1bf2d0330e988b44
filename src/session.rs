//! Session context and route gating.
//!
//! The session is an explicit value loaded once at start-up and handed to
//! whatever needs it. It records who is signed in and the display
//! preference, and decides which view a route may show.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::db::{read_json, write_json};

/// File name of the persisted session inside the data directory.
pub const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

impl User {
    /// Avatar initials: first letters of first and last name, "U" when no
    /// first name is known.
    pub fn initials(&self) -> String {
        let first = self
            .first_name
            .as_deref()
            .and_then(|n| n.trim().chars().next());
        let Some(first) = first else {
            return "U".to_string();
        };
        let mut out = first.to_uppercase().to_string();
        if let Some(last) = self.last_name.as_deref().and_then(|n| n.trim().chars().next()) {
            out.extend(last.to_uppercase());
        }
        out
    }

    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if name.is_empty() {
            self.email.clone()
        } else {
            name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub dark_mode: bool,
}

/// Views the application can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Dashboard,
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        match path.trim_end_matches('/') {
            "" => Route::Dashboard,
            "/login" => Route::Login,
            "/signup" => Route::Signup,
            _ => Route::NotFound,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Dashboard => "/",
            Route::NotFound => "*",
        }
    }
}

impl Session {
    /// Load the session from the data directory; a missing file is a
    /// signed-out session.
    pub fn load(data_dir: &Path) -> io::Result<Self> {
        Ok(read_json(&data_dir.join(SESSION_FILE))?.unwrap_or_default())
    }

    pub fn save(&self, data_dir: &Path) -> io::Result<()> {
        write_json(&data_dir.join(SESSION_FILE), self)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn sign_in(&mut self, user: User) {
        self.user = Some(user);
    }

    pub fn sign_out(&mut self) {
        self.user = None;
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    /// The view actually shown when `route` is requested.
    ///
    /// The dashboard requires a signed-in user; sign-in and sign-up pages
    /// are only for signed-out users.
    pub fn resolve(&self, route: Route) -> Route {
        match (route, self.is_authenticated()) {
            (Route::Dashboard, false) => Route::Login,
            (Route::Login | Route::Signup, true) => Route::Dashboard,
            (route, _) => route,
        }
    }
}
