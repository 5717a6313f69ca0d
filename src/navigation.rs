// 🧭 Navigation - explicit view state + history stack
//
// The current view is ONE tagged value; going somewhere pushes the old view
// onto the history; going back pops it. Views hold query keys only, never
// computed results, so re-rendering always re-derives from the snapshot.

use serde::{Deserialize, Serialize};

use crate::facade::IdentityRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchMode {
    Zip,
    Name,
}

impl SearchMode {
    pub fn toggle(&self) -> Self {
        match self {
            SearchMode::Zip => SearchMode::Name,
            SearchMode::Name => SearchMode::Zip,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            SearchMode::Zip => "Search by ZIP Code",
            SearchMode::Name => "Search by Name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum View {
    Home,
    Results { mode: SearchMode, query: String },
    ProfileDetail(IdentityRef),
    RecordDetail { record_id: String },
}

impl View {
    pub fn title(&self) -> String {
        match self {
            View::Home => "Home".to_string(),
            View::Results {
                mode: SearchMode::Zip,
                query,
            } => format!("Representatives for {}", query),
            View::Results {
                mode: SearchMode::Name,
                query,
            } => format!("Search Results for \"{}\"", query),
            View::ProfileDetail(IdentityRef::StableId(id)) => format!("Profile {}", id),
            View::ProfileDetail(IdentityRef::Name(name)) => format!("Profile {}", name),
            View::RecordDetail { record_id } => format!("Record {}", record_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    current: View,
    history: Vec<View>,
}

impl Navigator {
    pub fn new() -> Self {
        Navigator {
            current: View::Home,
            history: Vec::new(),
        }
    }

    pub fn current(&self) -> &View {
        &self.current
    }

    pub fn history(&self) -> &[View] {
        &self.history
    }

    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Push the current view and show `view`. Re-opening the view already
    /// shown is a no-op.
    pub fn go(&mut self, view: View) {
        if view == self.current {
            return;
        }
        let previous = std::mem::replace(&mut self.current, view);
        self.history.push(previous);
    }

    /// Pop to the previous view. Returns false at the bottom of the stack.
    pub fn back(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                true
            }
            None => false,
        }
    }

    /// Clear history and return to Home
    pub fn home(&mut self) {
        self.history.clear();
        self.current = View::Home;
    }

    /// Start a new search: results always sit directly on top of Home
    pub fn search(&mut self, mode: SearchMode, query: &str) {
        self.home();
        self.go(View::Results {
            mode,
            query: query.to_string(),
        });
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}
