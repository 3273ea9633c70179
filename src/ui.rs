//! Presentation state: which view is shown and the fee list filter

use crate::views::FeeFilter;

/// The four top-level views. Any view can be selected from any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Dashboard,
    Students,
    Courses,
    Fees,
}

impl ActiveView {
    pub const ALL: [ActiveView; 4] = [
        ActiveView::Dashboard,
        ActiveView::Students,
        ActiveView::Courses,
        ActiveView::Fees,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveView::Dashboard => "dashboard",
            ActiveView::Students => "students",
            ActiveView::Courses => "courses",
            ActiveView::Fees => "fees",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "dashboard" => Some(ActiveView::Dashboard),
            "students" => Some(ActiveView::Students),
            "courses" => Some(ActiveView::Courses),
            "fees" => Some(ActiveView::Fees),
            _ => None,
        }
    }

    /// Sidebar label
    pub fn label(&self) -> &'static str {
        match self {
            ActiveView::Dashboard => "Dashboard",
            ActiveView::Students => "Students",
            ActiveView::Courses => "Courses",
            ActiveView::Fees => "Fee Records",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    pub active: ActiveView,
    /// Mobile sidebar overlay
    pub sidebar_open: bool,
    pub fee_filter: FeeFilter,
}

impl UiState {
    /// Switch view; also closes the mobile sidebar
    pub fn select(&mut self, view: ActiveView) {
        self.active = view;
        self.sidebar_open = false;
    }

    pub fn toggle_sidebar(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }
}
