//! Session wiring: repository, preferences and view state
//!
//! This is what a front-end holds. Form submissions go in as raw text and
//! every accepted change is written back to the store, as is every change
//! to the preferences.

use crate::error::ValidationError;
use crate::model::{FeeForm, FeeRecord, Month, Student, StudentForm};
use crate::repository::Repository;
use crate::settings::Settings;
use crate::storage::KeyValueStore;
use crate::ui::{ActiveView, UiState};
use crate::views::{self, Dashboard, MethodFilter};

pub struct App {
    pub repo: Repository,
    pub settings: Settings,
    pub ui: UiState,
    store: Box<dyn KeyValueStore>,
}

impl App {
    pub fn open<S: KeyValueStore + Clone + 'static>(store: S) -> Self {
        let settings = Settings::load(&store);
        let repo = Repository::open(store.clone());
        log::info!(
            "Session opened: {} students, {} courses, {} fees",
            repo.students().len(),
            repo.courses().len(),
            repo.fees().len()
        );
        Self::from_parts(repo, settings, store)
    }

    /// `store` receives settings changes; `repo` persists on its own terms
    pub fn from_parts(
        repo: Repository,
        settings: Settings,
        store: impl KeyValueStore + 'static,
    ) -> Self {
        let ui = UiState {
            fee_filter: settings.fee_filter(),
            ..UiState::default()
        };
        Self {
            repo,
            settings,
            ui,
            store: Box::new(store),
        }
    }

    pub fn submit_student(&mut self, form: &StudentForm) -> Result<Student, ValidationError> {
        let input = form.parse()?;
        self.repo.add_student(input)
    }

    pub fn submit_fee(&mut self, form: &FeeForm) -> Result<FeeRecord, ValidationError> {
        let input = form.parse()?;
        self.repo.add_fee(input)
    }

    pub fn select_view(&mut self, view: ActiveView) {
        self.ui.select(view);
    }

    pub fn set_search(&mut self, text: &str) {
        self.ui.fee_filter.search = text.to_string();
    }

    /// `"all"`, `"Cash"` or `"Online"`; anything else is rejected
    pub fn set_method_filter(&mut self, method: &str) -> Result<(), ValidationError> {
        self.ui.fee_filter.method = MethodFilter::parse(method)
            .ok_or_else(|| ValidationError::UnknownMethod(method.to_string()))?;
        Ok(())
    }

    /// Empty text clears the month filter
    pub fn set_month_filter(&mut self, month: &str) -> Result<(), ValidationError> {
        self.ui.fee_filter.month = if month.trim().is_empty() {
            None
        } else {
            Some(Month::parse(month)?)
        };
        Ok(())
    }

    /// Fee list under the current filter
    pub fn filtered_fees(&self) -> Vec<&FeeRecord> {
        views::filter_fees(self.repo.collections(), &self.ui.fee_filter)
    }

    pub fn dashboard(&self) -> Dashboard {
        views::dashboard(self.repo.collections(), self.settings.trend_window)
    }

    /// Number of recent fees the earnings trend shows; at least one
    pub fn set_trend_window(&mut self, window: usize) -> Result<(), ValidationError> {
        if window == 0 {
            return Err(ValidationError::InvalidSetting(
                "trend window must be at least 1".to_string(),
            ));
        }
        self.settings.trend_window = window;
        self.save_settings();
        Ok(())
    }

    /// Method filter the next session opens with. The current filter is untouched.
    pub fn set_default_method(&mut self, method: &str) -> Result<(), ValidationError> {
        let filter = MethodFilter::parse(method)
            .ok_or_else(|| ValidationError::UnknownMethod(method.to_string()))?;
        self.settings.fee_method = filter.as_str().to_string();
        self.save_settings();
        Ok(())
    }

    /// Applies at once and is remembered for later sessions
    pub fn set_log_level(&mut self, level: &str) -> Result<(), ValidationError> {
        let filter: log::LevelFilter = level
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidSetting(format!("unknown log level {level:?}")))?;
        log::set_max_level(filter);
        self.settings.log_level = filter.to_string().to_lowercase();
        self.save_settings();
        Ok(())
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save(&*self.store) {
            log::warn!("Saving settings failed: {}", e);
        }
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("repo", &self.repo)
            .field("settings", &self.settings)
            .field("ui", &self.ui)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PaymentMethod;
    use crate::repository::Collections;
    use crate::storage::MemoryStore;

    fn student_form(name: &str) -> StudentForm {
        StudentForm {
            name: name.to_string(),
            course_id: "1".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    fn fee_form(student: &Student, amount: &str, method: &str) -> FeeForm {
        FeeForm {
            student_id: student.id.to_string(),
            amount: amount.to_string(),
            month: "2023-10".to_string(),
            method: method.to_string(),
        }
    }

    #[test]
    fn test_session_flow() {
        let store = MemoryStore::new();
        let mut app = App::open(store.clone());
        assert_eq!(app.ui.active, ActiveView::Dashboard);
        assert_eq!(app.repo.courses().len(), 2);

        let ana = app.submit_student(&student_form("Ana")).unwrap();
        let ben = app.submit_student(&student_form("Ben")).unwrap();
        app.submit_fee(&fee_form(&ana, "500", "Cash")).unwrap();
        app.submit_fee(&fee_form(&ben, "450", "Online")).unwrap();

        let dash = app.dashboard();
        assert_eq!(dash.total_students, 2);
        assert_eq!(dash.total_revenue, 950.0);
        assert_eq!(dash.trend.len(), 2);

        app.select_view(ActiveView::Fees);
        app.set_search("BE");
        let names: Vec<_> = app
            .filtered_fees()
            .iter()
            .map(|f| app.repo.display_name(f.student_id))
            .collect();
        assert_eq!(names, vec!["Ben"]);

        app.set_search("");
        app.set_method_filter("Cash").unwrap();
        assert_eq!(app.filtered_fees().len(), 1);
        assert_eq!(app.filtered_fees()[0].method, PaymentMethod::Cash);

        // a fresh session sees everything that was accepted
        let reopened = App::open(store);
        assert_eq!(reopened.repo.collections(), app.repo.collections());
    }

    #[test]
    fn test_rejected_submissions_change_nothing() {
        let store = MemoryStore::new();
        let mut app = App::open(store.clone());
        assert_eq!(
            app.submit_student(&student_form("  ")),
            Err(ValidationError::EmptyName)
        );

        let ana = app.submit_student(&student_form("Ana")).unwrap();
        assert!(matches!(
            app.submit_fee(&fee_form(&ana, "lots", "Cash")),
            Err(ValidationError::InvalidAmount(_))
        ));
        assert!(app.repo.fees().is_empty());
        assert!(Collections::load(&store).fees.is_empty());
    }

    #[test]
    fn test_student_without_course() {
        let mut app = App::open(MemoryStore::new());
        let form = StudentForm {
            course_id: String::new(),
            ..student_form("Ana")
        };
        let ana = app.submit_student(&form).unwrap();
        assert_eq!(ana.course_id, None);
    }

    #[test]
    fn test_preferences_are_saved() {
        let store = MemoryStore::new();
        let mut app = App::open(store.clone());

        assert!(matches!(
            app.set_trend_window(0),
            Err(ValidationError::InvalidSetting(_))
        ));
        app.set_trend_window(3).unwrap();
        app.set_default_method("online").unwrap();
        assert_eq!(
            app.set_default_method("card"),
            Err(ValidationError::UnknownMethod("card".to_string()))
        );
        assert!(app.set_log_level("loud").is_err());
        app.set_log_level("DEBUG").unwrap();
        // the open session keeps its current filter
        assert_eq!(app.ui.fee_filter.method, MethodFilter::All);

        let saved = Settings::load(&store);
        assert_eq!(saved.trend_window, 3);
        assert_eq!(saved.fee_method, "Online");
        assert_eq!(saved.log_level, "debug");

        let reopened = App::open(store);
        assert_eq!(
            reopened.ui.fee_filter.method,
            MethodFilter::Only(PaymentMethod::Online)
        );
        assert_eq!(reopened.settings, saved);
    }

    #[test]
    fn test_filter_setters() {
        let mut app = App::from_parts(
            Repository::new(Collections::default()),
            Settings {
                fee_method: "Online".to_string(),
                ..Settings::default()
            },
            MemoryStore::new(),
        );
        assert_eq!(
            app.ui.fee_filter.method,
            MethodFilter::Only(PaymentMethod::Online)
        );

        assert!(app.set_method_filter("card").is_err());
        app.set_method_filter("all").unwrap();
        assert_eq!(app.ui.fee_filter.method, MethodFilter::All);

        app.set_month_filter("2023-10").unwrap();
        assert!(app.ui.fee_filter.month.is_some());
        app.set_month_filter("").unwrap();
        assert!(app.ui.fee_filter.month.is_none());
        assert!(app.set_month_filter("10/2023").is_err());
    }
}
