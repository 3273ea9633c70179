//! JavaScript bindings (wasm32 only)
//!
//! The page's rendering code owns a `ClassManager` and talks to it with
//! plain strings; collections and views come back as JSON.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::app::App;
use crate::error::StorageError;
use crate::model::{FeeForm, StudentForm};
use crate::repository::UNKNOWN_STUDENT;
use crate::storage::LocalStorage;
use crate::ui::ActiveView;

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct ClassManager {
    app: App,
}

#[wasm_bindgen]
impl ClassManager {
    /// Load state from LocalStorage and keep it in sync
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ClassManager, JsValue> {
        console_error_panic_hook::set_once();
        // Fails only if a previous manager already installed it. The real
        // threshold comes from settings via set_max_level below.
        let _ = console_log::init_with_level(log::Level::Trace);

        let store = LocalStorage::open().ok_or_else(|| js_err(StorageError::Unavailable))?;
        let app = App::open(store);
        log::set_max_level(app.settings.level_filter());
        log::info!("Class manager ready");
        Ok(ClassManager { app })
    }

    /// Returns the new student as JSON
    #[wasm_bindgen(js_name = addStudent)]
    pub fn add_student(&mut self, name: &str, course_id: &str, phone: &str) -> Result<String, JsValue> {
        let form = StudentForm {
            name: name.to_string(),
            course_id: course_id.to_string(),
            phone: phone.to_string(),
        };
        let student = self.app.submit_student(&form).map_err(js_err)?;
        to_json(&student)
    }

    /// Returns the new fee record as JSON
    #[wasm_bindgen(js_name = addFee)]
    pub fn add_fee(
        &mut self,
        student_id: &str,
        amount: &str,
        month: &str,
        method: &str,
    ) -> Result<String, JsValue> {
        let form = FeeForm {
            student_id: student_id.to_string(),
            amount: amount.to_string(),
            month: month.to_string(),
            method: method.to_string(),
        };
        let fee = self.app.submit_fee(&form).map_err(js_err)?;
        to_json(&fee)
    }

    /// Display name; `"Unknown"` unless `id` is exactly a stored student id
    #[wasm_bindgen(js_name = studentName)]
    pub fn student_name(&self, id: &str) -> String {
        let name = self
            .app
            .repo
            .collections()
            .student_by_key(id)
            .map_or(UNKNOWN_STUDENT, |s| s.name.as_str());
        name.to_string()
    }

    pub fn students(&self) -> Result<String, JsValue> {
        to_json(self.app.repo.students())
    }

    pub fn courses(&self) -> Result<String, JsValue> {
        to_json(self.app.repo.courses())
    }

    pub fn dashboard(&self) -> Result<String, JsValue> {
        to_json(&self.app.dashboard())
    }

    #[wasm_bindgen(js_name = filteredFees)]
    pub fn filtered_fees(&self) -> Result<String, JsValue> {
        to_json(&self.app.filtered_fees())
    }

    #[wasm_bindgen(js_name = setSearch)]
    pub fn set_search(&mut self, text: &str) {
        self.app.set_search(text);
    }

    #[wasm_bindgen(js_name = setMethodFilter)]
    pub fn set_method_filter(&mut self, method: &str) -> Result<(), JsValue> {
        self.app.set_method_filter(method).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setMonthFilter)]
    pub fn set_month_filter(&mut self, month: &str) -> Result<(), JsValue> {
        self.app.set_month_filter(month).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setTrendWindow)]
    pub fn set_trend_window(&mut self, window: usize) -> Result<(), JsValue> {
        self.app.set_trend_window(window).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setDefaultMethod)]
    pub fn set_default_method(&mut self, method: &str) -> Result<(), JsValue> {
        self.app.set_default_method(method).map_err(js_err)
    }

    #[wasm_bindgen(js_name = setLogLevel)]
    pub fn set_log_level(&mut self, level: &str) -> Result<(), JsValue> {
        self.app.set_log_level(level).map_err(js_err)
    }

    /// Current preferences as JSON
    pub fn settings(&self) -> Result<String, JsValue> {
        to_json(&self.app.settings)
    }

    #[wasm_bindgen(js_name = selectView)]
    pub fn select_view(&mut self, view: &str) -> Result<(), JsValue> {
        let view = ActiveView::parse(view).ok_or_else(|| js_err(format!("unknown view {view:?}")))?;
        self.app.select_view(view);
        Ok(())
    }

    #[wasm_bindgen(js_name = activeView)]
    pub fn active_view(&self) -> String {
        self.app.ui.active.as_str().to_string()
    }

    #[wasm_bindgen(js_name = toggleSidebar)]
    pub fn toggle_sidebar(&mut self) -> bool {
        self.app.ui.toggle_sidebar();
        self.app.ui.sidebar_open
    }
}
