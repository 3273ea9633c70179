//! Class Manager entry point
//!
//! The browser build is driven from JavaScript through `class_manager::web`.
//! The native binary runs a short session against an in-memory store and
//! prints the dashboard, which is handy for eyeballing the data layer.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use class_manager::App;
    use class_manager::model::{FeeForm, StudentForm};
    use class_manager::storage::MemoryStore;

    env_logger::init();
    log::info!("Class Manager (native) starting...");
    log::info!("The web front-end loads the wasm build - run with `trunk serve`");

    let mut app = App::open(MemoryStore::new());

    for (name, phone) in [("Ana", "555-0101"), ("Ben", "555-0102")] {
        let form = StudentForm {
            name: name.to_string(),
            course_id: "1".to_string(),
            phone: phone.to_string(),
        };
        match app.submit_student(&form) {
            Ok(student) => {
                let fee = FeeForm {
                    student_id: student.id.to_string(),
                    amount: "500".to_string(),
                    month: "2023-10".to_string(),
                    method: "Cash".to_string(),
                };
                if let Err(e) = app.submit_fee(&fee) {
                    log::error!("Fee rejected: {}", e);
                }
            }
            Err(e) => log::error!("Student rejected: {}", e),
        }
    }

    let dash = app.dashboard();
    println!("Total students: {}", dash.total_students);
    println!("Total revenue:  {}", dash.total_revenue);
    for point in &dash.trend {
        println!("  {}  {}", point.month, point.amount);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // wasm entry is the exported `ClassManager` constructor
}
