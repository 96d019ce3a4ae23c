//! Handler for `bookstore exercises`.

use serde_json::json;

use super::output;
use crate::adapter::outbound::sqlite::SqliteBookstore;
use crate::application::exercise::check_all;
use crate::error::Result;

/// Run the exercise checker and print the results.
///
/// # Errors
/// Returns an error if no connection can be acquired.
pub fn execute(store: &SqliteBookstore) -> Result<()> {
    let mut conn = store.conn()?;
    let checks = check_all(&mut conn);
    let passed = checks.iter().filter(|check| check.passed).count();

    if output::is_json() {
        output::json_output(json!({
            "command": "exercises",
            "passed": passed,
            "total": checks.len(),
            "checks": checks,
        }));
        return Ok(());
    }

    output::header("Bookstore Exercise Checker");
    for check in &checks {
        let line = format!("{} {}", check.name, output::muted(format!("- {}", check.detail)));
        if check.passed {
            output::success(&line);
        } else {
            output::failure(&line);
        }
    }

    output::section(&format!("Results: {passed}/{} exercises implemented", checks.len()));
    if passed == 0 {
        output::hint(
            "Start with the lessons, then implement the functions in application::exercise.",
        );
    }
    Ok(())
}
