//! Check command implementation
//!
//! Validates scenario files without evaluating them. Every violation of
//! every step is reported, not just the first.

use std::path::PathBuf;

use lcis_core::traits::Calculator;
use tracing::info;

use crate::config::CliConfig;
use crate::input::load_scenario;
use crate::output::push_line;
use crate::{CliError, Result};

/// Check each file and build the report.
///
/// # Returns
/// The report text and the number of problems found. A file that cannot be
/// loaded counts as one problem.
pub fn render(files: &[PathBuf], config: &CliConfig) -> (String, usize) {
    let mut out = String::new();
    let mut problems = 0;

    match &config.source {
        Some(path) => {
            push_line(&mut out, format!("config: {} (ok)", path.display()));
        }
        None => out.push_str("config: defaults (ok)\n"),
    }

    for path in files {
        let loaded = match load_scenario(path) {
            Ok(loaded) => loaded,
            Err(e) => {
                problems += 1;
                push_line(&mut out, format!("{}: {}", path.display(), e));
                continue;
            }
        };

        let schema = loaded.calculator.schema();
        let mut file_problems = 0;
        for (index, step) in loaded.scenario.steps().iter().enumerate() {
            let Some(raw) = loaded.scenario.merged_inputs(index) else {
                continue;
            };
            if let Err(violations) = schema.check_all(&raw) {
                for violation in violations {
                    file_problems += 1;
                    push_line(
                        &mut out,
                        format!(
                            "{}: step {} ({}): {}",
                            path.display(),
                            index,
                            step.key,
                            violation
                        ),
                    );
                }
            }
        }

        if file_problems == 0 {
            push_line(
                &mut out,
                format!(
                    "{}: {} step(s) valid for {}",
                    path.display(),
                    loaded.scenario.len(),
                    loaded.calculator
                ),
            );
        }
        problems += file_problems;
    }

    (out, problems)
}

/// Run the check command
pub fn run(files: &[PathBuf], config: &CliConfig) -> Result<()> {
    info!("Checking {} file(s)", files.len());
    let (report, problems) = render(files, config);
    print!("{}", report);

    if problems > 0 {
        return Err(CliError::CheckFailed(problems));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_valid_file() {
        let file = write_temp(
            r#"
            calculator = "chemistry_blend"
            shared = { li_capacity = 50 }

            [[step]]
            inputs = { na_capacity = 50 }
            "#,
        );
        let (report, problems) = render(&[file.path().to_path_buf()], &CliConfig::default());

        assert_eq!(problems, 0, "{}", report);
        assert!(report.contains("1 step(s) valid for chemistry_blend"));
    }

    #[test]
    fn test_reports_every_violation() {
        let file = write_temp(
            r#"
            calculator = "chemistry_blend"

            [[step]]
            inputs = { li_capacity = -1, na_capacity = -2 }

            [[step]]
            inputs = { li_capacity = 10 }
            "#,
        );
        let (report, problems) = render(&[file.path().to_path_buf()], &CliConfig::default());

        assert_eq!(problems, 3, "{}", report);
        assert!(report.contains("step 0 (t=0)"));
        assert!(report.contains("step 1 (t=1)"));
    }

    #[test]
    fn test_unreadable_file_counts_once() {
        let missing = PathBuf::from("/no/such/scenario.toml");
        let (report, problems) = render(&[missing], &CliConfig::default());
        assert_eq!(problems, 1);
        assert!(report.contains("File not found"));
    }

    #[test]
    fn test_run_fails_on_problems() {
        let missing = PathBuf::from("/no/such/scenario.toml");
        assert!(matches!(
            run(&[missing], &CliConfig::default()),
            Err(CliError::CheckFailed(1))
        ));
    }
}
