use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use l10n_site_data::{write_file, SiteLayout};
use l10n_vcs::RepositoryIdentity;

use crate::{FindingLevel, StepReport};

/// Render the run log: when and where the hook ran, what was staged, and what it found.
pub fn format_run_log(
    time: DateTime<Local>,
    identity: &RepositoryIdentity,
    staged: &[String],
    report: &StepReport,
) -> String {
    let mut log = format!("=== {} ===\n", time.format("%Y-%m-%d %H:%M:%S"));
    log.push_str(&format!("[Branch]  {}\n", identity.branch));
    log.push_str(&format!(
        "[User]    {} <{}>\n",
        identity.user_name, identity.user_email
    ));
    log.push_str(&format!("[Files]   {}\n", staged.join(", ")));
    if report.is_clean() {
        log.push_str("OK     Passed with no issues\n");
    } else {
        for finding in &report.findings {
            let mark = match finding.level {
                FindingLevel::Warning => "WARN ",
                FindingLevel::Error => "ERROR",
            };
            log.push_str(&format!("{mark}  {}\n", finding.message));
        }
        log.push_str("ERROR  Commit aborted because of the issues above.\n");
    }
    log.push('\n');
    log
}

/// Replace the run log file with the log for this run.
pub fn write_run_log(layout: &SiteLayout, content: &str) -> Result<()> {
    let path = layout.resolve(&layout.run_log_file);
    write_file(&path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    fn identity() -> RepositoryIdentity {
        RepositoryIdentity {
            branch: "main".into(),
            user_name: "Someone".into(),
            user_email: "someone@example.com".into(),
        }
    }

    #[test]
    pub fn test_clean_run_log() {
        let time = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let staged = vec!["a.json".to_string(), "b.yml".to_string()];
        let log = format_run_log(time, &identity(), &staged, &StepReport::default());
        assert_eq!(
            log,
            "=== 2024-05-01 12:30:00 ===\n\
             [Branch]  main\n\
             [User]    Someone <someone@example.com>\n\
             [Files]   a.json, b.yml\n\
             OK     Passed with no issues\n\
             \n"
        );
    }

    #[test]
    pub fn test_run_log_with_findings() {
        let time = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let mut report = StepReport::default();
        report.warning("translations/Bad: bad name");
        report.error("b.json: invalid JSON");
        let log = format_run_log(time, &identity(), &[], &report);
        assert!(log.contains("WARN   translations/Bad: bad name\n"));
        assert!(log.contains("ERROR  b.json: invalid JSON\n"));
        assert!(log.ends_with("Commit aborted because of the issues above.\n\n"));
    }
}
