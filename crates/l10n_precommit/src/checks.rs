use std::fs;

use l10n_site_data::{
    discover_slug_dirs, discover_translated_files, is_valid_slug, I18nFileKind, SiteLayout,
};

use crate::StepReport;

/// Every slug folder that has a translation must have a valid name.
pub fn check_slug_names(layout: &SiteLayout) -> StepReport {
    let mut report = StepReport::default();
    match discover_translated_files(layout) {
        Ok(files) => {
            for file in files.iter().filter(|file| !is_valid_slug(&file.dir_name)) {
                report.warning(format!(
                    "{}/{}: folder names may only use lowercase letters, digits, and '-'",
                    layout.translations_dir, file.dir_name
                ));
            }
        }
        Err(error) => report.error(format!("Failed to list translated files: {error}")),
    }
    report
}

/// Every slug folder must contain `i18n/`, and `i18n/` must contain the translated file.
pub fn check_slug_layout(layout: &SiteLayout) -> StepReport {
    let mut report = StepReport::default();
    let dirs = match discover_slug_dirs(layout) {
        Ok(dirs) => dirs,
        Err(error) => {
            report.error(format!("Failed to list slug folders: {error}"));
            return report;
        }
    };

    for (dir_name, path) in dirs {
        let slug_dir = format!("{}/{dir_name}", layout.translations_dir);
        let i18n = path.join("i18n");
        if !i18n.is_dir() {
            report.warning(format!("{slug_dir}: missing the i18n folder"));
            continue;
        }
        if !i18n.join(I18nFileKind::Translated.file_name()).exists() {
            report.warning(format!(
                "{slug_dir}: i18n has no {}, add the translation file",
                I18nFileKind::Translated.file_name()
            ));
        }
    }
    report
}

/// Anything in an `i18n/` folder besides the two known files is reported, but left in place.
pub fn check_extra_files(layout: &SiteLayout) -> StepReport {
    let mut report = StepReport::default();
    let Ok(dirs) = discover_slug_dirs(layout) else {
        // Already reported by the layout check.
        return report;
    };

    for (dir_name, path) in dirs {
        let i18n = path.join("i18n");
        let Ok(entries) = fs::read_dir(&i18n) else {
            continue;
        };
        let mut extra: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| {
                name != I18nFileKind::Default.file_name()
                    && name != I18nFileKind::Translated.file_name()
            })
            .collect();
        if extra.is_empty() {
            continue;
        }
        extra.sort();
        report.warning(format!(
            "{}/{dir_name}/i18n: unexpected files ({}), not removed",
            layout.translations_dir,
            extra.join(", ")
        ));
    }
    report
}

/// Parse every staged JSON and YAML file that still exists. JSON may carry comments. JSON files
/// under the mirror directory are copies and aren't checked again.
pub fn check_syntax(layout: &SiteLayout, staged: &[String]) -> StepReport {
    let mut report = StepReport::default();
    let mirror_prefix = format!("{}/", layout.mirror_dir.trim_end_matches('/'));

    for path in staged {
        let full_path = layout.resolve(path);
        if !full_path.is_file() {
            continue;
        }
        if path.ends_with(".json") {
            if path.starts_with(&mirror_prefix) {
                continue;
            }
            if let Err(error) = l10n_json_template::read_relaxed_json_file(&full_path) {
                report.error(format!("{path}: invalid JSON: {error}"));
            }
        } else if path.ends_with(".yml") || path.ends_with(".yaml") {
            let result = fs::read_to_string(&full_path)
                .map_err(|error| error.to_string())
                .and_then(|text| {
                    serde_yaml::from_str::<serde_yaml::Value>(&text)
                        .map(|_| ())
                        .map_err(|error| error.to_string())
                });
            if let Err(error) = result {
                report.error(format!("{path}: invalid YAML: {error}"));
            }
        }
    }
    report
}
