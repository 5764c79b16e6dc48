/// Convert Windows-style separators so paths can be compared against the `/`-separated paths git
/// and the site configuration use.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// One entry of `git diff --name-status` output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileChange {
    Added(String),
    Modified(String),
    Deleted(String),
    Copied { from: String, to: String },
    Renamed { from: String, to: String },
}

impl FileChange {
    /// The path that exists after this change, if any.
    pub fn current_path(&self) -> Option<&str> {
        match self {
            FileChange::Added(path) | FileChange::Modified(path) => Some(path.as_str()),
            FileChange::Copied { to, .. } | FileChange::Renamed { to, .. } => Some(to.as_str()),
            FileChange::Deleted(_) => None,
        }
    }

    /// Every path touched by this change.
    pub fn paths(&self) -> Vec<&str> {
        match self {
            FileChange::Added(path) | FileChange::Modified(path) | FileChange::Deleted(path) => {
                vec![path.as_str()]
            }
            FileChange::Copied { from, to } | FileChange::Renamed { from, to } => {
                vec![from.as_str(), to.as_str()]
            }
        }
    }
}

/// Parse the output of `git diff --name-status`. Status letters may carry a similarity score
/// (`R087`), and renames and copies list both the old and new paths. Unrecognized lines are
/// skipped.
pub fn parse_name_status(output: &str) -> Vec<FileChange> {
    let mut changes = vec![];
    for line in output.lines() {
        let mut fields = line.split('\t');
        let Some(status) = fields.next().and_then(|status| status.chars().next()) else {
            continue;
        };
        let first = fields.next().map(normalize_path);
        let second = fields.next().map(normalize_path);
        let change = match (status, first, second) {
            ('A', Some(path), _) => FileChange::Added(path),
            ('M' | 'T', Some(path), _) => FileChange::Modified(path),
            ('D', Some(path), _) => FileChange::Deleted(path),
            ('R', Some(from), Some(to)) => FileChange::Renamed { from, to },
            ('C', Some(from), Some(to)) => FileChange::Copied { from, to },
            _ => {
                log::debug!("Skipping unrecognized name-status line: {line:?}");
                continue;
            }
        };
        changes.push(change);
    }
    changes
}

/// Parse `--name-only` style output into normalized, non-empty paths.
pub fn parse_name_only(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .map(normalize_path)
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    pub fn test_parse_simple_statuses() {
        let output = "M\ttranslations/bear-family/i18n/ja.json\nA\ttranslations/eli/i18n/default.json\nD\tREADME.md\n";
        assert_eq!(
            parse_name_status(output),
            vec![
                FileChange::Modified("translations/bear-family/i18n/ja.json".into()),
                FileChange::Added("translations/eli/i18n/default.json".into()),
                FileChange::Deleted("README.md".into()),
            ]
        );
    }

    #[test]
    pub fn test_parse_rename_with_score() {
        let output = "R087\ttranslations/Old/i18n/ja.json\ttranslations/new/i18n/ja.json";
        let changes = parse_name_status(output);
        assert_eq!(
            changes,
            vec![FileChange::Renamed {
                from: "translations/Old/i18n/ja.json".into(),
                to: "translations/new/i18n/ja.json".into(),
            }]
        );
        assert_eq!(changes[0].current_path(), Some("translations/new/i18n/ja.json"));
        assert_eq!(changes[0].paths().len(), 2);
    }

    #[test]
    pub fn test_parse_skips_malformed_lines() {
        let output = "\nR100\tonly-one-path\nX\tweird\nC50\ta\tb\n";
        assert_eq!(
            parse_name_status(output),
            vec![FileChange::Copied {
                from: "a".into(),
                to: "b".into()
            }]
        );
    }

    #[test]
    pub fn test_parse_name_only_normalizes() {
        assert_eq!(
            parse_name_only("a\\b.json\r\n\nc/d.yml\n"),
            vec!["a/b.json".to_string(), "c/d.yml".to_string()]
        );
    }
}
