use std::fs;

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use l10n_site_data::SiteLayout;

/// Copy everything under the translations directory into the mirror directory, overwriting files
/// that already exist there. Files only present in the mirror are left alone. Returns the number
/// of files copied.
pub fn mirror_translations(layout: &SiteLayout) -> Result<usize> {
    let source = layout.translations_path();
    let destination = layout.resolve(&layout.mirror_dir);
    fs::create_dir_all(&destination)
        .with_context(|| format!("Failed to create {}", destination.display()))?;
    if !source.is_dir() {
        return Ok(0);
    }

    // Everything is copied, including dotfiles and files git ignores.
    let walker = WalkBuilder::new(&source).standard_filters(false).build();
    let mut copied = 0;
    for entry in walker {
        let entry = entry?;
        let relative = entry.path().strip_prefix(&source).with_context(|| {
            format!("{} is outside {}", entry.path().display(), source.display())
        })?;
        let target = destination.join(relative);

        if entry.file_type().is_some_and(|file_type| file_type.is_dir()) {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
            continue;
        }
        if target.is_dir() {
            fs::remove_dir_all(&target)
                .with_context(|| format!("Failed to replace {}", target.display()))?;
        }
        fs::copy(entry.path(), &target).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                entry.path().display(),
                target.display()
            )
        })?;
        copied += 1;
    }
    Ok(copied)
}
