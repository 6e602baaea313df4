//! Directory listings, sorted by name so that server and client agree on
//! the order files are hashed in.

use std::fs;
use std::io;
use std::path::Path;

/// Names of the subdirectories of `directory`.
pub fn list_folders(directory: &Path) -> io::Result<Vec<String>> {
    list_entries(directory, true)
}

/// Names of the regular files directly inside `directory`.
pub fn list_files(directory: &Path) -> io::Result<Vec<String>> {
    list_entries(directory, false)
}

fn list_entries(directory: &Path, folders: bool) -> io::Result<Vec<String>> {
    let mut names = Vec::new();

    for entry in fs::read_dir(directory)? {
        let entry = entry?;
        // Follows symlinks, matching what the static file route serves.
        let metadata = match fs::metadata(entry.path()) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(path = %entry.path().display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let wanted = if folders {
            metadata.is_dir()
        } else {
            metadata.is_file()
        };
        if !wanted {
            continue;
        }

        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => tracing::warn!(name = ?raw, "skipping entry with non UTF-8 name"),
        }
    }

    names.sort();
    Ok(names)
}
