use ignore::WalkBuilder;
use std::io;
use std::path::PathBuf;

/// How directory arguments are expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalkOptions {
    /// Skip hidden files and directories
    pub hidden: bool,
    /// Respect .gitignore, the global gitignore and .git/info/exclude
    pub git_ignore: bool,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            hidden: true,
            git_ignore: true,
        }
    }
}

/// Expand `paths` into files. Files are yielded as given, even if they do
/// not exist; directories are walked.
pub fn walk_paths(paths: &[String], options: WalkOptions) -> impl Iterator<Item = io::Result<PathBuf>> {
    let mut all_files = vec![];

    for path in paths {
        let as_path = PathBuf::from(path);
        // EditorConfig lookups are valid for files that do not exist yet
        if !as_path.is_dir() {
            all_files.push(Ok(as_path));
            continue;
        }

        let walker = WalkBuilder::new(path)
            .hidden(options.hidden)
            .git_ignore(options.git_ignore)
            .git_global(options.git_ignore)
            .git_exclude(options.git_ignore)
            .filter_entry(|entry| entry.file_name() != ".git")
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        for entry in walker {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_file()) {
                        all_files.push(Ok(entry.into_path()));
                    }
                }
                Err(e) => {
                    all_files.push(Err(io::Error::other(e.to_string())));
                }
            }
        }
    }

    all_files.into_iter()
}
