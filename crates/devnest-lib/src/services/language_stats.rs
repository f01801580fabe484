// Language Statistics Engine
// Walks a project tree and aggregates line counts per language

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use ignore::WalkBuilder;
use rayon::prelude::*;

use super::scanner::is_noise_dir;
use crate::models::language_stats::{LanguageEntry, LanguageStats};
use crate::utils::error::{DevNestError, Result};

/// Bytes sampled for the binary check
const BINARY_SAMPLE_BYTES: usize = 8 * 1024;

/// Generated bundles that would dwarf hand-written sources
const GENERATED_SUFFIXES: &[&str] = &[".min.js", ".min.css", ".bundle.js", ".map"];

/// Map a file to its language label; `None` for unmapped files
pub fn language_for_path(path: &Path) -> Option<&'static str> {
    let file_name = path.file_name()?.to_str()?;
    match file_name {
        "Dockerfile" => return Some("Dockerfile"),
        "Makefile" | "makefile" | "GNUmakefile" => return Some("Makefile"),
        _ => {}
    }

    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let language = match ext.as_str() {
        "rs" => "Rust",
        "ts" | "tsx" | "mts" | "cts" => "TypeScript",
        "js" | "jsx" | "mjs" | "cjs" => "JavaScript",
        "py" | "pyi" => "Python",
        "java" => "Java",
        "kt" | "kts" => "Kotlin",
        "go" => "Go",
        "c" | "h" => "C",
        "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => "C++",
        "cs" => "C#",
        "fs" | "fsx" | "fsi" => "F#",
        "swift" => "Swift",
        "rb" => "Ruby",
        "php" => "PHP",
        "scala" | "sc" => "Scala",
        "dart" => "Dart",
        "lua" => "Lua",
        "sh" | "bash" | "zsh" | "fish" => "Shell",
        "ps1" | "psm1" | "psd1" => "PowerShell",
        "html" | "htm" => "HTML",
        "css" => "CSS",
        "scss" | "sass" | "less" => "SCSS",
        "vue" => "Vue",
        "svelte" => "Svelte",
        "sql" => "SQL",
        "md" | "mdx" | "markdown" => "Markdown",
        "json" | "jsonc" => "JSON",
        "yaml" | "yml" => "YAML",
        "toml" => "TOML",
        "xml" | "xaml" | "csproj" | "fsproj" => "XML",
        _ => return None,
    };
    Some(language)
}

fn is_generated(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| {
            let lower = name.to_ascii_lowercase();
            GENERATED_SUFFIXES.iter().any(|s| lower.ends_with(s))
        })
        .unwrap_or(false)
}

/// Count lines, `None` for binary content
pub fn count_lines(content: &[u8]) -> Option<u64> {
    let sample = &content[..content.len().min(BINARY_SAMPLE_BYTES)];
    if sample.contains(&0) {
        return None;
    }

    let terminators = content.iter().filter(|b| **b == b'\n').count() as u64;
    let unterminated_tail = matches!(content.last(), Some(last) if *last != b'\n');
    Some(terminators + u64::from(unterminated_tail))
}

/// Analyze the project at `root`.
///
/// Per-file work runs on the rayon pool; aggregation goes through a
/// `BTreeMap` so identical trees always produce identical output.
pub fn analyze(root: &Path, max_file_bytes: u64) -> Result<LanguageStats> {
    let metadata = fs::metadata(root).map_err(|e| DevNestError::io(root, e))?;
    if !metadata.is_dir() {
        return Err(DevNestError::io(
            root,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
        ));
    }
    // Surface an unreadable root instead of reporting an empty project
    fs::read_dir(root).map_err(|e| DevNestError::io(root, e))?;

    let files = collect_files(root);
    log::debug!(
        "[LanguageStats] {} candidate files under {}",
        files.len(),
        root.display()
    );

    let counted: Vec<(&'static str, u64)> = files
        .par_iter()
        .filter_map(|(path, language)| {
            count_file(path, max_file_bytes).map(|lines| (*language, lines))
        })
        .collect();

    let mut by_language: BTreeMap<&'static str, (u64, u64)> = BTreeMap::new();
    for (language, lines) in counted {
        let entry = by_language.entry(language).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += lines;
    }

    let stats = aggregate(by_language);
    log::info!(
        "[LanguageStats] {}: {} lines across {} languages",
        root.display(),
        stats.total_lines,
        stats.languages.len()
    );
    Ok(stats)
}

fn collect_files(root: &Path) -> Vec<(PathBuf, &'static str)> {
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .require_git(false)
        // Only ignore files inside the project apply
        .parents(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(false)
        .filter_entry(|entry| {
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            !(is_dir && entry.depth() > 0 && is_noise_dir(&entry.file_name().to_string_lossy()))
        })
        .build();

    let mut files = Vec::new();
    let mut skipped = 0usize;
    for result in walker {
        let entry = match result {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("[LanguageStats] Skipping unreadable entry: {}", e);
                skipped += 1;
                continue;
            }
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.into_path();
        if is_generated(&path) {
            continue;
        }
        if let Some(language) = language_for_path(&path) {
            files.push((path, language));
        }
    }
    if skipped > 0 {
        log::debug!("[LanguageStats] {} entries skipped under {}", skipped, root.display());
    }
    files
}

fn count_file(path: &Path, max_file_bytes: u64) -> Option<u64> {
    let size = fs::metadata(path).ok()?.len();
    if size > max_file_bytes {
        log::debug!(
            "[LanguageStats] Skipping large file ({} bytes): {}",
            size,
            path.display()
        );
        return None;
    }
    match fs::read(path) {
        Ok(content) => count_lines(&content),
        Err(e) => {
            log::debug!("[LanguageStats] Cannot read {}: {}", path.display(), e);
            None
        }
    }
}

/// Build the sorted report from per-language (files, lines) totals
fn aggregate(by_language: BTreeMap<&'static str, (u64, u64)>) -> LanguageStats {
    let total_lines: u64 = by_language.values().map(|(_, lines)| lines).sum();
    if total_lines == 0 {
        return LanguageStats::empty();
    }

    let mut languages: Vec<LanguageEntry> = by_language
        .into_iter()
        .map(|(language, (files, lines))| LanguageEntry {
            language: language.to_string(),
            files,
            lines,
            percentage: lines as f64 * 100.0 / total_lines as f64,
        })
        .collect();
    languages.sort_by(|a, b| {
        b.lines
            .cmp(&a.lines)
            .then_with(|| a.language.cmp(&b.language))
    });

    LanguageStats {
        total_lines,
        languages,
        scanned_at: chrono::Utc::now().to_rfc3339(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const LIMIT: u64 = 5 * 1024 * 1024;

    #[test]
    fn test_count_lines() {
        assert_eq!(count_lines(b""), Some(0));
        assert_eq!(count_lines(b"one"), Some(1));
        assert_eq!(count_lines(b"one\n"), Some(1));
        assert_eq!(count_lines(b"one\ntwo"), Some(2));
        assert_eq!(count_lines(b"\n\n\n"), Some(3));
        assert_eq!(count_lines(b"bin\0ary\n"), None);
    }

    #[test]
    fn test_language_mapping() {
        assert_eq!(language_for_path(Path::new("src/main.RS")), Some("Rust"));
        assert_eq!(language_for_path(Path::new("app.tsx")), Some("TypeScript"));
        assert_eq!(language_for_path(Path::new("Dockerfile")), Some("Dockerfile"));
        assert_eq!(language_for_path(Path::new("Cargo.lock")), None);
        assert_eq!(language_for_path(Path::new("LICENSE")), None);
    }

    #[test]
    fn test_analyze_aggregates_and_sorts() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/main.rs"), "fn main() {\n}\n").unwrap();
        std::fs::write(dir.path().join("src/lib.rs"), "pub mod a;\n").unwrap();
        std::fs::write(dir.path().join("index.ts"), "a\nb\nc\n").unwrap();
        std::fs::write(dir.path().join("script.py"), "x = 1\ny = 2\nz = 3").unwrap();

        let stats = analyze(dir.path(), LIMIT).unwrap();
        assert_eq!(stats.total_lines, 9);

        let order: Vec<_> = stats.languages.iter().map(|l| l.language.as_str()).collect();
        // Ties on line count resolve by name
        assert_eq!(order, vec!["Python", "Rust", "TypeScript"]);
        assert_eq!(stats.languages[1].files, 2);

        let sum: f64 = stats.languages.iter().map(|l| l.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-6);
    }

    #[test]
    fn test_skips_noise_binary_generated_and_ignored() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("node_modules/x")).unwrap();
        std::fs::write(dir.path().join("node_modules/x/index.js"), "a\nb\n").unwrap();
        std::fs::write(dir.path().join("app.min.js"), "a\nb\n").unwrap();
        std::fs::write(dir.path().join("blob.c"), b"\0\0\0\n").unwrap();
        std::fs::write(dir.path().join(".gitignore"), "generated/\n").unwrap();
        std::fs::create_dir_all(dir.path().join("generated")).unwrap();
        std::fs::write(dir.path().join("generated/out.go"), "package x\n").unwrap();
        std::fs::write(dir.path().join("main.go"), "package main\n").unwrap();

        let stats = analyze(dir.path(), LIMIT).unwrap();
        assert_eq!(stats.total_lines, 1);
        assert_eq!(stats.languages.len(), 1);
        assert_eq!(stats.languages[0].language, "Go");
    }

    #[test]
    fn test_empty_project_yields_zero() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("README"), "no extension").unwrap();

        let stats = analyze(dir.path(), LIMIT).unwrap();
        assert_eq!(stats.total_lines, 0);
        assert!(stats.languages.is_empty());
    }

    #[test]
    fn test_large_files_are_skipped() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("big.rs"), "a\n".repeat(64)).unwrap();
        std::fs::write(dir.path().join("small.rs"), "a\n").unwrap();

        let stats = analyze(dir.path(), 16).unwrap();
        assert_eq!(stats.total_lines, 1);
    }

    #[test]
    fn test_ignore_files_above_root_are_not_applied() {
        let outer = tempdir().unwrap();
        std::fs::write(outer.path().join(".gitignore"), "*.rs\n").unwrap();
        let project = outer.path().join("proj");
        std::fs::create_dir_all(project.join("src")).unwrap();
        std::fs::write(project.join("src/main.rs"), "fn main() {}\n").unwrap();

        let stats = analyze(&project, LIMIT).unwrap();
        assert_eq!(stats.total_lines, 1);
        assert_eq!(stats.languages[0].language, "Rust");
    }

    #[test]
    fn test_missing_root_is_io_error() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            analyze(&dir.path().join("nope"), LIMIT),
            Err(DevNestError::Io { .. })
        ));
    }

    #[test]
    fn test_repeatable() {
        let dir = tempdir().unwrap();
        for i in 0..20 {
            std::fs::write(dir.path().join(format!("f{}.rs", i)), "x\n".repeat(i + 1)).unwrap();
            std::fs::write(dir.path().join(format!("f{}.js", i)), "y\n".repeat(20 - i)).unwrap();
        }
        let a = analyze(dir.path(), LIMIT).unwrap();
        let b = analyze(dir.path(), LIMIT).unwrap();
        assert_eq!(a.languages, b.languages);
        assert_eq!(a.total_lines, b.total_lines);
    }
}
