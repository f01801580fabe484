// IDE Detector
// Probes the host for known tools and proposes catalog entries

use std::collections::HashSet;
use std::path::PathBuf;

use super::ide_catalog::{
    curated_name, normalize_executable, prettify_name, IdeFamily, IDE_FAMILIES,
    UNRECOGNIZED_PRIORITY,
};
use super::platform::Platform;
use crate::models::ide::{IdeCategory, IdeConfig, DEFAULT_ARGS_TEMPLATE};
use crate::utils::config::normalize_path_for_display;
use crate::utils::path_resolver;

/// A proposed catalog entry plus where its icon may come from
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedIde {
    pub ide: IdeConfig,
    pub icon_source: Option<PathBuf>,
}

/// Ids and executables already in the catalog
struct KnownTools {
    ids: HashSet<String>,
    executables: HashSet<String>,
}

impl KnownTools {
    fn from_catalog(catalog: &[IdeConfig]) -> Self {
        Self {
            ids: catalog.iter().map(|i| i.id.clone()).collect(),
            executables: catalog
                .iter()
                .map(|i| normalize_executable(&i.executable))
                .collect(),
        }
    }

    fn contains_executable(&self, executable: &str) -> bool {
        self.executables.contains(&normalize_executable(executable))
    }

    fn insert(&mut self, ide: &IdeConfig) {
        self.ids.insert(ide.id.clone());
        self.executables.insert(normalize_executable(&ide.executable));
    }

    /// First free id derived from `base`
    fn unique_id(&self, base: &str) -> String {
        if !self.ids.contains(base) {
            return base.to_string();
        }
        (2..)
            .map(|n| format!("{}-{}", base, n))
            .find(|id| !self.ids.contains(id))
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
    }
}

/// Propose entries for tools installed on the host but missing from `catalog`.
///
/// An entry is skipped when its id or its executable is already cataloged,
/// so running detection again after adding the results yields nothing new.
pub fn detect(platform: &dyn Platform, catalog: &[IdeConfig]) -> Vec<DetectedIde> {
    path_resolver::clear_cache();
    let mut known = KnownTools::from_catalog(catalog);
    let mut detected = Vec::new();

    for family in IDE_FAMILIES {
        if known.ids.contains(family.id) {
            continue;
        }
        let Some(executable) = locate_family(platform, family) else {
            continue;
        };
        let executable = normalize_path_for_display(&executable);
        if known.contains_executable(&executable) {
            log::debug!(
                "[Detector] {} already cataloged via {}",
                family.id,
                executable
            );
            continue;
        }

        let ide = IdeConfig {
            id: family.id.to_string(),
            name: prettify_name(&executable),
            executable,
            args_template: family.args_template.to_string(),
            icon: None,
            category: family.category,
            priority: family.priority,
            auto_detected: true,
        };
        log::info!("[Detector] Found {} at {}", ide.name, ide.executable);
        known.insert(&ide);
        detected.push(DetectedIde {
            ide,
            icon_source: None,
        });
    }

    for tool in platform.discover_extra_tools() {
        let executable = normalize_path_for_display(&tool.executable);
        if known.contains_executable(&executable) {
            continue;
        }

        let name = match (curated_name(&executable), tool.name) {
            (Some(curated), _) => curated.to_string(),
            (None, Some(advertised)) if !advertised.trim().is_empty() => {
                advertised.trim().to_string()
            }
            _ => prettify_name(&executable),
        };
        let ide = IdeConfig {
            id: known.unique_id(&slugify(&name)),
            name,
            executable,
            args_template: DEFAULT_ARGS_TEMPLATE.to_string(),
            icon: None,
            category: IdeCategory::Gui,
            priority: UNRECOGNIZED_PRIORITY,
            auto_detected: true,
        };
        log::info!("[Detector] Found {} at {}", ide.name, ide.executable);
        known.insert(&ide);
        detected.push(DetectedIde {
            ide,
            icon_source: tool.icon,
        });
    }

    log::info!("[Detector] Detection finished: {} new tools", detected.len());
    detected
}

/// First existing install location, then PATH
fn locate_family(platform: &dyn Platform, family: &IdeFamily) -> Option<PathBuf> {
    platform
        .install_locations(family.id)
        .iter()
        .flat_map(|pattern| expand_location(pattern))
        .find(|path| path_resolver::is_executable(path))
        .or_else(|| {
            family
                .commands
                .iter()
                .find_map(|command| platform.find_command(command))
        })
}

/// Expand `~` / environment variables, then glob wildcards.
/// Glob matches are returned newest-looking first (descending name order).
pub fn expand_location(pattern: &str) -> Vec<PathBuf> {
    let expanded = match shellexpand::full(pattern) {
        Ok(expanded) => expanded.to_string(),
        Err(e) => {
            log::debug!("[Detector] Cannot expand {}: {}", pattern, e);
            return Vec::new();
        }
    };

    if !expanded.contains(['*', '?', '[']) {
        return vec![PathBuf::from(expanded)];
    }

    match glob::glob(&expanded) {
        Ok(paths) => {
            let mut matches: Vec<PathBuf> = paths.flatten().collect();
            matches.sort();
            matches.reverse();
            matches
        }
        Err(e) => {
            log::debug!("[Detector] Bad pattern {}: {}", expanded, e);
            Vec::new()
        }
    }
}

fn slugify(name: &str) -> String {
    let slug = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "ide".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::platform::{DiscoveredTool, LaunchCommand};
    use crate::utils::error::Result;
    use std::path::Path;
    use tempfile::tempdir;

    /// Platform whose install locations point into a scratch directory
    struct FakePlatform {
        root: PathBuf,
        extras: Vec<DiscoveredTool>,
    }

    impl Platform for FakePlatform {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn install_locations(&self, family_id: &str) -> Vec<String> {
            vec![self.root.join(family_id).join("bin/*").to_string_lossy().to_string()]
        }

        fn discover_extra_tools(&self) -> Vec<DiscoveredTool> {
            self.extras.clone()
        }

        fn find_command(&self, _name: &str) -> Option<PathBuf> {
            None
        }

        fn file_manager_command(&self, path: &Path) -> LaunchCommand {
            LaunchCommand::new("true").arg(path.to_string_lossy())
        }

        fn terminal_command(&self, path: &Path) -> Result<LaunchCommand> {
            Ok(LaunchCommand::new("true").current_dir(path))
        }
    }

    fn install(root: &Path, family: &str, exe: &str) -> PathBuf {
        let dir = root.join(family).join("bin");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(exe);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }
        path
    }

    #[test]
    fn test_detects_family_with_table_defaults() {
        let root = tempdir().unwrap();
        let exe = install(root.path(), "zed", "zed");
        let platform = FakePlatform {
            root: root.path().to_path_buf(),
            extras: Vec::new(),
        };

        let detected = detect(&platform, &[]);
        assert_eq!(detected.len(), 1);
        let ide = &detected[0].ide;
        assert_eq!(ide.id, "zed");
        assert_eq!(ide.name, "Zed");
        assert_eq!(ide.executable, exe.to_string_lossy());
        assert_eq!(ide.priority, 115);
        assert!(ide.auto_detected);
    }

    #[test]
    fn test_cataloged_ids_and_executables_are_skipped() {
        let root = tempdir().unwrap();
        install(root.path(), "zed", "zed");
        let nvim = install(root.path(), "neovim", "nvim");
        let platform = FakePlatform {
            root: root.path().to_path_buf(),
            extras: Vec::new(),
        };

        let first = detect(&platform, &[]);
        assert_eq!(first.len(), 2);

        // Same executable registered under a user-chosen id
        let manual = IdeConfig {
            id: "my-neovim".into(),
            name: "My Neovim".into(),
            executable: nvim.to_string_lossy().to_string(),
            args_template: "{projectPath}".into(),
            icon: None,
            category: IdeCategory::Cli,
            priority: 1,
            auto_detected: false,
        };
        let mut catalog: Vec<IdeConfig> = first
            .into_iter()
            .map(|d| d.ide)
            .filter(|i| i.id != "neovim")
            .collect();
        catalog.push(manual);

        assert!(detect(&platform, &catalog).is_empty());
    }

    #[test]
    fn test_extra_tools_get_fallback_priority_and_unique_ids() {
        let root = tempdir().unwrap();
        let lapce = install(root.path(), "extras", "lapce");
        let platform = FakePlatform {
            root: root.path().to_path_buf(),
            extras: vec![
                DiscoveredTool {
                    name: Some("Lapce".into()),
                    executable: lapce.clone(),
                    icon: None,
                },
                // Same binary advertised twice
                DiscoveredTool {
                    name: Some("Lapce (new window)".into()),
                    executable: lapce,
                    icon: None,
                },
            ],
        };
        let existing = IdeConfig {
            id: "lapce".into(),
            name: "Other".into(),
            executable: "/elsewhere/other".into(),
            args_template: "{projectPath}".into(),
            icon: None,
            category: IdeCategory::Gui,
            priority: 300,
            auto_detected: false,
        };

        let detected = detect(&platform, &[existing]);
        assert_eq!(detected.len(), 1);
        assert_eq!(detected[0].ide.id, "lapce-2");
        assert_eq!(detected[0].ide.name, "Lapce");
        assert_eq!(detected[0].ide.priority, UNRECOGNIZED_PRIORITY);
        assert_eq!(detected[0].ide.category, IdeCategory::Gui);
    }

    #[test]
    fn test_expand_location_globs_newest_first() {
        let root = tempdir().unwrap();
        for version in ["idea-2023.1", "idea-2024.2"] {
            std::fs::create_dir_all(root.path().join(version)).unwrap();
        }
        let pattern = format!("{}/idea-*", root.path().display());
        let matches = expand_location(&pattern);
        assert_eq!(matches.len(), 2);
        assert!(matches[0].ends_with("idea-2024.2"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Lapce (Nightly)"), "lapce-nightly");
        assert_eq!(slugify("!!!"), "ide");
    }
}
