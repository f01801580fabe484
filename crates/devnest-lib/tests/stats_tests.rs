// Language statistics through the command surface

mod common;

use std::fs;

use common::TestEnv;
use devnest_lib::commands::project;
use devnest_lib::NewProjectInput;

async fn register(env: &TestEnv, name: &str) -> String {
    let dir = env.project_dir(name, &[]);
    project::add_project(
        &env.state,
        NewProjectInput {
            path: dir.to_string_lossy().to_string(),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn test_stats_are_consistent() {
    let env = TestEnv::new();
    let id = register(&env, "mixed").await;
    let root = env.work.path().join("mixed");
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("src/main.rs"), "fn main() {\n    run();\n}\n").unwrap();
    fs::write(root.join("src/lib.rs"), "pub fn run() {}").unwrap();
    fs::write(root.join("tool.py"), "print('hi')\nprint('bye')\n").unwrap();
    fs::write(root.join("blob.rs"), b"\x00\x01binary").unwrap();
    fs::create_dir_all(root.join("node_modules/dep")).unwrap();
    fs::write(root.join("node_modules/dep/index.js"), "x\ny\nz\n").unwrap();

    let stats = project::scan_project_language_stats(&env.state, &id)
        .await
        .unwrap();

    let sum: u64 = stats.languages.iter().map(|l| l.lines).sum();
    assert_eq!(stats.total_lines, sum);
    assert_eq!(stats.total_lines, 6);

    let pct: f64 = stats.languages.iter().map(|l| l.percentage).sum();
    assert!((pct - 100.0).abs() < 0.01);

    let names: Vec<&str> = stats.languages.iter().map(|l| l.language.as_str()).collect();
    assert_eq!(names, vec!["Rust", "Python"]);
    assert_eq!(stats.languages[0].files, 2);
}

#[tokio::test]
async fn test_project_without_text_has_empty_stats() {
    let env = TestEnv::new();
    let id = register(&env, "empty").await;
    fs::write(env.work.path().join("empty/image.rs"), b"\x00\x00").unwrap();

    let stats = project::scan_project_language_stats(&env.state, &id)
        .await
        .unwrap();
    assert_eq!(stats.total_lines, 0);
    assert!(stats.languages.is_empty());

    let stored = project::get_project_language_stats(&env.state, &id)
        .await
        .unwrap();
    assert_eq!(stored, Some(stats));
}

#[tokio::test]
async fn test_stats_for_unknown_project_is_not_found() {
    let env = TestEnv::new();
    let err = project::scan_project_language_stats(&env.state, "ghost")
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert!(project::get_project_language_stats(&env.state, "ghost")
        .await
        .unwrap_err()
        .is_not_found());
}
