#![cfg(unix)]

use linker_core::{Configuration, LinkMap, Node};
use linker_ops::{LinkMode, Linker, Pipeline, PlannedLink};
use linker_scan::collect_nodes;
use std::fs;
use std::os::unix::fs::symlink;
use std::path::Path;
use tempfile::TempDir;

fn configuration(root: &Path, rules: Vec<LinkMap>) -> Configuration {
    Configuration::builder()
        .source(root.join("pacman"))
        .targets(vec![root.join("archlinux")])
        .link_maps(rules)
        .build()
        .unwrap()
}

fn rule(root: &Path, pattern: &str) -> LinkMap {
    LinkMap::new(pattern, root.join("archlinux")).unwrap()
}

#[test]
fn test_link_package_file() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pacman")).unwrap();
    fs::create_dir_all(root.join("archlinux")).unwrap();
    fs::write(root.join("pacman/name.pkg.tar.zst"), "").unwrap();

    let config = configuration(root, vec![rule(root, r"(.*)\.pkg\.tar\.zst")]);
    let report = Pipeline::new(&config).run(LinkMode::Real);

    assert!(report.is_converged());
    assert!(report.failures.is_empty());
    assert_eq!(
        fs::read_link(root.join("archlinux/name.pkg.tar.zst")).unwrap(),
        root.join("pacman/name.pkg.tar.zst")
    );
}

#[test]
fn test_link_creates_missing_target_directory() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pacman")).unwrap();
    fs::write(root.join("pacman/name"), "").unwrap();

    let config = configuration(root, vec![rule(root, "name")]);
    let report = Pipeline::new(&config).run(LinkMode::Real);

    assert_eq!(report.target_links, 0);
    assert!(report.is_converged());
    assert!(
        fs::symlink_metadata(root.join("archlinux/name"))
            .unwrap()
            .file_type()
            .is_symlink()
    );
}

#[test]
fn test_parent_directory_is_linked_as_a_unit() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pacman/folder/subfolder")).unwrap();
    fs::create_dir_all(root.join("archlinux")).unwrap();

    let config = configuration(root, vec![rule(root, "folder"), rule(root, "subfolder")]);
    let report = Pipeline::new(&config).run(LinkMode::Real);

    assert!(report.is_converged());
    assert_eq!(
        report.created,
        vec![PlannedLink::new(
            root.join("archlinux/folder"),
            root.join("pacman/folder")
        )]
    );
    assert_eq!(
        fs::read_link(root.join("archlinux/folder")).unwrap(),
        root.join("pacman/folder")
    );
    assert!(fs::symlink_metadata(root.join("archlinux/subfolder")).is_err());
}

#[test]
fn test_nested_identical_name_is_absorbed() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pacman/name/name")).unwrap();
    fs::create_dir_all(root.join("archlinux")).unwrap();

    let config = configuration(root, vec![rule(root, "name")]);
    let report = Pipeline::new(&config).run(LinkMode::Real);

    assert!(report.is_converged());
    assert_eq!(report.created.len(), 1);
    assert_eq!(
        collect_nodes(root.join("archlinux")),
        vec![Node::link(root.join("archlinux/name"), root.join("pacman/name"))]
    );
}

#[test]
fn test_existing_relative_link_is_respected() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pacman/name")).unwrap();
    fs::create_dir_all(root.join("archlinux")).unwrap();
    symlink("../pacman/name", root.join("archlinux/name")).unwrap();

    let before = collect_nodes(root);
    let config = configuration(root, vec![rule(root, "name")]);
    let report = Pipeline::new(&config).run(LinkMode::Real);

    assert_eq!(report.target_links, 1);
    assert!(report.is_converged());
    assert!(report.created.is_empty());
    assert_eq!(collect_nodes(root), before);
}

#[test]
fn test_second_run_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pacman/group")).unwrap();
    fs::write(root.join("pacman/group/a.pkg"), "").unwrap();
    fs::write(root.join("pacman/group/b.pkg"), "").unwrap();
    fs::write(root.join("pacman/c.pkg"), "").unwrap();

    let config = configuration(root, vec![rule(root, r".*\.pkg")]);

    let first = Pipeline::new(&config).run(LinkMode::Real);
    assert_eq!(first.created.len(), 3);
    assert!(first.is_converged());

    let snapshot = collect_nodes(root);
    let second = Pipeline::new(&config).run(LinkMode::Real);

    assert_eq!(second.target_links, 3);
    assert!(second.created.is_empty());
    assert!(second.failures.is_empty());
    assert!(second.is_converged());
    assert_eq!(collect_nodes(root), snapshot);
}

#[test]
fn test_occupied_link_path_keeps_source() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pacman")).unwrap();
    fs::create_dir_all(root.join("archlinux")).unwrap();
    fs::write(root.join("pacman/name"), "").unwrap();
    fs::write(root.join("pacman/other"), "").unwrap();
    fs::write(root.join("archlinux/name"), "occupied").unwrap();

    let config = configuration(root, vec![rule(root, "name"), rule(root, "other")]);
    let report = Pipeline::new(&config).run(LinkMode::Real);

    assert_eq!(report.residual, vec![Node::leaf(root.join("pacman/name"))]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].link.path, root.join("archlinux/name"));
    assert_eq!(report.created.len(), 1);
    assert_eq!(
        fs::read_to_string(root.join("archlinux/name")).unwrap(),
        "occupied"
    );
}

#[test]
fn test_dry_run_does_not_touch_filesystem() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pacman/folder")).unwrap();
    fs::write(root.join("pacman/folder/a"), "").unwrap();
    fs::write(root.join("pacman/keep"), "").unwrap();
    fs::write(root.join("pacman/name"), "").unwrap();

    let config = configuration(root, vec![rule(root, "folder"), rule(root, "name")]);
    let before = collect_nodes(root);

    let dry = Pipeline::new(&config).run(LinkMode::DryRun);
    assert_eq!(collect_nodes(root), before);
    assert!(!root.join("archlinux").exists());

    let real = Pipeline::new(&config).run(LinkMode::Real);
    assert_eq!(dry.residual, real.residual);
    assert_eq!(dry.created, real.created);
    assert_eq!(dry.residual, vec![Node::leaf(root.join("pacman/keep"))]);
}

#[test]
fn test_excluded_sources_are_not_linked() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pacman")).unwrap();
    fs::write(root.join("pacman/name.pkg"), "").unwrap();
    fs::write(root.join("pacman/SKIP.pkg"), "").unwrap();

    let config = Configuration::builder()
        .source(root.join("pacman"))
        .targets(vec![root.join("archlinux")])
        .excludes(vec!["skip.pkg".to_string()])
        .link_maps(vec![rule(root, r".*\.pkg")])
        .build()
        .unwrap();
    let report = Pipeline::new(&config).run(LinkMode::Real);

    assert!(report.is_converged());
    assert_eq!(report.created.len(), 1);
    assert!(fs::symlink_metadata(root.join("archlinux/SKIP.pkg")).is_err());
}

#[test]
fn test_missing_source_links_nothing() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    let config = configuration(root, vec![rule(root, ".*")]);
    let report = Pipeline::new(&config).run(LinkMode::Real);

    assert!(report.is_converged());
    assert!(report.created.is_empty());
    assert!(!root.join("archlinux").exists());
}

#[test]
fn test_prefix_rule_points_at_prefix() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("pacman")).unwrap();
    fs::write(root.join("pacman/name.pkg"), "").unwrap();

    let rules = vec![
        LinkMap::new(r".*\.pkg", root.join("archlinux"))
            .unwrap()
            .with_prefix("/srv/mirror"),
    ];
    let nodes = collect_nodes(root.join("pacman"));
    let outcome = Linker::new(&rules, LinkMode::Real).link(&nodes);

    assert!(outcome.residual.is_empty());
    assert_eq!(
        fs::read_link(root.join("archlinux/name.pkg")).unwrap(),
        Path::new("/srv/mirror/name.pkg")
    );
}

#[test]
fn test_symlinked_source_links_through_configured_path() {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    fs::create_dir_all(root.join("data/pacman")).unwrap();
    fs::write(root.join("data/pacman/name.pkg"), "").unwrap();
    symlink(root.join("data/pacman"), root.join("pacman")).unwrap();

    let config = configuration(root, vec![rule(root, r".*\.pkg")]);
    let report = Pipeline::new(&config).run(LinkMode::Real);

    assert!(report.is_converged());
    assert_eq!(
        fs::read_link(root.join("archlinux/name.pkg")).unwrap(),
        root.join("pacman/name.pkg")
    );
}
