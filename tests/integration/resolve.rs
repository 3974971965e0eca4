//! Resolution against real repositories through the git fetcher.

use pawnpm::core::PawnpmError;
use pawnpm::fetch::GitFetcher;
use pawnpm::manifest::Package;
use pawnpm::resolver::Resolver;
use pawnpm::test_utils::{TestGit, TestProject, TestRegistry, init_test_logging};

use crate::common::acme_registry;

fn resolver(registry: &TestRegistry) -> Resolver<GitFetcher> {
    Resolver::new(GitFetcher::new(registry.url()))
}

fn load(project: &TestProject) -> Package {
    Package::load_from_dir(project.path(), true).unwrap()
}

fn closure(root: &Package) -> Vec<String> {
    root.all_dependencies.iter().map(|d| d.meta.to_string()).collect()
}

#[tokio::test]
async fn test_transitive_dependencies_are_vendored() {
    init_test_logging(None);
    let registry = acme_registry();
    let project = TestProject::new(&["acme/app"]).unwrap();

    let mut root = load(&project);
    resolver(&registry).ensure_dependencies(&mut root).await.unwrap();

    // acme/app's unpinned acme/core is its own key but reuses the pinned checkout.
    assert_eq!(closure(&root), ["acme/app", "acme/util", "acme/core@1.0.0", "acme/core"]);
    assert_eq!(root.all_dependencies[3].reference, root.all_dependencies[2].reference);
    for repo in ["app", "util", "core"] {
        assert!(project.vendor_dir().join("acme").join(repo).join(".git").is_dir());
    }

    // Pulled in at the pin declared by acme/util, not at the tip.
    let core = std::fs::read_to_string(project.vendor_dir().join("acme/core/core.inc")).unwrap();
    assert_eq!(core, "// acme/core\n");
    assert_eq!(root.all_dependencies[2].reference.tag.as_deref(), Some("1.0.0"));
}

#[tokio::test]
async fn test_ensure_is_idempotent() {
    let registry = acme_registry();
    let project = TestProject::new(&["acme/app"]).unwrap();
    let resolver = resolver(&registry);

    let mut first = load(&project);
    resolver.ensure_dependencies(&mut first).await.unwrap();

    let mut second = load(&project);
    resolver.ensure_dependencies(&mut second).await.unwrap();

    assert_eq!(first.all_dependencies, second.all_dependencies);
}

#[tokio::test]
async fn test_half_cloned_vendor_directory_is_replaced() {
    let registry = acme_registry();
    let project = TestProject::new(&["acme/core@2.0.0"]).unwrap();

    let broken = project.vendor_dir().join("acme").join("core");
    std::fs::create_dir_all(&broken).unwrap();
    std::fs::write(broken.join("leftover"), "partial").unwrap();

    let mut root = load(&project);
    resolver(&registry).ensure_dependencies(&mut root).await.unwrap();

    assert!(broken.join(".git").is_dir());
    assert!(!broken.join("leftover").exists());
    let core = std::fs::read_to_string(broken.join("core.inc")).unwrap();
    assert_eq!(core, "// acme/core 2\n");
}

#[tokio::test]
async fn test_conflicting_pins_fail() {
    let registry = acme_registry();
    let project = TestProject::new(&["acme/util", "acme/core@2.0.0"]).unwrap();

    let mut root = load(&project);
    let err = resolver(&registry).ensure_dependencies(&mut root).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PawnpmError>(),
        Some(PawnpmError::VersionConflict { repository, .. }) if repository == "acme/core"
    ));
    assert!(root.all_dependencies.is_empty());
}

#[tokio::test]
async fn test_pinned_commit_is_checked_out() {
    let registry = TestRegistry::new().unwrap();
    let git = registry.create_package("acme", "lib", None).unwrap();
    let first = git.rev_parse_head().unwrap();
    git.write_file("lib.inc", "// later\n").unwrap();
    git.commit_all("Later").unwrap();

    let reference = format!("acme/lib@{}", &first[..10]);
    let project = TestProject::new(&[reference.as_str()]).unwrap();

    let mut root = load(&project);
    resolver(&registry).ensure_dependencies(&mut root).await.unwrap();

    assert_eq!(root.all_dependencies[0].reference.commit, first);
    assert_eq!(root.all_dependencies[0].reference.tag, None);
}

#[tokio::test]
async fn test_missing_dependency_keeps_previous_closure() {
    let registry = acme_registry();
    let project = TestProject::new(&["acme/core"]).unwrap();
    let resolver = resolver(&registry);

    let mut root = load(&project);
    resolver.ensure_dependencies(&mut root).await.unwrap();
    let before = root.all_dependencies.clone();

    root.dependencies.push("acme/missing".into());
    let err = resolver.ensure_dependencies(&mut root).await.unwrap_err();

    assert!(format!("{err:#}").contains("acme/missing"));
    assert_eq!(root.all_dependencies, before);
}

#[tokio::test]
async fn test_rerun_after_failure_keeps_vendored_checkouts() {
    let registry = acme_registry();
    let project = TestProject::new(&["acme/core@1.0.0", "acme/missing"]).unwrap();
    let resolver = resolver(&registry);

    let mut root = load(&project);
    resolver.ensure_dependencies(&mut root).await.unwrap_err();
    assert!(root.all_dependencies.is_empty());

    let core = TestGit::new(project.vendor_dir().join("acme/core"));
    let head = core.rev_parse_head().unwrap();

    // Only acme/missing can come from the registry now.
    registry.create_package("acme", "missing", None).unwrap();
    std::fs::remove_dir_all(registry.repo_path("acme", "core")).unwrap();

    let mut root = load(&project);
    resolver.ensure_dependencies(&mut root).await.unwrap();

    assert_eq!(closure(&root), ["acme/core@1.0.0", "acme/missing"]);
    assert_eq!(core.rev_parse_head().unwrap(), head);
    assert_eq!(root.all_dependencies[0].reference.commit, head);
}

#[tokio::test]
async fn test_subpath_dependency_reads_nested_manifest_from_checkout_root() {
    let registry = acme_registry();
    let git = registry.create_package("acme", "suite", None).unwrap();
    git.write_file("includes/suite.inc", "// suite\n").unwrap();
    git.commit_all("Add includes").unwrap();

    let project = TestProject::new(&["acme/suite:includes"]).unwrap();
    let mut root = load(&project);
    resolver(&registry).ensure_dependencies(&mut root).await.unwrap();

    assert_eq!(closure(&root), ["acme/suite:includes"]);
    assert!(project.vendor_dir().join("acme/suite/includes/suite.inc").is_file());
}
