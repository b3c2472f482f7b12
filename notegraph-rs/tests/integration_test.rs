//! Integration tests for the notegraph CLI over temporary vaults.

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// A content folder plus an output root, both removed on drop.
struct Workspace {
    content: TempDir,
    out: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let workspace = Self {
            content: TempDir::new().unwrap(),
            out: TempDir::new().unwrap(),
        };
        workspace.write("grafo.md", "---\ntitle: Grafo\naliases: [graph]\ntags: [meta]\nupdatedAt: 2024-03-01\n---\n# Grafo\n\nEl grafo une las notas. ^resumen\n\n![[diagram.png]]");
        workspace.write("indice.md", "---\ntitle: Índice\ntags: [meta, inicio]\nupdatedAt: 2024-02-01\n---\nVer [[graph]] y [[graph#^resumen|resumen]]. También [[Fantasma]].");
        workspace.write("diario/hoy.md", "---\ntitle: Hoy\nupdatedAt: 2024-01-15\n---\nNada sobre redes.\n\n![[faltante.png]]");
        workspace.write("assets/diagram.png", "png");
        workspace
    }

    fn write(&self, path: &str, content: &str) {
        let full = self.content.path().join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }

    fn content(&self) -> &Path {
        self.content.path()
    }

    fn out(&self) -> &Path {
        self.out.path()
    }
}

/// Run notegraph CLI command and return stdout, stderr and the exit code.
fn run_notegraph(cwd: &Path, args: &[&str]) -> (String, String, i32) {
    let binary = env!("CARGO_BIN_EXE_notegraph");

    let output = Command::new(binary)
        .current_dir(cwd)
        .env_remove("VAULT_NAME")
        .env_remove("RUST_LOG")
        .arg("--no-color")
        .args(args)
        .output()
        .expect("Failed to execute notegraph");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn build(workspace: &Workspace) -> serde_json::Value {
    let content = workspace.content().to_string_lossy().to_string();
    let out = workspace.out().to_string_lossy().to_string();
    let (stdout, stderr, code) = run_notegraph(
        workspace.out(),
        &["build", "--content", &content, "--out-root", &out],
    );
    assert_eq!(code, 0, "build failed: {}", stderr);
    serde_json::from_str(&stdout).unwrap()
}

mod build_command {
    use super::*;

    #[test]
    fn build_writes_artifacts() {
        let workspace = Workspace::new();
        let response = build(&workspace);

        assert_eq!(response["notes"], 3);
        assert_eq!(response["assets"], 1);

        let data = workspace.out().join("public/data");
        for file in ["vault.json", "notes.index.json", "links.json", "graph.json", "tags.json"] {
            assert!(data.join(file).is_file(), "missing {}", file);
        }
        assert!(workspace.out().join(".generated/notes-content.json").is_file());
        assert!(workspace.out().join("public/vault/assets/diagram.png").is_file());
    }

    #[test]
    fn build_reports_warnings() {
        let workspace = Workspace::new();
        let response = build(&workspace);

        let warnings: Vec<String> = response["warnings"]
            .as_array()
            .unwrap()
            .iter()
            .map(|w| w.as_str().unwrap().to_string())
            .collect();
        assert_eq!(warnings.len(), 2);
        assert!(warnings.iter().any(|w| w.contains("[[Fantasma]]")));
        assert!(warnings.iter().any(|w| w.contains("faltante.png")));
    }

    #[test]
    fn build_assigns_ids_in_slug_order() {
        let workspace = Workspace::new();
        build(&workspace);

        let raw = fs::read_to_string(workspace.out().join("public/data/notes.index.json")).unwrap();
        let index: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let items = index["items"].as_array().unwrap();
        let pairs: Vec<(&str, &str)> = items
            .iter()
            .map(|i| (i["id"].as_str().unwrap(), i["slug"].as_str().unwrap()))
            .collect();
        assert_eq!(pairs, vec![("n_01", "grafo"), ("n_02", "hoy"), ("n_03", "indice")]);
    }

    #[test]
    fn build_skips_assets_when_asked() {
        let workspace = Workspace::new();
        let content = workspace.content().to_string_lossy().to_string();
        let out = workspace.out().to_string_lossy().to_string();
        let (stdout, _, code) = run_notegraph(
            workspace.out(),
            &["build", "--content", &content, "--out-root", &out, "--no-assets"],
        );
        assert_eq!(code, 0);
        assert!(stdout.contains("\"assets\": 0"));
        assert!(!workspace.out().join("public/vault/assets").exists());
    }

    #[test]
    fn build_missing_content_root() {
        let out = TempDir::new().unwrap();
        let missing = out.path().join("nope").to_string_lossy().to_string();
        let (_, stderr, code) = run_notegraph(out.path(), &["build", "--content", &missing]);
        assert_eq!(code, 2);
        assert!(stderr.contains("Content root not found"));
    }

    #[test]
    fn build_yaml_output() {
        let workspace = Workspace::new();
        let content = workspace.content().to_string_lossy().to_string();
        let out = workspace.out().to_string_lossy().to_string();
        let (stdout, _, code) = run_notegraph(
            workspace.out(),
            &["--yaml", "build", "--content", &content, "--out-root", &out],
        );
        assert_eq!(code, 0);
        assert!(stdout.contains("notes: 3"));
    }
}

mod search_command {
    use super::*;

    fn search(workspace: &Workspace, query: &str) -> serde_json::Value {
        let out = workspace.out().to_string_lossy().to_string();
        let (stdout, stderr, code) =
            run_notegraph(workspace.out(), &["search", query, "--out-root", &out]);
        assert_eq!(code, 0, "search failed: {}", stderr);
        serde_json::from_str(&stdout).unwrap()
    }

    #[test]
    fn search_tag_and_phrase() {
        let workspace = Workspace::new();
        build(&workspace);

        let response = search(&workspace, "tag:#meta \"grafo\"");
        assert_eq!(response["total"], 1);
        assert_eq!(response["results"][0]["note"]["slug"], "grafo");
        assert!(
            response["results"][0]["snippet"]
                .as_str()
                .unwrap()
                .contains("<mark>")
        );
    }

    #[test]
    fn search_exclusion() {
        let workspace = Workspace::new();
        build(&workspace);

        let response = search(&workspace, "grafo -tag:inicio");
        let slugs: Vec<&str> = response["results"]
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["note"]["slug"].as_str().unwrap())
            .collect();
        assert_eq!(slugs, vec!["grafo"]);
    }

    #[test]
    fn search_negation_only_is_empty() {
        let workspace = Workspace::new();
        build(&workspace);

        let response = search(&workspace, "-redes");
        assert_eq!(response["total"], 0);
    }

    #[test]
    fn search_before_build() {
        let out = TempDir::new().unwrap();
        let root = out.path().to_string_lossy().to_string();
        let (_, stderr, code) = run_notegraph(out.path(), &["search", "grafo", "--out-root", &root]);
        assert_eq!(code, 5);
        assert!(stderr.contains("notegraph build"));
    }
}

mod tags_command {
    use super::*;

    #[test]
    fn tags_counts() {
        let workspace = Workspace::new();
        build(&workspace);

        let out = workspace.out().to_string_lossy().to_string();
        let (stdout, _, code) = run_notegraph(workspace.out(), &["tags", "--out-root", &out]);
        assert_eq!(code, 0);
        assert!(stdout.contains("\"meta\""));
        assert!(stdout.contains("\"inicio\""));
    }

    #[test]
    fn tags_filter_by_tag() {
        let workspace = Workspace::new();
        build(&workspace);

        let out = workspace.out().to_string_lossy().to_string();
        let (stdout, _, code) = run_notegraph(
            workspace.out(),
            &["tags", "--tag", "#META", "--out-root", &out],
        );
        assert_eq!(code, 0);
        assert!(stdout.contains("grafo"));
        assert!(stdout.contains("indice"));
        assert!(!stdout.contains("\"hoy\""));
    }
}

mod resolve_command {
    use super::*;

    #[test]
    fn resolve_alias() {
        let workspace = Workspace::new();
        let content = workspace.content().to_string_lossy().to_string();
        let (stdout, _, code) =
            run_notegraph(workspace.out(), &["resolve", "Graph", "--content", &content]);
        assert_eq!(code, 0);

        let response: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(response["slug"], "grafo");
        assert_eq!(response["id"], "n_01");
        assert_eq!(response["key"], "graph");
    }

    #[test]
    fn resolve_folds_diacritics() {
        let workspace = Workspace::new();
        let content = workspace.content().to_string_lossy().to_string();
        let (stdout, _, code) =
            run_notegraph(workspace.out(), &["resolve", "indice", "--content", &content]);
        assert_eq!(code, 0);
        assert!(stdout.contains("\"title\": \"Índice\""));
    }

    #[test]
    fn resolve_unknown() {
        let workspace = Workspace::new();
        let content = workspace.content().to_string_lossy().to_string();
        let (_, stderr, code) =
            run_notegraph(workspace.out(), &["resolve", "Fantasma", "--content", &content]);
        assert_eq!(code, 4);
        assert!(stderr.contains("Note not found"));
    }
}

mod broken_links_command {
    use super::*;

    #[test]
    fn broken_links_lists_unresolved() {
        let workspace = Workspace::new();
        let content = workspace.content().to_string_lossy().to_string();
        let (stdout, _, code) =
            run_notegraph(workspace.out(), &["broken-links", "--content", &content]);
        assert_eq!(code, 0);

        let response: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        assert_eq!(response["count"], 1);
        assert_eq!(response["links"][0]["sourceSlug"], "indice");
        assert_eq!(response["links"][0]["targetLabel"], "Fantasma");
        assert_eq!(response["missingAssets"].as_array().unwrap().len(), 1);
    }
}
