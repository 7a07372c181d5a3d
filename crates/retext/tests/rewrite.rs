use std::{fs, path::Path};

use pretty_assertions::assert_eq;
use retext::{FileRewriter, Recipe, RewriteOptions, StepOutcome};
use tempfile::TempDir;

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

/// Copies `fixtures/<name>/src` into a fresh root directory.
fn project(name: &str) -> TempDir {
    let root = tempfile::tempdir().unwrap();
    let src = Path::new(FIXTURES).join(name).join("src");
    fs::create_dir(root.path().join("src")).unwrap();
    for entry in fs::read_dir(src).unwrap() {
        let entry = entry.unwrap();
        fs::copy(entry.path(), root.path().join("src").join(entry.file_name())).unwrap();
    }
    root
}

fn expected(name: &str) -> String {
    fs::read_to_string(Path::new(FIXTURES).join(name).join("expected.jsx")).unwrap()
}

fn run(recipe: &Recipe, root: &Path) -> retext::RewriteReport {
    let steps = recipe.compile().unwrap();
    FileRewriter::default()
        .rewrite(&recipe.target_path(root), &steps)
        .unwrap()
}

#[test]
fn cacao_recipe_patches_import_and_overlay() {
    let root = project("cacao");
    let recipe = Recipe::builtin("cacao-processing").unwrap();

    let report = run(&recipe, root.path());

    let patched = fs::read_to_string(recipe.target_path(root.path())).unwrap();
    assert_eq!(patched, expected("cacao"));
    assert_eq!(
        report.summary(),
        "congrats-popup-import: applied, win-overlay: applied"
    );
    assert!(report.written);
}

#[test]
fn import_is_inserted_on_the_next_line() {
    let root = project("cacao");
    let recipe = Recipe::builtin("cacao-processing").unwrap();
    run(&recipe, root.path());

    let patched = fs::read_to_string(recipe.target_path(root.path())).unwrap();
    let lines: Vec<_> = patched.lines().collect();
    let css = lines
        .iter()
        .position(|line| *line == "import './CacaoProcessingGame.css';")
        .unwrap();
    assert_eq!(
        lines[css + 1],
        "import CongratsPopup from './components/CongratsPopup';"
    );
    assert_eq!(patched.matches("import CongratsPopup").count(), 1);
}

#[test]
fn second_run_is_a_no_op() {
    let root = project("cacao");
    let recipe = Recipe::builtin("cacao-processing").unwrap();
    run(&recipe, root.path());

    let report = run(&recipe, root.path());

    let patched = fs::read_to_string(recipe.target_path(root.path())).unwrap();
    assert_eq!(patched, expected("cacao"));
    let outcomes: Vec<_> = report.steps.iter().map(|step| step.outcome).collect();
    assert_eq!(
        outcomes,
        vec![StepOutcome::AlreadyApplied, StepOutcome::AlreadyApplied]
    );
    assert!(!report.changed);
    assert!(!report.written);
}

#[test]
fn missing_overlay_only_inserts_import() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("src")).unwrap();
    let recipe = Recipe::builtin("cacao-processing").unwrap();
    let target = recipe.target_path(root.path());
    fs::write(
        &target,
        "import './CacaoProcessingGame.css';\n\nexport default () => null;\n",
    )
    .unwrap();

    let report = run(&recipe, root.path());

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "import './CacaoProcessingGame.css';\nimport CongratsPopup from './components/CongratsPopup';\n\nexport default () => null;\n"
    );
    let missed: Vec<_> = report.missed().map(|step| step.name.as_str()).collect();
    assert_eq!(missed, vec!["win-overlay"]);
}

#[test]
fn strict_run_leaves_unmatched_file_alone() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("src")).unwrap();
    let recipe = Recipe::builtin("cacao-processing").unwrap();
    let target = recipe.target_path(root.path());
    fs::write(&target, "import './CacaoProcessingGame.css';\n").unwrap();

    let rewriter = FileRewriter::new(RewriteOptions {
        strict: true,
        ..RewriteOptions::default()
    });
    let result = rewriter.rewrite(&target, &recipe.compile().unwrap());

    assert!(matches!(result, Err(retext::RewriteError::NoMatch { .. })));
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        "import './CacaoProcessingGame.css';\n"
    );
}

#[test]
fn empty_file_stays_empty() {
    let root = tempfile::tempdir().unwrap();
    fs::create_dir(root.path().join("src")).unwrap();
    let recipe = Recipe::builtin("cacao-processing").unwrap();
    let target = recipe.target_path(root.path());
    fs::write(&target, "").unwrap();

    let report = run(&recipe, root.path());

    assert_eq!(fs::read_to_string(&target).unwrap(), "");
    assert_eq!(report.missed().count(), 2);
    assert!(!report.written);
}

#[test]
fn block_matcher_replaces_the_same_overlay() {
    let root = project("cacao");
    let builtin = Recipe::builtin("cacao-processing").unwrap();
    let overlay = builtin.compile().unwrap()[1].replacement().to_owned();
    let recipe_path = root.path().join("structural.toml");
    fs::write(
        &recipe_path,
        format!(
            r#"
name = "cacao-structural"
target = "src/CacaoProcessingGame.jsx"

[[transformation]]
kind = "literal"
find = "import './CacaoProcessingGame.css';"
replace = """
import './CacaoProcessingGame.css';
import CongratsPopup from './components/CongratsPopup';"""

[[transformation]]
kind = "block"
start = "      {{gameStatus === 'won' && ("
replace = '''
{overlay}'''
"#
        ),
    )
    .unwrap();
    let recipe = Recipe::from_file(&recipe_path).unwrap();

    run(&recipe, root.path());

    let patched = fs::read_to_string(recipe.target_path(root.path())).unwrap();
    assert_eq!(patched, expected("cacao"));
}

#[test]
fn matching_cards_recipe_keeps_the_game_board() {
    let root = project("matching");
    let recipe = Recipe::builtin("matching-cards").unwrap();

    let report = run(&recipe, root.path());

    let patched = fs::read_to_string(recipe.target_path(root.path())).unwrap();
    assert!(patched.contains(
        "import './MatchingCardsGame.css';\nimport CongratsPopup from './components/CongratsPopup';\n"
    ));
    assert!(patched.contains("  // Completed screen - show results with CongratsPopup\n"));
    assert!(!patched.contains("<h2>Well done!</h2>"));
    assert!(patched.contains("  }\n\n  // Main game board\n  return (\n"));
    assert_eq!(report.missed().count(), 0);
}
