use common::{Workspace, run_coder, stdout_of};
use test_case::test_case;

mod common;

#[test]
fn highlight_to_stdout() {
    let workspace = Workspace::new().unwrap();
    let output = run_coder(&["highlight", "coder_test.c"], workspace.folder.path());
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("\\begin{Verbatim}[commandchars=\\\\\\{\\}]\n"));
    assert!(stdout.contains("  \\PY{n}{printf}\\PY{p}{(}"));
    assert!(stdout.contains("\\PY{l+s+s2}{\\PYZdq{}factorial(10)=\\PYZpc{}d\\PYZdq{}}"));
    assert!(stdout.ends_with("\\end{Verbatim}\n"));
}

#[test]
fn highlight_full_document_to_file() {
    let workspace = Workspace::new().unwrap();
    let output = run_coder(
        &[
            "highlight",
            "coder_test.py",
            "--full",
            "--style",
            "autumn",
            "-O",
            "linenos, title=Factorial",
            "-o",
            "out.tex",
        ],
        workspace.folder.path(),
    );
    assert!(output.status.success());
    assert!(stdout_of(&output).is_empty());
    let document = std::fs::read_to_string(workspace.path("out.tex")).unwrap();
    assert!(document.contains("\\section*{Factorial}"));
    assert!(document.contains("numbers=left,firstnumber=1,stepnumber=1"));
    assert!(document.contains("\\expandafter\\def\\csname PY@tok@nc\\endcsname{\\let\\PY@ul=\\underline"));
}

#[test]
fn command_line_beats_configured_defaults() {
    let workspace = Workspace::new().unwrap();
    workspace.write(
        "Coder.toml",
        "[defaults]\nlang = \"text\"\ncommandprefix = \"Cfg\"\nlinenos = true\n",
    );
    let output = run_coder(
        &["highlight", "coder_test.c", "--lang", "c", "-O", "commandprefix=Cli"],
        workspace.folder.path(),
    );
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("\\Cli{k+kt}{int}"));
    assert!(!stdout.contains("\\Cfg{"));
    assert!(stdout.contains("numbers=left"));
}

#[test]
fn highlight_unknown_language_fails() {
    let workspace = Workspace::new().unwrap();
    let output = run_coder(
        &["highlight", "coder_test.c", "--lang", "cobol"],
        workspace.folder.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn snippets_file() {
    let workspace = Workspace::new().unwrap();
    workspace.write(
        "doc.snippets",
        "<@@NLN@inline@1\nsty=bw\nint x;\n>@@NLN@inline@1\n\
         <@@NLN@input@2\nlinenos\ncoder_test.c\n>@@NLN@input@2\n\
         <@@NLN@display@3\nlang=python\nprint(1)\n>@@NLN@display@3\n",
    );
    let output = run_coder(&["snippets", "doc.snippets"], workspace.folder.path());
    assert!(output.status.success());

    let converted = std::fs::read_to_string(workspace.path("doc.pyg.tex")).unwrap();
    assert!(converted.starts_with("% -*- mode: latex -*-\n\\makeatletter\n"));
    assert_eq!(converted.matches("\\def\\PYstylebw{").count(), 1);
    assert_eq!(converted.matches("\\def\\PYstyledefault{").count(), 1);
    assert!(converted.contains("\\tl_set:cn {NLN/colored/2}"));
    assert!(converted.contains("\\NLN@do@linenos:n{1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,16,17}%"));
    assert!(converted.contains("\\PY{n+nb}{print}"));
    assert!(converted.ends_with("\\makeatother\n"));
}

#[test]
fn snippets_with_errors_fail() {
    let workspace = Workspace::new().unwrap();
    workspace.write(
        "bad.snippets",
        "<@@NLN@inline@1\n\nx\n>@@NLN@inline@1\nnot a snippet\n",
    );
    let output = run_coder(
        &["snippets", "bad.snippets", "-o", "bad.tex"],
        workspace.folder.path(),
    );
    assert_eq!(output.status.code(), Some(1));
    let converted = std::fs::read_to_string(workspace.path("bad.tex")).unwrap();
    assert!(converted.contains("{NLN/colored/1}"));
    assert!(converted.ends_with("\\makeatother\n"));
}

#[test]
fn latin1_snippets_report_their_errors() {
    let workspace = Workspace::new().unwrap();
    std::fs::write(
        workspace.path("latin.snippets"),
        b"<@@NLN@inline@1\n\nx = 'caf\xE9';\n>@@NLN@inline@1\ncaf\xE9\n",
    )
    .unwrap();
    let output = run_coder(&["snippets", "latin.snippets"], workspace.folder.path());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid snippet file contents"));
    assert!(!stderr.contains("UTF-8"));
    assert!(workspace.path("latin.pyg.tex").is_file());
}

#[test]
fn request_and_cache() {
    let workspace = Workspace::new().unwrap();
    workspace.write(
        "req.json",
        r#"{"code": "int x;", "cache": "true", "options": {"sty": "bw", "lang": "c"}}"#,
    );

    let first = run_coder(&["request", "req.json"], workspace.folder.path());
    assert!(first.status.success());
    let stdout = stdout_of(&first);
    assert!(stdout.starts_with("<<<<<?TEX:%\n\\CDR_remove:n {colored:}%\n\\input { \\tl_to_str:n {"));
    assert!(stdout.contains("<<<<<!LUA:CDR:cache_record('bw.pyg.sty','"));

    let directory = workspace.path("req.pygd");
    assert!(directory.join("bw.pyg.sty").is_file());
    let tex_files: Vec<_> = std::fs::read_dir(&directory)
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".pyg.tex"))
        .collect();
    assert_eq!(tex_files.len(), 1);
    let code = std::fs::read_to_string(tex_files[0].path()).unwrap();
    assert!(code.contains("\\begin{CDR/block/engine/bw}"));

    let second = run_coder(&["request", "req.json"], workspace.folder.path());
    assert!(second.status.success());
    assert_eq!(stdout_of(&second), stdout);
}

#[test]
fn shared_directory_skips_cache_record() {
    let workspace = Workspace::new().unwrap();
    workspace.write(
        "inline.json",
        r#"{"code": "x", "inline": true, "directory": "SHARED", "options": {}}"#,
    );
    let output = run_coder(&["request", "inline.json"], workspace.folder.path());
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("SHARED.pygd"));
    assert!(!stdout.contains("<<<<<!LUA:"));
    assert!(workspace.path("SHARED.pygd").join("default.pyg.sty").is_file());
}

#[test]
fn annotations_listing() {
    let workspace = Workspace::new().unwrap();
    let output = run_coder(&["annotations", "coder_test.py"], workspace.folder.path());
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("coder_test.py:2: Embedded comment\n\\begin{coder}{Embedded comment}\n"));
    assert!(stdout.contains("coder_test.py:14: -\nExecute only if run as a script\n"));
}

#[test]
fn annotations_strip() {
    let workspace = Workspace::new().unwrap();
    let output = run_coder(
        &["annotations", "coder_iterative.c", "--strip"],
        workspace.folder.path(),
    );
    assert!(output.status.success());
    assert!(stdout_of(&output).starts_with("#include <stdio.h>\nint main("));
}

#[test]
fn style_listing_includes_configured_styles() {
    let workspace = Workspace::new().unwrap();
    workspace.write(
        "Coder.toml",
        "[styles.paper]\ninherit = \"bw\"\n\n[styles.paper.tokens]\n\"Comment\" = \"#888888\"\n",
    );
    let output = run_coder(&["style", "--list"], workspace.folder.path());
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "autumn\nbw\ndefault\npaper\n");

    let defs = run_coder(&["style", "paper", "--prefix", "Py"], workspace.folder.path());
    assert!(stdout_of(&defs).contains(
        "\\expandafter\\def\\csname Py@tok@c\\endcsname{\\let\\Py@it=\\textit\\def\\Py@tc##1{\\textcolor[rgb]{0.53,0.53,0.53}{##1}}}"
    ));
}

#[test]
fn explicit_config_must_exist() {
    let workspace = Workspace::new().unwrap();
    let output = run_coder(
        &["--config", "missing.toml", "style", "--list"],
        workspace.folder.path(),
    );
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn wrap_in_place() {
    let workspace = Workspace::new().unwrap();
    let path = workspace.write("minted.tex", "{\\PYGZbs{}emph}{\\PYGZbs{}foo}\n");
    let output = run_coder(
        &["wrap", "minted.tex", "CDRWrap", "emph", "foo"],
        workspace.folder.path(),
    );
    assert!(output.status.success());
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "{\\CDRWrap{\\PYGZbs{}emph}}{\\CDRWrap{\\PYGZbs{}foo}}\n"
    );
}

#[test]
fn wrap_needs_commands() {
    let workspace = Workspace::new().unwrap();
    workspace.write("minted.tex", "x\n");
    let output = run_coder(&["wrap", "minted.tex", "W"], workspace.folder.path());
    assert!(!output.status.success());
}

#[test_case(&["factorial"], Some(0), "factorial(10)=3628800\n" ; "default input")]
#[test_case(&["factorial", "5", "--iterative"], Some(0), "factorial(5)=120\n" ; "iterative")]
#[test_case(&["factorial", "12"], Some(0), "factorial(12)=479001600\n" ; "largest")]
#[test_case(&["factorial", "13"], Some(1), "" ; "overflow")]
#[test_case(&["factorial", "100000000"], Some(1), "" ; "far too large")]
#[test_case(&["factorial", "-1"], Some(1), "" ; "negative")]
fn factorial_subcommand(args: &[&str], code: Option<i32>, expected: &str) {
    let workspace = Workspace::new().unwrap();
    let output = run_coder(args, workspace.folder.path());
    assert_eq!(output.status.code(), code);
    assert_eq!(stdout_of(&output), expected);
}
