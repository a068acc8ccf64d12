use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_htmldown"))
}

#[test]
fn converts_stdin_to_stdout() {
    cli()
        .write_stdin("<h1>Title</h1><p>Some <b>bold</b> text</p>")
        .assert()
        .success()
        .stdout("Title\n=====\n\nSome **bold** text\n\n");
}

#[test]
fn dash_reads_stdin() {
    cli()
        .arg("-")
        .write_stdin("<ul><li>a</li><li>b</li></ul>")
        .assert()
        .success()
        .stdout("* a\n* b\n");
}

#[test]
fn reads_file_and_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("page.html");
    let output = dir.path().join("page.md");
    fs::write(&input, "<h2>Intro</h2><p>hello</p>").unwrap();

    cli()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--heading-style", "atx"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(&output).unwrap(), "## Intro\n\nhello\n\n");
}

#[test]
fn flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("htmldown.json");
    fs::write(
        &config,
        r#"{"heading_style": "atx_closed", "bullets": "-", "parsing": {"encoding": "utf-8"}}"#,
    )
    .unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .args(["--bullets", "+"])
        .write_stdin("<h1>A</h1><ul><li>x</li></ul>")
        .assert()
        .success()
        .stdout("# A #\n\n+ x\n");
}

#[test]
fn invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("broken.json");
    fs::write(&config, "{ not json").unwrap();

    cli()
        .arg("--config")
        .arg(&config)
        .write_stdin("<p>x</p>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file"));
}

#[test]
fn empty_input_fails() {
    cli()
        .write_stdin("   \n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("The input HTML is empty."));
}

#[test]
fn unknown_parser_fails() {
    cli()
        .args(["--parser", "lxml"])
        .write_stdin("<p>x</p>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid parser 'lxml'"));
}

#[test]
fn strip_and_convert_conflict() {
    cli()
        .args(["--strip", "a", "--convert", "b"])
        .write_stdin("<p>x</p>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Only one of 'strip' and 'convert'"));
}

#[test]
fn strip_list_is_comma_separated() {
    cli()
        .args(["--strip", "a,b"])
        .write_stdin(r#"<p><b>bold</b> <a href="https://x.com">link</a></p>"#)
        .assert()
        .success()
        .stdout("bold link\n\n");
}

#[test]
fn decodes_latin1_input() {
    cli()
        .args(["--encoding", "latin1"])
        .write_stdin(b"<p>caf\xe9</p>".to_vec())
        .assert()
        .success()
        .stdout("café\n\n");
}

#[test]
fn code_language_from_class() {
    cli()
        .arg("--code-language-from-class")
        .write_stdin(r#"<pre><code class="language-rust">fn main() {}</code></pre>"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("```rust\nfn main() {}\n```"));
}

#[test]
fn small_chunks_give_same_output() {
    let html = "<h1>One</h1><p>alpha</p><p>beta</p>";
    let whole = cli().write_stdin(html).output().unwrap().stdout;
    cli()
        .args(["--chunk-size", "1"])
        .write_stdin(html)
        .assert()
        .success()
        .stdout(whole);
}

#[test]
fn metadata_can_be_disabled() {
    let html = "<html><head><title>Doc</title></head><body><p>x</p></body></html>";
    cli()
        .write_stdin(html)
        .assert()
        .success()
        .stdout("<!--\ntitle: Doc\n-->\n\nx\n\n");
    cli()
        .arg("--no-metadata")
        .write_stdin(html)
        .assert()
        .success()
        .stdout("x\n\n");
}

#[test]
fn preprocessing_drops_navigation() {
    cli()
        .arg("--preprocess")
        .write_stdin("<nav><a href=\"/\">Home</a></nav><p>body</p>")
        .assert()
        .success()
        .stdout("body\n\n");
}

#[test]
fn help_lists_options() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--heading-style"));
}
