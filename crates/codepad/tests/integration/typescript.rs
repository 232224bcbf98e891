use codepad::strip_types;

use super::{fixture_source, test_runner};

#[tokio::test]
async fn test_annotation_is_stripped() {
    let runner = test_runner();
    let result = runner
        .run(
            r#"const greeting: string = "hi"; console.log(greeting);"#,
            "typescript",
        )
        .await;

    assert_eq!(result.error(), None);
    assert!(result.output().contains("hi"));
}

#[tokio::test]
async fn test_interfaces_and_aliases() {
    let runner = test_runner();
    let result = runner.run(&fixture_source("greeter.ts"), "typescript").await;

    assert_eq!(result.error(), None);
    assert_eq!(result.output(), "Hello, Ada\nHello, Linus");
}

#[tokio::test]
async fn test_generics_and_assertions() {
    let runner = test_runner();
    let result = runner.run(&fixture_source("generic.ts"), "typescript").await;

    assert_eq!(result.error(), None);
    assert_eq!(result.output(), "10");
}

#[tokio::test]
async fn test_plain_javascript_runs_as_typescript() {
    let runner = test_runner();
    let source = fixture_source("add.js");

    let as_js = runner.run(&source, "javascript").await;
    let as_ts = runner.run(&source, "typescript").await;

    assert_eq!(as_js.output(), as_ts.output());
}

#[tokio::test]
async fn test_typescript_is_not_stripped_for_javascript() {
    let runner = test_runner();
    let result = runner
        .run(r#"const greeting: string = "hi";"#, "javascript")
        .await;

    assert!(!result.is_success());
}

#[test]
fn test_strip_output_is_plain_javascript() {
    let stripped = strip_types(&fixture_source("greeter.ts")).unwrap();

    assert!(!stripped.contains("interface"));
    assert!(!stripped.contains("import type"));
    assert!(!stripped.contains(": Person"));
    assert!(stripped.contains("function greet(person, greeting = \"Hello\")"));
}
