use super::test_runner;

#[tokio::test]
async fn test_blocked_capabilities_are_undefined() {
    let runner = test_runner();
    for name in ["setTimeout", "setInterval", "fetch", "XMLHttpRequest"] {
        let result = runner
            .run(&format!("console.log(typeof {name});"), "javascript")
            .await;
        assert_eq!(result.output(), "undefined", "{name}");
    }
}

#[tokio::test]
async fn test_blocked_capabilities_are_undefined_on_global() {
    let runner = test_runner();
    let result = runner
        .run(
            "console.log(typeof globalThis.fetch, typeof globalThis.setTimeout);",
            "javascript",
        )
        .await;

    assert_eq!(result.output(), "undefined undefined");
}

#[tokio::test]
async fn test_calling_blocked_timer_throws() {
    let runner = test_runner();
    let result = runner
        .run("setTimeout(() => console.log('later'), 0);", "javascript")
        .await;

    assert!(!result.is_success());
    assert_eq!(result.output(), "");
    assert!(result.error().unwrap().contains("not a function"));
}

#[tokio::test]
async fn test_host_console_is_not_global() {
    let runner = test_runner();
    let result = runner
        .run("console.log(typeof globalThis.console);", "javascript")
        .await;

    assert_eq!(result.output(), "undefined");
}

#[tokio::test]
async fn test_no_host_modules() {
    let runner = test_runner();
    let result = runner
        .run(
            "console.log(typeof require, typeof process, typeof Deno);",
            "javascript",
        )
        .await;

    assert_eq!(result.output(), "undefined undefined undefined");
}

#[tokio::test]
async fn test_globals_do_not_leak_between_runs() {
    let runner = test_runner();
    let first = runner
        .run("globalThis.leaked = 'secret'; console.log(leaked);", "javascript")
        .await;
    let second = runner
        .run("console.log(typeof globalThis.leaked);", "javascript")
        .await;

    assert_eq!(first.output(), "secret");
    assert_eq!(second.output(), "undefined");
}

#[tokio::test]
async fn test_strict_mode_rejects_implicit_globals() {
    let runner = test_runner();
    let result = runner.run("undeclared = 1;", "javascript").await;

    assert!(!result.is_success());
    assert!(result.error().unwrap().contains("undeclared"));
}
