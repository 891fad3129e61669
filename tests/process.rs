use nestcss::{NestcssError, NestingError, NestingOptions, SheetError, process_css};

#[test]
fn test_process_css_flattens() {
    let css = process_css(
        "@media x { a { & {} @at-root (without: media) { b {} } } }",
        &NestingOptions::default(),
    )
    .unwrap();
    assert_eq!(css, "@media x { a {} } a b {}");
}

#[test]
fn test_process_css_with_options() {
    let options = NestingOptions::new()
        .with_bubble("phone")
        .with_preserve_empty(true);
    let css = process_css("a { @phone { color: black } }", &options).unwrap();
    insta::assert_snapshot!(css, @"a {} @phone { a { color: black; } }");
}

#[test]
fn test_parse_errors_are_wrapped() {
    let err = process_css("a { color: red", &NestingOptions::default()).unwrap_err();
    assert!(matches!(err, NestcssError::Parse(SheetError::Unclosed { .. })));
    assert_eq!(err.to_string(), "CSS parse error: 1:1: Unclosed block");
}

#[test]
fn test_nesting_errors_are_wrapped() {
    let err = process_css("a{\n  color: black\n  @mixin b { }\n}", &NestingOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        NestcssError::Nesting(NestingError::MissedSemicolon { .. })
    ));
    assert_eq!(err.to_string(), "2:3: Missed semicolon");
}

#[test]
fn test_file_logger_records_rewrites() {
    let path = std::env::temp_dir().join(format!("nestcss-log-{}.txt", std::process::id()));
    let path = path.to_string_lossy().to_string();
    nestcss::log_init::init_logger(&path, log::Level::Debug).unwrap();

    process_css("a { b {} }", &NestingOptions::default()).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert!(written.contains("[DEBUG]"), "{written}");
    assert!(written.contains("unwrapped \"a\""), "{written}");
}
