use tldw::setup_logging;

#[test]
fn test_logging_setup() {
    // Installing the subscriber twice must not panic
    let result = std::panic::catch_unwind(|| {
        setup_logging(false);
        setup_logging(true);
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
}
