/// Skip a test unless a real browser was requested.
#[macro_export]
macro_rules! skip_without_chrome {
    () => {
        if std::env::var("AUTOLOGIN_TEST_CHROME").is_err() {
            eprintln!("SKIPPED: AUTOLOGIN_TEST_CHROME not set");
            return;
        }
    };
}
