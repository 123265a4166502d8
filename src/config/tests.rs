use super::*;

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.server.port = Some(4000);
    raw.logging.level = Some("info".to_string());

    let overrides = ServeOverrides {
        server_port: Some(4321),
        log_level: Some("debug".to_string()),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.server.addr.port(), 4321);
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
}

#[test]
fn defaults_match_documented_values() {
    let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

    assert_eq!(settings.server.addr.port(), DEFAULT_PORT);
    assert_eq!(settings.feed.default_page_size.get(), 10);
    assert_eq!(settings.feed.max_page_size.get(), 100);
    assert!(settings.posts.allow_editing);
    assert!(settings.posts.allow_comments);
    assert!(settings.posts.max_posts_per_user.is_none());
    assert!(settings.cache.enabled);
    assert_eq!(settings.cache.ttl_seconds.get(), 300);
    assert_eq!(settings.cache.capacity.get(), 1000);
    assert_eq!(settings.cache.sweep_interval_seconds.get(), 60);
    assert_eq!(settings.database.acquire_timeout, Duration::from_secs(5));
    assert!(settings.database.url.is_none());
}

#[test]
fn max_page_size_above_hard_cap_is_rejected() {
    let mut raw = RawSettings::default();
    raw.feed.max_page_size = Some(500);

    let err = Settings::from_raw(raw).expect_err("cap exceeded");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "feed.max_page_size",
            ..
        }
    ));
}

#[test]
fn default_page_size_follows_a_smaller_maximum() {
    let mut raw = RawSettings::default();
    raw.feed.max_page_size = Some(5);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.feed.default_page_size.get(), 5);
}

#[test]
fn default_page_size_above_maximum_is_rejected() {
    let mut raw = RawSettings::default();
    raw.feed.max_page_size = Some(20);
    raw.feed.default_page_size = Some(50);

    let err = Settings::from_raw(raw).expect_err("default exceeds max");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "feed.default_page_size",
            ..
        }
    ));
}

#[test]
fn zero_cache_capacity_is_rejected() {
    let mut raw = RawSettings::default();
    raw.cache.capacity = Some(0);

    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "cache.capacity",
            ..
        })
    ));
}

#[test]
fn blank_database_url_is_treated_as_missing() {
    let mut raw = RawSettings::default();
    raw.database.url = Some("   ".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert!(settings.database.url.is_none());
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ServeOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_serve_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn default_to_serve_command() {
    let args = CliArgs::parse_from(["agora"]);
    let command = args
        .command
        .unwrap_or(Command::Serve(Box::<ServeArgs>::default()));
    assert!(matches!(command, Command::Serve(_)));
}

#[test]
fn parse_migrate_arguments() {
    let args = CliArgs::parse_from(["agora", "migrate", "--database-url", "postgres://example"]);

    match args.command.expect("migrate command") {
        Command::Migrate(migrate) => {
            assert_eq!(
                migrate.database.database_url.as_deref(),
                Some("postgres://example")
            );
        }
        _ => panic!("wrong command parsed"),
    }
}

#[test]
fn parse_serve_overrides() {
    let args = CliArgs::parse_from([
        "agora",
        "serve",
        "--server-host",
        "0.0.0.0",
        "--database-url",
        "postgres://override",
        "--posts-allow-comments",
        "false",
        "--cache-capacity",
        "64",
    ]);

    match args.command.expect("serve command") {
        Command::Serve(serve) => {
            let overrides = &serve.overrides;
            assert_eq!(overrides.server_host.as_deref(), Some("0.0.0.0"));
            assert_eq!(
                overrides.database.database_url.as_deref(),
                Some("postgres://override")
            );
            assert_eq!(overrides.posts_allow_comments, Some(false));
            assert_eq!(overrides.cache_capacity, Some(64));

            let mut raw = RawSettings::default();
            raw.apply_serve_overrides(overrides);
            let settings = Settings::from_raw(raw).expect("valid settings");
            assert!(!settings.posts.allow_comments);
            assert_eq!(settings.cache.capacity.get(), 64);
        }
        _ => panic!("wrong command parsed"),
    }
}
