//! Integration tests for nsadmin

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use predicates::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    /// Binary isolated from the caller's config and environment
    fn nsadmin(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("nsadmin");
        cmd.env_remove("NSADMIN_API_URL")
            .env("NSADMIN_CONFIG", temp.path().join("config.toml"));
        cmd
    }

    fn namespaces_server(body: serde_json::Value) -> MockServer {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/ns");
            then.status(200).json_body(body);
        });
        server
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        nsadmin(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("namespaces"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        nsadmin(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("nsadmin"));
    }

    #[test]
    fn completions_bash() {
        let temp = TempDir::new().unwrap();
        nsadmin(&temp)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("nsadmin"));
    }

    #[test]
    fn config_path_honors_override() {
        let temp = TempDir::new().unwrap();
        nsadmin(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                temp.path().join("config.toml").display().to_string(),
            ));
    }

    #[test]
    fn config_show_defaults() {
        let temp = TempDir::new().unwrap();
        nsadmin(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[api]"))
            .stdout(predicate::str::contains("http://localhost:8000"));
    }

    #[test]
    fn config_set_then_show() {
        let temp = TempDir::new().unwrap();
        nsadmin(&temp)
            .args(["config", "set", "api.namespaces_path", "/v2/ns"])
            .assert()
            .success();

        nsadmin(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("/v2/ns"));
    }

    #[test]
    fn config_set_unknown_key_fails() {
        let temp = TempDir::new().unwrap();
        nsadmin(&temp)
            .args(["config", "set", "api.port", "1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn namespaces_plain() {
        let temp = TempDir::new().unwrap();
        let server = namespaces_server(json!(["orders", "users", "audit"]));

        nsadmin(&temp)
            .args(["namespaces", "--format", "plain", "--api-url"])
            .arg(server.base_url())
            .assert()
            .success()
            .stdout("orders\nusers\naudit\n");
    }

    #[test]
    fn namespaces_json() {
        let temp = TempDir::new().unwrap();
        let server = namespaces_server(json!(["orders"]));

        nsadmin(&temp)
            .args(["ns", "--format", "json", "--api-url"])
            .arg(server.base_url())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"orders\""));
    }

    #[test]
    fn namespaces_empty_table() {
        let temp = TempDir::new().unwrap();
        let server = namespaces_server(json!([]));

        nsadmin(&temp)
            .args(["namespaces", "--api-url"])
            .arg(server.base_url())
            .assert()
            .success()
            .stdout(predicate::str::contains("No namespaces"));
    }

    #[test]
    fn namespaces_server_error() {
        let temp = TempDir::new().unwrap();
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/ns");
            then.status(500).json_body(json!({"detail": "storage offline"}));
        });

        nsadmin(&temp)
            .args(["namespaces", "--api-url"])
            .arg(server.base_url())
            .assert()
            .failure()
            .stderr(predicate::str::contains("HTTP 500"))
            .stderr(predicate::str::contains("storage offline"));
    }

    #[test]
    fn namespaces_invalid_api_url() {
        let temp = TempDir::new().unwrap();
        nsadmin(&temp)
            .args(["namespaces", "--api-url", "ftp://storage"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn namespaces_interactive_shows_list_before_quitting() {
        let temp = TempDir::new().unwrap();
        let server = namespaces_server(json!(["orders"]));

        nsadmin(&temp)
            .args(["namespaces", "--interactive", "--api-url"])
            .arg(server.base_url())
            .write_stdin("q\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("orders"))
            .stdout(predicate::str::contains("Done"));
    }

    #[test]
    fn namespaces_interactive_refresh_fetches_again() {
        let temp = TempDir::new().unwrap();
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/ns");
            then.status(200).json_body(json!(["orders"]));
        });

        nsadmin(&temp)
            .args(["namespaces", "--interactive", "--api-url"])
            .arg(server.base_url())
            .write_stdin("\nq\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("orders").count(2));
        mock.assert_hits(2);
    }

    #[test]
    fn namespaces_interactive_offers_retry_when_unreachable() {
        let temp = TempDir::new().unwrap();
        nsadmin(&temp)
            .args(["namespaces", "--interactive", "--api-url", "http://127.0.0.1:1"])
            .write_stdin("q\n")
            .assert()
            .success()
            .stdout(predicate::str::contains("Failed to load namespaces"))
            .stdout(predicate::str::contains("Press Enter to retry"));
    }

    #[test]
    fn config_init_force_replaces_broken_file() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.toml"), "[api\nbase_url = ").unwrap();

        nsadmin(&temp)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("config init --force"));

        nsadmin(&temp)
            .args(["config", "init", "--force"])
            .assert()
            .success();

        nsadmin(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("http://localhost:8000"));
    }

    #[test]
    fn invalid_log_format_in_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("config.toml"),
            "[general]\nlog_format = \"xml\"\n",
        )
        .unwrap();

        nsadmin(&temp)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }
}
