use std::process::{Command, Stdio};

use anyhow::Result;

fn collapp(args: &[&str], vars: &[(&str, &str)]) -> Result<std::process::Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_collapp"));
    cmd.args(args)
        .env("APP_ENV", "development")
        .env("DATABASE_URL", "postgres://nobody@127.0.0.1:1/none")
        .env("DB_ACQUIRE_TIMEOUT_SECS", "1")
        .env("JWT_KEY", "cli-test-key")
        .stdin(Stdio::null());
    for (key, value) in vars {
        cmd.env(key, value);
    }
    Ok(cmd.output()?)
}

#[test]
fn bootstrap_refuses_invalid_configuration() -> Result<()> {
    let output = collapp(&["bootstrap"], &[("DB_MAX_OPEN_CONNS", "0")])?;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid configuration"), "stderr: {}", stderr);
    Ok(())
}

#[test]
fn admin_ensure_refuses_invalid_configuration() -> Result<()> {
    let output = collapp(
        &["admin", "ensure", "--email", "root@example.com"],
        &[("JWT_ACCESS_EXPIRY_MINUTES", "0")],
    )?;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid configuration"), "stderr: {}", stderr);
    Ok(())
}

#[test]
fn valid_configuration_gets_as_far_as_the_database() -> Result<()> {
    let output = collapp(&["bootstrap"], &[])?;
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("invalid configuration"), "stderr: {}", stderr);
    Ok(())
}
