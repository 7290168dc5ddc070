use std::{env, env::VarError};

/// The server takes no arguments. Any argument prints the help text and the current settings.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 12] = [
        "RUST_LOG",
        "B2B_HOST",
        "B2B_PORT",
        "B2B_DATABASE_URL",
        "B2B_DB_MAX_CONNECTIONS",
        "B2B_RUN_MIGRATIONS",
        "B2B_FEED_TIMEOUT_SECS",
        "B2B_EVENT_BUFFER_SIZE",
        "B2B_SMTP_HOST",
        "B2B_SMTP_PORT",
        "B2B_SMTP_USERNAME",
        "B2B_EMAIL_FROM",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
