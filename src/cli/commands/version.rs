//! Version command implementation.

use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    sqlite: &'a str,
    build: &'a str,
}

/// Print the crate version and the bundled SQLite version.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    let output = VersionOutput {
        version: env!("CARGO_PKG_VERSION"),
        sqlite: rusqlite::version(),
        build: if cfg!(debug_assertions) { "dev" } else { "release" },
    };

    if json {
        return super::print_json(&output);
    }

    println!(
        "fitlog {} (sqlite {}, {})",
        output.version, output.sqlite, output.build
    );
    Ok(())
}
