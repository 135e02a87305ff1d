//! Human-readable list of the example URLs this server answers.

use std::fmt::Write;
use std::path::Path;

use crate::config::BasePath;

/// Builds one line per documented endpoint. `host` is display-only.
pub fn list_urls(host: &str, port: u16, base: &BasePath, template_dir: &Path) -> String {
    let template_hint = format!(
        "Expand template in \"{}/${{file}}\"",
        template_dir.display()
    );
    let entries: [(&str, &str); 7] = [
        ("", "Test connectivity"),
        ("crash", "Abrupt crash scenario (status: 1)"),
        ("quit", "Exit cleanly (status: 0)"),
        ("count", "Increment counter"),
        ("sensitive/<password>", "Show sensitive information"),
        ("list/<host>", "List URL schemes"),
        ("${file}", template_hint.as_str()),
    ];

    let mut out = String::new();
    for (path, description) in entries {
        let _ = writeln!(out, " * http://{host}:{port}{base}{path:<20} {description}");
    }
    out
}
