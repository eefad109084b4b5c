//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# sketch-lint configuration

[analyzer]
# Project root (default: current directory)
# root = "."

# Source directory, relative to the root (default: src/main/java, then src, then root)
# source_dir = "src/main/java"

# Glob patterns to exclude from discovery
exclude = [
    "**/build/**",
    "**/target/**",
    "**/out/**",
]

# Respect .gitignore files
respect_gitignore = true

# Treat unparsable files as errors instead of warnings
fail_on_parse_error = false

[dialect]
# sketch_tag = "JavonoEmbeddedSketch"
# init_tag = "JavonoEmbeddedInit"
# loop_tag = "JavonoEmbeddedLoop"
# user_tag = "JavonoEmbeddedUserMethod"
# library_namespace = "javono.lib"

[library]
# Where the types of `import javono.lib.*;` are listed from.
# All existing locations are merged.
# source_dir = "lib/src/main/java"
# class_dir = "lib/build/classes/java/main"
# archive = "libs/javono-lib.jar"

[marker]
# file = "javono-processor.marker"
required = true

# Rule options. Sketch rules always run as errors; only parse-failure and
# library-unavailable accept `enabled` and `severity`.

[rules.require-role-tags]
tag_fields = true

[rules.external-calls]
allow_static_library_calls = true

[rules.library-unavailable]
# severity = "error"
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    write_config(Path::new("sketch-lint.toml"), force)?;

    println!("Created sketch-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit sketch-lint.toml to configure rules");
    println!("  2. Run: sketch-lint check");

    Ok(())
}

fn write_config(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sketch_lint_core::Config;
    use tempfile::TempDir;

    #[test]
    fn default_config_parses() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert!(config.marker.required);
        assert!(config.rule_bool("external-calls", "allow_static_library_calls", false));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sketch-lint.toml");
        std::fs::write(&path, "# mine").unwrap();

        assert!(write_config(&path, false).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        write_config(&path, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);
    }
}
