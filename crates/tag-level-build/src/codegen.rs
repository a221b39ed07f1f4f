//! Rust source generation for a parsed [`LevelsConfig`].

use crate::LevelsConfig;

/// Render the generated module body.
///
/// Output is deterministic: presets are emitted in tag order, so an
/// unchanged config produces byte-identical source.
pub fn generate_code(config: &LevelsConfig) -> String {
    let mut out = String::new();
    out.push_str("// @generated by tag-level-build. Do not edit by hand.\n\n");

    out.push_str("/// Level for tags without an override.\n");
    out.push_str(&format!(
        "pub const DEFAULT_LEVEL: ::tag_level::Level = ::tag_level::Level::{:?};\n\n",
        config.default_level
    ));

    out.push_str("/// Read-path lock wait, in milliseconds.\n");
    out.push_str(&format!("pub const MAX_WAIT_MS: u64 = {};\n\n", config.max_wait_ms));

    out.push_str("/// Per-tag levels applied at startup, in tag order.\n");
    out.push_str("pub const PRESETS: &[::tag_level::LevelPreset] = &[\n");
    for (tag, level) in config.levels() {
        out.push_str(&format!(
            "    ::tag_level::LevelPreset::new({tag:?}, ::tag_level::Level::{level:?}),\n"
        ));
    }
    out.push_str("];\n\n");

    out.push_str("/// Runtime configuration built from levels.toml.\n");
    out.push_str("pub fn config() -> ::tag_level::TagLevelsConfig {\n");
    out.push_str("    ::tag_level::TagLevelsConfig::new()\n");
    out.push_str("        .default_level(DEFAULT_LEVEL)\n");
    out.push_str(&format!(
        "        .limits(::tag_level::RegistryLimits::new({}, {}))\n",
        config.limits.max_overrides, config.limits.max_tag_bytes
    ));
    out.push_str("        .max_wait(::std::time::Duration::from_millis(MAX_WAIT_MS))\n");
    out.push_str("        .presets(PRESETS)\n");
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_sorted_presets_and_config() {
        let config = LevelsConfig::from_str(
            "default = \"warn\"\nmax_wait_ms = 3\n[levels]\nwifi = \"error\"\nble = \"debug\"\n",
        )
        .unwrap();
        let code = generate_code(&config);

        assert!(code.contains("pub const DEFAULT_LEVEL: ::tag_level::Level = ::tag_level::Level::Warn;"));
        assert!(code.contains("pub const MAX_WAIT_MS: u64 = 3;"));
        let ble = code.find("LevelPreset::new(\"ble\", ::tag_level::Level::Debug)").unwrap();
        let wifi = code.find("LevelPreset::new(\"wifi\", ::tag_level::Level::Error)").unwrap();
        assert!(ble < wifi);
        assert!(code.contains(".limits(::tag_level::RegistryLimits::new(32, 512))"));
        assert!(code.ends_with("}\n"));
    }

    #[test]
    fn tags_are_escaped_as_string_literals() {
        let config = LevelsConfig::from_str("[levels]\n'a\"b' = \"info\"\n").unwrap();
        let code = generate_code(&config);
        assert!(code.contains(r#"LevelPreset::new("a\"b", "#));
    }

    #[test]
    fn output_is_deterministic() {
        let toml = "[levels]\nz = \"info\"\na = \"info\"\nm = \"none\"\n";
        let first = generate_code(&LevelsConfig::from_str(toml).unwrap());
        let second = generate_code(&LevelsConfig::from_str(toml).unwrap());
        assert_eq!(first, second);
    }
}
