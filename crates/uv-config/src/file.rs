//! The TOML-deserializable shape of a config file (`spec.md` §6
//! "Configuration options recognized").

use serde::Deserialize;

fn default_true() -> bool {
    true
}

fn default_esc_timeout_ms() -> u64 {
    50
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorProfileChoice {
    #[default]
    Auto,
    Notty,
    Ascii,
    Ansi16,
    Ansi256,
    Truecolor,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MouseModeFile {
    #[serde(default = "default_true")]
    pub releases: bool,
    #[serde(default)]
    pub all_motion: bool,
}

impl Default for MouseModeFile {
    fn default() -> Self {
        Self {
            releases: true,
            all_motion: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct LegacyKeyEncodingFile {
    #[serde(default)]
    pub ctrl_at: bool,
    #[serde(default)]
    pub ctrl_i: bool,
    #[serde(default)]
    pub ctrl_m: bool,
    #[serde(default)]
    pub ctrl_open_bracket: bool,
    #[serde(default)]
    pub backspace: bool,
    #[serde(default)]
    pub find: bool,
    #[serde(default)]
    pub select: bool,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RenderFlagsFile {
    #[serde(default = "default_true")]
    pub hard_tabs: bool,
    #[serde(default = "default_true")]
    pub backspace: bool,
    #[serde(default)]
    pub map_newline: bool,
    #[serde(default = "default_true")]
    pub relative_cursor: bool,
    #[serde(default = "default_true")]
    pub alt_screen: bool,
}

impl Default for RenderFlagsFile {
    fn default() -> Self {
        Self {
            hard_tabs: true,
            backspace: true,
            map_newline: false,
            relative_cursor: true,
            alt_screen: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputSection {
    #[serde(default = "default_esc_timeout_ms")]
    pub esc_timeout_ms: u64,
    #[serde(default)]
    pub use_terminfo: bool,
    #[serde(default)]
    pub color_profile: ColorProfileChoice,
    #[serde(default)]
    pub mouse_mode: MouseModeFile,
    #[serde(default)]
    pub legacy_key_encoding: LegacyKeyEncodingFile,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub input: InputSection,
    #[serde(default)]
    pub render: RenderFlagsFile,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_all_defaults() {
        let file: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(file.input.esc_timeout_ms, 50);
        assert!(file.input.mouse_mode.releases);
        assert!(!file.input.mouse_mode.all_motion);
        assert_eq!(file.input.color_profile, ColorProfileChoice::Auto);
        assert!(file.render.alt_screen);
    }

    #[test]
    fn parses_a_full_document() {
        let toml_str = r#"
            [input]
            esc_timeout_ms = 25
            use_terminfo = true
            color_profile = "truecolor"

            [input.mouse_mode]
            releases = false
            all_motion = true

            [render]
            hard_tabs = false
            map_newline = true
        "#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        assert_eq!(file.input.esc_timeout_ms, 25);
        assert!(file.input.use_terminfo);
        assert_eq!(file.input.color_profile, ColorProfileChoice::Truecolor);
        assert!(!file.input.mouse_mode.releases);
        assert!(file.input.mouse_mode.all_motion);
        assert!(!file.render.hard_tabs);
        assert!(file.render.map_newline);
        // untouched fields keep their defaults
        assert!(file.render.alt_screen);
    }
}
