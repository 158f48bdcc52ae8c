//! Configuration loading (`spec.md` §6 "Configuration options recognized").
//!
//! `ConfigFile` is the raw, TOML-deserializable document. `Config` is the
//! resolved runtime form: duration instead of milliseconds, bitflags
//! instead of booleans, and `color_profile = "auto"` resolved against the
//! environment via [`uv_term::detect_color_profile`]. Unknown fields in the
//! document are ignored so older binaries tolerate newer config files.

mod file;
mod flags;

pub use file::{
    ColorProfileChoice, ConfigFile, InputSection, LegacyKeyEncodingFile, MouseModeFile, RenderFlagsFile,
};
pub use flags::{LegacyKeyEncoding, MouseMode};

use anyhow::Result;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};
use uv_term::ColorProfile;

/// Below this, ESC-ambiguity disambiguation would fire so fast that a
/// genuine Alt-key chord or an `ESC [` CSI prefix sent over a slow pipe
/// could be split across two decode calls.
const MIN_ESC_TIMEOUT_MS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderFlags {
    pub hard_tabs: bool,
    pub backspace: bool,
    pub map_newline: bool,
    pub relative_cursor: bool,
    pub alt_screen: bool,
}

impl From<RenderFlagsFile> for RenderFlags {
    fn from(f: RenderFlagsFile) -> Self {
        Self {
            hard_tabs: f.hard_tabs,
            backspace: f.backspace,
            map_newline: f.map_newline,
            relative_cursor: f.relative_cursor,
            alt_screen: f.alt_screen,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file: ConfigFile,
    pub esc_timeout: Duration,
    pub mouse_mode: MouseMode,
    pub color_profile: ColorProfile,
    pub use_terminfo: bool,
    pub legacy_key_encoding: LegacyKeyEncoding,
    pub render: RenderFlags,
}

impl Default for Config {
    fn default() -> Self {
        Self::resolve(ConfigFile::default(), false)
    }
}

/// Best-effort config path: a local `ultraviolet.toml` wins, otherwise the
/// platform config dir (XDG / AppData Roaming via `dirs`).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("ultraviolet.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ultraviolet").join("ultraviolet.toml");
    }
    PathBuf::from("ultraviolet.toml")
}

/// Loads and resolves a config. A missing file or a parse error both fall
/// back to defaults rather than propagating, so a malformed config never
/// prevents the application from starting.
pub fn load_from(path: Option<PathBuf>, is_tty: bool) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let file = match fs::read_to_string(&path) {
        Ok(content) => match toml::from_str::<ConfigFile>(&content) {
            Ok(file) => file,
            Err(error) => {
                warn!(
                    target: "config",
                    path = %path.display(),
                    %error,
                    "config_parse_failed_using_defaults"
                );
                ConfigFile::default()
            }
        },
        Err(_) => ConfigFile::default(),
    };
    Ok(Config::resolve(file, is_tty))
}

impl Config {
    /// Resolves a parsed document against runtime context: clamps
    /// `esc_timeout_ms`, expands the per-field mouse/legacy-key bools into
    /// bitflags, and resolves `color_profile = "auto"` against `is_tty`.
    pub fn resolve(file: ConfigFile, is_tty: bool) -> Self {
        let raw_timeout = file.input.esc_timeout_ms;
        let clamped_timeout = raw_timeout.max(MIN_ESC_TIMEOUT_MS);
        if clamped_timeout != raw_timeout {
            info!(
                target: "config",
                raw_timeout,
                clamped_timeout,
                "esc_timeout_ms_clamped"
            );
        }

        let mut mouse_mode = MouseMode::empty();
        mouse_mode.set(MouseMode::RELEASES_MODE, file.input.mouse_mode.releases);
        mouse_mode.set(MouseMode::ALL_MOTION_MODE, file.input.mouse_mode.all_motion);

        let l = file.input.legacy_key_encoding;
        let mut legacy_key_encoding = LegacyKeyEncoding::empty();
        legacy_key_encoding.set(LegacyKeyEncoding::CTRL_AT, l.ctrl_at);
        legacy_key_encoding.set(LegacyKeyEncoding::CTRL_I, l.ctrl_i);
        legacy_key_encoding.set(LegacyKeyEncoding::CTRL_M, l.ctrl_m);
        legacy_key_encoding.set(LegacyKeyEncoding::CTRL_OPEN_BRACKET, l.ctrl_open_bracket);
        legacy_key_encoding.set(LegacyKeyEncoding::BACKSPACE, l.backspace);
        legacy_key_encoding.set(LegacyKeyEncoding::FIND, l.find);
        legacy_key_encoding.set(LegacyKeyEncoding::SELECT, l.select);

        let color_profile = match file.input.color_profile {
            ColorProfileChoice::Auto => uv_term::detect_color_profile(is_tty),
            ColorProfileChoice::Notty => ColorProfile::NoTty,
            ColorProfileChoice::Ascii => ColorProfile::Ascii,
            ColorProfileChoice::Ansi16 => ColorProfile::Ansi16,
            ColorProfileChoice::Ansi256 => ColorProfile::Ansi256,
            ColorProfileChoice::Truecolor => ColorProfile::TrueColor,
        };

        Config {
            esc_timeout: Duration::from_millis(clamped_timeout),
            mouse_mode,
            color_profile,
            use_terminfo: file.input.use_terminfo,
            legacy_key_encoding,
            render: file.render.into(),
            file,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    #[test]
    fn default_config_when_file_missing() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml")), false).unwrap();
        assert_eq!(cfg.esc_timeout, Duration::from_millis(50));
        assert!(cfg.mouse_mode.contains(MouseMode::RELEASES_MODE));
        assert!(!cfg.mouse_mode.contains(MouseMode::ALL_MOTION_MODE));
        assert_eq!(cfg.color_profile, ColorProfile::Ascii);
    }

    #[test]
    fn default_config_falls_back_on_parse_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "this is not valid toml [[[").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()), false).unwrap();
        assert_eq!(cfg.esc_timeout, Duration::from_millis(50));
    }

    #[test]
    fn parses_mouse_mode_and_color_profile() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[input]\ncolor_profile = \"truecolor\"\n[input.mouse_mode]\nall_motion = true\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()), true).unwrap();
        assert_eq!(cfg.color_profile, ColorProfile::TrueColor);
        assert!(cfg.mouse_mode.contains(MouseMode::ALL_MOTION_MODE));
        assert!(cfg.mouse_mode.contains(MouseMode::RELEASES_MODE));
    }

    #[test]
    fn auto_color_profile_resolves_against_is_tty() {
        let cfg = Config::resolve(ConfigFile::default(), false);
        assert_eq!(cfg.color_profile, ColorProfile::NoTty);
    }

    #[test]
    fn esc_timeout_below_minimum_is_clamped() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[input]\nesc_timeout_ms = 1\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf()), false).unwrap();
        assert_eq!(cfg.esc_timeout, Duration::from_millis(MIN_ESC_TIMEOUT_MS));
    }

    #[test]
    fn clamp_logging_uses_config_target() {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();

        with_default(subscriber, || {
            let mut file = ConfigFile::default();
            file.input.esc_timeout_ms = 0;
            Config::resolve(file, false);
        });

        let log_output = String::from_utf8(buffer.lock().unwrap().clone()).unwrap();
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("esc_timeout_ms_clamped"));
    }

    #[test]
    fn render_flags_default_to_teacher_conventions() {
        let cfg = Config::default();
        assert!(cfg.render.hard_tabs);
        assert!(cfg.render.alt_screen);
        assert!(!cfg.render.map_newline);
    }
}
