//! User-facing configuration for a single typesetting call.

use alloc::string::String;
use alloc::vec::Vec;
use bon::bon;
use strum::{AsRefStr, Display, EnumString};

use crate::namespace::KeyMap;
use crate::types::{ErrorLocationProvider, ParseError, ParseErrorKind};

/// What to do with input that parses but that LaTeX itself would reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum StrictMode {
    /// Accept silently
    Ignore,
    /// Accept and log a warning
    #[default]
    Warn,
    /// Reject with a [`ParseError`]
    Error,
}

/// Custom policy: receives the error code and message, decides the mode.
pub type StrictFunction = fn(code: &str, message: &str) -> StrictMode;

/// Either a fixed [`StrictMode`] or a policy function.
#[derive(Debug, Clone, Copy)]
pub enum StrictSetting {
    /// The same answer for every code
    Mode(StrictMode),
    /// Decided per code
    Custom(StrictFunction),
}

impl Default for StrictSetting {
    fn default() -> Self {
        Self::Mode(StrictMode::Warn)
    }
}

impl From<StrictMode> for StrictSetting {
    fn from(mode: StrictMode) -> Self {
        Self::Mode(mode)
    }
}

impl From<bool> for StrictSetting {
    fn from(strict: bool) -> Self {
        Self::Mode(if strict {
            StrictMode::Error
        } else {
            StrictMode::Ignore
        })
    }
}

/// Protocols `\href` and `\url` accept unless told otherwise.
pub const DEFAULT_ALLOWED_PROTOCOLS: [&str; 4] = ["http", "https", "mailto", "_relative"];

/// Settings for parsing and laying out one expression.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Lay out in display style instead of text style
    pub display_mode: bool,
    /// Abort on user errors instead of producing fallback output
    pub throw_on_error: bool,
    /// Color used for the fallback rendering of bad input
    pub error_color: String,
    /// Parameterless user macros, name (with backslash) to replacement text
    pub macros: KeyMap<String, String>,
    /// Lower bound on the thickness of rules (fraction bars, overlines)
    pub min_rule_thickness: f64,
    /// Policy for LaTeX-incompatible input
    pub strict: StrictSetting,
    /// Upper bound on user-specified sizes, in ems
    pub max_size: f64,
    /// Upper bound on macro expansions, to catch infinite loops
    pub max_expand: usize,
    /// Protocols accepted in URL arguments; `"*"` accepts everything
    pub allowed_protocols: Vec<String>,
    /// Upper bound on group nesting depth, see [`DEFAULT_MAX_NESTING`]
    pub max_nesting: usize,
}

/// Default group nesting limit. Parsing and layout both recurse once per
/// level, and this many levels fit a 2 MiB thread stack in unoptimized
/// builds.
pub const DEFAULT_MAX_NESTING: usize = 50;

#[bon]
impl Settings {
    /// Settings with defaults for anything left unset.
    #[builder]
    pub fn new(
        display_mode: Option<bool>,
        throw_on_error: Option<bool>,
        #[builder(into)] error_color: Option<String>,
        macros: Option<KeyMap<String, String>>,
        min_rule_thickness: Option<f64>,
        #[builder(into)] strict: Option<StrictSetting>,
        max_size: Option<f64>,
        max_expand: Option<usize>,
        allowed_protocols: Option<Vec<String>>,
        max_nesting: Option<usize>,
    ) -> Self {
        Self {
            display_mode: display_mode.unwrap_or(false),
            throw_on_error: throw_on_error.unwrap_or(true),
            error_color: error_color.unwrap_or_else(|| "#cc0000".to_owned()),
            macros: macros.unwrap_or_default(),
            min_rule_thickness: min_rule_thickness.unwrap_or(0.0).max(0.0),
            strict: strict.unwrap_or_default(),
            max_size: max_size.unwrap_or(f64::INFINITY).max(0.0),
            max_expand: max_expand.unwrap_or(1000),
            allowed_protocols: allowed_protocols.unwrap_or_else(|| {
                DEFAULT_ALLOWED_PROTOCOLS
                    .iter()
                    .map(|p| (*p).to_owned())
                    .collect()
            }),
            max_nesting: max_nesting.unwrap_or(DEFAULT_MAX_NESTING),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl Settings {
    fn resolve_strict(&self, code: &str, message: &str) -> StrictMode {
        match self.strict {
            StrictSetting::Mode(mode) => mode,
            StrictSetting::Custom(policy) => policy(code, message),
        }
    }

    /// Report LaTeX-incompatible input. Depending on the strict policy this
    /// does nothing, logs a warning, or fails.
    pub fn report_nonstrict(
        &self,
        code: &str,
        message: &str,
        token: Option<&dyn ErrorLocationProvider>,
    ) -> Result<(), ParseError> {
        match self.resolve_strict(code, message) {
            StrictMode::Ignore => Ok(()),
            StrictMode::Warn => {
                log::warn!(
                    "LaTeX-incompatible input and strict mode is set to 'warn': {message} [{code}]"
                );
                Ok(())
            }
            StrictMode::Error => {
                let kind = ParseErrorKind::StrictModeError {
                    message: message.to_owned(),
                    code: code.to_owned(),
                };
                Err(match token {
                    Some(token) => ParseError::with_token(kind, token),
                    None => ParseError::new(kind),
                })
            }
        }
    }

    /// Whether to follow LaTeX where it is stricter than the lenient
    /// reading of the input. Only [`StrictMode::Error`] says yes; `Warn`
    /// logs and says no.
    #[must_use]
    pub fn use_strict_behavior(&self, code: &str, message: &str) -> bool {
        match self.resolve_strict(code, message) {
            StrictMode::Ignore => false,
            StrictMode::Warn => {
                log::warn!(
                    "LaTeX-incompatible input and strict mode is set to 'warn': {message} [{code}]"
                );
                false
            }
            StrictMode::Error => true,
        }
    }

    /// Whether a URL with the given protocol may be used. Relative URLs
    /// are represented by the pseudo-protocol `_relative`.
    #[must_use]
    pub fn is_protocol_allowed(&self, protocol: &str) -> bool {
        self.allowed_protocols
            .iter()
            .any(|allowed| allowed == "*" || allowed == protocol)
    }
}

/// Extract the protocol of a URL the way browsers read it.
///
/// Leading spaces and control characters are skipped. The scheme runs up to
/// the first `:`, unless a `\`, `/`, `#` or `?` comes first, which makes the
/// URL relative (the pseudo-protocol `_relative`). Returns `None` for a
/// malformed scheme or one ended by an HTML-encoded colon (`&colon;`,
/// `&#58;`, `&#x3a;`); such URLs are never allowed.
#[must_use]
pub fn protocol_from_url(url: &str) -> Option<String> {
    let url = url.trim_start_matches(|c: char| c <= '\u{20}');
    for (i, ch) in url.char_indices() {
        match ch {
            ':' => {
                let scheme = &url[..i];
                return is_valid_scheme(scheme).then(|| scheme.to_ascii_lowercase());
            }
            '&' if is_encoded_colon(&url[i + 1..]) => return None,
            '\\' | '/' | '#' | '?' => break,
            _ => {}
        }
    }
    Some("_relative".to_owned())
}

/// `colon`, `#0*58` or `#x0*3a`, following an `&`.
fn is_encoded_colon(entity: &str) -> bool {
    if entity.get(..5).is_some_and(|name| name.eq_ignore_ascii_case("colon")) {
        return true;
    }
    let Some(number) = entity.strip_prefix('#') else {
        return false;
    };
    match number.strip_prefix(['x', 'X']) {
        Some(hex) => hex
            .trim_start_matches('0')
            .get(..2)
            .is_some_and(|digits| digits.eq_ignore_ascii_case("3a")),
        None => number.trim_start_matches('0').starts_with("58"),
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr as _;

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert!(!settings.display_mode);
        assert!(settings.throw_on_error);
        assert_eq!(settings.error_color, "#cc0000");
        assert_eq!(settings.max_expand, 1000);
        assert_eq!(settings.max_nesting, DEFAULT_MAX_NESTING);
        assert!(settings.max_size.is_infinite());
        assert!(settings.is_protocol_allowed("https"));
        assert!(!settings.is_protocol_allowed("javascript"));
    }

    #[test]
    fn strict_modes_parse_from_strings() {
        assert_eq!(StrictMode::from_str("error").unwrap(), StrictMode::Error);
        assert_eq!(StrictMode::from_str("ignore").unwrap(), StrictMode::Ignore);
        assert!(StrictMode::from_str("loud").is_err());
    }

    #[test]
    fn strict_error_escalates() {
        let settings = Settings::builder().strict(StrictMode::Error).build();
        let err = settings
            .report_nonstrict("unicodeTextInMathMode", "text in math", None)
            .unwrap_err();
        assert!(err.message().contains("[unicodeTextInMathMode]"));

        let lenient = Settings::builder().strict(false).build();
        assert!(lenient.report_nonstrict("x", "y", None).is_ok());
    }

    #[test]
    fn custom_strict_policy_sees_the_code() {
        fn only_comments(code: &str, _: &str) -> StrictMode {
            if code == "commentAtEnd" {
                StrictMode::Error
            } else {
                StrictMode::Ignore
            }
        }
        let settings = Settings::builder()
            .strict(StrictSetting::Custom(only_comments))
            .build();
        assert!(settings.report_nonstrict("commentAtEnd", "", None).is_err());
        assert!(settings.report_nonstrict("unknownSymbol", "", None).is_ok());
    }

    #[test]
    fn protocols() {
        assert_eq!(protocol_from_url("https://example.com").as_deref(), Some("https"));
        assert_eq!(protocol_from_url("MAILTO:me@example.com").as_deref(), Some("mailto"));
        assert_eq!(protocol_from_url("/relative/path").as_deref(), Some("_relative"));
        assert_eq!(protocol_from_url("page#a:b").as_deref(), Some("_relative"));
        assert_eq!(protocol_from_url("a&amp;b").as_deref(), Some("_relative"));
        let open = Settings::builder().allowed_protocols(vec!["*".to_owned()]).build();
        assert!(open.is_protocol_allowed("javascript"));
    }

    #[test]
    fn leading_blanks_do_not_hide_a_scheme() {
        for url in [" javascript:alert(1)", "\u{1}javascript:x", "\t\njavascript:x"] {
            assert_eq!(protocol_from_url(url).as_deref(), Some("javascript"), "{url:?}");
        }
    }

    #[test]
    fn encoded_colons_and_malformed_schemes_have_no_protocol() {
        for url in [
            "javascript&colon;alert(1)",
            "javascript&COLON;alert(1)",
            "javascript&#58;alert(1)",
            "javascript&#0058;alert(1)",
            "javascript&#x3a;alert(1)",
            "javascript&#X003A;alert(1)",
            "java\tscript:alert(1)",
            "java\nscript:alert(1)",
            "java script:x",
            "1http://x.org",
            ":x",
        ] {
            assert_eq!(protocol_from_url(url), None, "{url:?}");
        }
    }
}
