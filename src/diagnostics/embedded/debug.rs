//! # DebugDiagnostics: policy-gated sink
//!
//! The sink to install while developing or testing. It turns failed assertions
//! into errors and routes deprecations through a [`DeprecationManager`].
//!
//! ## Deprecation flow
//! ```text
//! deprecate(message, test, opts)
//!   ├─► env.raise_on_deprecation? ─► manager.set_default_level(RAISE)
//!   ├─► resolve(opts.id) == SILENCE ─► return Ok (test not evaluated)
//!   ├─► test.holds() ─► return Ok
//!   ├─► message += " [deprecation id: <id>]"
//!   ├─► resolve(opts.id) == RAISE ─► Err(Deprecation)
//!   └─► message += " See <url> for more details." ─► warn!("DEPRECATION: ...")
//! ```
//!
//! ## Example output
//! ```text
//! WARN protolisten::diagnostics: WARNING: Tried to add a duplicate listener for 'click' on button
//! WARN protolisten::deprecation: DEPRECATION: Usage of `old` is deprecated, use `new` instead.
//! ```

use std::sync::Arc;

use crate::config::Config;
use crate::diagnostics::{DiagnosticOptions, Diagnostics, Test, Thunk};
use crate::error::DiagnosticError;
use crate::policies::{DeprecationLevel, DeprecationManager, Environment};

/// Policy-gated diagnostic sink.
///
/// Cheap to clone; clones share the same manager and environment.
#[derive(Clone, Debug, Default)]
pub struct DebugDiagnostics {
    manager: Arc<DeprecationManager>,
    environment: Arc<Environment>,
}

impl DebugDiagnostics {
    /// Creates a sink over an existing manager and environment.
    #[must_use]
    pub fn new(manager: Arc<DeprecationManager>, environment: Arc<Environment>) -> Self {
        Self {
            manager,
            environment,
        }
    }

    /// Builds a fresh manager and environment from `config`.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        let manager = DeprecationManager::new(config.default_level);
        for (id, level) in &config.levels {
            manager.set_level(id.clone(), Some(*level));
        }
        Self::new(
            Arc::new(manager),
            Arc::new(Environment::new(config.raise_on_deprecation)),
        )
    }

    /// The policy table consulted by `deprecate`.
    pub fn manager(&self) -> &Arc<DeprecationManager> {
        &self.manager
    }

    /// The environment switches read by `deprecate`.
    pub fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }
}

impl Diagnostics for DebugDiagnostics {
    fn assert(&self, message: &str, test: Test<'_>) -> Result<(), DiagnosticError> {
        if test.holds() {
            return Ok(());
        }
        Err(DiagnosticError::AssertionFailed {
            message: message.to_string(),
        })
    }

    fn warn(&self, message: &str, test: Test<'_>, options: &DiagnosticOptions) {
        if !test.holds() {
            tracing::warn!(
                target: "protolisten::diagnostics",
                id = options.id(),
                "WARNING: {message}"
            );
        }
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "protolisten::diagnostics", "DEBUG: {message}");
    }

    fn deprecate(
        &self,
        message: &str,
        test: Test<'_>,
        options: &DiagnosticOptions,
    ) -> Result<(), DiagnosticError> {
        if self.environment.raise_on_deprecation() {
            self.manager.set_default_level(DeprecationLevel::Raise);
        }

        let id = options.id();
        if self.manager.resolve(id) == DeprecationLevel::Silence {
            return Ok(());
        }
        if test.holds() {
            return Ok(());
        }

        let mut message = match id {
            Some(id) => format!("{message} [deprecation id: {id}]"),
            None => message.to_string(),
        };

        if self.manager.resolve(id) == DeprecationLevel::Raise {
            return Err(DiagnosticError::Deprecation {
                message,
                id: id.map(str::to_string),
            });
        }

        if let Some(url) = options.url.as_deref() {
            message.push_str(&format!(" See {url} for more details."));
        }
        tracing::warn!(
            target: "protolisten::deprecation",
            id,
            until = options.until.as_deref(),
            "DEPRECATION: {message}"
        );
        Ok(())
    }

    fn deprecate_func<'a>(
        &self,
        message: &str,
        options: &DiagnosticOptions,
        mut f: Thunk<'a>,
    ) -> Thunk<'a> {
        let sink = self.clone();
        let message = message.to_string();
        let options = options.clone();
        Box::new(move || {
            sink.deprecate(&message, Test::FAIL, &options)?;
            f()
        })
    }

    fn run_in_debug(&self, f: &mut dyn FnMut()) {
        f();
    }

    fn name(&self) -> &'static str {
        "debug"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    use parking_lot::Mutex;
    use tracing_subscriber::fmt::MakeWriter;

    /// In-memory log sink for the thread-local subscriber.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn lines(&self) -> Vec<String> {
            String::from_utf8_lossy(&self.0.lock())
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    /// Runs `f` with a subscriber scoped to this thread and returns the lines it logged.
    fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<String>) {
        let buf = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buf.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();
        let out = tracing::subscriber::with_default(subscriber, f);
        (out, buf.lines())
    }

    fn sink() -> DebugDiagnostics {
        DebugDiagnostics::default()
    }

    fn no_id() -> DiagnosticOptions {
        DiagnosticOptions::default()
    }

    #[test]
    fn test_deprecate_silent_default_does_not_raise() {
        let sink = sink();
        sink.manager().set_default_level(DeprecationLevel::Silence);
        assert!(sink.deprecate("Should not throw", Test::FAIL, &no_id()).is_ok());
    }

    #[test]
    fn test_env_flag_resets_default_to_raise() {
        let sink = sink();
        sink.manager().set_default_level(DeprecationLevel::Silence);
        sink.environment().set_raise_on_deprecation(true);

        let err = sink
            .deprecate("Should throw", Test::FAIL, &no_id())
            .unwrap_err();
        assert!(err.to_string().contains("Should throw"));
        assert_eq!(sink.manager().default_level(), DeprecationLevel::Raise);
    }

    #[test]
    fn test_env_flag_respects_id_silence() {
        let sink = sink();
        sink.environment().set_raise_on_deprecation(true);
        sink.manager()
            .set_level("my-deprecation", Some(DeprecationLevel::Silence));

        let silenced = DiagnosticOptions::with_id("my-deprecation");
        assert!(sink
            .deprecate("should be silenced with matching id", Test::FAIL, &silenced)
            .is_ok());

        let err = sink
            .deprecate("Should throw with no id", Test::FAIL, &no_id())
            .unwrap_err();
        assert!(err.to_string().contains("Should throw with no id"));

        let other = DiagnosticOptions::with_id("other-id");
        let err = sink
            .deprecate("Should throw with non-matching id", Test::FAIL, &other)
            .unwrap_err();
        assert!(err.to_string().contains("Should throw with non-matching id"));
        assert_eq!(err.deprecation_id(), Some("other-id"));
    }

    #[test]
    fn test_deprecate_falsy_raises() {
        let sink = sink();
        assert!(sink.deprecate("Deprecation is thrown", false.into(), &no_id()).is_err());
        assert!(sink
            .deprecate("Deprecation is thrown", Test::from(&|| false), &no_id())
            .is_err());
    }

    #[test]
    fn test_deprecate_truthy_passes() {
        let sink = sink();
        assert!(sink.deprecate("Deprecation is thrown", true.into(), &no_id()).is_ok());
        assert!(sink
            .deprecate("Deprecation is thrown", Test::from(&|| true), &no_id())
            .is_ok());
    }

    #[test]
    fn test_silenced_deprecation_skips_predicate() {
        let sink = sink();
        sink.manager().set_default_level(DeprecationLevel::Silence);
        let called = std::cell::Cell::new(false);
        let pred = || {
            called.set(true);
            false
        };
        assert!(sink.deprecate("quiet", Test::from(&pred), &no_id()).is_ok());
        assert!(!called.get());
    }

    #[test]
    fn test_levels_by_id() {
        let sink = sink();
        let opts = DiagnosticOptions::with_id("ABC");

        sink.manager().set_level("ABC", Some(DeprecationLevel::Log));
        let (res, lines) =
            capture(|| sink.deprecate("Deprecation for testing purposes", Test::FAIL, &opts));
        assert!(res.is_ok());
        let logged: Vec<_> = lines.iter().filter(|l| l.contains("DEPRECATION:")).collect();
        assert_eq!(logged.len(), 1);
        assert!(logged[0].contains("DEPRECATION: Deprecation for testing purposes [deprecation id: ABC]"));
        assert!(logged[0].contains("WARN"));

        sink.manager().set_level("ABC", Some(DeprecationLevel::Silence));
        let (res, lines) =
            capture(|| sink.deprecate("Deprecation for testing purposes", Test::FAIL, &opts));
        assert!(res.is_ok());
        assert!(lines.is_empty(), "silenced deprecation logged: {lines:?}");

        sink.manager().set_level("ABC", Some(DeprecationLevel::Raise));
        let (res, lines) = capture(|| sink.deprecate("Deprecation is thrown", Test::FAIL, &opts));
        assert_eq!(
            res.unwrap_err().to_string(),
            "Deprecation is thrown [deprecation id: ABC]"
        );
        assert!(lines.is_empty());

        sink.manager().set_level("ABC", None);
        assert!(sink.deprecate("Deprecation is thrown", Test::FAIL, &opts).is_err());
    }

    #[test]
    fn test_logged_deprecation_carries_url() {
        let sink = sink();
        sink.manager().set_default_level(DeprecationLevel::Log);

        let opts = DiagnosticOptions::with_id("old-api")
            .until("3.0.0")
            .url("https://example.com/old-api");
        let (res, lines) = capture(|| sink.deprecate("old api", Test::FAIL, &opts));
        assert!(res.is_ok());
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(
            "DEPRECATION: old api [deprecation id: old-api] See https://example.com/old-api for more details."
        ));

        let bare = DiagnosticOptions::with_id("old-api");
        let (res, lines) = capture(|| sink.deprecate("old api", Test::FAIL, &bare));
        assert!(res.is_ok());
        assert_eq!(lines.len(), 1);
        assert!(!lines[0].contains("for more details"));
    }

    #[test]
    fn test_raised_deprecation_omits_url() {
        let sink = sink();
        let opts = DiagnosticOptions::with_id("gone").url("https://example.com/gone");
        let err = sink.deprecate("gone", Test::FAIL, &opts).unwrap_err();
        assert_eq!(err.to_string(), "gone [deprecation id: gone]");
    }

    #[test]
    fn test_assert_outcomes() {
        let sink = sink();
        assert!(sink.assert("Assertion is thrown", false.into()).is_err());
        assert!(sink.assert("Assertion is thrown", Test::from(&|| false)).is_err());
        assert!(sink.assert("Assertion is thrown", true.into()).is_ok());
        assert!(sink.assert("Assertion is thrown", Test::from(&|| true)).is_ok());

        let err = sink.assert("value required", Test::FAIL).unwrap_err();
        assert_eq!(err.to_string(), "Assertion Failed: value required");
    }

    #[test]
    fn test_warn_never_fails_and_runs_debug() {
        let sink = sink();
        let (_, lines) = capture(|| {
            sink.warn("just a warning", Test::FAIL, &DiagnosticOptions::with_id("w"));
            sink.warn("holds", true.into(), &DiagnosticOptions::default());
            sink.debug("just a debug line");
        });
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("WARN") && lines[0].contains("WARNING: just a warning"));
        assert!(lines[1].contains("DEBUG: just a debug line"));

        let mut ran = false;
        sink.run_in_debug(&mut || { ran = true });
        assert!(ran);
    }

    #[test]
    fn test_deprecate_func_wraps_call() {
        let sink = sink();
        let mut calls = 0;
        {
            let mut wrapped = sink.deprecate_func(
                "old entry point",
                &no_id(),
                Box::new(|| {
                    calls += 1;
                    Ok(())
                }),
            );
            assert!(wrapped().is_err());
        }
        assert_eq!(calls, 0);

        sink.manager().set_default_level(DeprecationLevel::Log);
        {
            let mut wrapped = sink.deprecate_func(
                "old entry point",
                &no_id(),
                Box::new(|| {
                    calls += 1;
                    Ok(())
                }),
            );
            assert!(wrapped().is_ok());
        }
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.default_level = DeprecationLevel::Log;
        config.raise_on_deprecation = false;
        config
            .levels
            .insert("quiet".to_string(), DeprecationLevel::Silence);

        let sink = DebugDiagnostics::from_config(&config);
        assert_eq!(sink.manager().default_level(), DeprecationLevel::Log);
        assert_eq!(sink.manager().level("quiet"), Some(DeprecationLevel::Silence));
        assert!(!sink.environment().raise_on_deprecation());
    }
}
