use std::fmt;
use std::rc::Rc;

use serde::Deserialize;

/// Callback receiving every usage diagnostic instead of the logger.
pub type WarnHandler = Rc<dyn Fn(&str)>;

/// Process-level runtime configuration.
///
/// `diagnostics` corresponds to a non-optimized build: usage warnings,
/// guarded render proxies and performance marks are only active when it is
/// set.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Enable usage diagnostics and the guarded render proxy.
    pub diagnostics: bool,
    /// Measure and log instance initialization time (requires `diagnostics`).
    pub performance: bool,
    /// Suppress all warnings.
    pub silent: bool,
    /// Custom sink for warnings.
    #[serde(skip)]
    pub warn_handler: Option<WarnHandler>,
}

impl RuntimeConfig {
    /// Configuration for an optimized build: no diagnostics, passthrough proxy.
    pub fn production() -> Self {
        Self {
            diagnostics: false,
            ..Self::default()
        }
    }

    /// Configuration with diagnostics forced on.
    pub fn development() -> Self {
        Self {
            diagnostics: true,
            ..Self::default()
        }
    }

    /// Builder-style helper to install a warning sink.
    pub fn with_warn_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + 'static,
    {
        self.warn_handler = Some(Rc::new(handler));
        self
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            diagnostics: cfg!(debug_assertions),
            performance: false,
            silent: false,
            warn_handler: None,
        }
    }
}

impl fmt::Debug for RuntimeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeConfig")
            .field("diagnostics", &self.diagnostics)
            .field("performance", &self.performance)
            .field("silent", &self.silent)
            .field("warn_handler", &self.warn_handler.is_some())
            .finish()
    }
}
