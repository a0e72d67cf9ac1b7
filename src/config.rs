//! Parser configuration
//!
//! All knobs default to the behavior of the reference command-line tool; the
//! `modal` binary maps its flags onto [`ParserConfig`].

/// Deepest nesting of blocks and parenthesized expressions accepted by default
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 256;

/// Options controlling a single parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Reject `test name { ... }` and insist on `test "name" { ... }`
    pub require_quoted_test_names: bool,
    pub max_nesting_depth: usize,
    /// Write each diagnostic to stderr as it is reported
    pub emit_diagnostics: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            require_quoted_test_names: false,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            emit_diagnostics: true,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quoted_test_names(mut self, required: bool) -> Self {
        self.require_quoted_test_names = required;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_emit_diagnostics(mut self, emit: bool) -> Self {
        self.emit_diagnostics = emit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_methods() {
        let config = ParserConfig::new()
            .with_quoted_test_names(true)
            .with_max_nesting_depth(8)
            .with_emit_diagnostics(false);

        assert!(config.require_quoted_test_names);
        assert_eq!(config.max_nesting_depth, 8);
        assert!(!config.emit_diagnostics);
        assert_eq!(ParserConfig::new(), ParserConfig::default());
    }
}
