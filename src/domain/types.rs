//! Request-scoped enumerations shared across the rendering pipeline.

use std::fmt;

/// Whether embedded plugin directives are executed for a rendered result.
///
/// The flag is part of the document cache key, so the unspecified state is a
/// distinct value rather than a default: a result cached without the flag set
/// must never satisfy a request that pinned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluginFlag {
    Enabled,
    Disabled,
    Unspecified,
}

impl PluginFlag {
    /// Every flag state, in the order commit invalidation expires them.
    pub const ALL: [PluginFlag; 3] = [
        PluginFlag::Disabled,
        PluginFlag::Enabled,
        PluginFlag::Unspecified,
    ];

    /// Whether parsing should execute plugin directives.
    ///
    /// Unspecified follows the parser default and executes them; the state
    /// still keys separately in the cache.
    pub fn executes(&self) -> bool {
        !matches!(self, PluginFlag::Disabled)
    }
}

impl fmt::Display for PluginFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PluginFlag::Enabled => "true",
            PluginFlag::Disabled => "false",
            PluginFlag::Unspecified => "null",
        };
        f.write_str(label)
    }
}

/// The purpose of the request a rendering context serves.
///
/// Only plain page views are eligible for document caching; editing and
/// preview flows always re-parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RequestPurpose {
    #[default]
    View,
    Edit,
    Preview,
    Diff,
    None,
}

impl fmt::Display for RequestPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestPurpose::View => "view",
            RequestPurpose::Edit => "edit",
            RequestPurpose::Preview => "preview",
            RequestPurpose::Diff => "diff",
            RequestPurpose::None => "none",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plugin_flag_key_labels() {
        assert_eq!(PluginFlag::Enabled.to_string(), "true");
        assert_eq!(PluginFlag::Disabled.to_string(), "false");
        assert_eq!(PluginFlag::Unspecified.to_string(), "null");
    }

    #[test]
    fn unspecified_flag_executes_plugins() {
        assert!(PluginFlag::Enabled.executes());
        assert!(PluginFlag::Unspecified.executes());
        assert!(!PluginFlag::Disabled.executes());
    }

    #[test]
    fn all_covers_each_state_once() {
        assert_eq!(PluginFlag::ALL.len(), 3);
        assert!(PluginFlag::ALL.contains(&PluginFlag::Enabled));
        assert!(PluginFlag::ALL.contains(&PluginFlag::Disabled));
        assert!(PluginFlag::ALL.contains(&PluginFlag::Unspecified));
    }

    #[test]
    fn view_is_the_default_purpose() {
        assert_eq!(RequestPurpose::default(), RequestPurpose::View);
    }
}
