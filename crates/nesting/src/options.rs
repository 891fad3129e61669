//! Configuration for the nesting transform.
//!
//! [`NestingOptions`] is what callers build; it is resolved once into
//! [`AtRuleNames`] when a [`Nesting`](crate::Nesting) is created.
//!
//! ```rust
//! use nesting::NestingOptions;
//!
//! let options = NestingOptions::new()
//!     .with_bubble("@phone")
//!     .with_unwrap("page")
//!     .with_preserve_empty(true);
//!
//! assert_eq!(options.bubble, vec!["@phone"]);
//! ```

use std::collections::HashSet;

use phf::phf_set;

/// Grouping at-rules that bubble out of rules, merging selectors inward.
pub static DEFAULT_BUBBLE: phf::Set<&'static str> = phf_set! {
    "media", "supports", "layer", "container", "starting-style",
};

/// At-rules lifted to the top level without selector merging.
pub static DEFAULT_UNWRAP: phf::Set<&'static str> = phf_set! {
    "document", "font-face", "keyframes", "-webkit-keyframes", "-moz-keyframes",
};

/// Default name of the escape directive.
pub const DEFAULT_ROOT_RULE_NAME: &str = "at-root";

/// User-facing options. Names may be written with or without a leading `@`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NestingOptions {
    /// Extra at-rule names that bubble like `@media`.
    pub bubble: Vec<String>,
    /// Extra at-rule names that unwrap like `@font-face`.
    pub unwrap: Vec<String>,
    /// Replaces `at-root` as the escape directive's name.
    pub root_rule_name: Option<String>,
    /// Keep rules that became empty after their children moved out.
    pub preserve_empty: bool,
}

impl NestingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bubble(mut self, name: impl Into<String>) -> Self {
        self.bubble.push(name.into());
        self
    }

    pub fn with_unwrap(mut self, name: impl Into<String>) -> Self {
        self.unwrap.push(name.into());
        self
    }

    pub fn with_root_rule_name(mut self, name: impl Into<String>) -> Self {
        self.root_rule_name = Some(name.into());
        self
    }

    pub fn with_preserve_empty(mut self, preserve_empty: bool) -> Self {
        self.preserve_empty = preserve_empty;
        self
    }
}

/// How the rewriter treats an at-rule found inside a rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AtRuleRole {
    Escape,
    Bubble,
    Unwrap,
    Other,
}

/// Resolved at-rule name tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtRuleNames {
    bubble: HashSet<String>,
    unwrap: HashSet<String>,
    root_rule: String,
}

fn strip_marker(name: &str) -> &str {
    name.strip_prefix('@').unwrap_or(name)
}

fn name_set(defaults: &phf::Set<&'static str>, custom: &[String]) -> HashSet<String> {
    defaults
        .iter()
        .map(|name| name.to_string())
        .chain(custom.iter().map(|name| strip_marker(name).to_string()))
        .collect()
}

impl AtRuleNames {
    pub fn from_options(options: &NestingOptions) -> Self {
        let root_rule = options
            .root_rule_name
            .as_deref()
            .map(strip_marker)
            .unwrap_or(DEFAULT_ROOT_RULE_NAME);

        Self {
            bubble: name_set(&DEFAULT_BUBBLE, &options.bubble),
            unwrap: name_set(&DEFAULT_UNWRAP, &options.unwrap),
            root_rule: root_rule.to_string(),
        }
    }

    pub fn bubbles(&self, name: &str) -> bool {
        self.bubble.contains(name)
    }

    pub fn unwraps(&self, name: &str) -> bool {
        self.unwrap.contains(name)
    }

    pub fn is_root_rule(&self, name: &str) -> bool {
        self.root_rule == name
    }

    pub fn root_rule(&self) -> &str {
        &self.root_rule
    }

    /// The directive name wins over the bubble list, which wins over the
    /// unwrap list.
    pub(crate) fn role(&self, name: &str) -> AtRuleRole {
        if self.is_root_rule(name) {
            AtRuleRole::Escape
        } else if self.bubbles(name) {
            AtRuleRole::Bubble
        } else if self.unwraps(name) {
            AtRuleRole::Unwrap
        } else {
            AtRuleRole::Other
        }
    }
}
