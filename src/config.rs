//! Tree construction options.

use serde::{Deserialize, Serialize};

use crate::strategy::Strategy;

/// Options a tree is created with. Every field has a default, so a caller can
/// deserialize a partial document such as `{"strategy": "avl"}`.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub strategy: Strategy,
    /// Collect the per-operation event trace. Turn off when nothing replays it.
    pub record_events: bool,
    /// Run the full invariant check after every insert and delete.
    pub verify: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            strategy: Strategy::default(),
            record_events: true,
            verify: cfg!(debug_assertions),
        }
    }
}

impl TreeConfig {
    pub fn new(strategy: Strategy) -> Self {
        TreeConfig {
            strategy,
            ..TreeConfig::default()
        }
    }

    pub fn record_events(mut self, record_events: bool) -> Self {
        self.record_events = record_events;
        self
    }

    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_documents_fill_in_defaults() {
        let config: TreeConfig = serde_json::from_str(r#"{"strategy":"avl"}"#).unwrap();
        assert_eq!(config.strategy, Strategy::Avl);
        assert!(config.record_events);
        assert_eq!(config.verify, cfg!(debug_assertions));

        let config: TreeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TreeConfig::default());
    }

    #[test]
    fn builder_overrides() {
        let config = TreeConfig::new(Strategy::None)
            .record_events(false)
            .verify(true);
        assert_eq!(config.strategy, Strategy::None);
        assert!(!config.record_events);
        assert!(config.verify);
    }
}
