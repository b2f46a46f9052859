use crate::vdom::{NodeKind, VirtualNode};
use prism_adapter::{FilterState, TypeFilter};
use regex::Regex;
use std::collections::HashSet;

/// Panel filters with their patterns compiled.
#[derive(Debug, Default)]
pub struct Filters {
    patterns: Vec<Regex>,
    types: HashSet<TypeFilter>,
}

impl Filters {
    /// Disabled entries are skipped; patterns that do not compile are logged and skipped.
    pub fn compile(state: &FilterState) -> Self {
        let patterns = state
            .regex
            .iter()
            .filter(|f| f.enabled)
            .filter_map(|f| match Regex::new(&f.value) {
                Ok(re) => Some(re),
                Err(err) => {
                    tracing::warn!("Ignoring filter `{}`: {}", f.value, err);
                    None
                }
            })
            .collect();

        Self {
            patterns,
            types: state.types.clone(),
        }
    }

    pub fn hides(&self, node: &VirtualNode) -> bool {
        let by_type = match node.kind {
            NodeKind::Element { .. } => self.types.contains(&TypeFilter::Dom),
            NodeKind::Text { .. } => self.types.contains(&TypeFilter::Text),
            NodeKind::Fragment => self.types.contains(&TypeFilter::Fragment),
            NodeKind::Component { .. } => false,
        };
        if by_type {
            return true;
        }

        node.is_component() && {
            let name = node.display_name();
            self.patterns.iter().any(|re| re.is_match(&name))
        }
    }
}
