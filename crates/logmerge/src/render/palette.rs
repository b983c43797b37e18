//! Palette — per-source labels and colours.
//!
//! Label policy:
//! 1. `no_prefix` → no labels at all
//! 2. Colourizing without explicit prefixes → no labels (colour identifies the source)
//! 3. Otherwise source N gets prefix N from the list, or `logN` past its end
//!
//! Source N (1-based) is drawn in 256-colour index N when colourizing.

use std::collections::HashMap;

use crate::source::SourceId;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceStyle {
    /// Printed before every line, including its trailing space
    pub label: Option<String>,
    pub color: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct Palette {
    styles: HashMap<SourceId, SourceStyle>,
}

impl Palette {
    pub fn assign(ids: &[SourceId], prefixes: &[String], no_prefix: bool, colorize: bool) -> Self {
        let suppress_labels = no_prefix || (colorize && prefixes.is_empty());

        let styles = ids
            .iter()
            .enumerate()
            .map(|(idx, id)| {
                let n = idx + 1;
                let label = (!suppress_labels).then(|| match prefixes.get(idx) {
                    Some(prefix) => format!("{} ", prefix),
                    None => format!("log{} ", n),
                });
                // More than 255 sources: the overflow is drawn uncoloured
                let color = if colorize { u8::try_from(n).ok() } else { None };
                (id.clone(), SourceStyle { label, color })
            })
            .collect();

        Self { styles }
    }

    /// Style for `id`; unknown sources render plain.
    pub fn style(&self, id: &SourceId) -> SourceStyle {
        self.styles.get(id).cloned().unwrap_or_default()
    }
}
