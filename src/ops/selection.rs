use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::model::TagView;

/// Checked tags plus the tag universe they narrow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSelection {
    selected: BTreeSet<String>,
    /// Every known tag, in the order the backend listed them
    tags: Vec<TagView>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Click on a tag. An unrelated tag starts a fresh narrowing context:
    /// every other tag is unchecked and only the clicked one is selected.
    /// A related tag flips membership.
    pub fn toggle(&mut self, tag: &str) {
        if !self.is_related(tag) {
            self.selected.clear();
            self.selected.insert(tag.to_string());
        } else if !self.selected.remove(tag) {
            self.selected.insert(tag.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, tag: &str) -> bool {
        self.selected.contains(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected tags in sorted order; this is the query payload.
    pub fn current(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn tags(&self) -> &[TagView] {
        &self.tags
    }

    /// Replace the tag universe from an unfiltered listing.
    ///
    /// Counts are unfiltered until `set_related` narrows them. A tag whose
    /// relatedness is not yet known keeps its previous flag; new tags start
    /// related.
    pub fn set_tags(&mut self, all: &IndexMap<String, u64>) {
        let previous = std::mem::take(&mut self.tags);
        self.tags = all
            .iter()
            .map(|(name, &count)| {
                let related = self.selected.is_empty()
                    || previous
                        .iter()
                        .find(|t| &t.name == name)
                        .is_none_or(|t| t.related);
                TagView {
                    name: name.clone(),
                    count,
                    related,
                }
            })
            .collect();
    }

    /// Mark each known tag related iff it appears in `related`, taking its
    /// filtered count. No related tags for a non-empty selection means all
    /// tags are related, so the pane never dead-ends.
    pub fn set_related(&mut self, related: &IndexMap<String, u64>) {
        if self.selected.is_empty() || related.is_empty() {
            for tag in &mut self.tags {
                tag.related = true;
            }
            return;
        }
        for tag in &mut self.tags {
            match related.get(&tag.name) {
                Some(&count) => {
                    tag.related = true;
                    tag.count = count;
                }
                None => {
                    tag.related = false;
                    tag.count = 0;
                }
            }
        }
    }

    /// Whether a tag is currently marked related. Unknown tags are not.
    pub fn is_related(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.name == tag && t.related)
    }
}
