//! Parent-company lookup table.
//!
//! Loaded once per run from a plain-text file, one name fragment per line.
//! Matching is first-wins substring containment in declared order, so more
//! specific fragments belong earlier in the file.

use std::path::Path;

use anyhow::{Context, Result};

#[derive(Debug, Clone, Default)]
pub struct ParentLookup {
    fragments: Vec<String>,
}

impl ParentLookup {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Reading parent company list {path:?}"))?;
        Ok(Self::from_fragments(
            contents.lines().map(|line| line.trim().to_string()),
        ))
    }

    pub fn from_fragments<I>(fragments: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        ParentLookup {
            fragments: fragments
                .into_iter()
                .filter(|fragment| !fragment.is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// First fragment contained in the employer name, in declared order.
    pub fn match_label(&self, employer_name: &str) -> Option<&str> {
        self.fragments
            .iter()
            .find(|fragment| employer_name.contains(fragment.as_str()))
            .map(String::as_str)
    }
}
