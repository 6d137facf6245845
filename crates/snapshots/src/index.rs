//! Alphabetical section index for fast scrolling through a sorted catalogue.

use serde::Serialize;
use std::collections::BTreeMap;

/// One section of the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    /// Upper-cased first character shared by the section's names
    pub key: String,
    /// Position of the first name in the section
    pub position: usize,
}

/// Maps first letters to positions in a name list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SectionIndex {
    sections: Vec<Section>,
}

impl SectionIndex {
    /// Build the index for `names` as they are ordered.
    ///
    /// Keys are upper-cased so lower-case names do not form sections after
    /// `Z`. Each key points at the first name that has it.
    pub fn build<S: AsRef<str>>(names: &[S]) -> Self {
        let mut first: BTreeMap<String, usize> = BTreeMap::new();
        for (position, name) in names.iter().enumerate() {
            if let Some(key) = section_key(name.as_ref()) {
                first.entry(key).or_insert(position);
            }
        }

        Self {
            sections: first
                .into_iter()
                .map(|(key, position)| Section { key, position })
                .collect(),
        }
    }

    /// Sections sorted by key.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Position of the first name in section `section`.
    pub fn position_for_section(&self, section: usize) -> Option<usize> {
        self.sections.get(section).map(|s| s.position)
    }

    /// Section containing the name at `position` in `names`.
    pub fn section_for_position<S: AsRef<str>>(&self, names: &[S], position: usize) -> Option<usize> {
        let key = section_key(names.get(position)?.as_ref())?;
        self.sections.binary_search_by(|s| s.key.cmp(&key)).ok()
    }

    /// Section with the given key, ignoring case.
    pub fn find(&self, key: &str) -> Option<&Section> {
        let key = key.to_uppercase();
        self.sections.iter().find(|s| s.key == key)
    }
}

fn section_key(name: &str) -> Option<String> {
    name.chars().next().map(|c| c.to_uppercase().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> Vec<&'static str> {
        let mut names = vec![
            "Manic Miner.z80",
            "Atic Atac.z80",
            "Jetpac.z80",
            "Jet Set Willy.z80",
            "3D Deathchase.z80",
            "alchemist.z80",
            "Sabre Wulf.z80",
        ];
        names.sort();
        names
    }

    #[test]
    fn test_sections_sorted_with_first_positions() {
        let names = names();
        // ["3D Deathchase", "Atic Atac", "Jet Set Willy", "Jetpac", "Manic Miner", "Sabre Wulf", "alchemist"]
        let index = SectionIndex::build(&names);

        let keys: Vec<&str> = index.sections().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["3", "A", "J", "M", "S"]);
        assert_eq!(index.position_for_section(0), Some(0));
        assert_eq!(index.position_for_section(1), Some(1));
        assert_eq!(index.position_for_section(2), Some(2));
        assert_eq!(index.position_for_section(4), Some(5));
        assert_eq!(index.position_for_section(5), None);
    }

    #[test]
    fn test_lower_case_names_share_upper_case_section() {
        let names = names();
        let index = SectionIndex::build(&names);

        // "alchemist" sorts last but belongs to "A", which starts at "Atic Atac".
        assert_eq!(index.section_for_position(&names, 6), Some(1));
        assert_eq!(index.find("a").map(|s| s.position), Some(1));
    }

    #[test]
    fn test_section_for_position() {
        let names = names();
        let index = SectionIndex::build(&names);

        assert_eq!(index.section_for_position(&names, 3), Some(2));
        assert_eq!(index.section_for_position(&names, 4), Some(3));
        assert_eq!(index.section_for_position(&names, 99), None);
    }

    #[test]
    fn test_empty_names_are_skipped() {
        let index = SectionIndex::build(&["", "Zzap.z80"]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.position_for_section(0), Some(1));
    }

    #[test]
    fn test_empty_catalogue() {
        let index = SectionIndex::build::<&str>(&[]);
        assert!(index.is_empty());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn every_name_maps_to_a_section_starting_no_later(
                mut names in proptest::collection::vec("[a-zA-Z0-9][a-z ]{0,8}", 1..40)
            ) {
                names.sort();
                let index = SectionIndex::build(&names);

                for position in 0..names.len() {
                    let section = index.section_for_position(&names, position).unwrap();
                    let first = index.position_for_section(section).unwrap();
                    prop_assert!(first <= position);
                    prop_assert_eq!(
                        section_key(&names[first]),
                        section_key(&names[position])
                    );
                }
            }
        }
    }
}
