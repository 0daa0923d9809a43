use std::{collections::HashMap, num::NonZeroUsize};

use tracing::debug;

use crate::{
    domain::{DescendantCode, Handle, NumberingScheme},
    numbering::{Numbering, Scheme},
};

/// Record (Modified Register) numbering: plain sequence numbers, handed out
/// generation by generation once the walk is complete.
///
/// A person reached through several lineages is numbered once, at their
/// first appearance.
pub(crate) struct Record;

impl Scheme for Record {
    const KIND: NumberingScheme = NumberingScheme::Record;

    fn child_path(&self, _parent: &str, _ordinal: usize) -> String {
        String::new()
    }

    fn record(&self, _codes: &mut HashMap<Handle, DescendantCode>, _person: &Handle, _code: String) {}

    fn finalize(&self, numbering: &mut Numbering) {
        let mut next = NonZeroUsize::MIN;

        for bucket in &numbering.generations {
            for index in bucket.iter() {
                let Some(person) = numbering.index_to_person.get(index) else {
                    continue;
                };
                if numbering.codes.contains_key(person) {
                    continue;
                }
                numbering
                    .codes
                    .insert(person.clone(), DescendantCode::Sequence(next));
                next = next.saturating_add(1);
            }
        }

        debug!(numbered = next.get() - 1, "assigned record numbers");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbering::{
        assign_numbers,
        tests::{code_of, depth, h, tree},
    };

    #[test]
    fn numbers_follow_generations() {
        let tree = tree(&[
            ("f1", Some("r"), None, &["a", "b"]),
            ("f2", Some("a"), None, &["a1", "a2"]),
            ("f3", Some("b"), None, &["b1"]),
        ]);
        let numbering = assign_numbers(&tree, &h("r"), depth(3), NumberingScheme::Record);

        // depth-first visits, breadth-first numbers
        assert_eq!(code_of(&numbering, "r"), "1");
        assert_eq!(code_of(&numbering, "a"), "2");
        assert_eq!(code_of(&numbering, "b"), "3");
        assert_eq!(code_of(&numbering, "a1"), "4");
        assert_eq!(code_of(&numbering, "a2"), "5");
        assert_eq!(code_of(&numbering, "b1"), "6");
    }

    #[test]
    fn person_reached_twice_is_numbered_once() {
        let tree = tree(&[
            ("f1", Some("r"), None, &["a", "b"]),
            ("f2", Some("a"), None, &["c"]),
            ("f3", Some("b"), None, &["c", "d"]),
        ]);
        let numbering = assign_numbers(&tree, &h("r"), depth(3), NumberingScheme::Record);

        assert_eq!(numbering.len(), 6);
        assert_eq!(numbering.codes().len(), 5);
        assert_eq!(code_of(&numbering, "c"), "4");
        assert_eq!(code_of(&numbering, "d"), "5");

        let mut numbers: Vec<usize> = numbering
            .codes()
            .values()
            .filter_map(DescendantCode::as_sequence)
            .map(NonZeroUsize::get)
            .collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }
}
