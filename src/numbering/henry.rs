use std::collections::HashMap;

use crate::{
    domain::{DescendantCode, Handle, NumberingScheme},
    numbering::Scheme,
};

/// Sibling symbols: `1`–`9`, then `A`–`Z`.
const SYMBOLS: &[u8; 35] = b"123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Henry numbering: one symbol per generation.
///
/// A person reached through two lineages keeps the smaller code.
pub(crate) struct Henry;

impl Scheme for Henry {
    const KIND: NumberingScheme = NumberingScheme::Henry;

    fn child_path(&self, parent: &str, ordinal: usize) -> String {
        match ordinal.checked_sub(1).and_then(|i| SYMBOLS.get(i)) {
            Some(&symbol) => format!("{parent}{}", char::from(symbol)),
            // alphabet exhausted
            None => format!("{parent}({ordinal})"),
        }
    }

    fn record(&self, codes: &mut HashMap<Handle, DescendantCode>, person: &Handle, code: String) {
        let code = DescendantCode::Path(code);
        match codes.get(person) {
            Some(existing) if *existing <= code => {}
            _ => {
                codes.insert(person.clone(), code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::numbering::{
        assign_numbers,
        tests::{code_of, depth, h, tree},
    };

    #[test_case(1, "11")]
    #[test_case(9, "19")]
    #[test_case(10, "1A")]
    #[test_case(35, "1Z")]
    #[test_case(36, "1(36)")]
    fn child_symbols(ordinal: usize, expected: &str) {
        assert_eq!(Henry.child_path("1", ordinal), expected);
    }

    #[test]
    fn smaller_code_wins_on_revisit() {
        // c is a child of both a (11) and b (12)
        let tree = tree(&[
            ("f1", Some("r"), None, &["a", "b"]),
            ("f2", Some("a"), None, &["x", "c"]),
            ("f3", Some("b"), None, &["c"]),
        ]);
        let numbering = assign_numbers(&tree, &h("r"), depth(3), NumberingScheme::Henry);

        assert_eq!(code_of(&numbering, "c"), "112");
        assert_eq!(numbering.index_to_person().values().filter(|p| **p == h("c")).count(), 2);
    }

    #[test]
    fn each_generation_adds_one_symbol() {
        let tree = tree(&[
            ("f1", Some("r"), None, &["a", "b"]),
            ("f2", Some("b"), None, &["c"]),
            ("f3", Some("c"), None, &["d"]),
        ]);
        let numbering = assign_numbers(&tree, &h("r"), depth(4), NumberingScheme::Henry);

        assert_eq!(code_of(&numbering, "b"), "12");
        assert_eq!(code_of(&numbering, "c"), "121");
        assert_eq!(code_of(&numbering, "d"), "1211");
    }

    #[test]
    fn distinct_lineages_never_share_a_code() {
        // r has a second family, so c is a half-sibling of a and b
        let tree = tree(&[
            ("f1", Some("r"), Some("w1"), &["a", "b"]),
            ("f2", Some("r"), Some("w2"), &["c"]),
            ("f3", Some("a"), None, &["d", "e"]),
            ("f4", Some("c"), None, &["f"]),
            ("f5", Some("b"), None, &["g"]),
        ]);
        let numbering = assign_numbers(&tree, &h("r"), depth(3), NumberingScheme::Henry);

        let codes: std::collections::HashSet<String> =
            numbering.codes().values().map(ToString::to_string).collect();
        assert_eq!(codes.len(), numbering.codes().len());
        assert_eq!(code_of(&numbering, "c"), "13");
        assert_eq!(code_of(&numbering, "f"), "131");
    }
}
