use std::collections::HashMap;

use crate::{
    domain::{DescendantCode, Handle, NumberingScheme},
    numbering::Scheme,
};

/// Modified Henry numbering: digits for the first nine children, then the
/// ordinal in parentheses.
pub(crate) struct ModifiedHenry;

impl Scheme for ModifiedHenry {
    const KIND: NumberingScheme = NumberingScheme::ModifiedHenry;

    fn child_path(&self, parent: &str, ordinal: usize) -> String {
        if ordinal < 10 {
            format!("{parent}{ordinal}")
        } else {
            format!("{parent}({ordinal})")
        }
    }

    fn record(&self, codes: &mut HashMap<Handle, DescendantCode>, person: &Handle, code: String) {
        codes.insert(person.clone(), DescendantCode::Path(code));
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
    fn tenth_child_is_parenthesised() {
        let children = ["c1", "c2", "c3", "c4", "c5", "c6", "c7", "c8", "c9", "c10", "c11"];
        let tree = tree(&[("f1", Some("r"), None, &children)]);
        let numbering = assign_numbers(&tree, &h("r"), depth(2), NumberingScheme::ModifiedHenry);

        assert_eq!(code_of(&numbering, "c9"), "19");
        assert_eq!(code_of(&numbering, "c10"), "1(10)");
        assert_eq!(code_of(&numbering, "c11"), "1(11)");
    }

    #[test]
    fn grandchildren_use_their_own_rule() {
        let children = ["c1", "c2", "c3", "c4", "c5", "c6", "c7", "c8", "c9", "c10"];
        let tree = tree(&[
            ("f1", Some("r"), None, &children),
            ("f2", Some("c10"), None, &["g"]),
        ]);
        let numbering = assign_numbers(&tree, &h("r"), depth(3), NumberingScheme::ModifiedHenry);

        assert_eq!(code_of(&numbering, "g"), "1(10)1");
    }

    #[test]
    fn later_visit_overwrites() {
        let tree = tree(&[
            ("f1", Some("r"), None, &["a", "b"]),
            ("f2", Some("a"), None, &["c"]),
            ("f3", Some("b"), None, &["c"]),
        ]);
        let numbering = assign_numbers(&tree, &h("r"), depth(3), NumberingScheme::ModifiedHenry);

        assert_eq!(code_of(&numbering, "c"), "121");
    }
}
