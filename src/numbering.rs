//! Descendant numbering.
//!
//! [`assign_numbers`] walks the descendants of a root person and labels each
//! one under a [`NumberingScheme`]. The walk is shared; each scheme supplies
//! its own child labels, merge policy and finalisation through the
//! [`Scheme`] trait.

use std::{
    collections::{BTreeMap, HashMap},
    num::NonZeroUsize,
};

use nonempty::NonEmpty;
use tracing::{debug, instrument, warn};

use crate::{
    domain::{DescendantCode, Handle, NumberingScheme, Person},
    storage::Database,
};

mod daboville;
mod henry;
mod modified_henry;
mod record;

/// The code every scheme gives the root person.
pub const ROOT_CODE: &str = "1";

/// The result of numbering a descendant tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Numbering {
    scheme: NumberingScheme,
    index_to_person: BTreeMap<usize, Handle>,
    generations: Vec<NonEmpty<usize>>,
    codes: HashMap<Handle, DescendantCode>,
}

impl Numbering {
    fn empty(scheme: NumberingScheme) -> Self {
        Self {
            scheme,
            index_to_person: BTreeMap::new(),
            generations: Vec::new(),
            codes: HashMap::new(),
        }
    }

    /// The scheme the codes were produced with.
    #[must_use]
    pub const fn scheme(&self) -> NumberingScheme {
        self.scheme
    }

    /// Traversal index → person.
    ///
    /// Indices are dense, starting at 1. A person reached through two
    /// lineages has two indices.
    #[must_use]
    pub const fn index_to_person(&self) -> &BTreeMap<usize, Handle> {
        &self.index_to_person
    }

    /// The person visited at `index`.
    #[must_use]
    pub fn person_at(&self, index: usize) -> Option<&Handle> {
        self.index_to_person.get(&index)
    }

    /// Traversal indices grouped by generation, root generation first.
    #[must_use]
    pub fn generations(&self) -> &[NonEmpty<usize>] {
        &self.generations
    }

    /// Person → canonical code.
    #[must_use]
    pub const fn codes(&self) -> &HashMap<Handle, DescendantCode> {
        &self.codes
    }

    /// The canonical code of `person`, if they were numbered.
    #[must_use]
    pub fn code(&self, person: &Handle) -> Option<&DescendantCode> {
        self.codes.get(person)
    }

    /// Number of visits made.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index_to_person.len()
    }

    /// Whether nothing was visited (the root did not resolve).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index_to_person.is_empty()
    }

    fn record_visit(&mut self, index: usize, person: Handle, generation: usize) {
        self.index_to_person.insert(index, person);
        match self.generations.get_mut(generation - 1) {
            Some(bucket) => bucket.push(index),
            None => self.generations.push(NonEmpty::new(index)),
        }
    }
}

/// One pending visit on the traversal worklist.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    /// The person to visit.
    pub person: Handle,
    /// 1-based generation; the root is generation 1.
    pub generation: usize,
    /// 1-based position among the parent's children.
    pub ordinal: usize,
    /// The family the person was reached through. `None` for the root.
    pub via_family: Option<Handle>,
    /// The path code built along this route.
    pub path: String,
}

/// The parts of a numbering convention that differ between schemes.
pub(crate) trait Scheme {
    /// Which public scheme this is.
    const KIND: NumberingScheme;

    /// The path code of the `ordinal`-th child of a person with path `parent`.
    fn child_path(&self, parent: &str, ordinal: usize) -> String;

    /// Whether a family whose parents are both numbered already restarts its
    /// children's ordinals at 1.
    fn restarts_double_families(&self) -> bool {
        false
    }

    /// The code for this visit, before merging with any earlier one.
    fn resolve<D: Database>(
        &self,
        _db: &D,
        _person: &Person,
        frame: &Frame,
        _codes: &HashMap<Handle, DescendantCode>,
    ) -> String {
        frame.path.clone()
    }

    /// Stores `code` for `person`, merging with any code already held.
    fn record(&self, codes: &mut HashMap<Handle, DescendantCode>, person: &Handle, code: String);

    /// Runs once the traversal is complete.
    fn finalize(&self, _numbering: &mut Numbering) {}
}

/// Numbers the descendants of `root` under `scheme`.
///
/// Generation 1 is the root itself, so `max_generations = 1` visits only the
/// root. If `root` does not resolve the result is empty.
#[must_use]
#[instrument(skip(db))]
pub fn assign_numbers<D: Database>(
    db: &D,
    root: &Handle,
    max_generations: NonZeroUsize,
    scheme: NumberingScheme,
) -> Numbering {
    match scheme {
        NumberingScheme::Henry => traverse(db, root, max_generations, &henry::Henry),
        NumberingScheme::ModifiedHenry => {
            traverse(db, root, max_generations, &modified_henry::ModifiedHenry)
        }
        NumberingScheme::DAboville => traverse(db, root, max_generations, &daboville::DAboville),
        NumberingScheme::Record => traverse(db, root, max_generations, &record::Record),
    }
}

fn traverse<D: Database, S: Scheme>(
    db: &D,
    root: &Handle,
    max_generations: NonZeroUsize,
    scheme: &S,
) -> Numbering {
    let mut numbering = Numbering::empty(S::KIND);

    let mut stack = vec![Frame {
        person: root.clone(),
        generation: 1,
        ordinal: 1,
        via_family: None,
        path: ROOT_CODE.to_string(),
    }];

    while let Some(frame) = stack.pop() {
        let Some(person) = db.person(&frame.person) else {
            if frame.generation == 1 {
                warn!(root = %frame.person, "root person not found");
            } else {
                warn!(person = %frame.person, "skipping unresolved child reference");
            }
            continue;
        };

        let index = numbering.len() + 1;
        numbering.record_visit(index, frame.person.clone(), frame.generation);

        let code = scheme.resolve(db, person, &frame, &numbering.codes);
        debug!(index, generation = frame.generation, person = %frame.person, %code, "visit");
        scheme.record(&mut numbering.codes, &frame.person, code);

        if frame.generation >= max_generations.get() {
            continue;
        }

        let children = child_frames(db, scheme, person, &frame, &numbering.codes);
        // reversed so the first child is popped first
        stack.extend(children.into_iter().rev());
    }

    scheme.finalize(&mut numbering);
    numbering
}

fn child_frames<D: Database, S: Scheme>(
    db: &D,
    scheme: &S,
    person: &Person,
    frame: &Frame,
    codes: &HashMap<Handle, DescendantCode>,
) -> Vec<Frame> {
    for family_handle in person.families() {
        if db.family(family_handle).is_none() {
            warn!(person = %frame.person, family = %family_handle, "skipping unresolved family");
        }
    }

    siblings(db, scheme, person, codes)
        .into_iter()
        .map(|sibling| Frame {
            person: sibling.child.clone(),
            generation: frame.generation + 1,
            ordinal: sibling.ordinal,
            via_family: Some(sibling.family.clone()),
            path: scheme.child_path(&frame.path, sibling.ordinal),
        })
        .collect()
}

/// A child of `parent` together with the ordinal it is numbered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Sibling<'a> {
    pub family: &'a Handle,
    pub child: &'a Handle,
    pub ordinal: usize,
}

/// Every child of `parent`, in family then list order, with its ordinal.
///
/// Ordinals run on across all of the parent's families. When the scheme
/// restarts double families, a family whose parents are both numbered counts
/// its children from 1 without advancing the running ordinal.
pub(crate) fn siblings<'a, D: Database, S: Scheme>(
    db: &'a D,
    scheme: &S,
    parent: &'a Person,
    codes: &HashMap<Handle, DescendantCode>,
) -> Vec<Sibling<'a>> {
    let mut siblings = Vec::new();
    let mut running = 1;

    for family_handle in parent.families() {
        let Some(family) = db.family(family_handle) else {
            continue;
        };

        let double = scheme.restarts_double_families()
            && family.father().is_some_and(|p| codes.contains_key(p))
            && family.mother().is_some_and(|p| codes.contains_key(p));
        let mut local = 1;

        for child in family.children() {
            let ordinal = if double { local } else { running };
            siblings.push(Sibling {
                family: family_handle,
                child,
                ordinal,
            });

            if double {
                local += 1;
            } else {
                running += 1;
            }
        }
    }

    siblings
}

#[cfg(test)]
pub(crate) mod tests {
    use test_case::test_case;

    use super::*;
    use crate::{
        domain::{Family, Name},
        storage::FamilyTree,
    };

    pub(crate) fn h(s: &str) -> Handle {
        Handle::try_from(s).unwrap()
    }

    pub(crate) fn depth(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    /// Builds a tree from `(family, father, mother, children)` tuples. Every
    /// handle mentioned becomes a person.
    pub(crate) fn tree(families: &[(&str, Option<&str>, Option<&str>, &[&str])]) -> FamilyTree {
        let mut tree = FamilyTree::default();
        let mut seen = std::collections::HashSet::new();
        for (_, father, mother, children) in families {
            for name in father.iter().chain(mother.iter()).chain(children.iter()) {
                if seen.insert(*name) {
                    tree.insert_person(Person::new(h(name), h(name), Name::new(*name, "Test")))
                        .unwrap();
                }
            }
        }
        for (handle, father, mother, children) in families {
            let mut family = Family::new(h(handle), h(handle));
            if let Some(father) = father {
                family = family.with_father(h(father));
            }
            if let Some(mother) = mother {
                family = family.with_mother(h(mother));
            }
            for child in *children {
                family = family.with_child(h(child));
            }
            tree.insert_family(family).unwrap();
        }
        tree
    }

    pub(crate) fn code_of(numbering: &Numbering, person: &str) -> String {
        numbering.code(&h(person)).unwrap().to_string()
    }

    fn buckets(numbering: &Numbering) -> Vec<Vec<usize>> {
        numbering
            .generations()
            .iter()
            .map(|bucket| bucket.iter().copied().collect())
            .collect()
    }

    fn two_children() -> FamilyTree {
        tree(&[("f1", Some("r"), Some("w"), &["c1", "c2"])])
    }

    #[test]
    fn root_and_two_children_under_henry() {
        let numbering = assign_numbers(&two_children(), &h("r"), depth(2), NumberingScheme::Henry);

        assert_eq!(numbering.person_at(1), Some(&h("r")));
        assert_eq!(numbering.person_at(2), Some(&h("c1")));
        assert_eq!(numbering.person_at(3), Some(&h("c2")));
        assert_eq!(code_of(&numbering, "r"), "1");
        assert_eq!(code_of(&numbering, "c1"), "11");
        assert_eq!(code_of(&numbering, "c2"), "12");
        assert_eq!(buckets(&numbering), vec![vec![1], vec![2, 3]]);
    }

    #[test_case(NumberingScheme::Henry; "henry")]
    #[test_case(NumberingScheme::ModifiedHenry; "modified henry")]
    #[test_case(NumberingScheme::DAboville; "daboville")]
    #[test_case(NumberingScheme::Record; "record")]
    fn root_gets_seed_code(scheme: NumberingScheme) {
        let numbering = assign_numbers(&two_children(), &h("r"), depth(5), scheme);
        assert_eq!(code_of(&numbering, "r"), "1");
    }

    #[test_case(NumberingScheme::Henry; "henry")]
    #[test_case(NumberingScheme::ModifiedHenry; "modified henry")]
    #[test_case(NumberingScheme::DAboville; "daboville")]
    #[test_case(NumberingScheme::Record; "record")]
    fn depth_one_visits_only_root(scheme: NumberingScheme) {
        let numbering = assign_numbers(&two_children(), &h("r"), depth(1), scheme);
        assert_eq!(numbering.len(), 1);
        assert_eq!(buckets(&numbering), vec![vec![1]]);
        assert!(numbering.code(&h("c1")).is_none());
    }

    #[test]
    fn unresolved_root_gives_empty_numbering() {
        let numbering = assign_numbers(&two_children(), &h("nobody"), depth(3), NumberingScheme::Henry);
        assert!(numbering.is_empty());
        assert!(numbering.generations().is_empty());
        assert!(numbering.codes().is_empty());
    }

    fn three_generations() -> FamilyTree {
        tree(&[
            ("f1", Some("r"), None, &["a", "b"]),
            ("f2", Some("a"), None, &["a1", "a2"]),
            ("f3", Some("b"), None, &["b1"]),
        ])
    }

    #[test_case(NumberingScheme::Henry; "henry")]
    #[test_case(NumberingScheme::ModifiedHenry; "modified henry")]
    #[test_case(NumberingScheme::DAboville; "daboville")]
    #[test_case(NumberingScheme::Record; "record")]
    fn indices_are_dense_and_buckets_partition_them(scheme: NumberingScheme) {
        let numbering = assign_numbers(&three_generations(), &h("r"), depth(10), scheme);

        let indices: Vec<usize> = numbering.index_to_person().keys().copied().collect();
        assert_eq!(indices, (1..=6).collect::<Vec<_>>());

        let mut bucketed: Vec<usize> = buckets(&numbering).into_iter().flatten().collect();
        bucketed.sort_unstable();
        assert_eq!(bucketed, indices);

        // pre-order: a's subtree is visited before b
        assert_eq!(buckets(&numbering), vec![vec![1], vec![2, 5], vec![3, 4, 6]]);
    }

    #[test_case(NumberingScheme::Henry; "henry")]
    #[test_case(NumberingScheme::ModifiedHenry; "modified henry")]
    #[test_case(NumberingScheme::DAboville; "daboville")]
    #[test_case(NumberingScheme::Record; "record")]
    fn numbering_is_idempotent(scheme: NumberingScheme) {
        let tree = three_generations();
        let first = assign_numbers(&tree, &h("r"), depth(10), scheme);
        let second = assign_numbers(&tree, &h("r"), depth(10), scheme);
        assert_eq!(first, second);
    }

    #[test]
    fn ordinals_run_across_families() {
        let tree = tree(&[
            ("f1", Some("r"), Some("w1"), &["a", "b"]),
            ("f2", Some("r"), Some("w2"), &["c"]),
        ]);
        let numbering = assign_numbers(&tree, &h("r"), depth(2), NumberingScheme::Henry);
        assert_eq!(code_of(&numbering, "c"), "13");
    }

    #[test]
    fn dangling_child_consumes_an_ordinal_but_no_index() {
        let mut tree = tree(&[("f1", Some("r"), None, &["a"])]);
        tree.insert_family(
            Family::new(h("f2"), h("f2"))
                .with_father(h("r"))
                .with_child(h("ghost"))
                .with_child(h("a")),
        )
        .unwrap();

        let numbering = assign_numbers(&tree, &h("r"), depth(2), NumberingScheme::Henry);

        // a is reached twice: once as child 1, once as child 3
        assert_eq!(numbering.len(), 3);
        assert_eq!(code_of(&numbering, "a"), "11");
        assert!(numbering.code(&h("ghost")).is_none());
    }

    #[test]
    fn ancestry_loop_terminates() {
        let tree = tree(&[
            ("f1", Some("a"), None, &["b"]),
            ("f2", Some("b"), None, &["a"]),
        ]);
        let numbering = assign_numbers(&tree, &h("a"), depth(5), NumberingScheme::DAboville);
        assert_eq!(numbering.len(), 5);
        assert_eq!(numbering.generations().len(), 5);
    }
}
