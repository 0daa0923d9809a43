use std::{cmp::Ordering, collections::HashMap};

use crate::{
    domain::{DescendantCode, Handle, NumberingScheme, Person},
    numbering::{Frame, ROOT_CODE, Scheme, siblings},
    storage::Database,
};

/// d'Aboville numbering: dot-separated ordinals, one per generation.
///
/// A person whose parents are both descendants of the root gets a merged
/// code naming both lineages, e.g. `1.(1.1|2.1).1`. A person with several
/// coded parent families gets one sub-code per family, e.g.
/// `{a:[1.2], b:[1.(3|2.1).4]}`.
pub(crate) struct DAboville;

impl Scheme for DAboville {
    const KIND: NumberingScheme = NumberingScheme::DAboville;

    fn child_path(&self, parent: &str, ordinal: usize) -> String {
        format!("{parent}.{ordinal}")
    }

    fn restarts_double_families(&self) -> bool {
        true
    }

    fn resolve<D: Database>(
        &self,
        db: &D,
        person: &Person,
        frame: &Frame,
        codes: &HashMap<Handle, DescendantCode>,
    ) -> String {
        if frame.generation == 1 {
            return ROOT_CODE.to_string();
        }

        let path_code = |handle: Option<&Handle>| {
            handle
                .and_then(|h| codes.get(h))
                .and_then(DescendantCode::as_path)
        };

        let families = person.parent_families();
        let mut sub_codes = Vec::new();
        for (family_handle, letter) in families.iter().zip(('a'..='z').cycle()) {
            let Some(family) = db.family(family_handle) else {
                continue;
            };

            let mother = path_code(family.mother());
            let father = path_code(family.father());
            let coded_parent = family
                .father()
                .filter(|_| father.is_some())
                .or_else(|| family.mother().filter(|_| mother.is_some()));
            let Some(coded_parent) = coded_parent else {
                continue;
            };

            let ordinal = if frame.via_family.as_ref() == Some(family_handle) {
                Some(frame.ordinal)
            } else {
                self.ordinal_under(db, coded_parent, family_handle, person.handle(), codes)
            };
            let Some(ordinal) = ordinal else {
                continue;
            };

            let sub_code = match (mother, father) {
                (Some(mother), Some(father)) => converge(mother, father, ordinal),
                (Some(parent), None) | (None, Some(parent)) => format!("{parent}.{ordinal}"),
                (None, None) => continue,
            };
            sub_codes.push((letter, sub_code));
        }

        if sub_codes.is_empty() {
            return frame.path.clone();
        }
        if families.len() == 1 {
            return sub_codes.remove(0).1;
        }

        let parts: Vec<String> = sub_codes
            .iter()
            .map(|(letter, code)| format!("{letter}:[{code}]"))
            .collect();
        format!("{{{}}}", parts.join(", "))
    }

    fn record(&self, codes: &mut HashMap<Handle, DescendantCode>, person: &Handle, code: String) {
        codes.insert(person.clone(), DescendantCode::Path(code));
    }
}

impl DAboville {
    /// The ordinal `child` is numbered under among `parent`'s children in
    /// `family`.
    fn ordinal_under<D: Database>(
        &self,
        db: &D,
        parent: &Handle,
        family: &Handle,
        child: &Handle,
        codes: &HashMap<Handle, DescendantCode>,
    ) -> Option<usize> {
        let parent = db.person(parent)?;
        siblings(db, self, parent, codes)
            .into_iter()
            .find(|sibling| sibling.family == family && sibling.child == child)
            .map(|sibling| sibling.ordinal)
    }
}

/// Merges the codes of two descendant parents into their child's code.
///
/// The leading segments both codes share become the prefix. At least one
/// segment is left on each side, so identical codes still produce `(x|x)`.
fn converge(a: &str, b: &str, ordinal: usize) -> String {
    let a: Vec<&str> = a.split('.').collect();
    let b: Vec<&str> = b.split('.').collect();

    let limit = a.len().min(b.len()) - 1;
    let shared = a
        .iter()
        .zip(&b)
        .take(limit)
        .take_while(|(x, y)| x == y)
        .count();

    let mut suffixes = [&a[shared..], &b[shared..]];
    suffixes.sort_by(|x, y| compare_segments(x, y));
    let [first, second] = suffixes.map(|s| s.join("."));

    if shared == 0 {
        format!("({first}|{second}).{ordinal}")
    } else {
        format!("{}.({first}|{second}).{ordinal}", a[..shared].join("."))
    }
}

/// Shorter suffixes first, then segment by segment, numerically where both
/// segments are numbers.
fn compare_segments(x: &[&str], y: &[&str]) -> Ordering {
    x.len().cmp(&y.len()).then_with(|| {
        x.iter()
            .zip(y)
            .map(|(p, q)| match (p.parse::<u64>(), q.parse::<u64>()) {
                (Ok(p), Ok(q)) => p.cmp(&q),
                _ => p.cmp(q),
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}
