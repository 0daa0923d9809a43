//! This bench numbers a synthetic family tree: every person has two
//! families of three children each, and cousins of the last generation
//! marry so that d'Aboville has codes to merge.

#![allow(missing_docs)]

use std::num::NonZeroUsize;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use descendants::{
    FamilyTree, Handle, NumberingScheme, assign_numbers,
    domain::{Family, Name, Person},
};

const DEPTH: usize = 7;

fn handle(s: String) -> Handle {
    Handle::new(s).unwrap()
}

/// Builds a tree with `2 * 3` children per person down to `depth`
/// generations. Returns the tree and the root handle.
fn synthetic_tree(depth: usize) -> (FamilyTree, Handle) {
    let mut tree = FamilyTree::default();
    let mut next_person = 0usize;
    let mut next_family = 0usize;
    let mut new_person = |tree: &mut FamilyTree| {
        next_person += 1;
        let h = handle(format!("p{next_person}"));
        tree.insert_person(Person::new(h.clone(), h.clone(), Name::new("Person", format!("{next_person}"))))
            .unwrap();
        h
    };

    let root = new_person(&mut tree);
    let mut generation = vec![root.clone()];

    for _ in 1..depth {
        let mut children_of_generation = Vec::new();
        for parent in &generation {
            for _ in 0..2 {
                let spouse = new_person(&mut tree);
                let children: Vec<Handle> = (0..3).map(|_| new_person(&mut tree)).collect();

                next_family += 1;
                let mut family = Family::new(
                    handle(format!("f{next_family}")),
                    handle(format!("F{next_family}")),
                )
                .with_father(parent.clone())
                .with_mother(spouse);
                for child in &children {
                    family = family.with_child(child.clone());
                }
                tree.insert_family(family).unwrap();
                children_of_generation.extend(children);
            }
        }
        generation = children_of_generation;
    }

    // first cousins in the last generation marry and have a child
    for cousins in generation.chunks(7).filter(|cousins| cousins.len() == 7) {
        let child = new_person(&mut tree);
        next_family += 1;
        let family = Family::new(
            handle(format!("f{next_family}")),
            handle(format!("F{next_family}")),
        )
        .with_father(cousins[0].clone())
        .with_mother(cousins[6].clone())
        .with_child(child);
        tree.insert_family(family).unwrap();
    }

    (tree, root)
}

fn number_tree(c: &mut Criterion) {
    let (tree, root) = synthetic_tree(DEPTH);
    let max_generations = NonZeroUsize::new(DEPTH + 1).unwrap();

    let mut group = c.benchmark_group("assign numbers");
    for scheme in NumberingScheme::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(scheme), &scheme, |b, &scheme| {
            b.iter(|| assign_numbers(&tree, &root, max_generations, scheme));
        });
    }
    group.finish();
}

criterion_group!(benches, number_tree);
criterion_main!(benches);
