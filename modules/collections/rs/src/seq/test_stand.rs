use itertools::Itertools;

use contig_core_rs::{Error, ProduceFn};

use super::traits::{SeqOpMut, DEFAULT_CAPACITY};

/// Runs the growable-sequence contract against one backend. Both backends
/// must pass the exact same suite.
pub fn run_all<S, F>(make: F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    test_round_trip(&make);
    test_growth_invariant(&make);
    test_insertion(&make);
    test_self_insertion(&make);
    test_removal(&make);
    test_replace_range(&make);
    test_set_range(&make);
    test_bulk_fill_and_filter(&make);
    test_stack_ops(&make);
    test_capacity_policy(&make);
    test_chaining(&make);
    test_failed_operations_leave_state_untouched(&make);
}

fn test_round_trip<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    let long = (0..100).collect_vec();
    for input in [vec![], vec![7], vec![1, 2, 3, 4, 5], long] {
        let seq = make(&input);
        assert_eq!(seq.len(), input.len());
        assert_eq!(seq.as_slice(), input.as_slice());
        let iterated = seq.iter().copied().collect_vec();
        assert_eq!(iterated, input);
    }
}

/// Every operation is checked against a plain `Vec` reference model.
fn test_growth_invariant<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    let mut seq = make(&[]);
    let mut model: Vec<i32> = Vec::new();

    let check = |seq: &S, model: &Vec<i32>| {
        assert!(seq.capacity() >= seq.len());
        assert_eq!(seq.as_slice(), model.as_slice());
    };

    for item in 0..40 {
        seq.push(item).unwrap();
        model.push(item);
        check(&seq, &model);
    }
    for item in 40..50 {
        let index = (item as usize) % (model.len() + 1);
        seq.insert(index, item).unwrap();
        model.insert(index, item);
        check(&seq, &model);
    }
    for step in 0..10 {
        let index = (step * 3) % (model.len() - 1);
        seq.remove(index, 1).unwrap();
        model.remove(index);
        check(&seq, &model);
    }
    seq.insert_slice(5, &[100, 101, 102]).unwrap();
    model.splice(5..5, [100, 101, 102]);
    check(&seq, &model);
}

fn test_insertion<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    for (initial, index, items, expected) in [
        (vec![], 0, vec![1, 2], vec![1, 2]),
        (vec![1, 2, 3], 0, vec![], vec![1, 2, 3]),
        (vec![1, 2, 3], 0, vec![9], vec![9, 1, 2, 3]),
        (vec![1, 2, 3], 2, vec![8, 9], vec![1, 2, 8, 9, 3]),
        (vec![1, 2, 3], 3, vec![4, 5], vec![1, 2, 3, 4, 5]),
    ] {
        let mut seq = make(&initial);
        seq.insert_slice(index, &items).unwrap();
        assert_eq!(seq.as_slice(), expected.as_slice());
    }

    let mut seq = make(&[1, 3]);
    seq.insert(1, 2).unwrap();
    assert_eq!(seq.as_slice(), &[1, 2, 3]);

    let mut seq = make(&[1, 2, 3]);
    assert_eq!(
        seq.insert_slice(4, &[9]).err(),
        Some(Error::IndexOutOfBounds { index: 4, len: 3 })
    );
    assert_eq!(
        seq.insert(4, 9).err(),
        Some(Error::IndexOutOfBounds { index: 4, len: 3 })
    );
}

fn test_self_insertion<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    // Inserting a sequence into itself, for every insertion point, must
    // match a reference that materializes an independent copy first.
    for n in 0..=6 {
        let initial = (0..n).collect_vec();
        for k in 0..=initial.len() {
            let mut seq = make(&initial);
            seq.insert_from_within(k, 0..initial.len()).unwrap();

            let mut expected = initial.clone();
            expected.splice(k..k, initial.iter().copied());
            assert_eq!(seq.len(), 2 * initial.len());
            assert_eq!(seq.as_slice(), expected.as_slice(), "n={n} k={k}");
        }
    }

    // Partial overlapping ranges, both sides of the insertion point.
    for (initial, index, src, expected) in [
        (vec![1, 2, 3, 4, 5], 2, 1..4, vec![1, 2, 2, 3, 4, 3, 4, 5]),
        (vec![1, 2, 3, 4], 1, 2..4, vec![1, 3, 4, 2, 3, 4]),
        (vec![1, 2, 3, 4], 3, 0..2, vec![1, 2, 3, 1, 2, 4]),
        (vec![1, 2, 3], 1, 1..1, vec![1, 2, 3]),
        (vec![1, 2, 3], 0, 2..3, vec![3, 1, 2, 3]),
    ] {
        let mut seq = make(&initial);
        seq.insert_from_within(index, src.clone()).unwrap();
        assert_eq!(seq.as_slice(), expected.as_slice(), "src={src:?}");
    }

    let mut seq = make(&[1, 2, 3]);
    assert_eq!(
        seq.insert_from_within(0, 1..4).err(),
        Some(Error::RangeOutOfBounds {
            index: 1,
            count: 3,
            len: 3
        })
    );
}

fn test_removal<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    for (initial, index, count, expected) in [
        (vec![1, 9, 9, 2, 3], 0, 2, vec![9, 2, 3]),
        (vec![1, 2, 3], 1, 0, vec![1, 2, 3]),
        (vec![1, 2, 3], 0, 3, vec![]),
        (vec![1, 2, 3], 2, 1, vec![1, 2]),
        (vec![1, 2, 3, 4], 1, 2, vec![1, 4]),
    ] {
        let mut seq = make(&initial);
        seq.remove(index, count).unwrap();
        assert_eq!(seq.as_slice(), expected.as_slice());
        assert_eq!(seq.len(), expected.len());
    }

    let mut seq = make(&[1, 2, 3]);
    assert_eq!(
        seq.remove(1, 3).err(),
        Some(Error::RangeOutOfBounds {
            index: 1,
            count: 3,
            len: 3
        })
    );
}

fn test_replace_range<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    for (initial, index, count, items, expected) in [
        // Shrinking, growing, and length-preserving replacements.
        (vec![1, 2, 3, 4], 1, 2, vec![9], vec![1, 9, 4]),
        (vec![1, 2, 3], 1, 1, vec![7, 8, 9], vec![1, 7, 8, 9, 3]),
        (vec![1, 2, 3], 1, 1, vec![7], vec![1, 7, 3]),
        (vec![1, 2, 3], 0, 0, vec![5], vec![5, 1, 2, 3]),
        (vec![1, 2, 3], 0, 3, vec![], vec![]),
        (vec![1, 2, 3], 3, 0, vec![4, 5], vec![1, 2, 3, 4, 5]),
    ] {
        let mut seq = make(&initial);
        seq.replace_range(index, count, &items).unwrap();
        assert_eq!(seq.as_slice(), expected.as_slice());
    }

    let mut seq = make(&[1, 2, 3]);
    assert_eq!(
        seq.replace_range(2, 2, &[9]).err(),
        Some(Error::RangeOutOfBounds {
            index: 2,
            count: 2,
            len: 3
        })
    );
}

fn test_set_range<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    for (initial, index, items, expected) in [
        (vec![1, 2, 3, 4], 1, vec![8, 9], vec![1, 8, 9, 4]),
        (vec![1, 2, 3], 2, vec![8, 9, 10], vec![1, 2, 8, 9, 10]),
        (vec![1, 2, 3], 3, vec![4], vec![1, 2, 3, 4]),
        (vec![1, 2, 3], 0, vec![], vec![1, 2, 3]),
        (vec![], 0, vec![1, 2], vec![1, 2]),
    ] {
        let mut seq = make(&initial);
        seq.set_range(index, &items).unwrap();
        assert_eq!(seq.as_slice(), expected.as_slice());
    }

    let mut seq = make(&[1, 2, 3]);
    assert_eq!(
        seq.set_range(4, &[9]).err(),
        Some(Error::IndexOutOfBounds { index: 4, len: 3 })
    );
}

fn test_bulk_fill_and_filter<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    let mut seq = make(&[1, 2, 3]);
    seq.fill(4, 7).unwrap();
    assert_eq!(seq.as_slice(), &[7, 7, 7, 7]);

    let mut producer = ProduceFn::new(|index| (index * index) as i32);
    seq.fill_with(3, &mut producer).unwrap();
    assert_eq!(seq.as_slice(), &[0, 1, 4]);

    let mut seq = make(&[1, 2, 3, 4, 5, 6]);
    seq.retain(|item| item % 2 == 0).unwrap();
    assert_eq!(seq.as_slice(), &[2, 4, 6]);

    seq.retain(|_| false).unwrap();
    assert!(seq.is_empty());

    let mut seq = make(&[1, 2, 3]);
    seq.clear().unwrap();
    assert!(seq.is_empty());

    let mut seq = make(&[1, 2, 3, 4]);
    seq.truncate(2).unwrap();
    assert_eq!(seq.as_slice(), &[1, 2]);
    seq.truncate(9).unwrap();
    assert_eq!(seq.as_slice(), &[1, 2]);
}

fn test_stack_ops<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    let mut seq = make(&[1, 2]);
    seq.push(3).unwrap();
    assert_eq!(seq.as_slice(), &[1, 2, 3]);
    assert_eq!(seq.pop().unwrap(), Some(3));
    assert_eq!(seq.pop().unwrap(), Some(2));
    assert_eq!(seq.pop().unwrap(), Some(1));
    assert_eq!(seq.pop().unwrap(), None);

    let mut seq = make(&[1, 2, 3]);
    seq.set(1, 20).unwrap();
    assert_eq!(seq.as_slice(), &[1, 20, 3]);
    *seq.get_mut(2).unwrap() += 1;
    assert_eq!(seq.as_slice(), &[1, 20, 4]);
}

fn test_capacity_policy<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    let mut seq = make(&[]);
    seq.push(0).unwrap();
    assert!(seq.capacity() >= DEFAULT_CAPACITY);

    for item in 1..=(DEFAULT_CAPACITY as i32) {
        seq.push(item).unwrap();
    }
    assert!(seq.capacity() >= 2 * DEFAULT_CAPACITY);
    assert!(seq.capacity() >= seq.len());

    let mut seq = make(&[1, 2, 3]);
    assert_eq!(
        seq.try_set_capacity(2).err(),
        Some(Error::CapacityBelowLength {
            requested: 2,
            len: 3
        })
    );
    seq.try_set_capacity(12).unwrap();
    assert!(seq.capacity() >= 12);
    assert_eq!(seq.as_slice(), &[1, 2, 3]);

    seq.trim().unwrap();
    assert!(seq.capacity() >= seq.len());
}

fn test_chaining<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    let mut seq = make(&[2, 3]);
    seq.push(4)
        .unwrap()
        .insert(0, 1)
        .unwrap()
        .extend_from_slice(&[5, 6])
        .unwrap()
        .remove(4, 1)
        .unwrap();
    assert_eq!(seq.as_slice(), &[1, 2, 3, 4, 6]);
}

fn test_failed_operations_leave_state_untouched<S, F>(make: &F)
where
    S: SeqOpMut<i32>,
    F: Fn(&[i32]) -> S,
{
    let mut seq = make(&[1, 2, 3]);
    let cap = seq.capacity();

    assert!(seq.get(3).is_err());
    assert!(seq.insert_slice(4, &[9]).is_err());
    assert!(seq.insert_from_within(0, 2..5).is_err());
    assert!(seq.remove(2, 2).is_err());
    assert!(seq.replace_range(3, 1, &[9]).is_err());
    assert!(seq.set_range(4, &[9]).is_err());
    assert!(seq.try_set_capacity(1).is_err());
    assert!(seq.view(1, 3).is_err());
    assert!(seq.index_of_in(&1, 2, 2).is_err());

    assert_eq!(seq.as_slice(), &[1, 2, 3]);
    assert_eq!(seq.capacity(), cap);
}
