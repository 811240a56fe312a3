use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

use derive_more::{Deref, DerefMut};

use super::raw_seq::RawSeq;

/// Borrowed range: a non-owning handle aliasing a sub-range of an owning
/// [`RawSeq`]'s buffer.
///
/// The wrapped handle is in `View` mode, so every structural operation on it
/// (growth, insertion, disposal, any other mutation) fails with
/// [`BorrowedRange`](contig_core_rs::Error::BorrowedRange) and it never
/// releases memory. The guard's lifetime borrows the owner, which rules out
/// the dangling-view hazard of a bare aliasing pointer: the owner cannot be
/// grown, mutated, or dropped while the range is alive.
#[derive(Deref, DerefMut)]
pub struct RawRange<'a, T> {
    #[deref]
    #[deref_mut]
    view: RawSeq<T>,
    _owner: PhantomData<&'a RawSeq<T>>,
}

impl<T> RawRange<'_, T> {
    pub(crate) fn new(view: RawSeq<T>) -> Self {
        Self {
            view,
            _owner: PhantomData,
        }
    }
}

impl<T: Debug> Debug for RawRange<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.view.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use eyre::Result;

    use crate::seq::{SeqOp, SeqOpMut};

    use super::super::RawSeq;

    #[test]
    fn test_guard_exposes_the_read_contract() -> Result<()> {
        let seq = RawSeq::from_slice(&[4, 5, 6, 5]);
        let range = seq.range(1, 3)?;
        assert_eq!(range.len(), 3);
        assert_eq!(range.index_of(&5), Some(0));
        assert_eq!(range.last_index_of(&5), Some(2));
        assert_eq!(range.common_prefix(&RawSeq::from_slice(&[5, 6, 9])), 2);
        assert_eq!(format!("{range:?}"), "[5, 6, 5]");
        Ok(())
    }

    #[test]
    fn test_guard_never_frees_on_drop() -> Result<()> {
        let seq = RawSeq::from_slice(&["a".to_string(), "b".to_string()]);
        {
            let range = seq.range(0, 2)?;
            assert_eq!(range.len(), 2);
        }
        // The parent's buffer and elements survive the guard.
        assert_eq!(seq.as_slice(), &["a", "b"]);
        Ok(())
    }

    #[test]
    fn test_guard_capacity_equals_length() -> Result<()> {
        let seq = RawSeq::from_slice(&[1, 2, 3, 4, 5]);
        let range = seq.range(2, 2)?;
        assert_eq!(range.capacity(), range.len());
        Ok(())
    }
}
