use derive_more::{Display, Error};

/// Errors reported by container operations.
///
/// Every operation validates its arguments before touching any state, so an
/// `Err` always leaves the container exactly as it was. Allocation exhaustion
/// is deliberately absent: a buffer request the system allocator cannot
/// satisfy is fatal and surfaced through `std::alloc::handle_alloc_error`.
#[derive(Debug, Display, Error, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// Element access outside `[0, len)`.
    #[display("index {index} out of bounds for a sequence of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// A `(index, count)` span that does not fit into `[0, len]`.
    #[display("range {index}+{count} out of bounds for a sequence of length {len}")]
    RangeOutOfBounds {
        index: usize,
        count: usize,
        len: usize,
    },

    /// Explicit capacity change below the number of stored elements.
    #[display("capacity {requested} is below the current length {len}")]
    CapacityBelowLength { requested: usize, len: usize },

    /// A growth requirement above the platform maximum for the element type.
    #[display("requested capacity overflows the maximum sequence size")]
    CapacityOverflow,

    /// Structural mutation or disposal attempted through a borrowed range.
    #[display("operation not permitted on a borrowed range")]
    BorrowedRange,
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            Error::IndexOutOfBounds { index: 7, len: 3 }.to_string(),
            "index 7 out of bounds for a sequence of length 3"
        );
        assert_eq!(
            Error::BorrowedRange.to_string(),
            "operation not permitted on a borrowed range"
        );
    }

    #[test]
    fn test_promotes_into_eyre() -> eyre::Result<()> {
        let failed: Result<()> = Err(Error::CapacityOverflow);
        let report = failed.unwrap_err();
        let report: eyre::Report = report.into();
        assert!(report.to_string().contains("maximum sequence size"));
        Ok(())
    }
}
