pub use seq::{ArraySeq, Mode, RawRange, RawSeq, SeqOp, SeqOpMut, SeqView, DEFAULT_CAPACITY};
pub use text::TextSeq;

pub mod seq;
pub mod text;
