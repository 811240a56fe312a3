pub use text_seq::TextSeq;

mod text_seq;
