use std::fmt::{Debug, Display, Formatter};

use derive_more::{Deref, DerefMut};

use contig_core_rs::Result;

use crate::seq::{RawSeq, SeqOp, SeqOpMut};

/// Text stored as a raw-buffer sequence of scalar characters.
///
/// A thin specialization of [`RawSeq<char>`]: allocation, growth, range
/// views, and disposal all come through unmodified, so a [`RawSeq::range`]
/// taken on a `TextSeq` behaves exactly like one taken on any other raw
/// sequence. Only the string glue lives here.
#[derive(Default, Clone, Deref, DerefMut)]
pub struct TextSeq {
    chars: RawSeq<char>,
}

impl TextSeq {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
        }
    }

    pub fn push_str(&mut self, text: &str) -> Result<&mut Self> {
        for ch in text.chars() {
            self.chars.push(ch)?;
        }
        Ok(self)
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

impl From<&str> for TextSeq {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl FromIterator<char> for TextSeq {
    fn from_iter<Iter: IntoIterator<Item = char>>(iter: Iter) -> Self {
        Self {
            chars: iter.into_iter().collect(),
        }
    }
}

impl Display for TextSeq {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for ch in self.chars.iter() {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

impl Debug for TextSeq {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_string())
    }
}

impl PartialEq for TextSeq {
    fn eq(&self, other: &Self) -> bool {
        self.chars == other.chars
    }
}

impl Eq for TextSeq {}

impl PartialEq<&str> for TextSeq {
    fn eq(&self, other: &&str) -> bool {
        self.chars.iter().copied().eq(other.chars())
    }
}

#[cfg(test)]
mod tests {
    use eyre::Result;

    use super::*;

    #[test]
    fn test_round_trip() {
        for text in ["", "a", "hello", "δοκιμή"] {
            let seq = TextSeq::from_text(text);
            assert_eq!(seq.len(), text.chars().count());
            assert_eq!(seq.as_string(), text);
            assert_eq!(seq, text);
        }
    }

    #[test]
    fn test_inherits_sequence_operations() -> Result<()> {
        let mut seq = TextSeq::from_text("hello");
        seq.insert_slice(5, &[',', ' '])?;
        seq.push_str("world")?;
        assert_eq!(seq.as_string(), "hello, world");

        seq.remove(0, 7)?;
        assert_eq!(seq.as_string(), "world");

        assert_eq!(seq.index_of(&'o'), Some(1));
        assert_eq!(seq.common_prefix(&TextSeq::from_text("worst").chars), 3);
        Ok(())
    }

    #[test]
    fn test_inherits_view_semantics() -> Result<()> {
        let seq = TextSeq::from_text("sequence");
        let view = seq.range(2, 3)?;
        assert_eq!(view.iter().collect::<String>(), "que");
        assert!(std::ptr::eq(
            view.as_slice().as_ptr(),
            &seq.as_slice()[2]
        ));

        let mut copy = seq.range_to_owned(2, 3)?;
        copy.set(0, 'Q')?;
        assert_eq!(seq.as_string(), "sequence");
        assert_eq!(copy.iter().collect::<String>(), "Que");
        Ok(())
    }

    #[test]
    fn test_display_and_collect() {
        let seq: TextSeq = "abc".chars().collect();
        assert_eq!(format!("{seq}"), "abc");
        assert_eq!(format!("{seq:?}"), "\"abc\"");
        assert_eq!(TextSeq::from("xy"), "xy");
    }
}
