//! Text decomposition levels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SynthError;

/// A level of text decomposition, each with its own annotation collection.
///
/// Variants are declared in canonical fine-to-coarse order, so the derived
/// `Ord` sorts characters first and articles last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Character,
    Word,
    Sentence,
    Paragraph,
    Article,
}

impl Granularity {
    /// All granularities in canonical order.
    pub const ALL: [Granularity; 5] = [
        Granularity::Character,
        Granularity::Word,
        Granularity::Sentence,
        Granularity::Paragraph,
        Granularity::Article,
    ];

    /// Granularities a text corpus can be split into for packing.
    pub const PARSE_MODES: [Granularity; 4] = [
        Granularity::Character,
        Granularity::Word,
        Granularity::Sentence,
        Granularity::Paragraph,
    ];

    /// The configuration name of this granularity.
    pub fn name(self) -> &'static str {
        match self {
            Granularity::Character => "chars",
            Granularity::Word => "words",
            Granularity::Sentence => "sentences",
            Granularity::Paragraph => "paragraphs",
            Granularity::Article => "text",
        }
    }

    /// The `<name>` tag used for this granularity in VOC XML objects.
    pub fn voc_tag(self) -> &'static str {
        match self {
            Granularity::Character => "symbol",
            Granularity::Word => "word",
            Granularity::Sentence => "line",
            Granularity::Paragraph => "paragraph",
            Granularity::Article => "artikle",
        }
    }

    /// Inverse of [`Granularity::voc_tag`].
    pub fn from_voc_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.voc_tag() == tag)
    }

    /// Returns true if a corpus may be split at this granularity for packing.
    pub fn is_parse_mode(self) -> bool {
        Self::PARSE_MODES.contains(&self)
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Granularity {
    type Err = SynthError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "chars" | "char" | "character" | "characters" | "symbol" => Ok(Granularity::Character),
            "words" | "word" => Ok(Granularity::Word),
            "sentences" | "sentence" | "line" | "lines" => Ok(Granularity::Sentence),
            "paragraphs" | "paragraph" => Ok(Granularity::Paragraph),
            "text" | "article" | "articles" => Ok(Granularity::Article),
            _ => Err(SynthError::UnknownGranularity(raw.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order_is_fine_to_coarse() {
        let mut shuffled = vec![
            Granularity::Article,
            Granularity::Character,
            Granularity::Paragraph,
            Granularity::Word,
            Granularity::Sentence,
        ];
        shuffled.sort();
        assert_eq!(shuffled, Granularity::ALL.to_vec());
    }

    #[test]
    fn voc_tags_roundtrip() {
        for granularity in Granularity::ALL {
            assert_eq!(
                Granularity::from_voc_tag(granularity.voc_tag()),
                Some(granularity)
            );
        }
        assert_eq!(Granularity::from_voc_tag("article"), None);
    }

    #[test]
    fn parses_names_and_aliases() {
        assert_eq!("words".parse::<Granularity>().unwrap(), Granularity::Word);
        assert_eq!("Text".parse::<Granularity>().unwrap(), Granularity::Article);
        assert_eq!(" chars ".parse::<Granularity>().unwrap(), Granularity::Character);
        assert!("glyphs".parse::<Granularity>().is_err());
    }

    #[test]
    fn article_is_not_a_parse_mode() {
        assert!(!Granularity::Article.is_parse_mode());
        assert!(Granularity::Sentence.is_parse_mode());
    }
}
