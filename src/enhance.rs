//! Offline "enhance text" rewrite shown in the editor's modal.
//!
//! This is a canned word swap, not a model call.

use std::time::Duration;

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// How long `enhance` pretends to think
pub const ENHANCE_DELAY: Duration = Duration::from_millis(2000);

/// Returned for blank input
pub const EMPTY_PLACEHOLDER: &str
  = "Start writing to see AI enhancements...";

pub const REFINED_PREFIX: &str = "Refined version: ";

static WORD_SWAPS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
  [ ("good", "excellent")
  , ("big", "substantial")
  , ("nice", "remarkable")
  , ("thing", "element")
  ]
  .into_iter()
  .map(|(word, replacement)| {
    let pattern = format!(r"(?i)\b{}\b", word);
    (Regex::new(&pattern).expect("static pattern"), replacement)
  })
  .collect()
});

/// Rewrite `text` the way the enhance modal does
pub fn refine(text: &str) -> String
{   if text.trim().is_empty()
    {   return EMPTY_PLACEHOLDER.to_string();
    }

    let swapped = WORD_SWAPS
      .iter()
      .fold(text.to_string(), |acc, (re, replacement)| {
        re.replace_all(&acc, *replacement).into_owned()
      });

    format!(
      "{}{}",
      REFINED_PREFIX,
      swapped.replace(". ", ". Furthermore, ")
    )
}

/// `refine` after `ENHANCE_DELAY`
pub async fn enhance(text: &str) -> String
{   debug!("Enhancing {} chars", text.len());
    tokio::time::sleep(ENHANCE_DELAY).await;
    refine(text)
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn blank_text_gets_placeholder()
    {   assert_eq!(refine(""), EMPTY_PLACEHOLDER);
        assert_eq!(refine("   \n\t"), EMPTY_PLACEHOLDER);
    }

    #[test]
    fn swaps_whole_words_case_insensitively()
    {   assert_eq!(
          refine("Good work on the big nice thing"),
          "Refined version: excellent work on the substantial remarkable element"
        );
    }

    #[test]
    fn leaves_partial_words_alone()
    {   assert_eq!(
          refine("goodness bigger things"),
          "Refined version: goodness bigger things"
        );
    }

    #[test]
    fn adds_furthermore_after_sentences()
    {   assert_eq!(
          refine("It works. It is good. Done."),
          "Refined version: It works. Furthermore, It is excellent. Furthermore, Done."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn enhance_waits_then_refines()
    {   let start = tokio::time::Instant::now();
        let out = enhance("a nice day").await;
        assert_eq!(out, "Refined version: a remarkable day");
        assert!(start.elapsed() >= ENHANCE_DELAY);
    }
}
