//! Writing-assistant sidebar: static tip catalogs and which
//! sections are expanded.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use log::debug;
use serde::Serialize;

/// Simulated fetch time when a section is opened
pub const SECTION_LOAD_DELAY: Duration = Duration::from_millis(1500);

pub const AI_SUGGESTIONS: [&str; 3] =
  [ "Consider adding a transition sentence here"
  , "This paragraph could benefit from more specific examples"
  , "Try varying your sentence structure for better flow"
  ];

pub const GRAMMAR_TIPS: [&str; 3] =
  [ "Replace 'very good' with 'excellent' for stronger impact"
  , "Consider using active voice instead of passive"
  , "Check comma usage in compound sentences"
  ];

pub const TONE_ADJUSTMENTS: [&str; 4] =
  [ "Make it more professional"
  , "Add a conversational tone"
  , "Increase formality level"
  , "Make it more persuasive"
  ];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SynonymGroup
{   pub word: &'static str
  , pub suggestions: [&'static str; 3]
}

pub const SYNONYMS: [SynonymGroup; 3] =
  [ SynonymGroup
    {   word: "important"
      , suggestions: ["crucial", "vital", "significant"]
    }
  , SynonymGroup
    {   word: "good"
      , suggestions: ["excellent", "outstanding", "remarkable"]
    }
  , SynonymGroup
    {   word: "big"
      , suggestions: ["substantial", "massive", "enormous"]
    }
  ];

/// Collapsible sidebar section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section
{   Suggestions
  , Grammar
  , Tone
  , Synonyms
}

impl Section
{   pub const ALL: [Section; 4] =
      [ Section::Suggestions
      , Section::Grammar
      , Section::Tone
      , Section::Synonyms
      ];

    pub fn title(self) -> &'static str
    {   match self
        {   Section::Suggestions => "AI Suggestions"
          , Section::Grammar => "Grammar Tips"
          , Section::Tone => "Tone Adjustments"
          , Section::Synonyms => "Synonyms"
        }
    }

    fn index(self) -> usize
    {   match self
        {   Section::Suggestions => 0
          , Section::Grammar => 1
          , Section::Tone => 2
          , Section::Synonyms => 3
        }
    }

    /// Static content behind this section
    pub fn content(self) -> SectionContent
    {   match self
        {   Section::Suggestions => SectionContent::Tips(&AI_SUGGESTIONS)
          , Section::Grammar => SectionContent::Tips(&GRAMMAR_TIPS)
          , Section::Tone => SectionContent::Tips(&TONE_ADJUSTMENTS)
          , Section::Synonyms => SectionContent::Synonyms(&SYNONYMS)
        }
    }
}

impl fmt::Display for Section
{   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {   f.write_str(self.title())
    }
}

impl FromStr for Section
{   type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {   match s.trim().to_ascii_lowercase().as_str()
        {   "suggestions" | "ai" => Ok(Section::Suggestions)
          , "grammar" => Ok(Section::Grammar)
          , "tone" => Ok(Section::Tone)
          , "synonyms" => Ok(Section::Synonyms)
          , other => Err(format!("Unknown section: {}", other))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SectionContent
{   Tips(&'static [&'static str])
  , Synonyms(&'static [SynonymGroup])
}

/// Which sidebar sections are expanded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sidebar
{   open: [bool; 4]
}

impl Default for Sidebar
{   fn default() -> Self
    {   // suggestions start expanded
        Sidebar
        {   open: [true, false, false, false]
        }
    }
}

impl Sidebar
{   pub fn new() -> Self
    {   Sidebar::default()
    }

    pub fn is_open(&self, section: Section) -> bool
    {   self.open[section.index()]
    }

    /// Flip `section`; true when it was just opened (and so should
    /// be loaded).
    pub fn toggle(&mut self, section: Section) -> bool
    {   let slot = &mut self.open[section.index()];
        *slot = !*slot;
        debug!("Section {:?} open: {}", section, *slot);
        *slot
    }

    pub fn open_sections(&self) -> Vec<Section>
    {   Section::ALL
          .into_iter()
          .filter(|s| self.is_open(*s))
          .collect()
    }
}

/// Section content after `SECTION_LOAD_DELAY`
pub async fn load_section(section: Section) -> SectionContent
{   debug!("Loading section {:?}", section);
    tokio::time::sleep(SECTION_LOAD_DELAY).await;
    section.content()
}

/// Synonym group for `word`, ignoring case
pub fn synonyms_for(word: &str) -> Option<&'static SynonymGroup>
{   let word = word.trim();
    SYNONYMS
      .iter()
      .find(|g| g.word.eq_ignore_ascii_case(word))
}

#[cfg(test)]
mod tests
{   use super::*;

    #[test]
    fn suggestions_open_by_default()
    {   let sidebar = Sidebar::new();
        assert_eq!(sidebar.open_sections(), vec![Section::Suggestions]);
    }

    #[test]
    fn toggle_reports_opening()
    {   let mut sidebar = Sidebar::new();
        assert!(sidebar.toggle(Section::Grammar));
        assert!(sidebar.is_open(Section::Grammar));
        assert!(!sidebar.toggle(Section::Grammar));
        assert!(!sidebar.toggle(Section::Suggestions));
        assert!(sidebar.open_sections().is_empty());
    }

    #[test]
    fn section_names_parse()
    {   assert_eq!("Tone".parse::<Section>(), Ok(Section::Tone));
        assert_eq!(" synonyms ".parse::<Section>(), Ok(Section::Synonyms));
        assert!("spelling".parse::<Section>().is_err());
    }

    #[test]
    fn synonym_lookup_ignores_case()
    {   let group = synonyms_for("GOOD").unwrap();
        assert_eq!(group.suggestions[0], "excellent");
        assert!(synonyms_for("small").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn load_section_returns_catalog()
    {   match load_section(Section::Tone).await
        {   SectionContent::Tips(tips) => assert_eq!(tips.len(), 4)
          , other => panic!("unexpected content: {:?}", other)
        }
    }
}
