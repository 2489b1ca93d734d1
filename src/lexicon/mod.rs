use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::puzzle::letters;

#[derive(Embed)]
#[folder = "assets/lexicons/"]
struct LexiconAssets;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    #[serde(default)]
    pub definition: String,
}

impl WordEntry {
    pub fn new(word: &str, definition: &str) -> Self {
        Self {
            word: word.to_string(),
            definition: definition.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LexiconError {
    #[error("failed to read lexicon {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid lexicon: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("unknown lexicon '{0}'")]
    Unknown(String),
    #[error("lexicon '{0}' has no themes")]
    NoTopics(String),
    #[error("lexicon contains a theme or subtheme with a blank name")]
    BlankName,
    #[error("duplicate theme '{0}'")]
    DuplicateTopic(String),
    #[error("duplicate subtheme '{subtopic}' in theme '{topic}'")]
    DuplicateSubtopic { topic: String, subtopic: String },
    #[error("subtheme '{subtopic}' in theme '{topic}' has no words")]
    EmptySubtopic { topic: String, subtopic: String },
    #[error("blank word in subtheme '{subtopic}' of theme '{topic}'")]
    BlankWord { topic: String, subtopic: String },
}

#[derive(Deserialize)]
struct LexiconFile {
    name: String,
    #[serde(default, rename = "theme")]
    topics: Vec<TopicFile>,
}

#[derive(Deserialize)]
struct TopicFile {
    name: String,
    #[serde(default, rename = "subtheme")]
    subtopics: Vec<SubtopicFile>,
}

#[derive(Deserialize)]
struct SubtopicFile {
    name: String,
    #[serde(default)]
    words: Vec<WordEntry>,
}

#[derive(Clone, Debug)]
pub struct Subtopic {
    pub name: String,
    pub words: Vec<WordEntry>,
}

#[derive(Clone, Debug)]
pub struct Topic {
    pub name: String,
    pub subtopics: Vec<Subtopic>,
}

/// Themed word bank: theme -> subtheme -> words, in file order. Every stored
/// subtheme holds at least one word.
#[derive(Clone, Debug)]
pub struct Lexicon {
    pub name: String,
    topics: Vec<Topic>,
}

impl Lexicon {
    /// Resolve `source` as a file path, then a user lexicon in the config
    /// directory, then a bundled lexicon.
    pub fn load(source: &str) -> Result<Self, LexiconError> {
        let path = Path::new(source);
        if path.is_file() {
            return Self::from_path(path);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_path = config_dir
                .join("anatolexic")
                .join("lexicons")
                .join(format!("{source}.toml"));
            if user_path.is_file() {
                return Self::from_path(&user_path);
            }
        }

        let filename = format!("{source}.toml");
        match LexiconAssets::get(&filename) {
            Some(file) => {
                let content = String::from_utf8_lossy(file.data.as_ref());
                Self::from_toml(&content)
            }
            None => Err(LexiconError::Unknown(source.to_string())),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, LexiconError> {
        let content = fs::read_to_string(path).map_err(|source| LexiconError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, LexiconError> {
        let file: LexiconFile = toml::from_str(content)?;
        Self::validate(file)
    }

    pub fn available() -> Vec<String> {
        LexiconAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect()
    }

    fn validate(file: LexiconFile) -> Result<Self, LexiconError> {
        if file.topics.is_empty() {
            return Err(LexiconError::NoTopics(file.name));
        }

        let mut topic_names = HashSet::new();
        let mut topics = Vec::with_capacity(file.topics.len());
        for topic in file.topics {
            let topic_name = clean(&topic.name);
            if topic_name.is_empty() {
                return Err(LexiconError::BlankName);
            }
            if !topic_names.insert(topic_name.clone()) {
                return Err(LexiconError::DuplicateTopic(topic_name));
            }

            let mut subtopic_names = HashSet::new();
            let mut subtopics = Vec::with_capacity(topic.subtopics.len());
            for subtopic in topic.subtopics {
                let subtopic_name = clean(&subtopic.name);
                if subtopic_name.is_empty() {
                    return Err(LexiconError::BlankName);
                }
                if !subtopic_names.insert(subtopic_name.clone()) {
                    return Err(LexiconError::DuplicateSubtopic {
                        topic: topic_name,
                        subtopic: subtopic_name,
                    });
                }
                if subtopic.words.is_empty() {
                    return Err(LexiconError::EmptySubtopic {
                        topic: topic_name,
                        subtopic: subtopic_name,
                    });
                }

                let mut words = Vec::with_capacity(subtopic.words.len());
                for entry in subtopic.words {
                    let word = clean(&entry.word);
                    if word.is_empty() {
                        return Err(LexiconError::BlankWord {
                            topic: topic_name,
                            subtopic: subtopic_name,
                        });
                    }
                    words.push(WordEntry {
                        word,
                        definition: clean(&entry.definition),
                    });
                }
                subtopics.push(Subtopic {
                    name: subtopic_name,
                    words,
                });
            }
            topics.push(Topic {
                name: topic_name,
                subtopics,
            });
        }

        log::info!(
            "loaded lexicon '{}' with {} themes",
            file.name,
            topics.len()
        );
        Ok(Self {
            name: clean(&file.name),
            topics,
        })
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, name: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.name == name)
    }

    /// Words of one bucket. Unknown theme or subtheme yields an empty slice.
    pub fn lookup(&self, topic: &str, subtopic: &str) -> &[WordEntry] {
        self.topic(topic)
            .and_then(|t| t.subtopics.iter().find(|s| s.name == subtopic))
            .map(|s| s.words.as_slice())
            .unwrap_or(&[])
    }

    pub fn word_count(&self) -> usize {
        self.topics
            .iter()
            .flat_map(|t| &t.subtopics)
            .map(|s| s.words.len())
            .sum()
    }
}

fn clean(text: &str) -> String {
    letters::nfc(text.trim()).into_owned()
}
