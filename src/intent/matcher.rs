//! Ordered keyword matching from normalized text to an intent
//!
//! Rules are evaluated top to bottom and the first rule with a keyword
//! contained in the query wins. The order is part of the observable
//! behavior: "hello what time is it" is a greeting, not a clock read.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sites that can be opened in the default browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    YouTube,
    Google,
    GitHub,
}

impl Site {
    /// Fixed URL handed to the browser
    pub fn url(&self) -> &'static str {
        match self {
            Site::YouTube => "https://youtube.com",
            Site::Google => "https://google.com",
            Site::GitHub => "https://github.com",
        }
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Site::YouTube => write!(f, "YouTube"),
            Site::Google => write!(f, "Google"),
            Site::GitHub => write!(f, "GitHub"),
        }
    }
}

/// A recognized category of user request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    /// Nothing left after normalization
    EmptyInput,
    Greeting,
    /// Reference lookup with the topic left after removing the markers
    Lookup { topic: String },
    /// A lookup marker was present but no topic remained
    LookupMissingTopic,
    OpenSite { site: Site },
    ReadClock,
    /// Body arrives in a follow-up interaction
    SaveNote,
    ReadNotes,
    StopSession,
    Unrecognized,
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::EmptyInput => write!(f, "EMPTY_INPUT"),
            Intent::Greeting => write!(f, "GREETING"),
            Intent::Lookup { topic } => write!(f, "LOOKUP ({})", topic),
            Intent::LookupMissingTopic => write!(f, "LOOKUP_MISSING_TOPIC"),
            Intent::OpenSite { site } => write!(f, "OPEN_SITE ({})", site),
            Intent::ReadClock => write!(f, "READ_CLOCK"),
            Intent::SaveNote => write!(f, "SAVE_NOTE"),
            Intent::ReadNotes => write!(f, "READ_NOTES"),
            Intent::StopSession => write!(f, "STOP_SESSION"),
            Intent::Unrecognized => write!(f, "UNRECOGNIZED"),
        }
    }
}

/// What a matching rule produces
#[derive(Debug, Clone, Copy)]
enum Action {
    Greeting,
    Lookup,
    OpenSite(Site),
    ReadClock,
    SaveNote,
    ReadNotes,
    StopSession,
}

/// A keyword predicate paired with the intent it selects
struct Rule {
    keywords: &'static [&'static str],
    action: Action,
}

impl Rule {
    fn matches(&self, query: &str) -> bool {
        self.keywords.iter().any(|keyword| query.contains(keyword))
    }
}

const LOOKUP_MARKERS: &[&str] = &["wikipedia", "who is", "what is"];

/// Priority order; earlier rules win ties
const RULES: &[Rule] = &[
    Rule { keywords: &["hello", "hi", "hey"], action: Action::Greeting },
    Rule { keywords: LOOKUP_MARKERS, action: Action::Lookup },
    Rule { keywords: &["youtube"], action: Action::OpenSite(Site::YouTube) },
    Rule { keywords: &["google"], action: Action::OpenSite(Site::Google) },
    Rule { keywords: &["github"], action: Action::OpenSite(Site::GitHub) },
    Rule { keywords: &["time"], action: Action::ReadClock },
    Rule { keywords: &["note", "remember"], action: Action::SaveNote },
    Rule { keywords: &["show notes", "read notes"], action: Action::ReadNotes },
    Rule {
        keywords: &["exit", "quit", "goodbye", "stop listening"],
        action: Action::StopSession,
    },
];

/// Match a normalized query against the rule table
pub fn match_intent(query: &str) -> Intent {
    if query.is_empty() {
        return Intent::EmptyInput;
    }

    let intent = RULES
        .iter()
        .find(|rule| rule.matches(query))
        .map(|rule| resolve(rule.action, query))
        .unwrap_or(Intent::Unrecognized);

    debug!(query, %intent, "intent matched");
    intent
}

fn resolve(action: Action, query: &str) -> Intent {
    match action {
        Action::Greeting => Intent::Greeting,
        Action::Lookup => {
            let topic = lookup_topic(query);
            if topic.is_empty() {
                Intent::LookupMissingTopic
            } else {
                Intent::Lookup { topic }
            }
        }
        Action::OpenSite(site) => Intent::OpenSite { site },
        Action::ReadClock => Intent::ReadClock,
        Action::SaveNote => Intent::SaveNote,
        Action::ReadNotes => Intent::ReadNotes,
        Action::StopSession => Intent::StopSession,
    }
}

/// Strip every lookup marker, in table order, and tidy the remainder
fn lookup_topic(query: &str) -> String {
    let stripped = LOOKUP_MARKERS
        .iter()
        .fold(query.to_string(), |acc, marker| acc.replace(marker, ""));

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(match_intent(""), Intent::EmptyInput);
    }

    #[test]
    fn test_single_keyword_sets() {
        let cases = [
            ("hello there", Intent::Greeting),
            ("hey", Intent::Greeting),
            ("who is ada lovelace", Intent::Lookup { topic: "ada lovelace".into() }),
            ("open youtube", Intent::OpenSite { site: Site::YouTube }),
            ("open google please", Intent::OpenSite { site: Site::Google }),
            ("take me to github", Intent::OpenSite { site: Site::GitHub }),
            ("what time is it", Intent::ReadClock),
            ("take a note", Intent::SaveNote),
            ("remember to buy milk", Intent::SaveNote),
            ("exit", Intent::StopSession),
            ("quit", Intent::StopSession),
            ("goodbye", Intent::StopSession),
            ("stop listening", Intent::StopSession),
            ("play some music", Intent::Unrecognized),
        ];
        for (query, expected) in cases {
            assert_eq!(match_intent(query), expected, "query: {query}");
        }
    }

    #[test]
    fn test_greeting_beats_clock() {
        assert_eq!(match_intent("hello what time is it"), Intent::Greeting);
    }

    #[test]
    fn test_greeting_matches_inside_words() {
        // Substring containment: "which" contains "hi"
        assert_eq!(match_intent("which day"), Intent::Greeting);
    }

    #[test]
    fn test_lookup_beats_site_and_clock() {
        assert_eq!(
            match_intent("what is google"),
            Intent::Lookup { topic: "google".into() }
        );
        assert_eq!(
            match_intent("wikipedia time zones"),
            Intent::Lookup { topic: "time zones".into() }
        );
    }

    #[test]
    fn test_lookup_topic_extraction() {
        assert_eq!(
            match_intent("wikipedia alan turing"),
            Intent::Lookup { topic: "alan turing".into() }
        );
        assert_eq!(
            match_intent("search wikipedia for what is rust"),
            Intent::Lookup { topic: "search for rust".into() }
        );
    }

    #[test]
    fn test_lookup_missing_topic() {
        assert_eq!(match_intent("wikipedia"), Intent::LookupMissingTopic);
        assert_eq!(match_intent("who is"), Intent::LookupMissingTopic);
        assert_eq!(match_intent("what is wikipedia"), Intent::LookupMissingTopic);
    }

    #[test]
    fn test_site_order() {
        assert_eq!(
            match_intent("youtube or github"),
            Intent::OpenSite { site: Site::YouTube }
        );
        assert_eq!(
            match_intent("github then google"),
            Intent::OpenSite { site: Site::Google }
        );
    }

    #[test]
    fn test_note_rule_shadows_read_notes() {
        assert_eq!(match_intent("show notes"), Intent::SaveNote);
        assert_eq!(match_intent("read notes"), Intent::SaveNote);
    }

    #[test]
    fn test_clock_beats_stop() {
        assert_eq!(match_intent("time to quit"), Intent::ReadClock);
    }

    #[test]
    fn test_site_urls() {
        assert_eq!(Site::YouTube.url(), "https://youtube.com");
        assert_eq!(Site::Google.url(), "https://google.com");
        assert_eq!(Site::GitHub.url(), "https://github.com");
        assert_eq!(Site::GitHub.to_string(), "GitHub");
    }

    #[test]
    fn test_intent_serialization() {
        let intent = Intent::OpenSite { site: Site::YouTube };
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains("open_site"));
        assert!(json.contains("you_tube"));
    }
}
