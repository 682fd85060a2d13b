use std::collections::HashMap;

/// Closed-class words and common open-class words with their usual Penn tag
const LEXICON: &[(&str, &str)] = &[
    ("the", "DT"), ("a", "DT"), ("an", "DT"), ("this", "DT"), ("that", "DT"),
    ("these", "DT"), ("those", "DT"), ("every", "DT"), ("each", "DT"), ("some", "DT"),
    ("any", "DT"), ("no", "DT"), ("all", "DT"), ("both", "DT"),
    ("one", "CD"), ("two", "CD"), ("three", "CD"), ("four", "CD"), ("five", "CD"),
    ("six", "CD"), ("seven", "CD"), ("eight", "CD"), ("nine", "CD"), ("ten", "CD"),
    ("i", "PRP"), ("you", "PRP"), ("he", "PRP"), ("she", "PRP"), ("it", "PRP"),
    ("we", "PRP"), ("they", "PRP"), ("me", "PRP"), ("him", "PRP"), ("us", "PRP"),
    ("them", "PRP"), ("my", "PRP$"), ("your", "PRP$"), ("his", "PRP$"), ("her", "PRP$"),
    ("its", "PRP$"), ("our", "PRP$"), ("their", "PRP$"),
    ("in", "IN"), ("on", "IN"), ("at", "IN"), ("by", "IN"), ("for", "IN"), ("with", "IN"),
    ("about", "IN"), ("between", "IN"), ("into", "IN"), ("through", "IN"), ("during", "IN"),
    ("before", "IN"), ("after", "IN"), ("above", "IN"), ("below", "IN"), ("from", "IN"),
    ("of", "IN"), ("over", "IN"), ("under", "IN"), ("near", "IN"), ("than", "IN"),
    ("since", "IN"), ("until", "IN"), ("because", "IN"), ("if", "IN"), ("while", "IN"),
    ("to", "TO"),
    ("and", "CC"), ("but", "CC"), ("or", "CC"), ("nor", "CC"), ("yet", "CC"),
    ("can", "MD"), ("could", "MD"), ("will", "MD"), ("would", "MD"), ("shall", "MD"),
    ("should", "MD"), ("may", "MD"), ("might", "MD"), ("must", "MD"),
    ("is", "VBZ"), ("am", "VBP"), ("are", "VBP"), ("was", "VBD"), ("were", "VBD"),
    ("be", "VB"), ("been", "VBN"), ("being", "VBG"), ("has", "VBZ"), ("have", "VBP"),
    ("had", "VBD"), ("does", "VBZ"), ("do", "VBP"), ("did", "VBD"),
    ("who", "WP"), ("what", "WP"), ("whom", "WP"), ("which", "WDT"), ("whose", "WP$"),
    ("when", "WRB"), ("where", "WRB"), ("why", "WRB"), ("how", "WRB"),
    ("not", "RB"), ("never", "RB"), ("very", "RB"), ("too", "RB"), ("also", "RB"),
    ("just", "RB"), ("often", "RB"), ("always", "RB"), ("here", "RB"), ("there", "RB"),
    ("now", "RB"), ("then", "RB"), ("quite", "RB"), ("soon", "RB"), ("again", "RB"),
    ("good", "JJ"), ("bad", "JJ"), ("big", "JJ"), ("small", "JJ"), ("calm", "JJ"),
    ("new", "JJ"), ("old", "JJ"), ("young", "JJ"), ("long", "JJ"), ("short", "JJ"),
    ("high", "JJ"), ("low", "JJ"), ("great", "JJ"), ("little", "JJ"), ("happy", "JJ"),
    ("quiet", "JJ"), ("red", "JJ"), ("blue", "JJ"), ("green", "JJ"), ("dark", "JJ"),
    ("warm", "JJ"), ("cold", "JJ"), ("hot", "JJ"), ("clear", "JJ"), ("deep", "JJ"),
    ("go", "VB"), ("come", "VB"), ("see", "VB"), ("make", "VB"), ("take", "VB"),
    ("know", "VB"), ("think", "VB"), ("get", "VB"), ("give", "VB"), ("find", "VB"),
    ("tell", "VB"), ("run", "VB"), ("walk", "VB"), ("live", "VB"), ("read", "VB"),
    ("speak", "VB"), ("say", "VB"), ("want", "VB"), ("like", "VB"), ("love", "VB"),
    ("look", "VB"), ("eat", "VB"), ("swim", "VB"), ("sleep", "VB"),
    ("went", "VBD"), ("saw", "VBD"), ("made", "VBD"), ("took", "VBD"), ("knew", "VBD"),
    ("thought", "VBD"), ("got", "VBD"), ("gave", "VBD"), ("found", "VBD"), ("told", "VBD"),
    ("ran", "VBD"), ("said", "VBD"), ("came", "VBD"), ("ate", "VBD"), ("swam", "VBD"),
];

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "ical", "less", "ish"];

/// Words after which an `-ed` form is a participle
const AUXILIARIES: &[&str] = &["has", "have", "had", "is", "are", "was", "were", "be", "been"];

const NOUN_SUFFIXES: &[&str] = &["tion", "sion", "ment", "ness", "ity", "ship", "ism", "ance", "ence"];

/// Lexicon plus suffix and context rules, producing Penn Treebank tags
pub struct EnglishTagger {
    lexicon: HashMap<&'static str, &'static str>,
}

impl EnglishTagger {
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
        }
    }

    /// Tag a word sequence; the result has one tag per word
    pub fn tag(&self, words: &[&str]) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(words.len());

        for (idx, word) in words.iter().enumerate() {
            let prev_tag = tags.last().map(String::as_str);
            let prev_word = idx.checked_sub(1).map(|i| words[i]);
            let tag = self.tag_word(word, prev_word, prev_tag);
            tags.push(tag);
        }

        tags
    }

    fn tag_word(&self, word: &str, prev_word: Option<&str>, prev: Option<&str>) -> String {
        if word.chars().all(|c| !c.is_alphanumeric()) {
            return word.to_string();
        }
        if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return "CD".to_string();
        }

        let lower = word.to_lowercase();
        if let Some(tag) = self.lexicon.get(lower.as_str()) {
            let tag = match (*tag, prev) {
                // "the walk", "a look"
                ("VB", Some("DT") | Some("PRP$") | Some("JJ")) => "NN",
                ("VB", Some("PRP") | Some("NNS")) => "VBP",
                (tag, _) => tag,
            };
            return tag.to_string();
        }

        let sentence_start = matches!(prev, None | Some(".") | Some("!") | Some("?"));
        let tag = if !sentence_start && word.chars().next().is_some_and(char::is_uppercase) {
            "NNP"
        } else if matches!(prev, Some("TO") | Some("MD")) {
            "VB"
        } else if lower.ends_with("ly") {
            "RB"
        } else if lower.ends_with("ing") && lower.len() > 4 {
            "VBG"
        } else if lower.ends_with("ed") && lower.len() > 3 {
            let auxiliary = prev_word.is_some_and(|w| AUXILIARIES.contains(&w.to_lowercase().as_str()));
            if auxiliary { "VBN" } else { "VBD" }
        } else if NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            if lower.ends_with('s') { "NNS" } else { "NN" }
        } else if ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
            "JJ"
        } else if lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
            match prev {
                Some("PRP") | Some("NN") | Some("NNP") | Some("WP") => "VBZ",
                _ => "NNS",
            }
        } else {
            "NN"
        };
        tag.to_string()
    }
}

impl Default for EnglishTagger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(sentence: &str) -> Vec<String> {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        EnglishTagger::new().tag(&words)
    }

    #[test]
    fn test_simple_sentence() {
        assert_eq!(
            tags("I have two houses near the lake ."),
            vec!["PRP", "VBP", "CD", "NNS", "IN", "DT", "NN", "."]
        );
    }

    #[test]
    fn test_verb_agreement_and_adverbs() {
        assert_eq!(tags("She runs quickly"), vec!["PRP", "VBZ", "RB"]);
        assert_eq!(tags("the walk"), vec!["DT", "NN"]);
        assert_eq!(tags("they walk"), vec!["PRP", "VBP"]);
        assert_eq!(tags("to wander"), vec!["TO", "VB"]);
    }

    #[test]
    fn test_suffix_rules() {
        assert_eq!(tags("The famous decision"), vec!["DT", "JJ", "NN"]);
        assert_eq!(tags("we were singing"), vec!["PRP", "VBD", "VBG"]);
        assert_eq!(tags("It rained in Hanoi"), vec!["PRP", "VBD", "IN", "NNP"]);
        assert_eq!(tags("costs 3.50"), vec!["NNS", "CD"]);
        assert_eq!(tags("she has walked"), vec!["PRP", "VBZ", "VBN"]);
    }
}
