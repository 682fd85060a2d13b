use std::collections::HashMap;

use songngu_core::language::PosHint;

const IRREGULAR_VERBS: &[(&str, &str)] = &[
    ("am", "be"), ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"),
    ("been", "be"), ("being", "be"), ("has", "have"), ("had", "have"), ("having", "have"),
    ("does", "do"), ("did", "do"), ("done", "do"), ("goes", "go"), ("went", "go"),
    ("gone", "go"), ("saw", "see"), ("seen", "see"), ("took", "take"), ("taken", "take"),
    ("made", "make"), ("came", "come"), ("got", "get"), ("gotten", "get"), ("gave", "give"),
    ("given", "give"), ("knew", "know"), ("known", "know"), ("thought", "think"),
    ("told", "tell"), ("found", "find"), ("said", "say"), ("ran", "run"), ("wrote", "write"),
    ("written", "write"), ("writing", "write"), ("ate", "eat"), ("eaten", "eat"),
    ("spoke", "speak"), ("spoken", "speak"), ("brought", "bring"), ("bought", "buy"),
    ("began", "begin"), ("begun", "begin"), ("left", "leave"), ("felt", "feel"),
    ("kept", "keep"), ("slept", "sleep"), ("stood", "stand"), ("understood", "understand"),
    ("swam", "swim"), ("swum", "swim"), ("sang", "sing"), ("sung", "sing"),
    ("drank", "drink"), ("drunk", "drink"), ("drove", "drive"), ("driven", "drive"),
    ("flew", "fly"), ("flown", "fly"), ("grew", "grow"), ("grown", "grow"), ("held", "hold"),
    ("lost", "lose"), ("met", "meet"), ("paid", "pay"), ("sat", "sit"), ("built", "build"),
    ("sent", "send"), ("spent", "spend"), ("taught", "teach"), ("caught", "catch"),
    ("fought", "fight"), ("chose", "choose"), ("chosen", "choose"), ("broke", "break"),
    ("broken", "break"), ("forgot", "forget"), ("forgotten", "forget"), ("wore", "wear"),
    ("worn", "wear"), ("used", "use"), ("using", "use"), ("won", "win"), ("fell", "fall"),
    ("fallen", "fall"), ("lay", "lie"),
];

const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("children", "child"), ("men", "man"), ("women", "woman"), ("people", "person"),
    ("mice", "mouse"), ("geese", "goose"), ("feet", "foot"), ("teeth", "tooth"),
    ("lives", "life"), ("wives", "wife"), ("knives", "knife"), ("leaves", "leaf"),
    ("wolves", "wolf"), ("halves", "half"), ("selves", "self"), ("shelves", "shelf"),
    ("thieves", "thief"), ("loaves", "loaf"), ("oxen", "ox"),
];

const IRREGULAR_ADJECTIVES: &[(&str, &str)] = &[
    ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
    ("farther", "far"), ("further", "far"), ("less", "little"), ("least", "little"),
];

/// Nouns ending in `s` that are already singular
const SINGULAR_S: &[&str] = &["news", "series", "species", "lens", "bus", "gas", "this", "yes"];

/// Suffix stripping with irregular tables, in the spirit of a WordNet morphy pass
pub struct EnglishLemmatizer {
    verbs: HashMap<&'static str, &'static str>,
    nouns: HashMap<&'static str, &'static str>,
    adjectives: HashMap<&'static str, &'static str>,
}

impl EnglishLemmatizer {
    pub fn new() -> Self {
        Self {
            verbs: IRREGULAR_VERBS.iter().copied().collect(),
            nouns: IRREGULAR_NOUNS.iter().copied().collect(),
            adjectives: IRREGULAR_ADJECTIVES.iter().copied().collect(),
        }
    }

    /// Lemma of a lowercase word; multi-word phrases only have their last word reduced
    pub fn lemmatize(&self, word: &str, pos: PosHint) -> String {
        let word = word.trim();
        if let Some((head, last)) = word.rsplit_once(' ') {
            return format!("{} {}", head, self.lemmatize(last, pos));
        }
        if word.chars().count() < 3 || !word.chars().all(|c| c.is_alphabetic() || c == '\'' || c == '-')
        {
            return word.to_string();
        }

        match pos {
            PosHint::Noun => self.noun(word),
            PosHint::Verb => self.verb(word),
            PosHint::Adjective => self.adjective(word),
            PosHint::Adverb => word.to_string(),
        }
    }

    fn noun(&self, word: &str) -> String {
        if let Some(lemma) = self.nouns.get(word) {
            return lemma.to_string();
        }
        if SINGULAR_S.contains(&word) || word.ends_with("ss") || word.ends_with("us") || word.ends_with("is")
        {
            return word.to_string();
        }
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
        for suffix in ["ches", "shes", "sses", "xes", "zes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
        word.strip_suffix('s').unwrap_or(word).to_string()
    }

    fn verb(&self, word: &str) -> String {
        if let Some(lemma) = self.verbs.get(word) {
            return lemma.to_string();
        }
        if let Some(stem) = word.strip_suffix("ies").or_else(|| word.strip_suffix("ied")) {
            return format!("{stem}y");
        }
        if let Some(stem) = word.strip_suffix("ing").filter(|s| s.len() >= 3) {
            return restore_stem(stem);
        }
        if let Some(stem) = word.strip_suffix("ed").filter(|s| s.len() >= 3) {
            return restore_stem(stem);
        }
        for suffix in ["ches", "shes", "sses", "xes", "zes"] {
            if word.ends_with(suffix) {
                return word[..word.len() - 2].to_string();
            }
        }
        if word.ends_with("ss") {
            return word.to_string();
        }
        word.strip_suffix('s').unwrap_or(word).to_string()
    }

    fn adjective(&self, word: &str) -> String {
        if let Some(lemma) = self.adjectives.get(word) {
            return lemma.to_string();
        }
        if let Some(stem) = word.strip_suffix("iest").or_else(|| word.strip_suffix("ier")) {
            return format!("{stem}y");
        }
        if let Some(stem) = word.strip_suffix("est").or_else(|| word.strip_suffix("er")) {
            if stem.len() >= 2 {
                return restore_stem(stem);
            }
        }
        word.to_string()
    }
}

impl Default for EnglishLemmatizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Undo consonant doubling (`runn` -> `run`) or a dropped `e` (`mak` -> `make`)
fn restore_stem(stem: &str) -> String {
    let chars: Vec<char> = stem.chars().collect();
    let n = chars.len();
    let last = chars[n - 1];

    if n >= 3 && last == chars[n - 2] && !is_vowel(last) && !matches!(last, 'l' | 's' | 'f' | 'z') {
        return chars[..n - 1].iter().collect();
    }

    let dropped_e = matches!(last, 'v' | 'c' | 'u')
        || (n == 3
            && !is_vowel(chars[0])
            && is_vowel(chars[1])
            && !is_vowel(last)
            && !matches!(last, 'w' | 'x' | 'y'));
    if dropped_e {
        return format!("{stem}e");
    }
    stem.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lemma(word: &str, pos: PosHint) -> String {
        EnglishLemmatizer::new().lemmatize(word, pos)
    }

    #[test]
    fn test_nouns() {
        assert_eq!(lemma("houses", PosHint::Noun), "house");
        assert_eq!(lemma("cities", PosHint::Noun), "city");
        assert_eq!(lemma("boxes", PosHint::Noun), "box");
        assert_eq!(lemma("churches", PosHint::Noun), "church");
        assert_eq!(lemma("children", PosHint::Noun), "child");
        assert_eq!(lemma("glass", PosHint::Noun), "glass");
        assert_eq!(lemma("lake", PosHint::Noun), "lake");
        assert_eq!(lemma("stilt houses", PosHint::Noun), "stilt house");
    }

    #[test]
    fn test_verbs() {
        assert_eq!(lemma("went", PosHint::Verb), "go");
        assert_eq!(lemma("running", PosHint::Verb), "run");
        assert_eq!(lemma("making", PosHint::Verb), "make");
        assert_eq!(lemma("walked", PosHint::Verb), "walk");
        assert_eq!(lemma("lived", PosHint::Verb), "live");
        assert_eq!(lemma("stopped", PosHint::Verb), "stop");
        assert_eq!(lemma("falling", PosHint::Verb), "fall");
        assert_eq!(lemma("studies", PosHint::Verb), "study");
        assert_eq!(lemma("watches", PosHint::Verb), "watch");
        assert_eq!(lemma("runs", PosHint::Verb), "run");
    }

    #[test]
    fn test_adjectives_and_adverbs() {
        assert_eq!(lemma("better", PosHint::Adjective), "good");
        assert_eq!(lemma("happier", PosHint::Adjective), "happy");
        assert_eq!(lemma("bigger", PosHint::Adjective), "big");
        assert_eq!(lemma("nicest", PosHint::Adjective), "nice");
        assert_eq!(lemma("calm", PosHint::Adjective), "calm");
        assert_eq!(lemma("quickly", PosHint::Adverb), "quickly");
    }
}
