use std::collections::HashMap;
use std::sync::Mutex;

const BUILTIN_SYNONYMS: &[(&str, &[&str])] = &[
    ("python", &["python3", "python2", "py"]),
    ("javascript", &["js", "ecmascript"]),
    ("postgresql", &["postgres", "psql"]),
    ("typescript", &["ts"]),
    ("kubernetes", &["k8s"]),
];

/// Canonicalizes skill, position and location text.
///
/// Results are memoized per instance; the cache never evicts.
#[derive(Debug)]
pub struct SkillNormalizer {
    synonyms: HashMap<String, String>,
    cache: Mutex<HashMap<String, String>>,
}

impl Default for SkillNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillNormalizer {
    pub fn new() -> Self {
        Self::with_synonyms(&HashMap::new())
    }

    /// Built-in table extended with `extra` (canonical -> synonyms)
    pub fn with_synonyms(extra: &HashMap<String, Vec<String>>) -> Self {
        let mut synonyms = HashMap::new();
        let builtin = BUILTIN_SYNONYMS
            .iter()
            .map(|(main, syns)| (main.to_string(), syns.iter().map(|s| s.to_string()).collect::<Vec<_>>()));
        let configured = extra.iter().map(|(main, syns)| (main.clone(), syns.clone()));

        for (main, syns) in builtin.chain(configured) {
            let main = clean(&main);
            if main.is_empty() {
                continue;
            }
            for syn in syns {
                let syn = clean(&syn);
                if !syn.is_empty() && syn != main {
                    synonyms.insert(syn, main.clone());
                }
            }
        }
        // canonical forms must map to themselves so normalization stays idempotent
        let canonical: Vec<String> = synonyms.values().cloned().collect();
        for main in canonical {
            synonyms.remove(&main);
        }

        Self {
            synonyms,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Lower-cases, strips punctuation, collapses whitespace and applies synonyms
    pub fn normalize(&self, token: &str) -> String {
        if let Some(hit) = self.lock_cache().get(token) {
            return hit.clone();
        }
        let cleaned = clean(token);
        let normalized = self.synonyms.get(&cleaned).cloned().unwrap_or(cleaned);
        self.lock_cache().insert(token.to_string(), normalized.clone());
        normalized
    }

    pub fn cached_entries(&self) -> usize {
        self.lock_cache().len()
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Lower-case text without punctuation, whitespace collapsed; no synonym mapping
pub fn clean(text: &str) -> String {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
