use rand::Rng;
use rand::seq::SliceRandom;

use crate::errors::{AppError, Result};

const VERBS: &str = include_str!("data/verbs.txt");
const NOUNS: &str = include_str!("data/nouns.txt");

// Uniqueness against existing backups is the caller's concern; retries are
// bounded by a multiple of the combination space rather than looping forever.
const ATTEMPTS_PER_COMBINATION: usize = 4;

fn words(raw: &str) -> Vec<&str> {
    raw.lines().map(str::trim).filter(|w| !w.is_empty()).collect()
}

/// Picks one verb and one noun and joins them as `"verb-noun"`.
fn compose<R: Rng>(verbs: &[&str], nouns: &[&str], rng: &mut R) -> Option<String> {
    let verb = verbs.choose(rng)?;
    let noun = nouns.choose(rng)?;
    Some(format!("{verb}-{noun}"))
}

fn unique_from(verbs: &[&str], nouns: &[&str], existing: &[String]) -> Result<String> {
    let attempts = verbs.len() * nouns.len() * ATTEMPTS_PER_COMBINATION;
    let mut rng = rand::thread_rng();
    for _ in 0..attempts {
        if let Some(name) = compose(verbs, nouns, &mut rng) {
            if !existing.iter().any(|e| *e == name) {
                return Ok(name);
            }
        }
    }
    Err(AppError::BackupNameSpaceExhausted(attempts))
}

/// Generates a backup name from the bundled word lists that does not collide
/// with any name in `existing`.
pub fn unique_backup_name(existing: &[String]) -> Result<String> {
    unique_from(&words(VERBS), &words(NOUNS), existing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_single_combination() {
        let mut rng = rand::thread_rng();
        let name = compose(&["foo"], &["bar"], &mut rng);
        assert_eq!(name.as_deref(), Some("foo-bar"));
    }

    #[test]
    fn test_compose_empty_lists() {
        let mut rng = rand::thread_rng();
        assert!(compose(&[], &["bar"], &mut rng).is_none());
    }

    #[test]
    fn test_unique_backup_name_shape() {
        let name = unique_backup_name(&[]).unwrap();
        let (verb, noun) = name.split_once('-').unwrap();
        assert!(words(VERBS).contains(&verb));
        assert!(words(NOUNS).contains(&noun));
    }

    #[test]
    fn test_unique_avoids_existing() {
        let existing = vec!["foo-bar".to_string()];
        let name = unique_from(&["foo"], &["bar", "baz"], &existing).unwrap();
        assert_eq!(name, "foo-baz");
    }

    #[test]
    fn test_exhausted_name_space() {
        let existing = vec!["foo-bar".to_string()];
        assert!(matches!(
            unique_from(&["foo"], &["bar"], &existing),
            Err(AppError::BackupNameSpaceExhausted(_))
        ));
    }
}
