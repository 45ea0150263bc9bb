use std::collections::HashSet;

use thiserror::Error;

use crate::annotations::EpisodeIndex;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Invalid episode selection item '{0}'")]
    Malformed(String),
    #[error("Episode range {start}-{end} is reversed")]
    Reversed {
        start: EpisodeIndex,
        end: EpisodeIndex,
    },
    #[error("Episode {0} is not in the dataset")]
    Unknown(EpisodeIndex),
    #[error("No episodes selected")]
    Empty,
}

/// Parse text such as `"0-3, 7"` into episode indices.
///
/// Order is preserved and repeats are dropped. Blank text selects every
/// available episode.
pub fn parse_episode_selection(
    text: &str,
    available: &[EpisodeIndex],
) -> Result<Vec<EpisodeIndex>, SelectionError> {
    if text.trim().is_empty() {
        if available.is_empty() {
            return Err(SelectionError::Empty);
        }
        return Ok(available.to_vec());
    }
    let known: HashSet<EpisodeIndex> = available.iter().copied().collect();
    let mut seen = HashSet::new();
    let mut selected = Vec::new();
    for item in text.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        let (start, end) = match item.split_once('-') {
            Some((start, end)) => (parse_index(start, item)?, parse_index(end, item)?),
            None => {
                let index = parse_index(item, item)?;
                (index, index)
            }
        };
        if end < start {
            return Err(SelectionError::Reversed { start, end });
        }
        for episode in start..=end {
            if !known.contains(&episode) {
                return Err(SelectionError::Unknown(episode));
            }
            if seen.insert(episode) {
                selected.push(episode);
            }
        }
    }
    if selected.is_empty() {
        return Err(SelectionError::Empty);
    }
    Ok(selected)
}

fn parse_index(text: &str, item: &str) -> Result<EpisodeIndex, SelectionError> {
    text.trim()
        .parse()
        .map_err(|_| SelectionError::Malformed(item.to_string()))
}
