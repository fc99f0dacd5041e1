use std::collections::HashMap;

/// Maps a stimulus index from a trial record to an asset name.
///
/// This is the only view the spawn engine has of the session's stimulus
/// configuration; it is injected at construction, never reached through
/// a global.
pub trait StimulusResolver {
    fn lookup(&self, stim_index: i32) -> Option<&str>;
}

/// Plain map-backed resolver, also the test stand-in.
#[derive(Debug, Default, Clone)]
pub struct MapResolver {
    map: HashMap<i32, String>,
}

impl MapResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, stim_index: i32, asset_name: impl Into<String>) {
        self.map.insert(stim_index, asset_name.into());
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl FromIterator<(i32, String)> for MapResolver {
    fn from_iter<I: IntoIterator<Item = (i32, String)>>(iter: I) -> Self {
        Self {
            map: iter.into_iter().collect(),
        }
    }
}

impl StimulusResolver for MapResolver {
    fn lookup(&self, stim_index: i32) -> Option<&str> {
        self.map.get(&stim_index).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_hits_and_misses() {
        let mut resolver = MapResolver::new();
        resolver.insert(3, "banana");
        assert_eq!(resolver.lookup(3), Some("banana"));
        assert_eq!(resolver.lookup(7), None);
    }
}
