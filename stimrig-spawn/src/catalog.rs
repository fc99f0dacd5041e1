use std::collections::HashMap;

use string_cache::DefaultAtom as Atom;

/// Asset-name -> handle mapping loaded once at engine initialization.
///
/// Names are interned; the same stimulus asset is referenced by every
/// trial of a session, so keys are shared atoms rather than fresh
/// strings per lookup.
#[derive(Debug, Clone)]
pub struct AssetCatalog<A> {
    assets: HashMap<Atom, A>,
}

impl<A> Default for AssetCatalog<A> {
    fn default() -> Self {
        Self {
            assets: HashMap::new(),
        }
    }
}

impl<A> AssetCatalog<A> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, asset: A) {
        self.assets.insert(Atom::from(name), asset);
    }

    pub fn get(&self, name: &str) -> Option<&A> {
        self.assets.get(&Atom::from(name))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl<A> FromIterator<(String, A)> for AssetCatalog<A> {
    fn from_iter<I: IntoIterator<Item = (String, A)>>(iter: I) -> Self {
        Self {
            assets: iter
                .into_iter()
                .map(|(name, asset)| (Atom::from(name.as_str()), asset))
                .collect(),
        }
    }
}
