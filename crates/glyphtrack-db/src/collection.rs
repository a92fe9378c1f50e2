use crate::{DatabaseError, GlyphDatabase};

/// Named glyph databases, kept in insertion order.
///
/// Databases may have different grid sizes; each name is unique.
#[derive(Clone, Debug, Default)]
pub struct GlyphDatabases {
    entries: Vec<(String, GlyphDatabase)>,
}

impl GlyphDatabases {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }

    pub fn add(&mut self, name: impl Into<String>, db: GlyphDatabase) -> Result<(), DatabaseError> {
        let name = name.into();
        if self.position(&name).is_some() {
            return Err(DatabaseError::DuplicateName(name));
        }
        log::debug!(
            "add database {:?} ({} glyphs of {}x{})",
            name,
            db.len(),
            db.size(),
            db.size()
        );
        self.entries.push((name, db));
        Ok(())
    }

    /// Remove a database; absent names are ignored.
    pub fn remove(&mut self, name: &str) -> Option<GlyphDatabase> {
        let idx = self.position(name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), DatabaseError> {
        let idx = self
            .position(old_name)
            .ok_or_else(|| DatabaseError::NotFound(old_name.to_owned()))?;
        if old_name == new_name {
            return Ok(());
        }
        if self.position(new_name).is_some() {
            return Err(DatabaseError::DuplicateName(new_name.to_owned()));
        }
        self.entries[idx].0 = new_name.to_owned();
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&GlyphDatabase> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, db)| db)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut GlyphDatabase> {
        self.entries
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, db)| db)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_ordered() {
        let mut dbs = GlyphDatabases::new();
        dbs.add("five", GlyphDatabase::new(5)).unwrap();
        dbs.add("seven", GlyphDatabase::new(7)).unwrap();
        assert_eq!(
            dbs.add("five", GlyphDatabase::new(5)),
            Err(DatabaseError::DuplicateName("five".into()))
        );
        assert_eq!(dbs.names().collect::<Vec<_>>(), ["five", "seven"]);
        assert_eq!(dbs.get("seven").map(|db| db.size()), Some(7));
    }

    #[test]
    fn rename_and_remove() {
        let mut dbs = GlyphDatabases::new();
        dbs.add("a", GlyphDatabase::new(5)).unwrap();
        dbs.add("b", GlyphDatabase::new(5)).unwrap();

        assert_eq!(dbs.rename("a", "a"), Ok(()));
        assert_eq!(
            dbs.rename("a", "b"),
            Err(DatabaseError::DuplicateName("b".into()))
        );
        assert_eq!(
            dbs.rename("zz", "c"),
            Err(DatabaseError::NotFound("zz".into()))
        );
        dbs.rename("a", "c").unwrap();
        assert_eq!(dbs.names().collect::<Vec<_>>(), ["c", "b"]);

        assert!(dbs.remove("missing").is_none());
        assert!(dbs.remove("c").is_some());
        assert_eq!(dbs.len(), 1);
    }
}
