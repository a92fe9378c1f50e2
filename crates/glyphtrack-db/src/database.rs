//! Same-size glyph collections and rotation-invariant recognition.

use std::sync::Arc;

use glyphtrack_core::{BinaryGrid, Rotation};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{DatabaseError, GlyphPattern};

/// A successful [`GlyphDatabase::recognize`] lookup.
#[derive(Clone, Debug)]
pub struct Recognition {
    /// The matching entry.
    pub glyph: Arc<GlyphPattern>,
    /// Clockwise rotation such that `candidate == glyph.grid().rotated(rotation)`.
    pub rotation: Rotation,
}

/// Glyph patterns of one fixed grid size, keyed by unique name.
///
/// Entries keep their registration order. Recognition walks them in that
/// order and stops at the first exact match, so when two entries are
/// rotations of each other the earlier registration wins.
///
/// Entries are handed out as `Arc`s: a recognition stays valid after the
/// entry is renamed or removed from the database.
#[derive(Clone, Debug)]
pub struct GlyphDatabase {
    size: usize,
    entries: Vec<Arc<GlyphPattern>>,
}

impl GlyphDatabase {
    /// Empty database for `size × size` glyphs.
    pub fn new(size: usize) -> Self {
        Self {
            size,
            entries: Vec::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
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
        self.entries.iter().position(|e| e.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn check_size(&self, glyph: &GlyphPattern) -> Result<(), DatabaseError> {
        if glyph.size() != self.size {
            return Err(DatabaseError::SizeMismatch {
                expected: self.size,
                got: glyph.size(),
            });
        }
        Ok(())
    }

    /// Register a new glyph.
    pub fn add(&mut self, glyph: GlyphPattern) -> Result<(), DatabaseError> {
        self.check_size(&glyph)?;
        if self.contains(glyph.name()) {
            return Err(DatabaseError::DuplicateName(glyph.name().to_owned()));
        }
        log::debug!("add glyph {:?} ({}x{})", glyph.name(), self.size, self.size);
        self.entries.push(Arc::new(glyph));
        Ok(())
    }

    /// Remove a glyph; absent names are ignored.
    pub fn remove(&mut self, name: &str) -> Option<Arc<GlyphPattern>> {
        let idx = self.position(name)?;
        log::debug!("remove glyph {:?}", name);
        Some(self.entries.remove(idx))
    }

    /// Rename a glyph, keeping its pattern and position.
    pub fn rename(&mut self, old_name: &str, new_name: &str) -> Result<(), DatabaseError> {
        let idx = self
            .position(old_name)
            .ok_or_else(|| DatabaseError::NotFound(old_name.to_owned()))?;
        if old_name == new_name {
            return Ok(());
        }
        if self.contains(new_name) {
            return Err(DatabaseError::DuplicateName(new_name.to_owned()));
        }
        log::debug!("rename glyph {:?} -> {:?}", old_name, new_name);
        Arc::make_mut(&mut self.entries[idx]).set_name(new_name.to_owned());
        Ok(())
    }

    /// Replace the glyph called `name` by `glyph`.
    ///
    /// With an unchanged name the entry is updated in place. Otherwise the old
    /// entry is removed and `glyph` is registered at the end, which fails if a
    /// third entry already uses the new name. Nothing changes on error.
    pub fn replace(&mut self, name: &str, glyph: GlyphPattern) -> Result<(), DatabaseError> {
        let idx = self
            .position(name)
            .ok_or_else(|| DatabaseError::NotFound(name.to_owned()))?;
        self.check_size(&glyph)?;

        if glyph.name() == name {
            log::debug!("replace glyph {:?} in place", name);
            self.entries[idx] = Arc::new(glyph);
            return Ok(());
        }

        if self.contains(glyph.name()) {
            return Err(DatabaseError::DuplicateName(glyph.name().to_owned()));
        }
        log::debug!("replace glyph {:?} by {:?}", name, glyph.name());
        self.entries.remove(idx);
        self.entries.push(Arc::new(glyph));
        Ok(())
    }

    /// Look up a glyph by name.
    pub fn get(&self, name: &str) -> Option<&Arc<GlyphPattern>> {
        self.entries.iter().find(|e| e.name() == name)
    }

    /// Names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<GlyphPattern>> {
        self.entries.iter()
    }

    /// Find the glyph shown by `candidate`, in any of its four orientations.
    ///
    /// `Ok(None)` means no entry matches. A candidate whose side length
    /// differs from the database size is refused with
    /// [`DatabaseError::SizeMismatch`].
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "trace", skip(self, candidate), fields(entries = self.entries.len()))
    )]
    pub fn recognize(&self, candidate: &BinaryGrid) -> Result<Option<Recognition>, DatabaseError> {
        if candidate.size() != self.size {
            log::warn!(
                "refusing {}x{} candidate for a {}x{} database",
                candidate.size(),
                candidate.size(),
                self.size,
                self.size
            );
            return Err(DatabaseError::SizeMismatch {
                expected: self.size,
                got: candidate.size(),
            });
        }

        Ok(self.entries.iter().find_map(|glyph| {
            glyph.match_rotation(candidate).map(|rotation| Recognition {
                glyph: Arc::clone(glyph),
                rotation,
            })
        }))
    }
}
