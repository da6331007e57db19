//! Layered name state.
//!
//! Validation reads and writes through a [`NameView`]; overlays stack on the
//! persistent database and push their changes down on flush.

use crate::error::Result;
use crate::names::{Name, NameCache, NameData};

/// Layered read/write access to name state.
///
/// Implemented by the persistent [`NameDb`](crate::storage::NameDb) and by
/// every in-memory [`NameViewCache`] stacked on top of it.
pub trait NameView {
    fn get_name(&self, name: &Name) -> Result<Option<NameData>>;

    fn set_name(&mut self, name: &Name, data: &NameData) -> Result<()>;

    fn delete_name(&mut self, name: &Name) -> Result<()>;

    /// Hash of the block this view's state corresponds to.
    fn get_best_block(&self) -> Result<Option<String>>;

    /// Take over a child layer's changes (and optionally its best block).
    fn batch_write(&mut self, names: &NameCache, best_block: Option<&str>) -> Result<()>;

    /// Push pending changes one layer down.
    fn flush(&mut self) -> Result<()>;
}

/// In-memory overlay over another view.
///
/// Changes stay here until [`flush`](NameView::flush); dropping the cache
/// discards them.
pub struct NameViewCache<'a> {
    base: &'a mut dyn NameView,
    names: NameCache,
    best_block: Option<String>,
}

impl<'a> NameViewCache<'a> {
    pub fn new(base: &'a mut dyn NameView) -> NameViewCache<'a> {
        NameViewCache {
            base,
            names: NameCache::new(),
            best_block: None,
        }
    }

    pub fn set_best_block(&mut self, hash: &str) {
        self.best_block = Some(hash.to_string());
    }

    /// Changes recorded in this layer.
    pub fn changes(&self) -> &NameCache {
        &self.names
    }
}

impl NameView for NameViewCache<'_> {
    fn get_name(&self, name: &Name) -> Result<Option<NameData>> {
        if self.names.is_deleted(name) {
            return Ok(None);
        }
        if let Some(data) = self.names.get(name) {
            return Ok(Some(data.clone()));
        }
        self.base.get_name(name)
    }

    fn set_name(&mut self, name: &Name, data: &NameData) -> Result<()> {
        self.names.set(name, data);
        Ok(())
    }

    fn delete_name(&mut self, name: &Name) -> Result<()> {
        self.names.delete(name);
        Ok(())
    }

    fn get_best_block(&self) -> Result<Option<String>> {
        match &self.best_block {
            Some(hash) => Ok(Some(hash.clone())),
            None => self.base.get_best_block(),
        }
    }

    fn batch_write(&mut self, names: &NameCache, best_block: Option<&str>) -> Result<()> {
        self.names.apply(names);
        if let Some(hash) = best_block {
            self.best_block = Some(hash.to_string());
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.base
            .batch_write(&self.names, self.best_block.as_deref())?;
        self.names.clear();
        self.best_block = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Script;
    use crate::storage::NameDb;

    fn data(tag: u8) -> NameData {
        NameData::new(Script::new_p2pkh(&[tag; 20]))
    }

    fn open_temp() -> NameDb {
        let db = sled::Config::new().temporary(true).open().unwrap();
        NameDb::open(&db).unwrap()
    }

    #[test]
    fn test_overlay_reads_through_and_shadows() {
        let mut db = open_temp();
        let on_disk = Name::from_string("on-disk");
        let hidden = Name::from_string("hidden");
        db.set_name(&on_disk, &data(1)).unwrap();
        db.set_name(&hidden, &data(1)).unwrap();

        let mut view = NameViewCache::new(&mut db);
        assert_eq!(view.get_name(&on_disk).unwrap(), Some(data(1)));

        view.delete_name(&hidden).unwrap();
        assert_eq!(view.get_name(&hidden).unwrap(), None);

        view.set_name(&on_disk, &data(2)).unwrap();
        assert_eq!(view.get_name(&on_disk).unwrap(), Some(data(2)));

        drop(view);
        // nothing flushed
        assert_eq!(db.get_name(&hidden).unwrap(), Some(data(1)));
        assert_eq!(db.get_name(&on_disk).unwrap(), Some(data(1)));
    }

    #[test]
    fn test_nested_layers_flush_down() {
        let mut db = open_temp();
        let name = Name::from_string("nested");
        let doomed = Name::from_string("doomed");
        db.set_name(&doomed, &data(9)).unwrap();

        {
            let mut block_view = NameViewCache::new(&mut db);
            {
                let mut tx_view = NameViewCache::new(&mut block_view);
                tx_view.set_name(&name, &data(3)).unwrap();
                tx_view.delete_name(&doomed).unwrap();
                tx_view.flush().unwrap();
                assert!(tx_view.changes().is_empty());
            }
            assert_eq!(block_view.get_name(&name).unwrap(), Some(data(3)));
            assert_eq!(block_view.get_name(&doomed).unwrap(), None);

            block_view.set_best_block("tip");
            block_view.flush().unwrap();
        }

        assert_eq!(db.get_name(&name).unwrap(), Some(data(3)));
        assert_eq!(db.get_name(&doomed).unwrap(), None);
        assert_eq!(db.get_best_block().unwrap().as_deref(), Some("tip"));
    }

    #[test]
    fn test_discarded_child_leaves_parent_untouched() {
        let mut db = open_temp();
        let mut block_view = NameViewCache::new(&mut db);
        let name = Name::from_string("rolled-back");
        {
            let mut tx_view = NameViewCache::new(&mut block_view);
            tx_view.set_name(&name, &data(4)).unwrap();
        }
        assert_eq!(block_view.get_name(&name).unwrap(), None);
        assert!(block_view.changes().is_empty());
    }
}
