use crate::error::{DesignerError, DesignerResult};
use crate::ids::PageId;
use crate::page::Page;

/// The page collection the designer saves into
pub trait PageStore {
    fn list(&self) -> Vec<Page>;
    fn get(&self, id: &PageId) -> Option<Page>;
    /// Insert if new, replace if a page with the same id exists
    fn upsert(&mut self, page: Page) -> DesignerResult<()>;
    fn delete(&mut self, id: &PageId) -> DesignerResult<Page>;
}

/// In-memory store; keeps insertion order and enforces unique slugs
#[derive(Debug, Clone, Default)]
pub struct MemoryPageStore {
    pages: Vec<Page>,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageStore for MemoryPageStore {
    fn list(&self) -> Vec<Page> {
        self.pages.clone()
    }

    fn get(&self, id: &PageId) -> Option<Page> {
        self.pages.iter().find(|p| &p.id == id).cloned()
    }

    fn upsert(&mut self, page: Page) -> DesignerResult<()> {
        if let Some(other) = self.find_by_slug(&page.slug) {
            if other.id != page.id {
                return Err(DesignerError::SlugConflict { slug: page.slug });
            }
        }
        match self.pages.iter_mut().find(|p| p.id == page.id) {
            Some(existing) => *existing = page,
            None => self.pages.push(page),
        }
        Ok(())
    }

    fn delete(&mut self, id: &PageId) -> DesignerResult<Page> {
        let idx = self
            .pages
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| DesignerError::PageNotFound { id: id.to_string() })?;
        Ok(self.pages.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_inserts_then_replaces() {
        let mut store = MemoryPageStore::new();
        let mut page = Page::new("Lesson One");
        store.upsert(page.clone()).unwrap();
        page.title = "Lesson 1".to_string();
        store.upsert(page.clone()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&page.id).unwrap().title, "Lesson 1");
    }

    #[test]
    fn test_slug_conflict() {
        let mut store = MemoryPageStore::new();
        store.upsert(Page::new("Same")).unwrap();
        assert!(matches!(
            store.upsert(Page::new("Same")),
            Err(DesignerError::SlugConflict { .. })
        ));
    }

    #[test]
    fn test_delete_missing_page() {
        let mut store = MemoryPageStore::new();
        assert!(matches!(
            store.delete(&PageId::from("nope")),
            Err(DesignerError::PageNotFound { .. })
        ));
    }
}
