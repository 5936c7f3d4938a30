use crate::error::Result;
use crate::model::UserContext;

use super::EntityStore;

impl EntityStore<UserContext> {
    pub fn by_category(&mut self, category: &str) -> Result<Vec<UserContext>> {
        let wanted = category.trim().to_lowercase();
        self.filter(|c| c.category() == Some(wanted.as_str()))
    }

    /// Every context on its own line as `[category] content`, for use as
    /// prompt text. Empty when there are none.
    pub fn all_text(&mut self) -> Result<String> {
        Ok(self
            .list_all()?
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use larder_store::MemoryBlobStore;

    use crate::model::UserContext;
    use crate::repo::ContextStore;

    #[test]
    fn contexts_group_and_render() {
        let mut store = ContextStore::for_user(Arc::new(MemoryBlobStore::new()), "u");
        assert_eq!(store.all_text().unwrap(), "");

        store
            .add(UserContext::from_parts("CTX-1", "Vegetarian", Some("dietary")).unwrap())
            .unwrap();
        store
            .add(UserContext::from_parts("CTX-2", "Cooking for two", None).unwrap())
            .unwrap();

        assert_eq!(store.by_category("Dietary").unwrap().len(), 1);
        assert_eq!(store.all_text().unwrap(), "[dietary] Vegetarian\nCooking for two");
    }
}
