//! In-memory, read-only knowledge store.
//!
//! Built once at process start from the six fixed category documents and
//! then shared behind an `Arc` by every request handler. Nothing mutates it
//! after load, so concurrent reads need no locking.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{KnowledgeError, Result};
use crate::parser::parse_service_document;
use crate::types::{ServiceCategory, ServiceDocument};

#[derive(Debug, Default)]
pub struct KnowledgeStore {
    documents: BTreeMap<ServiceCategory, ServiceDocument>,
}

impl KnowledgeStore {
    /// Load every category file found under `dir`. Unreadable files are
    /// logged and skipped; only a missing directory is an error.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(KnowledgeError::DataDirNotFound(dir.display().to_string()));
        }

        let mut documents = BTreeMap::new();
        for category in ServiceCategory::ALL {
            let path = dir.join(category.file_name());
            match std::fs::read_to_string(&path) {
                Ok(html) => {
                    let doc = parse_service_document(&html, category);
                    info!(
                        category = category.key(),
                        services = doc.services.len(),
                        "loaded category document"
                    );
                    documents.insert(category, doc);
                }
                Err(e) => {
                    warn!(
                        category = category.key(),
                        path = %path.display(),
                        error = %e,
                        "skipping unreadable category document"
                    );
                }
            }
        }

        info!(categories = documents.len(), "knowledge store loaded");
        Ok(Self { documents })
    }

    /// Build a store from already-parsed documents.
    pub fn from_documents(
        documents: impl IntoIterator<Item = (ServiceCategory, ServiceDocument)>,
    ) -> Self {
        Self {
            documents: documents.into_iter().collect(),
        }
    }

    pub fn get(&self, category: ServiceCategory) -> Option<&ServiceDocument> {
        self.documents.get(&category)
    }

    pub fn categories(&self) -> impl Iterator<Item = ServiceCategory> + '_ {
        self.documents.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_an_error() {
        let result = KnowledgeStore::load_from_dir("/nonexistent/benefits-data");
        assert!(matches!(result, Err(KnowledgeError::DataDirNotFound(_))));
    }

    #[test]
    fn missing_category_files_are_skipped_and_the_rest_load() {
        let dir = tempfile::tempdir().unwrap();
        let dental = r#"<html><body>
<h2>מרפאות שיניים</h2>
<p>טיפולי שיניים.</p>
<table>
<tr><th>שם השירות</th><th>מכבי</th><th>מאוחדת</th><th>כללית</th></tr>
<tr><td>סתימות</td><td>זהב: 90%</td><td>זהב: 85%</td><td>זהב: 80%</td></tr>
</table>
</body></html>"#;
        std::fs::write(
            dir.path().join(ServiceCategory::Dental.file_name()),
            dental,
        )
        .unwrap();
        std::fs::write(
            dir.path().join(ServiceCategory::Workshops.file_name()),
            "<html><body><h2>סדנאות</h2></body></html>",
        )
        .unwrap();

        let store = KnowledgeStore::load_from_dir(dir.path()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            store.get(ServiceCategory::Dental).unwrap().services.len(),
            1
        );
        assert!(store.get(ServiceCategory::Optometry).is_none());
        assert!(store.get(ServiceCategory::Pregnancy).is_none());
    }

    #[test]
    fn from_documents_indexes_by_category() {
        let doc = ServiceDocument {
            title: "dental".into(),
            ..Default::default()
        };
        let store = KnowledgeStore::from_documents([(ServiceCategory::Dental, doc)]);
        assert_eq!(store.len(), 1);
        assert!(store.get(ServiceCategory::Dental).is_some());
        assert!(store.get(ServiceCategory::Optometry).is_none());
        assert_eq!(
            store.categories().collect::<Vec<_>>(),
            vec![ServiceCategory::Dental]
        );
    }
}
