//! Tantivy-based relevance search over the medicine catalog.
//!
//! Complements the substring filter in `catalog` with ranked results.
//! Each field is queried separately and boosted so a hit on the name
//! outranks a hit buried in the side effects.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, Query, QueryParser};
use tantivy::schema::{Field, Schema, Value, INDEXED, STORED, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Medicine;

const BOOST_NAME: f32 = 10.0;
const BOOST_BRAND: f32 = 8.0;
const BOOST_GENERIC: f32 = 7.0;
const BOOST_DRUG_CLASS: f32 = 5.0;
const BOOST_USES: f32 = 3.5;
const BOOST_SIDE_EFFECTS: f32 = 1.5;

/// A ranked hit.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub medicine_id: i64,
    pub score: f32,
}

struct SearchFields {
    medicine_id: Field,
    name: Field,
    brand: Field,
    generic: Field,
    drug_class: Field,
    uses: Field,
    side_effects: Field,
}

impl SearchFields {
    fn boosted(&self) -> [(Field, f32); 6] {
        [
            (self.name, BOOST_NAME),
            (self.brand, BOOST_BRAND),
            (self.generic, BOOST_GENERIC),
            (self.drug_class, BOOST_DRUG_CLASS),
            (self.uses, BOOST_USES),
            (self.side_effects, BOOST_SIDE_EFFECTS),
        ]
    }
}

/// Tantivy search index for medicines.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        let mut schema_builder = Schema::builder();
        let medicine_id = schema_builder.add_i64_field("medicine_id", INDEXED | STORED);
        let name = schema_builder.add_text_field("name", TEXT | STORED);
        let brand = schema_builder.add_text_field("brand", TEXT);
        let generic = schema_builder.add_text_field("generic", TEXT);
        let drug_class = schema_builder.add_text_field("drug_class", TEXT);
        let uses = schema_builder.add_text_field("uses", TEXT);
        let side_effects = schema_builder.add_text_field("side_effects", TEXT);
        let schema = schema_builder.build();

        let fields = SearchFields {
            medicine_id,
            name,
            brand,
            generic,
            drug_class,
            uses,
            side_effects,
        };

        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema.clone()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        if index.schema().get_field("medicine_id").is_err() {
            return Err(AppError::Search(format!(
                "Index at {} has an incompatible schema",
                index_path.display()
            )));
        }

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(50_000_000)
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Replace the index contents with `medicines`.
    pub async fn rebuild(&self, medicines: &[Medicine]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        writer.delete_all_documents()?;
        for medicine in medicines {
            writer.add_document(self.create_document(medicine))?;
        }
        writer.commit()?;

        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} medicines", medicines.len());
        Ok(())
    }

    /// Ranked medicine ids for `query_str`. Blank queries return nothing.
    pub fn search(
        &self,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SearchResult>, AppError> {
        if query_str.trim().is_empty() || limit == 0 {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();

        let mut subqueries: Vec<(Occur, Box<dyn Query>)> = Vec::new();
        for (field, boost) in self.fields.boosted() {
            let mut parser = QueryParser::for_index(&self.index, vec![field]);
            parser.set_conjunction_by_default();
            // Syntax errors in user input are ignored
            let (field_query, _errors) = parser.parse_query_lenient(query_str);
            subqueries.push((Occur::Should, Box::new(BoostQuery::new(field_query, boost))));
        }
        let combined = BooleanQuery::new(subqueries);

        // Never size the collector beyond the number of indexed documents
        let indexed = usize::try_from(searcher.num_docs()).unwrap_or(usize::MAX);
        if offset >= indexed {
            return Ok(Vec::new());
        }
        let collector = TopDocs::with_limit(limit.min(indexed - offset)).and_offset(offset);

        let top_docs = searcher
            .search(&combined, &collector)
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let results = top_docs
            .into_iter()
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let medicine_id = doc.get_first(self.fields.medicine_id)?.as_i64()?;
                Some(SearchResult { medicine_id, score })
            })
            .collect();

        Ok(results)
    }

    fn create_document(&self, medicine: &Medicine) -> TantivyDocument {
        doc!(
            self.fields.medicine_id => medicine.id,
            self.fields.name => medicine.name.clone(),
            self.fields.brand => medicine.brand.clone(),
            self.fields.generic => medicine.generic.clone(),
            self.fields.drug_class => medicine.drug_class.clone(),
            self.fields.uses => medicine.uses.clone(),
            self.fields.side_effects => medicine.side_effects.clone()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::sample::sample_medicines;
    use tempfile::TempDir;

    async fn sample_index() -> (SearchIndex, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();
        index.rebuild(&sample_medicines()).await.unwrap();
        (index, temp_dir)
    }

    #[tokio::test]
    async fn test_name_hit_ranks_first() {
        let (index, _dir) = sample_index().await;
        let results = index.search("paracetamol", 10, 0).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].medicine_id, 1);
    }

    #[tokio::test]
    async fn test_search_by_use() {
        let (index, _dir) = sample_index().await;
        let results = index.search("infections", 10, 0).unwrap();
        assert!(results.iter().any(|r| r.medicine_id == 2));
    }

    #[tokio::test]
    async fn test_offset_and_limit() {
        let (index, _dir) = sample_index().await;
        let all = index.search("pain", 10, 0).unwrap();
        let skipped = index.search("pain", 10, 1).unwrap();
        assert_eq!(skipped.len(), all.len().saturating_sub(1));
        assert!(index.search("pain", 0, 0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offset_past_end_is_empty() {
        let (index, _dir) = sample_index().await;
        assert!(index.search("pain", 20, 6).unwrap().is_empty());
        assert!(index.search("pain", 20, usize::MAX - 5).unwrap().is_empty());
        assert!(index.search("pain", usize::MAX, 0).unwrap().len() <= 6);
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let (index, _dir) = sample_index().await;
        assert!(index.search("   ", 10, 0).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rebuild_replaces_documents() {
        let (index, _dir) = sample_index().await;
        index.rebuild(&sample_medicines()[1..]).await.unwrap();
        let results = index.search("paracetamol", 10, 0).unwrap();
        assert!(results.iter().all(|r| r.medicine_id != 1));
    }
}
