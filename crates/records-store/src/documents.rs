use crate::database::Database;
use crate::error::Result;
use crate::models::Document;

impl Database {
    pub fn add_document(&mut self, document: &Document) -> Result<()> {
        self.insert(document)
    }

    pub fn get_document(&self, id: &str) -> Result<Document> {
        self.find(id)
    }

    pub fn list_documents(&self) -> Vec<Document> {
        self.decode_all()
    }

    /// Documents attached to a request. Legacy records are matched through
    /// the `requestId` the load-time migration backfilled.
    pub fn list_documents_for_request(&self, request_id: &str) -> Vec<Document> {
        self.decode_where(|d: &Document| d.request_id == request_id)
    }

    pub fn list_documents_for_citizen(&self, citizen_id: &str) -> Vec<Document> {
        self.decode_where(|d: &Document| d.citizen_id == citizen_id)
    }

    /// Record a review: status, review comment, and the review time when
    /// `document` carries one.
    pub fn update_document(&mut self, id: &str, document: &Document) -> Result<bool> {
        self.patch(id, document)
    }

    pub fn delete_document(&mut self, id: &str) -> Result<bool> {
        self.remove::<Document>(id)
    }
}
