use crate::database::Database;
use crate::error::Result;
use crate::models::{now, ServiceRequest};

impl Database {
    /// Insert a service request. `date` is replaced with the insert time;
    /// the stored record is returned.
    pub fn add_request(&mut self, request: &ServiceRequest) -> Result<ServiceRequest> {
        let mut stored = request.clone();
        stored.date = now();
        self.insert(&stored)?;
        Ok(stored)
    }

    pub fn get_request(&self, id: &str) -> Result<ServiceRequest> {
        self.find(id)
    }

    pub fn list_requests(&self) -> Vec<ServiceRequest> {
        self.decode_all()
    }

    pub fn list_requests_for_citizen(&self, citizen_id: &str) -> Vec<ServiceRequest> {
        self.decode_where(|r: &ServiceRequest| r.citizen_id == citizen_id)
    }

    // only status and adminNote change after submission
    pub fn update_request(&mut self, id: &str, request: &ServiceRequest) -> Result<bool> {
        self.patch(id, request)
    }

    pub fn delete_request(&mut self, id: &str) -> Result<bool> {
        self.remove::<ServiceRequest>(id)
    }
}
