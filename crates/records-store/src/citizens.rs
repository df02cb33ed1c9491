//! CRUD operations for [`Citizen`] records.

use crate::database::Database;
use crate::error::Result;
use crate::models::Citizen;

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new citizen.
    pub fn add_citizen(&mut self, citizen: &Citizen) -> Result<()> {
        self.insert(citizen)
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single citizen by id.
    pub fn get_citizen(&self, id: &str) -> Result<Citizen> {
        self.find(id)
    }

    /// List all citizens in stored order.
    pub fn list_citizens(&self) -> Vec<Citizen> {
        self.decode_all()
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Overwrite name, email, number and password of the citizen with the
    /// given id. Returns `true` if a record was updated.
    pub fn update_citizen(&mut self, id: &str, citizen: &Citizen) -> Result<bool> {
        self.patch(id, citizen)
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a citizen by id. Returns `true` if a record was deleted.
    pub fn delete_citizen(&mut self, id: &str) -> Result<bool> {
        self.remove::<Citizen>(id)
    }
}
