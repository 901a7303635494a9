//! 客户业务逻辑

use std::sync::Arc;

use taproom_common::{PagedResult, Pagination};
use taproom_domain_core::Entity;
use taproom_errors::AppResult;
use taproom_ports::RecordStore;
use tracing::{debug, info};

use crate::domain::{Customer, CustomerDraft, CustomerFilter, CustomerId, CustomerPatch};

use super::queries::ListCustomersQuery;

pub struct CustomerService {
    store: Arc<dyn RecordStore<Customer>>,
}

impl CustomerService {
    pub fn new(store: Arc<dyn RecordStore<Customer>>) -> Self {
        Self { store }
    }

    pub async fn create_customer(&self, draft: CustomerDraft) -> AppResult<Customer> {
        let customer = self.store.create(draft).await?;
        info!(customer_id = %customer.id(), "Customer created");
        Ok(customer)
    }

    pub async fn get_customer(&self, id: &CustomerId) -> AppResult<Option<Customer>> {
        self.store.find_by_id(id).await
    }

    pub async fn list_customers(
        &self,
        query: ListCustomersQuery,
    ) -> AppResult<PagedResult<Customer>> {
        let filter = CustomerFilter::new(query.name);
        let pagination = Pagination::from_request(query.page_number, query.page_size);
        self.store.list(&filter, &pagination).await
    }

    pub async fn update_customer(
        &self,
        id: &CustomerId,
        draft: CustomerDraft,
        expected_version: Option<i32>,
    ) -> AppResult<Option<Customer>> {
        let updated = self.store.replace(id, draft, expected_version).await?;
        if updated.is_some() {
            debug!(customer_id = %id, "Customer replaced");
        }
        Ok(updated)
    }

    pub async fn patch_customer(
        &self,
        id: &CustomerId,
        patch: CustomerPatch,
    ) -> AppResult<Option<Customer>> {
        let patched = self.store.merge(id, patch).await?;
        if patched.is_some() {
            debug!(customer_id = %id, "Customer patched");
        }
        Ok(patched)
    }

    pub async fn delete_customer(&self, id: &CustomerId) -> AppResult<bool> {
        let deleted = self.store.delete(id).await?;
        if deleted {
            info!(customer_id = %id, "Customer deleted");
        }
        Ok(deleted)
    }
}
