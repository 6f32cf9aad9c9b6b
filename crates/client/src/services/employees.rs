//! Employee directory. Headcount is reduced locally.

use opsdesk_core::{Employee, EmployeeId, EmployeeInput, HeadcountSummary, Summary};
use tracing::instrument;

use crate::error::ServiceError;
use crate::http::ApiClient;
use crate::service::CollectionService;

const PATH: &str = "/hr/employees";

/// Employee backend.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    client: ApiClient,
}

impl EmployeeService {
    /// Wrap a backend client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl CollectionService for EmployeeService {
    type Input = EmployeeInput;
    type Record = Employee;
    type Stats = HeadcountSummary;

    const ENTITY: &'static str = "employee";
    const PLURAL: &'static str = "employees";

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Employee>, ServiceError> {
        self.client.get(PATH).await
    }

    async fn stats(&self, records: &[Employee]) -> Result<HeadcountSummary, ServiceError> {
        Ok(HeadcountSummary::summarize(records))
    }

    #[instrument(skip(self, input), fields(email = %input.email))]
    async fn create(&self, input: &EmployeeInput) -> Result<Employee, ServiceError> {
        self.client.post(PATH, input).await
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: EmployeeId, input: &EmployeeInput) -> Result<Employee, ServiceError> {
        self.client.put(&format!("{PATH}/{id}"), input).await
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: EmployeeId) -> Result<(), ServiceError> {
        self.client.delete(&format!("{PATH}/{id}")).await
    }
}
