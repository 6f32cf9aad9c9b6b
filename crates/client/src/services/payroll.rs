//! Payroll entries. Net pay is computed by the backend; totals are reduced
//! locally.

use opsdesk_core::{PayrollEntry, PayrollEntryId, PayrollInput, PayrollTotals, Summary};
use tracing::instrument;

use crate::error::ServiceError;
use crate::http::ApiClient;
use crate::service::CollectionService;

const PATH: &str = "/hr/payroll";

/// Payroll backend.
#[derive(Debug, Clone)]
pub struct PayrollService {
    client: ApiClient,
}

impl PayrollService {
    /// Wrap a backend client.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

impl CollectionService for PayrollService {
    type Input = PayrollInput;
    type Record = PayrollEntry;
    type Stats = PayrollTotals;

    const ENTITY: &'static str = "payroll entry";
    const PLURAL: &'static str = "payroll entries";

    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<PayrollEntry>, ServiceError> {
        self.client.get(PATH).await
    }

    async fn stats(&self, records: &[PayrollEntry]) -> Result<PayrollTotals, ServiceError> {
        Ok(PayrollTotals::summarize(records))
    }

    #[instrument(skip(self, input), fields(period = %input.period))]
    async fn create(&self, input: &PayrollInput) -> Result<PayrollEntry, ServiceError> {
        let entry = self.client.post(PATH, input).await?;
        check_net_pay(input, &entry);
        Ok(entry)
    }

    #[instrument(skip(self, input))]
    async fn update(&self, id: PayrollEntryId, input: &PayrollInput) -> Result<PayrollEntry, ServiceError> {
        let entry = self.client.put(&format!("{PATH}/{id}"), input).await?;
        check_net_pay(input, &entry);
        Ok(entry)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: PayrollEntryId) -> Result<(), ServiceError> {
        self.client.delete(&format!("{PATH}/{id}")).await
    }
}

/// Returns `false` (and logs a warning) if the stored net pay is not
/// base + bonus - deductions of the submitted input.
fn check_net_pay(input: &PayrollInput, entry: &PayrollEntry) -> bool {
    let expected = input.expected_net_pay();
    let consistent = entry.net_pay == expected;
    if !consistent {
        tracing::warn!(
            id = %entry.id,
            %expected,
            actual = %entry.net_pay,
            "backend net pay differs from base + bonus - deductions"
        );
    }
    consistent
}
