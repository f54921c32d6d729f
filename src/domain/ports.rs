use crate::domain::model::{BookedEvent, PreferenceMatrix, ScheduleResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn poll_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn selection_marker(&self) -> &str;
    fn transpose(&self) -> bool;
    fn seed(&self) -> Option<u64>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<PreferenceMatrix>;
    async fn transform(&self, matrix: PreferenceMatrix) -> Result<ScheduleResult>;
    async fn load(&self, result: ScheduleResult) -> Result<String>;
}

/// Destination for prepared bookings. The real calendar transport lives
/// behind this seam; the built-in adapter records events to a file.
#[async_trait]
pub trait CalendarSink: Send + Sync {
    async fn publish(&self, calendar_id: &str, events: &[BookedEvent]) -> Result<usize>;
}
