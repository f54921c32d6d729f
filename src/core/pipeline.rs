use crate::calendar::{build_event, CalendarDirectory, EventSettings};
use crate::core::poll::PollReader;
use crate::core::{allocator, CalendarSink, ConfigProvider, Pipeline, Storage};
use crate::domain::model::{BookedEvent, PreferenceMatrix, ScheduleResult};
use crate::utils::error::Result;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

const BUNDLE_NAME: &str = "allocation_output.zip";

pub struct SchedulePipeline<S: Storage, C: ConfigProvider, K: CalendarSink> {
    storage: S,
    config: C,
    sink: K,
    events: EventSettings,
    directory_file: Option<String>,
}

impl<S: Storage, C: ConfigProvider, K: CalendarSink> SchedulePipeline<S, C, K> {
    pub fn new(
        storage: S,
        config: C,
        sink: K,
        events: EventSettings,
        directory_file: Option<String>,
    ) -> Self {
        Self {
            storage,
            config,
            sink,
            events,
            directory_file,
        }
    }

    fn render_allocation_csv(
        &self,
        outcome: &crate::domain::model::AllocationOutcome,
    ) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["date", "weekday", "time", "participant"])?;
        for assignment in &outcome.assignments {
            writer.write_record([
                assignment.slot.date.as_str(),
                assignment.slot.weekday.as_str(),
                assignment.slot.time.as_str(),
                assignment.participant.as_str(),
            ])?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn render_unallocated_tsv(&self, unallocated: &[String]) -> String {
        let mut lines = vec!["participant".to_string()];
        lines.extend(unallocated.iter().cloned());
        lines.join("\n")
    }

    async fn resolve_calendar_id(&self) -> Result<String> {
        match &self.directory_file {
            Some(path) => {
                let raw = self.storage.read_file(path).await?;
                let directory = CalendarDirectory::from_json(&raw)?;
                directory.resolve(&self.events.calendar)
            }
            None => {
                tracing::debug!(
                    "no calendar directory configured, using '{}' verbatim",
                    self.events.calendar
                );
                Ok(self.events.calendar.clone())
            }
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, K: CalendarSink> Pipeline for SchedulePipeline<S, C, K> {
    async fn extract(&self) -> Result<PreferenceMatrix> {
        tracing::debug!("reading poll from: {}", self.config.poll_path());
        let raw = self.storage.read_file(self.config.poll_path()).await?;

        let reader = PollReader::new(self.config.selection_marker(), self.config.transpose());
        let matrix = reader.parse(&raw)?;
        tracing::debug!(
            "poll parsed: {} participants x {} slots",
            matrix.participants().len(),
            matrix.slots().len()
        );
        Ok(matrix)
    }

    async fn transform(&self, matrix: PreferenceMatrix) -> Result<ScheduleResult> {
        let mut rng: SmallRng = match self.config.seed() {
            Some(seed) => {
                tracing::debug!("allocating with fixed seed {}", seed);
                SmallRng::seed_from_u64(seed)
            }
            None => SmallRng::from_os_rng(),
        };

        let outcome = allocator::allocate(&matrix, &mut rng);
        tracing::debug!(
            "allocation settled {} of {} slots, {} participants left over",
            outcome.assignments.len(),
            matrix.slots().len(),
            outcome.unallocated.len()
        );

        let allocation_csv = self.render_allocation_csv(&outcome)?;
        let unallocated_tsv = self.render_unallocated_tsv(&outcome.unallocated);

        let mut events = Vec::with_capacity(outcome.assignments.len());
        for assignment in &outcome.assignments {
            let event = build_event(&assignment.slot, &self.events)?;
            events.push(BookedEvent {
                participant: assignment.participant.clone(),
                slot: assignment.slot.clone(),
                event,
            });
        }

        Ok(ScheduleResult {
            outcome,
            allocation_csv,
            unallocated_tsv,
            events,
        })
    }

    async fn load(&self, result: ScheduleResult) -> Result<String> {
        let bundle_path = format!("{}/{}", self.config.output_path(), BUNDLE_NAME);

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>("allocation.csv", FileOptions::default())?;
            zip.write_all(result.allocation_csv.as_bytes())?;

            zip.start_file::<_, ()>("unallocated.tsv", FileOptions::default())?;
            zip.write_all(result.unallocated_tsv.as_bytes())?;

            if !result.events.is_empty() {
                zip.start_file::<_, ()>("events.json", FileOptions::default())?;
                let json_data = serde_json::to_string_pretty(&result.events)?;
                zip.write_all(json_data.as_bytes())?;
            }

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("writing bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file(&bundle_path, &zip_data).await?;

        if result.events.is_empty() {
            tracing::warn!("no assignments, nothing to book");
        } else {
            let calendar_id = self.resolve_calendar_id().await?;
            let booked = self.sink.publish(&calendar_id, &result.events).await?;
            tracing::info!("queued {} events for calendar '{}'", booked, calendar_id);
            for event in &result.events {
                tracing::info!(
                    "Adding calendar event for {} at {}",
                    event.participant,
                    event.slot
                );
            }
        }

        Ok(bundle_path)
    }
}
